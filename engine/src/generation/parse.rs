//! Model reply parsing
//!
//! Turns the free-form reply into a clamped, renumbered task list.

use focus_sdk::{task_id, BucketSet, Task};
use serde_json::Value;

use crate::llm::{extract_json_object, LLMError};

/// Parse a model reply into tasks.
///
/// Keeps items with a non-blank string `text` and a `correctBucket` from the
/// bucket set, trims text, caps at `max_tasks` and numbers ids from `t1`.
/// A missing or non-array `tasks` field counts as empty.
///
/// # Errors
///
/// * `LLMError::ParseError` - the extracted text is not JSON
/// * `LLMError::NoTasks` - no item survived filtering
pub fn parse_tasks(reply: &str, buckets: &BucketSet, max_tasks: usize) -> Result<Vec<Task>, LLMError> {
    let json_text = extract_json_object(reply);
    let parsed: Value =
        serde_json::from_str(json_text).map_err(|e| LLMError::ParseError(e.to_string()))?;

    let items = parsed
        .get("tasks")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let tasks = filter_items(items, buckets, max_tasks);
    if tasks.is_empty() {
        return Err(LLMError::NoTasks);
    }

    Ok(tasks)
}

/// Filter raw JSON items into tasks.
///
/// Shared with the task API client, which re-validates what the endpoint sends.
pub fn filter_items(items: &[Value], buckets: &BucketSet, max_tasks: usize) -> Vec<Task> {
    items
        .iter()
        .filter_map(|item| {
            let text = item.get("text")?.as_str()?.trim();
            let bucket = buckets.parse(item.get("correctBucket")?.as_str()?)?;
            (!text.is_empty()).then(|| (text.to_string(), bucket))
        })
        .take(max_tasks)
        .enumerate()
        .map(|(i, (text, bucket))| Task::new(task_id(i), text, bucket))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_sdk::Slot;

    fn buckets() -> BucketSet {
        BucketSet::current()
    }

    #[test]
    fn test_parse_valid_reply() {
        let reply = r#"{"tasks":[
            {"text":"  Write the title  ","correctBucket":"Current Goal"},
            {"text":"Gather 3 articles","correctBucket":"Next Task"},
            {"text":"Check TikTok","correctBucket":"After Work"}
        ]}"#;
        let tasks = parse_tasks(reply, &buckets(), 8).unwrap();

        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[0].id, "t1");
        assert_eq!(tasks[0].text, "Write the title");
        assert_eq!(tasks[2].correct_bucket, buckets().bucket(Slot::Later));
    }

    #[test]
    fn test_parse_drops_invalid_items_and_renumbers() {
        let reply = r#"```json
{"tasks":[
  {"text":"Bad bucket","correctBucket":"Someday"},
  {"text":42,"correctBucket":"Next Task"},
  {"text":"   ","correctBucket":"Next Task"},
  {"correctBucket":"Next Task"},
  {"text":"Keep me","correctBucket":"Next Task"}
]}
```"#;
        let tasks = parse_tasks(reply, &buckets(), 8).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
        assert_eq!(tasks[0].text, "Keep me");
    }

    #[test]
    fn test_parse_caps_at_max() {
        let items: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"text":"Task {i}","correctBucket":"After Work"}}"#))
            .collect();
        let reply = format!(r#"{{"tasks":[{}]}}"#, items.join(","));
        let tasks = parse_tasks(&reply, &buckets(), 8).unwrap();
        assert_eq!(tasks.len(), 8);
        assert_eq!(tasks[7].id, "t8");
        assert_eq!(tasks[7].text, "Task 7");
    }

    #[test]
    fn test_parse_no_braces_is_parse_error() {
        let err = parse_tasks("I cannot help with that.", &buckets(), 8).unwrap_err();
        assert!(matches!(err, LLMError::ParseError(_)));
    }

    #[test]
    fn test_parse_tasks_not_array_is_no_tasks() {
        let err = parse_tasks(r#"{"tasks": "none"}"#, &buckets(), 8).unwrap_err();
        assert!(matches!(err, LLMError::NoTasks));
    }
}
