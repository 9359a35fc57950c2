//! Prompt construction
//!
//! The system prompt fixes the coach persona, the bucket definitions and the
//! output rules. The user prompt carries the goal, the mix requirement,
//! few-shot examples and the JSON schema.

use focus_sdk::{BucketSet, Slot};

use crate::llm::Message;

/// System prompt with bucket definitions and formatting rules.
pub fn build_system_prompt(buckets: &BucketSet) -> String {
    let focus = buckets.label(Slot::Focus);
    let next = buckets.label(Slot::Next);
    let later = buckets.label(Slot::Later);

    [
        format!(
            "You are an expert ADHD productivity coach. Your job is to produce a clean, unambiguous and simple set of tasks split across three buckets: {focus}, {next}, and {later}."
        ),
        format!(
            "- {focus} = ONLY tiny, immediate next actions that take under 5-10 minutes and directly progress the stated goal. Must be executable right this second (e.g., \"Write the opening sentence\", \"List 3 subtopics\")."
        ),
        format!(
            "- {next} = tasks that are useful but not the exact micro-step toward the current goal. They are still related but involve prep, setup, or future steps (e.g., \"Schedule research session\", \"Gather reading materials\")."
        ),
        format!(
            "- {later} = distractions or unrelated activities that do not help the goal at all (e.g., \"Check Instagram\", \"Rearrange files\", \"Watch YouTube\")."
        ),
        format!(
            "Strict rules: If a task could fit both {focus} and {next}, classify it as {focus} only if it is a single, bite-sized action that directly moves the goal forward immediately. Otherwise, classify it as {next}. No vague, confusing, or overlapping tasks; write them as if for a child."
        ),
        "Keep text concise (4-12 words), imperative, and action-oriented. No explanations or extra fields. Respond ONLY with valid JSON in the schema.".to_string(),
    ]
    .join("\n")
}

/// User prompt embedding the goal and few-shot examples.
pub fn build_user_prompt(goal: &str, buckets: &BucketSet) -> String {
    let focus = buckets.label(Slot::Focus);
    let next = buckets.label(Slot::Next);
    let later = buckets.label(Slot::Later);

    [
        format!("Goal: {goal}"),
        format!(
            "Generate exactly 6-8 tasks with a balanced mix: at least 2 {focus}, 2 {next}, 2 {later}."
        ),
        "Examples:".to_string(),
        format!(
            "- {focus}: \"Draft opening sentence\", \"List 3 main points\", \"Jot down 5 references\", \"Open the document and write the title\"."
        ),
        format!(
            "- {next}: \"Schedule research time\", \"Review assignment outline\", \"Gather 3 articles\", \"Find 3 reference articles to read later\"."
        ),
        format!("- {later}: \"Check TikTok\", \"Sort old photos\", \"Read random news\"."),
        format!(
            "Return strict JSON of this shape: {{\"tasks\":[{{\"text\":\"...\",\"correctBucket\":\"{}\"}}]}}",
            buckets.schema_hint()
        ),
    ]
    .join("\n")
}

/// The two-message conversation sent to the model.
pub fn build_messages(goal: &str, buckets: &BucketSet) -> Vec<Message> {
    vec![
        Message::system(build_system_prompt(buckets)),
        Message::user(build_user_prompt(goal, buckets)),
    ]
}
