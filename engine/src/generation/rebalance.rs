//! Bucket rebalancing pass
//!
//! 1. optional heuristic relabel
//! 2. dedupe by lowercased trimmed text (first wins)
//! 3. fill each bucket up to `min_per_bucket` from the suggestion tables
//! 4. interleave buckets round-robin (Focus, Next, Later) up to `max_tasks`
//! 5. top up to `target_tasks` with more suggestions, round-robin
//! 6. renumber ids
//!
//! Suggestions that match already-seen text (case-insensitive) are skipped.
//! When a slot's tables run dry, numbered filler keeps the bucket minimum.

use std::collections::{HashSet, VecDeque};

use focus_sdk::{renumber, BucketSet, Slot, Task};

use super::heuristic;
use super::suggestions::suggestions_for;
use crate::config::GenerationConfig;

/// Bounds the top-up target is clamped to
const TARGET_RANGE: (usize, usize) = (6, 8);

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Numbered filler for a slot once its suggestion tables are used up.
fn spare_text(slot: Slot, n: usize) -> String {
    match slot {
        Slot::Focus => format!("Focus block {n}"),
        Slot::Next => format!("Follow-up task {n}"),
        Slot::Later => format!("Break idea {n}"),
    }
}

/// Next unseen suggestion for `slot`, falling back to numbered filler.
fn next_suggestion(
    pool: &mut impl Iterator<Item = &'static str>,
    slot: Slot,
    seen: &mut HashSet<String>,
    spare: &mut usize,
) -> String {
    let text = match pool.find(|s| !seen.contains(&normalize(s))) {
        Some(text) => text.to_string(),
        None => loop {
            *spare += 1;
            let text = spare_text(slot, *spare);
            if !seen.contains(&normalize(&text)) {
                tracing::debug!(%slot, "Suggestion table exhausted, using filler");
                break text;
            }
        },
    };
    seen.insert(normalize(&text));
    text
}

/// Rebalance a parsed task list for `goal`.
pub fn rebalance(
    tasks: Vec<Task>,
    goal: &str,
    buckets: &BucketSet,
    config: &GenerationConfig,
) -> Vec<Task> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut lanes: [Vec<Task>; 3] = Default::default();

    for mut task in tasks {
        let slot = if config.heuristic_override {
            heuristic::classify(&task.text, goal)
        } else {
            match buckets.slot_of(task.correct_bucket.as_str()) {
                Some(slot) => slot,
                None => continue,
            }
        };

        let key = normalize(&task.text);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }

        task.correct_bucket = buckets.bucket(slot);
        lanes[slot.index()].push(task);
    }

    let mut pools = Slot::ALL.map(|slot| suggestions_for(goal, slot));
    let mut spare = [0usize; 3];

    for slot in Slot::ALL {
        let i = slot.index();
        while lanes[i].len() < config.min_per_bucket {
            let text = next_suggestion(&mut pools[i], slot, &mut seen, &mut spare[i]);
            lanes[i].push(Task::new("", text, buckets.bucket(slot)));
        }
    }

    let mut queues = lanes.map(|lane| lane.into_iter().collect::<VecDeque<_>>());
    let mut out: Vec<Task> = Vec::with_capacity(config.max_tasks);
    while out.len() < config.max_tasks && queues.iter().any(|q| !q.is_empty()) {
        for queue in queues.iter_mut() {
            if out.len() >= config.max_tasks {
                break;
            }
            if let Some(task) = queue.pop_front() {
                out.push(task);
            }
        }
    }

    let target = config
        .target_tasks
        .clamp(TARGET_RANGE.0, TARGET_RANGE.1)
        .min(config.max_tasks);
    while out.len() < target {
        for slot in Slot::ALL {
            if out.len() >= target {
                break;
            }
            let i = slot.index();
            let text = next_suggestion(&mut pools[i], slot, &mut seen, &mut spare[i]);
            out.push(Task::new("", text, buckets.bucket(slot)));
        }
    }

    renumber(&mut out);
    out
}
