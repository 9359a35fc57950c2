//! Deterministic starter list used when live generation is off or fails.

use focus_sdk::{task_id, BucketSet, Slot, Task};

/// Template text and slot for each fallback task. `{goal}` is substituted.
const FALLBACK_TEMPLATE: [(&str, Slot); 7] = [
    ("List 3 micro steps for {goal}", Slot::Focus),
    ("Draft one opening line for {goal}", Slot::Focus),
    ("Schedule focused work block", Slot::Next),
    ("Gather 2 reference materials", Slot::Next),
    ("Check Instagram feed", Slot::Later),
    ("Tidy random folders", Slot::Later),
    ("Browse unrelated news", Slot::Later),
];

/// The fixed goal-templated task list, ids `t1..t7`.
pub fn fallback_tasks(goal: &str, buckets: &BucketSet) -> Vec<Task> {
    let goal = goal.trim();
    FALLBACK_TEMPLATE
        .iter()
        .enumerate()
        .map(|(i, (template, slot))| {
            Task::new(task_id(i), template.replace("{goal}", goal), buckets.bucket(*slot))
        })
        .collect()
}
