//! Local keyword/length classifier
//!
//! Optionally replaces the model's labels before rebalancing. Order of checks:
//! distraction keywords, then prep/planning keywords, then short imperative
//! micro-steps or overlap with the goal, then a length cut-off.

use focus_sdk::Slot;

const DISTRACTION_KEYWORDS: &[&str] = &[
    "instagram", "tiktok", "youtube", "netflix", "twitter", "facebook", "reddit", "social media",
    "scroll", "news", "game", "snack", "tidy", "organize", "reorganize", "rearrange", "sort old",
    "browse", "shopping", "chat",
];

const PREP_KEYWORDS: &[&str] = &[
    "schedule", "plan", "gather", "research", "review", "find", "book", "prepare", "set up",
    "download", "email", "buy", "ask", "read later", "later",
];

const MICRO_VERBS: &[&str] = &[
    "write", "draft", "list", "open", "jot", "outline", "answer", "start", "add", "pick", "summarize",
];

/// Word count at or below which an unmatched task counts as a micro-step.
const MICRO_MAX_WORDS: usize = 6;

/// Classify a task text for a goal.
pub fn classify(text: &str, goal: &str) -> Slot {
    let lower = text.to_lowercase();

    if DISTRACTION_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Slot::Later;
    }
    if PREP_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Slot::Next;
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    let starts_with_micro_verb = words
        .first()
        .is_some_and(|first| MICRO_VERBS.contains(first));
    if starts_with_micro_verb || shares_goal_word(&words, goal) {
        return Slot::Focus;
    }

    if words.len() <= MICRO_MAX_WORDS {
        Slot::Focus
    } else {
        Slot::Next
    }
}

/// Whether the text mentions a significant (4+ letter) word of the goal.
fn shares_goal_word(words: &[&str], goal: &str) -> bool {
    let goal = goal.to_lowercase();
    goal.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() >= 4)
        .any(|g| words.iter().any(|w| w.trim_matches(|c: char| !c.is_alphanumeric()) == g))
}
