//! Static per-goal suggestion tables
//!
//! Used by the rebalancing pass to fill under-populated buckets. A goal is
//! matched to a table by keyword; the generic table always backs it up.

use focus_sdk::Slot;

/// Suggestions for one kind of goal, indexed by slot.
#[derive(Debug)]
pub struct SuggestionTable {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub focus: &'static [&'static str],
    pub next: &'static [&'static str],
    pub later: &'static [&'static str],
}

impl SuggestionTable {
    pub fn for_slot(&self, slot: Slot) -> &'static [&'static str] {
        match slot {
            Slot::Focus => self.focus,
            Slot::Next => self.next,
            Slot::Later => self.later,
        }
    }

    fn matches(&self, goal: &str) -> bool {
        self.keywords.iter().any(|k| goal.contains(k))
    }
}

pub static WRITING: SuggestionTable = SuggestionTable {
    name: "writing",
    keywords: &["essay", "assignment", "report", "paper", "thesis", "article", "write", "homework"],
    focus: &[
        "Write the opening sentence",
        "List 3 main points",
        "Open the document and write the title",
        "Jot down one key argument",
    ],
    next: &[
        "Schedule research time",
        "Review assignment outline",
        "Find 3 reference articles to read later",
        "Book a study room for tomorrow",
    ],
    later: &[
        "Check TikTok",
        "Sort old photos",
        "Read random news",
        "Reorganize desktop icons",
    ],
};

pub static CODING: SuggestionTable = SuggestionTable {
    name: "coding",
    keywords: &["code", "bug", "program", "deploy", "feature", "refactor", "website"],
    focus: &[
        "Open the failing file",
        "Write one failing test",
        "Add a log line near the bug",
        "Rename one unclear variable",
    ],
    next: &[
        "Plan tomorrow's refactor",
        "Read the framework changelog",
        "Set up the staging environment",
        "Draft notes for code review",
    ],
    later: &[
        "Customize editor theme",
        "Browse tech Twitter",
        "Watch a conference talk",
        "Clean up old branches",
    ],
};

pub static STUDY: SuggestionTable = SuggestionTable {
    name: "study",
    keywords: &["study", "exam", "learn", "revise", "quiz", "course", "lecture"],
    focus: &[
        "Read one page of notes",
        "Answer one practice question",
        "Write 3 flashcards",
        "Summarize one concept in a sentence",
    ],
    next: &[
        "Make a weekly revision plan",
        "Download past exam papers",
        "Email the tutor a question",
        "Gather lecture slides",
    ],
    later: &[
        "Scroll Instagram",
        "Rearrange the bookshelf",
        "Watch YouTube videos",
        "Play a mobile game",
    ],
};

pub static CHORES: SuggestionTable = SuggestionTable {
    name: "chores",
    keywords: &["clean", "tidy", "laundry", "dishes", "room", "house", "groceries"],
    focus: &[
        "Pick up five items from the floor",
        "Start one load of laundry",
        "Clear the kitchen counter",
        "Wipe the table",
    ],
    next: &[
        "Write a grocery list",
        "Schedule a deep clean for Saturday",
        "Buy storage boxes",
        "Plan which room comes next",
    ],
    later: &[
        "Watch a home makeover show",
        "Browse furniture online",
        "Scroll social media",
        "Call a friend to chat",
    ],
};

pub static GENERIC: SuggestionTable = SuggestionTable {
    name: "generic",
    keywords: &[],
    focus: &[
        "Write down the very first step",
        "Set a 5 minute timer and start",
        "Open the thing you need",
        "Do the smallest piece now",
    ],
    next: &[
        "Schedule focused work block",
        "Gather 2 reference materials",
        "Plan the next session",
        "Ask someone for feedback later",
    ],
    later: &[
        "Check Instagram feed",
        "Tidy random folders",
        "Browse unrelated news",
        "Watch YouTube",
    ],
};

static TABLES: [&SuggestionTable; 4] = [&WRITING, &CODING, &STUDY, &CHORES];

/// Pick the suggestion table for a goal (case-insensitive keyword match).
pub fn table_for_goal(goal: &str) -> &'static SuggestionTable {
    let goal = goal.to_lowercase();
    TABLES
        .iter()
        .copied()
        .find(|table| table.matches(&goal))
        .unwrap_or(&GENERIC)
}

/// Suggestions for a slot: the goal's table first, then the generic table.
pub fn suggestions_for(goal: &str, slot: Slot) -> impl Iterator<Item = &'static str> {
    let table = table_for_goal(goal);
    let generic: &'static [&'static str] = if std::ptr::eq(table, &GENERIC) {
        &[]
    } else {
        GENERIC.for_slot(slot)
    };
    table
        .for_slot(slot)
        .iter()
        .chain(generic.iter())
        .copied()
}
