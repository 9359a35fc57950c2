//! Task and bucket types
//!
//! A [`Task`] carries its ground-truth [`Bucket`] label. Bucket labels are
//! configuration: a [`BucketSet`] holds the three labels in positional order
//! and maps each one to a [`Slot`] that the generation code reasons about.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positional meaning of a bucket, independent of its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Tiny immediate action that moves the goal forward right now
    Focus,
    /// Related preparation or a future step
    Next,
    /// Distraction or unrelated activity
    Later,
}

impl Slot {
    /// All slots in round-robin order.
    pub const ALL: [Slot; 3] = [Slot::Focus, Slot::Next, Slot::Later];

    /// Position of the slot inside a [`BucketSet`].
    pub fn index(self) -> usize {
        match self {
            Slot::Focus => 0,
            Slot::Next => 1,
            Slot::Later => 2,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Focus => write!(f, "focus"),
            Slot::Next => write!(f, "next"),
            Slot::Later => write!(f, "later"),
        }
    }
}

/// A bucket label as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bucket(String);

impl Bucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Bucket {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// The closed three-label bucket enumeration currently in use.
///
/// Labels are compared exactly, the same way the model is told to emit them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSet {
    labels: [String; 3],
}

impl BucketSet {
    /// Create a bucket set from labels in Focus, Next, Later order.
    pub fn new(focus: impl Into<String>, next: impl Into<String>, later: impl Into<String>) -> Self {
        Self {
            labels: [focus.into(), next.into(), later.into()],
        }
    }

    /// The "Current Goal" / "Next Task" / "After Work" labels.
    pub fn current() -> Self {
        Self::new("Current Goal", "Next Task", "After Work")
    }

    /// The earlier "Now" / "Later" / "Never" labels.
    pub fn legacy() -> Self {
        Self::new("Now", "Later", "Never")
    }

    /// Labels in slot order.
    pub fn labels(&self) -> &[String; 3] {
        &self.labels
    }

    /// Bucket for a slot.
    pub fn bucket(&self, slot: Slot) -> Bucket {
        Bucket::new(self.labels[slot.index()].clone())
    }

    /// Label for a slot.
    pub fn label(&self, slot: Slot) -> &str {
        &self.labels[slot.index()]
    }

    /// Slot of a label, if the label belongs to this set.
    pub fn slot_of(&self, label: &str) -> Option<Slot> {
        Slot::ALL
            .into_iter()
            .find(|slot| self.labels[slot.index()] == label)
    }

    /// Parse a label into a bucket of this set.
    pub fn parse(&self, label: &str) -> Option<Bucket> {
        self.slot_of(label).map(|slot| self.bucket(slot))
    }

    pub fn contains(&self, bucket: &Bucket) -> bool {
        self.slot_of(bucket.as_str()).is_some()
    }

    /// Labels joined with `|`, as used in the JSON schema hint.
    pub fn schema_hint(&self) -> String {
        self.labels.join("|")
    }
}

impl Default for BucketSet {
    fn default() -> Self {
        Self::current()
    }
}

/// A short actionable item with a ground-truth bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub correct_bucket: Bucket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorted_bucket: Option<Bucket>,
}

impl Task {
    /// Create an unsorted task.
    pub fn new(id: impl Into<String>, text: impl Into<String>, correct_bucket: Bucket) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            correct_bucket,
            sorted_bucket: None,
        }
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted_bucket.is_some()
    }
}

/// Id for the task at zero-based `index`.
pub fn task_id(index: usize) -> String {
    format!("t{}", index + 1)
}

/// Re-number task ids sequentially starting at `t1`.
pub fn renumber(tasks: &mut [Task]) {
    for (i, task) in tasks.iter_mut().enumerate() {
        task.id = task_id(i);
    }
}
