//! Recent score history.

use serde_json::Value;

use super::{Result, Storage};
use focus_sdk::EngineError;

/// Storage key for the score list
pub const SCORE_HISTORY_KEY: &str = "focusbear-score-history";

/// Number of scores kept
pub const SCORE_HISTORY_LIMIT: usize = 5;

/// Most-recent-first list of the last five scores.
pub struct ScoreHistory<'a, S: Storage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: Storage + ?Sized> ScoreHistory<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Stored scores, most recent first. Unreadable data reads as empty.
    pub fn list(&self) -> Vec<u8> {
        let raw = match self.storage.get(SCORE_HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read score history");
                return Vec::new();
            }
        };

        let Ok(Value::Array(items)) = serde_json::from_str::<Value>(&raw) else {
            tracing::debug!("Score history is not a JSON array, ignoring");
            return Vec::new();
        };

        items
            .iter()
            .filter_map(Value::as_f64)
            .filter(|s| (0.0..=100.0).contains(s))
            .map(|s| s.round() as u8)
            .take(SCORE_HISTORY_LIMIT)
            .collect()
    }

    /// Prepend a score and keep the five most recent. Returns the new list.
    pub fn save(&self, score: u8) -> Result<Vec<u8>> {
        let mut scores = self.list();
        scores.insert(0, score.min(100));
        scores.truncate(SCORE_HISTORY_LIMIT);

        let raw = serde_json::to_string(&scores)
            .map_err(|e| EngineError::Storage(format!("Failed to serialize scores: {}", e)))?;
        self.storage.set(SCORE_HISTORY_KEY, &raw)?;
        Ok(scores)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(SCORE_HISTORY_KEY)
    }
}
