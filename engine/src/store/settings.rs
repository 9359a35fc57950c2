//! Sound and haptics settings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Result, Storage};
use focus_sdk::EngineError;

/// Storage key for the settings object
pub const SOUND_SETTINGS_KEY: &str = "focusbear-sound-settings";

/// Default effect volume
pub const DEFAULT_VOLUME: f64 = 0.06;

/// Drop feedback sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Chime,
    Pop,
}

impl SoundType {
    pub const ALL: [SoundType; 6] = [
        SoundType::Sine,
        SoundType::Square,
        SoundType::Triangle,
        SoundType::Sawtooth,
        SoundType::Chime,
        SoundType::Pop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundType::Sine => "sine",
            SoundType::Square => "square",
            SoundType::Triangle => "triangle",
            SoundType::Sawtooth => "sawtooth",
            SoundType::Chime => "chime",
            SoundType::Pop => "pop",
        }
    }
}

impl fmt::Display for SoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(SoundType::as_str).collect();
                format!("Unknown sound type '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

fn default_vibrate() -> bool {
    true
}

/// Persisted feedback settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSettings {
    #[serde(rename = "type", default)]
    pub sound_type: SoundType,

    #[serde(default = "default_volume")]
    pub volume: f64,

    #[serde(default = "default_vibrate")]
    pub vibrate: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            sound_type: SoundType::default(),
            volume: DEFAULT_VOLUME,
            vibrate: true,
        }
    }
}

impl SoundSettings {
    /// Volume clamped to `0..=1`; non-finite volume resets to the default.
    pub fn normalized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            DEFAULT_VOLUME
        };
        self
    }

    /// Load settings. Missing or corrupt data reads as defaults.
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match storage.get(SOUND_SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<SoundSettings>(&raw)
                .map(SoundSettings::normalized)
                .unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Ignoring corrupt sound settings");
                    SoundSettings::default()
                }),
            Ok(None) => SoundSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read sound settings");
                SoundSettings::default()
            }
        }
    }

    /// Normalize and persist.
    pub fn save<S: Storage + ?Sized>(&self, storage: &S) -> Result<SoundSettings> {
        let settings = self.clone().normalized();
        let raw = serde_json::to_string(&settings)
            .map_err(|e| EngineError::Storage(format!("Failed to serialize settings: {}", e)))?;
        storage.set(SOUND_SETTINGS_KEY, &raw)?;
        Ok(settings)
    }
}
