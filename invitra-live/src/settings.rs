//! Runtime settings for the preview synchronizer and the generation channel.
//!
//! Everything has a `Default` so the simulate bin and tests can run without a
//! config file; a YAML file overrides individual fields.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::channel::CHANNEL_CEILING;
use crate::error::{LiveError, LiveResult};

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preview: SyncSettings,
    pub channel: ChannelSettings,
}

impl Settings {
    pub fn from_yaml(text: &str) -> LiveResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> LiveResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LiveError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml(&text)
    }
}

/// Debounce windows for the two editing surfaces. The step-by-step form uses
/// the shorter window; the edit-mode page (bigger documents, heavier rerenders)
/// uses the longer one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SyncSettings {
    pub debounce_ms: u64,
    pub edit_mode_debounce_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            debounce_ms: 400,
            edit_mode_debounce_ms: 500,
        }
    }
}

impl SyncSettings {
    pub fn form_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn edit_window(&self) -> Duration {
        Duration::from_millis(self.edit_mode_debounce_ms)
    }
}

/// Bounds for a generation progress channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChannelSettings {
    /// Hard ceiling on how long a channel may stream, in seconds.
    pub ceiling_secs: u64,
    /// Broadcast buffer per generation id.
    pub buffer: usize,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        ChannelSettings {
            ceiling_secs: CHANNEL_CEILING.as_secs(),
            buffer: 64,
        }
    }
}

impl ChannelSettings {
    pub fn ceiling(&self) -> Duration {
        Duration::from_secs(self.ceiling_secs)
    }
}
