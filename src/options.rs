use serde::{Deserialize, Serialize};

use crate::dom::{Document, Platform, TextMetrics};
use crate::runtime::{DEFAULT_TURN_LIMIT, EventLoop};

pub const DEFAULT_ID_PREFIX: &str = "field";

/// Environment a text field runs in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextFieldOptions {
    /// Headless platforms report no focus and no text direction.
    pub platform: Platform,
    /// Prefix of generated ids, `<prefix>-<n>`.
    pub id_prefix: String,
    /// Pixels per display column when measuring label text.
    pub char_width: f64,
    /// Upper bound on tasks run by one `run_until_idle`.
    pub turn_limit: usize,
}

impl Default for TextFieldOptions {
    fn default() -> Self {
        Self {
            platform: Platform::Interactive,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            char_width: TextMetrics::default().char_width,
            turn_limit: DEFAULT_TURN_LIMIT,
        }
    }
}

impl TextFieldOptions {
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    pub fn with_char_width(mut self, char_width: f64) -> Self {
        self.char_width = char_width;
        self
    }

    pub fn with_turn_limit(mut self, turn_limit: usize) -> Self {
        self.turn_limit = turn_limit;
        self
    }

    pub fn id_prefix(&self) -> &str {
        if self.id_prefix.is_empty() {
            DEFAULT_ID_PREFIX
        } else {
            &self.id_prefix
        }
    }

    /// A fresh document with its own event loop.
    pub fn document(&self) -> Document {
        Document::with_environment(
            EventLoop::with_turn_limit(self.turn_limit),
            self.platform,
            TextMetrics {
                char_width: self.char_width,
            },
        )
    }
}
