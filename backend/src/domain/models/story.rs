//! Domain model for generated story history.

use serde::{Deserialize, Serialize};

/// One row per generated story, append-only.
///
/// `learning_theme_applied` is set exactly when a learning theme was woven
/// into that story; the theme scheduler derives its round-robin position and
/// frequency gap from these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryHistoryRecord {
    pub id: String,
    pub kid_profile_id: String,
    /// RFC 3339 timestamp
    pub created_at: String,
    pub learning_theme_applied: Option<String>,
}

impl StoryHistoryRecord {
    /// Generate a story history record ID from the kid profile and timestamp
    pub fn generate_id(kid_profile_id: &str, epoch_millis: u64) -> String {
        format!("story::{}::{}", kid_profile_id, epoch_millis)
    }
}
