//! Domain models for caregiver-configured learning themes.

use serde::{Deserialize, Serialize};
use shared::LearningFrequency;
use std::collections::HashMap;

/// Prefix marking a theme key as a reference to a caregiver-created theme.
pub const CUSTOM_THEME_PREFIX: &str = "custom:";

/// Per-kid learning theme configuration, owned by the caregiver.
///
/// `active_themes` is an ordered list of theme keys; the order drives the
/// round-robin rotation, so it is preserved exactly as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningConfig {
    pub kid_profile_id: String,
    pub active_themes: Vec<String>,
    pub frequency: LearningFrequency,
    pub created_at: String,
    pub updated_at: String,
}

/// A caregiver-created theme, referenced from configs as `custom:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomTheme {
    pub id: String,
    /// Localized display names keyed by language code
    pub name: HashMap<String, String>,
    /// Optional free-text guidance handed to story generation
    pub story_guidance: Option<String>,
    pub created_at: String,
}

impl CustomTheme {
    /// The theme key under which this theme appears in `active_themes`
    pub fn theme_key(&self) -> String {
        format!("{}{}", CUSTOM_THEME_PREFIX, self.id)
    }
}

/// Extract the custom theme id from a theme key, if it references one.
pub fn custom_theme_id(theme_key: &str) -> Option<&str> {
    theme_key.strip_prefix(CUSTOM_THEME_PREFIX)
}

/// Curated catalog entry for a built-in learning theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeCatalogEntry {
    pub theme_key: String,
    /// Localized display labels keyed by language code
    pub labels: HashMap<String, String>,
}
