//! Domain models for story subtypes and their usage history.

use serde::{Deserialize, Serialize};
use shared::{AgeGroup, ThemeCategory};
use std::collections::HashMap;

use crate::domain::selection::Weighted;

/// Curated catalog entry for a narrative subtype.
///
/// Reference data, externally curated; `weight` is strictly positive by
/// curation contract and entries with non-positive weights are dropped at
/// the catalog boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtypeCatalogEntry {
    /// Unique within its category
    pub subtype_key: String,
    pub theme_category: ThemeCategory,
    /// Localized display labels keyed by language code
    pub labels: HashMap<String, String>,
    /// Hint passed through to prompt construction
    pub prompt_hint: String,
    pub title_seeds: Vec<String>,
    pub setting_ideas: Vec<String>,
    /// Age brackets this subtype is written for
    pub age_groups: Vec<AgeGroup>,
    pub weight: f64,
    pub is_active: bool,
}

impl SubtypeCatalogEntry {
    pub fn supports_age_group(&self, age_group: AgeGroup) -> bool {
        self.age_groups.contains(&age_group)
    }
}

impl Weighted for SubtypeCatalogEntry {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// One row per story that used a subtype, append-only.
///
/// Read back for recency exclusion, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtypeHistoryRecord {
    pub kid_profile_id: String,
    pub theme_category: ThemeCategory,
    pub subtype_key: String,
    pub story_id: Option<String>,
    /// RFC 3339 timestamp
    pub created_at: String,
}
