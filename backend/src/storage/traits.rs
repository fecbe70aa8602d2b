//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! All operations are synchronous; the engine performs a small fixed number
//! of bounded reads per story request, so there is nothing to overlap.

use anyhow::Result;
use shared::{AgeGroup, ThemeCategory};

use crate::domain::models::learning::{CustomTheme, LearningConfig, ThemeCatalogEntry};
use crate::domain::models::story::StoryHistoryRecord;
use crate::domain::models::subtype::{SubtypeCatalogEntry, SubtypeHistoryRecord};

/// Trait defining the interface for learning config storage operations
pub trait LearningConfigStorage: Send + Sync {
    /// Retrieve the learning config for a specific kid profile
    fn get_learning_config(&self, kid_profile_id: &str) -> Result<Option<LearningConfig>>;

    /// Store (create or replace) the learning config for a kid profile
    fn store_learning_config(&self, config: &LearningConfig) -> Result<()>;
}

/// Trait defining the interface for custom theme storage operations
pub trait CustomThemeStorage: Send + Sync {
    /// Retrieve a custom theme by its id (the part after `custom:`)
    fn get_custom_theme(&self, id: &str) -> Result<Option<CustomTheme>>;

    /// Store (create or replace) a custom theme
    fn store_custom_theme(&self, theme: &CustomTheme) -> Result<()>;
}

/// Trait defining the interface for the built-in theme catalog
pub trait ThemeCatalogStorage: Send + Sync {
    /// Retrieve a catalog theme by key
    fn get_theme_entry(&self, theme_key: &str) -> Result<Option<ThemeCatalogEntry>>;

    /// List all catalog themes
    fn list_theme_entries(&self) -> Result<Vec<ThemeCatalogEntry>>;
}

/// Trait defining the interface for the subtype catalog
pub trait SubtypeCatalogStorage: Send + Sync {
    /// List active catalog entries for a category that are written for the
    /// given age group
    fn list_subtypes(
        &self,
        category: ThemeCategory,
        age_group: AgeGroup,
    ) -> Result<Vec<SubtypeCatalogEntry>>;
}

/// Trait defining the interface for story history storage operations
pub trait StoryHistoryStorage: Send + Sync {
    /// Append a story record (append-only log, one row per generated story)
    fn append_story(&self, record: &StoryHistoryRecord) -> Result<()>;

    /// Most recent story for this kid that had a learning theme applied
    fn latest_themed_story(&self, kid_profile_id: &str) -> Result<Option<StoryHistoryRecord>>;

    /// Count stories without a theme created strictly after the given
    /// RFC 3339 timestamp; `None` counts all unthemed stories
    fn count_unthemed_since(&self, kid_profile_id: &str, after: Option<&str>) -> Result<u32>;
}

/// Trait defining the interface for subtype usage history operations
pub trait SubtypeHistoryStorage: Send + Sync {
    /// Append a usage record (append-only log, one row per story that used
    /// a subtype)
    fn append_usage(&self, record: &SubtypeHistoryRecord) -> Result<()>;

    /// Up to `limit` most recent usage records for a kid profile and
    /// category, most recent first
    fn recent_usage(
        &self,
        kid_profile_id: &str,
        category: ThemeCategory,
        limit: usize,
    ) -> Result<Vec<SubtypeHistoryRecord>>;
}
