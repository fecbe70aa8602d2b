/// Test utilities for consistent storage-backed test setups.
///
/// RAII-based cleanup via `tempfile`: the temp directory lives as long as
/// the environment and is removed even when a test panics.
use anyhow::Result;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

use shared::{AgeGroup, LearningFrequency, ThemeCategory};

use super::catalog::CatalogRepository;
use super::connection::CsvConnection;
use super::custom_theme_repository::CustomThemeRepository;
use super::learning_config_repository::LearningConfigRepository;
use super::story_history_repository::StoryHistoryRepository;
use super::subtype_history_repository::SubtypeHistoryRepository;
use crate::domain::models::learning::{CustomTheme, LearningConfig, ThemeCatalogEntry};
use crate::domain::models::story::StoryHistoryRecord;
use crate::domain::models::subtype::{SubtypeCatalogEntry, SubtypeHistoryRecord};
use crate::domain::subtype_selector::SubtypeSelector;
use crate::domain::theme_scheduler::ThemeScheduler;
use crate::storage::traits::{
    CustomThemeStorage, LearningConfigStorage, StoryHistoryStorage, SubtypeHistoryStorage,
};

/// Temporary data directory plus a connection into it, cleaned up on drop
pub struct TestEnvironment {
    pub connection: CsvConnection,
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// Repository and service instances over a fresh test environment
pub struct TestHelper {
    pub env: TestEnvironment,
    pub learning_config_repo: LearningConfigRepository,
    pub custom_theme_repo: CustomThemeRepository,
    pub catalog_repo: CatalogRepository,
    pub story_history_repo: StoryHistoryRepository,
    pub subtype_history_repo: SubtypeHistoryRepository,
}

impl TestHelper {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        let learning_config_repo = LearningConfigRepository::new(env.connection.clone());
        let custom_theme_repo = CustomThemeRepository::new(env.connection.clone());
        let catalog_repo = CatalogRepository::new(env.connection.clone());
        let story_history_repo = StoryHistoryRepository::new(env.connection.clone());
        let subtype_history_repo = SubtypeHistoryRepository::new(env.connection.clone());

        Ok(Self {
            env,
            learning_config_repo,
            custom_theme_repo,
            catalog_repo,
            story_history_repo,
            subtype_history_repo,
        })
    }

    /// Theme scheduler wired against this environment's repositories
    pub fn theme_scheduler(&self) -> ThemeScheduler {
        ThemeScheduler::new(
            Arc::new(self.learning_config_repo.clone()),
            Arc::new(self.story_history_repo.clone()),
            Arc::new(self.catalog_repo.clone()),
            Arc::new(self.custom_theme_repo.clone()),
        )
    }

    /// Subtype selector wired against this environment's repositories
    pub fn subtype_selector(&self) -> SubtypeSelector {
        SubtypeSelector::new(
            Arc::new(self.catalog_repo.clone()),
            Arc::new(self.subtype_history_repo.clone()),
        )
    }

    /// Store a learning config with the given themes and frequency
    pub fn store_learning_config(
        &self,
        kid_profile_id: &str,
        active_themes: &[&str],
        frequency: LearningFrequency,
    ) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.learning_config_repo.store_learning_config(&LearningConfig {
            kid_profile_id: kid_profile_id.to_string(),
            active_themes: active_themes.iter().map(|t| t.to_string()).collect(),
            frequency,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Append a story record `minutes_ago` minutes in the past
    pub fn seed_story(
        &self,
        kid_profile_id: &str,
        minutes_ago: i64,
        theme: Option<&str>,
    ) -> Result<()> {
        let created_at = (Utc::now() - Duration::minutes(minutes_ago)).to_rfc3339();
        self.story_history_repo.append_story(&StoryHistoryRecord {
            id: format!("story::{}::{}", kid_profile_id, minutes_ago),
            kid_profile_id: kid_profile_id.to_string(),
            created_at,
            learning_theme_applied: theme.map(str::to_string),
        })
    }

    /// Append a subtype usage record `minutes_ago` minutes in the past
    pub fn seed_subtype_usage(
        &self,
        kid_profile_id: &str,
        category: ThemeCategory,
        subtype_key: &str,
        minutes_ago: i64,
    ) -> Result<()> {
        let created_at = (Utc::now() - Duration::minutes(minutes_ago)).to_rfc3339();
        self.subtype_history_repo.append_usage(&SubtypeHistoryRecord {
            kid_profile_id: kid_profile_id.to_string(),
            theme_category: category,
            subtype_key: subtype_key.to_string(),
            story_id: None,
            created_at,
        })
    }

    /// Replace the subtype catalog with the given entries
    pub fn write_subtype_catalog(&self, entries: &[SubtypeCatalogEntry]) -> Result<()> {
        let catalog_dir = self.env.base_path.join("catalog");
        std::fs::create_dir_all(&catalog_dir)?;
        let yaml_content = serde_yaml::to_string(entries)?;
        std::fs::write(catalog_dir.join("subtypes.yaml"), yaml_content)?;
        Ok(())
    }

    /// Replace the theme catalog with the given entries
    pub fn write_theme_catalog(&self, entries: &[ThemeCatalogEntry]) -> Result<()> {
        let catalog_dir = self.env.base_path.join("catalog");
        std::fs::create_dir_all(&catalog_dir)?;
        let yaml_content = serde_yaml::to_string(entries)?;
        std::fs::write(catalog_dir.join("themes.yaml"), yaml_content)?;
        Ok(())
    }

    /// Store a custom theme with an English name
    pub fn store_custom_theme(
        &self,
        id: &str,
        names: &[(&str, &str)],
        story_guidance: Option<&str>,
    ) -> Result<()> {
        let mut name = HashMap::new();
        for (lang, text) in names {
            name.insert(lang.to_string(), text.to_string());
        }
        self.custom_theme_repo.store_custom_theme(&CustomTheme {
            id: id.to_string(),
            name,
            story_guidance: story_guidance.map(str::to_string),
            created_at: Utc::now().to_rfc3339(),
        })
    }
}

/// Catalog entry builder with sensible test defaults
pub fn subtype_entry(
    subtype_key: &str,
    category: ThemeCategory,
    age_groups: &[AgeGroup],
    weight: f64,
) -> SubtypeCatalogEntry {
    let mut labels = HashMap::new();
    labels.insert("en".to_string(), format!("{} (en)", subtype_key));
    SubtypeCatalogEntry {
        subtype_key: subtype_key.to_string(),
        theme_category: category,
        labels,
        prompt_hint: format!("hint for {}", subtype_key),
        title_seeds: vec![format!("{} title", subtype_key)],
        setting_ideas: vec![format!("{} setting", subtype_key)],
        age_groups: age_groups.to_vec(),
        weight,
        is_active: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_cleans_up_on_drop() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
        }
        assert!(!base_path.exists());
        Ok(())
    }

    #[test]
    fn helper_seeds_are_readable() -> Result<()> {
        let helper = TestHelper::new()?;
        helper.seed_story("kid::1", 10, None)?;
        helper.seed_subtype_usage("kid::1", ThemeCategory::Surprise, "mystery_box", 5)?;

        assert_eq!(
            helper.story_history_repo.count_unthemed_since("kid::1", None)?,
            1
        );
        assert_eq!(
            helper
                .subtype_history_repo
                .recent_usage("kid::1", ThemeCategory::Surprise, 5)?
                .len(),
            1
        );
        Ok(())
    }
}
