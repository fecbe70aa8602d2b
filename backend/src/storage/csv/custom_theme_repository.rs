//! # Custom Theme Repository
//!
//! File-based storage for caregiver-created themes, kept in a single
//! `custom_themes.yaml` at the root of the data directory (custom themes
//! are shared across the caregiver's kid profiles).
//!
//! ## YAML Format
//!
//! ```yaml
//! - id: "abc123"
//!   name:
//!     en: "Patience"
//!     de: "Geduld"
//!   story_guidance: "Show waiting paying off"
//!   created_at: "2025-06-01T10:00:00Z"
//! ```

use anyhow::Result;
use log::debug;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::models::learning::CustomTheme;
use crate::storage::traits::CustomThemeStorage;

/// YAML-based custom theme repository
#[derive(Clone)]
pub struct CustomThemeRepository {
    connection: CsvConnection,
}

impl CustomThemeRepository {
    /// Create a new custom theme repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn themes_path(&self) -> PathBuf {
        self.connection.base_directory().join("custom_themes.yaml")
    }

    fn load_themes(&self) -> Result<Vec<CustomTheme>> {
        let path = self.themes_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let yaml_content = std::fs::read_to_string(&path)?;
        let themes: Vec<CustomTheme> = serde_yaml::from_str(&yaml_content)?;
        Ok(themes)
    }

    fn save_themes(&self, themes: &[CustomTheme]) -> Result<()> {
        let path = self.themes_path();
        let yaml_content = serde_yaml::to_string(themes)?;

        // Atomic write: temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, yaml_content)?;
        std::fs::rename(&temp_path, &path)?;

        debug!("Saved {} custom themes to {:?}", themes.len(), path);
        Ok(())
    }
}

impl CustomThemeStorage for CustomThemeRepository {
    fn get_custom_theme(&self, id: &str) -> Result<Option<CustomTheme>> {
        let themes = self.load_themes()?;
        Ok(themes.into_iter().find(|theme| theme.id == id))
    }

    fn store_custom_theme(&self, theme: &CustomTheme) -> Result<()> {
        let mut themes = self.load_themes()?;
        match themes.iter_mut().find(|existing| existing.id == theme.id) {
            Some(existing) => *existing = theme.clone(),
            None => themes.push(theme.clone()),
        }
        self.save_themes(&themes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn setup() -> (CustomThemeRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = CsvConnection::new(temp_dir.path()).expect("Failed to create connection");
        (CustomThemeRepository::new(connection), temp_dir)
    }

    fn theme(id: &str, en_name: &str) -> CustomTheme {
        let mut name = HashMap::new();
        name.insert("en".to_string(), en_name.to_string());
        CustomTheme {
            id: id.to_string(),
            name,
            story_guidance: Some("Show waiting paying off".to_string()),
            created_at: "2025-06-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn missing_theme_yields_none() {
        let (repo, _temp_dir) = setup();
        assert!(repo.get_custom_theme("nope").unwrap().is_none());
    }

    #[test]
    fn theme_round_trips() {
        let (repo, _temp_dir) = setup();
        let theme = theme("abc123", "Patience");
        repo.store_custom_theme(&theme).unwrap();

        let loaded = repo.get_custom_theme("abc123").unwrap().unwrap();
        assert_eq!(loaded, theme);
    }

    #[test]
    fn store_upserts_by_id() {
        let (repo, _temp_dir) = setup();
        repo.store_custom_theme(&theme("abc123", "Patience")).unwrap();
        repo.store_custom_theme(&theme("def456", "Kindness")).unwrap();

        let updated = theme("abc123", "Patience v2");
        repo.store_custom_theme(&updated).unwrap();

        let loaded = repo.get_custom_theme("abc123").unwrap().unwrap();
        assert_eq!(loaded.name.get("en").unwrap(), "Patience v2");
        assert!(repo.get_custom_theme("def456").unwrap().is_some());
    }
}
