//! # Catalog Repository
//!
//! Read-only access to the curated theme and subtype catalogs. Catalogs are
//! reference data: the app ships built-in defaults, and a deployment can
//! override them by placing `catalog/themes.yaml` or `catalog/subtypes.yaml`
//! in the data directory.
//!
//! Catalog curation is the upstream boundary for the weight invariant:
//! entries with a non-positive weight are dropped here, with a warning, so
//! the selection code can assume strictly positive weights.

use anyhow::Result;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

use shared::{AgeGroup, ThemeCategory};

use super::connection::CsvConnection;
use crate::domain::models::learning::ThemeCatalogEntry;
use crate::domain::models::subtype::SubtypeCatalogEntry;
use crate::storage::traits::{SubtypeCatalogStorage, ThemeCatalogStorage};

const DEFAULT_THEMES: &str = include_str!("../../../resources/default_themes.yaml");
const DEFAULT_SUBTYPES: &str = include_str!("../../../resources/default_subtypes.yaml");

/// Catalog repository serving both the theme and the subtype catalog
#[derive(Clone)]
pub struct CatalogRepository {
    connection: CsvConnection,
}

impl CatalogRepository {
    /// Create a new catalog repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn catalog_path(&self, file_name: &str) -> PathBuf {
        self.connection.base_directory().join("catalog").join(file_name)
    }

    fn load_theme_entries(&self) -> Result<Vec<ThemeCatalogEntry>> {
        let path = self.catalog_path("themes.yaml");
        let yaml_content = if path.exists() {
            debug!("Loading theme catalog override from {:?}", path);
            fs::read_to_string(&path)?
        } else {
            DEFAULT_THEMES.to_string()
        };
        Ok(serde_yaml::from_str(&yaml_content)?)
    }

    fn load_subtype_entries(&self) -> Result<Vec<SubtypeCatalogEntry>> {
        let path = self.catalog_path("subtypes.yaml");
        let yaml_content = if path.exists() {
            debug!("Loading subtype catalog override from {:?}", path);
            fs::read_to_string(&path)?
        } else {
            DEFAULT_SUBTYPES.to_string()
        };
        let entries: Vec<SubtypeCatalogEntry> = serde_yaml::from_str(&yaml_content)?;

        let (valid, invalid): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| entry.weight > 0.0);
        for entry in &invalid {
            warn!(
                "Dropping subtype {} with non-positive weight {}",
                entry.subtype_key, entry.weight
            );
        }
        Ok(valid)
    }
}

impl ThemeCatalogStorage for CatalogRepository {
    fn get_theme_entry(&self, theme_key: &str) -> Result<Option<ThemeCatalogEntry>> {
        let entries = self.load_theme_entries()?;
        Ok(entries.into_iter().find(|entry| entry.theme_key == theme_key))
    }

    fn list_theme_entries(&self) -> Result<Vec<ThemeCatalogEntry>> {
        self.load_theme_entries()
    }
}

impl SubtypeCatalogStorage for CatalogRepository {
    fn list_subtypes(
        &self,
        category: ThemeCategory,
        age_group: AgeGroup,
    ) -> Result<Vec<SubtypeCatalogEntry>> {
        let entries = self.load_subtype_entries()?;
        Ok(entries
            .into_iter()
            .filter(|entry| {
                entry.is_active
                    && entry.theme_category == category
                    && entry.supports_age_group(age_group)
            })
            .collect())
    }
}
