//! # Storytime Backend
//!
//! Content-rotation engine for the Storytime story generator: decides which
//! narrative subtype the next story uses and whether a learning theme is
//! due, based on a kid profile's history and the caregiver's configuration.
//!
//! The decision logic lives in `domain`; `storage` provides the repository
//! abstraction plus the file-based implementation used by the desktop app.
//! Both services are best-effort: they return `None` rather than fail, so
//! story generation never blocks on rotation bookkeeping.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::csv::CsvConnection;

use storage::csv::{
    CatalogRepository, CustomThemeRepository, LearningConfigRepository, StoryHistoryRepository,
    SubtypeHistoryRepository,
};

/// Main backend struct wiring the rotation services over a data directory
pub struct Backend {
    pub theme_scheduler: domain::ThemeScheduler,
    pub subtype_selector: domain::SubtypeSelector,
}

impl Backend {
    /// Create a backend over the given data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        let connection = CsvConnection::new(data_dir)?;
        Ok(Self::with_connection(connection))
    }

    /// Create a backend over an existing connection
    pub fn with_connection(connection: CsvConnection) -> Self {
        let learning_config_repo = Arc::new(LearningConfigRepository::new(connection.clone()));
        let custom_theme_repo = Arc::new(CustomThemeRepository::new(connection.clone()));
        let catalog_repo = Arc::new(CatalogRepository::new(connection.clone()));
        let story_history_repo = Arc::new(StoryHistoryRepository::new(connection.clone()));
        let subtype_history_repo = Arc::new(SubtypeHistoryRepository::new(connection));

        let theme_scheduler = domain::ThemeScheduler::new(
            learning_config_repo,
            story_history_repo,
            catalog_repo.clone(),
            custom_theme_repo,
        );
        let subtype_selector = domain::SubtypeSelector::new(catalog_repo, subtype_history_repo);

        Self {
            theme_scheduler,
            subtype_selector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::subtypes::SubtypeQuery;
    use crate::domain::commands::themes::ThemeDecisionQuery;
    use tempfile::TempDir;

    #[test]
    fn backend_wires_services_over_a_fresh_directory() {
        let temp_dir = TempDir::new().unwrap();
        let backend = Backend::new(temp_dir.path()).unwrap();

        // No config: no theme, cheaply
        let theme = backend.theme_scheduler.decide(ThemeDecisionQuery {
            kid_profile_id: "kid::1".to_string(),
            story_language: "en".to_string(),
        });
        assert!(theme.is_none());

        // Built-in catalog: a subtype is always available
        let subtype = backend.subtype_selector.select(SubtypeQuery {
            theme: "magic".to_string(),
            kid_profile_id: Some("kid::1".to_string()),
            age: 7,
            language: "en".to_string(),
        });
        assert!(subtype.is_some());
    }
}
