//! # Learning Config Repository
//!
//! File-based learning config storage using one YAML file per kid profile,
//! stored at `{kid_directory}/learning_config.yaml`.
//!
//! ## YAML Format
//!
//! ```yaml
//! kid_profile_id: "kid::1234"
//! active_themes:
//!   - "animals"
//!   - "custom:abc123"
//! frequency: "regular"
//! created_at: "2025-06-01T10:00:00Z"
//! updated_at: "2025-06-03T08:12:00Z"
//! ```
//!
//! An unrecognized frequency value degrades to `regular` rather than
//! failing the load; caregivers on older app versions keep working.

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use shared::LearningFrequency;

use super::connection::CsvConnection;
use crate::domain::models::learning::LearningConfig;
use crate::storage::traits::LearningConfigStorage;

/// YAML record structure for learning configs
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LearningConfigRecord {
    kid_profile_id: String,
    active_themes: Vec<String>,
    frequency: String,
    created_at: String,
    updated_at: String,
}

impl From<&LearningConfig> for LearningConfigRecord {
    fn from(config: &LearningConfig) -> Self {
        LearningConfigRecord {
            kid_profile_id: config.kid_profile_id.clone(),
            active_themes: config.active_themes.clone(),
            frequency: config.frequency.to_string(),
            created_at: config.created_at.clone(),
            updated_at: config.updated_at.clone(),
        }
    }
}

impl LearningConfigRecord {
    fn into_domain(self) -> LearningConfig {
        let frequency = LearningFrequency::from_string(&self.frequency).unwrap_or_else(|e| {
            warn!("{}, falling back to regular", e);
            LearningFrequency::Regular
        });
        LearningConfig {
            kid_profile_id: self.kid_profile_id,
            active_themes: self.active_themes,
            frequency,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// YAML-based learning config repository using per-kid files
#[derive(Clone)]
pub struct LearningConfigRepository {
    connection: CsvConnection,
}

impl LearningConfigRepository {
    /// Create a new learning config repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn config_path(&self, kid_profile_id: &str) -> PathBuf {
        self.connection
            .kid_directory(kid_profile_id)
            .join("learning_config.yaml")
    }
}

impl LearningConfigStorage for LearningConfigRepository {
    fn get_learning_config(&self, kid_profile_id: &str) -> Result<Option<LearningConfig>> {
        let path = self.config_path(kid_profile_id);
        if !path.exists() {
            debug!("No learning config for kid profile {}", kid_profile_id);
            return Ok(None);
        }

        let yaml_content = std::fs::read_to_string(&path)?;
        let record: LearningConfigRecord = serde_yaml::from_str(&yaml_content)?;
        Ok(Some(record.into_domain()))
    }

    fn store_learning_config(&self, config: &LearningConfig) -> Result<()> {
        self.connection.ensure_kid_directory(&config.kid_profile_id)?;

        let path = self.config_path(&config.kid_profile_id);
        let record = LearningConfigRecord::from(config);
        let yaml_content = serde_yaml::to_string(&record)?;

        // Atomic write: temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, yaml_content)?;
        std::fs::rename(&temp_path, &path)?;

        debug!(
            "Saved learning config for kid profile {} to {:?}",
            config.kid_profile_id, path
        );
        Ok(())
    }
}
