//! File-based storage connection managing the data directory layout.
//!
//! ```text
//! data/
//! ├── catalog/
//! │   ├── themes.yaml
//! │   └── subtypes.yaml
//! ├── custom_themes.yaml
//! └── {kid_profile_id}/
//!     ├── learning_config.yaml
//!     ├── stories.csv
//!     └── subtype_history.csv
//! ```

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// CsvConnection manages file paths and per-kid directories under a base
/// data directory
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new connection with a base directory, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// The base data directory
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// The directory holding a kid profile's data
    pub fn kid_directory(&self, kid_profile_id: &str) -> PathBuf {
        self.base_directory
            .join(Self::safe_directory_name(kid_profile_id))
    }

    /// The directory holding a kid profile's data, created if needed
    pub fn ensure_kid_directory(&self, kid_profile_id: &str) -> Result<PathBuf> {
        let dir = self.kid_directory(kid_profile_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }

    /// Sanitize a kid profile id into a filesystem-safe directory name
    pub fn safe_directory_name(kid_profile_id: &str) -> String {
        kid_profile_id
            .chars()
            .map(|c| {
                if c.is_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}
