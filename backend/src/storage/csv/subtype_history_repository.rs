//! # Subtype History Repository
//!
//! Append-only subtype usage log, one CSV file per kid profile at
//! `{kid_directory}/subtype_history.csv`. The subtype selector reads the
//! most recent rows per category for recency exclusion; rows are never
//! updated.
//!
//! ## CSV Format
//!
//! ```csv
//! kid_profile_id,theme_category,subtype_key,story_id,created_at
//! kid::1,magic_fantasy,enchanted_forest,story::kid__1::175,2025-06-15T10:00:00+00:00
//! kid::1,surprise,mystery_box,,2025-06-16T10:00:00+00:00
//! ```
//!
//! Rows with an unknown category or broken timestamp are skipped with a
//! warning.

use anyhow::Result;
use chrono::DateTime;
use csv::{ReaderBuilder, WriterBuilder};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use shared::ThemeCategory;

use super::connection::CsvConnection;
use crate::domain::models::subtype::SubtypeHistoryRecord;
use crate::storage::traits::SubtypeHistoryStorage;

const HEADER: &str = "kid_profile_id,theme_category,subtype_key,story_id,created_at\n";

/// CSV record structure for subtype usage rows
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UsageRow {
    kid_profile_id: String,
    theme_category: String,
    subtype_key: String,
    story_id: Option<String>,
    created_at: String,
}

impl From<&SubtypeHistoryRecord> for UsageRow {
    fn from(record: &SubtypeHistoryRecord) -> Self {
        UsageRow {
            kid_profile_id: record.kid_profile_id.clone(),
            theme_category: record.theme_category.to_string(),
            subtype_key: record.subtype_key.clone(),
            story_id: record.story_id.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

impl TryFrom<UsageRow> for SubtypeHistoryRecord {
    type Error = shared::ParseError;

    fn try_from(row: UsageRow) -> Result<Self, Self::Error> {
        let theme_category = ThemeCategory::from_string(&row.theme_category)?;
        Ok(SubtypeHistoryRecord {
            kid_profile_id: row.kid_profile_id,
            theme_category,
            subtype_key: row.subtype_key,
            story_id: row.story_id.filter(|s| !s.is_empty()),
            created_at: row.created_at,
        })
    }
}

/// CSV-based subtype usage repository using per-kid files
#[derive(Clone)]
pub struct SubtypeHistoryRepository {
    connection: CsvConnection,
}

impl SubtypeHistoryRepository {
    /// Create a new subtype history repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn history_path(&self, kid_profile_id: &str) -> PathBuf {
        self.connection
            .kid_directory(kid_profile_id)
            .join("subtype_history.csv")
    }

    fn ensure_history_file(&self, kid_profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_kid_directory(kid_profile_id)?;
        let path = self.history_path(kid_profile_id);
        if !path.exists() {
            std::fs::write(&path, HEADER)?;
        }
        Ok(path)
    }

    fn read_usage(&self, kid_profile_id: &str) -> Result<Vec<SubtypeHistoryRecord>> {
        let path = self.history_path(kid_profile_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&path)?;
        let mut csv_reader = ReaderBuilder::new().from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<UsageRow>() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!("Failed to parse subtype usage row: {}. Skipping.", e);
                    continue;
                }
            };
            match SubtypeHistoryRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Failed to parse subtype usage row: {}. Skipping.", e);
                    continue;
                }
            }
        }
        Ok(records)
    }
}

impl SubtypeHistoryStorage for SubtypeHistoryRepository {
    fn append_usage(&self, record: &SubtypeHistoryRecord) -> Result<()> {
        let path = self.ensure_history_file(&record.kid_profile_id)?;

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        csv_writer.serialize(UsageRow::from(record))?;
        csv_writer.flush()?;
        Ok(())
    }

    fn recent_usage(
        &self,
        kid_profile_id: &str,
        category: ThemeCategory,
        limit: usize,
    ) -> Result<Vec<SubtypeHistoryRecord>> {
        let mut dated: Vec<_> = self
            .read_usage(kid_profile_id)?
            .into_iter()
            .filter(|record| record.theme_category == category)
            .filter_map(|record| match DateTime::parse_from_rfc3339(&record.created_at) {
                Ok(timestamp) => Some((timestamp, record)),
                Err(e) => {
                    warn!(
                        "Subtype usage row for {} has invalid timestamp '{}': {}. Skipping.",
                        record.subtype_key, record.created_at, e
                    );
                    None
                }
            })
            .collect();

        // Most recent first
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(dated
            .into_iter()
            .take(limit)
            .map(|(_, record)| record)
            .collect())
    }
}
