//! # Story History Repository
//!
//! Append-only story log, one CSV file per kid profile at
//! `{kid_directory}/stories.csv`. The theme scheduler reads it to derive
//! the rotation position and the unthemed-story gap; the story pipeline
//! appends one row per generated story.
//!
//! ## CSV Format
//!
//! ```csv
//! id,kid_profile_id,created_at,learning_theme_applied
//! story::kid__1::1750000000000,kid::1,2025-06-15T10:00:00+00:00,animals
//! story::kid__1::1750086400000,kid::1,2025-06-16T10:00:00+00:00,
//! ```
//!
//! An empty `learning_theme_applied` field means the story carried no
//! theme. Rows with unparseable timestamps are skipped with a warning.

use anyhow::Result;
use chrono::DateTime;
use csv::{ReaderBuilder, WriterBuilder};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::models::story::StoryHistoryRecord;
use crate::storage::traits::StoryHistoryStorage;

const HEADER: &str = "id,kid_profile_id,created_at,learning_theme_applied\n";

/// CSV record structure for story history rows
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoryRow {
    id: String,
    kid_profile_id: String,
    created_at: String,
    learning_theme_applied: Option<String>,
}

impl From<&StoryHistoryRecord> for StoryRow {
    fn from(record: &StoryHistoryRecord) -> Self {
        StoryRow {
            id: record.id.clone(),
            kid_profile_id: record.kid_profile_id.clone(),
            created_at: record.created_at.clone(),
            learning_theme_applied: record.learning_theme_applied.clone(),
        }
    }
}

impl From<StoryRow> for StoryHistoryRecord {
    fn from(row: StoryRow) -> Self {
        StoryHistoryRecord {
            id: row.id,
            kid_profile_id: row.kid_profile_id,
            created_at: row.created_at,
            learning_theme_applied: row.learning_theme_applied.filter(|s| !s.is_empty()),
        }
    }
}

/// CSV-based story history repository using per-kid files
#[derive(Clone)]
pub struct StoryHistoryRepository {
    connection: CsvConnection,
}

impl StoryHistoryRepository {
    /// Create a new story history repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn stories_path(&self, kid_profile_id: &str) -> PathBuf {
        self.connection.kid_directory(kid_profile_id).join("stories.csv")
    }

    fn ensure_stories_file(&self, kid_profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_kid_directory(kid_profile_id)?;
        let path = self.stories_path(kid_profile_id);
        if !path.exists() {
            std::fs::write(&path, HEADER)?;
        }
        Ok(path)
    }

    fn read_stories(&self, kid_profile_id: &str) -> Result<Vec<StoryHistoryRecord>> {
        let path = self.stories_path(kid_profile_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&path)?;
        let mut csv_reader = ReaderBuilder::new().from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<StoryRow>() {
            match result {
                Ok(row) => records.push(StoryHistoryRecord::from(row)),
                Err(e) => {
                    warn!("Failed to parse story history row: {}. Skipping.", e);
                    continue;
                }
            }
        }
        Ok(records)
    }
}

/// Parse an RFC 3339 timestamp, warning and discarding rows that fail.
fn parse_created_at(record: &StoryHistoryRecord) -> Option<DateTime<chrono::FixedOffset>> {
    match DateTime::parse_from_rfc3339(&record.created_at) {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            warn!(
                "Story record {} has invalid timestamp '{}': {}. Skipping.",
                record.id, record.created_at, e
            );
            None
        }
    }
}

impl StoryHistoryStorage for StoryHistoryRepository {
    fn append_story(&self, record: &StoryHistoryRecord) -> Result<()> {
        let path = self.ensure_stories_file(&record.kid_profile_id)?;

        let file = OpenOptions::new().append(true).open(&path)?;
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));
        csv_writer.serialize(StoryRow::from(record))?;
        csv_writer.flush()?;
        Ok(())
    }

    fn latest_themed_story(&self, kid_profile_id: &str) -> Result<Option<StoryHistoryRecord>> {
        let records = self.read_stories(kid_profile_id)?;
        Ok(records
            .into_iter()
            .filter(|record| record.learning_theme_applied.is_some())
            .filter_map(|record| parse_created_at(&record).map(|ts| (ts, record)))
            .max_by_key(|(ts, _)| *ts)
            .map(|(_, record)| record))
    }

    fn count_unthemed_since(&self, kid_profile_id: &str, after: Option<&str>) -> Result<u32> {
        let cutoff = match after {
            Some(after) => Some(
                DateTime::parse_from_rfc3339(after)
                    .map_err(|e| anyhow::anyhow!("invalid cutoff timestamp '{}': {}", after, e))?,
            ),
            None => None,
        };

        let records = self.read_stories(kid_profile_id)?;
        let count = records
            .iter()
            .filter(|record| record.learning_theme_applied.is_none())
            .filter_map(|record| parse_created_at(record))
            .filter(|ts| match cutoff {
                Some(cutoff) => *ts > cutoff,
                None => true,
            })
            .count();
        Ok(count as u32)
    }
}
