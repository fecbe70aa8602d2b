//! Subtype selector domain logic for the story generator.
//!
//! Picks the narrative subtype for a story from the curated catalog, keyed
//! by theme category and age bracket. Variety comes from two mechanisms
//! layered as an ordered fallback pipeline:
//!
//! 1. recency exclusion over the kid's last few subtype usages, relaxed to
//!    a shorter window when it would starve a small catalog, and dropped
//!    entirely before it can block selection
//! 2. weighted random choice over whatever candidates survive
//!
//! ## Business Rules
//!
//! - Unknown theme keys map to the surprise category (warned, never fatal)
//! - An empty catalog for the category and age bracket yields no subtype;
//!   the caller generates the story without one
//! - Selection never fails once the catalog is non-empty
//! - Usage recording is best-effort and skipped for anonymous usage

use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;

use shared::{AgeGroup, SubtypeSelection, ThemeCategory};

use crate::domain::commands::subtypes::{SubtypeQuery, SubtypeUsage};
use crate::domain::models::subtype::{SubtypeCatalogEntry, SubtypeHistoryRecord};
use crate::domain::selection::{pick_seed, resolve_label, weighted_pick};
use crate::storage::{SubtypeCatalogStorage, SubtypeHistoryStorage};

/// How many of the kid's most recent subtype usages are excluded from
/// selection.
pub const HISTORY_WINDOW: usize = 5;
/// Shorter exclusion window used when the full window would starve the
/// catalog.
pub const RELAXED_WINDOW: usize = 2;
/// Minimum candidate pool size below which the exclusion window is relaxed
/// (only meaningful for catalogs at least this large).
pub const MIN_CANDIDATES: usize = 3;

/// Known theme identifiers and the category their subtypes come from.
static THEME_CATEGORIES: Lazy<HashMap<&'static str, ThemeCategory>> = Lazy::new(|| {
    HashMap::from([
        ("fantasy", ThemeCategory::MagicFantasy),
        ("magic", ThemeCategory::MagicFantasy),
        ("action", ThemeCategory::AdventureAction),
        ("adventure", ThemeCategory::AdventureAction),
        ("animals", ThemeCategory::RealLife),
        ("everyday", ThemeCategory::RealLife),
        ("friends", ThemeCategory::RealLife),
        ("educational", ThemeCategory::RealLife),
        ("humor", ThemeCategory::Surprise),
        ("surprise", ThemeCategory::Surprise),
    ])
});

/// Map a theme identifier (or a category wire form) to its category.
///
/// Unknown keys default to the surprise category with a warning; story
/// generation must not fail over an unmapped theme.
pub fn category_for_theme(theme: &str) -> ThemeCategory {
    if let Ok(category) = ThemeCategory::from_string(theme) {
        return category;
    }
    match THEME_CATEGORIES.get(theme) {
        Some(category) => *category,
        None => {
            warn!("Unmapped theme '{}', defaulting to surprise category", theme);
            ThemeCategory::Surprise
        }
    }
}

/// Service picking the narrative subtype for the next story
#[derive(Clone)]
pub struct SubtypeSelector {
    subtype_catalog: Arc<dyn SubtypeCatalogStorage>,
    subtype_history_repository: Arc<dyn SubtypeHistoryStorage>,
}

impl SubtypeSelector {
    /// Create a new SubtypeSelector
    pub fn new(
        subtype_catalog: Arc<dyn SubtypeCatalogStorage>,
        subtype_history_repository: Arc<dyn SubtypeHistoryStorage>,
    ) -> Self {
        Self {
            subtype_catalog,
            subtype_history_repository,
        }
    }

    /// Select a subtype for the next story, if the catalog offers one.
    ///
    /// Total function: every failure path degrades to `None` so story
    /// generation never blocks on subtype selection.
    pub fn select(&self, query: SubtypeQuery) -> Option<SubtypeSelection> {
        let mut rng = rand::thread_rng();
        match self.try_select(&query, &mut rng) {
            Ok(selection) => selection,
            Err(e) => {
                warn!(
                    "Subtype selection failed for theme '{}' (kid profile {:?}): {:#}",
                    query.theme, query.kid_profile_id, e
                );
                None
            }
        }
    }

    fn try_select(
        &self,
        query: &SubtypeQuery,
        rng: &mut impl Rng,
    ) -> Result<Option<SubtypeSelection>> {
        let category = category_for_theme(&query.theme);
        let age_group = AgeGroup::for_age(query.age);

        let catalog = self.subtype_catalog.list_subtypes(category, age_group)?;
        if catalog.is_empty() {
            debug!(
                "No active subtypes for category {} and age group {}",
                category, age_group
            );
            return Ok(None);
        }

        let recent_keys = match &query.kid_profile_id {
            Some(kid_profile_id) => self
                .subtype_history_repository
                .recent_usage(kid_profile_id, category, HISTORY_WINDOW)?
                .into_iter()
                .map(|record| record.subtype_key)
                .collect(),
            None => Vec::new(),
        };

        let candidates = apply_recency_exclusion(&catalog, &recent_keys);
        let entry = match weighted_pick(&candidates, rng) {
            Some(entry) => *entry,
            None => return Ok(None),
        };

        let title_seed = pick_seed(&entry.title_seeds, rng).to_string();
        let setting_idea = pick_seed(&entry.setting_ideas, rng).to_string();
        let label = resolve_label(
            &entry.labels,
            &[query.language.as_str(), "en", "de"],
            &entry.subtype_key,
        )
        .to_string();

        debug!(
            "Selected subtype {} for category {} (excluded {} recent keys)",
            entry.subtype_key,
            category,
            recent_keys.len()
        );

        Ok(Some(SubtypeSelection {
            subtype_key: entry.subtype_key.clone(),
            prompt_hint: entry.prompt_hint.clone(),
            title_seed,
            setting_idea,
            category,
            label,
        }))
    }

    /// Record a subtype usage in the history log.
    ///
    /// Fire-and-forget: failures only degrade future rotation quality, so
    /// they are logged and swallowed. Anonymous usage (no kid profile id)
    /// is skipped silently.
    pub fn record_usage(&self, usage: SubtypeUsage) {
        let kid_profile_id = match usage.kid_profile_id {
            Some(id) => id,
            None => {
                debug!("No kid profile id, skipping subtype usage recording");
                return;
            }
        };

        let record = SubtypeHistoryRecord {
            kid_profile_id: kid_profile_id.clone(),
            theme_category: usage.category,
            subtype_key: usage.subtype_key,
            story_id: usage.story_id,
            created_at: Utc::now().to_rfc3339(),
        };
        if let Err(e) = self.subtype_history_repository.append_usage(&record) {
            warn!(
                "Failed to record subtype usage for kid profile {}: {:#}",
                kid_profile_id, e
            );
        }
    }
}

/// Recency exclusion as an ordered fallback pipeline.
///
/// Stage 1 excludes the full recent window. When that leaves fewer than
/// `MIN_CANDIDATES` options and the catalog itself has at least that many,
/// stage 2 retries with only the most recent `RELAXED_WINDOW` keys so small
/// catalogs are not starved. Stage 3 drops exclusion entirely, which
/// guarantees candidates whenever the catalog is non-empty.
///
/// `recent_keys` must be ordered most recent first.
fn apply_recency_exclusion<'a>(
    catalog: &'a [SubtypeCatalogEntry],
    recent_keys: &[String],
) -> Vec<&'a SubtypeCatalogEntry> {
    let excluding = |window: usize| -> Vec<&'a SubtypeCatalogEntry> {
        let window = &recent_keys[..recent_keys.len().min(window)];
        catalog
            .iter()
            .filter(|entry| !window.contains(&entry.subtype_key))
            .collect()
    };

    let mut candidates = excluding(HISTORY_WINDOW);
    if candidates.len() < MIN_CANDIDATES && catalog.len() >= MIN_CANDIDATES {
        candidates = excluding(RELAXED_WINDOW);
    }
    if candidates.is_empty() {
        candidates = catalog.iter().collect();
    }
    candidates
}
