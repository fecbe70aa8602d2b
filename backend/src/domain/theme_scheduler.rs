//! Theme scheduler domain logic for the story generator.
//!
//! Decides, per story request, whether a learning theme is due and which one
//! to inject. The rotation position is never stored: it is re-derived on
//! every call from the most recent themed story in the history log, so
//! concurrent requests cannot corrupt any cursor state.
//!
//! ## Business Rules
//!
//! - No config, or a config with no active themes, means no theme
//! - The caregiver frequency sets how many unthemed stories must pass
//!   between themed ones (occasional: 3, regular: 2, frequent: 1)
//! - Themes rotate round-robin through `active_themes` in configured order
//! - A last-used theme the caregiver has since removed restarts the
//!   rotation at the front of the list
//! - Theme injection is best-effort: storage failures are logged and the
//!   story proceeds without a theme

use anyhow::Result;
use chrono::Utc;
use log::{debug, warn};
use std::sync::Arc;

use shared::ThemeSelection;

use crate::domain::commands::themes::ThemeDecisionQuery;
use crate::domain::models::learning::custom_theme_id;
use crate::domain::models::story::StoryHistoryRecord;
use crate::domain::selection::resolve_label;
use crate::storage::{
    CustomThemeStorage, LearningConfigStorage, StoryHistoryStorage, ThemeCatalogStorage,
};

/// Service deciding whether and which learning theme the next story carries
#[derive(Clone)]
pub struct ThemeScheduler {
    learning_config_repository: Arc<dyn LearningConfigStorage>,
    story_history_repository: Arc<dyn StoryHistoryStorage>,
    theme_catalog: Arc<dyn ThemeCatalogStorage>,
    custom_theme_repository: Arc<dyn CustomThemeStorage>,
}

impl ThemeScheduler {
    /// Create a new ThemeScheduler
    pub fn new(
        learning_config_repository: Arc<dyn LearningConfigStorage>,
        story_history_repository: Arc<dyn StoryHistoryStorage>,
        theme_catalog: Arc<dyn ThemeCatalogStorage>,
        custom_theme_repository: Arc<dyn CustomThemeStorage>,
    ) -> Self {
        Self {
            learning_config_repository,
            story_history_repository,
            theme_catalog,
            custom_theme_repository,
        }
    }

    /// Decide the theme for the next story, if one is due.
    ///
    /// Total function: every failure path degrades to `None` so story
    /// generation never blocks on theme scheduling.
    pub fn decide(&self, query: ThemeDecisionQuery) -> Option<ThemeSelection> {
        match self.try_decide(&query) {
            Ok(selection) => selection,
            Err(e) => {
                warn!(
                    "Theme decision failed for kid profile {}: {:#}",
                    query.kid_profile_id, e
                );
                None
            }
        }
    }

    fn try_decide(&self, query: &ThemeDecisionQuery) -> Result<Option<ThemeSelection>> {
        let config = match self
            .learning_config_repository
            .get_learning_config(&query.kid_profile_id)?
        {
            Some(config) => config,
            None => {
                debug!(
                    "No learning config for kid profile {}, skipping theme",
                    query.kid_profile_id
                );
                return Ok(None);
            }
        };

        if config.active_themes.is_empty() {
            debug!(
                "Learning config for kid profile {} has no active themes",
                query.kid_profile_id
            );
            return Ok(None);
        }

        let last_themed = self
            .story_history_repository
            .latest_themed_story(&query.kid_profile_id)?;
        let stories_since_last_theme = self.story_history_repository.count_unthemed_since(
            &query.kid_profile_id,
            last_themed.as_ref().map(|record| record.created_at.as_str()),
        )?;

        let threshold = config.frequency.story_gap_threshold();
        if stories_since_last_theme < threshold {
            debug!(
                "Kid profile {} has {} stories since last theme, threshold {} not met",
                query.kid_profile_id, stories_since_last_theme, threshold
            );
            return Ok(None);
        }

        let last_key = last_themed.and_then(|record| record.learning_theme_applied);
        let theme_key = match next_theme(&config.active_themes, last_key.as_deref()) {
            Some(key) => key.to_string(),
            None => return Ok(None),
        };

        debug!(
            "Selected theme {} for kid profile {} ({} stories since last theme)",
            theme_key, query.kid_profile_id, stories_since_last_theme
        );

        self.resolve_selection(&theme_key, &query.story_language)
            .map(Some)
    }

    /// Resolve the display label (and guidance, for custom themes) for a
    /// selected theme key.
    ///
    /// Custom names fall back en then de; catalog labels fall back en then
    /// fr. The asymmetry is long-standing app behavior and kept as is.
    fn resolve_selection(&self, theme_key: &str, language: &str) -> Result<ThemeSelection> {
        if let Some(id) = custom_theme_id(theme_key) {
            let theme = self.custom_theme_repository.get_custom_theme(id)?;
            return Ok(match theme {
                Some(theme) => ThemeSelection {
                    theme_key: theme_key.to_string(),
                    theme_label: resolve_label(&theme.name, &[language, "en", "de"], theme_key)
                        .to_string(),
                    story_guidance: theme.story_guidance.clone(),
                },
                None => {
                    warn!("Custom theme {} not found, using key as label", id);
                    ThemeSelection {
                        theme_key: theme_key.to_string(),
                        theme_label: theme_key.to_string(),
                        story_guidance: None,
                    }
                }
            });
        }

        let entry = self.theme_catalog.get_theme_entry(theme_key)?;
        let theme_label = match &entry {
            Some(entry) => {
                resolve_label(&entry.labels, &[language, "en", "fr"], theme_key).to_string()
            }
            None => theme_key.to_string(),
        };
        Ok(ThemeSelection {
            theme_key: theme_key.to_string(),
            theme_label,
            story_guidance: None,
        })
    }

    /// Record the outcome of a generated story in the history log.
    ///
    /// Fire-and-forget: called by the story pipeline after generation, and
    /// failures only degrade future rotation quality, so they are logged
    /// and swallowed.
    pub fn record_story_outcome(&self, kid_profile_id: &str, theme_applied: Option<&str>) {
        let now_millis = Utc::now().timestamp_millis() as u64;
        let record = StoryHistoryRecord {
            id: StoryHistoryRecord::generate_id(kid_profile_id, now_millis),
            kid_profile_id: kid_profile_id.to_string(),
            created_at: Utc::now().to_rfc3339(),
            learning_theme_applied: theme_applied.map(str::to_string),
        };
        if let Err(e) = self.story_history_repository.append_story(&record) {
            warn!(
                "Failed to record story outcome for kid profile {}: {:#}",
                kid_profile_id, e
            );
        }
    }
}

/// Round-robin over the configured themes, derived from the last used key.
///
/// Advances one slot past the last used theme (wrapping); a last used theme
/// no longer present restarts at the front. `None` only for an empty list.
pub fn next_theme<'a>(active_themes: &'a [String], last_used: Option<&str>) -> Option<&'a str> {
    if active_themes.is_empty() {
        return None;
    }
    let next_index = match last_used.and_then(|key| active_themes.iter().position(|t| t == key)) {
        Some(index) => (index + 1) % active_themes.len(),
        None => 0,
    };
    Some(active_themes[next_index].as_str())
}
