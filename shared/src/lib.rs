use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when a persisted enum value does not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized learning frequency '{0}'")]
    Frequency(String),
    #[error("unrecognized theme category '{0}'")]
    ThemeCategory(String),
    #[error("unrecognized age group '{0}'")]
    AgeGroup(String),
}

/// How often a learning theme should be woven into generated stories.
///
/// The frequency maps to a minimum number of unthemed stories between two
/// themed ones; see `story_gap_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningFrequency {
    /// A theme roughly every 4th story
    Occasional,
    /// A theme roughly every 3rd story
    Regular,
    /// A theme roughly every 2nd story
    Frequent,
}

impl LearningFrequency {
    /// Minimum count of unthemed stories required since the last themed
    /// story before the next theme is injected.
    pub fn story_gap_threshold(&self) -> u32 {
        match self {
            LearningFrequency::Occasional => 3,
            LearningFrequency::Regular => 2,
            LearningFrequency::Frequent => 1,
        }
    }

    /// Parse a frequency from its stored string form
    pub fn from_string(s: &str) -> Result<Self, ParseError> {
        match s {
            "occasional" => Ok(LearningFrequency::Occasional),
            "regular" => Ok(LearningFrequency::Regular),
            "frequent" => Ok(LearningFrequency::Frequent),
            other => Err(ParseError::Frequency(other.to_string())),
        }
    }
}

impl fmt::Display for LearningFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LearningFrequency::Occasional => "occasional",
            LearningFrequency::Regular => "regular",
            LearningFrequency::Frequent => "frequent",
        };
        write!(f, "{}", s)
    }
}

/// Coarse bucket grouping related story subtypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeCategory {
    MagicFantasy,
    AdventureAction,
    RealLife,
    Surprise,
}

impl ThemeCategory {
    /// Parse a category from its wire form (`magic_fantasy`, ...)
    pub fn from_string(s: &str) -> Result<Self, ParseError> {
        match s {
            "magic_fantasy" => Ok(ThemeCategory::MagicFantasy),
            "adventure_action" => Ok(ThemeCategory::AdventureAction),
            "real_life" => Ok(ThemeCategory::RealLife),
            "surprise" => Ok(ThemeCategory::Surprise),
            other => Err(ParseError::ThemeCategory(other.to_string())),
        }
    }
}

impl fmt::Display for ThemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThemeCategory::MagicFantasy => "magic_fantasy",
            ThemeCategory::AdventureAction => "adventure_action",
            ThemeCategory::RealLife => "real_life",
            ThemeCategory::Surprise => "surprise",
        };
        write!(f, "{}", s)
    }
}

/// Age bracket a story subtype is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "6-7")]
    Ages6To7,
    #[serde(rename = "8-9")]
    Ages8To9,
    #[serde(rename = "10-11")]
    Ages10To11,
}

impl AgeGroup {
    /// Map a child's age to its bracket. Ages below 6 fold into the
    /// youngest bracket, ages above 11 into the oldest.
    pub fn for_age(age: u8) -> Self {
        if age <= 7 {
            AgeGroup::Ages6To7
        } else if age <= 9 {
            AgeGroup::Ages8To9
        } else {
            AgeGroup::Ages10To11
        }
    }

    /// Parse an age group from its stored string form
    pub fn from_string(s: &str) -> Result<Self, ParseError> {
        match s {
            "6-7" => Ok(AgeGroup::Ages6To7),
            "8-9" => Ok(AgeGroup::Ages8To9),
            "10-11" => Ok(AgeGroup::Ages10To11),
            other => Err(ParseError::AgeGroup(other.to_string())),
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgeGroup::Ages6To7 => "6-7",
            AgeGroup::Ages8To9 => "8-9",
            AgeGroup::Ages10To11 => "10-11",
        };
        write!(f, "{}", s)
    }
}

/// Learning theme chosen for the next story.
///
/// Returned by the theme scheduler when a theme is due; `None` from the
/// scheduler means the story is generated without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSelection {
    /// Catalog key, or `custom:<id>` for a caregiver-created theme
    pub theme_key: String,
    /// Display label resolved for the story language
    pub theme_label: String,
    /// Free-text guidance attached to custom themes
    pub story_guidance: Option<String>,
}

/// Narrative subtype chosen for the next story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtypeSelection {
    pub subtype_key: String,
    /// Hint passed through to prompt construction
    pub prompt_hint: String,
    /// One title seed picked from the subtype's pool ("" if the pool is empty)
    pub title_seed: String,
    /// One setting idea picked from the subtype's pool ("" if the pool is empty)
    pub setting_idea: String,
    pub category: ThemeCategory,
    /// Display label resolved for the story language
    pub label: String,
}
