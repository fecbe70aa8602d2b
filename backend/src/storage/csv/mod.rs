//! # CSV Storage Module
//!
//! File-based storage implementation for the content-rotation engine.
//! Configs are per-kid YAML files, history logs are per-kid append-only CSV
//! files, and the curated catalogs ship as built-in YAML with optional
//! per-deployment overrides.
//!
//! The domain layer only depends on the traits in `storage::traits`; this
//! module is one interchangeable backend for them.

pub mod catalog;
pub mod connection;
pub mod custom_theme_repository;
pub mod learning_config_repository;
pub mod story_history_repository;
pub mod subtype_history_repository;

#[cfg(test)]
pub mod test_utils;

pub use catalog::CatalogRepository;
pub use connection::CsvConnection;
pub use custom_theme_repository::CustomThemeRepository;
pub use learning_config_repository::LearningConfigRepository;
pub use story_history_repository::StoryHistoryRepository;
pub use subtype_history_repository::SubtypeHistoryRepository;
