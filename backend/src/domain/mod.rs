//! # Domain Module
//!
//! Contains the content-rotation logic of the story generator: which story
//! variant to use next, and whether a learning theme is due.
//!
//! This module encapsulates the decision rules and services that keep
//! generated stories varied. It operates independently of any specific UI
//! framework or storage mechanism.
//!
//! ## Module Organization
//!
//! - **theme_scheduler**: Frequency gating and round-robin rotation of
//!   caregiver-enabled learning themes
//! - **subtype_selector**: Recency-excluded, weighted selection of
//!   narrative subtypes per theme category and age bracket
//! - **selection**: Reusable weighted/uniform pick and label fallback
//!   helpers
//! - **commands**: Domain-level query and command types
//! - **models**: Domain entities (configs, catalogs, history records)
//!
//! ## Core Concepts
//!
//! - **Theme**: An optional learning focus a caregiver enables for story
//!   generation (catalog key or `custom:<id>` reference)
//! - **Subtype**: A narrative flavor within one of four theme categories
//! - **Rotation**: Round-robin over themes, recency exclusion over
//!   subtypes; both derived from append-only history, never from stored
//!   cursors
//!
//! ## Design Principles
//!
//! - **Best-effort**: Both services are total functions returning `Option`;
//!   storage failures are logged, never propagated to story generation
//! - **Stateless**: No in-process mutable state; concurrent requests for
//!   the same kid are a benign race
//! - **Storage Agnostic**: Works with any storage implementation

pub mod commands;
pub mod models;
pub mod selection;
pub mod subtype_selector;
pub mod theme_scheduler;

pub use selection::{weighted_pick, Weighted};
pub use subtype_selector::{category_for_theme, SubtypeSelector};
pub use theme_scheduler::{next_theme, ThemeScheduler};
