//! # Storage Module
//!
//! Storage abstraction for the content-rotation engine. The domain layer
//! only sees the traits defined in `traits`; the `csv` module provides the
//! file-based implementation used by the desktop app.

pub mod csv;
pub mod traits;

pub use traits::{
    CustomThemeStorage, LearningConfigStorage, StoryHistoryStorage, SubtypeCatalogStorage,
    SubtypeHistoryStorage, ThemeCatalogStorage,
};
