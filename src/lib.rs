//! Galleria - a terminal media gallery
//!
//! Loads a JSON manifest of images, videos and audio, and provides the
//! filtering, sorting, viewer and download logic behind the `galleria` TUI.

pub mod assets;
pub mod cli;
pub mod config;
pub mod domain;
pub mod download;
pub mod error;
pub mod loader;
pub mod logging;
pub mod manifest;
pub mod player;
pub mod preview;
pub mod tui;

// Re-export primary types for convenience
pub use assets::{AssetBase, AssetLocation};
pub use config::UserConfig;
pub use domain::{
    Category, CategoryFilter, ClickOutcome, ClickTarget, Gallery, GridView, LoadStatus,
    MediaItem, Presentation, SortOrder, ViewerView,
};
pub use error::{GalleryError, Result};
pub use manifest::ManifestSource;
