//! Error types shared across the gallery

use thiserror::Error;

/// Errors produced while loading, decoding, downloading or configuring
#[derive(Debug, Error)]
pub enum GalleryError {
    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level HTTP failure (DNS, TLS, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// Manifest body was not a JSON array of media items
    #[error("Invalid manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),

    /// Manifest source string could not be interpreted
    #[error("Invalid manifest source: {0}")]
    InvalidSource(String),

    /// Image could not be decoded
    #[error("Image decoding error: {0}")]
    Image(#[from] image::ImageError),

    /// Download could not be completed
    #[error("Download failed: {0}")]
    Download(String),

    /// External player could not be launched
    #[error("Failed to launch player: {0}")]
    Player(String),

    /// User configuration could not be read or written
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Background worker is gone
    #[error("Background loader stopped: {0}")]
    LoaderStopped(String),
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, GalleryError>;
