//! Asset location and retrieval for manifests, thumbnails and media

use crate::error::{GalleryError, Result};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const USER_AGENT: &str = concat!("galleria/", env!("CARGO_PKG_VERSION"));

/// Where a manifest reference points
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetLocation {
    Local(PathBuf),
    Remote(Url),
}

impl AssetLocation {
    /// String form used for cache keys, logging and external players
    pub fn as_uri(&self) -> String {
        match self {
            AssetLocation::Local(path) => path.display().to_string(),
            AssetLocation::Remote(url) => url.to_string(),
        }
    }
}

/// Base that relative manifest references are resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetBase {
    /// Relative paths are used as given, relative to the process working directory
    WorkingDir,
    Directory(PathBuf),
    Url(Url),
}

fn is_remote(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

impl AssetBase {
    /// Parses a `--base` value: an http(s) URL or a directory
    pub fn parse(s: &str) -> Result<Self> {
        if is_remote(s) {
            let url = Url::parse(s)
                .map_err(|e| GalleryError::InvalidSource(format!("{}: {}", s, e)))?;
            Ok(AssetBase::Url(url))
        } else if s.is_empty() {
            Err(GalleryError::InvalidSource("empty asset base".to_string()))
        } else {
            Ok(AssetBase::Directory(PathBuf::from(s)))
        }
    }

    /// Resolves a manifest reference the way a page resolves `src`/`href`
    pub fn resolve(&self, href: &str) -> AssetLocation {
        if is_remote(href) {
            if let Ok(url) = Url::parse(href) {
                return AssetLocation::Remote(url);
            }
        }

        match self {
            AssetBase::Url(base) => match base.join(href) {
                Ok(url) => AssetLocation::Remote(url),
                Err(_) => AssetLocation::Local(PathBuf::from(href)),
            },
            AssetBase::Directory(dir) => {
                let path = Path::new(href);
                if path.is_absolute() {
                    AssetLocation::Local(path.to_path_buf())
                } else {
                    AssetLocation::Local(dir.join(path))
                }
            }
            AssetBase::WorkingDir => AssetLocation::Local(PathBuf::from(href)),
        }
    }
}

static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide HTTP client, built on first use so every fetch shares one
/// connection pool
pub fn http_client() -> Result<&'static reqwest::Client> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client);
    }

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .user_agent(USER_AGENT)
        .build()?;
    // Another thread may have set it first
    Ok(HTTP_CLIENT.get_or_init(|| client))
}

/// Sends a GET and rejects non-success statuses
pub async fn get(client: &reqwest::Client, url: Url) -> Result<reqwest::Response> {
    let response = client.get(url.clone()).send().await?;
    if !response.status().is_success() {
        return Err(GalleryError::HttpStatus {
            status: response.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response)
}

/// Reads the whole asset into memory
pub async fn fetch_bytes(location: &AssetLocation) -> Result<Vec<u8>> {
    match location {
        AssetLocation::Local(path) => Ok(tokio::fs::read(path).await?),
        AssetLocation::Remote(url) => {
            let response = get(http_client()?, url.clone()).await?;
            Ok(response.bytes().await?.to_vec())
        }
    }
}
