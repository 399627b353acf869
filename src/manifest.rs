//! Manifest source parsing and fetching

use crate::assets::{self, AssetBase};
use crate::domain::MediaItem;
use crate::error::{GalleryError, Result};
use chrono::Utc;
use reqwest::Url;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Manifest location used when none is given
pub const DEFAULT_MANIFEST_PATH: &str = "./data/list.json";

/// Query parameter used to defeat intermediate caches
const CACHE_BUST_PARAM: &str = "t";

/// Where the manifest is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Local(PathBuf),
    Remote(Url),
}

impl ManifestSource {
    /// Relative asset references in a remote manifest resolve against its URL;
    /// local manifests leave them relative to the working directory.
    pub fn default_asset_base(&self) -> AssetBase {
        match self {
            ManifestSource::Local(_) => AssetBase::WorkingDir,
            ManifestSource::Remote(url) => AssetBase::Url(url.clone()),
        }
    }
}

impl Default for ManifestSource {
    fn default() -> Self {
        ManifestSource::Local(PathBuf::from(DEFAULT_MANIFEST_PATH))
    }
}

impl FromStr for ManifestSource {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(GalleryError::InvalidSource("empty manifest location".to_string()));
        }
        if s.starts_with("http://") || s.starts_with("https://") {
            let url =
                Url::parse(s).map_err(|e| GalleryError::InvalidSource(format!("{}: {}", s, e)))?;
            Ok(ManifestSource::Remote(url))
        } else {
            Ok(ManifestSource::Local(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestSource::Local(path) => write!(f, "{}", path.display()),
            ManifestSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

/// Appends `t=<millis>` to `url`, keeping any existing query
pub fn cache_busted_url(url: &Url, millis: i64) -> Url {
    let mut busted = url.clone();
    busted
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &millis.to_string());
    busted
}

/// Parses a manifest body and tags each entry with its position
pub fn parse_manifest(bytes: &[u8]) -> Result<Vec<MediaItem>> {
    let mut items: Vec<MediaItem> = serde_json::from_slice(bytes)?;
    for (idx, item) in items.iter_mut().enumerate() {
        item.idx = idx;
    }
    Ok(items)
}

/// Fetches and parses the manifest once. No retry.
pub async fn fetch_manifest(source: &ManifestSource) -> Result<Vec<MediaItem>> {
    tracing::info!(source = %source, "fetching manifest");

    let body = match source {
        ManifestSource::Local(path) => tokio::fs::read(path).await?,
        ManifestSource::Remote(url) => {
            let url = cache_busted_url(url, Utc::now().timestamp_millis());
            let response = assets::get(assets::http_client()?, url).await?;
            response.bytes().await?.to_vec()
        }
    };

    let items = parse_manifest(&body)?;
    tracing::debug!(count = items.len(), "manifest parsed");
    Ok(items)
}
