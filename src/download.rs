//! Saving full-resolution assets under their suggested file name

use crate::assets::{self, AssetLocation};
use crate::domain::DownloadLink;
use crate::error::{GalleryError, Result};
use futures_util::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Name used when the manifest gives no usable file name
const FALLBACK_NAME: &str = "download";

/// Finished download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Reduces a suggested name to a single safe path component
pub fn sanitize_file_name(suggested: &str) -> String {
    let name = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Picks the download directory: CLI flag, then user config, then the
/// platform download folder, then the working directory
pub fn resolve_download_dir(cli: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    cli.or(configured)
        .map(Path::to_path_buf)
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Whether both paths name the same existing file
async fn is_same_file(a: &Path, b: &Path) -> bool {
    match (
        tokio::fs::canonicalize(a).await,
        tokio::fs::canonicalize(b).await,
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

async fn write_chunks<S, B, E>(stream: S, target: &Path) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<GalleryError>,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = tokio::fs::File::create(target).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return Err(e.into()),
        };
        let chunk = chunk.as_ref();
        file.write_all(chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Streams a body into `target`, removing the partial file on any error
async fn write_stream<S, B, E>(stream: S, target: &Path) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<GalleryError>,
{
    let result = write_chunks(stream, target).await;
    if result.is_err() {
        if let Err(e) = tokio::fs::remove_file(target).await {
            tracing::debug!(dest = %target.display(), error = %e, "no partial file to remove");
        }
    }
    result
}

/// Saves `source` as `dest_dir/<sanitized suggested name>`
pub async fn download(
    source: AssetLocation,
    link: DownloadLink,
    dest_dir: PathBuf,
) -> Result<SavedFile> {
    let target = dest_dir.join(sanitize_file_name(&link.suggested_name));
    tracing::info!(source = %source.as_uri(), dest = %target.display(), "download started");

    tokio::fs::create_dir_all(&dest_dir).await?;

    let bytes = match &source {
        AssetLocation::Local(path) => {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(GalleryError::Download(format!(
                    "source not found: {}",
                    path.display()
                )));
            }
            // Copying a file onto itself would truncate it
            if is_same_file(path, &target).await {
                tracing::info!(dest = %target.display(), "source already at destination");
                tokio::fs::metadata(path).await?.len()
            } else {
                tokio::fs::copy(path, &target).await?
            }
        }
        AssetLocation::Remote(url) => {
            let response = assets::get(assets::http_client()?, url.clone()).await?;
            write_stream(response.bytes_stream(), &target).await?
        }
    };

    tracing::info!(dest = %target.display(), bytes, "download finished");
    Ok(SavedFile {
        path: target,
        bytes,
    })
}
