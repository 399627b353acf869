//! Hands playable media to the system's default player

use crate::assets::AssetLocation;
use crate::error::{GalleryError, Result};

/// Launches the default application for `location` without waiting for it
pub fn play(location: &AssetLocation) -> Result<()> {
    if let AssetLocation::Local(path) = location {
        if !path.exists() {
            return Err(GalleryError::Player(format!(
                "media not found: {}",
                path.display()
            )));
        }
    }

    let target = location.as_uri();
    tracing::info!(media = %target, "launching player");
    open::that_detached(&target).map_err(|e| GalleryError::Player(e.to_string()))
}
