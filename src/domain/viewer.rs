use super::{Category, DownloadLink, MediaItem};

/// Shown instead of a media element for uncategorized items
pub const UNSUPPORTED_MESSAGE: &str = "Unsupported media type";

/// Maximum display width of the audio poster, in CSS pixels
pub const AUDIO_POSTER_MAX_WIDTH: u32 = 320;

/// Thumbnail shown above an audio player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poster {
    pub src: String,
    pub max_width: u32,
}

/// The single primary presentation built for the open item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Image {
        src: String,
    },
    Video {
        src: String,
        controls: bool,
        autoplay: bool,
        plays_inline: bool,
    },
    /// Audio has no intrinsic visual, so the thumbnail precedes the player
    Audio {
        poster: Poster,
        src: String,
        controls: bool,
        autoplay: bool,
    },
    Unsupported {
        message: &'static str,
    },
}

impl Presentation {
    /// Source handed to a player, if this presentation plays anything
    pub fn playable_src(&self) -> Option<&str> {
        match self {
            Presentation::Video { src, .. } | Presentation::Audio { src, .. } => Some(src),
            Presentation::Image { .. } | Presentation::Unsupported { .. } => None,
        }
    }

    pub fn autoplays(&self) -> bool {
        match self {
            Presentation::Video { autoplay, .. } | Presentation::Audio { autoplay, .. } => {
                *autoplay
            }
            _ => false,
        }
    }

    pub fn has_media_element(&self) -> bool {
        !matches!(self, Presentation::Unsupported { .. })
    }
}

/// Viewer overlay view-model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerView {
    pub idx: usize,
    pub title: String,
    pub category: Category,
    pub presentation: Presentation,
    pub download: DownloadLink,
}

pub fn build_viewer(item: &MediaItem) -> ViewerView {
    let category = item.category();
    let presentation = match category {
        Category::Image => Presentation::Image {
            src: item.url.clone(),
        },
        Category::Video => Presentation::Video {
            src: item.url.clone(),
            controls: true,
            autoplay: true,
            plays_inline: true,
        },
        Category::Audio => Presentation::Audio {
            poster: Poster {
                src: item.thumb.clone(),
                max_width: AUDIO_POSTER_MAX_WIDTH,
            },
            src: item.url.clone(),
            controls: true,
            autoplay: true,
        },
        Category::Other => Presentation::Unsupported {
            message: UNSUPPORTED_MESSAGE,
        },
    };

    ViewerView {
        idx: item.idx,
        title: item.display_title().to_string(),
        category,
        presentation,
        download: item.download_link(),
    }
}
