// CLI module for argument parsing and configuration

use crate::assets::AssetBase;
use crate::domain::{Category, CategoryFilter, SortOrder};
use crate::error::GalleryError;
use crate::manifest::{ManifestSource, DEFAULT_MANIFEST_PATH};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Galleria - browse a media manifest in the terminal
///
/// Search, filter and sort a JSON list of images, videos and audio,
/// open items in a viewer and download the originals.
#[derive(Parser, Debug, Clone)]
#[command(name = "galleria")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Manifest to load: a local path or an http(s) URL
    #[arg(default_value = DEFAULT_MANIFEST_PATH)]
    pub manifest: String,

    /// Initial category filter
    #[arg(short = 'f', long = "filter", value_enum, default_value = "all")]
    pub filter: FilterArg,

    /// Initial title search
    #[arg(short = 'q', long = "query")]
    pub query: Option<String>,

    /// Show the oldest entries first
    #[arg(long = "oldest", action = ArgAction::SetTrue)]
    pub oldest: bool,

    /// Directory or URL that relative thumb/url references resolve against
    #[arg(long = "base")]
    pub base: Option<String>,

    /// Where downloads are saved
    #[arg(short = 'o', long = "download-dir")]
    pub download_dir: Option<PathBuf>,

    /// Don't launch the player when a video or audio item is opened
    #[arg(long = "no-autoplay", action = ArgAction::SetTrue)]
    pub no_autoplay: bool,

    /// Show the welcome dialog even if it was already seen
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub welcome: bool,

    /// Log file (defaults to the platform cache directory)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}

/// Category filter options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum FilterArg {
    #[default]
    All,
    Image,
    Video,
    Audio,
    Other,
}

impl From<FilterArg> for CategoryFilter {
    fn from(filter: FilterArg) -> Self {
        match filter {
            FilterArg::All => CategoryFilter::All,
            FilterArg::Image => CategoryFilter::Only(Category::Image),
            FilterArg::Video => CategoryFilter::Only(Category::Video),
            FilterArg::Audio => CategoryFilter::Only(Category::Audio),
            FilterArg::Other => CategoryFilter::Only(Category::Other),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Args {
            manifest: DEFAULT_MANIFEST_PATH.to_string(),
            filter: FilterArg::All,
            query: None,
            oldest: false,
            base: None,
            download_dir: None,
            no_autoplay: false,
            welcome: false,
            log_file: None,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        self.manifest
            .parse::<ManifestSource>()
            .map_err(|e| e.to_string())?;

        if let Some(ref base) = self.base {
            AssetBase::parse(base).map_err(|e| e.to_string())?;
        }

        if let Some(ref dir) = self.download_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Download path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub manifest: ManifestSource,
    pub asset_base: AssetBase,
    pub filter: CategoryFilter,
    pub query: String,
    pub sort: SortOrder,
    pub download_dir: Option<PathBuf>,
    /// `false` when `--no-autoplay` was given; user config can still disable it
    pub autoplay: bool,
    pub show_welcome: bool,
    pub log_file: Option<PathBuf>,
}

impl TryFrom<Args> for AppConfig {
    type Error = GalleryError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let manifest: ManifestSource = args.manifest.parse()?;
        let asset_base = match args.base {
            Some(ref base) => AssetBase::parse(base)?,
            None => manifest.default_asset_base(),
        };

        Ok(AppConfig {
            manifest,
            asset_base,
            filter: args.filter.into(),
            query: args.query.unwrap_or_default(),
            sort: if args.oldest {
                SortOrder::OldestFirst
            } else {
                SortOrder::NewestFirst
            },
            download_dir: args.download_dir,
            autoplay: !args.no_autoplay,
            show_welcome: args.welcome,
            log_file: args.log_file,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            manifest: ManifestSource::default(),
            asset_base: AssetBase::WorkingDir,
            filter: CategoryFilter::All,
            query: String::new(),
            sort: SortOrder::NewestFirst,
            download_dir: None,
            autoplay: true,
            show_welcome: false,
            log_file: None,
        }
    }
}
