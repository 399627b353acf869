//! Core gallery model: media items, categories and the state-owning `Gallery`

pub mod interaction;
pub mod pipeline;
pub mod viewer;

use crate::assets::{AssetBase, AssetLocation};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub use interaction::{ClickOutcome, ClickTarget};
pub use pipeline::{CardView, GridView, ViewQuery, EMPTY_PLACEHOLDER};
pub use viewer::{Poster, Presentation, ViewerView, UNSUPPORTED_MESSAGE};

/// One manifest entry
///
/// Every field is lenient: the manifest carries no schema, so missing, `null`
/// or non-scalar values become empty, numbers are kept as text and unknown
/// keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Original filename, also the suggested download name
    #[serde(deserialize_with = "lenient_string", default)]
    pub file: String,
    /// Display label, falls back to `file`
    #[serde(deserialize_with = "lenient_option", default)]
    pub title: Option<String>,
    /// Extension-like tag used for classification
    #[serde(rename = "type", deserialize_with = "lenient_string", default)]
    pub media_type: String,
    /// Full-resolution asset
    #[serde(deserialize_with = "lenient_string", default)]
    pub url: String,
    /// Thumbnail asset
    #[serde(deserialize_with = "lenient_string", default)]
    pub thumb: String,
    /// Position in the loaded manifest, assigned once at load
    #[serde(rename = "_idx", skip_deserializing, default)]
    pub idx: usize,
}

/// Text form of a scalar manifest value; `null`, `false`, arrays and objects have none
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Null | Value::Bool(false) | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_option<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

impl MediaItem {
    /// Title shown on cards and in the viewer
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.file,
        }
    }

    /// Title used for search matching; an absent title never matches a non-empty query
    pub fn search_title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn category(&self) -> Category {
        Category::classify(&self.media_type)
    }

    pub fn download_link(&self) -> DownloadLink {
        DownloadLink {
            href: self.url.clone(),
            suggested_name: self.file.clone(),
        }
    }
}

/// Download affordance shared by cards and the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Full-resolution asset location, as written in the manifest
    pub href: String,
    /// File name offered when saving
    pub suggested_name: String,
}

/// Fixed media category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Image,
    Video,
    Audio,
    Other,
}

/// Substring patterns per category, checked in table order.
/// Matching is case-sensitive; anything unmatched is `Other`.
const CATEGORY_PATTERNS: &[(Category, &[&str])] = &[
    (Category::Image, &["jpg", "jpeg", "png", "gif", "webp"]),
    (Category::Video, &["mp4", "mov", "webm", "mkv"]),
    (Category::Audio, &["mp3", "wav", "ogg", "flac", "m4a"]),
];

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Image,
        Category::Video,
        Category::Audio,
        Category::Other,
    ];

    /// Maps a type tag to its category
    pub fn classify(type_tag: &str) -> Self {
        CATEGORY_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| type_tag.contains(p)))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selector value: `all` or a single category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Selector options in display order
    pub const OPTIONS: [CategoryFilter; 5] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Image),
        CategoryFilter::Only(Category::Video),
        CategoryFilter::Only(Category::Audio),
        CategoryFilter::Only(Category::Other),
    ];

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::OPTIONS.iter().position(|f| *f == self).unwrap_or(0);
        Self::OPTIONS[(pos + 1) % Self::OPTIONS.len()]
    }

    pub fn previous(self) -> Self {
        let pos = Self::OPTIONS.iter().position(|f| *f == self).unwrap_or(0);
        Self::OPTIONS[(pos + Self::OPTIONS.len() - 1) % Self::OPTIONS.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

/// Sort direction over manifest position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Highest `_idx` first
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        }
    }

    /// Label for the sort toggle control
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::NewestFirst => "Newest first",
            SortOrder::OldestFirst => "Oldest first",
        }
    }
}

/// Manifest load status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Loaded,
    /// Terminal for the session; the grid shows this message instead of cards
    Failed(String),
}

/// Message shown in place of the grid when the manifest at `source` cannot be loaded
pub fn load_failed_message(source: &str) -> String {
    format!("Failed to load media list. Check that {} exists.", source)
}

/// Application state: the single owner of the item list and all view settings
#[derive(Debug)]
pub struct Gallery {
    items: Vec<MediaItem>,
    status: LoadStatus,
    base: AssetBase,
    /// Manifest path or URL, as shown in the load failure message
    source: String,
    query: String,
    filter: CategoryFilter,
    sort: SortOrder,
    /// Position of the selected card within the visible list
    selected: usize,
    /// `_idx` of the item open in the viewer
    viewer: Option<usize>,
}

impl Gallery {
    pub fn new(base: AssetBase) -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Loading,
            base,
            source: crate::manifest::DEFAULT_MANIFEST_PATH.to_string(),
            query: String::new(),
            filter: CategoryFilter::All,
            sort: SortOrder::NewestFirst,
            selected: 0,
            viewer: None,
        }
    }

    /// Builds a gallery that already holds `items` (positions are reassigned)
    pub fn with_items(base: AssetBase, items: Vec<MediaItem>) -> Self {
        let mut gallery = Self::new(base);
        gallery.apply_load(Ok(items));
        gallery
    }

    /// Installs the loader's outcome. A failure leaves the list empty.
    pub fn apply_load(&mut self, result: Result<Vec<MediaItem>>) {
        match result {
            Ok(mut items) => {
                for (idx, item) in items.iter_mut().enumerate() {
                    item.idx = idx;
                }
                tracing::info!(count = items.len(), "manifest loaded");
                self.items = items;
                self.status = LoadStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "manifest load failed");
                self.items.clear();
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
        self.selected = 0;
        self.viewer = None;
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Failure message naming this gallery's manifest source
    pub fn load_failed_message(&self) -> String {
        load_failed_message(&self.source)
    }

    pub fn asset_base(&self) -> &AssetBase {
        &self.base
    }

    pub fn resolve(&self, href: &str) -> AssetLocation {
        self.base.resolve(href)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.selected = 0;
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.selected = 0;
    }

    pub fn cycle_filter(&mut self, forward: bool) {
        let next = if forward {
            self.filter.next()
        } else {
            self.filter.previous()
        };
        self.set_filter(next);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self) {
        self.sort = self.sort.toggled();
        tracing::debug!(sort = self.sort.label(), "sort toggled");
    }

    fn view_query(&self) -> ViewQuery<'_> {
        ViewQuery {
            query: &self.query,
            filter: self.filter,
            sort: self.sort,
        }
    }

    /// Items passing the current filters, in display order
    pub fn visible(&self) -> Vec<&MediaItem> {
        pipeline::visible_items(&self.items, &self.view_query())
    }

    /// Card view-model for the current filters
    pub fn grid(&self) -> GridView {
        pipeline::build_grid(&self.items, &self.view_query())
    }

    /// Selected position, clamped to the visible list
    pub fn selected(&self) -> usize {
        let len = self.visible().len();
        self.selected.min(len.saturating_sub(1))
    }

    pub fn selected_item(&self) -> Option<&MediaItem> {
        self.visible().get(self.selected()).copied()
    }

    /// Moves the selection by `delta` cards, clamped to the visible list
    pub fn move_selection(&mut self, delta: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let current = self.selected() as isize;
        self.selected = (current + delta).clamp(0, len as isize - 1) as usize;
    }

    /// Selects the visible card holding item `idx`
    pub fn select_item(&mut self, idx: usize) {
        if let Some(pos) = self.visible().iter().position(|item| item.idx == idx) {
            self.selected = pos;
        }
    }

    pub fn item(&self, idx: usize) -> Option<&MediaItem> {
        self.items.get(idx)
    }

    /// Opens the viewer for item `idx`, replacing any open item
    pub fn open_viewer(&mut self, idx: usize) -> bool {
        if idx >= self.items.len() {
            return false;
        }
        self.select_item(idx);
        self.viewer = Some(idx);
        tracing::debug!(idx, "viewer opened");
        true
    }

    pub fn open_selected(&mut self) -> bool {
        match self.selected_item().map(|item| item.idx) {
            Some(idx) => self.open_viewer(idx),
            None => false,
        }
    }

    pub fn close_viewer(&mut self) {
        self.viewer = None;
    }

    pub fn is_viewer_open(&self) -> bool {
        self.viewer.is_some()
    }

    pub fn viewer_item(&self) -> Option<&MediaItem> {
        self.viewer.and_then(|idx| self.items.get(idx))
    }

    /// Viewer view-model for the open item
    pub fn viewer_view(&self) -> Option<ViewerView> {
        self.viewer_item().map(viewer::build_viewer)
    }

    /// Applies a resolved click and reports what the caller still has to do
    pub fn click(&mut self, target: ClickTarget) -> ClickOutcome {
        let outcome = interaction::dispatch_click(target, self.viewer);
        match outcome {
            ClickOutcome::OpenViewer(idx) => {
                self.open_viewer(idx);
            }
            ClickOutcome::CloseViewer => self.close_viewer(),
            ClickOutcome::ToggleSort => self.toggle_sort(),
            ClickOutcome::CycleFilter => self.cycle_filter(true),
            ClickOutcome::Download(idx) => self.select_item(idx),
            ClickOutcome::FocusSearch | ClickOutcome::Nothing => {}
        }
        outcome
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::GalleryError;

    mod category_tests {
        use super::*;

        #[test]
        fn test_classify_image() {
            assert_eq!(Category::classify("jpg"), Category::Image);
            assert_eq!(Category::classify("jpeg"), Category::Image);
            assert_eq!(Category::classify("png"), Category::Image);
            assert_eq!(Category::classify("gif"), Category::Image);
            assert_eq!(Category::classify("webp"), Category::Image);
        }

        #[test]
        fn test_classify_video() {
            assert_eq!(Category::classify("mp4"), Category::Video);
            assert_eq!(Category::classify("webm"), Category::Video);
            assert_eq!(Category::classify("mov"), Category::Video);
            assert_eq!(Category::classify("mkv"), Category::Video);
        }

        #[test]
        fn test_classify_audio() {
            assert_eq!(Category::classify("mp3"), Category::Audio);
            assert_eq!(Category::classify("wav"), Category::Audio);
            assert_eq!(Category::classify("ogg"), Category::Audio);
            assert_eq!(Category::classify("flac"), Category::Audio);
            assert_eq!(Category::classify("m4a"), Category::Audio);
        }

        #[test]
        fn test_classify_other() {
            assert_eq!(Category::classify("pdf"), Category::Other);
            assert_eq!(Category::classify(""), Category::Other);
            assert_eq!(Category::classify("zip"), Category::Other);
        }

        #[test]
        fn test_classify_substring_match() {
            assert_eq!(Category::classify("image/png"), Category::Image);
            assert_eq!(Category::classify("video/mp4"), Category::Video);
            assert_eq!(Category::classify(".mp3"), Category::Audio);
        }

        #[test]
        fn test_classify_is_case_sensitive() {
            assert_eq!(Category::classify("JPG"), Category::Other);
            assert_eq!(Category::classify("MP4"), Category::Other);
        }

        #[test]
        fn test_classify_is_deterministic() {
            for tag in ["jpg", "mp4", "mp3", "pdf", "", "weird"] {
                assert_eq!(Category::classify(tag), Category::classify(tag));
            }
        }

        #[test]
        fn test_category_display() {
            let labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
            assert_eq!(labels, vec!["image", "video", "audio", "other"]);
        }
    }

    mod filter_and_sort_tests {
        use super::*;

        #[test]
        fn test_filter_cycle_visits_every_option() {
            let mut filter = CategoryFilter::All;
            let mut seen = vec![filter];
            for _ in 0..4 {
                filter = filter.next();
                seen.push(filter);
            }
            assert_eq!(seen, CategoryFilter::OPTIONS.to_vec());
            assert_eq!(filter.next(), CategoryFilter::All);
        }

        #[test]
        fn test_filter_previous_wraps() {
            assert_eq!(
                CategoryFilter::All.previous(),
                CategoryFilter::Only(Category::Other)
            );
            assert_eq!(
                CategoryFilter::Only(Category::Image).previous(),
                CategoryFilter::All
            );
        }

        #[test]
        fn test_filter_matches() {
            assert!(CategoryFilter::All.matches(Category::Other));
            assert!(CategoryFilter::Only(Category::Audio).matches(Category::Audio));
            assert!(!CategoryFilter::Only(Category::Audio).matches(Category::Video));
        }

        #[test]
        fn test_sort_toggle_labels() {
            assert_eq!(SortOrder::default(), SortOrder::NewestFirst);
            assert_eq!(SortOrder::NewestFirst.label(), "Newest first");
            assert_eq!(SortOrder::OldestFirst.label(), "Oldest first");
            assert_eq!(SortOrder::NewestFirst.toggled().toggled(), SortOrder::NewestFirst);
        }
    }

    mod media_item_tests {
        use super::*;

        #[test]
        fn test_display_title_falls_back_to_file() {
            let untitled = item("b.mp4", None, "mp4");
            assert_eq!(untitled.display_title(), "b.mp4");

            let blank = item("c.mp3", Some(""), "mp3");
            assert_eq!(blank.display_title(), "c.mp3");

            let titled = item("a.jpg", Some("Cat"), "jpg");
            assert_eq!(titled.display_title(), "Cat");
        }

        #[test]
        fn test_search_title_ignores_file() {
            let untitled = item("b.mp4", None, "mp4");
            assert_eq!(untitled.search_title(), "");
        }

        #[test]
        fn test_download_link_uses_file_name() {
            let link = item("a.jpg", Some("Cat"), "jpg").download_link();
            assert_eq!(link.href, "/a.jpg");
            assert_eq!(link.suggested_name, "a.jpg");
        }
    }

    mod gallery_tests {
        use super::*;

        #[test]
        fn test_new_gallery_is_loading() {
            let gallery = Gallery::new(AssetBase::WorkingDir);
            assert_eq!(gallery.status(), &LoadStatus::Loading);
            assert!(gallery.items().is_empty());
        }

        #[test]
        fn test_apply_load_assigns_positions() {
            let gallery = gallery(vec![
                item("a.jpg", None, "jpg"),
                item("b.jpg", None, "jpg"),
                item("c.jpg", None, "jpg"),
            ]);
            let idxs: Vec<usize> = gallery.items().iter().map(|i| i.idx).collect();
            assert_eq!(idxs, vec![0, 1, 2]);
            assert_eq!(gallery.status(), &LoadStatus::Loaded);
        }

        #[test]
        fn test_apply_load_failure_leaves_list_empty() {
            let mut gallery = gallery(cat_and_video());
            gallery.apply_load(Err(GalleryError::Download("boom".to_string())));
            assert!(gallery.items().is_empty());
            assert!(matches!(gallery.status(), LoadStatus::Failed(_)));
            assert!(matches!(gallery.grid(), GridView::Empty { .. }));
        }

        #[test]
        fn test_load_failed_message_names_source() {
            let mut gallery = Gallery::new(AssetBase::WorkingDir);
            assert_eq!(
                gallery.load_failed_message(),
                "Failed to load media list. Check that ./data/list.json exists."
            );

            gallery.set_source("/srv/site/media.json");
            assert_eq!(gallery.source(), "/srv/site/media.json");
            assert!(gallery
                .load_failed_message()
                .contains("Check that /srv/site/media.json exists."));
        }

        #[test]
        fn test_selection_is_clamped() {
            let mut gallery = gallery(cat_and_video());
            gallery.move_selection(10);
            assert_eq!(gallery.selected(), 1);
            gallery.move_selection(-10);
            assert_eq!(gallery.selected(), 0);
        }

        #[test]
        fn test_query_change_resets_selection() {
            let mut gallery = gallery(cat_and_video());
            gallery.move_selection(1);
            gallery.push_query_char('c');
            assert_eq!(gallery.selected(), 0);
            assert_eq!(gallery.query(), "c");
            gallery.pop_query_char();
            assert_eq!(gallery.query(), "");
        }

        #[test]
        fn test_selected_item_follows_sort() {
            let mut gallery = gallery(cat_and_video());
            assert_eq!(gallery.selected_item().unwrap().file, "b.mp4");
            gallery.toggle_sort();
            assert_eq!(gallery.selected_item().unwrap().file, "a.jpg");
        }

        #[test]
        fn test_open_and_close_viewer() {
            let mut gallery = gallery(cat_and_video());
            assert!(gallery.open_viewer(0));
            assert_eq!(gallery.viewer_item().unwrap().file, "a.jpg");
            assert_eq!(gallery.selected_item().unwrap().file, "a.jpg");

            assert!(gallery.open_viewer(1));
            assert_eq!(gallery.viewer_item().unwrap().file, "b.mp4");

            gallery.close_viewer();
            assert!(!gallery.is_viewer_open());
            assert!(gallery.viewer_view().is_none());
        }

        #[test]
        fn test_open_viewer_out_of_range() {
            let mut gallery = gallery(cat_and_video());
            assert!(!gallery.open_viewer(7));
            assert!(!gallery.is_viewer_open());
        }

        #[test]
        fn test_open_selected_on_empty_list() {
            let mut gallery = gallery(vec![]);
            assert!(!gallery.open_selected());
        }
    }
}
