use super::{Category, CategoryFilter, DownloadLink, MediaItem, SortOrder};

/// Placeholder shown instead of an empty card list
pub const EMPTY_PLACEHOLDER: &str = "No matching media";

/// Filters and sort direction applied to the item list
#[derive(Debug, Clone, Copy)]
pub struct ViewQuery<'a> {
    pub query: &'a str,
    pub filter: CategoryFilter,
    pub sort: SortOrder,
}

/// One card in the grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub idx: usize,
    pub title: String,
    pub thumb: String,
    /// Thumbnails are only fetched once the card is on screen
    pub lazy_thumb: bool,
    pub download: DownloadLink,
    pub badge: Category,
}

/// Result of one render pass: either cards or the placeholder, never an empty list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridView {
    Cards(Vec<CardView>),
    Empty { message: &'static str },
}

impl GridView {
    pub fn cards(&self) -> &[CardView] {
        match self {
            GridView::Cards(cards) => cards,
            GridView::Empty { .. } => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, GridView::Empty { .. })
    }
}

/// Category filter, then title search, then order by `_idx`
pub fn visible_items<'a>(items: &'a [MediaItem], view: &ViewQuery) -> Vec<&'a MediaItem> {
    let needle = view.query.trim().to_lowercase();

    let mut list: Vec<&MediaItem> = items
        .iter()
        .filter(|item| view.filter.matches(item.category()))
        .filter(|item| {
            needle.is_empty() || item.search_title().to_lowercase().contains(&needle)
        })
        .collect();

    match view.sort {
        SortOrder::NewestFirst => list.sort_by(|a, b| b.idx.cmp(&a.idx)),
        SortOrder::OldestFirst => list.sort_by(|a, b| a.idx.cmp(&b.idx)),
    }

    list
}

pub fn card_for(item: &MediaItem) -> CardView {
    CardView {
        idx: item.idx,
        title: item.display_title().to_string(),
        thumb: item.thumb.clone(),
        lazy_thumb: true,
        download: item.download_link(),
        badge: item.category(),
    }
}

/// Builds the full card list for one render pass
pub fn build_grid(items: &[MediaItem], view: &ViewQuery) -> GridView {
    let visible = visible_items(items, view);
    if visible.is_empty() {
        return GridView::Empty {
            message: EMPTY_PLACEHOLDER,
        };
    }
    GridView::Cards(visible.into_iter().map(card_for).collect())
}
