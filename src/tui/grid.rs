// Card grid geometry and pointer hit testing
use crate::domain::{CardView, ClickTarget};
use ratatui::layout::Rect;

use super::helpers::rect_contains;

/// Outer card size in cells, borders included
pub const CARD_WIDTH: u16 = 26;
pub const CARD_HEIGHT: u16 = 10;
/// Rows inside the card given to the thumbnail
pub const THUMB_ROWS: u16 = 6;

pub const DOWNLOAD_LABEL: &str = "[Download]";

/// Screen placement of one card and its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSlot {
    /// `_idx` of the item on this card
    pub idx: usize,
    /// Position within the visible list
    pub position: usize,
    pub area: Rect,
    pub thumb: Rect,
    pub title: Rect,
    pub download: Rect,
    pub badge: Rect,
}

/// Cards that fit on screen for the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: usize,
    pub visible_rows: usize,
    pub first_row: usize,
    pub slots: Vec<CardSlot>,
}

/// Number of card columns that fit in `width`
pub fn columns_for(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

fn card_slot(card: &CardView, position: usize, area: Rect) -> CardSlot {
    let inner = Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    let thumb_rows = THUMB_ROWS.min(inner.height);
    let title_y = inner.y + thumb_rows;
    let actions_y = title_y + 1;

    let download_width = (DOWNLOAD_LABEL.len() as u16).min(inner.width);
    let badge_width = (card.badge.as_str().len() as u16).min(inner.width);

    CardSlot {
        idx: card.idx,
        position,
        area,
        thumb: Rect::new(inner.x, inner.y, inner.width, thumb_rows),
        title: Rect::new(inner.x, title_y, inner.width, 1),
        download: Rect::new(inner.x, actions_y, download_width, 1),
        badge: Rect::new(
            inner.x + inner.width - badge_width,
            actions_y,
            badge_width,
            1,
        ),
    }
}

/// Lays out the cards that fit in `area`, scrolled so `selected` is on screen
pub fn layout_grid(area: Rect, cards: &[CardView], selected: usize) -> GridLayout {
    let columns = columns_for(area.width);
    let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);

    let selected_row = selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let mut slots = Vec::new();
    if area.width < CARD_WIDTH || area.height < CARD_HEIGHT {
        return GridLayout {
            columns,
            visible_rows,
            first_row,
            slots,
        };
    }

    let start = first_row * columns;
    let end = (start + visible_rows * columns).min(cards.len());

    for (position, card) in cards.iter().enumerate().take(end).skip(start) {
        let offset = position - start;
        let row = (offset / columns) as u16;
        let col = (offset % columns) as u16;
        let card_area = Rect::new(
            area.x + col * CARD_WIDTH,
            area.y + row * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        );
        slots.push(card_slot(card, position, card_area));
    }

    GridLayout {
        columns,
        visible_rows,
        first_row,
        slots,
    }
}

/// Clickable regions of the last drawn frame
///
/// Regions are registered outer-first; the most recently registered region
/// containing the pointer wins, so every click resolves to exactly one target.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, ClickTarget)>,
}

impl HitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, area: Rect, target: ClickTarget) {
        if area.width > 0 && area.height > 0 {
            self.regions.push((area, target));
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> ClickTarget {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| rect_contains(*area, column, row))
            .map(|(_, target)| *target)
            .unwrap_or(ClickTarget::None)
    }
}
