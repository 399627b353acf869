// TUI module for rendering the terminal interface
pub mod colors;
pub mod grid;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use grid::{layout_grid, CardSlot, GridLayout, HitMap};
pub use helpers::{centered_rect, format_file_size, truncate};
pub use input::{handle_key_event, handle_search_input, handle_viewer_input, KeyAction};

use crate::domain::viewer::AUDIO_POSTER_MAX_WIDTH;
use crate::domain::{CardView, ClickTarget, Gallery, GridView, LoadStatus, Presentation, ViewerView};
use crate::loader::{ImageRequest, ImageSource, ImageState};
use crate::preview::{pixels_to_cells, RenderedImage};
use grid::DOWNLOAD_LABEL;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Which part of the UI receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Grid or viewer navigation
    Browsing,
    /// Typing into the search box
    Searching,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
}

/// One-line notice shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// What the event loop needs from the frame it just drew
#[derive(Debug, Clone, Default)]
pub struct FrameInfo {
    pub hits: HitMap,
    /// Card columns, for vertical keyboard movement
    pub columns: usize,
}

/// Renders one full frame and returns its clickable regions
pub fn render(
    frame: &mut Frame,
    gallery: &Gallery,
    images: &mut dyn ImageSource,
    mode: InputMode,
    status: Option<&StatusMessage>,
) -> FrameInfo {
    let mut hits = HitMap::new();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search, category, sort, count
            Constraint::Min(0),    // Card grid
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], gallery, mode, &mut hits);
    let columns = render_body(frame, chunks[1], gallery, images, &mut hits);
    render_footer(frame, chunks[2], gallery, mode, status);

    if let Some(view) = gallery.viewer_view() {
        render_viewer(frame, gallery, &view, images, &mut hits);
    }

    match mode {
        InputMode::Help => render_help_overlay(frame),
        InputMode::Welcome => render_welcome_overlay(frame),
        InputMode::Browsing | InputMode::Searching => {}
    }

    FrameInfo { hits, columns }
}

fn control_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        ACCENT_HIGHLIGHT
    } else {
        BORDER_COLOR
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    gallery: &Gallery,
    mode: InputMode,
    hits: &mut HitMap,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(14),
        ])
        .split(area);

    let searching = mode == InputMode::Searching;
    let search_line = if gallery.query().is_empty() && !searching {
        Line::from(Span::styled(
            "Search titles (/)",
            Style::default().fg(TEXT_SECONDARY),
        ))
    } else {
        let mut spans = vec![Span::styled(
            gallery.query().to_string(),
            Style::default().fg(TEXT_PRIMARY),
        )];
        if searching {
            spans.push(Span::styled("▏", Style::default().fg(ACCENT_HIGHLIGHT)));
        }
        Line::from(spans)
    };
    frame.render_widget(
        Paragraph::new(search_line).block(control_block(" Search ", searching)),
        chunks[0],
    );
    hits.register(chunks[0], ClickTarget::SearchBox);

    let filter_line = Line::from(vec![
        Span::styled("◂ ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            gallery.filter().label(),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▸", Style::default().fg(TEXT_SECONDARY)),
    ]);
    frame.render_widget(
        Paragraph::new(filter_line)
            .alignment(Alignment::Center)
            .block(control_block(" Category ", false)),
        chunks[1],
    );
    hits.register(chunks[1], ClickTarget::FilterSelector);

    frame.render_widget(
        Paragraph::new(Span::styled(
            gallery.sort().label(),
            Style::default().fg(TEXT_PRIMARY),
        ))
        .alignment(Alignment::Center)
        .block(control_block(" Sort ", false)),
        chunks[2],
    );
    hits.register(chunks[2], ClickTarget::SortToggle);

    let count = format!("{}/{}", gallery.visible().len(), gallery.items().len());
    frame.render_widget(
        Paragraph::new(Span::styled(count, Style::default().fg(TEXT_SECONDARY)))
            .alignment(Alignment::Center)
            .block(control_block(" Items ", false)),
        chunks[3],
    );
}

/// Renders lines vertically centered in `area`
fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let padding = (area.height as usize).saturating_sub(lines.len()) / 2;
    let mut padded = vec![Line::from(""); padding];
    padded.extend(lines);

    frame.render_widget(
        Paragraph::new(padded)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    gallery: &Gallery,
    images: &mut dyn ImageSource,
    hits: &mut HitMap,
) -> usize {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(" Gallery ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match gallery.status() {
        LoadStatus::Loading => render_centered(
            frame,
            inner,
            vec![Line::from(Span::styled(
                "Loading…",
                Style::default().fg(TEXT_SECONDARY),
            ))],
        ),
        LoadStatus::Failed(detail) => render_centered(
            frame,
            inner,
            vec![
                Line::from(Span::styled(
                    gallery.load_failed_message(),
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    detail.clone(),
                    Style::default().fg(TEXT_SECONDARY),
                )),
            ],
        ),
        LoadStatus::Loaded => match gallery.grid() {
            GridView::Empty { message } => render_centered(
                frame,
                inner,
                vec![Line::from(Span::styled(
                    message,
                    Style::default().fg(TEXT_SECONDARY),
                ))],
            ),
            GridView::Cards(cards) => {
                let selected = gallery.selected();
                let layout = layout_grid(inner, &cards, selected);
                for slot in &layout.slots {
                    let card = &cards[slot.position];
                    render_card(frame, gallery, card, slot, slot.position == selected, images);
                    hits.register(slot.area, ClickTarget::Card(card.idx));
                    hits.register(slot.download, ClickTarget::CardDownload(card.idx));
                }
                return layout.columns;
            }
        },
    }

    grid::columns_for(inner.width)
}

fn render_card(
    frame: &mut Frame,
    gallery: &Gallery,
    card: &CardView,
    slot: &CardSlot,
    selected: bool,
    images: &mut dyn ImageSource,
) {
    let border = if selected {
        ACCENT_HIGHLIGHT
    } else {
        BORDER_COLOR
    };
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
        slot.area,
    );

    if card.thumb.is_empty() {
        render_centered(frame, slot.thumb, vec![placeholder_line(card.badge.as_str())]);
    } else {
        let request = ImageRequest::new(
            gallery.resolve(&card.thumb),
            slot.thumb.width,
            slot.thumb.height,
        );
        render_image_state(frame, slot.thumb, images.image(&request));
    }

    let mut title_style = Style::default().fg(TEXT_PRIMARY);
    if selected {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    frame.render_widget(
        Paragraph::new(Span::styled(
            truncate(&card.title, slot.title.width as usize),
            title_style,
        )),
        slot.title,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            DOWNLOAD_LABEL,
            Style::default().fg(ACCENT_SECONDARY),
        )),
        slot.download,
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            card.badge.as_str(),
            Style::default().fg(badge_color(card.badge)),
        )),
        slot.badge,
    );
}

fn placeholder_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(TEXT_SECONDARY)
            .add_modifier(Modifier::ITALIC),
    ))
}

fn render_image_state(frame: &mut Frame, area: Rect, state: ImageState) {
    match state {
        ImageState::Loading => render_centered(frame, area, vec![placeholder_line("…")]),
        ImageState::Ready(image) => render_image(frame, area, &image),
        ImageState::Error(_) => render_centered(frame, area, vec![placeholder_line("no preview")]),
    }
}

/// Draws a rendered image centered in `area`
fn render_image(frame: &mut Frame, area: Rect, image: &RenderedImage) {
    let width = image.cell_width().min(area.width);
    let height = image.cell_height().min(area.height);
    let target = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Paragraph::new(image.lines.clone()), target);
}

fn render_footer(
    frame: &mut Frame,
    area: Rect,
    gallery: &Gallery,
    mode: InputMode,
    status: Option<&StatusMessage>,
) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
    };
    let label = |l: &'static str| Span::styled(l, Style::default().fg(TEXT_SECONDARY));
    let sep = || Span::raw("  │  ");

    let line = if let Some(status) = status {
        let color = if status.is_error {
            ACCENT_PRIMARY
        } else {
            ACCENT_SECONDARY
        };
        Line::from(Span::styled(status.text.clone(), Style::default().fg(color)))
    } else if mode == InputMode::Searching {
        Line::from(vec![
            label("Type to search"),
            sep(),
            key("↵/Esc "),
            label("Done"),
        ])
    } else if gallery.is_viewer_open() {
        Line::from(vec![
            key("↵/p "),
            label("Play"),
            sep(),
            key("d "),
            label("Download"),
            sep(),
            key("Esc "),
            label("Close"),
        ])
    } else {
        Line::from(vec![
            key("/ "),
            label("Search"),
            sep(),
            key("f "),
            label("Category"),
            sep(),
            key("s "),
            label("Sort"),
            sep(),
            key("↵ "),
            label("Open"),
            sep(),
            key("d "),
            label("Download"),
            sep(),
            key("? "),
            label("Help"),
            sep(),
            key("q "),
            label("Quit"),
        ])
    };

    let footer = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

/// Renders the viewer overlay for the open item
fn render_viewer(
    frame: &mut Frame,
    gallery: &Gallery,
    view: &ViewerView,
    images: &mut dyn ImageSource,
    hits: &mut HitMap,
) {
    let screen = frame.area();
    let area = centered_rect(80, 80, screen);

    hits.register(screen, ClickTarget::ViewerBackground);
    hits.register(area, ClickTarget::ViewerContent);

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(
            " {} ",
            truncate(&view.title, area.width.saturating_sub(10) as usize)
        ))
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Close control sits on the top border
    let close = Rect::new(area.x + area.width.saturating_sub(5), area.y, area.width.min(3), 1);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "[x]",
            Style::default()
                .fg(ACCENT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        close,
    );
    hits.register(close, ClickTarget::ViewerClose);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    render_presentation(frame, gallery, &view.presentation, parts[0], images);

    let meta = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(DOWNLOAD_LABEL.len() as u16),
        ])
        .split(parts[1]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                view.title.clone(),
                Style::default()
                    .fg(TEXT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                view.category.as_str(),
                Style::default().fg(badge_color(view.category)),
            ),
        ])),
        meta[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            DOWNLOAD_LABEL,
            Style::default().fg(ACCENT_SECONDARY),
        )),
        meta[1],
    );
    hits.register(meta[1], ClickTarget::ViewerDownload);
}

fn player_lines(icon: &str, kind: &str, uri: String, flags: &[(&str, bool)]) -> Vec<Line<'static>> {
    let enabled: Vec<&str> = flags
        .iter()
        .filter(|(_, on)| *on)
        .map(|(name, _)| *name)
        .collect();

    vec![
        Line::from(Span::styled(
            format!("{} {}", icon, kind),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(uri, Style::default().fg(TEXT_SECONDARY))),
        Line::from(Span::styled(
            enabled.join(" · "),
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(Span::styled(
            "Press Enter or p to play",
            Style::default().fg(TEXT_PRIMARY),
        )),
    ]
}

fn render_presentation(
    frame: &mut Frame,
    gallery: &Gallery,
    presentation: &Presentation,
    area: Rect,
    images: &mut dyn ImageSource,
) {
    match presentation {
        Presentation::Image { src } => {
            let request = ImageRequest::new(gallery.resolve(src), area.width, area.height);
            render_image_state(frame, area, images.image(&request));
        }
        Presentation::Video {
            src,
            controls,
            autoplay,
            plays_inline,
        } => {
            let lines = player_lines(
                "▶",
                "Video",
                gallery.resolve(src).as_uri(),
                &[
                    ("controls", *controls),
                    ("autoplay", *autoplay),
                    ("inline", *plays_inline),
                ],
            );
            render_centered(frame, area, lines);
        }
        Presentation::Audio {
            poster,
            src,
            controls,
            autoplay,
        } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(4)])
                .split(area);

            let poster_width = pixels_to_cells(poster.max_width.min(AUDIO_POSTER_MAX_WIDTH))
                .min(parts[0].width);
            let poster_area = Rect::new(
                parts[0].x + (parts[0].width - poster_width) / 2,
                parts[0].y,
                poster_width,
                parts[0].height,
            );
            let request =
                ImageRequest::new(gallery.resolve(&poster.src), poster_area.width, poster_area.height);
            render_image_state(frame, poster_area, images.image(&request));

            let lines = player_lines(
                "♪",
                "Audio",
                gallery.resolve(src).as_uri(),
                &[("controls", *controls), ("autoplay", *autoplay)],
            );
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), parts[1]);
        }
        Presentation::Unsupported { message } => render_centered(
            frame,
            area,
            vec![Line::from(Span::styled(
                *message,
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ))],
        ),
    }
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK))
}

fn key_line(keys: &'static str, description: &'static str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", keys), Style::default().fg(color)),
        Span::raw(description),
    ])
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(60, 80, frame.area());

    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ");
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key_line("/", "Search titles", ACCENT_HIGHLIGHT),
        key_line("f / F", "Next / previous category", ACCENT_HIGHLIGHT),
        key_line("s", "Toggle newest / oldest first", ACCENT_HIGHLIGHT),
        key_line("←↑↓→ hjkl", "Move selection", TEXT_SECONDARY),
        key_line("Enter", "Open viewer", ACCENT_SECONDARY),
        key_line("d", "Download original", ACCENT_SECONDARY),
        Line::from(""),
        Line::from(Span::styled(
            "In the viewer",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        key_line("Enter / p", "Play in external player", ACCENT_SECONDARY),
        key_line("Esc / q / x", "Close viewer", ACCENT_PRIMARY),
        Line::from(""),
        key_line("Mouse", "Click cards, [Download] and [x]", TEXT_SECONDARY),
        key_line("q / Esc", "Quit", TEXT_SECONDARY),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame) {
    let area = centered_rect(70, 70, frame.area());

    frame.render_widget(Clear, area);

    let welcome_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Galleria",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Browse the images, videos and audio listed in your media manifest."),
        Line::from(""),
        Line::from(vec![
            Span::raw("  • Type "),
            Span::styled("/", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(" to search titles, "),
            Span::styled("f", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(" to filter by category"),
        ]),
        Line::from(vec![
            Span::raw("  • "),
            Span::styled("Enter", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" or a click opens an item, "),
            Span::styled("[Download]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw(" saves the original"),
        ]),
        Line::from(vec![
            Span::raw("  • Videos and audio play in your default player"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(overlay_block(" Galleria "))
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}
