// Color palette shared by every widget
use ratatui::style::Color;

/// Errors and destructive emphasis
pub const ACCENT_PRIMARY: Color = Color::Rgb(239, 83, 80);
/// Download affordances and success messages
pub const ACCENT_SECONDARY: Color = Color::Rgb(102, 187, 106);
/// Selection, titles and focused controls
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(255, 202, 40);

pub const TEXT_PRIMARY: Color = Color::Rgb(236, 239, 241);
pub const TEXT_SECONDARY: Color = Color::Rgb(144, 164, 174);

pub const BG_DARK: Color = Color::Rgb(24, 26, 31);
pub const BORDER_COLOR: Color = Color::Rgb(84, 110, 122);

/// Badge color per media category
pub fn badge_color(category: crate::domain::Category) -> Color {
    use crate::domain::Category;
    match category {
        Category::Image => Color::Rgb(79, 195, 247),
        Category::Video => Color::Rgb(186, 104, 200),
        Category::Audio => Color::Rgb(255, 167, 38),
        Category::Other => TEXT_SECONDARY,
    }
}
