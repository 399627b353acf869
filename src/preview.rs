// Image preview rendering: decode, fit, and draw as half-block terminal lines

use crate::error::Result;
use image::{DynamicImage, GenericImageView, Pixel};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};

/// CSS pixels per terminal column when converting pixel bounds to cells
pub const PIXELS_PER_CELL: u32 = 8;

/// Decoded image rendered for the terminal
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// One line per terminal row, two pixel rows per line
    pub lines: Vec<Line<'static>>,
    /// Source dimensions in pixels
    pub source_width: u32,
    pub source_height: u32,
}

impl RenderedImage {
    /// Width in terminal cells
    pub fn cell_width(&self) -> u16 {
        self.lines.first().map(|l| l.spans.len() as u16).unwrap_or(0)
    }

    pub fn cell_height(&self) -> u16 {
        self.lines.len() as u16
    }
}

/// Decodes an image from raw bytes, sniffing the format
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Calculates new dimensions to fit image within max width and height while preserving aspect ratio
pub fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if original_width == 0 || original_height == 0 {
        return (0, 0);
    }

    let width_ratio = max_width as f64 / original_width as f64;
    let height_ratio = max_height as f64 / original_height as f64;

    let ratio = width_ratio.min(height_ratio);

    if ratio >= 1.0 {
        // Never upscale
        (original_width, original_height)
    } else {
        let new_width = ((original_width as f64 * ratio) as u32).max(1);
        let new_height = ((original_height as f64 * ratio) as u32).max(1);
        (new_width, new_height)
    }
}

/// Converts an image to styled lines using half-block characters.
/// The upper pixel is the foreground of `▀`, the lower pixel its background.
pub fn image_to_halfblock_lines(img: &DynamicImage, width: u32, height: u32) -> Vec<Line<'static>> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let height = if height % 2 == 0 { height } else { height + 1 };

    // Triangle is fast enough for large photos and good enough for a terminal
    let img = img.resize_exact(width, height, image::imageops::FilterType::Triangle);
    let img = img.to_rgb8();

    let term_height = height / 2;
    let mut lines = Vec::with_capacity(term_height as usize);

    for y in 0..term_height {
        let upper_y = y * 2;
        let lower_y = upper_y + 1;

        let mut spans = Vec::with_capacity(width as usize);

        for x in 0..width {
            let upper = img.get_pixel(x, upper_y).to_rgb();
            let lower = if lower_y < height {
                img.get_pixel(x, lower_y).to_rgb()
            } else {
                upper
            };

            let style = Style::default()
                .fg(Color::Rgb(upper[0], upper[1], upper[2]))
                .bg(Color::Rgb(lower[0], lower[1], lower[2]));

            spans.push(Span::styled("▀", style));
        }

        lines.push(Line::from(spans));
    }

    lines
}

/// Fits an image into `max_cols` x `max_rows` cells and renders it
pub fn render_image(img: &DynamicImage, max_cols: u16, max_rows: u16) -> RenderedImage {
    let (source_width, source_height) = img.dimensions();

    // Terminal cells are roughly twice as tall as wide, and each row holds two pixels
    let (width, height) = calculate_resize_dimensions(
        source_width,
        source_height,
        max_cols as u32,
        max_rows as u32 * 2,
    );

    RenderedImage {
        lines: image_to_halfblock_lines(img, width, height),
        source_width,
        source_height,
    }
}

/// Decodes and renders in one step; runs on a blocking worker thread
pub fn render_bytes(bytes: &[u8], max_cols: u16, max_rows: u16) -> Result<RenderedImage> {
    let img = decode_image(bytes)?;
    Ok(render_image(&img, max_cols, max_rows))
}

/// Converts a CSS pixel width bound into terminal columns
pub fn pixels_to_cells(pixels: u32) -> u16 {
    (pixels / PIXELS_PER_CELL).min(u16::MAX as u32) as u16
}
