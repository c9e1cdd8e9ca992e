//! Best-effort text rasterization for text elements.
//!
//! Glyphs are rasterized with fontdue. A named system font is probed first;
//! when none is available the embedded DejaVu Sans is used so text always
//! renders the same way everywhere.

use std::sync::OnceLock;

use fontdue::{Font, FontSettings};
use image::{Pixel as _, Rgba, RgbaImage};

pub const FONT_SIZE: f32 = 24.0;

const EMBEDDED_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONT: OnceLock<Font> = OnceLock::new();

fn font() -> &'static Font {
    FONT.get_or_init(|| {
        for path in SYSTEM_FONT_PATHS {
            if let Ok(bytes) = std::fs::read(path) {
                if let Ok(font) = Font::from_bytes(bytes, FontSettings::default()) {
                    tracing::debug!(path, "using system font");
                    return font;
                }
            }
        }
        Font::from_bytes(EMBEDDED_FONT, FontSettings::default())
            .expect("embedded fallback font parses")
    })
}

/// Draw `text` onto `canvas` with its top-left anchored at `(x, y)`.
/// Newlines start a new line; glyphs outside the canvas are clipped.
pub fn draw_text(canvas: &mut RgbaImage, x: i64, y: i64, text: &str, color: Rgba<u8>) {
    let font = font();
    let (ascent, line_height) = match font.horizontal_line_metrics(FONT_SIZE) {
        Some(m) => (m.ascent, m.new_line_size),
        None => (FONT_SIZE, FONT_SIZE * 1.2),
    };

    let mut baseline = y as f32 + ascent;
    for line in text.split('\n') {
        let mut pen_x = x as f32;
        for ch in line.chars() {
            let (metrics, coverage) = font.rasterize(ch, FONT_SIZE);
            let glyph_x = (pen_x + metrics.xmin as f32).round() as i64;
            let glyph_y = (baseline - metrics.ymin as f32).round() as i64 - metrics.height as i64;
            blit_coverage(canvas, glyph_x, glyph_y, &coverage, metrics.width, color);
            pen_x += metrics.advance_width;
        }
        baseline += line_height;
    }
}

fn blit_coverage(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    coverage: &[u8],
    glyph_width: usize,
    color: Rgba<u8>,
) {
    if glyph_width == 0 {
        return;
    }
    let (cw, ch) = canvas.dimensions();
    for (i, &cov) in coverage.iter().enumerate() {
        if cov == 0 {
            continue;
        }
        let px = x + (i % glyph_width) as i64;
        let py = y + (i / glyph_width) as i64;
        if px < 0 || py < 0 || px >= i64::from(cw) || py >= i64::from(ch) {
            continue;
        }
        let alpha = (u16::from(color.0[3]) * u16::from(cov) / 255) as u8;
        let src = Rgba([color.0[0], color.0[1], color.0[2], alpha]);
        canvas
            .get_pixel_mut(px as u32, py as u32)
            .blend(&src);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_loads_and_has_metrics() {
        let f = font();
        assert!(f.horizontal_line_metrics(FONT_SIZE).is_some());
    }

    #[test]
    fn draw_text_produces_visible_pixels() {
        let mut canvas = RgbaImage::new(120, 40);
        draw_text(&mut canvas, 0, 0, "Hi", Rgba([0, 0, 255, 255]));
        let touched = canvas.pixels().filter(|p| p.0[3] > 0).count();
        assert!(touched > 0);
        assert!(canvas.pixels().all(|p| p.0[0] == 0 && p.0[1] == 0));
    }

    #[test]
    fn drawing_out_of_bounds_is_clipped_not_panicking() {
        let mut canvas = RgbaImage::new(10, 10);
        draw_text(&mut canvas, -500, -500, "clipped", Rgba([0, 0, 0, 255]));
        draw_text(&mut canvas, 500, 500, "clipped", Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn newline_advances_to_next_line() {
        let mut one = RgbaImage::new(60, 80);
        let mut two = RgbaImage::new(60, 80);
        draw_text(&mut one, 0, 0, "l", Rgba([0, 0, 0, 255]));
        draw_text(&mut two, 0, 0, "l\nl", Rgba([0, 0, 0, 255]));
        let rows_touched = |img: &RgbaImage| {
            (0..img.height())
                .filter(|&yy| (0..img.width()).any(|xx| img.get_pixel(xx, yy).0[3] > 0))
                .count()
        };
        assert!(rows_touched(&two) > rows_touched(&one));
    }
}
