use image::{imageops, Rgba, RgbaImage};

use crate::{
    layout,
    model::{Element, ElementKind, Moodboard},
    resolve::SourceResolver,
    text,
};

/// Border thickness for box elements, in pixels.
const BORDER_PX: i64 = 1;

const DEFAULT_TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// One per-element degradation that happened during a render. The render
/// itself still completed; the element was replaced by the placeholder.
#[derive(Clone, Debug)]
pub struct RenderWarning {
    pub element_id: String,
    pub src: String,
    pub reason: String,
}

pub struct RenderOutput {
    pub image: RgbaImage,
    pub warnings: Vec<RenderWarning>,
}

/// Flatten a moodboard into a single RGBA raster.
///
/// Elements are drawn in the board's stored order (ascending `z_index`) onto
/// a transparent canvas sized by [`layout::compute`]. A structurally valid
/// board always renders; broken image references degrade to placeholders and
/// are reported in `warnings`.
pub fn render(board: &Moodboard, resolver: &SourceResolver) -> RenderOutput {
    let layout = layout::compute(board);
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    let mut warnings = Vec::new();

    for (el, place) in board.elements.iter().zip(&layout.placements) {
        match el.kind {
            ElementKind::Image => draw_image(&mut canvas, board, el, *place, resolver, &mut warnings),
            ElementKind::Box => draw_box(&mut canvas, el, *place),
            ElementKind::Text => draw_text_element(&mut canvas, el, *place),
            ElementKind::Unknown => {}
        }
    }

    RenderOutput {
        image: canvas,
        warnings,
    }
}

fn draw_image(
    canvas: &mut RgbaImage,
    board: &Moodboard,
    el: &Element,
    place: layout::Placement,
    resolver: &SourceResolver,
    warnings: &mut Vec<RenderWarning>,
) {
    let Some(src) = el.src.as_deref().filter(|s| !s.is_empty()) else {
        return;
    };
    if place.width == 0 || place.height == 0 {
        return;
    }

    let resolved = resolver.resolve_or_placeholder(src, board.base_path.as_deref());
    if let Some(reason) = resolved.substituted {
        warnings.push(RenderWarning {
            element_id: el.id.clone(),
            src: src.to_owned(),
            reason,
        });
    }

    let resized = imageops::resize(
        &resolved.image,
        place.width,
        place.height,
        imageops::FilterType::Lanczos3,
    );
    imageops::overlay(canvas, &resized, place.x, place.y);
}

fn draw_box(canvas: &mut RgbaImage, el: &Element, place: layout::Placement) {
    let fill = parse_hex_color(el.fill_color.as_deref());
    let border = parse_hex_color(el.border_color.as_deref());
    if fill.is_none() && border.is_none() {
        return;
    }
    if place.width == 0 || place.height == 0 {
        return;
    }

    // The shape is built on its own transparent layer and composited in one
    // step, so an overlapping fill and border cannot double-blend against the
    // canvas.
    let mut layer = RgbaImage::new(canvas.width(), canvas.height());
    if let Some(color) = fill {
        fill_rect(&mut layer, place, color);
    }
    if let Some(color) = border {
        stroke_rect(&mut layer, place, color);
    }
    imageops::overlay(canvas, &layer, 0, 0);
}

fn draw_text_element(canvas: &mut RgbaImage, el: &Element, place: layout::Placement) {
    let Some(content) = el.text.as_deref().filter(|t| !t.is_empty()) else {
        return;
    };
    let color = parse_hex_color(el.color.as_deref()).unwrap_or(DEFAULT_TEXT_COLOR);
    text::draw_text(canvas, place.x, place.y, content, color);
}

fn fill_rect(layer: &mut RgbaImage, place: layout::Placement, color: Rgba<u8>) {
    let (w, h) = layer.dimensions();
    for y in place.y..place.y + i64::from(place.height) {
        for x in place.x..place.x + i64::from(place.width) {
            if x >= 0 && y >= 0 && x < i64::from(w) && y < i64::from(h) {
                layer.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}

fn stroke_rect(layer: &mut RgbaImage, place: layout::Placement, color: Rgba<u8>) {
    let x1 = place.x + i64::from(place.width);
    let y1 = place.y + i64::from(place.height);
    let (w, h) = layer.dimensions();
    let mut put = |x: i64, y: i64| {
        if x >= 0 && y >= 0 && x < i64::from(w) && y < i64::from(h) {
            layer.put_pixel(x as u32, y as u32, color);
        }
    };
    for x in place.x..x1 {
        for t in 0..BORDER_PX {
            put(x, place.y + t);
            put(x, y1 - 1 - t);
        }
    }
    for y in place.y..y1 {
        for t in 0..BORDER_PX {
            put(place.x + t, y);
            put(x1 - 1 - t, y);
        }
    }
}

/// Parse a `#RRGGBB` hex string into an opaque RGBA color. A missing `#` is
/// tolerated; anything else unparsable yields `None` (meaning "do not draw").
pub fn parse_hex_color(color: Option<&str>) -> Option<Rgba<u8>> {
    let hex = color?.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}
