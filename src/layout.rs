use crate::model::Moodboard;

/// Uniform breathing room added on every side of the canvas, in pixels.
pub const PADDING: f64 = 50.0;

/// Canvas size used when a board has no elements at all.
pub const EMPTY_CANVAS: (u32, u32) = (1000, 1000);

/// Destination rectangle of one element, in canvas pixel coordinates.
/// Index-parallel with `Moodboard::elements`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<Placement>,
}

/// Compute the canvas extent and per-element destinations.
///
/// Element positions are arbitrary document-space floats, commonly negative;
/// everything is shifted by the minimum extent plus `PADDING` so each element
/// lands fully within the non-negative pixel grid.
pub fn compute(board: &Moodboard) -> Layout {
    if board.elements.is_empty() {
        return Layout {
            width: EMPTY_CANVAS.0,
            height: EMPTY_CANVAS.1,
            placements: Vec::new(),
        };
    }

    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for el in &board.elements {
        min_x = min_x.min(el.position.x);
        min_y = min_y.min(el.position.y);
        max_x = max_x.max(el.position.x + el.size.width);
        max_y = max_y.max(el.position.y + el.size.height);
    }

    let width = (max_x - min_x + PADDING * 2.0).round().max(1.0) as u32;
    let height = (max_y - min_y + PADDING * 2.0).round().max(1.0) as u32;

    let placements = board
        .elements
        .iter()
        .map(|el| Placement {
            x: (el.position.x - min_x + PADDING).round() as i64,
            y: (el.position.y - min_y + PADDING).round() as i64,
            width: el.size.width.round().max(0.0) as u32,
            height: el.size.height.round().max(0.0) as u32,
        })
        .collect();

    Layout {
        width,
        height,
        placements,
    }
}
