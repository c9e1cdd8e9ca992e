//! Secondary outputs derived straight from the normalized document,
//! bypassing layout and compositing.

use image::RgbaImage;

use crate::{
    model::{ElementKind, Moodboard},
    resolve::{placeholder, SourceResolver},
};

/// Decoded rasters for every image element with a non-empty `src`, in the
/// board's z-order. Downstream consumers expect at least one entry, so a
/// board with no qualifying elements yields a single placeholder.
pub fn images(board: &Moodboard, resolver: &SourceResolver) -> Vec<RgbaImage> {
    let mut out = Vec::new();
    for el in &board.elements {
        if el.kind != ElementKind::Image {
            continue;
        }
        let Some(src) = el.src.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };
        out.push(
            resolver
                .resolve_or_placeholder(src, board.base_path.as_deref())
                .image,
        );
    }
    if out.is_empty() {
        out.push(placeholder());
    }
    out
}

/// Newline-joined text of every text element with non-empty content, in
/// z-order. Empty string when none qualify.
pub fn text(board: &Moodboard) -> String {
    board
        .elements
        .iter()
        .filter(|el| el.kind == ElementKind::Text)
        .filter_map(|el| el.text.as_deref().filter(|t| !t.is_empty()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PinwallResult;
    use crate::model::{Element, Position, Size};
    use crate::resolve::{RemoteFetch, PLACEHOLDER_RGBA, PLACEHOLDER_SIZE};

    struct PanickingFetch;
    impl RemoteFetch for PanickingFetch {
        fn fetch(&self, url: &str) -> PinwallResult<Vec<u8>> {
            panic!("unexpected network fetch of {url}");
        }
    }

    fn offline_resolver() -> SourceResolver {
        SourceResolver::with_fetcher(Box::new(PanickingFetch))
    }

    fn element(kind: ElementKind, z: i64) -> Element {
        Element {
            id: String::new(),
            kind,
            position: Position::default(),
            size: Size::default(),
            z_index: z,
            src: None,
            text: None,
            color: None,
            fill_color: None,
            border_color: None,
        }
    }

    fn board(elements: Vec<Element>) -> Moodboard {
        Moodboard {
            id: "b".to_owned(),
            name: "t".to_owned(),
            elements,
            viewport: serde_json::Map::new(),
            base_path: None,
        }
    }

    #[test]
    fn text_joins_in_z_order() {
        let mut a = element(ElementKind::Text, 0);
        a.text = Some("A".to_owned());
        let mut b = element(ElementKind::Text, 1);
        b.text = Some("B".to_owned());
        assert_eq!(text(&board(vec![a, b])), "A\nB");
    }

    #[test]
    fn text_skips_empty_and_non_text_elements() {
        let mut empty = element(ElementKind::Text, 0);
        empty.text = Some(String::new());
        let mut image_el = element(ElementKind::Image, 1);
        image_el.text = Some("not text kind".to_owned());
        assert_eq!(text(&board(vec![empty, image_el])), "");
    }

    #[test]
    fn images_on_empty_board_returns_single_placeholder() {
        let out = images(&board(vec![]), &offline_resolver());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].dimensions(), (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert_eq!(out[0].get_pixel(0, 0).0, PLACEHOLDER_RGBA);
    }

    #[test]
    fn images_preserve_document_order() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 0, 0, 255]))
            .save(dir.path().join("first.png"))
            .unwrap();
        image::RgbaImage::from_pixel(3, 3, image::Rgba([2, 0, 0, 255]))
            .save(dir.path().join("second.png"))
            .unwrap();

        let mut first = element(ElementKind::Image, 0);
        first.src = Some("first.png".to_owned());
        let mut second = element(ElementKind::Image, 1);
        second.src = Some("second.png".to_owned());
        let mut b = board(vec![first, second]);
        b.base_path = Some(dir.path().to_path_buf());

        let out = images(&b, &offline_resolver());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].dimensions(), (2, 2));
        assert_eq!(out[1].dimensions(), (3, 3));
    }

    #[test]
    fn image_element_with_empty_src_is_skipped() {
        let mut el = element(ElementKind::Image, 0);
        el.src = Some(String::new());
        let out = images(&board(vec![el]), &offline_resolver());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get_pixel(0, 0).0, PLACEHOLDER_RGBA);
    }
}
