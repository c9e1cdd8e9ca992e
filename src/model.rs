use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{PinwallError, PinwallResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Closed set of element variants. Anything the upstream editor adds that we
/// do not recognize lands on `Unknown` and renders as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Image,
    Text,
    Box,
    Unknown,
}

impl ElementKind {
    fn from_type_str(s: &str) -> Self {
        match s {
            "image" => Self::Image,
            "text" => Self::Text,
            "box" => Self::Box,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub position: Position,
    pub size: Size,
    pub z_index: i64,
    pub src: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub fill_color: Option<String>,
    pub border_color: Option<String>,
}

impl Element {
    /// Tolerant per-element parse. Upstream exports use camelCase keys
    /// (`zIndex`, `fillColor`, `borderColor`); every field is optional and
    /// numeric fields default to 0. A non-object entry is unparseable and
    /// yields `None`; it must not abort the surrounding document parse.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let pos = obj.get("position");
        let size = obj.get("size");

        Some(Self {
            id: str_field(obj.get("id")).unwrap_or_default(),
            kind: str_field(obj.get("type"))
                .as_deref()
                .map(ElementKind::from_type_str)
                .unwrap_or(ElementKind::Unknown),
            position: Position {
                x: f64_field(pos, "x"),
                y: f64_field(pos, "y"),
            },
            size: Size {
                width: f64_field(size, "width"),
                height: f64_field(size, "height"),
            },
            z_index: obj.get("zIndex").and_then(Value::as_i64).unwrap_or(0),
            src: str_field(obj.get("src")),
            text: str_field(obj.get("text")),
            color: str_field(obj.get("color")),
            fill_color: str_field(obj.get("fillColor")),
            border_color: str_field(obj.get("borderColor")),
        })
    }
}

fn str_field(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

fn f64_field(parent: Option<&Value>, key: &str) -> f64 {
    parent
        .and_then(|v| v.get(key))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

/// Normalized moodboard document. Immutable after construction; `elements`
/// is kept in ascending `z_index` order, which is the compositing draw order.
#[derive(Clone, Debug)]
pub struct Moodboard {
    pub id: String,
    pub name: String,
    pub elements: Vec<Element>,
    pub viewport: serde_json::Map<String, Value>,
    /// Set only for documents loaded from a local folder; enables local-first
    /// image resolution. `None` for remotely fetched boards.
    pub base_path: Option<PathBuf>,
}

impl Moodboard {
    /// Normalize one of the known upstream JSON shapes into a `Moodboard`.
    ///
    /// Shape precedence, first match wins:
    /// 1. `{"board": {...}}` — remote API single-board response
    /// 2. `{"projects": [{...}, ...]}` — local export, first project selected
    /// 3. `{"document": {...}}` — legacy wrapper
    /// 4. the mapping itself
    ///
    /// Only a non-object top level is a hard error; malformed individual
    /// elements are skipped and missing fields are defaulted.
    pub fn from_value(value: &Value, base_path: Option<&Path>) -> PinwallResult<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| PinwallError::parse("moodboard document must be a JSON object"))?;

        let doc = select_document(root);

        let mut elements: Vec<Element> = doc
            .get("elements")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(Element::from_value)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        // Stable, so input order breaks z ties.
        elements.sort_by_key(|el| el.z_index);

        Ok(Self {
            id: str_field(doc.get("id")).unwrap_or_default(),
            name: str_field(doc.get("name")).unwrap_or_else(|| "Untitled".to_owned()),
            elements,
            viewport: doc
                .get("viewport")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            base_path: base_path.map(Path::to_path_buf),
        })
    }
}

fn select_document<'a>(
    root: &'a serde_json::Map<String, Value>,
) -> &'a serde_json::Map<String, Value> {
    if let Some(board) = root.get("board").and_then(Value::as_object) {
        return board;
    }
    if let Some(first) = root
        .get("projects")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(Value::as_object)
    {
        return first;
    }
    if let Some(doc) = root.get("document").and_then(Value::as_object) {
        return doc;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn board_wrapper_takes_precedence_over_projects() {
        let value = json!({
            "board": {"id": "b1", "name": "from board", "elements": []},
            "projects": [{"id": "p1", "name": "from projects", "elements": []}],
        });
        let board = Moodboard::from_value(&value, None).unwrap();
        assert_eq!(board.id, "b1");
        assert_eq!(board.name, "from board");
    }

    #[test]
    fn projects_wrapper_selects_first_project() {
        let value = json!({
            "projects": [
                {"id": "p1", "elements": []},
                {"id": "p2", "elements": []},
            ],
        });
        let board = Moodboard::from_value(&value, None).unwrap();
        assert_eq!(board.id, "p1");
    }

    #[test]
    fn document_wrapper_and_raw_fallback() {
        let wrapped = json!({"document": {"id": "d1"}});
        assert_eq!(Moodboard::from_value(&wrapped, None).unwrap().id, "d1");

        let raw = json!({"id": "r1", "elements": []});
        let board = Moodboard::from_value(&raw, None).unwrap();
        assert_eq!(board.id, "r1");
        assert_eq!(board.name, "Untitled");
    }

    #[test]
    fn non_object_top_level_is_a_hard_error() {
        assert!(Moodboard::from_value(&json!([1, 2, 3]), None).is_err());
        assert!(Moodboard::from_value(&json!("nope"), None).is_err());
    }

    #[test]
    fn malformed_element_is_skipped_not_fatal() {
        let value = json!({
            "elements": [
                "not an object",
                {"id": "ok", "type": "box", "zIndex": 3},
                42,
            ],
        });
        let board = Moodboard::from_value(&value, None).unwrap();
        assert_eq!(board.elements.len(), 1);
        assert_eq!(board.elements[0].id, "ok");
        assert_eq!(board.elements[0].kind, ElementKind::Box);
    }

    #[test]
    fn missing_fields_default() {
        let value = json!({"elements": [{}]});
        let board = Moodboard::from_value(&value, None).unwrap();
        let el = &board.elements[0];
        assert_eq!(el.kind, ElementKind::Unknown);
        assert_eq!(el.position, Position { x: 0.0, y: 0.0 });
        assert_eq!(
            el.size,
            Size {
                width: 0.0,
                height: 0.0
            }
        );
        assert_eq!(el.z_index, 0);
        assert!(el.src.is_none());
    }

    #[test]
    fn camel_case_keys_are_read() {
        let value = json!({
            "elements": [{
                "type": "box",
                "zIndex": 7,
                "fillColor": "#112233",
                "borderColor": "445566",
            }],
        });
        let board = Moodboard::from_value(&value, None).unwrap();
        let el = &board.elements[0];
        assert_eq!(el.z_index, 7);
        assert_eq!(el.fill_color.as_deref(), Some("#112233"));
        assert_eq!(el.border_color.as_deref(), Some("445566"));
    }

    #[test]
    fn elements_sorted_by_z_index_stably() {
        let value = json!({
            "elements": [
                {"id": "a", "zIndex": 2},
                {"id": "b", "zIndex": 1},
                {"id": "c", "zIndex": 2},
                {"id": "d", "zIndex": 0},
            ],
        });
        let board = Moodboard::from_value(&value, None).unwrap();
        let ids: Vec<&str> = board.elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["d", "b", "a", "c"]);
    }

    #[test]
    fn unrecognized_type_maps_to_unknown() {
        let value = json!({"elements": [{"type": "sticker"}]});
        let board = Moodboard::from_value(&value, None).unwrap();
        assert_eq!(board.elements[0].kind, ElementKind::Unknown);
    }
}
