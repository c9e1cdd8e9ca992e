#![forbid(unsafe_code)]

pub mod client;
pub mod compose;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod resolve;
pub mod serve;
pub mod text;

pub use client::{load_local, BoardClient, DEFAULT_API_BASE};
pub use compose::{render, RenderOutput, RenderWarning};
pub use error::{PinwallError, PinwallResult};
pub use layout::{Layout, Placement};
pub use model::{Element, ElementKind, Moodboard, Position, Size};
pub use resolve::{placeholder, RemoteFetch, SourceResolver};
