// filepath: photo-board/src/surface/mod.rs
//! Interactive surface for photo-board
//!
//! Re-exports the geometry, event and drawable types together with the
//! `Surface` that owns embeds and dispatches pointer events to them.

pub mod interface;
mod registry;

pub use interface::{
    Drawable, EventSpec, Kind, Point, PointerEvent, PointerKind, Rect, Size, BTN_LEFT,
};
pub use registry::{Dispatch, StyleMap, Surface};
