pub mod config;
pub mod draw;
pub mod gallery;
pub mod layout;
pub mod loader;
pub mod photo;
pub mod store;
pub mod surface;
pub mod widgets;

pub use crate::draw::{Canvas, Painter};
pub use crate::gallery::{Completion, Gallery, Scheduler, Ticket};
pub use crate::surface::{Drawable, EventSpec, Kind, PointerEvent, PointerKind, Surface};
