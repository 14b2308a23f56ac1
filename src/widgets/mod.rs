// filepath: photo-board/src/widgets/mod.rs
//! Built-in widgets for photo-board
//!
//! `Widget` is the tagged union the surface stores; its variant is the
//! drawable kind listeners match on.

pub mod button;
pub mod log_panel;
pub mod viewer;

pub use button::{Button, ButtonStyle};
pub use log_panel::LogPanel;
pub use viewer::{ImageRequest, Viewer};

use crate::draw::Painter;
use crate::surface::{Drawable, Kind, Point, Size};

#[derive(Debug)]
pub enum Widget {
    Button(Button),
    Viewer(Viewer),
    LogPanel(LogPanel),
}

impl Widget {
    pub fn as_button(&self) -> Option<&Button> {
        match self {
            Widget::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Widget::Button(button) => Some(button),
            _ => None,
        }
    }

    pub fn as_viewer_mut(&mut self) -> Option<&mut Viewer> {
        match self {
            Widget::Viewer(viewer) => Some(viewer),
            _ => None,
        }
    }

    pub fn as_log_panel_mut(&mut self) -> Option<&mut LogPanel> {
        match self {
            Widget::LogPanel(panel) => Some(panel),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Drawable {
        match self {
            Widget::Button(w) => w,
            Widget::Viewer(w) => w,
            Widget::LogPanel(w) => w,
        }
    }
}

impl Drawable for Widget {
    fn kind(&self) -> Kind {
        self.inner().kind()
    }

    fn position(&self) -> Point {
        self.inner().position()
    }

    fn size(&self) -> Size {
        self.inner().size()
    }

    fn line_width(&self) -> f64 {
        self.inner().line_width()
    }

    fn within(&self, point: Point) -> bool {
        self.inner().within(point)
    }

    fn render(&mut self, painter: &mut dyn Painter) {
        match self {
            Widget::Button(w) => w.render(painter),
            Widget::Viewer(w) => w.render(painter),
            Widget::LogPanel(w) => w.render(painter),
        }
    }
}

impl From<Button> for Widget {
    fn from(button: Button) -> Self {
        Widget::Button(button)
    }
}

impl From<Viewer> for Widget {
    fn from(viewer: Viewer) -> Self {
        Widget::Viewer(viewer)
    }
}

impl From<LogPanel> for Widget {
    fn from(panel: LogPanel) -> Self {
        Widget::LogPanel(panel)
    }
}
