// filepath: photo-board/src/widgets/button.rs
//! Clickable button with a persisted click counter

use crate::draw::{Align, Color, FontFamily, Painter, TextStyle};
use crate::store::CounterStore;
use crate::surface::{Drawable, Kind, Point, Rect, Size};
use log::{debug, warn};
use std::fmt;
use std::rc::Rc;

/// Colours and font size for a button
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub fill: Color,
    pub disabled_fill: Color,
    pub text: Color,
    pub font_size: f32,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            fill: Color::BLACK,
            disabled_fill: Color::GREY,
            text: Color::WHITE,
            font_size: 16.0,
        }
    }
}

pub struct Button {
    id: String,
    label: String,
    bounds: Rect,
    line_width: f64,
    style: ButtonStyle,
    disabled: bool,
    counter: u64,
    store: Rc<dyn CounterStore>,
}

impl Button {
    /// Create a button, reading its counter from `store`
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        bounds: Rect,
        store: Rc<dyn CounterStore>,
    ) -> Self {
        let id = id.into();
        let counter = store.counter(&id);
        debug!("Button {} starts at {}", id, counter);
        Self {
            id,
            label: label.into(),
            bounds,
            line_width: 1.0,
            style: ButtonStyle::default(),
            disabled: false,
            counter,
            store,
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Update the counter and persist it. Storage failures are logged only.
    pub fn set_counter(&mut self, count: u64) {
        self.counter = count;
        if let Err(e) = self.store.put_counter(&self.id, count) {
            warn!("Failed to persist counter for {}: {}", self.id, e);
        }
    }

    pub fn increment(&mut self) {
        self.set_counter(self.counter + 1);
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("bounds", &self.bounds)
            .field("disabled", &self.disabled)
            .field("counter", &self.counter)
            .finish()
    }
}

impl Drawable for Button {
    fn kind(&self) -> Kind {
        Kind::Button
    }

    fn position(&self) -> Point {
        self.bounds.origin
    }

    fn size(&self) -> Size {
        self.bounds.size
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    fn render(&mut self, painter: &mut dyn Painter) {
        painter.clear_rect(self.bounds.inflate(self.line_width));
        let fill = if self.disabled {
            self.style.disabled_fill
        } else {
            self.style.fill
        };
        painter.fill_rect(self.bounds, fill);
        painter.stroke_rect(self.bounds, self.line_width, Color::BLACK);
        painter.draw_text(
            &self.label,
            self.bounds.center(),
            &TextStyle {
                family: FontFamily::Sans,
                size: self.style.font_size,
                color: self.style.text,
                align: Align::Center,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Canvas, FontBook};
    use crate::store::MemoryStore;

    fn button(store: Rc<dyn CounterStore>) -> Button {
        Button::new("btn-1", "Button 1", Rect::from_xywh(10.0, 10.0, 80.0, 40.0), store)
    }

    #[test]
    fn within_excludes_edges() {
        let b = button(Rc::new(MemoryStore::default()));
        assert!(!b.within(Point::new(10.0, 30.0)));
        assert!(!b.within(Point::new(40.0, 10.0)));
        assert!(!b.within(Point::new(90.0, 30.0)));
        assert!(!b.within(Point::new(40.0, 50.0)));
        assert!(b.within(Point::new(40.0, 30.0)));
        assert!(!b.within(Point::new(5.0, 5.0)));
    }

    #[test]
    fn counter_survives_reconstruction() {
        let store: Rc<dyn CounterStore> = Rc::new(MemoryStore::default());
        let mut b = button(store.clone());
        assert_eq!(b.counter(), 0);

        b.set_counter(7);
        let again = button(store);
        assert_eq!(again.counter(), 7);
    }

    #[test]
    fn increment_persists_and_keeps_other_ids() {
        let store = Rc::new(MemoryStore::with_counters([("other", 4), ("btn-1", 2)]));
        let mut b = button(store.clone());

        b.increment();

        assert_eq!(b.counter(), 3);
        assert_eq!(store.counter("btn-1"), 3);
        assert_eq!(store.counter("other"), 4);
    }

    #[test]
    fn disabled_button_renders_muted() {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(100, 60, Color::WHITE);
        let mut b = button(Rc::new(MemoryStore::default()));

        b.render(&mut canvas);
        assert_eq!(canvas.pixel(20, 20), Some(Color::BLACK));

        b.set_disabled(true);
        b.render(&mut canvas);
        assert_eq!(canvas.pixel(20, 20), Some(Color::GREY));
        assert_eq!(canvas.pixel(95, 55), Some(Color::WHITE));
    }
}
