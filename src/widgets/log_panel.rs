// filepath: photo-board/src/widgets/log_panel.rs
//! Bottom-anchored log panel mirroring button counters

use crate::draw::{Align, Color, FontFamily, Painter, TextStyle};
use crate::surface::{Drawable, Kind, Point, Rect, Size};
use crate::widgets::Button;

#[derive(Debug)]
pub struct LogPanel {
    padding: f64,
    line_width: f64,
    font_size: f64,
    entries: Vec<String>,
    bounds: Rect,
}

impl LogPanel {
    pub fn new(padding: f64, font_size: f64) -> Self {
        Self {
            padding,
            line_width: 1.0,
            font_size,
            entries: Vec::new(),
            bounds: Rect::default(),
        }
    }

    /// One `"{label} - {counter}"` line per button, in the order given
    pub fn derive<'a>(buttons: impl IntoIterator<Item = &'a Button>) -> Vec<String> {
        buttons
            .into_iter()
            .map(|b| format!("{} - {}", b.label(), b.counter()))
            .collect()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Height the panel takes for `lines` entries
    pub fn height_for(&self, lines: usize) -> f64 {
        lines as f64 * self.font_size + self.padding
    }

    /// Replace the entries with freshly derived ones and repaint
    pub fn show(&mut self, painter: &mut dyn Painter, entries: Vec<String>) {
        self.entries = entries;
        self.render(painter);
    }

    /// Bottom-anchored bounds on a surface of the given size
    fn place(&mut self, surface_width: f64, surface_height: f64) {
        let width = surface_width - self.padding * 2.0;
        let height = self.height_for(self.entries.len());
        self.bounds = Rect::from_xywh(
            self.padding,
            surface_height - (height + self.padding),
            width,
            height,
        );
    }
}

impl Drawable for LogPanel {
    fn kind(&self) -> Kind {
        Kind::LogPanel
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
        self.place(painter.width() as f64, painter.height() as f64);
        let Rect { origin, size } = self.bounds;

        painter.clear_rect(self.bounds.inflate(self.line_width));
        painter.fill_rect(self.bounds, Color::BLACK);
        painter.stroke_rect(self.bounds, self.line_width, Color::BLACK);

        let style = TextStyle {
            family: FontFamily::Mono,
            size: self.font_size as f32,
            color: Color::WHITE,
            align: Align::Center,
        };
        for (index, entry) in self.entries.iter().enumerate() {
            let line = Point::new(
                origin.x + size.width / 2.0,
                origin.y
                    + self.font_size * index as f64
                    + self.font_size / 2.0
                    + self.padding / 2.0,
            );
            painter.draw_text(entry, line, &style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Canvas, FontBook};
    use crate::store::{CounterStore, MemoryStore};
    use std::rc::Rc;

    #[test]
    fn entries_follow_button_order() {
        let store: Rc<dyn CounterStore> =
            Rc::new(MemoryStore::with_counters([("a", 3), ("b", 0)]));
        let buttons = [
            Button::new("a", "Button 1", Rect::from_xywh(0.0, 0.0, 10.0, 10.0), store.clone()),
            Button::new("b", "Button 2", Rect::from_xywh(0.0, 0.0, 10.0, 10.0), store),
        ];

        assert_eq!(
            LogPanel::derive(&buttons),
            vec!["Button 1 - 3".to_string(), "Button 2 - 0".to_string()]
        );
    }

    #[test]
    fn grows_upward_from_the_bottom() {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(400, 300, Color::WHITE);
        let mut panel = LogPanel::new(20.0, 16.0);

        panel.show(&mut canvas, vec!["a - 0".into(), "b - 1".into()]);
        assert_eq!(panel.bounds(), Rect::from_xywh(20.0, 228.0, 360.0, 52.0));

        panel.show(&mut canvas, vec!["a - 0".into(), "b - 1".into(), "c - 2".into()]);
        assert_eq!(panel.bounds(), Rect::from_xywh(20.0, 212.0, 360.0, 68.0));
        assert_eq!(canvas.pixel(30, 250), Some(Color::BLACK));
    }
}
