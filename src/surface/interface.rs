// filepath: photo-board/src/surface/interface.rs
//! Surface interface definitions
//!
//! This file defines the geometry types, the pointer events the surface
//! understands, and the `Drawable` trait every embedded object implements.

use crate::draw::Painter;

/// Pixel coordinates, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Non-negative pixel extents
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Rectangle used for layout, hit-testing and damage tracking
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub const fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    /// Strict containment: points on an edge are outside.
    pub fn contains(&self, point: Point) -> bool {
        point.y > self.origin.y
            && point.y < self.bottom()
            && point.x > self.origin.x
            && point.x < self.right()
    }

    /// Grow the rectangle by `by` pixels on every side
    pub fn inflate(&self, by: f64) -> Self {
        Self::from_xywh(
            self.origin.x - by,
            self.origin.y - by,
            self.size.width + by * 2.0,
            self.size.height + by * 2.0,
        )
    }

    /// Pixel span covering this rectangle: `(x, y, width, height)`.
    pub fn to_pixels(&self) -> (i32, i32, u32, u32) {
        let x0 = self.origin.x.floor() as i32;
        let y0 = self.origin.y.floor() as i32;
        let x1 = self.right().ceil() as i32;
        let y1 = self.bottom().ceil() as i32;
        (x0, y0, (x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32)
    }
}

/// Concrete kind of an embedded drawable, used for event routing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Button,
    Viewer,
    LogPanel,
}

/// Raw pointer event types the surface can route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Motion,
    Press,
    Release,
    /// Press followed by release on the same surface
    Click,
}

/// Pointer event in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub client: Point,
    /// Linux input button code, zero for motion
    pub button: u32,
}

impl PointerEvent {
    pub fn click(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Click,
            client: Point::new(x, y),
            button: BTN_LEFT,
        }
    }
}

/// Left mouse button code from linux/input-event-codes.h
pub const BTN_LEFT: u32 = 0x110;

/// Which embeds a listener wants: a drawable kind and a pointer event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventSpec {
    pub kind: Kind,
    pub pointer: PointerKind,
}

impl EventSpec {
    pub const fn new(kind: Kind, pointer: PointerKind) -> Self {
        Self { kind, pointer }
    }
}

/// Core trait that every object embedded in a surface implements
pub trait Drawable {
    /// Kind tag used to match listeners
    fn kind(&self) -> Kind;

    fn position(&self) -> Point;

    fn size(&self) -> Size;

    fn line_width(&self) -> f64 {
        1.0
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.position(), self.size())
    }

    /// Hit-test in surface-local coordinates
    fn within(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Repaint this object only; callers never clear the whole surface first
    fn render(&mut self, painter: &mut dyn Painter);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_outside() {
        let rect = Rect::from_xywh(10.0, 20.0, 100.0, 50.0);
        assert!(!rect.contains(Point::new(10.0, 40.0)));
        assert!(!rect.contains(Point::new(50.0, 20.0)));
        assert!(!rect.contains(Point::new(110.0, 40.0)));
        assert!(!rect.contains(Point::new(50.0, 70.0)));
        assert!(rect.contains(Point::new(10.5, 20.5)));
        assert!(rect.contains(Point::new(60.0, 45.0)));
        assert!(!rect.contains(Point::new(200.0, 45.0)));
    }

    #[test]
    fn pixel_span_covers_fractional_rect() {
        let rect = Rect::from_xywh(0.5, 1.25, 10.0, 3.5);
        assert_eq!(rect.to_pixels(), (0, 1, 11, 4));
        assert_eq!(rect.inflate(1.0).to_pixels(), (-1, 0, 13, 6));
    }
}
