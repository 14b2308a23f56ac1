// filepath: photo-board/src/surface/registry.rs
//! Surface registry for embedded drawables
//!
//! The `Surface` owns the canvas geometry and style map, the embedded
//! widgets in registration order, and the listeners that route pointer
//! events to them.

use log::{debug, info};
use std::collections::BTreeMap;

use crate::draw::{Canvas, Color, Painter};
use crate::surface::{Drawable, EventSpec, Point, PointerEvent, Size};
use crate::widgets::Widget;

/// CSS-like properties applied on every full render
pub type StyleMap = BTreeMap<String, String>;

/// What a listener receives for every matching embed
pub struct Dispatch<'a> {
    pub event: &'a PointerEvent,
    /// Surface-local position of the event
    pub point: Point,
    /// Registration index of the matched embed
    pub index: usize,
    embeds: &'a mut [Widget],
    pub painter: &'a mut dyn Painter,
}

impl<'a> Dispatch<'a> {
    /// The embed the event was routed to
    pub fn target(&mut self) -> &mut Widget {
        &mut self.embeds[self.index]
    }

    /// All embeds and the painter at once, for handlers that repaint
    /// more than the target
    pub fn parts(&mut self) -> (&mut [Widget], &mut dyn Painter) {
        (&mut *self.embeds, &mut *self.painter)
    }
}

type Handler<C> = Box<dyn FnMut(Dispatch<'_>, &mut C)>;

struct Listener<C> {
    spec: EventSpec,
    handler: Handler<C>,
}

/// Owns embedded widgets and routes pointer events to them
pub struct Surface<C> {
    size: Size,
    /// Top-left of the surface in client coordinates
    origin: Point,
    styles: StyleMap,
    embeds: Vec<Widget>,
    listeners: Vec<Listener<C>>,
}

impl<C> Surface<C> {
    /// Create a new empty surface
    pub fn new(size: Size, styles: StyleMap) -> Self {
        Self {
            size,
            origin: Point::default(),
            styles,
            embeds: Vec::new(),
            listeners: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// Set the surface bounding rectangle origin in client coordinates
    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    /// Append an embed and return its registration index
    pub fn embed(&mut self, object: impl Into<Widget>) -> usize {
        let object = object.into();
        info!("Embedding {:?} at {:?}", object.kind(), object.bounds());
        self.embeds.push(object);
        self.embeds.len() - 1
    }

    pub fn embeds(&self) -> &[Widget] {
        &self.embeds
    }

    pub fn embeds_mut(&mut self) -> &mut [Widget] {
        &mut self.embeds
    }

    /// Register a handler for one drawable kind and pointer event type
    pub fn on<F>(&mut self, spec: EventSpec, handler: F)
    where
        F: FnMut(Dispatch<'_>, &mut C) + 'static,
    {
        debug!("Registering listener for {:?}", spec);
        self.listeners.push(Listener {
            spec,
            handler: Box::new(handler),
        });
    }

    /// Route a raw pointer event to every matching embed.
    ///
    /// Embeds are scanned in registration order and every embed whose kind
    /// matches and whose bounds contain the point fires; there is no
    /// occlusion. Returns the number of handler invocations.
    pub fn dispatch(
        &mut self,
        event: &PointerEvent,
        painter: &mut dyn Painter,
        context: &mut C,
    ) -> usize {
        let point = Point::new(event.client.x - self.origin.x, event.client.y - self.origin.y);
        let mut fired = 0;

        for listener in self.listeners.iter_mut() {
            if listener.spec.pointer != event.kind {
                continue;
            }
            for index in 0..self.embeds.len() {
                let object = &self.embeds[index];
                if object.kind() != listener.spec.kind || !object.within(point) {
                    continue;
                }
                (listener.handler)(
                    Dispatch {
                        event,
                        point,
                        index,
                        embeds: &mut self.embeds,
                        painter: &mut *painter,
                    },
                    context,
                );
                fired += 1;
            }
        }

        if fired == 0 {
            debug!("{:?} at ({:.1}, {:.1}) hit nothing", event.kind, point.x, point.y);
        }
        fired
    }

    /// Background colour from the style map
    pub fn background(&self) -> Color {
        self.styles
            .get("background")
            .and_then(|v| Color::parse_hex(v))
            .unwrap_or(Color::WHITE)
    }

    /// Full-surface reset. Embeds repaint themselves afterwards.
    pub fn render(&self, canvas: &mut Canvas) {
        for (property, value) in &self.styles {
            if property != "background" {
                debug!("Ignoring unsupported style {} = {}", property, value);
            }
        }
        let width = self.size.width.max(0.0) as u32;
        let height = self.size.height.max(0.0) as u32;
        info!("Rendering surface {}x{}", width, height);
        canvas.reset(width, height, self.background());
    }
}
