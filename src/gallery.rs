// filepath: photo-board/src/gallery.rs
//! Click state machine for photo-board
//!
//! The `Gallery` wires the buttons, log panel and viewer into a surface and
//! drives the click → disable → lookup → update → redraw cycle. Lookups and
//! image loads are handed to a `Scheduler` and come back as `Completion`s
//! on the same thread, so the only shared state is the in-flight ticket.

use crate::config::BoardConfig;
use crate::draw::{Canvas, Painter};
use crate::layout::calculate_board_layout;
use crate::photo::{LoadError, Photo};
use crate::store::CounterStore;
use crate::surface::{Dispatch, Drawable, EventSpec, Kind, PointerEvent, PointerKind, Size, Surface};
use crate::widgets::{Button, ImageRequest, LogPanel, Viewer, Widget};
use image::RgbaImage;
use log::{debug, info, warn};
use std::rc::Rc;

/// Token for the single outstanding lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub serial: u64,
    /// Registration index of the button that asked
    pub index: usize,
    pub id: String,
}

/// Result of work handed to a scheduler
#[derive(Debug)]
pub enum Completion {
    Lookup {
        ticket: Ticket,
        result: Result<Photo, LoadError>,
    },
    Image {
        generation: u64,
        result: Result<RgbaImage, LoadError>,
    },
}

/// Runs lookups and image loads off the event loop.
///
/// Every request must eventually come back through
/// [`Gallery::complete`], successful or not.
pub trait Scheduler {
    fn lookup(&mut self, ticket: Ticket);

    fn fetch_image(&mut self, request: ImageRequest);
}

/// State the click handler may touch while the surface is dispatching
pub struct Session<S> {
    scheduler: S,
    in_flight: Option<Ticket>,
    next_serial: u64,
}

impl<S: Scheduler> Session<S> {
    fn issue(&mut self, index: usize, id: &str) -> Ticket {
        self.next_serial += 1;
        let ticket = Ticket {
            serial: self.next_serial,
            index,
            id: id.to_string(),
        };
        self.in_flight = Some(ticket.clone());
        ticket
    }
}

pub struct Gallery<S: Scheduler> {
    config: BoardConfig,
    surface: Surface<Session<S>>,
    session: Session<S>,
    log_panel: usize,
    viewer: usize,
}

impl<S: Scheduler + 'static> Gallery<S> {
    /// Build every widget and register the button click handler
    pub fn new(config: BoardConfig, store: Rc<dyn CounterStore>, size: Size, scheduler: S) -> Self {
        let mut surface = Surface::new(size, config.styles.clone());
        let log_panel = LogPanel::new(config.padding, config.font_size);
        let layout = calculate_board_layout(
            &config,
            size,
            config.buttons.len(),
            log_panel.height_for(config.buttons.len()),
        );

        let style = config.button_style();
        for (button, bounds) in config.buttons.iter().zip(&layout.buttons) {
            surface.embed(
                Button::new(&button.id, &button.label, *bounds, Rc::clone(&store)).with_style(style),
            );
        }
        let log_panel = surface.embed(log_panel);
        let viewer = surface.embed(Viewer::new(layout.viewer));

        surface.on(
            EventSpec::new(Kind::Button, PointerKind::Click),
            on_button_click::<S>,
        );

        Self {
            config,
            surface,
            session: Session {
                scheduler,
                in_flight: None,
                next_serial: 0,
            },
            log_panel,
            viewer,
        }
    }

    /// Full frame: reset the canvas, then every embed repaints itself
    pub fn render(&mut self, canvas: &mut Canvas) {
        self.surface.render(canvas);
        self.refresh_log(canvas);
        for embed in self.surface.embeds_mut() {
            if embed.kind() != Kind::LogPanel {
                embed.render(canvas);
            }
        }
    }

    /// New surface size: lay everything out again and repaint
    pub fn resize(&mut self, size: Size, canvas: &mut Canvas) {
        info!("Resizing board to {}x{}", size.width, size.height);
        self.surface.resize(size);
        let count = self.buttons().count();
        let log_height = self
            .surface
            .embeds_mut()
            .get_mut(self.log_panel)
            .and_then(Widget::as_log_panel_mut)
            .map(|panel| panel.height_for(count))
            .unwrap_or_default();
        let layout = calculate_board_layout(&self.config, size, count, log_height);

        let mut bounds = layout.buttons.into_iter();
        for embed in self.surface.embeds_mut() {
            match embed {
                Widget::Button(button) => {
                    if let Some(rect) = bounds.next() {
                        button.set_bounds(rect);
                    }
                }
                Widget::Viewer(viewer) => viewer.set_frame(layout.viewer),
                Widget::LogPanel(_) => {}
            }
        }
        self.render(canvas);
    }

    /// Route a pointer event; returns how many handlers ran
    pub fn handle_pointer(&mut self, event: &PointerEvent, painter: &mut dyn Painter) -> usize {
        self.surface.dispatch(event, painter, &mut self.session)
    }

    /// Apply finished work from the scheduler
    pub fn complete(&mut self, completion: Completion, painter: &mut dyn Painter) {
        match completion {
            Completion::Lookup { ticket, result } => self.finish_lookup(ticket, result, painter),
            Completion::Image { generation, result } => {
                if let Some(viewer) = self.viewer_mut() {
                    viewer.finish(painter, generation, result);
                }
            }
        }
    }

    fn finish_lookup(
        &mut self,
        ticket: Ticket,
        result: Result<Photo, LoadError>,
        painter: &mut dyn Painter,
    ) {
        if self.session.in_flight.as_ref() != Some(&ticket) {
            debug!("Discarding stale lookup {} for {}", ticket.serial, ticket.id);
            return;
        }
        self.session.in_flight = None;

        let Some(button) = self
            .surface
            .embeds_mut()
            .get_mut(ticket.index)
            .and_then(Widget::as_button_mut)
        else {
            warn!("Lookup finished for unknown embed {}", ticket.index);
            return;
        };

        match result {
            Ok(photo) => {
                button.increment();
                button.set_disabled(false);
                button.render(painter);
                info!("{} loaded, clicked {} times", button.label(), button.counter());

                self.refresh_log(painter);
                let url = photo.urls.regular;
                if let Some(request) = self
                    .viewer_mut()
                    .and_then(|viewer| viewer.render_image(painter, Some(&url)))
                {
                    self.session.scheduler.fetch_image(request);
                }
            }
            Err(e) => {
                warn!("Lookup for {} failed: {}", ticket.id, e);
                button.set_disabled(false);
                button.render(painter);
            }
        }
    }

    /// Derive the log entries from the buttons and repaint the panel
    fn refresh_log(&mut self, painter: &mut dyn Painter) {
        let entries = LogPanel::derive(self.buttons());
        if let Some(panel) = self
            .surface
            .embeds_mut()
            .get_mut(self.log_panel)
            .and_then(Widget::as_log_panel_mut)
        {
            panel.show(painter, entries);
        }
    }

    fn viewer_mut(&mut self) -> Option<&mut Viewer> {
        self.surface
            .embeds_mut()
            .get_mut(self.viewer)
            .and_then(Widget::as_viewer_mut)
    }
}

impl<S: Scheduler> Gallery<S> {
    /// Buttons in registration order
    pub fn buttons(&self) -> impl Iterator<Item = &Button> {
        self.surface.embeds().iter().filter_map(Widget::as_button)
    }

    pub fn button(&self, id: &str) -> Option<&Button> {
        self.buttons().find(|b| b.id() == id)
    }

    pub fn viewer(&self) -> Option<&Viewer> {
        match self.surface.embeds().get(self.viewer) {
            Some(Widget::Viewer(viewer)) => Some(viewer),
            _ => None,
        }
    }

    pub fn log_entries(&self) -> &[String] {
        match self.surface.embeds().get(self.log_panel) {
            Some(Widget::LogPanel(panel)) => panel.entries(),
            _ => &[],
        }
    }

    pub fn in_flight(&self) -> Option<&Ticket> {
        self.session.in_flight.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.session.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.session.scheduler
    }
}

/// Start a lookup for the clicked button unless it is already loading
fn on_button_click<S: Scheduler>(mut hit: Dispatch<'_>, session: &mut Session<S>) {
    let index = hit.index;
    let (embeds, painter) = hit.parts();

    match embeds[index].as_button() {
        Some(button) if button.disabled() => {
            debug!("{} is already loading, ignoring click", button.label());
            return;
        }
        Some(_) => {}
        None => return,
    }

    if let Some(previous) = session.in_flight.take() {
        info!("Superseding lookup for {}", previous.id);
        if let Some(button) = embeds.get_mut(previous.index).and_then(Widget::as_button_mut) {
            button.set_disabled(false);
            button.render(painter);
        }
    }

    let Some(button) = embeds[index].as_button_mut() else {
        return;
    };
    button.set_disabled(true);
    button.render(painter);

    let ticket = session.issue(index, button.id());
    info!("Looking up {} for {}", ticket.id, button.label());
    session.scheduler.lookup(ticket);
}
