// filepath: src/app.rs
//! Main application logic for photo-board

use crate::pointer::ClickTracker;
use log::{debug, info, warn};
use photo_board::config::BoardConfig;
use photo_board::draw::Canvas;
use photo_board::loader::ThreadScheduler;
use photo_board::surface::{PointerEvent, Size};
use photo_board::{Completion, Gallery};
use smithay_client_toolkit::{
    compositor::CompositorState,
    compositor::Region,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::{
        wlr_layer::{Anchor, KeyboardInteractivity, LayerSurface},
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm},
};
use wayland_client::protocol::{wl_pointer, wl_shm};
use wayland_client::Proxy;

pub struct AppData {
    registry_state: RegistryState,
    output_state: OutputState,
    seat_state: SeatState,
    compositor_state: CompositorState,
    shm_state: Shm,
    layer_surface: Option<LayerSurface>,
    pool: SlotPool,
    pub(crate) width: u32,
    pub(crate) height: u32,
    configured: bool,
    pointer: Option<wl_pointer::WlPointer>,
    click_tracker: ClickTracker,
    gallery: Gallery<ThreadScheduler>,
    canvas: Canvas,
    input_region: Option<Region>,
    pub(crate) exit: bool,
}

impl AppData {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registry_state: RegistryState,
        output_state: OutputState,
        seat_state: SeatState,
        compositor_state: CompositorState,
        shm_state: Shm,
        layer_surface: LayerSurface,
        pool: SlotPool,
        config: &BoardConfig,
        gallery: Gallery<ThreadScheduler>,
        canvas: Canvas,
    ) -> Self {
        info!("Configuring layer surface");
        layer_surface.set_anchor(Anchor::TOP);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_size(config.width, config.height);
        layer_surface.set_exclusive_zone(-1);
        layer_surface.set_margin(0, 0, 0, 0);
        info!("Committing layer surface configuration");
        layer_surface.wl_surface().commit();

        Self {
            registry_state,
            output_state,
            seat_state,
            compositor_state,
            shm_state,
            layer_surface: Some(layer_surface),
            pool,
            width: config.width,
            height: config.height,
            configured: false,
            pointer: None,
            click_tracker: ClickTracker::default(),
            gallery,
            canvas,
            input_region: None,
            exit: false,
        }
    }

    /// Apply a compositor configure: the first one, or a size change,
    /// triggers a full layout and render
    pub fn apply_configure(&mut self, width: u32, height: u32) {
        let first = !self.configured;
        let changed = width != self.width || height != self.height;
        self.width = width;
        self.height = height;
        self.configured = true;

        if first || changed {
            self.set_full_input_region();
            self.gallery
                .resize(Size::new(width as f64, height as f64), &mut self.canvas);
        }
    }

    pub fn click_tracker(&mut self) -> &mut ClickTracker {
        &mut self.click_tracker
    }

    pub fn handle_pointer(&mut self, event: &PointerEvent) {
        if !self.configured {
            return;
        }
        self.gallery.handle_pointer(event, &mut self.canvas);
    }

    pub fn complete(&mut self, completion: Completion) {
        self.gallery.complete(completion, &mut self.canvas);
    }

    /// Copy the canvas into a fresh buffer and commit the damaged regions
    pub fn present(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.configured {
            debug!("present() called before surface is configured, skipping");
            return Ok(());
        }
        let damage = self.canvas.take_damage();
        if damage.is_empty() {
            return Ok(());
        }
        let Some(layer_surface) = &self.layer_surface else {
            return Ok(());
        };

        let width = self.width;
        let height = self.height;
        let stride = width * 4;
        let (buffer, canvas) = self.pool.create_buffer(
            width as i32,
            height as i32,
            stride as i32,
            wl_shm::Format::Argb8888,
        )?;

        let pixels = self.canvas.pixels();
        if pixels.len() != canvas.len() {
            warn!(
                "Canvas is {} bytes but buffer is {}, skipping frame",
                pixels.len(),
                canvas.len()
            );
            return Ok(());
        }
        canvas.copy_from_slice(pixels);

        let surface = layer_surface.wl_surface();
        if let Err(e) = buffer.attach_to(surface) {
            warn!("Failed to attach buffer: {:?}", e);
            return Ok(());
        }
        for rect in damage {
            let (x, y, w, h) = rect.to_pixels();
            surface.damage_buffer(x, y, w as i32, h as i32);
        }
        surface.commit();
        debug!("Presented {}x{}", width, height);

        Ok(())
    }

    pub fn set_full_input_region(&mut self) {
        if let Some(layer_surface) = &self.layer_surface {
            let surface = layer_surface.wl_surface();
            match Region::new(&self.compositor_state) {
                Ok(region) => {
                    region.add(0, 0, self.width as i32, self.height as i32);
                    surface.set_input_region(Some(region.wl_region()));
                    self.input_region = Some(region);
                    info!(
                        "Set input region to (0, 0, {}, {}) for surface {:?}",
                        self.width,
                        self.height,
                        surface.id()
                    );
                }
                Err(e) => {
                    warn!("Failed to create input region: {e}");
                }
            }
        } else {
            warn!("set_full_input_region called but no layer_surface present");
        }
    }

    pub fn registry_state(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }

    pub fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    pub fn seat_state(&mut self) -> &mut SeatState {
        &mut self.seat_state
    }

    pub fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm_state
    }

    pub fn set_pointer(&mut self, pointer: Option<wl_pointer::WlPointer>) {
        self.pointer = pointer;
        info!("Pointer set: {:?}", self.pointer.is_some());
    }

    pub fn close_layer_surface(&mut self) {
        self.layer_surface = None;
        self.exit = true;
        info!("Layer surface closed");
    }
}
