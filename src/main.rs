// filepath: src/main.rs

mod app;
mod pointer;
mod wayland;

use app::AppData;
use calloop::channel::{self, Event};
use calloop::EventLoop;
use calloop_wayland_source::WaylandSource;
use log::{error, info, warn};
use photo_board::config::BoardConfig;
use photo_board::draw::{Canvas, FontBook};
use photo_board::loader::ThreadScheduler;
use photo_board::photo::PhotoClient;
use photo_board::store::{CounterStore, JsonFileStore, MemoryStore};
use photo_board::surface::Size;
use photo_board::{Completion, Gallery};
use smithay_client_toolkit::{
    compositor::CompositorState,
    output::OutputState,
    registry::RegistryState,
    seat::SeatState,
    shell::wlr_layer::{Layer, LayerShell},
    shm::{slot::SlotPool, Shm},
};
use std::rc::Rc;
use std::sync::Arc;
use wayland_client::{globals::registry_queue_init, Connection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting photo-board");

    let config = BoardConfig::load_from_file().unwrap_or_else(|e| {
        warn!("Failed to load configuration, using defaults: {}", e);
        BoardConfig::default()
    });
    info!("Configuration loaded from {:?}", BoardConfig::get_config_path());

    let access_key = config.access_key();
    if access_key.is_none() {
        warn!(
            "No access key set; add api.access_key to the config or export {}",
            photo_board::config::ACCESS_KEY_ENV
        );
    }

    let store: Rc<dyn CounterStore> = match JsonFileStore::for_namespace(&config.namespace) {
        Some(store) => {
            info!("Counters stored in {:?}", store.path());
            Rc::new(store)
        }
        None => {
            warn!("No data directory, counters will not survive a restart");
            Rc::new(MemoryStore::default())
        }
    };

    let conn = Connection::connect_to_env()?;
    let (globals, event_queue) = registry_queue_init::<AppData>(&conn)?;
    let qh = event_queue.handle();

    let compositor = CompositorState::bind(&globals, &qh)?;
    let layer_shell = LayerShell::bind(&globals, &qh)?;
    let shm = Shm::bind(&globals, &qh)?;
    let seat_state = SeatState::new(&globals, &qh);

    let pool_size = (config.width * config.height * 4) as usize;
    let pool = SlotPool::new(pool_size, &shm)?;

    let surface = compositor.create_surface(&qh);
    let layer_surface =
        layer_shell.create_layer_surface(&qh, surface, Layer::Top, Some("photo-board"), None);

    let mut event_loop: EventLoop<AppData> = EventLoop::try_new()?;
    let (sender, completions) = channel::channel::<Completion>();

    let service = PhotoClient::new(config.api.base_url.clone(), access_key)?;
    let scheduler = ThreadScheduler::new(Arc::new(service), sender);
    let size = Size::new(config.width as f64, config.height as f64);
    let gallery = Gallery::new(config.clone(), store, size, scheduler);
    let canvas = Canvas::new(
        config.width,
        config.height,
        FontBook::load(&config.fonts.sans, &config.fonts.mono),
    );

    let mut app_data = AppData::new(
        RegistryState::new(&globals),
        OutputState::new(&globals, &qh),
        seat_state,
        compositor,
        shm,
        layer_surface,
        pool,
        &config,
        gallery,
        canvas,
    );

    WaylandSource::new(conn.clone(), event_queue)
        .insert(event_loop.handle())
        .map_err(|e| e.error)?;
    event_loop
        .handle()
        .insert_source(completions, |event, _, app: &mut AppData| match event {
            Event::Msg(completion) => app.complete(completion),
            Event::Closed => warn!("Completion channel closed"),
        })
        .map_err(|e| e.error)?;

    info!("Entering event loop");
    let signal = event_loop.get_signal();
    event_loop.run(None, &mut app_data, |app| {
        if let Err(e) = app.present() {
            error!("Failed to present frame: {}", e);
        }
        if app.exit {
            signal.stop();
        }
    })?;

    info!("Exiting");
    Ok(())
}
