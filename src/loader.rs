// filepath: photo-board/src/loader.rs
//! Worker-thread scheduler
//!
//! Each lookup or image load runs on its own short-lived thread and the
//! result is sent back to the event loop through a calloop channel. The
//! workers only share the photo service; every widget stays on the loop.

use crate::gallery::{Completion, Scheduler, Ticket};
use crate::photo::{LoadError, PhotoService};
use crate::widgets::ImageRequest;
use calloop::channel::Sender;
use log::{debug, error};
use std::sync::Arc;
use std::thread;

pub struct ThreadScheduler {
    service: Arc<dyn PhotoService>,
    sender: Sender<Completion>,
}

impl ThreadScheduler {
    pub fn new(service: Arc<dyn PhotoService>, sender: Sender<Completion>) -> Self {
        Self { service, sender }
    }

    fn spawn<F>(&self, name: String, work: F, on_spawn_error: impl FnOnce(LoadError) -> Completion)
    where
        F: FnOnce(&dyn PhotoService) -> Completion + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let sender = self.sender.clone();
        let spawned = thread::Builder::new().name(name.clone()).spawn(move || {
            let completion = work(service.as_ref());
            if sender.send(completion).is_err() {
                debug!("Event loop gone, dropping result of {}", name);
            }
        });

        if let Err(e) = spawned {
            error!("Failed to start worker thread: {}", e);
            let _ = self.sender.send(on_spawn_error(LoadError::Worker(e)));
        }
    }
}

impl Scheduler for ThreadScheduler {
    fn lookup(&mut self, ticket: Ticket) {
        let name = format!("lookup-{}", ticket.serial);
        let fallback = ticket.clone();
        self.spawn(
            name,
            move |service| {
                let result = service.download(&ticket.id);
                Completion::Lookup { ticket, result }
            },
            move |e| Completion::Lookup {
                ticket: fallback,
                result: Err(e),
            },
        );
    }

    fn fetch_image(&mut self, request: ImageRequest) {
        let name = format!("image-{}", request.generation);
        let generation = request.generation;
        self.spawn(
            name,
            move |service| Completion::Image {
                generation: request.generation,
                result: service.fetch_image(&request.url),
            },
            move |e| Completion::Image {
                generation,
                result: Err(e),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photo::{parse_photo, Photo};
    use image::RgbaImage;
    use std::time::Duration;

    struct FixedService;

    impl PhotoService for FixedService {
        fn download(&self, id: &str) -> Result<Photo, LoadError> {
            parse_photo(&format!(r#"{{"urls": {{"regular": "https://img/{id}"}}}}"#))
        }

        fn fetch_image(&self, _url: &str) -> Result<RgbaImage, LoadError> {
            Ok(RgbaImage::new(2, 1))
        }
    }

    #[test]
    fn results_come_back_through_the_channel() {
        let (sender, channel) = calloop::channel::channel();
        let mut scheduler = ThreadScheduler::new(Arc::new(FixedService), sender);
        let mut event_loop: calloop::EventLoop<Vec<Completion>> =
            calloop::EventLoop::try_new().unwrap();
        event_loop
            .handle()
            .insert_source(channel, |event, _, seen: &mut Vec<Completion>| {
                if let calloop::channel::Event::Msg(completion) = event {
                    seen.push(completion);
                }
            })
            .unwrap();

        scheduler.lookup(Ticket {
            serial: 1,
            index: 0,
            id: "abc".into(),
        });
        scheduler.fetch_image(ImageRequest {
            generation: 7,
            url: "https://img/abc".into(),
        });

        let mut seen = Vec::new();
        for _ in 0..50 {
            if seen.len() == 2 {
                break;
            }
            event_loop
                .dispatch(Duration::from_millis(100), &mut seen)
                .unwrap();
        }

        assert_eq!(seen.len(), 2);
        for completion in seen {
            match completion {
                Completion::Lookup { ticket, result } => {
                    assert_eq!(ticket.id, "abc");
                    assert_eq!(result.unwrap().urls.regular, "https://img/abc");
                }
                Completion::Image { generation, result } => {
                    assert_eq!(generation, 7);
                    assert_eq!(result.unwrap().width(), 2);
                }
            }
        }
    }
}
