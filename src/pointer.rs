// filepath: src/pointer.rs
//! Pointer (mouse) event handling for photo-board

use crate::app::AppData;
use log::debug;
use photo_board::surface::{Point, PointerEvent as SurfaceEvent, PointerKind, BTN_LEFT};
use smithay_client_toolkit::seat::pointer::{PointerEvent, PointerEventKind};

/// Turns press/release pairs into clicks
#[derive(Debug, Default)]
pub struct ClickTracker {
    pressed: Option<u32>,
}

impl ClickTracker {
    pub fn press(&mut self, button: u32) {
        self.pressed = Some(button);
    }

    /// True when this release completes a left click
    pub fn release(&mut self, button: u32) -> bool {
        let clicked = button == BTN_LEFT && self.pressed == Some(button);
        self.pressed = None;
        clicked
    }

    pub fn leave(&mut self) {
        self.pressed = None;
    }
}

/// Convert a wayland pointer event into surface events
pub fn convert_pointer_event(event: &PointerEvent, tracker: &mut ClickTracker) -> Vec<SurfaceEvent> {
    let client = Point::new(event.position.0, event.position.1);
    let make = |kind, button| SurfaceEvent {
        kind,
        client,
        button,
    };

    match event.kind {
        PointerEventKind::Motion { .. } => vec![make(PointerKind::Motion, 0)],
        PointerEventKind::Press { button, .. } => {
            tracker.press(button);
            vec![make(PointerKind::Press, button)]
        }
        PointerEventKind::Release { button, .. } => {
            let mut events = vec![make(PointerKind::Release, button)];
            if tracker.release(button) {
                events.push(make(PointerKind::Click, button));
            }
            events
        }
        PointerEventKind::Leave { .. } => {
            tracker.leave();
            Vec::new()
        }
        _ => Vec::new(),
    }
}

pub fn handle_pointer_events(events: &[PointerEvent], app: &mut AppData) {
    debug!("handle_pointer_events: {} events", events.len());
    for event in events {
        for converted in convert_pointer_event(event, app.click_tracker()) {
            app.handle_pointer(&converted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_press_then_release_is_a_click() {
        let mut tracker = ClickTracker::default();
        tracker.press(BTN_LEFT);
        assert!(tracker.release(BTN_LEFT));
        assert!(!tracker.release(BTN_LEFT));
    }

    #[test]
    fn leaving_or_other_buttons_cancel_the_click() {
        let mut tracker = ClickTracker::default();
        tracker.press(BTN_LEFT);
        tracker.leave();
        assert!(!tracker.release(BTN_LEFT));

        tracker.press(0x111);
        assert!(!tracker.release(0x111));
    }
}
