// filepath: photo-board/src/widgets/viewer.rs
//! Image viewer frame
//!
//! Shows at most one bitmap, scaled to fit and centred. Loads are tagged
//! with a generation and only the newest one may paint.

use crate::draw::{Color, Painter};
use crate::photo::LoadError;
use crate::surface::{Drawable, Kind, Point, Rect, Size};
use image::RgbaImage;
use log::{debug, info, warn};

/// An image load the viewer is waiting for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub generation: u64,
    pub url: String,
}

#[derive(Debug)]
pub struct Viewer {
    frame: Rect,
    line_width: f64,
    image: Option<RgbaImage>,
    source: Option<String>,
    generation: u64,
    pending: Option<ImageRequest>,
}

impl Viewer {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            line_width: 1.0,
            image: None,
            source: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    /// URL of the image currently on screen
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn pending(&self) -> Option<&ImageRequest> {
        self.pending.as_ref()
    }

    /// Show `image_url`, or an empty frame when there is none.
    ///
    /// With a URL nothing is painted yet: the returned request must be
    /// loaded and handed back through [`Viewer::finish`]. Any request
    /// issued earlier becomes stale.
    pub fn render_image(
        &mut self,
        painter: &mut dyn Painter,
        image_url: Option<&str>,
    ) -> Option<ImageRequest> {
        self.generation += 1;
        match image_url {
            None => {
                self.pending = None;
                self.image = None;
                self.source = None;
                self.draw_frame(painter);
                None
            }
            Some(url) => {
                let request = ImageRequest {
                    generation: self.generation,
                    url: url.to_string(),
                };
                debug!("Viewer waiting for generation {}: {}", request.generation, url);
                self.pending = Some(request.clone());
                Some(request)
            }
        }
    }

    /// Complete a load. Returns true when the image was painted.
    pub fn finish(
        &mut self,
        painter: &mut dyn Painter,
        generation: u64,
        result: Result<RgbaImage, LoadError>,
    ) -> bool {
        let request = match self.pending.take() {
            Some(request) if request.generation == generation => request,
            other => {
                debug!(
                    "Discarding stale image generation {} (waiting for {:?})",
                    generation,
                    other.as_ref().map(|r| r.generation)
                );
                self.pending = other;
                return false;
            }
        };

        match result {
            Ok(image) => {
                info!(
                    "Showing {} ({}x{})",
                    request.url,
                    image.width(),
                    image.height()
                );
                self.image = Some(image);
                self.source = Some(request.url);
                self.render(painter);
                true
            }
            Err(e) => {
                warn!("Failed to load image {}: {}", request.url, e);
                false
            }
        }
    }

    fn draw_frame(&self, painter: &mut dyn Painter) {
        painter.clear_rect(self.frame.inflate(self.line_width));
        painter.stroke_rect(self.frame, self.line_width, Color::BLACK);
    }
}

/// Uniform scale-to-fit of an image inside `frame`, centred
pub fn fit(frame: Rect, image_width: u32, image_height: u32) -> Rect {
    let (iw, ih) = (image_width as f64, image_height as f64);
    let scale = (frame.size.width / iw).min(frame.size.height / ih);
    let (w, h) = (iw * scale, ih * scale);
    Rect::from_xywh(
        frame.origin.x + (frame.size.width / 2.0 - w / 2.0),
        frame.origin.y + (frame.size.height / 2.0 - h / 2.0),
        w,
        h,
    )
}

impl Drawable for Viewer {
    fn kind(&self) -> Kind {
        Kind::Viewer
    }

    fn position(&self) -> Point {
        self.frame.origin
    }

    fn size(&self) -> Size {
        self.frame.size
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Frame plus the current image, if any
    fn render(&mut self, painter: &mut dyn Painter) {
        self.draw_frame(painter);
        if let Some(image) = &self.image {
            if image.width() == 0 || image.height() == 0 {
                return;
            }
            painter.fill_rect(self.frame, Color::BLACK);
            painter.draw_image(image, fit(self.frame, image.width(), image.height()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Canvas, FontBook};

    fn canvas() -> Canvas {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(120, 120, Color::WHITE);
        canvas
    }

    fn red(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba([255, 0, 0, 255]))
    }

    #[test]
    fn wide_image_is_letterboxed() {
        let placed = fit(Rect::from_xywh(10.0, 10.0, 100.0, 100.0), 200, 100);
        assert_eq!(placed, Rect::from_xywh(10.0, 35.0, 100.0, 50.0));
    }

    #[test]
    fn small_image_is_scaled_up_to_fit() {
        let placed = fit(Rect::from_xywh(0.0, 0.0, 100.0, 50.0), 10, 10);
        assert_eq!(placed, Rect::from_xywh(25.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn current_generation_paints() {
        let mut canvas = canvas();
        let mut viewer = Viewer::new(Rect::from_xywh(10.0, 10.0, 100.0, 100.0));

        let request = viewer.render_image(&mut canvas, Some("u")).unwrap();
        assert_eq!(canvas.pixel(60, 60), Some(Color::WHITE));

        assert!(viewer.finish(&mut canvas, request.generation, Ok(red(4, 4))));
        assert_eq!(viewer.source(), Some("u"));
        assert_eq!(canvas.pixel(60, 60), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut canvas = canvas();
        let mut viewer = Viewer::new(Rect::from_xywh(10.0, 10.0, 100.0, 100.0));

        let old = viewer.render_image(&mut canvas, Some("old")).unwrap();
        let new = viewer.render_image(&mut canvas, Some("new")).unwrap();

        assert!(!viewer.finish(&mut canvas, old.generation, Ok(red(4, 4))));
        assert_eq!(viewer.source(), None);
        assert_eq!(canvas.pixel(60, 60), Some(Color::WHITE));
        assert_eq!(viewer.pending(), Some(&new));

        assert!(viewer.finish(&mut canvas, new.generation, Ok(red(4, 4))));
        assert_eq!(viewer.source(), Some("new"));
    }

    #[test]
    fn failed_load_keeps_previous_image() {
        let mut canvas = canvas();
        let mut viewer = Viewer::new(Rect::from_xywh(10.0, 10.0, 100.0, 100.0));

        let first = viewer.render_image(&mut canvas, Some("first")).unwrap();
        viewer.finish(&mut canvas, first.generation, Ok(red(4, 4)));

        let second = viewer.render_image(&mut canvas, Some("second")).unwrap();
        let failed = viewer.finish(
            &mut canvas,
            second.generation,
            Err(LoadError::Payload("no image".into())),
        );

        assert!(!failed);
        assert_eq!(viewer.source(), Some("first"));
        assert!(viewer.pending().is_none());
        assert_eq!(canvas.pixel(60, 60), Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn clearing_shows_empty_frame_and_drops_late_loads() {
        let mut canvas = canvas();
        let mut viewer = Viewer::new(Rect::from_xywh(10.0, 10.0, 100.0, 100.0));

        let shown = viewer.render_image(&mut canvas, Some("shown")).unwrap();
        assert!(viewer.finish(&mut canvas, shown.generation, Ok(red(4, 4))));
        let late = viewer.render_image(&mut canvas, Some("late")).unwrap();

        assert!(viewer.render_image(&mut canvas, None).is_none());
        assert_eq!(viewer.source(), None);
        assert!(viewer.pending().is_none());
        assert_eq!(canvas.pixel(60, 60), Some(Color::WHITE));

        assert!(!viewer.finish(&mut canvas, late.generation, Ok(red(4, 4))));
        assert!(!viewer.finish(&mut canvas, shown.generation, Ok(red(4, 4))));
        assert_eq!(viewer.source(), None);
        assert_eq!(canvas.pixel(60, 60), Some(Color::WHITE));
    }
}
