// filepath: photo-board/src/draw.rs
//! Drawing utilities for photo-board
//!
//! This file contains the `Painter` trait widgets draw through and the
//! software `Canvas` that implements it over an ARGB8888 pixel buffer.
//! The canvas keeps its pixels between frames so widgets can repaint
//! their own area without a full-surface clear.

use crate::surface::{Point, Rect};
use fontdue::{Font, FontSettings};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Straight-alpha colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GREY: Color = Color::rgb(128, 128, 128);
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self {
                r: channel(0)?,
                g: channel(2)?,
                b: channel(4)?,
                a: channel(6)?,
            }),
            _ => None,
        }
    }

    /// Byte order of `wl_shm::Format::Argb8888` on little-endian hosts
    fn to_argb8888(self) -> [u8; 4] {
        [self.b, self.g, self.r, self.a]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Text is always drawn with a middle baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    pub size: f32,
    pub color: Color,
    pub align: Align,
}

/// Rendering primitives the widgets consume
pub trait Painter {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reset a region to the surface background
    fn clear_rect(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color);

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle);

    /// Draw `image` scaled to exactly fill `dest`
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);
}

/// Loaded font faces, by family
#[derive(Default)]
pub struct FontBook {
    sans: Option<Font>,
    mono: Option<Font>,
}

impl FontBook {
    /// Load the first readable font from each candidate list
    pub fn load(sans: &[String], mono: &[String]) -> Self {
        Self {
            sans: Self::load_first(sans),
            mono: Self::load_first(mono).or_else(|| Self::load_first(sans)),
        }
    }

    fn load_first(candidates: &[String]) -> Option<Font> {
        for path in candidates {
            let Ok(bytes) = fs::read(Path::new(path)) else {
                continue;
            };
            match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    debug!("Loaded font {}", path);
                    return Some(font);
                }
                Err(e) => warn!("Failed to parse font {}: {}", path, e),
            }
        }
        warn!("No usable font among {:?}, text will not be drawn", candidates);
        None
    }

    fn get(&self, family: FontFamily) -> Option<&Font> {
        match family {
            FontFamily::Sans => self.sans.as_ref(),
            FontFamily::Mono => self.mono.as_ref(),
        }
    }
}

/// Software canvas backed by an ARGB8888 buffer
pub struct Canvas {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    background: Color,
    fonts: FontBook,
    damage: Vec<Rect>,
}

impl Canvas {
    /// Create a blank canvas
    pub fn new(width: u32, height: u32, fonts: FontBook) -> Self {
        Self {
            buffer: vec![0; (width * height * 4) as usize],
            width,
            height,
            background: Color::TRANSPARENT,
            fonts,
            damage: Vec::new(),
        }
    }

    /// Resize the buffer and fill it with `background`
    pub fn reset(&mut self, width: u32, height: u32, background: Color) {
        self.width = width;
        self.height = height;
        self.background = background;
        self.buffer = vec![0; (width * height * 4) as usize];
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&background.to_argb8888());
        }
        self.damage.clear();
        self.damage.push(Rect::from_xywh(0.0, 0.0, width as f64, height as f64));
    }

    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// Regions touched since the last call
    pub fn take_damage(&mut self) -> Vec<Rect> {
        std::mem::take(&mut self.damage)
    }

    /// Read a pixel back as a colour
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = &self.buffer[idx..idx + 4];
        Some(Color {
            r: px[2],
            g: px[1],
            b: px[0],
            a: px[3],
        })
    }

    /// Clip a pixel span to the canvas, returning `(x0, y0, x1, y1)`
    fn clip(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x_start = x.max(0) as u32;
        let y_start = y.max(0) as u32;
        let x_end = (x + width as i32).clamp(0, self.width as i32) as u32;
        let y_end = (y + height as i32).clamp(0, self.height as i32) as u32;

        if x_end <= x_start || y_end <= y_start {
            return None;
        }
        Some((x_start, y_start, x_end, y_end))
    }

    fn fill_span(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, width, height) else {
            return;
        };
        let bytes = color.to_argb8888();
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = ((y * self.width + x) * 4) as usize;
                self.buffer[idx..idx + 4].copy_from_slice(&bytes);
            }
        }
    }

    /// Source-over blend of `color` scaled by `coverage`
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 || coverage == 0 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let alpha = (color.a as u32 * coverage as u32) / 255;
        let src = color.to_argb8888();
        for channel in 0..3 {
            let dst = self.buffer[idx + channel] as u32;
            self.buffer[idx + channel] = ((src[channel] as u32 * alpha + dst * (255 - alpha)) / 255) as u8;
        }
        let dst_a = self.buffer[idx + 3] as u32;
        self.buffer[idx + 3] = (alpha + dst_a * (255 - alpha) / 255) as u8;
    }
}

impl Painter for Canvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear_rect(&mut self, rect: Rect) {
        let (x, y, w, h) = rect.to_pixels();
        self.fill_span(x, y, w, h, self.background);
        self.damage.push(rect);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (x, y, w, h) = rect.to_pixels();
        self.fill_span(x, y, w, h, color);
        self.damage.push(rect);
    }

    fn stroke_rect(&mut self, rect: Rect, line_width: f64, color: Color) {
        // Centred on the edge like a 2D canvas stroke
        let half = line_width / 2.0;
        let outer = rect.inflate(half);
        let (x, y, w, h) = outer.to_pixels();
        let lw = line_width.ceil().max(1.0) as u32;
        self.fill_span(x, y, w, lw, color);
        self.fill_span(x, y + h as i32 - lw as i32, w, lw, color);
        self.fill_span(x, y, lw, h, color);
        self.fill_span(x + w as i32 - lw as i32, y, lw, h, color);
        self.damage.push(outer);
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let Some(font) = self.fonts.get(style.family) else {
            return;
        };
        let px = style.size;
        let glyphs: Vec<_> = text.chars().map(|c| font.rasterize(c, px)).collect();
        let text_width: f32 = glyphs.iter().map(|(m, _)| m.advance_width).sum();
        let (ascent, descent) = font
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -px * 0.2));

        let mut pen_x = match style.align {
            Align::Left => anchor.x as f32,
            Align::Center => anchor.x as f32 - text_width / 2.0,
            Align::Right => anchor.x as f32 - text_width,
        };
        let baseline = anchor.y as f32 + (ascent + descent) / 2.0;
        let start_x = pen_x;

        for (metrics, coverage) in glyphs {
            let gx = (pen_x + metrics.xmin as f32).round() as i32;
            let gy = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let value = coverage[row * metrics.width + col];
                    self.blend(gx + col as i32, gy + row as i32, style.color, value);
                }
            }
            pen_x += metrics.advance_width;
        }

        self.damage.push(Rect::from_xywh(
            start_x as f64,
            (baseline - ascent) as f64,
            text_width as f64,
            (ascent - descent) as f64,
        ));
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        let (x, y, w, h) = dest.to_pixels();
        if w == 0 || h == 0 || image.width() == 0 || image.height() == 0 {
            return;
        }
        let scaled = imageops::resize(image, w, h, FilterType::Triangle);
        for (col, row, px) in scaled.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            self.blend(x + col as i32, y + row as i32, Color { r, g, b, a: 255 }, a);
        }
        self.damage.push(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_hex_colours() {
        assert_eq!(Color::parse_hex("#EAEAEA"), Some(Color::rgb(0xEA, 0xEA, 0xEA)));
        assert_eq!(
            Color::parse_hex("#10203040"),
            Some(Color {
                r: 0x10,
                g: 0x20,
                b: 0x30,
                a: 0x40
            })
        );
        assert_eq!(Color::parse_hex("grey"), None);
        assert_eq!(Color::parse_hex("#12345"), None);
    }

    #[test]
    fn clear_restores_background_and_records_damage() {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(20, 20, Color::WHITE);
        canvas.take_damage();

        canvas.fill_rect(Rect::from_xywh(2.0, 2.0, 10.0, 10.0), Color::BLACK);
        assert_eq!(canvas.pixel(5, 5), Some(Color::BLACK));

        canvas.clear_rect(Rect::from_xywh(4.0, 4.0, 2.0, 2.0));
        assert_eq!(canvas.pixel(5, 5), Some(Color::WHITE));
        assert_eq!(canvas.pixel(3, 3), Some(Color::BLACK));
        assert_eq!(canvas.take_damage().len(), 2);
        assert!(canvas.take_damage().is_empty());
    }

    #[test]
    fn fill_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(4, 4, Color::WHITE);
        canvas.fill_rect(Rect::from_xywh(-10.0, -10.0, 12.0, 12.0), Color::BLACK);
        assert_eq!(canvas.pixel(1, 1), Some(Color::BLACK));
        assert_eq!(canvas.pixel(2, 2), Some(Color::WHITE));
    }

    #[test]
    fn image_fills_destination() {
        let mut canvas = Canvas::new(0, 0, FontBook::default());
        canvas.reset(10, 10, Color::WHITE);
        let image = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
        canvas.draw_image(&image, Rect::from_xywh(2.0, 2.0, 4.0, 4.0));
        assert_eq!(canvas.pixel(3, 3), Some(Color::rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(7, 7), Some(Color::WHITE));
    }
}
