//! Terminal Surface
//!
//! Implements the kiosk's drawing, input and timing primitives on a ratatui
//! terminal. Images are decoded with `image` and kept as shared RGBA
//! buffers. Mouse events stand in for the touchscreen.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use image::imageops::{self, FilterType};
use image::{ImageError, RgbaImage};
use ratatui::backend::Backend;
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

use kiosk_core::{
    AssetError, Clock, Color, FontSize, InputEvent, InputSource, Key, KioskConfig, Point, Rect,
    Size, Surface, SurfaceError,
};

use crate::canvas::{Canvas, CellGrid};

/// Logical pixels per terminal column in full screen mode
pub const CELL_WIDTH_PX: u32 = 8;

/// Logical pixels per terminal row in full screen mode
pub const CELL_HEIGHT_PX: u32 = 16;

/// Image handle of the terminal surface
pub type TermImage = Arc<RgbaImage>;

/// Logical screen size for a terminal of `cols` x `rows`
///
/// Full screen derives the size from the terminal, otherwise the configured
/// window size is stretched over it.
pub fn logical_size(config: &KioskConfig, cols: u16, rows: u16) -> Size {
    if config.full_screen {
        Size::new(
            u32::from(cols.max(1)) * CELL_WIDTH_PX,
            u32::from(rows.max(1)) * CELL_HEIGHT_PX,
        )
    } else {
        config.window_size
    }
}

/// Translate a terminal event into kiosk input
///
/// Only the left button acts as a finger. Resizes are handled by the
/// surface itself and map to nothing here.
pub fn map_event(event: &Event, grid: &CellGrid) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => InputEvent::Quit,
            KeyCode::Char(c) => InputEvent::Key(Key::Char(c)),
            KeyCode::Esc => InputEvent::Key(Key::Escape),
            _ => InputEvent::Key(Key::Other),
        }),
        Event::Mouse(mouse) => {
            let pos = grid.to_logical(mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown(pos)),
                MouseEventKind::Drag(MouseButton::Left) => Some(InputEvent::PointerMove(pos)),
                MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp(pos)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Rotate clockwise by any angle; the result grows to fit and the corners
/// are transparent
pub fn rotate_rgba(src: &RgbaImage, degrees: f32) -> RgbaImage {
    let (width, height) = src.dimensions();
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (width as f32, height as f32);
    let out_w = (w * cos.abs() + h * sin.abs()).round().max(1.0) as u32;
    let out_h = (w * sin.abs() + h * cos.abs()).round().max(1.0) as u32;

    let mut out = RgbaImage::new(out_w, out_h);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (ox, oy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - ox;
        let dy = y as f32 + 0.5 - oy;
        // Inverse of the clockwise rotation, y pointing down
        let sx = dx * cos + dy * sin + cx;
        let sy = -dx * sin + dy * cos + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *px = *src.get_pixel(sx as u32, sy as u32);
        }
    }
    out
}

fn decode(path: &Path) -> Result<RgbaImage, AssetError> {
    let image = image::open(path).map_err(|e| match e {
        ImageError::IoError(source) => AssetError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => AssetError::Decode {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;
    Ok(image.into_rgba8())
}

/// A kiosk frontend on a ratatui terminal
pub struct TerminalSurface<B: Backend> {
    terminal: Terminal<B>,
    canvas: Canvas,
    start: Instant,
}

impl<B: Backend> TerminalSurface<B> {
    /// Wrap a terminal, sizing the logical screen from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal size cannot be queried.
    pub fn new(terminal: Terminal<B>, config: &KioskConfig) -> io::Result<Self> {
        let area = terminal.size()?;
        let logical = logical_size(config, area.width, area.height);
        tracing::info!(
            cols = area.width,
            rows = area.height,
            width = logical.width,
            height = logical.height,
            "Terminal surface ready"
        );
        Ok(Self {
            terminal,
            canvas: Canvas::new(CellGrid::new(area.width, area.height, logical)),
            start: Instant::now(),
        })
    }

    /// The canvas being painted
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The wrapped terminal
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// The wrapped terminal, for restoring it on exit
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Handle one raw terminal event
    fn accept(&mut self, event: &Event) -> Option<InputEvent> {
        if let Event::Resize(cols, rows) = *event {
            tracing::debug!(cols, rows, "Terminal resized");
            self.canvas.resize(cols, rows);
            return None;
        }
        map_event(event, &self.canvas.grid())
    }
}

impl<B: Backend> Surface for TerminalSurface<B> {
    type Image = TermImage;

    fn size(&self) -> Size {
        self.canvas.grid().logical
    }

    fn load_image(&mut self, path: &Path) -> Result<TermImage, AssetError> {
        decode(path).map(Arc::new)
    }

    fn scale(&mut self, image: &TermImage, size: Size) -> TermImage {
        Arc::new(imageops::resize(
            image.as_ref(),
            size.width.max(1),
            size.height.max(1),
            FilterType::Triangle,
        ))
    }

    fn rotate(&mut self, image: &TermImage, degrees: f32) -> TermImage {
        Arc::new(rotate_rgba(image, degrees))
    }

    fn image_size(&self, image: &TermImage) -> Size {
        let (width, height) = image.dimensions();
        Size::new(width, height)
    }

    fn text_size(&self, text: &str, font: FontSize) -> Size {
        Size::new(
            text.width() as u32 * self.canvas.grid().cell_width(),
            font.px(),
        )
    }

    fn wrap_text(&self, text: &str, _font: FontSize, max_width: u32) -> Vec<String> {
        let columns = (max_width / self.canvas.grid().cell_width()).max(1) as usize;
        textwrap::wrap(text, columns)
            .into_iter()
            .map(|line| line.to_string())
            .collect()
    }

    fn blit(&mut self, image: &TermImage, at: Point) {
        self.canvas.blit(image, at);
    }

    fn fill(&mut self, color: Color, area: Option<Rect>) {
        self.canvas.fill(color, area);
    }

    fn draw_text(&mut self, text: &str, font: FontSize, color: Color, at: Point) {
        self.canvas.draw_text(text, font, color, at);
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        let canvas = &self.canvas;
        self.terminal
            .draw(|frame| canvas.render(frame.buffer_mut()))?;
        self.canvas.clear();
        Ok(())
    }
}

impl<B: Backend> InputSource for TerminalSurface<B> {
    fn next_event(&mut self) -> Option<InputEvent> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => {
                    tracing::warn!(error = %e, "Input poll failed");
                    return None;
                }
            }
            match event::read() {
                Ok(raw) => {
                    if let Some(event) = self.accept(&raw) {
                        return Some(event);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Input read failed");
                    return None;
                }
            }
        }
    }

    fn clear_events(&mut self) {
        let mut dropped = 0;
        while matches!(event::poll(Duration::ZERO), Ok(true)) {
            match event::read() {
                // A resize still has to reach the canvas
                Ok(raw) => {
                    if self.accept(&raw).is_some() {
                        dropped += 1;
                    }
                }
                Err(_) => break,
            }
        }
        if dropped > 0 {
            tracing::debug!(dropped, "Discarded input");
        }
    }
}

impl<B: Backend> Clock for TerminalSurface<B> {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
