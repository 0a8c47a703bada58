//! Primitive Adapter
//!
//! The drawing, input and timing primitives a frontend provides. The core
//! calls these opaquely; it never decodes an image or touches a display.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AssetError, SurfaceError};
use crate::geometry::{Point, Rect, Size};

/// An opaque RGB color
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Black, the fallback background
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White, used for all kiosk text
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create a color from channels
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The two text sizes the kiosk uses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontSize {
    /// Drink names under the carousel image
    Normal,
    /// Pour labels in the overlay
    Small,
}

impl FontSize {
    /// Line height in logical pixels
    #[must_use]
    pub const fn px(self) -> u32 {
        match self {
            Self::Normal => 72,
            // 60% of the normal size
            Self::Small => 43,
        }
    }
}

/// Drawing primitives provided by a frontend
pub trait Surface {
    /// Frontend image handle; cloning should be cheap
    type Image: Clone;

    /// Logical screen size in pixels
    fn size(&self) -> Size;

    /// Decode an image file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be decoded.
    fn load_image(&mut self, path: &Path) -> Result<Self::Image, AssetError>;

    /// Resample an image to exactly `size`
    fn scale(&mut self, image: &Self::Image, size: Size) -> Self::Image;

    /// Rotate an image clockwise by `degrees`; the result grows to fit the
    /// rotated corners
    fn rotate(&mut self, image: &Self::Image, degrees: f32) -> Self::Image;

    /// Dimensions of an image
    fn image_size(&self, image: &Self::Image) -> Size;

    /// Rendered size of a single line of text
    fn text_size(&self, text: &str, font: FontSize) -> Size;

    /// Break `text` into lines no wider than `max_width` pixels
    fn wrap_text(&self, text: &str, font: FontSize, max_width: u32) -> Vec<String>;

    /// Paint an image with its top-left corner at `at`
    fn blit(&mut self, image: &Self::Image, at: Point);

    /// Fill `area`, or the whole screen when `None`
    fn fill(&mut self, color: Color, area: Option<Rect>);

    /// Paint one line of text with its top-left corner at `at`
    fn draw_text(&mut self, text: &str, font: FontSize, color: Color, at: Point);

    /// Flush everything painted since the last call to the display
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be written.
    fn present(&mut self) -> Result<(), SurfaceError>;
}

/// Keys the kiosk reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Escape
    Escape,
    /// Anything else
    Other,
}

/// Input events from the single pointer stream
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed or process asked to stop
    Quit,
    /// Key pressed
    Key(Key),
    /// Pointer (finger) went down
    PointerDown(Point),
    /// Pointer moved
    PointerMove(Point),
    /// Pointer (finger) lifted
    PointerUp(Point),
}

/// Source of input events
pub trait InputSource {
    /// Next pending event, if any; never blocks
    fn next_event(&mut self) -> Option<InputEvent>;

    /// Drop every pending event
    fn clear_events(&mut self);
}

/// Monotonic time source
pub trait Clock {
    /// Time since the clock started
    fn now(&self) -> Duration;

    /// Block for `duration`
    fn sleep(&mut self, duration: Duration);
}

/// Caps a loop to a target frame rate
///
/// Each [`tick`](Self::tick) sleeps out whatever remains of the frame budget
/// and returns the real time since the previous tick.
#[derive(Clone, Debug)]
pub struct FrameLimiter {
    frame: Duration,
    last: Duration,
}

impl FrameLimiter {
    /// Create a limiter for `frame_rate` frames per second, starting now
    #[must_use]
    pub fn new<C: Clock + ?Sized>(frame_rate: u32, clock: &C) -> Self {
        Self {
            frame: Duration::from_secs(1) / frame_rate.max(1),
            last: clock.now(),
        }
    }

    /// Target frame interval
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        self.frame
    }

    /// Wait for the rest of the frame and return the time since the last tick
    pub fn tick<C: Clock + ?Sized>(&mut self, clock: &mut C) -> Duration {
        let spent = clock.now().saturating_sub(self.last);
        if spent < self.frame {
            clock.sleep(self.frame - spent);
        }
        let now = clock.now();
        let elapsed = now.saturating_sub(self.last);
        self.last = now;
        elapsed
    }
}
