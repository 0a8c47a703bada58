//! Screen Layout
//!
//! Where every interactive element and the drink image sit for a given
//! screen size, plus hit-testing of taps against the interactive regions.

use crate::compositor::DrawOp;
use crate::config::KioskConfig;
use crate::geometry::{Point, Rect, Size};
use crate::surface::{Color, FontSize, Surface};

/// Gap between the pour buttons and the screen edge
pub const MARGIN: i32 = 50;

/// Side length of the pour buttons
pub const LOGO_SIZE: u32 = 150;

/// Side length of the reload and favorite icons
pub const ICON_SIZE: u32 = 50;

/// Interactive regions, in hit-test priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitRegion {
    /// Pour a single
    SinglePour,
    /// Pour a double
    DoublePour,
    /// Reload the drink list
    Reload,
    /// Toggle the favorite mark
    Favorite,
}

/// Positions of everything on screen
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
    /// Logical screen size
    pub screen: Size,
    /// Resting top-left corner of the drink image
    pub drink_origin: Point,
    /// Size drink images are scaled to
    pub drink_size: Size,
    /// Center of the drink name
    pub text_center: Point,
    /// Single pour button
    pub single_rect: Rect,
    /// Double pour button
    pub double_rect: Rect,
    /// Reload button, if shown
    pub reload_rect: Option<Rect>,
    /// Favorite toggle, if favorites are allowed
    pub favorite_rect: Option<Rect>,
}

impl Layout {
    /// Lay out a screen of `screen` logical pixels
    #[must_use]
    pub fn new(screen: Size, config: &KioskConfig) -> Self {
        let width = screen.width as i32;
        let height = screen.height as i32;
        let logo = LOGO_SIZE as i32;
        let inset = (screen.width as f32 * (1.0 - config.image_scale) / 2.0) as i32;

        Self {
            screen,
            drink_origin: Point::new(inset, inset),
            drink_size: screen.scaled(config.image_scale),
            text_center: Point::new(width / 2, (height as f32 * 0.85) as i32),
            single_rect: Rect::new(MARGIN, (height - logo) / 2, LOGO_SIZE, LOGO_SIZE),
            double_rect: Rect::new(
                width - MARGIN - logo,
                (height - logo) / 2,
                LOGO_SIZE,
                LOGO_SIZE,
            ),
            reload_rect: config
                .show_reload_button
                .then(|| Rect::new(MARGIN * 2, 150, ICON_SIZE, ICON_SIZE)),
            favorite_rect: config
                .allow_favorites
                .then(|| Rect::new(width - MARGIN * 3, 150, LOGO_SIZE, LOGO_SIZE)),
        }
    }

    /// First region containing `pos`, in priority order
    #[must_use]
    pub fn hit_test(&self, pos: Point) -> Option<HitRegion> {
        if self.single_rect.contains(pos) {
            Some(HitRegion::SinglePour)
        } else if self.double_rect.contains(pos) {
            Some(HitRegion::DoublePour)
        } else if self.reload_rect.is_some_and(|r| r.contains(pos)) {
            Some(HitRegion::Reload)
        } else if self.favorite_rect.is_some_and(|r| r.contains(pos)) {
            Some(HitRegion::Favorite)
        } else {
            None
        }
    }

    /// Drink name drawn centered on the name position
    pub fn label_op<S: Surface + ?Sized>(&self, surface: &S, text: &str) -> DrawOp<S::Image> {
        let size = surface.text_size(text, FontSize::Normal);
        DrawOp::Text {
            text: text.to_string(),
            font: FontSize::Normal,
            color: Color::WHITE,
            at: Rect::centered_at(self.text_center, size).origin(),
        }
    }
}
