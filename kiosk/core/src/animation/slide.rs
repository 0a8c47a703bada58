//! Carousel Slide and Snap-Back
//!
//! Both routines move the drink image horizontally from the offset where the
//! finger was released. A slide carries it a full screen width away while the
//! neighbor slides in directly adjacent; a snap-back returns it to rest.

use std::time::Duration;

use super::{lerp, Animation, Tween};
use crate::carousel::Direction;
use crate::compositor::{Compositor, DrawOp, LayerKey};
use crate::geometry::Point;
use crate::surface::Surface;

/// Committed swipe: the current drink leaves, its neighbor arrives
#[derive(Clone, Debug)]
pub struct Slide<I> {
    current: Option<I>,
    incoming: Option<I>,
    direction: Direction,
    start: i32,
    width: i32,
    origin: Point,
    tween: Tween,
}

impl<I> Slide<I> {
    /// Slide from `start_offset` towards a full `screen_width`
    ///
    /// `origin` is where the current image sits at rest.
    pub fn new(
        current: Option<I>,
        incoming: Option<I>,
        direction: Direction,
        start_offset: i32,
        screen_width: u32,
        origin: Point,
        duration: Duration,
    ) -> Self {
        Self {
            current,
            incoming,
            direction,
            start: start_offset,
            width: screen_width as i32,
            origin,
            tween: Tween::new(duration),
        }
    }

    fn target(&self) -> i32 {
        match self.direction {
            Direction::Next => -self.width,
            Direction::Previous => self.width,
        }
    }
}

impl<S: Surface + ?Sized> Animation<S> for Slide<S::Image> {
    fn advance(
        &mut self,
        dt: Duration,
        _surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool {
        let t = self.tween.advance(dt);
        let offset = lerp(self.start as f32, self.target() as f32, t) as i32;

        compositor.place(
            LayerKey::CURRENT_DRINK,
            self.current.as_ref(),
            self.origin.offset_x(offset),
        );
        let (key, side) = match self.direction {
            Direction::Next => (LayerKey::NEXT_DRINK, self.width),
            Direction::Previous => (LayerKey::PREVIOUS_DRINK, -self.width),
        };
        compositor.place(key, self.incoming.as_ref(), self.origin.offset_x(side + offset));

        t >= 1.0
    }
}

/// Insufficient swipe: the current drink returns to rest
#[derive(Clone, Debug)]
pub struct SnapBack<I> {
    current: Option<I>,
    label: Option<DrawOp<I>>,
    start: i32,
    origin: Point,
    tween: Tween,
}

impl<I> SnapBack<I> {
    /// Return from `start_offset` to zero, redrawing `label` each frame
    pub fn new(
        current: Option<I>,
        label: Option<DrawOp<I>>,
        start_offset: i32,
        origin: Point,
        duration: Duration,
    ) -> Self {
        Self {
            current,
            label,
            start: start_offset,
            origin,
            tween: Tween::new(duration),
        }
    }
}

impl<S: Surface + ?Sized> Animation<S> for SnapBack<S::Image> {
    fn advance(
        &mut self,
        dt: Duration,
        _surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool {
        let t = self.tween.advance(dt);
        let offset = (self.start as f32 * (1.0 - t)) as i32;

        compositor.place(
            LayerKey::CURRENT_DRINK,
            self.current.as_ref(),
            self.origin.offset_x(offset),
        );
        if let Some(label) = &self.label {
            compositor.upsert(LayerKey::DRINK_NAME, label.clone());
        }

        t >= 1.0
    }
}
