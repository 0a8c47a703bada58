//! Pop and Dual Zoom
//!
//! A pop grows an image from its base size to a target size and shrinks it
//! back, keeping it centered on the same point and the same layer.

use std::time::Duration;

use super::{lerp, Animation, Tween};
use crate::compositor::{Compositor, DrawOp, LayerKey};
use crate::geometry::{Point, Rect, Size};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Expanding,
    Contracting,
}

/// Grow-then-shrink feedback on a square image
#[derive(Clone, Debug)]
pub struct Pop<I> {
    image: I,
    center: Point,
    key: LayerKey,
    base_size: u32,
    target_size: u32,
    phase: Phase,
    tween: Tween,
}

impl<I> Pop<I> {
    /// Pop `image`, drawn at `rect`, on layer `key`
    ///
    /// `duration` applies to each half of the animation.
    pub fn new(
        image: I,
        rect: Rect,
        key: LayerKey,
        base_size: u32,
        target_size: u32,
        duration: Duration,
    ) -> Self {
        Self {
            image,
            center: rect.center(),
            key,
            base_size,
            target_size,
            phase: Phase::Expanding,
            tween: Tween::new(duration),
        }
    }

    /// Side length for the current phase and progress
    fn current_size(&self, t: f32) -> u32 {
        let (from, to) = match self.phase {
            Phase::Expanding => (self.base_size, self.target_size),
            Phase::Contracting => (self.target_size, self.base_size),
        };
        lerp(from as f32, to as f32, t) as u32
    }
}

impl<S: Surface + ?Sized> Animation<S> for Pop<S::Image> {
    fn advance(
        &mut self,
        dt: Duration,
        surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool {
        let t = self.tween.advance(dt);
        let scaled = surface.scale(&self.image, Size::square(self.current_size(t)));
        let at = Rect::centered_at(self.center, surface.image_size(&scaled)).origin();
        compositor.upsert(self.key.clone(), DrawOp::blit(scaled, at));

        if t < 1.0 {
            return false;
        }
        match self.phase {
            Phase::Expanding => {
                self.phase = Phase::Contracting;
                self.tween.reset();
                false
            }
            Phase::Contracting => true,
        }
    }
}

/// Both pour logos popping together in lockstep
#[derive(Clone, Debug)]
pub struct DualZoom<I> {
    single: Pop<I>,
    double: Pop<I>,
}

impl<I> DualZoom<I> {
    /// Zoom the single and double logos on their fixed layers
    pub fn new(
        single: (I, Rect),
        double: (I, Rect),
        base_size: u32,
        target_size: u32,
        duration: Duration,
    ) -> Self {
        Self {
            single: Pop::new(
                single.0,
                single.1,
                LayerKey::SINGLE_LOGO,
                base_size,
                target_size,
                duration,
            ),
            double: Pop::new(
                double.0,
                double.1,
                LayerKey::DOUBLE_LOGO,
                base_size,
                target_size,
                duration,
            ),
        }
    }
}

impl<S: Surface + ?Sized> Animation<S> for DualZoom<S::Image> {
    fn advance(
        &mut self,
        dt: Duration,
        surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool {
        let single_done = self.single.advance(dt, surface, compositor);
        let double_done = self.double.advance(dt, surface, compositor);
        single_done && double_done
    }
}
