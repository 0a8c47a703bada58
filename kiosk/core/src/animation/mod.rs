//! Animation Routines
//!
//! Every animation is a small step machine: [`Animation::advance`] moves it
//! forward by one frame delta, re-registers its layers in the compositor,
//! and reports whether it has finished. [`play`] drives one to completion,
//! presenting a frame per step at a capped rate. While it runs nothing else
//! happens; the kiosk has no interruptible animations.
//!
//! All time-based routines interpolate linearly with
//! `progress = min(elapsed / duration, 1.0)`.

mod pop;
mod rotate;
mod slide;

pub use pop::{DualZoom, Pop};
pub use rotate::Rotate;
pub use slide::{Slide, SnapBack};

use std::time::Duration;

use crate::compositor::Compositor;
use crate::error::SurfaceError;
use crate::surface::{Clock, FrameLimiter, Surface};

/// Logo pop on tap: grow and shrink time per phase
pub const POP_DURATION: Duration = Duration::from_millis(150);

/// Logo pop on tap: peak size
pub const POP_TARGET_SIZE: u32 = 220;

/// Both logos zoom after a committed swipe: time per phase
pub const ZOOM_DURATION: Duration = Duration::from_millis(300);

/// Both logos zoom after a committed swipe: peak size
pub const ZOOM_TARGET_SIZE: u32 = 175;

/// Carousel slide and snap-back duration
pub const SLIDE_DURATION: Duration = Duration::from_millis(300);

/// Rotation applied to the reload logo on tap, in degrees
pub const RELOAD_ROTATION: u32 = 180;

/// Interpolation progress, clamped to `[0, 1]`
///
/// A zero duration counts as already complete.
#[must_use]
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
}

/// Linear interpolation; returns exactly `to` at `t == 1.0`
#[must_use]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    if t >= 1.0 {
        return to;
    }
    from + (to - from) * t
}

/// Elapsed time against a fixed duration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tween {
    duration: Duration,
    elapsed: Duration,
}

impl Tween {
    /// A tween that has not started
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Add a frame delta and return the new progress
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.progress()
    }

    /// Current progress in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f32 {
        progress(self.elapsed, self.duration)
    }

    /// Whether progress has reached 1
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Start over from zero elapsed time
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

/// A frame-stepped animation over the compositor
pub trait Animation<S: Surface + ?Sized> {
    /// Advance by `dt`, update layers, and return `true` once finished
    fn advance(
        &mut self,
        dt: Duration,
        surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool;
}

/// Run an animation to completion, presenting one frame per step
///
/// The first step sees a zero delta, so the starting pose is always drawn.
///
/// # Errors
///
/// Returns an error if a frame cannot be presented.
pub fn play<F, A>(
    frontend: &mut F,
    compositor: &mut Compositor<F::Image>,
    animation: &mut A,
    frame_rate: u32,
) -> Result<(), SurfaceError>
where
    F: Surface + Clock,
    A: Animation<F> + ?Sized,
{
    let mut limiter = FrameLimiter::new(frame_rate, &*frontend);
    let mut dt = Duration::ZERO;
    loop {
        let done = animation.advance(dt, frontend, compositor);
        compositor.present(frontend)?;
        if done {
            return Ok(());
        }
        dt = limiter.tick(frontend);
    }
}
