//! Frame-Stepped Rotation
//!
//! Turns an image a fixed number of degrees per frame around the center of
//! its original rectangle until the cumulative angle reaches the target.

use std::time::Duration;

use super::Animation;
use crate::compositor::{Compositor, DrawOp, LayerKey};
use crate::geometry::{Point, Rect};
use crate::surface::Surface;

/// Degrees added per frame
pub const ROTATION_STEP: u32 = 5;

/// Step-wise clockwise rotation
#[derive(Clone, Debug)]
pub struct Rotate<I> {
    image: I,
    center: Point,
    key: LayerKey,
    target: u32,
    cumulative: u32,
}

impl<I> Rotate<I> {
    /// Rotate `image`, drawn at `rect`, by `degrees` in total
    pub fn new(image: I, rect: Rect, key: LayerKey, degrees: u32) -> Self {
        Self {
            image,
            center: rect.center(),
            key,
            target: degrees,
            cumulative: 0,
        }
    }

    /// Degrees turned so far
    #[must_use]
    pub fn cumulative(&self) -> u32 {
        self.cumulative
    }
}

impl<S: Surface + ?Sized> Animation<S> for Rotate<S::Image> {
    fn advance(
        &mut self,
        _dt: Duration,
        surface: &mut S,
        compositor: &mut Compositor<S::Image>,
    ) -> bool {
        if self.cumulative >= self.target {
            return true;
        }

        self.cumulative += ROTATION_STEP;
        // Always rotate the original, never the previous frame
        let angle = self.cumulative % 360;
        let rotated = surface.rotate(&self.image, angle as f32);
        let at = Rect::centered_at(self.center, surface.image_size(&rotated)).origin();
        compositor.upsert(self.key.clone(), DrawOp::blit(rotated, at));

        self.cumulative >= self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{play, RELOAD_ROTATION};
    use crate::geometry::Size;
    use crate::testing::{FakeImage, Painted, RecordingSurface};

    fn reload_logo() -> FakeImage {
        FakeImage {
            name: "reload".to_string(),
            size: Size::square(50),
            rotation: 0,
        }
    }

    fn rotations(surface: &RecordingSurface) -> Vec<u32> {
        surface
            .frames()
            .iter()
            .flat_map(|frame| frame.iter())
            .filter_map(|p| match p {
                Painted::Image { rotation, .. } => Some(*rotation),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_reload_rotation_steps_by_five_degrees() {
        let mut surface = RecordingSurface::new(Size::new(720, 720));
        let mut compositor = Compositor::new();
        let mut rotate = Rotate::new(
            reload_logo(),
            Rect::new(100, 150, 50, 50),
            LayerKey::RELOAD_LOGO,
            RELOAD_ROTATION,
        );

        play(&mut surface, &mut compositor, &mut rotate, 60).unwrap();

        let seen = rotations(&surface);
        assert_eq!(seen.len(), (RELOAD_ROTATION / ROTATION_STEP) as usize);
        assert_eq!(seen.first(), Some(&5));
        assert_eq!(seen.last(), Some(&180));
        assert!(seen.windows(2).all(|w| w[1] == w[0] + ROTATION_STEP));
        assert_eq!(rotate.cumulative(), RELOAD_ROTATION);
    }

    #[test]
    fn test_full_turn_terminates() {
        let mut surface = RecordingSurface::new(Size::new(720, 720));
        let mut compositor = Compositor::new();
        let mut rotate = Rotate::new(
            reload_logo(),
            Rect::new(100, 150, 50, 50),
            LayerKey::RELOAD_LOGO,
            360,
        );

        play(&mut surface, &mut compositor, &mut rotate, 60).unwrap();

        assert_eq!(surface.frames().len(), 72);
        assert_eq!(rotations(&surface).last(), Some(&0));
    }

    #[test]
    fn test_zero_target_draws_nothing() {
        let mut surface = RecordingSurface::new(Size::new(720, 720));
        let mut compositor = Compositor::new();
        let mut rotate = Rotate::new(
            reload_logo(),
            Rect::new(100, 150, 50, 50),
            LayerKey::RELOAD_LOGO,
            0,
        );

        assert!(rotate.advance(Duration::ZERO, &mut surface, &mut compositor));
        assert!(compositor.is_empty());
    }
}
