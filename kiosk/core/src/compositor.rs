//! Layered Compositor
//!
//! An insertion-ordered registry of draw operations. Every frame replays all
//! registered operations back to front, then flushes the surface.
//!
//! Paint order is fixed by first insertion: updating an existing key keeps
//! its slot, a new key goes on top. Nothing here knows about animation or
//! drinks.

use std::collections::HashMap;

use crate::error::SurfaceError;
use crate::geometry::{Point, Rect};
use crate::surface::{Color, FontSize, Surface};

/// Identifies a layer in the compositor
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayerKey {
    /// One of the kiosk's fixed layers
    Named(&'static str),
    /// Anonymous layer created by [`Compositor::push`]
    Ordinal(u32),
    /// One wrapped label line of a pour in the overlay
    PourLine {
        /// Pour index within the watcher
        pour: usize,
        /// Line index within the wrapped label
        line: usize,
    },
    /// Spinner or checkmark slot of a pour in the overlay
    PourStatus {
        /// Pour index within the watcher
        pour: usize,
    },
}

impl LayerKey {
    /// Static background image (or black fill)
    pub const BACKGROUND: Self = Self::Named("background");
    /// Single pour button
    pub const SINGLE_LOGO: Self = Self::Named("single_logo");
    /// Double pour button
    pub const DOUBLE_LOGO: Self = Self::Named("double_logo");
    /// Reload drinks button
    pub const RELOAD_LOGO: Self = Self::Named("reload_logo");
    /// Favorite / unfavorite toggle
    pub const FAVORITE_LOGO: Self = Self::Named("favorite_logo");
    /// Drink currently shown in the carousel
    pub const CURRENT_DRINK: Self = Self::Named("current_cocktail");
    /// Drink entering from the right during a leftward swipe
    pub const NEXT_DRINK: Self = Self::Named("next_cocktail");
    /// Drink entering from the left during a rightward swipe
    pub const PREVIOUS_DRINK: Self = Self::Named("previous_cocktail");
    /// Name of the current drink
    pub const DRINK_NAME: Self = Self::Named("cocktail_name");
    /// Pour overlay artwork
    pub const POURING: Self = Self::Named("pouring");
    /// Copy of the background drawn under the pour overlay
    pub const POURING_BACKGROUND: Self = Self::Named("pouring_background");
}

/// A single draw operation
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp<I> {
    /// Paint an image with its top-left corner at `at`
    Blit {
        /// Image handle
        image: I,
        /// Top-left corner
        at: Point,
    },
    /// Fill an area (whole screen when `None`)
    Fill {
        /// Fill color
        color: Color,
        /// Area to fill
        area: Option<Rect>,
    },
    /// Paint one line of text
    Text {
        /// Text content
        text: String,
        /// Font size
        font: FontSize,
        /// Text color
        color: Color,
        /// Top-left corner
        at: Point,
    },
}

impl<I> DrawOp<I> {
    /// Shorthand for [`DrawOp::Blit`]
    pub fn blit(image: I, at: Point) -> Self {
        Self::Blit { image, at }
    }

    /// Replay this operation on a surface
    pub fn paint<S>(&self, surface: &mut S)
    where
        S: Surface<Image = I> + ?Sized,
    {
        match self {
            Self::Blit { image, at } => surface.blit(image, *at),
            Self::Fill { color, area } => surface.fill(*color, *area),
            Self::Text {
                text,
                font,
                color,
                at,
            } => surface.draw_text(text, *font, *color, *at),
        }
    }
}

/// The compositor owns every layer the kiosk paints
#[derive(Debug)]
pub struct Compositor<I> {
    /// Operations by key
    layers: HashMap<LayerKey, DrawOp<I>>,
    /// Keys in paint order (back to front)
    render_order: Vec<LayerKey>,
    /// Next ordinal for anonymous layers
    next_ordinal: u32,
}

impl<I> Compositor<I> {
    /// Create an empty compositor
    #[must_use]
    pub fn new() -> Self {
        Self {
            layers: HashMap::new(),
            render_order: Vec::new(),
            next_ordinal: 0,
        }
    }

    /// Insert a layer, or replace the operation of an existing one in place
    pub fn upsert(&mut self, key: LayerKey, op: DrawOp<I>) {
        if self.layers.insert(key.clone(), op).is_none() {
            self.render_order.push(key);
        }
    }

    /// Append an anonymous layer and return its key
    pub fn push(&mut self, op: DrawOp<I>) -> LayerKey {
        let key = LayerKey::Ordinal(self.next_ordinal);
        self.next_ordinal += 1;
        self.upsert(key.clone(), op);
        key
    }

    /// Remove a layer; removing a missing key does nothing
    pub fn remove(&mut self, key: &LayerKey) {
        if self.layers.remove(key).is_some() {
            self.render_order.retain(|k| k != key);
        }
    }

    /// Current operation of a layer
    #[must_use]
    pub fn get(&self, key: &LayerKey) -> Option<&DrawOp<I>> {
        self.layers.get(key)
    }

    /// Whether a layer exists
    #[must_use]
    pub fn contains(&self, key: &LayerKey) -> bool {
        self.layers.contains_key(key)
    }

    /// Keys in paint order
    pub fn keys(&self) -> impl Iterator<Item = &LayerKey> {
        self.render_order.iter()
    }

    /// Number of layers
    #[must_use]
    pub fn len(&self) -> usize {
        self.render_order.len()
    }

    /// Whether there are no layers
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.render_order.is_empty()
    }

    /// Replay every layer back to front and flush the frame
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot present the frame.
    pub fn present<S>(&self, surface: &mut S) -> Result<(), SurfaceError>
    where
        S: Surface<Image = I> + ?Sized,
    {
        for key in &self.render_order {
            if let Some(op) = self.layers.get(key) {
                op.paint(surface);
            }
        }
        surface.present()
    }
}

impl<I: Clone> Compositor<I> {
    /// Blit `image` on layer `key`, or remove the layer when there is none
    pub fn place(&mut self, key: LayerKey, image: Option<&I>, at: Point) {
        match image {
            Some(image) => self.upsert(key, DrawOp::blit(image.clone(), at)),
            None => self.remove(&key),
        }
    }
}

impl<I> Default for Compositor<I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::testing::{Painted, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn fill(r: u8) -> DrawOp<u8> {
        DrawOp::Fill {
            color: Color::rgb(r, 0, 0),
            area: None,
        }
    }

    #[test]
    fn test_update_in_place_keeps_position() {
        let mut compositor = Compositor::new();
        compositor.upsert(LayerKey::BACKGROUND, fill(1));
        compositor.upsert(LayerKey::CURRENT_DRINK, fill(2));
        compositor.upsert(LayerKey::DRINK_NAME, fill(3));

        compositor.upsert(LayerKey::BACKGROUND, fill(9));

        let keys: Vec<_> = compositor.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                LayerKey::BACKGROUND,
                LayerKey::CURRENT_DRINK,
                LayerKey::DRINK_NAME
            ]
        );
        assert_eq!(compositor.get(&LayerKey::BACKGROUND), Some(&fill(9)));
    }

    #[test]
    fn test_reinsert_after_remove_goes_on_top() {
        let mut compositor = Compositor::new();
        compositor.upsert(LayerKey::BACKGROUND, fill(1));
        compositor.upsert(LayerKey::FAVORITE_LOGO, fill(2));
        compositor.upsert(LayerKey::DRINK_NAME, fill(3));

        compositor.remove(&LayerKey::FAVORITE_LOGO);
        compositor.upsert(LayerKey::FAVORITE_LOGO, fill(4));

        let keys: Vec<_> = compositor.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                LayerKey::BACKGROUND,
                LayerKey::DRINK_NAME,
                LayerKey::FAVORITE_LOGO
            ]
        );
    }

    #[test]
    fn test_remove_missing_key_is_silent() {
        let mut compositor: Compositor<u8> = Compositor::new();
        compositor.remove(&LayerKey::POURING);
        compositor.remove(&LayerKey::PourStatus { pour: 3 });
        assert!(compositor.is_empty());
    }

    #[test]
    fn test_push_assigns_fresh_ordinals() {
        let mut compositor = Compositor::new();
        let a = compositor.push(fill(1));
        let b = compositor.push(fill(2));
        compositor.remove(&a);
        let c = compositor.push(fill(3));

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert_eq!(compositor.len(), 2);
    }

    #[test]
    fn test_order_matches_first_insertion_for_any_sequence() {
        // Deterministic pseudo-random upsert/remove sequence over a small key space
        let mut compositor = Compositor::new();
        let mut expected: Vec<LayerKey> = Vec::new();
        let mut seed: u32 = 7;
        for step in 0..500u32 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let key = LayerKey::PourLine {
                pour: ((seed >> 8) % 6) as usize,
                line: 0,
            };
            if (seed >> 4) % 3 == 0 {
                compositor.remove(&key);
                expected.retain(|k| k != &key);
            } else {
                compositor.upsert(key.clone(), fill(step as u8));
                if !expected.contains(&key) {
                    expected.push(key);
                }
            }
            let keys: Vec<_> = compositor.keys().cloned().collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn test_present_replays_in_order_then_flushes() {
        let mut surface = RecordingSurface::new(Size::new(720, 720));
        let mut compositor = Compositor::new();
        compositor.upsert(
            LayerKey::BACKGROUND,
            DrawOp::Fill {
                color: Color::BLACK,
                area: None,
            },
        );
        compositor.upsert(
            LayerKey::DRINK_NAME,
            DrawOp::Text {
                text: "Mojito".to_string(),
                font: FontSize::Normal,
                color: Color::WHITE,
                at: Point::new(10, 20),
            },
        );

        compositor.present(&mut surface).unwrap();

        assert_eq!(surface.frames().len(), 1);
        assert_eq!(
            surface.last_frame(),
            &[
                Painted::Fill {
                    color: Color::BLACK,
                    area: None
                },
                Painted::Text {
                    text: "Mojito".to_string(),
                    at: Point::new(10, 20)
                },
            ]
        );
    }
}
