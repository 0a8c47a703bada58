//! Carousel State
//!
//! The drink list, the selected index, and the images of the selected drink
//! and both of its neighbors. Neighbor images are resolved whenever the index
//! or the list changes, so a swipe can show them without loading anything.

use crate::error::KioskError;

/// Which way the carousel moves
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards the next drink (swipe left)
    Next,
    /// Towards the previous drink (swipe right)
    Previous,
}

impl Direction {
    /// Direction implied by a horizontal drag offset
    ///
    /// Dragging left (negative offset) reveals the next drink.
    #[must_use]
    pub fn from_offset(offset: i32) -> Self {
        if offset < 0 {
            Self::Next
        } else {
            Self::Previous
        }
    }
}

/// Index one step away from `index`, wrapping around both ends
///
/// `len` must be non-zero.
#[must_use]
pub fn step(index: usize, len: usize, direction: Direction) -> usize {
    match direction {
        Direction::Next => (index + 1) % len,
        Direction::Previous => (index + len - 1) % len,
    }
}

/// Selected drink and pre-resolved images around it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarouselPosition<I> {
    /// Selected index
    pub index: usize,
    /// Image of the selected drink
    pub current: Option<I>,
    /// Image of the drink before it
    pub previous: Option<I>,
    /// Image of the drink after it
    pub next: Option<I>,
}

/// Wrap-around drink carousel
#[derive(Clone, Debug)]
pub struct Carousel<D, I> {
    drinks: Vec<D>,
    position: CarouselPosition<I>,
}

impl<D, I> Carousel<D, I> {
    /// Build a carousel showing `drinks[index]`
    ///
    /// `resolve` loads the image for a drink; `None` means it is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::NoValidDrinks`] if `drinks` is empty.
    pub fn new(
        drinks: Vec<D>,
        index: usize,
        resolve: impl FnMut(&D) -> Option<I>,
    ) -> Result<Self, KioskError> {
        if drinks.is_empty() {
            return Err(KioskError::NoValidDrinks);
        }
        let index = index % drinks.len();
        let position = Self::resolve_at(&drinks, index, resolve);
        Ok(Self { drinks, position })
    }

    /// Move one step and resolve the images around the new index
    pub fn advance(&mut self, direction: Direction, resolve: impl FnMut(&D) -> Option<I>) {
        let index = step(self.position.index, self.drinks.len(), direction);
        self.position = Self::resolve_at(&self.drinks, index, resolve);
    }

    /// Replace the drink list and select `index` (wrapped into range)
    ///
    /// # Errors
    ///
    /// Returns [`KioskError::NoValidDrinks`] and keeps the current list if
    /// `drinks` is empty.
    pub fn reload(
        &mut self,
        drinks: Vec<D>,
        index: usize,
        resolve: impl FnMut(&D) -> Option<I>,
    ) -> Result<(), KioskError> {
        if drinks.is_empty() {
            return Err(KioskError::NoValidDrinks);
        }
        let index = index % drinks.len();
        self.position = Self::resolve_at(&drinks, index, resolve);
        self.drinks = drinks;
        Ok(())
    }

    /// Selected drink
    #[must_use]
    pub fn current(&self) -> &D {
        &self.drinks[self.position.index]
    }

    /// Selected index
    #[must_use]
    pub fn index(&self) -> usize {
        self.position.index
    }

    /// Number of drinks
    #[must_use]
    pub fn len(&self) -> usize {
        self.drinks.len()
    }

    /// Always false; a carousel cannot be built empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drinks.is_empty()
    }

    /// Drinks in display order
    #[must_use]
    pub fn drinks(&self) -> &[D] {
        &self.drinks
    }

    /// Selected index and resolved images
    #[must_use]
    pub fn position(&self) -> &CarouselPosition<I> {
        &self.position
    }

    fn resolve_at(
        drinks: &[D],
        index: usize,
        mut resolve: impl FnMut(&D) -> Option<I>,
    ) -> CarouselPosition<I> {
        let len = drinks.len();
        CarouselPosition {
            index,
            current: resolve(&drinks[index]),
            previous: resolve(&drinks[step(index, len, Direction::Previous)]),
            next: resolve(&drinks[step(index, len, Direction::Next)]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DRINKS: [&str; 5] = ["Mojito", "Margarita", "Daiquiri", "Gimlet", "Negroni"];

    fn names() -> Vec<String> {
        DRINKS.iter().map(|d| (*d).to_string()).collect()
    }

    fn lowercase(d: &String) -> Option<String> {
        Some(d.to_lowercase())
    }

    #[test]
    fn test_step_wraps_both_ends() {
        assert_eq!(step(4, 5, Direction::Next), 0);
        assert_eq!(step(0, 5, Direction::Previous), 4);
        assert_eq!(step(2, 5, Direction::Next), 3);
        assert_eq!(step(0, 1, Direction::Next), 0);
        assert_eq!(step(0, 1, Direction::Previous), 0);
    }

    #[test]
    fn test_direction_from_offset() {
        assert_eq!(Direction::from_offset(-200), Direction::Next);
        assert_eq!(Direction::from_offset(200), Direction::Previous);
    }

    #[test]
    fn test_neighbors_are_resolved() {
        let carousel = Carousel::new(names(), 0, lowercase).unwrap();
        assert_eq!(
            carousel.position(),
            &CarouselPosition {
                index: 0,
                current: Some("mojito".to_string()),
                previous: Some("negroni".to_string()),
                next: Some("margarita".to_string()),
            }
        );
    }

    #[test]
    fn test_advance_wraps_around() {
        let mut carousel = Carousel::new(names(), 4, lowercase).unwrap();
        carousel.advance(Direction::Next, lowercase);
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.current(), "Mojito");

        carousel.advance(Direction::Previous, lowercase);
        assert_eq!(carousel.index(), 4);
        assert_eq!(carousel.current(), "Negroni");
    }

    #[test]
    fn test_missing_images_are_none() {
        let carousel =
            Carousel::new(names(), 1, |d: &String| (d != "Mojito").then(|| d.clone())).unwrap();
        assert_eq!(carousel.position().previous, None);
        assert_eq!(carousel.position().current, Some("Margarita".to_string()));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let result = Carousel::<String, String>::new(Vec::new(), 0, lowercase);
        assert!(matches!(result, Err(KioskError::NoValidDrinks)));
    }

    #[test]
    fn test_reload_wraps_index_and_keeps_list_on_empty() {
        let mut carousel = Carousel::new(names(), 3, lowercase).unwrap();

        carousel
            .reload(vec!["Sour".to_string(), "Mule".to_string()], 3, lowercase)
            .unwrap();
        assert_eq!(carousel.len(), 2);
        assert_eq!(carousel.index(), 1);
        assert_eq!(carousel.current(), "Mule");

        assert!(carousel.reload(Vec::new(), 0, lowercase).is_err());
        assert_eq!(carousel.len(), 2);
        assert_eq!(carousel.current(), "Mule");
    }
}
