//! Drink Data Layer Interface
//!
//! The kiosk only reads drinks and asks the catalog to change favorites.
//! Which drinks are valid, where their images live, and how favorites are
//! persisted all belong to the catalog implementation.

use std::path::PathBuf;

use crate::error::CatalogError;

/// A drink as the kiosk sees it
pub trait Drink: Clone {
    /// Name shown under the carousel image
    fn display_name(&self) -> &str;

    /// Whether the drink is marked as a favorite
    fn is_favorite(&self) -> bool;
}

/// The external drink data layer
pub trait DrinkCatalog {
    /// Drink record type
    type Drink: Drink;

    /// Drinks that can currently be made, in display order
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn valid_drinks(&mut self) -> Result<Vec<Self::Drink>, CatalogError>;

    /// Image file for a drink
    fn image_path(&self, drink: &Self::Drink) -> PathBuf;

    /// Mark the drink at `index` as a favorite and return the index to select
    /// once the list has been reloaded
    ///
    /// # Errors
    ///
    /// Returns an error if the index is invalid or the change cannot be saved.
    fn favorite(&mut self, index: usize) -> Result<usize, CatalogError>;

    /// Clear the favorite mark of the drink at `index` and return the index
    /// to select once the list has been reloaded
    ///
    /// # Errors
    ///
    /// Returns an error if the index is invalid or the change cannot be saved.
    fn unfavorite(&mut self, index: usize) -> Result<usize, CatalogError>;
}
