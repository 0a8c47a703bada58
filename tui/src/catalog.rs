//! JSON Drink Catalog
//!
//! Drinks are read from a JSON array on every request, so edits to the file
//! show up on the next reload. A drink is valid when it is enabled and has
//! at least one ingredient with a positive amount. Favorites come first,
//! file order is kept otherwise. Favorite marks are written back.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use kiosk_core::{CatalogError, Drink, DrinkCatalog};

/// One ingredient of a recipe
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient name, as the pumps know it
    pub name: String,
    /// Ounces per single serving
    pub amount: f32,
}

/// A drink record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cocktail {
    /// Display name
    pub name: String,
    /// Recipe
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Favorite mark
    #[serde(default)]
    pub favorite: bool,
    /// Disabled drinks are never offered
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Image file name inside the logo folder; derived from the name if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

fn enabled_by_default() -> bool {
    true
}

impl Cocktail {
    fn is_valid(&self) -> bool {
        self.enabled && self.ingredients.iter().any(|i| i.amount > 0.0)
    }

    /// Image file name: explicit, or the lowercased name with `_` separators
    pub fn image_file(&self) -> String {
        self.image.clone().unwrap_or_else(|| {
            let slug: String = self
                .name
                .trim()
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() {
                        c.to_ascii_lowercase()
                    } else {
                        '_'
                    }
                })
                .collect();
            format!("{slug}.png")
        })
    }
}

impl Drink for Cocktail {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_favorite(&self) -> bool {
        self.favorite
    }
}

/// Catalog backed by a JSON file
#[derive(Clone, Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    logo_folder: PathBuf,
}

impl JsonCatalog {
    /// Catalog over `path`, with images in `logo_folder`
    pub fn new(path: impl Into<PathBuf>, logo_folder: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logo_folder: logo_folder.into(),
        }
    }

    /// The backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Cocktail>, CatalogError> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        serde_json::from_str(&content).map_err(|e| self.unavailable(e))
    }

    fn write(&self, records: &[Cocktail]) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(records).map_err(|e| self.unavailable(e))?;
        fs::write(&self.path, content).map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, error: impl Display) -> CatalogError {
        CatalogError::Unavailable(format!("{}: {error}", self.path.display()))
    }

    fn set_favorite(&mut self, index: usize, favorite: bool) -> Result<usize, CatalogError> {
        let mut records = self.read()?;
        let valid = valid_in_order(&records);
        let name = valid
            .get(index)
            .map(|d| d.name.clone())
            .ok_or(CatalogError::IndexOutOfRange {
                index,
                len: valid.len(),
            })?;

        for record in records.iter_mut().filter(|r| r.name == name) {
            record.favorite = favorite;
        }
        self.write(&records)?;
        tracing::debug!(drink = %name, favorite, "Saved favorite mark");

        Ok(valid_in_order(&records)
            .iter()
            .position(|d| d.name == name)
            .unwrap_or(0))
    }
}

/// Valid drinks, favorites first, file order otherwise
fn valid_in_order(records: &[Cocktail]) -> Vec<Cocktail> {
    let mut valid: Vec<Cocktail> = records.iter().filter(|r| r.is_valid()).cloned().collect();
    valid.sort_by_key(|d| !d.favorite);
    valid
}

impl DrinkCatalog for JsonCatalog {
    type Drink = Cocktail;

    fn valid_drinks(&mut self) -> Result<Vec<Cocktail>, CatalogError> {
        let records = self.read()?;
        let valid = valid_in_order(&records);
        tracing::debug!(
            total = records.len(),
            valid = valid.len(),
            "Read cocktails"
        );
        Ok(valid)
    }

    fn image_path(&self, drink: &Cocktail) -> PathBuf {
        self.logo_folder.join(drink.image_file())
    }

    fn favorite(&mut self, index: usize) -> Result<usize, CatalogError> {
        self.set_favorite(index, true)
    }

    fn unfavorite(&mut self, index: usize) -> Result<usize, CatalogError> {
        self.set_favorite(index, false)
    }
}
