//! Kiosk Artwork
//!
//! Every image the kiosk draws besides the drinks themselves, loaded and
//! scaled once at startup. A missing or broken file is logged and leaves
//! its slot empty; the element it belongs to is simply not drawn.

use std::path::Path;

use crate::config::KioskConfig;
use crate::geometry::Size;
use crate::layout::{ICON_SIZE, LOGO_SIZE};
use crate::overlay::OverlayAssets;
use crate::surface::Surface;

/// Background image file
pub const BACKGROUND_FILE: &str = "tipsy.jpg";
/// Single pour button file
pub const SINGLE_FILE: &str = "single.png";
/// Double pour button file
pub const DOUBLE_FILE: &str = "double.png";
/// Favorite mark file
pub const FAVORITE_FILE: &str = "favorite.png";
/// Unfavorited mark file
pub const UNFAVORITE_FILE: &str = "unfavorite.png";
/// Reload button file
pub const RELOAD_FILE: &str = "reload.png";
/// Pour overlay backdrop file
pub const POURING_FILE: &str = "pouring.png";
/// Running pour spinner file
pub const SPINNER_FILE: &str = "loading.png";
/// Finished pour mark file
pub const CHECKMARK_FILE: &str = "checkmark.png";

/// Spinner side length
pub const SPINNER_SIZE: u32 = 70;
/// Checkmark side length
pub const CHECKMARK_SIZE: u32 = 30;

/// Load an image and scale it, or log and return `None`
pub fn load_scaled<S: Surface + ?Sized>(
    surface: &mut S,
    path: &Path,
    size: Size,
) -> Option<S::Image> {
    match surface.load_image(path) {
        Ok(image) => Some(surface.scale(&image, size)),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Error loading image");
            None
        }
    }
}

/// Pre-scaled kiosk artwork
#[derive(Clone, Debug)]
pub struct Assets<I> {
    /// Full-screen background
    pub background: Option<I>,
    /// Single pour button
    pub single: Option<I>,
    /// Double pour button
    pub double: Option<I>,
    /// Shown when the current drink is a favorite
    pub favorite: Option<I>,
    /// Shown when it is not
    pub unfavorite: Option<I>,
    /// Reload button
    pub reload: Option<I>,
    /// Pour overlay artwork
    pub overlay: OverlayAssets<I>,
}

impl<I> Assets<I> {
    /// Load everything the configuration asks for from its asset directory
    ///
    /// Favorite and reload icons are only loaded when those features are
    /// enabled.
    pub fn load<S>(surface: &mut S, config: &KioskConfig) -> Self
    where
        S: Surface<Image = I> + ?Sized,
    {
        let dir = config.asset_dir.as_path();
        let screen = surface.size();
        let logo = Size::square(LOGO_SIZE);
        let icon = Size::square(ICON_SIZE);

        let optional = |enabled: bool, file: &str, surface: &mut S| {
            if enabled {
                load_scaled(surface, &dir.join(file), icon)
            } else {
                None
            }
        };
        let favorite = optional(config.allow_favorites, FAVORITE_FILE, surface);
        let unfavorite = optional(config.allow_favorites, UNFAVORITE_FILE, surface);
        let reload = optional(config.show_reload_button, RELOAD_FILE, surface);

        let assets = Self {
            background: load_scaled(surface, &dir.join(BACKGROUND_FILE), screen),
            single: load_scaled(surface, &dir.join(SINGLE_FILE), logo),
            double: load_scaled(surface, &dir.join(DOUBLE_FILE), logo),
            favorite,
            unfavorite,
            reload,
            overlay: OverlayAssets {
                backdrop: load_scaled(surface, &dir.join(POURING_FILE), screen),
                spinner: load_scaled(surface, &dir.join(SPINNER_FILE), Size::square(SPINNER_SIZE)),
                checkmark: load_scaled(
                    surface,
                    &dir.join(CHECKMARK_FILE),
                    Size::square(CHECKMARK_SIZE),
                ),
            },
        };
        tracing::info!(dir = %dir.display(), "Loaded kiosk artwork");
        assets
    }
}
