//! Error Types
//!
//! Only [`KioskError::NoValidDrinks`] and frame flush failures end the kiosk.
//! Everything else is caught where it happens and degrades one visual
//! element or one action.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::config::ConfigError;

/// An image asset could not be loaded
#[derive(Debug, Error)]
pub enum AssetError {
    /// The file could not be read
    #[error("Failed to read asset at {path}: {source}")]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file was read but could not be decoded
    #[error("Failed to decode asset at {path}: {reason}")]
    Decode {
        /// Path that was attempted
        path: PathBuf,
        /// Decoder message
        reason: String,
    },
}

/// The frontend failed to flush a frame
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Terminal or display IO failed
    #[error("Display IO failed: {0}")]
    Io(#[from] std::io::Error),

    /// The display went away
    #[error("Display closed")]
    Closed,
}

/// The drink data layer failed
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be read or written
    #[error("Drink catalog unavailable: {0}")]
    Unavailable(String),

    /// An index outside the current list was requested
    #[error("No drink at index {index} (list has {len})")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Length of the list
        len: usize,
    },
}

/// The dispensing subsystem refused a request
#[derive(Debug, Error)]
pub enum DispenseError {
    /// The machine is busy with another drink
    #[error("Dispenser is busy")]
    Busy,

    /// The drink cannot be made with the current setup
    #[error("Cannot make {drink}: {reason}")]
    Rejected {
        /// Drink display name
        drink: String,
        /// Why it was rejected
        reason: String,
    },
}

/// Top-level kiosk errors
#[derive(Debug, Error)]
pub enum KioskError {
    /// The catalog had nothing to show at startup
    #[error("No valid cocktails found")]
    NoValidDrinks,

    /// The catalog failed at startup
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A frame could not be presented
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Configuration was invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
