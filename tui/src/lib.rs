//! Kiosk TUI - Terminal frontend for the cocktail kiosk
//!
//! Runs the headless [`kiosk_core::Kiosk`] inside a terminal. Touch input
//! arrives as mouse events, artwork is rendered with half-block cells.
//!
//! # Architecture
//!
//! - **Canvas**: logical-pixel framebuffer with a text overlay, sampled
//!   into ratatui cells
//! - **Surface**: crossterm input, wall clock and image decoding around the
//!   canvas
//! - **Catalog**: drinks from a JSON file, favorites persisted back
//! - **Dispenser**: simulated pumps on tokio tasks
//! - **Settings**: data layer paths and pump parameters from the environment

pub mod canvas;
pub mod catalog;
pub mod dispenser;
pub mod settings;
pub mod surface;

pub use catalog::{Cocktail, JsonCatalog};
pub use dispenser::{PumpWatcher, SimulatedDispenser};
pub use settings::DemoSettings;
pub use surface::TerminalSurface;
