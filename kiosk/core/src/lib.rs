//! Kiosk Core - Headless Presentation Engine for the Cocktail Kiosk
//!
//! This crate drives a touchscreen drink carousel: a layered compositor,
//! time-based animations, a tap/swipe gesture recognizer, and the overlay
//! shown while an external dispenser pours a drink. It knows nothing about
//! terminals, windows, or pumps; every collaborator is reached through a
//! trait.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                         Frontend                                 │
//! │        Surface (draw) + InputSource (pointer) + Clock            │
//! └───────────────────────────────┬──────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼──────────────────────────────────┐
//! │                          KIOSK CORE                              │
//! │  ┌────────────────────────────┴───────────────────────────────┐  │
//! │  │                          Kiosk                             │  │
//! │  │  ┌─────────┐  ┌───────────┐  ┌──────────┐  ┌────────────┐  │  │
//! │  │  │ Gesture │  │ Carousel  │  │Animation │  │    Pour    │  │  │
//! │  │  │Recognizr│  │   State   │  │ Routines │  │  Overlay   │  │  │
//! │  │  └─────────┘  └───────────┘  └──────────┘  └────────────┘  │  │
//! │  │                     Compositor (layers)                    │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └───────────────┬─────────────────────────────────┬────────────────┘
//!                 │                                 │
//!          DrinkCatalog                      Dispenser → Watcher
//! ```
//!
//! # Module Overview
//!
//! - [`compositor`]: insertion-ordered layer registry and frame replay
//! - [`animation`]: pop, dual zoom, rotate, slide and snap-back step machines
//! - [`gesture`]: pointer state machine classifying taps and swipes
//! - [`carousel`]: wrap-around drink index with pre-resolved neighbor images
//! - [`overlay`]: pour progress overlay polling a dispenser watcher
//! - [`app`]: the fixed-rate main loop tying everything together
//! - [`config`]: typed settings from defaults, TOML and environment
//! - [`testing`]: recording fakes for surfaces, catalogs and dispensers
//!
//! # No Terminal Dependencies
//!
//! This crate never depends on ratatui, crossterm, or an image decoder.
//! Frontends implement [`Surface`], [`InputSource`] and [`Clock`].

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod carousel;
pub mod catalog;
pub mod compositor;
pub mod config;
pub mod dispense;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod layout;
pub mod overlay;
pub mod surface;
pub mod testing;

pub use animation::{
    lerp, play, progress, Animation, DualZoom, Pop, Rotate, Slide, SnapBack, Tween,
};
pub use app::Kiosk;
pub use assets::Assets;
pub use carousel::{Carousel, CarouselPosition, Direction};
pub use catalog::{Drink, DrinkCatalog};
pub use compositor::{Compositor, DrawOp, LayerKey};
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigSource, KioskConfig, KioskToml,
};
pub use dispense::{Dispenser, PourSize, PourStatus, Watcher};
pub use error::{AssetError, CatalogError, ConfigError, DispenseError, KioskError, SurfaceError};
pub use geometry::{Point, Rect, Size};
pub use gesture::{Gesture, GestureRecognizer, GestureState, Release, SwipeOutcome};
pub use layout::{HitRegion, Layout};
pub use overlay::{show_pouring, OverlayAssets, PourOverlay};
pub use surface::{Clock, Color, FontSize, FrameLimiter, InputEvent, InputSource, Key, Surface};
