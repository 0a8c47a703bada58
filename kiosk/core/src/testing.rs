//! Test Utilities
//!
//! Deterministic stand-ins for every collaborator of the kiosk, so the
//! compositor, animations, overlay and main loop can be exercised without a
//! display, a catalog file, or pumps.
//!
//! # Usage
//!
//! ```ignore
//! use kiosk_core::testing::{RecordingSurface, ScriptedWatcher};
//!
//! let mut surface = RecordingSurface::new(Size::new(720, 720));
//! // The watcher finishes pour 0 at tick 10 and pour 1 at tick 25
//! let watcher = ScriptedWatcher::new(vec![("Rum".into(), 10), ("Lime".into(), 25)]);
//! ```

use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{Drink, DrinkCatalog};
use crate::dispense::{Dispenser, PourSize, PourStatus, Watcher};
use crate::error::{AssetError, CatalogError, DispenseError, SurfaceError};
use crate::geometry::{Point, Rect, Size};
use crate::surface::{Clock, Color, FontSize, InputEvent, InputSource, Surface};

// ============================================================================
// Recording Surface
// ============================================================================

/// Image handle of the recording surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FakeImage {
    /// File stem the image was loaded from
    pub name: String,
    /// Current dimensions
    pub size: Size,
    /// Clockwise rotation in whole degrees
    pub rotation: u32,
}

/// One primitive painted during a frame
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Painted {
    /// An image blit
    Image {
        /// File stem of the image
        name: String,
        /// Top-left corner
        at: Point,
        /// Dimensions when painted
        size: Size,
        /// Clockwise rotation in whole degrees
        rotation: u32,
    },
    /// A fill
    Fill {
        /// Fill color
        color: Color,
        /// Area, `None` for full screen
        area: Option<Rect>,
    },
    /// A text line
    Text {
        /// Text content
        text: String,
        /// Top-left corner
        at: Point,
    },
}

impl Painted {
    /// Image name if this is a blit
    #[must_use]
    pub fn image_name(&self) -> Option<&str> {
        match self {
            Self::Image { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A frontend that records frames and runs on virtual time
///
/// Implements [`Surface`], [`InputSource`] and [`Clock`]. Sleeping advances
/// the virtual clock instantly. Input can be queued now or scheduled to
/// arrive after a number of presented frames.
#[derive(Debug)]
pub struct RecordingSurface {
    size: Size,
    now: Duration,
    missing: HashSet<String>,
    pending: Vec<Painted>,
    frames: Vec<Vec<Painted>>,
    events: VecDeque<InputEvent>,
    scheduled: Vec<(usize, InputEvent)>,
    observed: Vec<InputEvent>,
    clears: usize,
}

impl RecordingSurface {
    /// Default size of a freshly loaded image
    pub const LOADED_IMAGE_SIZE: Size = Size::new(100, 100);

    /// Create a surface with the given logical size
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            now: Duration::ZERO,
            missing: HashSet::new(),
            pending: Vec::new(),
            frames: Vec::new(),
            events: VecDeque::new(),
            scheduled: Vec::new(),
            observed: Vec::new(),
            clears: 0,
        }
    }

    /// Make loading any file with this name (e.g. `"checkmark.png"`) fail
    #[must_use]
    pub fn with_missing(mut self, file_name: &str) -> Self {
        self.missing.insert(file_name.to_string());
        self
    }

    /// Queue an event for the next poll
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Queue an event once `presents` frames have been presented in total
    pub fn schedule_event(&mut self, presents: usize, event: InputEvent) {
        self.scheduled.push((presents, event));
        self.release_due_events();
    }

    /// All presented frames
    #[must_use]
    pub fn frames(&self) -> &[Vec<Painted>] {
        &self.frames
    }

    /// The most recently presented frame
    ///
    /// # Panics
    ///
    /// Panics if nothing has been presented yet.
    #[must_use]
    pub fn last_frame(&self) -> &[Painted] {
        self.frames.last().expect("no frame presented yet")
    }

    /// Names of the images painted in a frame, in paint order
    #[must_use]
    pub fn images_in(&self, frame: usize) -> Vec<&str> {
        self.frames[frame]
            .iter()
            .filter_map(Painted::image_name)
            .collect()
    }

    /// Every event handed out by [`InputSource::next_event`]
    #[must_use]
    pub fn observed_events(&self) -> &[InputEvent] {
        &self.observed
    }

    /// How many times the input queue was cleared
    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    fn release_due_events(&mut self) {
        let presented = self.frames.len();
        let (due, later): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|(at, _)| *at <= presented);
        self.scheduled = later;
        self.events.extend(due.into_iter().map(|(_, event)| event));
    }

    fn char_width(font: FontSize) -> u32 {
        font.px() / 2
    }
}

impl Surface for RecordingSurface {
    type Image = FakeImage;

    fn size(&self) -> Size {
        self.size
    }

    fn load_image(&mut self, path: &Path) -> Result<FakeImage, AssetError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.missing.contains(&file_name) {
            return Err(AssetError::Io {
                path: PathBuf::from(path),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let name = path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(FakeImage {
            name,
            size: Self::LOADED_IMAGE_SIZE,
            rotation: 0,
        })
    }

    fn scale(&mut self, image: &FakeImage, size: Size) -> FakeImage {
        FakeImage {
            size,
            ..image.clone()
        }
    }

    fn rotate(&mut self, image: &FakeImage, degrees: f32) -> FakeImage {
        let rotation = (image.rotation as f32 + degrees).rem_euclid(360.0) as u32;
        FakeImage {
            rotation,
            ..image.clone()
        }
    }

    fn image_size(&self, image: &FakeImage) -> Size {
        image.size
    }

    fn text_size(&self, text: &str, font: FontSize) -> Size {
        Size::new(text.chars().count() as u32 * Self::char_width(font), font.px())
    }

    fn wrap_text(&self, text: &str, font: FontSize, max_width: u32) -> Vec<String> {
        let columns = (max_width / Self::char_width(font)).max(1) as usize;
        textwrap::wrap(text, columns)
            .into_iter()
            .map(|line| line.to_string())
            .collect()
    }

    fn blit(&mut self, image: &FakeImage, at: Point) {
        self.pending.push(Painted::Image {
            name: image.name.clone(),
            at,
            size: image.size,
            rotation: image.rotation,
        });
    }

    fn fill(&mut self, color: Color, area: Option<Rect>) {
        self.pending.push(Painted::Fill { color, area });
    }

    fn draw_text(&mut self, text: &str, _font: FontSize, _color: Color, at: Point) {
        self.pending.push(Painted::Text {
            text: text.to_string(),
            at,
        });
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.frames.push(std::mem::take(&mut self.pending));
        self.release_due_events();
        Ok(())
    }
}

impl InputSource for RecordingSurface {
    fn next_event(&mut self) -> Option<InputEvent> {
        let event = self.events.pop_front()?;
        self.observed.push(event);
        Some(event)
    }

    fn clear_events(&mut self) {
        self.events.clear();
        self.clears += 1;
    }
}

impl Clock for RecordingSurface {
    fn now(&self) -> Duration {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now += duration;
    }
}

// ============================================================================
// Vector Catalog
// ============================================================================

/// Minimal drink record
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleDrink {
    /// Display name
    pub name: String,
    /// Favorite mark
    pub favorite: bool,
}

impl SimpleDrink {
    /// A non-favorite drink
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            favorite: false,
        }
    }
}

impl Drink for SimpleDrink {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn is_favorite(&self) -> bool {
        self.favorite
    }
}

/// In-memory catalog that keeps favorites first
#[derive(Debug, Default)]
pub struct VecCatalog {
    drinks: Vec<SimpleDrink>,
    loads: usize,
    failing: bool,
}

impl VecCatalog {
    /// Catalog over the given names, in order
    #[must_use]
    pub fn new(names: &[&str]) -> Self {
        Self {
            drinks: names.iter().map(|n| SimpleDrink::new(*n)).collect(),
            loads: 0,
            failing: false,
        }
    }

    /// Make every subsequent call fail
    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// How many times the drink list was requested
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// Current records
    #[must_use]
    pub fn drinks(&self) -> &[SimpleDrink] {
        &self.drinks
    }

    fn set_favorite(&mut self, index: usize, favorite: bool) -> Result<usize, CatalogError> {
        if self.failing {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        let len = self.drinks.len();
        let drink = self
            .drinks
            .get_mut(index)
            .ok_or(CatalogError::IndexOutOfRange { index, len })?;
        drink.favorite = favorite;
        let name = drink.name.clone();
        // Stable: favorites first, original order otherwise
        self.drinks.sort_by_key(|d| !d.favorite);
        Ok(self
            .drinks
            .iter()
            .position(|d| d.name == name)
            .unwrap_or(0))
    }
}

impl DrinkCatalog for VecCatalog {
    type Drink = SimpleDrink;

    fn valid_drinks(&mut self) -> Result<Vec<SimpleDrink>, CatalogError> {
        self.loads += 1;
        if self.failing {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(self.drinks.clone())
    }

    fn image_path(&self, drink: &SimpleDrink) -> PathBuf {
        PathBuf::from("drink_logos").join(format!("{}.png", drink.name.to_lowercase()))
    }

    fn favorite(&mut self, index: usize) -> Result<usize, CatalogError> {
        self.set_favorite(index, true)
    }

    fn unfavorite(&mut self, index: usize) -> Result<usize, CatalogError> {
        self.set_favorite(index, false)
    }
}

// ============================================================================
// Scripted Dispenser
// ============================================================================

/// Watcher whose pours stop at fixed poll ticks
///
/// Every call to [`Watcher::done`] advances one tick. A pour stopping at
/// tick `n` reports `running` for ticks `1..n`. `done()` turns true on the
/// first tick after the last pour stopped.
#[derive(Debug)]
pub struct ScriptedWatcher {
    pours: Vec<(String, u32)>,
    tick: Cell<u32>,
}

impl ScriptedWatcher {
    /// Pours as `(label, stop_tick)` pairs
    #[must_use]
    pub fn new(pours: Vec<(String, u32)>) -> Self {
        Self {
            pours,
            tick: Cell::new(0),
        }
    }

    /// Ticks polled so far
    #[must_use]
    pub fn tick(&self) -> u32 {
        self.tick.get()
    }

    fn last_stop(&self) -> u32 {
        self.pours.iter().map(|(_, stop)| *stop).max().unwrap_or(0)
    }
}

impl Watcher for ScriptedWatcher {
    fn done(&self) -> bool {
        let tick = self.tick.get() + 1;
        self.tick.set(tick);
        tick > self.last_stop()
    }

    fn pours(&self) -> Vec<PourStatus> {
        let tick = self.tick.get();
        self.pours
            .iter()
            .map(|(label, stop)| PourStatus::new(tick < *stop, label.clone()))
            .collect()
    }
}

/// Dispenser that records requests and hands out scripted watchers
#[derive(Debug, Default)]
pub struct ScriptedDispenser {
    script: Vec<(String, u32)>,
    requests: Vec<(String, PourSize)>,
    busy: bool,
}

impl ScriptedDispenser {
    /// Every drink is poured with the same `(label, stop_tick)` script
    #[must_use]
    pub fn new(script: Vec<(String, u32)>) -> Self {
        Self {
            script,
            requests: Vec::new(),
            busy: false,
        }
    }

    /// Refuse every request with [`DispenseError::Busy`]
    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    /// Drinks requested so far
    #[must_use]
    pub fn requests(&self) -> &[(String, PourSize)] {
        &self.requests
    }
}

impl<D: Drink> Dispenser<D> for ScriptedDispenser {
    type Watcher = ScriptedWatcher;

    fn make_drink(&mut self, drink: &D, size: PourSize) -> Result<ScriptedWatcher, DispenseError> {
        if self.busy {
            return Err(DispenseError::Busy);
        }
        self.requests.push((drink.display_name().to_string(), size));
        Ok(ScriptedWatcher::new(self.script.clone()))
    }
}
