//! Dispensing Subsystem Interface
//!
//! Starting a drink returns immediately with a [`Watcher`]. The kiosk polls
//! the watcher once per frame and never shares state with the pumps.

use std::fmt;

use crate::catalog::Drink;
use crate::error::DispenseError;

/// How much of the recipe to pour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PourSize {
    /// One serving
    Single,
    /// Two servings
    Double,
}

impl PourSize {
    /// Recipe multiplier
    #[must_use]
    pub fn multiplier(self) -> f32 {
        match self {
            Self::Single => 1.0,
            Self::Double => 2.0,
        }
    }

    /// Lowercase name, as the dispensing subsystem spells it
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Double => "double",
        }
    }
}

impl fmt::Display for PourSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one pour sub-task
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PourStatus {
    /// Still pouring
    pub running: bool,
    /// Human-readable description of the pour
    pub label: String,
}

impl PourStatus {
    /// Create a snapshot
    pub fn new(running: bool, label: impl Into<String>) -> Self {
        Self {
            running,
            label: label.into(),
        }
    }
}

impl fmt::Display for PourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Handle on an in-flight dispensing operation
///
/// `done()` must only turn true once every pour has stopped running, and
/// must stay true afterwards.
pub trait Watcher {
    /// Whether the whole operation has finished; never blocks
    fn done(&self) -> bool;

    /// Current status of every pour, in a stable order
    fn pours(&self) -> Vec<PourStatus>;
}

/// The external dispensing subsystem
pub trait Dispenser<D: Drink> {
    /// Watcher returned for each drink
    type Watcher: Watcher;

    /// Start making `drink`
    ///
    /// # Errors
    ///
    /// Returns an error if the subsystem refuses the request.
    fn make_drink(&mut self, drink: &D, size: PourSize) -> Result<Self::Watcher, DispenseError>;
}
