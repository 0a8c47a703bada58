//! Gesture Recognizer
//!
//! A two-state machine over the pointer stream. While the pointer is down
//! it tracks the horizontal drag offset; on release it classifies the
//! gesture and returns to idle.

use crate::carousel::Direction;
use crate::geometry::Point;

/// Releases with a smaller drag distance than this are taps
pub const TAP_THRESHOLD: i32 = 10;

/// What a finished pointer sequence means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gesture {
    /// Minimal drag; hit-test the release position
    Tap(Point),
    /// Horizontal drag
    Swipe(SwipeOutcome),
}

/// How a swipe resolves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// Far enough to change drinks
    Commit(Direction),
    /// Too short; return to the current drink
    SnapBack,
}

/// A classified release along with the final drag offset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Release {
    /// Drag offset at release
    pub offset: i32,
    /// Classification
    pub gesture: Gesture,
}

/// Pointer tracking state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureState {
    /// Pointer is down
    pub dragging: bool,
    /// Horizontal position where the pointer went down
    pub start_x: i32,
    /// Current horizontal drag distance
    pub offset: i32,
}

/// Classify a release
///
/// `|offset| < 10` is a tap, `|offset| > width / 4` commits a swipe in the
/// direction of the drag, anything between snaps back.
#[must_use]
pub fn classify(offset: i32, release: Point, screen_width: u32) -> Gesture {
    let distance = offset.unsigned_abs();
    if offset.abs() < TAP_THRESHOLD {
        Gesture::Tap(release)
    } else if distance as f32 > screen_width as f32 / 4.0 {
        Gesture::Swipe(SwipeOutcome::Commit(Direction::from_offset(offset)))
    } else {
        Gesture::Swipe(SwipeOutcome::SnapBack)
    }
}

/// Turns pointer events into taps and swipes
#[derive(Clone, Debug)]
pub struct GestureRecognizer {
    state: GestureState,
    screen_width: u32,
}

impl GestureRecognizer {
    /// Recognizer for a screen `screen_width` pixels wide
    #[must_use]
    pub fn new(screen_width: u32) -> Self {
        Self {
            state: GestureState::default(),
            screen_width,
        }
    }

    /// Pointer went down: start dragging from here
    pub fn pointer_down(&mut self, pos: Point) {
        self.state = GestureState {
            dragging: true,
            start_x: pos.x,
            offset: 0,
        };
    }

    /// Pointer moved: track the offset while dragging
    pub fn pointer_move(&mut self, pos: Point) {
        if self.state.dragging {
            self.state.offset = pos.x - self.state.start_x;
        }
    }

    /// Pointer lifted: classify and reset
    ///
    /// Returns `None` if no drag was in progress.
    pub fn pointer_up(&mut self, pos: Point) -> Option<Release> {
        if !self.state.dragging {
            return None;
        }
        let offset = pos.x - self.state.start_x;
        self.state = GestureState::default();

        let gesture = classify(offset, pos, self.screen_width);
        tracing::debug!(offset, ?gesture, "Pointer released");
        Some(Release { offset, gesture })
    }

    /// Whether the pointer is down
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.state.dragging
    }

    /// Current drag offset (zero when idle)
    #[must_use]
    pub fn offset(&self) -> i32 {
        self.state.offset
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(recognizer: &mut GestureRecognizer, from: i32, to: i32) -> Option<Release> {
        recognizer.pointer_down(Point::new(from, 300));
        recognizer.pointer_move(Point::new((from + to) / 2, 300));
        recognizer.pointer_move(Point::new(to, 300));
        recognizer.pointer_up(Point::new(to, 300))
    }

    #[test]
    fn test_small_movement_is_a_tap() {
        let mut recognizer = GestureRecognizer::new(720);
        let release = drag(&mut recognizer, 100, 109).unwrap();
        assert_eq!(release.gesture, Gesture::Tap(Point::new(109, 300)));
        assert_eq!(release.offset, 9);
    }

    #[test]
    fn test_long_left_swipe_commits_next() {
        let mut recognizer = GestureRecognizer::new(720);
        let release = drag(&mut recognizer, 500, 300).unwrap();
        assert_eq!(release.offset, -200);
        assert_eq!(
            release.gesture,
            Gesture::Swipe(SwipeOutcome::Commit(Direction::Next))
        );
    }

    #[test]
    fn test_long_right_swipe_commits_previous() {
        let mut recognizer = GestureRecognizer::new(720);
        let release = drag(&mut recognizer, 100, 400).unwrap();
        assert_eq!(
            release.gesture,
            Gesture::Swipe(SwipeOutcome::Commit(Direction::Previous))
        );
    }

    #[test]
    fn test_threshold_boundaries() {
        // Exactly a quarter of the width does not commit
        assert_eq!(
            classify(-180, Point::default(), 720),
            Gesture::Swipe(SwipeOutcome::SnapBack)
        );
        assert_eq!(
            classify(181, Point::default(), 720),
            Gesture::Swipe(SwipeOutcome::Commit(Direction::Previous))
        );
        assert_eq!(
            classify(10, Point::default(), 720),
            Gesture::Swipe(SwipeOutcome::SnapBack)
        );
        assert_eq!(
            classify(-9, Point::default(), 720),
            Gesture::Tap(Point::default())
        );
    }

    #[test]
    fn test_classification_over_all_offsets() {
        for offset in -720..=720 {
            let gesture = classify(offset, Point::default(), 720);
            let expected = if offset.abs() < 10 {
                Gesture::Tap(Point::default())
            } else if offset.abs() > 180 {
                Gesture::Swipe(SwipeOutcome::Commit(Direction::from_offset(offset)))
            } else {
                Gesture::Swipe(SwipeOutcome::SnapBack)
            };
            assert_eq!(gesture, expected, "offset {offset}");
        }
    }

    #[test]
    fn test_release_resets_state() {
        let mut recognizer = GestureRecognizer::new(720);
        recognizer.pointer_down(Point::new(300, 300));
        recognizer.pointer_move(Point::new(250, 300));
        assert!(recognizer.is_dragging());
        assert_eq!(recognizer.offset(), -50);

        recognizer.pointer_up(Point::new(250, 300));
        assert_eq!(recognizer.state(), GestureState::default());
    }

    #[test]
    fn test_release_uses_final_position() {
        let mut recognizer = GestureRecognizer::new(720);
        recognizer.pointer_down(Point::new(500, 300));
        // No move events reached us before the finger lifted
        let release = recognizer.pointer_up(Point::new(250, 300)).unwrap();
        assert_eq!(release.offset, -250);
    }

    #[test]
    fn test_moves_and_release_without_press_are_ignored() {
        let mut recognizer = GestureRecognizer::new(720);
        recognizer.pointer_move(Point::new(400, 300));
        assert_eq!(recognizer.offset(), 0);
        assert_eq!(recognizer.pointer_up(Point::new(400, 300)), None);
    }
}
