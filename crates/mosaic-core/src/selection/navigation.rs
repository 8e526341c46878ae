//! Input adapters for the lightbox
//!
//! Keyboard, swipe and direct (tile / thumbnail) input all reduce to a
//! [`NavCommand`]. None of the adapters keep their own notion of which item is
//! active; they only produce commands for the engine's single selection.

use super::state::SelectionState;

/// Default minimum horizontal travel for a swipe, in logical pixels
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
    Close,
    OpenAt(usize),
}

/// Keys the lightbox understands, independent of the host's key events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// Keyboard adapter, active only while the viewer is open
pub fn keyboard_command(key: NavKey, state: SelectionState) -> Option<NavCommand> {
    if !state.is_open() {
        return None;
    }
    Some(match key {
        NavKey::ArrowLeft => NavCommand::Previous,
        NavKey::ArrowRight => NavCommand::Next,
        NavKey::Escape => NavCommand::Close,
    })
}

/// Tile or thumbnail click
pub fn direct_select(index: usize) -> NavCommand {
    NavCommand::OpenAt(index)
}

/// Horizontal swipe detector
///
/// `delta = start - end`, so dragging right-to-left is positive and means
/// "next". Travel at or below the threshold is not a gesture.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<f64>,
    last: Option<f64>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl SwipeTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            start: None,
            last: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }

    pub fn touch_start(&mut self, x: f64) {
        self.start = Some(x);
        self.last = None;
    }

    pub fn touch_move(&mut self, x: f64) {
        if self.start.is_some() {
            self.last = Some(x);
        }
    }

    /// Finish the gesture and classify it
    pub fn touch_end(&mut self) -> Option<NavCommand> {
        let start = self.start.take()?;
        let end = self.last.take()?;
        let delta = start - end;
        if delta > self.threshold {
            Some(NavCommand::Next)
        } else if delta < -self.threshold {
            Some(NavCommand::Previous)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.last = None;
    }
}
