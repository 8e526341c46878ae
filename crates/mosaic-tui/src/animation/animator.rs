//! Tile transition controller
//!
//! Plays the engine's [`TransitionPlan`]s over time. A plan that arrives while
//! another is still running is rebuilt from the frames currently on screen,
//! so tiles never jump back to an earlier position.

use std::time::{Duration, Instant};

use mosaic_core::layout::{plan_from_frames, GridItem, TileFrame, TransitionPlan};

use super::config::{TransitionConfig, TransitionConfigExt};
use super::easing::EasingTypeExt;
use super::timing::{is_complete_at, progress_at};

#[derive(Debug, Clone)]
struct ActiveTransition {
    start: Instant,
    duration: Duration,
    plan: TransitionPlan,
}

/// Animates tile geometry between layouts
#[derive(Debug, Clone, Default)]
pub struct TileAnimator {
    config: TransitionConfig,
    active: Option<ActiveTransition>,
    /// Frames shown when no transition is running
    settled: Vec<TileFrame>,
}

impl TileAnimator {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            active: None,
            settled: Vec::new(),
        }
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Start playing a plan computed against the previous layout
    ///
    /// `next` is the layout the plan ends in; it is used to retarget when a
    /// transition is already running.
    pub fn apply(&mut self, plan: TransitionPlan, next: &[GridItem]) {
        self.apply_at(plan, next, Instant::now());
    }

    pub fn apply_at(&mut self, plan: TransitionPlan, next: &[GridItem], now: Instant) {
        let plan = match self.active.take() {
            Some(_) => {
                let current = self.frames_at(now);
                plan_from_frames(&current, next)
            }
            None => plan,
        };

        if !self.config.is_animated() || plan.is_static() {
            self.settled = plan.settled_frames();
            return;
        }

        self.active = Some(ActiveTransition {
            start: now,
            duration: self.config.duration(),
            plan,
        });
    }

    /// Advance time; returns true while frames are still changing
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    pub fn update_at(&mut self, now: Instant) -> bool {
        let finished = match &self.active {
            Some(active) => is_complete_at(active.start, active.duration, now),
            None => return false,
        };
        if finished {
            if let Some(active) = self.active.take() {
                self.settled = active.plan.settled_frames();
            }
            return false;
        }
        true
    }

    /// Frames to draw right now
    pub fn frames(&self) -> Vec<TileFrame> {
        self.frames_at(Instant::now())
    }

    pub fn frames_at(&self, now: Instant) -> Vec<TileFrame> {
        match &self.active {
            Some(active) => {
                let t = progress_at(active.start, active.duration, now);
                active.plan.frames_at(self.config.easing.apply(t))
            }
            None => self.settled.clone(),
        }
    }

    /// Jump to the end of any running transition
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            self.settled = active.plan.settled_frames();
        }
    }
}
