//! Viewport observation and breakpoint resolution
//!
//! The controller never measures anything itself: hosts implement
//! [`ViewportObserver`] (a DOM container, a terminal, a test fixture) and
//! forward resize notifications. Resizes are coalesced and emitted at most
//! once per frame, and only when the resulting metrics differ.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One breakpoint: viewports at least `min_width` wide get `columns` columns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakpointRule {
    pub min_width: f64,
    pub columns: usize,
}

impl BreakpointRule {
    pub fn new(min_width: f64, columns: usize) -> Self {
        Self { min_width, columns }
    }
}

/// Ordered breakpoint table
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointTable {
    /// Sorted by descending `min_width`
    rules: Vec<BreakpointRule>,
    /// Columns below the smallest breakpoint
    fallback: usize,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::new(vec![
            BreakpointRule::new(1500.0, 5),
            BreakpointRule::new(1000.0, 4),
            BreakpointRule::new(600.0, 3),
        ])
    }
}

impl BreakpointTable {
    pub fn new(mut rules: Vec<BreakpointRule>) -> Self {
        rules.retain(|r| r.min_width.is_finite());
        rules.sort_by(|a, b| b.min_width.total_cmp(&a.min_width));
        Self { rules, fallback: 1 }
    }

    pub fn with_fallback(mut self, columns: usize) -> Self {
        self.fallback = columns.max(1);
        self
    }

    /// Column count for a viewport width
    pub fn columns_for(&self, viewport_width: f64) -> usize {
        self.rules
            .iter()
            .find(|r| viewport_width >= r.min_width)
            .map(|r| r.columns)
            .unwrap_or(self.fallback)
            .max(1)
    }

    /// Whether the width falls below every breakpoint (phone-sized viewport)
    pub fn is_compact(&self, viewport_width: f64) -> bool {
        self.rules.iter().all(|r| viewport_width < r.min_width)
    }
}

/// A single measurement of the viewport and the grid container
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSample {
    /// Width used for breakpoint matching (window / media-query width)
    pub viewport_width: f64,
    /// Measured width of the grid container
    pub container_width: f64,
}

impl ViewportSample {
    pub fn new(viewport_width: f64, container_width: f64) -> Self {
        Self {
            viewport_width,
            container_width,
        }
    }
}

/// Capability for measuring the rendering surface
pub trait ViewportObserver {
    fn measure(&self) -> ViewportSample;
}

impl ViewportObserver for ViewportSample {
    fn measure(&self) -> ViewportSample {
        *self
    }
}

/// What the balancer needs to know about the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub column_count: usize,
    pub track_width: f64,
    /// Below the smallest breakpoint
    pub compact: bool,
}

/// Turns viewport samples into column count and track width
#[derive(Debug, Clone)]
pub struct ViewportController {
    table: BreakpointTable,
    current: Option<ViewportMetrics>,
    pending: Option<ViewportSample>,
    mounted: bool,
}

impl ViewportController {
    pub fn new(table: BreakpointTable) -> Self {
        Self {
            table,
            current: None,
            pending: None,
            mounted: false,
        }
    }

    pub fn table(&self) -> &BreakpointTable {
        &self.table
    }

    pub fn metrics(&self) -> Option<ViewportMetrics> {
        self.current
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn resolve(&self, sample: ViewportSample) -> ViewportMetrics {
        ViewportMetrics {
            column_count: self.table.columns_for(sample.viewport_width),
            track_width: sample.container_width.max(0.0),
            compact: self.table.is_compact(sample.viewport_width),
        }
    }

    /// Initial measurement, applied immediately
    pub fn mount(&mut self, observer: &dyn ViewportObserver) -> ViewportMetrics {
        let metrics = self.resolve(observer.measure());
        debug!(
            columns = metrics.column_count,
            track_width = metrics.track_width,
            "Viewport mounted"
        );
        self.mounted = true;
        self.pending = None;
        self.current = Some(metrics);
        metrics
    }

    /// Record a resize; only the latest sample before the next frame counts
    pub fn notify_resize(&mut self, sample: ViewportSample) {
        if self.mounted {
            self.pending = Some(sample);
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frame callback: apply the pending resize and report changed metrics
    pub fn on_frame(&mut self) -> Option<ViewportMetrics> {
        if !self.mounted {
            return None;
        }
        let sample = self.pending.take()?;
        let metrics = self.resolve(sample);
        if self.current == Some(metrics) {
            return None;
        }
        debug!(
            columns = metrics.column_count,
            track_width = metrics.track_width,
            "Viewport changed"
        );
        self.current = Some(metrics);
        Some(metrics)
    }

    /// Drop pending work and stop emitting
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_breakpoints() {
        let table = BreakpointTable::default();
        assert_eq!(table.columns_for(1920.0), 5);
        assert_eq!(table.columns_for(1500.0), 5);
        assert_eq!(table.columns_for(1499.0), 4);
        assert_eq!(table.columns_for(1000.0), 4);
        assert_eq!(table.columns_for(600.0), 3);
        assert_eq!(table.columns_for(599.0), 1);
        assert!(table.is_compact(599.0));
        assert!(!table.is_compact(600.0));
    }

    #[test]
    fn test_unsorted_rules_are_sorted() {
        let table = BreakpointTable::new(vec![
            BreakpointRule::new(400.0, 2),
            BreakpointRule::new(900.0, 3),
        ])
        .with_fallback(1);
        assert_eq!(table.columns_for(950.0), 3);
        assert_eq!(table.columns_for(500.0), 2);
        assert_eq!(table.columns_for(100.0), 1);
    }

    #[test]
    fn test_mount_emits_immediately() {
        let mut controller = ViewportController::new(BreakpointTable::default());
        let metrics = controller.mount(&ViewportSample::new(1200.0, 1100.0));
        assert_eq!(metrics.column_count, 4);
        assert_eq!(metrics.track_width, 1100.0);
        assert_eq!(controller.on_frame(), None);
    }

    #[test]
    fn test_resizes_coalesce_per_frame() {
        let mut controller = ViewportController::new(BreakpointTable::default());
        controller.mount(&ViewportSample::new(1200.0, 1100.0));

        controller.notify_resize(ViewportSample::new(700.0, 650.0));
        controller.notify_resize(ViewportSample::new(1600.0, 1500.0));
        let metrics = controller.on_frame().unwrap();
        assert_eq!(metrics.column_count, 5);
        assert_eq!(metrics.track_width, 1500.0);
        assert_eq!(controller.on_frame(), None);
    }

    #[test]
    fn test_unchanged_resize_is_silent() {
        let mut controller = ViewportController::new(BreakpointTable::default());
        controller.mount(&ViewportSample::new(1200.0, 1100.0));
        controller.notify_resize(ViewportSample::new(1200.0, 1100.0));
        assert_eq!(controller.on_frame(), None);
    }

    #[test]
    fn test_unmount_cancels_pending() {
        let mut controller = ViewportController::new(BreakpointTable::default());
        controller.mount(&ViewportSample::new(1200.0, 1100.0));
        controller.notify_resize(ViewportSample::new(500.0, 480.0));
        controller.unmount();
        assert!(!controller.has_pending());
        assert_eq!(controller.on_frame(), None);
        controller.notify_resize(ViewportSample::new(500.0, 480.0));
        assert_eq!(controller.on_frame(), None);
    }
}
