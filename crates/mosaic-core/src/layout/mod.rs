//! Grid geometry: column balancing, viewport breakpoints and tile transitions

pub mod balancer;
pub mod transition;
pub mod viewport;

pub use balancer::{layout, rendered_height, ColumnState, GridItem, MasonryLayout, TileRect};
pub use transition::{plan, plan_from_frames, TileFrame, TileTransition, TransitionKind, TransitionPlan};
pub use viewport::{
    BreakpointRule, BreakpointTable, ViewportController, ViewportMetrics, ViewportObserver,
    ViewportSample,
};
