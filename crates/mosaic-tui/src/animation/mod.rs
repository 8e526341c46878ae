//! Tile transition playback for the terminal gallery
//!
//! - `easing` - easing curves over [0, 1]
//! - `timing` - progress and unit conversion helpers
//! - `config` - transition settings (re-exported from mosaic-core)
//! - `animator` - plays layout transition plans frame by frame

pub mod config;
pub mod easing;
pub mod timing;

pub mod animator;

pub use animator::TileAnimator;
pub use config::{TransitionConfig, TransitionConfigExt};
pub use easing::{EasingType, EasingTypeExt};
