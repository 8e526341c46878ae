//! Lightbox selection: the state machine, its input adapters and deep links

pub mod deeplink;
pub mod navigation;
pub mod state;

pub use deeplink::{external_key, normalize, resolve_key, DeepLinkSync, NoopHost, SelectionHost};
pub use navigation::{
    direct_select, keyboard_command, NavCommand, NavKey, SwipeTracker, DEFAULT_SWIPE_THRESHOLD,
};
pub use state::{Selection, SelectionChange, SelectionState};
