pub mod config;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod layout;
pub mod selection;

pub use config::{AppConfig, EasingType, TransitionConfig};
pub use engine::{EngineOptions, GalleryEngine, GalleryVariant, ThemeMode, ViewerControls};
pub use error::{Error, Result};
pub use gallery::{Item, ItemId, Media, MediaKind};
