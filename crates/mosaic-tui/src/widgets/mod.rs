mod gallery;
mod halfblock;
mod lightbox;
mod status_bar;
mod text;

pub use gallery::GalleryWidget;
pub use lightbox::LightboxWidget;
pub use status_bar::StatusBarWidget;
