mod item;
pub mod manifest;

pub use item::{
    ensure_unique_ids, ActionLink, DocumentLink, Item, ItemId, LocalizedText, Media, MediaKind,
};
