use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of a gallery item
///
/// Manifests may use strings or integers; both are stored in string form so
/// that `7` and `"7"` name the same item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

// Accept either a string or an integer
impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ItemIdVisitor;

        impl<'de> Visitor<'de> for ItemIdVisitor {
            type Value = ItemId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer item id")
            }

            fn visit_str<E>(self, value: &str) -> Result<ItemId, E>
            where
                E: de::Error,
            {
                Ok(ItemId::new(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<ItemId, E>
            where
                E: de::Error,
            {
                Ok(ItemId::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<ItemId, E>
            where
                E: de::Error,
            {
                Ok(ItemId(value.to_string()))
            }
        }

        deserializer.deserialize_any(ItemIdVisitor)
    }
}

/// Declared media kind (the manifest's `type` discriminant)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    EmbeddedScene,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::EmbeddedScene => "3d scene",
        }
    }
}

/// Media payload of an item
///
/// References are opaque to the engine: paths, URLs or asset keys chosen by
/// the host. `Missing` keeps an item whose declared kind lacks its reference
/// so it can still be laid out and drawn as a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Image { src: String },
    Video { src: String, poster: Option<String> },
    EmbeddedScene { scene: String, thumbnail: Option<String> },
    Missing(MediaKind),
}

impl Media {
    pub fn kind(&self) -> MediaKind {
        match self {
            Media::Image { .. } => MediaKind::Image,
            Media::Video { .. } => MediaKind::Video,
            Media::EmbeddedScene { .. } => MediaKind::EmbeddedScene,
            Media::Missing(kind) => *kind,
        }
    }

    /// Reference to a still picture for this media, if there is one
    pub fn preview_ref(&self) -> Option<&str> {
        match self {
            Media::Image { src } => Some(src),
            Media::Video { poster, .. } => poster.as_deref(),
            Media::EmbeddedScene { thumbnail, .. } => thumbnail.as_deref(),
            Media::Missing(_) => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Media::Missing(_))
    }
}

/// Title or description text
///
/// Either already resolved by the caller or keyed by locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedText {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl LocalizedText {
    /// Pick the text for `locale`, then `fallback`, then any available translation
    pub fn resolve(&self, locale: &str, fallback: &str) -> Option<&str> {
        match self {
            LocalizedText::Plain(text) => Some(text),
            LocalizedText::Localized(map) => map
                .get(locale)
                .or_else(|| map.get(fallback))
                .or_else(|| map.values().next())
                .map(String::as_str),
        }
    }

    /// Every translation of this text
    pub fn variants(&self) -> Vec<&str> {
        match self {
            LocalizedText::Plain(text) => vec![text.as_str()],
            LocalizedText::Localized(map) => map.values().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        LocalizedText::Plain(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLink {
    pub display_name: String,
    pub url: String,
}

/// Call-to-action link shown under the item in the lightbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
    pub url: String,
    pub label: String,
}

/// A displayed gallery tile, supplied by the caller and never mutated by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Relative height weight; tiles render at half of it
    pub declared_height: f64,
    pub media: Media,
    pub title: Option<LocalizedText>,
    pub description: Option<LocalizedText>,
    pub document_links: Vec<DocumentLink>,
    pub action_link: Option<ActionLink>,
}

impl Item {
    /// Minimal image item, mostly useful for hosts building lists in code
    pub fn image(id: impl Into<String>, declared_height: f64, src: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            declared_height,
            media: Media::Image { src: src.into() },
            title: None,
            description: None,
            document_links: Vec::new(),
            action_link: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<LocalizedText>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self, locale: &str, fallback: &str) -> String {
        self.title
            .as_ref()
            .and_then(|t| t.resolve(locale, fallback))
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }
}

/// Check the id-uniqueness invariant, reporting the first repeated id
pub fn ensure_unique_ids(items: &[Item]) -> crate::Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(&item.id) {
            return Err(crate::Error::DuplicateItemId(item.id.to_string()));
        }
    }
    Ok(())
}
