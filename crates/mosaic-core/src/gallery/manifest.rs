//! Gallery manifests
//!
//! A manifest is a TOML or JSON file with an `items` array. Entries use the
//! flat, discriminant-string shape authors write by hand:
//!
//! ```toml
//! [[items]]
//! id = "harbour"
//! height = 600
//! type = "video"
//! video = "media/harbour.mp4"
//! poster = "media/harbour.jpg"
//! title = { en = "Harbour", de = "Hafen" }
//! ```
//!
//! and are converted into [`Item`]s with a tagged [`Media`] payload.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use super::item::{
    ensure_unique_ids, ActionLink, DocumentLink, Item, ItemId, LocalizedText, Media, MediaKind,
};
use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: ItemId,
    #[serde(alias = "declared_height")]
    height: f64,
    #[serde(rename = "type")]
    kind: MediaKind,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    video: Option<String>,
    #[serde(default)]
    poster: Option<String>,
    #[serde(default)]
    scene: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    title: Option<LocalizedText>,
    #[serde(default)]
    description: Option<LocalizedText>,
    #[serde(default)]
    documents: Vec<DocumentLink>,
    #[serde(default)]
    action: Option<ActionLink>,
}

impl RawItem {
    fn into_item(self) -> Item {
        let media = match self.kind {
            MediaKind::Image => self.image.map(|src| Media::Image { src }),
            MediaKind::Video => self.video.map(|src| Media::Video {
                src,
                poster: self.poster,
            }),
            MediaKind::EmbeddedScene => self.scene.map(|scene| Media::EmbeddedScene {
                scene,
                thumbnail: self.thumbnail,
            }),
        };

        let media = media.unwrap_or_else(|| {
            warn!(
                id = %self.id,
                kind = self.kind.label(),
                "Item has no media reference for its type, showing a placeholder"
            );
            Media::Missing(self.kind)
        });

        for doc in &self.documents {
            if let Err(e) = url::Url::parse(&doc.url) {
                warn!(id = %self.id, url = %doc.url, error = %e, "Document link is not an absolute URL");
            }
        }

        Item {
            id: self.id,
            declared_height: self.height,
            media,
            title: self.title,
            description: self.description,
            document_links: self.documents,
            action_link: self.action,
        }
    }
}

/// Manifest file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("toml") => Ok(ManifestFormat::Toml),
            Some("json") => Ok(ManifestFormat::Json),
            _ => Err(Error::UnsupportedManifest(path.display().to_string())),
        }
    }
}

/// Parse manifest text
pub fn parse(content: &str, format: ManifestFormat) -> Result<Vec<Item>> {
    let raw: RawManifest = match format {
        ManifestFormat::Toml => toml::from_str(content)?,
        ManifestFormat::Json => serde_json::from_str(content)?,
    };

    let items: Vec<Item> = raw.items.into_iter().map(RawItem::into_item).collect();

    if let Some(bad) = items
        .iter()
        .find(|i| !i.declared_height.is_finite() || i.declared_height < 0.0)
    {
        return Err(Error::Manifest(format!(
            "item '{}' has an invalid height {}",
            bad.id, bad.declared_height
        )));
    }

    ensure_unique_ids(&items)?;
    Ok(items)
}

/// Load a manifest from disk
pub fn load(path: &Path) -> Result<Vec<Item>> {
    let format = ManifestFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;
    let items = parse(&content, format)?;
    debug!(path = %path.display(), count = items.len(), "Loaded gallery manifest");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_MANIFEST: &str = r#"
[[items]]
id = "harbour"
height = 600
type = "video"
video = "media/harbour.mp4"
poster = "media/harbour.jpg"
title = { en = "Harbour Lights", de = "Hafenlichter" }
documents = [{ display_name = "Case study", url = "https://example.com/harbour.pdf" }]
action = { url = "https://example.com/harbour", label = "Visit" }

[[items]]
id = 2
height = 400
type = "image"
image = "media/two.png"
title = "Second"

[[items]]
id = "scene"
height = 800
type = "embedded_scene"
"#;

    #[test]
    fn test_parse_toml_manifest() {
        let items = parse(TOML_MANIFEST, ManifestFormat::Toml).unwrap();
        assert_eq!(items.len(), 3);

        let harbour = &items[0];
        assert_eq!(harbour.id.as_str(), "harbour");
        assert_eq!(harbour.declared_height, 600.0);
        assert_eq!(
            harbour.media,
            Media::Video {
                src: "media/harbour.mp4".into(),
                poster: Some("media/harbour.jpg".into()),
            }
        );
        assert_eq!(harbour.document_links.len(), 1);
        assert_eq!(harbour.action_link.as_ref().map(|a| a.label.as_str()), Some("Visit"));
        assert_eq!(
            harbour.title.as_ref().and_then(|t| t.resolve("de", "en")),
            Some("Hafenlichter")
        );

        assert_eq!(items[1].id.as_str(), "2");
        assert_eq!(items[2].media, Media::Missing(MediaKind::EmbeddedScene));
    }

    #[test]
    fn test_parse_json_manifest() {
        let json = r#"{"items": [
            {"id": "a", "height": 600, "type": "image", "image": "a.png"},
            {"id": "b", "declared_height": 400, "type": "embedded_scene", "scene": "b.glb", "thumbnail": "b.png"}
        ]}"#;
        let items = parse(json, ManifestFormat::Json).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].declared_height, 400.0);
        assert_eq!(items[1].media.preview_ref(), Some("b.png"));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{"items": [
            {"id": "a", "height": 600, "type": "image", "image": "a.png"},
            {"id": "a", "height": 400, "type": "image", "image": "b.png"}
        ]}"#;
        assert!(matches!(
            parse(json, ManifestFormat::Json),
            Err(Error::DuplicateItemId(_))
        ));
    }

    #[test]
    fn test_negative_height_rejected() {
        let json = r#"{"items": [{"id": "a", "height": -1, "type": "image", "image": "a.png"}]}"#;
        assert!(matches!(parse(json, ManifestFormat::Json), Err(Error::Manifest(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("gallery.TOML")).unwrap(),
            ManifestFormat::Toml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("gallery.json")).unwrap(),
            ManifestFormat::Json
        );
        assert!(ManifestFormat::from_path(Path::new("gallery.yaml")).is_err());
    }
}
