//! Lazy media loading for tiles and the lightbox
//!
//! Posters, thumbnails and images are fetched on a tokio task the first time
//! something asks for them and handed back to the UI loop over a channel.
//! Remote references go through reqwest; anything else is read from disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::DynamicImage;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Result of an async media load
#[derive(Debug)]
pub enum MediaLoadResult {
    Success {
        reference: String,
        image: DynamicImage,
    },
    Failure {
        reference: String,
        error: String,
    },
}

impl MediaLoadResult {
    pub fn reference(&self) -> &str {
        match self {
            MediaLoadResult::Success { reference, .. } | MediaLoadResult::Failure { reference, .. } => {
                reference
            }
        }
    }
}

/// Load state of one media reference
#[derive(Debug, Clone)]
pub enum MediaState {
    Loading,
    Loaded(Arc<DynamicImage>),
    Failed(String),
}

/// Decoded media keyed by reference
#[derive(Debug, Default)]
pub struct MediaCache {
    entries: HashMap<String, MediaState>,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<&MediaState> {
        self.entries.get(reference)
    }

    pub fn image(&self, reference: &str) -> Option<&Arc<DynamicImage>> {
        match self.entries.get(reference) {
            Some(MediaState::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    pub fn is_loading(&self, reference: &str) -> bool {
        matches!(self.entries.get(reference), Some(MediaState::Loading))
    }

    pub fn is_failed(&self, reference: &str) -> bool {
        matches!(self.entries.get(reference), Some(MediaState::Failed(_)))
    }

    /// Mark a reference as loading; returns false if it was already known
    pub fn start_loading(&mut self, reference: &str) -> bool {
        if self.entries.contains_key(reference) {
            return false;
        }
        self.entries.insert(reference.to_string(), MediaState::Loading);
        true
    }

    /// Record a finished load
    pub fn apply(&mut self, result: MediaLoadResult) {
        match result {
            MediaLoadResult::Success { reference, image } => {
                debug!(reference = %reference, "Media loaded");
                self.entries.insert(reference, MediaState::Loaded(Arc::new(image)));
            }
            MediaLoadResult::Failure { reference, error } => {
                warn!(reference = %reference, error = %error, "Media failed to load");
                self.entries.insert(reference, MediaState::Failed(error));
            }
        }
    }

    /// Placeholder text for references that are not drawable yet
    pub fn status_text(&self, reference: &str) -> Option<String> {
        match self.entries.get(reference) {
            Some(MediaState::Loading) => Some("[Loading...]".to_string()),
            Some(MediaState::Failed(err)) => Some(format!("[Failed: {}]", err)),
            None => Some("[Not loaded]".to_string()),
            Some(MediaState::Loaded(_)) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Request `reference` unless it is already cached or in flight
pub fn request(cache: &mut MediaCache, reference: &str, tx: &mpsc::UnboundedSender<MediaLoadResult>) {
    if cache.start_loading(reference) {
        spawn_media_load(reference.to_string(), tx.clone());
    }
}

/// Spawn an async task that loads and decodes one reference
pub fn spawn_media_load(reference: String, tx: mpsc::UnboundedSender<MediaLoadResult>) {
    tokio::spawn(async move {
        let result = match load_media(&reference).await {
            Ok(image) => MediaLoadResult::Success { reference, image },
            Err(error) => MediaLoadResult::Failure { reference, error },
        };
        let _ = tx.send(result);
    });
}

/// Fetch and decode a media reference
pub async fn load_media(reference: &str) -> Result<DynamicImage, String> {
    let bytes = if is_remote(reference) {
        download_bytes(reference).await?
    } else {
        tokio::fs::read(Path::new(reference))
            .await
            .map_err(|e| format!("Read error: {}", e))?
    };

    // Decoding is CPU-bound
    tokio::task::spawn_blocking(move || decode_image_bytes(&bytes))
        .await
        .map_err(|e| format!("Task failed: {}", e))?
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

async fn download_bytes(url: &str) -> Result<Vec<u8>, String> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("mosaic/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| format!("Client error: {}", e))?;

    let response = client
        .get(url)
        .header("Accept", "image/png,image/jpeg,image/gif,image/webp,image/*;q=0.8")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }

    response
        .bytes()
        .await
        .map(|b| b.to_vec())
        .map_err(|e| format!("Read error: {}", e))
}

/// Decode image bytes with format detection
fn decode_image_bytes(bytes: &[u8]) -> Result<DynamicImage, String> {
    if bytes.is_empty() {
        return Err("Empty data".to_string());
    }

    if let Ok(img) = image::load_from_memory(bytes) {
        return Ok(img);
    }

    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| format!("PNG: {}", e));
    }
    if bytes.starts_with(b"\xff\xd8\xff") {
        return image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)
            .map_err(|e| format!("JPEG: {}", e));
    }

    Err(format!("Unknown format ({}B)", bytes.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let image = DynamicImage::new_rgb8(2, 3);
        let mut out = std::io::Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image_bytes(&[]).is_err());
        assert!(decode_image_bytes(b"definitely not an image").is_err());
    }

    #[test]
    fn test_cache_states() {
        let mut cache = MediaCache::new();
        assert!(cache.start_loading("a.png"));
        assert!(!cache.start_loading("a.png"));
        assert!(cache.is_loading("a.png"));
        assert_eq!(cache.status_text("a.png").as_deref(), Some("[Loading...]"));

        cache.apply(MediaLoadResult::Failure {
            reference: "a.png".into(),
            error: "HTTP 404".into(),
        });
        assert!(!cache.is_loading("a.png"));
        assert!(cache.is_failed("a.png"));
        assert_eq!(cache.status_text("a.png").as_deref(), Some("[Failed: HTTP 404]"));

        cache.apply(MediaLoadResult::Success {
            reference: "b.png".into(),
            image: DynamicImage::new_rgb8(1, 1),
        });
        assert!(cache.image("b.png").is_some());
        assert_eq!(cache.status_text("b.png"), None);
    }

    #[tokio::test]
    async fn test_loads_local_file() {
        let path = std::env::temp_dir().join(format!("mosaic-media-{}.png", std::process::id()));
        tokio::fs::write(&path, png_bytes()).await.unwrap();

        let image = load_media(path.to_str().unwrap()).await.unwrap();
        assert_eq!((image.width(), image.height()), (2, 3));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_missing_file_reports_failure() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut cache = MediaCache::new();
        request(&mut cache, "/nonexistent/mosaic/poster.png", &tx);
        request(&mut cache, "/nonexistent/mosaic/poster.png", &tx);

        let result = rx.recv().await.unwrap();
        assert_eq!(result.reference(), "/nonexistent/mosaic/poster.png");
        assert!(matches!(result, MediaLoadResult::Failure { .. }));
        cache.apply(result);
        assert!(rx.try_recv().is_err());
    }
}
