use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    effects::composite::premultiply_in_place,
    foundation::error::{ClipforgeError, ClipforgeResult},
    timeline::{model::ClipPayload, state::EditorState},
};

/// A decoded raster ready for compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixels, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
    /// Raster pixels per layer unit. Below `1.0` when an oversized layer was
    /// rasterized at reduced size.
    pub scale: f64,
}

impl PreparedImage {
    /// Wrap straight-alpha RGBA8 pixels, premultiplying them.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> ClipforgeResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ClipforgeError::validation("image buffer size overflow"))?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(ClipforgeError::validation(format!(
                "image buffer must be non-empty and match {width}x{height}x4"
            )));
        }
        premultiply_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba),
            scale: 1.0,
        })
    }

    /// Size of the layer this raster stands for, in layer units.
    pub fn layer_size(&self) -> (f64, f64) {
        (
            f64::from(self.width) / self.scale,
            f64::from(self.height) / self.scale,
        )
    }
}

/// Decode encoded image bytes (PNG, JPEG, ...) into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> ClipforgeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PreparedImage::from_straight_rgba8(width, height, rgba.into_raw())
}

/// URLs that only make sense inside a browser session or over the network.
pub fn is_remote_url(url: &str) -> bool {
    ["blob:", "http://", "https://", "data:"]
        .iter()
        .any(|p| url.starts_with(p))
}

/// Decoded media rasters keyed by the clip's media URL.
///
/// Local URLs resolve against `root`. Video clips draw from a poster raster
/// registered under the video's URL.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    root: PathBuf,
    images: HashMap<String, PreparedImage>,
    posters: HashMap<String, PreparedImage>,
}

impl AssetStore {
    /// Empty store resolving local URLs against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Directory local media URLs resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode every local image referenced by `state`.
    ///
    /// Remote URLs are skipped with a warning and render as empty layers.
    #[tracing::instrument(skip(state, root))]
    pub fn prepare(state: &EditorState, root: impl Into<PathBuf>) -> ClipforgeResult<Self> {
        let mut store = Self::new(root);
        for clip in state.clips() {
            let ClipPayload::Image(media) = &clip.payload else {
                continue;
            };
            if store.images.contains_key(&media.media_url) {
                continue;
            }
            if is_remote_url(&media.media_url) {
                tracing::warn!(clip_id = %clip.id, url = %media.media_url, "skipping remote image");
                continue;
            }
            store.load_image(&media.media_url)?;
        }
        tracing::debug!(images = store.images.len(), "prepared assets");
        Ok(store)
    }

    /// Filesystem path for a local media URL; a `file://` prefix is stripped.
    pub fn resolve_path(&self, url: &str) -> PathBuf {
        let local = url.strip_prefix("file://").unwrap_or(url);
        self.root.join(local)
    }

    /// Read and decode a local image, registering it under `url`.
    pub fn load_image(&mut self, url: &str) -> ClipforgeResult<()> {
        let path = self.resolve_path(url);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        let img = decode_image(&bytes)?;
        self.images.insert(url.to_string(), img);
        Ok(())
    }

    /// Register an already decoded image under `url`.
    pub fn insert_image(&mut self, url: impl Into<String>, img: PreparedImage) {
        self.images.insert(url.into(), img);
    }

    /// Register the still frame drawn for a video clip.
    pub fn register_poster(&mut self, video_url: impl Into<String>, img: PreparedImage) {
        self.posters.insert(video_url.into(), img);
    }

    /// Raster registered for an image URL.
    pub fn image(&self, url: &str) -> Option<&PreparedImage> {
        self.images.get(url)
    }

    /// Poster registered for a video URL.
    pub fn poster(&self, video_url: &str) -> Option<&PreparedImage> {
        self.posters.get(video_url)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
