use std::collections::BTreeMap;

use crate::{
    animation::track::TransformTrack,
    foundation::core::check_seconds,
    foundation::error::{ClipforgeError, ClipforgeResult},
};

/// Length new clips get when created from an upload or "add text/shape".
pub const DEFAULT_CLIP_DURATION: f64 = 5.0;

/// The atomic timeline unit: a timed element with animated transform and effects.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    /// Unique id within the project.
    pub id: String,
    /// Start on the global timeline, seconds.
    pub start: f64,
    /// Length in seconds, `> 0`.
    pub duration: f64,
    /// Kind-specific content.
    #[serde(flatten)]
    pub payload: ClipPayload,
    /// Animation curves, in clip-local time.
    #[serde(default)]
    pub transform: TransformTrack,
    /// Effects applied in order to the clip's raster.
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

/// Tag of the clip variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    /// Still image.
    Image,
    /// Video, drawn from its poster.
    Video,
    /// Single line of text.
    Text,
    /// Filled and stroked geometry.
    Shape,
}

/// Per-kind payload, serialized flat next to the clip fields with a `type` tag.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipPayload {
    /// Still image.
    Image(MediaPayload),
    /// Video, drawn from its poster.
    Video(MediaPayload),
    /// Single line of text.
    Text(TextPayload),
    /// Filled and stroked geometry.
    Shape(ShapePayload),
}

/// Content of image and video clips.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPayload {
    /// Image or video URL, resolved by the asset store.
    pub media_url: String,
    /// MIME type reported by the upload, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Content of a text clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPayload {
    /// Text to draw.
    pub content: String,
    /// Font family.
    #[serde(default = "default_font")]
    pub font: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// CSS colour string.
    #[serde(default = "default_text_color")]
    pub color: String,
}

/// Geometry of a shape clip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Square filling the layer box.
    Rectangle,
    /// Circle inscribed in the layer box.
    Circle,
    /// Upward isosceles triangle.
    Triangle,
}

/// Content of a shape clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapePayload {
    /// Geometry.
    #[serde(default = "default_shape_kind")]
    pub shape_type: ShapeKind,
    /// CSS fill colour.
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    /// CSS stroke colour.
    #[serde(default = "default_stroke_color")]
    pub stroke_color: String,
    /// Stroke width in pixels.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_font() -> String {
    "Arial".to_string()
}

fn default_font_size() -> f64 {
    48.0
}

fn default_text_color() -> String {
    "#ffffff".to_string()
}

fn default_shape_kind() -> ShapeKind {
    ShapeKind::Rectangle
}

fn default_fill_color() -> String {
    "#14b8a6".to_string()
}

fn default_stroke_color() -> String {
    "#ffffff".to_string()
}

fn default_stroke_width() -> f64 {
    2.0
}

/// A named pixel-space operation attached to a clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EffectInstance {
    /// Effect name, matched case-insensitively.
    pub name: String,
    /// Numeric parameters by name.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
}

impl EffectInstance {
    /// Effect with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Set one parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Parameter value, if set.
    pub fn param(&self, key: &str) -> Option<f64> {
        self.params.get(key).copied()
    }
}

/// An ordered lane of clips. Later tracks draw on top of earlier ones.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Track {
    /// Track id.
    pub id: String,
    /// Clips in draw order.
    #[serde(default)]
    pub clips: Vec<Clip>,
}

impl Track {
    /// Empty track.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            clips: Vec::new(),
        }
    }

    /// Append a clip.
    pub fn with_clip(mut self, clip: Clip) -> Self {
        self.clips.push(clip);
        self
    }
}

impl ClipPayload {
    /// Variant tag.
    pub fn kind(&self) -> ClipKind {
        match self {
            Self::Image(_) => ClipKind::Image,
            Self::Video(_) => ClipKind::Video,
            Self::Text(_) => ClipKind::Text,
            Self::Shape(_) => ClipKind::Shape,
        }
    }

    /// Media URL for image and video clips.
    pub fn media_url(&self) -> Option<&str> {
        match self {
            Self::Image(m) | Self::Video(m) => Some(&m.media_url),
            Self::Text(_) | Self::Shape(_) => None,
        }
    }
}

impl Clip {
    fn with_payload(id: impl Into<String>, payload: ClipPayload) -> Self {
        Self {
            id: id.into(),
            start: 0.0,
            duration: DEFAULT_CLIP_DURATION,
            payload,
            transform: TransformTrack::identity(),
            effects: Vec::new(),
        }
    }

    /// Image clip with editor defaults.
    pub fn image(id: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self::with_payload(
            id,
            ClipPayload::Image(MediaPayload {
                media_url: media_url.into(),
                media_type: None,
            }),
        )
    }

    /// Video clip with editor defaults.
    pub fn video(id: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self::with_payload(
            id,
            ClipPayload::Video(MediaPayload {
                media_url: media_url.into(),
                media_type: None,
            }),
        )
    }

    /// Text clip with editor defaults.
    pub fn text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::with_payload(
            id,
            ClipPayload::Text(TextPayload {
                content: content.into(),
                font: default_font(),
                font_size: default_font_size(),
                color: default_text_color(),
            }),
        )
    }

    /// Shape clip with editor defaults.
    pub fn shape(id: impl Into<String>, shape_type: ShapeKind) -> Self {
        Self::with_payload(
            id,
            ClipPayload::Shape(ShapePayload {
                shape_type,
                fill_color: default_fill_color(),
                stroke_color: default_stroke_color(),
                stroke_width: default_stroke_width(),
            }),
        )
    }

    /// Set start and duration.
    pub fn with_timing(mut self, start: f64, duration: f64) -> Self {
        self.start = start;
        self.duration = duration;
        self
    }

    /// Replace the animation curves.
    pub fn with_transform(mut self, transform: TransformTrack) -> Self {
        self.transform = transform;
        self
    }

    /// Append an effect.
    pub fn with_effect(mut self, effect: EffectInstance) -> Self {
        self.effects.push(effect);
        self
    }

    /// Variant tag.
    pub fn kind(&self) -> ClipKind {
        self.payload.kind()
    }

    /// End time on the global timeline.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Closed-interval membership: `start <= time <= start + duration`.
    pub fn is_active_at(&self, time: f64) -> bool {
        time >= self.start && time <= self.end()
    }

    /// Check timing, payload and curves.
    pub fn validate(&self) -> ClipforgeResult<()> {
        if self.id.trim().is_empty() {
            return Err(ClipforgeError::validation("clip id must be non-empty"));
        }
        check_seconds("clip start", self.start)?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ClipforgeError::validation(format!(
                "clip '{}' duration must be finite and > 0",
                self.id
            )));
        }
        match &self.payload {
            ClipPayload::Text(t) if !t.font_size.is_finite() || t.font_size <= 0.0 => {
                return Err(ClipforgeError::validation(format!(
                    "clip '{}' font size must be > 0",
                    self.id
                )));
            }
            ClipPayload::Shape(s) if !s.stroke_width.is_finite() || s.stroke_width < 0.0 => {
                return Err(ClipforgeError::validation(format!(
                    "clip '{}' stroke width must be >= 0",
                    self.id
                )));
            }
            _ => {}
        }
        self.transform
            .validate()
            .map_err(|e| ClipforgeError::validation(format!("clip '{}': {e}", self.id)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;
