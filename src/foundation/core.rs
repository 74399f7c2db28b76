use crate::foundation::error::{ClipforgeError, ClipforgeResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Output raster size in pixels. Serialized as `[width, height]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Build a resolution, rejecting zero dimensions.
    pub fn new(width: u32, height: u32) -> ClipforgeResult<Self> {
        let r = Self { width, height };
        r.validate()?;
        Ok(r)
    }

    /// Check that both dimensions are non-zero.
    pub fn validate(self) -> ClipforgeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ClipforgeError::validation(
                "resolution width/height must be > 0",
            ));
        }
        Ok(())
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> ClipforgeResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ClipforgeError::validation("resolution buffer size overflow"))
    }

    /// Canvas centre in pixel space.
    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

impl From<[u32; 2]> for Resolution {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Resolution> for [u32; 2] {
    fn from(r: Resolution) -> Self {
        [r.width, r.height]
    }
}

/// Validate a time or duration in seconds: finite and `>= 0`.
pub(crate) fn check_seconds(what: &str, v: f64) -> ClipforgeResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ClipforgeError::validation(format!(
            "{what} must be finite and >= 0 (got {v})"
        )));
    }
    Ok(())
}

/// Validate a frame rate: finite and `> 0`.
pub(crate) fn check_fps(fps: f64) -> ClipforgeResult<()> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(ClipforgeError::validation(format!(
            "fps must be finite and > 0 (got {fps})"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
