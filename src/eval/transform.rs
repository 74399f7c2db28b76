use crate::{
    animation::track::AnimProperty,
    foundation::core::{Affine, Resolution, Vec2},
    timeline::model::Clip,
};

/// Fully resolved transform of one clip at one instant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ClipTransform {
    /// Offset of the layer centre from the canvas centre, pixels.
    pub x: f64,
    /// Vertical offset of the layer centre from the canvas centre, pixels.
    pub y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Radians.
    pub rotation: f64,
    /// Layer opacity; see [`ClipTransform::effective_opacity`].
    pub opacity: f64,
}

impl Default for ClipTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
        }
    }
}

impl ClipTransform {
    /// Value of one property.
    pub fn get(&self, prop: AnimProperty) -> f64 {
        match prop {
            AnimProperty::X => self.x,
            AnimProperty::Y => self.y,
            AnimProperty::Scale => self.scale,
            AnimProperty::Rotation => self.rotation,
            AnimProperty::Opacity => self.opacity,
        }
    }

    /// Opacity clamped to `0..=1` for compositing.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_finite() {
            self.opacity.clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    /// Layer-to-canvas affine for a `layer_w x layer_h` raster.
    ///
    /// The layer is scaled and rotated about its own centre, then its centre is
    /// placed at the canvas centre offset by `(x, y)`.
    pub fn to_affine(&self, layer_w: f64, layer_h: f64, canvas: Resolution) -> Affine {
        let centre = canvas.center() + Vec2::new(self.x, self.y);
        Affine::translate(centre)
            * Affine::rotate(self.rotation)
            * Affine::scale(self.scale)
            * Affine::translate(Vec2::new(-layer_w / 2.0, -layer_h / 2.0))
    }
}

/// Resolve every animated property of `clip` at global `time`.
///
/// Curves are sampled in clip-local time (`time - clip.start`). The clip's
/// active window is not checked here.
pub fn render_clip(clip: &Clip, time: f64) -> ClipTransform {
    let local = time - clip.start;
    let t = &clip.transform;
    ClipTransform {
        x: t.sample(AnimProperty::X, local),
        y: t.sample(AnimProperty::Y, local),
        scale: t.sample(AnimProperty::Scale, local),
        rotation: t.sample(AnimProperty::Rotation, local),
        opacity: t.sample(AnimProperty::Opacity, local),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/transform.rs"]
mod tests;
