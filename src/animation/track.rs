use crate::{
    animation::keyframe::{Keyframe, insert_keyframe, interpolate},
    foundation::error::{ClipforgeError, ClipforgeResult},
};

/// The five animatable clip properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimProperty {
    /// Horizontal offset of the clip centre from the canvas centre, in pixels.
    X,
    /// Vertical offset of the clip centre from the canvas centre, in pixels.
    Y,
    /// Uniform scale factor.
    Scale,
    /// Rotation in radians.
    Rotation,
    /// Opacity in `0..=1`.
    Opacity,
}

impl AnimProperty {
    /// All properties in canonical order.
    pub const ALL: [AnimProperty; 5] = [
        AnimProperty::X,
        AnimProperty::Y,
        AnimProperty::Scale,
        AnimProperty::Rotation,
        AnimProperty::Opacity,
    ];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
        }
    }

    /// Value an empty curve resolves to.
    ///
    /// Scale and opacity hold at `1.0` so an unanimated clip stays visible.
    pub fn empty_default(self) -> f64 {
        match self {
            Self::X | Self::Y | Self::Rotation => 0.0,
            Self::Scale | Self::Opacity => 1.0,
        }
    }
}

impl std::str::FromStr for AnimProperty {
    type Err = ClipforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClipforgeError::validation(format!("unknown property '{s}'")))
    }
}

/// Per-property keyframe curves for one clip.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransformTrack {
    /// Horizontal offset curve, pixels.
    #[serde(default)]
    pub x: Vec<Keyframe>,
    /// Vertical offset curve, pixels.
    #[serde(default)]
    pub y: Vec<Keyframe>,
    /// Uniform scale curve.
    #[serde(default)]
    pub scale: Vec<Keyframe>,
    /// Rotation curve, radians.
    #[serde(default)]
    pub rotation: Vec<Keyframe>,
    /// Opacity curve, `0..=1`.
    #[serde(default)]
    pub opacity: Vec<Keyframe>,
}

impl TransformTrack {
    /// One keyframe per property at `t = 0`.
    pub fn constant(x: f64, y: f64, scale: f64, rotation: f64, opacity: f64) -> Self {
        let at0 = |value| vec![Keyframe { time: 0.0, value }];
        Self {
            x: at0(x),
            y: at0(y),
            scale: at0(scale),
            rotation: at0(rotation),
            opacity: at0(opacity),
        }
    }

    /// The track new clips start with: centred, unscaled, unrotated, opaque.
    pub fn identity() -> Self {
        Self::constant(0.0, 0.0, 1.0, 0.0, 1.0)
    }

    /// The keyframes stored for `prop`.
    pub fn curve(&self, prop: AnimProperty) -> &[Keyframe] {
        match prop {
            AnimProperty::X => &self.x,
            AnimProperty::Y => &self.y,
            AnimProperty::Scale => &self.scale,
            AnimProperty::Rotation => &self.rotation,
            AnimProperty::Opacity => &self.opacity,
        }
    }

    fn curve_mut(&mut self, prop: AnimProperty) -> &mut Vec<Keyframe> {
        match prop {
            AnimProperty::X => &mut self.x,
            AnimProperty::Y => &mut self.y,
            AnimProperty::Scale => &mut self.scale,
            AnimProperty::Rotation => &mut self.rotation,
            AnimProperty::Opacity => &mut self.opacity,
        }
    }

    /// Resolve one property at clip-local `local_time`.
    pub fn sample(&self, prop: AnimProperty, local_time: f64) -> f64 {
        let keys = self.curve(prop);
        if keys.is_empty() {
            return prop.empty_default();
        }
        interpolate(keys, local_time)
    }

    /// Insert a keyframe, keeping the curve sorted. Returns its index.
    pub fn add_keyframe(
        &mut self,
        prop: AnimProperty,
        time: f64,
        value: f64,
    ) -> ClipforgeResult<usize> {
        let kf = Keyframe::new(time, value)?;
        insert_keyframe(self.curve_mut(prop), kf)
    }

    /// Remove the keyframe at `index`; `None` when out of range.
    pub fn remove_keyframe(&mut self, prop: AnimProperty, index: usize) -> Option<Keyframe> {
        let keys = self.curve_mut(prop);
        (index < keys.len()).then(|| keys.remove(index))
    }

    /// Replace a whole curve, sorting it and rejecting non-finite samples.
    pub fn set_curve(&mut self, prop: AnimProperty, keys: Vec<Keyframe>) -> ClipforgeResult<()> {
        let mut sorted = keys;
        for k in &sorted {
            k.validate()?;
        }
        sorted.sort_by(|a, b| a.time.total_cmp(&b.time));
        *self.curve_mut(prop) = sorted;
        Ok(())
    }

    /// Check every keyframe on every curve is finite.
    pub fn validate(&self) -> ClipforgeResult<()> {
        for prop in AnimProperty::ALL {
            for k in self.curve(prop) {
                k.validate().map_err(|e| {
                    ClipforgeError::animation(format!("{} curve: {e}", prop.as_str()))
                })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/track.rs"]
mod tests;
