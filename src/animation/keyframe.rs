//! Scalar keyframe curves and their linear resolution.

use crate::foundation::error::{ClipforgeError, ClipforgeResult};

/// A single `(time, value)` animation sample. `time` is clip-local seconds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Clip-local time in seconds.
    pub time: f64,
    /// Sampled value.
    pub value: f64,
}

impl Keyframe {
    /// Build a keyframe, rejecting non-finite time or value.
    pub fn new(time: f64, value: f64) -> ClipforgeResult<Self> {
        let kf = Self { time, value };
        kf.validate()?;
        Ok(kf)
    }

    /// Check that both fields are finite.
    pub fn validate(&self) -> ClipforgeResult<()> {
        if !self.time.is_finite() || !self.value.is_finite() {
            return Err(ClipforgeError::animation(format!(
                "keyframe time/value must be finite (got time={}, value={})",
                self.time, self.value
            )));
        }
        Ok(())
    }
}

/// Resolve a curve at `time`.
///
/// - empty curve: `0.0`
/// - before the first sample: the first keyframe's value (in sequence order)
/// - at or after the last sample: the last sample's value
/// - otherwise: linear interpolation between the bracketing samples
///
/// The curve is treated as if sorted by time; storage order only breaks ties
/// (the later of several equal-time samples wins as the left bracket).
pub fn interpolate(keys: &[Keyframe], time: f64) -> f64 {
    let Some(first) = keys.first() else {
        return 0.0;
    };

    let mut prev: Option<&Keyframe> = None;
    let mut next: Option<&Keyframe> = None;
    for k in keys {
        if k.time <= time {
            if prev.is_none_or(|p| k.time >= p.time) {
                prev = Some(k);
            }
        } else if k.time > time && next.is_none_or(|n| k.time < n.time) {
            next = Some(k);
        }
    }

    let Some(prev) = prev else {
        return first.value;
    };
    let Some(next) = next else {
        return prev.value;
    };

    let span = next.time - prev.time;
    if span <= 0.0 {
        return next.value;
    }
    let t = (time - prev.time) / span;
    prev.value + t * (next.value - prev.value)
}

/// Insert `kf` and re-establish ascending time order.
///
/// The sort is stable, so an inserted sample lands after existing samples
/// that share its time. Returns the index the sample ended up at.
pub fn insert_keyframe(keys: &mut Vec<Keyframe>, kf: Keyframe) -> ClipforgeResult<usize> {
    kf.validate()?;
    keys.push(kf);
    let mut tagged: Vec<(usize, Keyframe)> = keys.drain(..).enumerate().collect();
    tagged.sort_by(|a, b| a.1.time.total_cmp(&b.1.time));
    let inserted = tagged.len() - 1;
    let mut at = 0;
    for (i, (orig, k)) in tagged.into_iter().enumerate() {
        if orig == inserted {
            at = i;
        }
        keys.push(k);
    }
    Ok(at)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/keyframe.rs"]
mod tests;
