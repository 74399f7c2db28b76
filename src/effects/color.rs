/// Per-pixel colour adjustment parameters. `1.0` for each is a no-op.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorAdjust {
    /// Channel multiplier.
    pub brightness: f64,
    /// Contrast about mid-grey.
    pub contrast: f64,
    /// HSL saturation multiplier.
    pub saturation: f64,
}

impl Default for ColorAdjust {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

/// Apply brightness, then contrast, then clamp, then saturation to straight RGBA8.
///
/// Alpha is left untouched.
pub fn adjust_color_rgba8(px: &mut [u8], adj: ColorAdjust) {
    let scale_sat = adj.saturation != 1.0;
    for p in px.chunks_exact_mut(4) {
        let mut rgb = [0f64; 3];
        for (c, v) in rgb.iter_mut().enumerate() {
            let b = f64::from(p[c]) * adj.brightness;
            let k = ((b / 255.0 - 0.5) * adj.contrast + 0.5) * 255.0;
            *v = k.clamp(0.0, 255.0);
        }
        if scale_sat {
            rgb = saturate(rgb, adj.saturation);
        }
        for c in 0..3 {
            p[c] = rgb[c].round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Scale HSL saturation by `factor`, keeping hue and lightness.
fn saturate(rgb: [f64; 3], factor: f64) -> [f64; 3] {
    let [r, g, b] = rgb.map(|v| v / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d <= f64::EPSILON {
        return rgb;
    }

    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let sector = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let h = sector / 6.0;

    let s = (s * factor.max(0.0)).clamp(0.0, 1.0);
    hsl_to_rgb(h, s, l).map(|v| v * 255.0)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        hue_channel(p, q, h + 1.0 / 3.0),
        hue_channel(p, q, h),
        hue_channel(p, q, h - 1.0 / 3.0),
    ]
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/color.rs"]
mod tests;
