use crate::{
    effects::{
        blur::box_blur_rgba8,
        color::{ColorAdjust, adjust_color_rgba8},
        composite::{premultiply_in_place, unpremultiply_in_place},
    },
    foundation::error::ClipforgeResult,
    render::backend::FrameRGBA,
    timeline::model::EffectInstance,
};

/// Blur radius used when an effect omits `radius`.
pub const DEFAULT_BLUR_RADIUS: f64 = 5.0;

/// A recognised pixel effect with resolved parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Box blur with a window of `radius` pixels each side.
    Blur {
        /// Half-width of the blur window.
        radius: u32,
    },
    /// Brightness, contrast and saturation.
    Color(ColorAdjust),
}

/// Resolve an authored effect. Unknown names yield `None` and are skipped by callers.
pub fn parse_effect(inst: &EffectInstance) -> Option<Effect> {
    match inst.name.trim().to_ascii_lowercase().as_str() {
        "blur" => {
            let r = inst.param("radius").unwrap_or(DEFAULT_BLUR_RADIUS);
            let radius = if r.is_finite() && r > 0.0 {
                r.floor().min(f64::from(u32::MAX)) as u32
            } else {
                0
            };
            Some(Effect::Blur { radius })
        }
        "color" => {
            let get = |key: &str| {
                inst.param(key)
                    .filter(|v| v.is_finite())
                    .unwrap_or(1.0)
            };
            Some(Effect::Color(ColorAdjust {
                brightness: get("brightness"),
                contrast: get("contrast"),
                saturation: get("saturation"),
            }))
        }
        other => {
            tracing::warn!(effect = other, "skipping unknown effect");
            None
        }
    }
}

/// Apply one effect to a straight-alpha RGBA8 buffer.
pub fn apply_effect(
    data: &[u8],
    width: u32,
    height: u32,
    effect: Effect,
) -> ClipforgeResult<Vec<u8>> {
    match effect {
        Effect::Blur { radius } => box_blur_rgba8(data, width, height, radius),
        Effect::Color(adj) => {
            let mut out = data.to_vec();
            adjust_color_rgba8(&mut out, adj);
            Ok(out)
        }
    }
}

/// Run an effect chain over `frame`, strictly in list order.
///
/// Effects operate on straight alpha; a premultiplied input is converted for
/// the duration of the chain and converted back afterwards.
#[tracing::instrument(skip(frame, effects), fields(count = effects.len()))]
pub fn apply_effects(frame: FrameRGBA, effects: &[EffectInstance]) -> ClipforgeResult<FrameRGBA> {
    let parsed: Vec<Effect> = effects.iter().filter_map(parse_effect).collect();
    if parsed.is_empty() {
        return Ok(frame);
    }

    let FrameRGBA {
        width,
        height,
        mut data,
        premultiplied,
    } = frame;
    if premultiplied {
        unpremultiply_in_place(&mut data);
    }
    for effect in parsed {
        data = apply_effect(&data, width, height, effect)?;
    }
    if premultiplied {
        premultiply_in_place(&mut data);
    }

    Ok(FrameRGBA {
        width,
        height,
        data,
        premultiplied,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fx.rs"]
mod tests;
