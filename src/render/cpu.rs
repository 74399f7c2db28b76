use std::collections::HashMap;

use crate::{
    assets::{
        raster::{SvgRasterizer, shape_svg, text_svg},
        store::{AssetStore, PreparedImage},
    },
    effects::{
        composite::{PremulRgba8, over},
        fx::apply_effects,
    },
    eval::evaluator::{EvaluatedClip, EvaluatedFrame},
    foundation::{
        core::{Affine, Point, Rect, Resolution},
        error::ClipforgeResult,
    },
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    timeline::model::ClipPayload,
};

/// Software compositor.
///
/// Layers are drawn bottom to top, each sampled bilinearly through the inverse
/// of its placement affine and blended with premultiplied source-over.
#[derive(Debug)]
pub struct CpuBackend {
    settings: RenderSettings,
    assets: AssetStore,
    raster: SvgRasterizer,
    /// Clip id to the SVG it was last rasterized from and the raster.
    svg_cache: HashMap<String, (String, PreparedImage)>,
}

impl CpuBackend {
    /// CPU backend rasterizing text with the system fonts.
    pub fn new(settings: RenderSettings, assets: AssetStore) -> Self {
        Self::with_rasterizer(settings, assets, SvgRasterizer::new())
    }

    /// CPU backend with a caller-provided rasterizer.
    pub fn with_rasterizer(
        settings: RenderSettings,
        assets: AssetStore,
        raster: SvgRasterizer,
    ) -> Self {
        Self {
            settings,
            assets,
            raster,
            svg_cache: HashMap::new(),
        }
    }

    /// Media the backend draws from.
    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// Mutable access to register images and posters.
    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    /// Raster for a text or shape clip, reused while its SVG is unchanged.
    fn cached_svg(&mut self, clip_id: &str, svg: String) -> ClipforgeResult<PreparedImage> {
        if let Some((cached_svg, img)) = self.svg_cache.get(clip_id)
            && *cached_svg == svg
        {
            return Ok(img.clone());
        }
        let img = self.raster.rasterize_svg(&svg)?;
        self.svg_cache.insert(clip_id.to_string(), (svg, img.clone()));
        Ok(img)
    }

    /// The untransformed raster for a clip, or `None` if its media is unavailable.
    fn layer_for(&mut self, node: &EvaluatedClip<'_>) -> ClipforgeResult<Option<PreparedImage>> {
        let layer = match &node.clip.payload {
            ClipPayload::Image(m) => self.assets.image(&m.media_url).cloned(),
            ClipPayload::Video(m) => self.assets.poster(&m.media_url).cloned(),
            ClipPayload::Text(t) => Some(self.cached_svg(&node.clip.id, text_svg(t))?),
            ClipPayload::Shape(s) => Some(self.cached_svg(&node.clip.id, shape_svg(s))?),
        };
        if layer.is_none() {
            tracing::warn!(clip_id = %node.clip.id, "no raster for clip, drawing nothing");
        }
        Ok(layer)
    }
}

impl RenderBackend for CpuBackend {
    fn render(
        &mut self,
        frame: &EvaluatedFrame<'_>,
        resolution: Resolution,
    ) -> ClipforgeResult<FrameRGBA> {
        let len = resolution.rgba_len()?;
        let mut data = vec![0u8; len];
        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            let px = premul_rgba8(r, g, b, a);
            for d in data.chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }

        for node in &frame.nodes {
            let opacity = node.transform.effective_opacity();
            if opacity <= 0.0 {
                continue;
            }
            let Some(layer) = self.layer_for(node)? else {
                continue;
            };

            let (lw, lh) = (layer.width, layer.height);
            let pixels = if node.clip.effects.is_empty() {
                layer.rgba8_premul.as_ref().clone()
            } else {
                let raw = FrameRGBA {
                    width: lw,
                    height: lh,
                    data: layer.rgba8_premul.as_ref().clone(),
                    premultiplied: true,
                };
                apply_effects(raw, &node.clip.effects)?.data
            };

            let (layer_w, layer_h) = layer.layer_size();
            let affine = node.transform.to_affine(layer_w, layer_h, resolution)
                * Affine::scale(1.0 / layer.scale);
            draw_layer(
                &mut data,
                resolution,
                Layer {
                    data: &pixels,
                    width: lw,
                    height: lh,
                },
                affine,
                opacity,
            );
        }

        tracing::debug!(time = frame.time, layers = frame.nodes.len(), "rendered frame");
        Ok(FrameRGBA {
            width: resolution.width,
            height: resolution.height,
            data,
            premultiplied: true,
        })
    }
}

struct Layer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl Layer<'_> {
    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0.0; 4];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            f32::from(self.data[idx]),
            f32::from(self.data[idx + 1]),
            f32::from(self.data[idx + 2]),
            f32::from(self.data[idx + 3]),
        ]
    }

    /// Bilinear sample at layer-space `p`; texel centres sit at `i + 0.5`.
    fn sample(&self, p: Point) -> PremulRgba8 {
        let u = p.x - 0.5;
        let v = p.y - 0.5;
        let x0 = u.floor();
        let y0 = v.floor();
        let fx = (u - x0) as f32;
        let fy = (v - y0) as f32;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let t00 = self.texel(x0, y0);
        let t10 = self.texel(x0 + 1, y0);
        let t01 = self.texel(x0, y0 + 1);
        let t11 = self.texel(x0 + 1, y0 + 1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = t00[c] + (t10[c] - t00[c]) * fx;
            let bottom = t01[c] + (t11[c] - t01[c]) * fx;
            out[c] = (top + (bottom - top) * fy).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

fn draw_layer(dst: &mut [u8], canvas: Resolution, layer: Layer<'_>, affine: Affine, opacity: f32) {
    if affine.determinant().abs() < 1e-12 {
        return;
    }
    let inv = affine.inverse();
    let bbox = affine.transform_rect_bbox(Rect::new(
        0.0,
        0.0,
        f64::from(layer.width),
        f64::from(layer.height),
    ));

    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = (bbox.x1.ceil().min(f64::from(canvas.width))).max(0.0) as u32;
    let y1 = (bbox.y1.ceil().min(f64::from(canvas.height))).max(0.0) as u32;

    let w = canvas.width as usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let src = layer.sample(p);
            if src[3] == 0 {
                continue;
            }
            let idx = ((y as usize) * w + (x as usize)) * 4;
            let d = [dst[idx], dst[idx + 1], dst[idx + 2], dst[idx + 3]];
            dst[idx..idx + 4].copy_from_slice(&over(d, src, opacity));
        }
    }
}

fn premul_rgba8(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    let a16 = u16::from(a);
    let mul = |c: u8| ((u16::from(c) * a16 + 127) / 255) as u8;
    [mul(r), mul(g), mul(b), a]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
