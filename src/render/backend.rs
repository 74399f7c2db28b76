use crate::{
    assets::store::AssetStore,
    effects::composite::unpremultiply_in_place,
    eval::evaluator::EvaluatedFrame,
    foundation::{core::Resolution, error::ClipforgeResult},
};

/// A rendered frame as RGBA8 pixels.
///
/// Backends produce premultiplied alpha. The `premultiplied` flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// The pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to straight alpha, as image encoders expect.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }
}

/// A renderer that turns an evaluated frame into pixels.
///
/// Live preview and export both go through this seam, so neither can diverge in
/// what a given time shows.
pub trait RenderBackend {
    /// Draw `frame` into a new premultiplied frame of size `resolution`.
    fn render(
        &mut self,
        frame: &EvaluatedFrame<'_>,
        resolution: Resolution,
    ) -> ClipforgeResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Software rasterizer.
    #[default]
    Cpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, backends clear the target to this straight-alpha RGBA8 colour before drawing.
    pub clear_rgba: Option<[u8; 4]>,
}

/// Construct a backend of `kind` that draws media from `assets`.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
    assets: AssetStore,
) -> ClipforgeResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
            assets,
        ))),
    }
}
