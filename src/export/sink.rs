use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    foundation::{
        core::Resolution,
        error::{ClipforgeError, ClipforgeResult},
    },
    render::backend::FrameRGBA,
};

/// Configuration handed to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Output frame size.
    pub resolution: Resolution,
    /// Frames per second of the sequence.
    pub fps: f64,
    /// Number of frames that will be pushed.
    pub total_frames: u64,
}

/// Consumer of rendered frames.
///
/// `push_frame` is called in strictly increasing frame order, exactly once per
/// frame, between one `begin` and one `end`.
pub trait FrameSink {
    /// Prepare for a sequence described by `cfg`.
    fn begin(&mut self, cfg: SinkConfig) -> ClipforgeResult<()>;
    /// Consume frame `idx`.
    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> ClipforgeResult<()>;
    /// Flush and close the sequence.
    fn end(&mut self) -> ClipforgeResult<()>;
}

/// In-memory sink for tests and previews.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, FrameRGBA)>,
    finished: bool,
}

impl InMemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from `begin`, once called.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Frames received so far, with their indices.
    pub fn frames(&self) -> &[(u64, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ClipforgeResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> ClipforgeResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ClipforgeResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes `frame_00000.png`, `frame_00001.png`, ... into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: u64,
}

impl PngSequenceSink {
    /// Sink writing one PNG per frame into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: 0,
        }
    }

    /// Path of frame `idx`.
    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:05}.png"))
    }

    /// Frames written so far.
    pub fn written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ClipforgeResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written = 0;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> ClipforgeResult<()> {
        write_png(frame, &self.frame_path(idx))?;
        self.written += 1;
        Ok(())
    }

    fn end(&mut self) -> ClipforgeResult<()> {
        tracing::info!(dir = %self.dir.display(), frames = self.written, "wrote png sequence");
        Ok(())
    }
}

/// Streams straight-alpha RGBA8 frames back to back into one file.
///
/// This is the raw input an external encoder expects for `-f rawvideo -pix_fmt rgba`.
#[derive(Debug)]
pub struct RawFrameSink {
    path: PathBuf,
    out: Option<BufWriter<File>>,
}

impl RawFrameSink {
    /// Sink appending straight-alpha RGBA frames to the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            out: None,
        }
    }
}

impl FrameSink for RawFrameSink {
    fn begin(&mut self, _cfg: SinkConfig) -> ClipforgeResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("create raw output '{}'", self.path.display()))?;
        self.out = Some(BufWriter::new(file));
        Ok(())
    }

    fn push_frame(&mut self, _idx: u64, frame: &FrameRGBA) -> ClipforgeResult<()> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| ClipforgeError::export("raw sink used before begin"))?;
        let straight = frame.clone().into_straight();
        out.write_all(&straight.data).context("write raw frame")?;
        Ok(())
    }

    fn end(&mut self) -> ClipforgeResult<()> {
        if let Some(mut out) = self.out.take() {
            out.flush().context("flush raw output")?;
        }
        Ok(())
    }
}

/// Encode a frame as PNG, converting premultiplied pixels to straight alpha.
pub fn write_png(frame: &FrameRGBA, path: &Path) -> ClipforgeResult<()> {
    let straight = frame.clone().into_straight();
    image::save_buffer_with_format(
        path,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
