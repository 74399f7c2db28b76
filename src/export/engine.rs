use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::{
    export::sink::{FrameSink, SinkConfig},
    foundation::{
        core::check_fps,
        error::{ClipforgeError, ClipforgeResult},
    },
    project::document::ProjectDocument,
    render::{backend::RenderBackend, pipeline::render_frame},
    timeline::state::EditorState,
};

/// What an export produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Structural project snapshot; no frames are rendered.
    #[default]
    Json,
    /// Frame sequence for a video encoder.
    Video,
    /// Frame sequence for a GIF encoder.
    Gif,
    /// One PNG per frame.
    Images,
}

impl ExportFormat {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Video => "video",
            Self::Gif => "gif",
            Self::Images => "images",
        }
    }

    /// Whether this format renders frames.
    pub fn renders_frames(self) -> bool {
        !matches!(self, Self::Json)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ClipforgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "video" => Ok(Self::Video),
            "gif" => Ok(Self::Gif),
            "images" => Ok(Self::Images),
            other => Err(ClipforgeError::validation(format!(
                "unknown export format '{other}'"
            ))),
        }
    }
}

/// Shared flag a caller flips to stop an export between frames.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A flag that is not yet cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the export stops before its next frame.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Options for one [`export_project`] run.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// What to produce.
    pub format: ExportFormat,
    /// Checked before every frame when set.
    pub cancel: Option<CancelFlag>,
}

impl ExportOptions {
    /// Options for `format` without cancellation.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            cancel: None,
        }
    }

    /// Attach a cancellation flag.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Result of a successful export.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportOutput {
    /// Pretty-printed project document.
    Json(String),
    /// Number of frames pushed to the sink.
    Frames {
        /// Frame count.
        total_frames: u64,
    },
}

/// `ceil(duration * fps)`, tolerating float noise just above an integer.
pub fn total_frames(duration: f64, fps: f64) -> ClipforgeResult<u64> {
    check_fps(fps)?;
    if !duration.is_finite() || duration < 0.0 {
        return Err(ClipforgeError::export(format!(
            "duration must be finite and >= 0 (got {duration})"
        )));
    }
    Ok(((duration * fps) - 1e-9).ceil().max(0.0) as u64)
}

/// Timeline time of frame `f`.
pub fn frame_time(f: u64, fps: f64) -> f64 {
    f as f64 / fps
}

/// Materialize `state` as a project snapshot or a frame sequence.
///
/// Frame exports render `f / fps` for every `f` in `[0, total_frames)` strictly
/// in order, push each frame to `sink`, then report `(f + 1) / total * 100`.
/// The first failing frame aborts the export and its error is returned.
/// Cancellation is checked before each frame.
#[tracing::instrument(skip(state, opts, backend, sink, on_progress), fields(format = %opts.format))]
pub fn export_project(
    state: &EditorState,
    opts: &ExportOptions,
    backend: &mut dyn RenderBackend,
    sink: &mut dyn FrameSink,
    on_progress: &mut dyn FnMut(f64),
) -> ClipforgeResult<ExportOutput> {
    if !opts.format.renders_frames() {
        let json = ProjectDocument::from_state(state).to_json_pretty()?;
        on_progress(100.0);
        tracing::info!(bytes = json.len(), "exported project json");
        return Ok(ExportOutput::Json(json));
    }

    let total = total_frames(state.duration, state.fps)?;
    tracing::info!(total_frames = total, fps = state.fps, "export started");

    sink.begin(SinkConfig {
        resolution: state.resolution,
        fps: state.fps,
        total_frames: total,
    })?;

    let log_every = (total / 10).max(1);
    for f in 0..total {
        if opts.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            tracing::warn!(frame = f, "export cancelled");
            return Err(ClipforgeError::export(format!(
                "export cancelled at frame {f} of {total}"
            )));
        }

        let t = frame_time(f, state.fps);
        let frame = render_frame(state, t, backend)
            .map_err(|e| ClipforgeError::export(format!("frame {f} (t={t}): {e}")))?;
        sink.push_frame(f, &frame)?;

        on_progress((f + 1) as f64 / total as f64 * 100.0);
        if f % log_every == 0 {
            tracing::debug!(frame = f, total_frames = total, "export progress");
        }
    }

    if total == 0 {
        on_progress(100.0);
    }
    sink.end()?;
    tracing::info!(total_frames = total, "export finished");
    Ok(ExportOutput::Frames {
        total_frames: total,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/engine.rs"]
mod tests;
