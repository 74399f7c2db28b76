//! Clipforge is a timeline and keyframe compositing engine.
//!
//! A project is an [`EditorState`]: ordered tracks of timed clips, each with
//! per-property animation curves and an effect chain. At any time the engine
//! can:
//!
//! - list the active clips ([`active_clips`])
//! - resolve a clip's animated transform ([`render_clip`])
//! - rasterize the whole frame through a [`RenderBackend`] ([`render_frame`])
//! - export a frame sequence or JSON snapshot ([`export_project`])
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod assets;
pub(crate) mod effects;
pub(crate) mod eval;
pub(crate) mod export;
pub(crate) mod jobs;
pub(crate) mod project;
pub(crate) mod render;
pub(crate) mod timeline;

pub use crate::foundation::core::{Affine, Point, Rect, Resolution, Vec2};
pub use crate::foundation::error::{ClipforgeError, ClipforgeResult};

pub use crate::animation::keyframe::{Keyframe, insert_keyframe, interpolate};
pub use crate::animation::track::{AnimProperty, TransformTrack};

pub use crate::timeline::model::{
    Clip, ClipKind, ClipPayload, DEFAULT_CLIP_DURATION, EffectInstance, MediaPayload, ShapeKind,
    ShapePayload, TextPayload, Track,
};
pub use crate::timeline::query::{ActiveClip, active_clips, active_clips_indexed};
pub use crate::timeline::state::{DEFAULT_TRACK_ID, EditorDefaults, EditorState};

pub use crate::eval::evaluator::{EvaluatedClip, EvaluatedFrame, Evaluator};
pub use crate::eval::transform::{ClipTransform, render_clip};

pub use crate::effects::blur::box_blur_rgba8;
pub use crate::effects::color::{ColorAdjust, adjust_color_rgba8};
pub use crate::effects::composite::{
    PremulRgba8, over, premultiply_in_place, unpremultiply_in_place,
};
pub use crate::effects::fx::{
    DEFAULT_BLUR_RADIUS, Effect, apply_effect, apply_effects, parse_effect,
};

pub use crate::assets::raster::{SHAPE_SIZE, SvgRasterizer, shape_svg, text_box, text_svg};
pub use crate::assets::store::{AssetStore, PreparedImage, decode_image, is_remote_url};

pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{render_current, render_frame};

pub use crate::export::engine::{
    CancelFlag, ExportFormat, ExportOptions, ExportOutput, export_project, frame_time,
    total_frames,
};
pub use crate::export::sink::{
    FrameSink, InMemorySink, PngSequenceSink, RawFrameSink, SinkConfig, write_png,
};

pub use crate::project::document::{ProjectDocument, TrackLayout};
pub use crate::project::library::{ProjectLibrary, ProjectRecord, now_millis};

pub use crate::jobs::kind::{CompletionAction, JobCategory, JobKind};
pub use crate::jobs::remote::{
    JobId, JobOutcome, JobStatus, PollOptions, RemoteJobs, clip_from_job_result, poll_job,
    poll_job_blocking,
};
