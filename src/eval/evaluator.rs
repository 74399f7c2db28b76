use crate::{
    eval::transform::{ClipTransform, render_clip},
    foundation::error::{ClipforgeError, ClipforgeResult},
    timeline::{model::Clip, query::active_clips_indexed, state::EditorState},
};

/// Snapshot of everything visible at one instant, in draw order.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedFrame<'a> {
    /// Timeline time in seconds.
    pub time: f64,
    /// Active clips, bottom to top.
    pub nodes: Vec<EvaluatedClip<'a>>,
}

/// One active clip with its resolved transform.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedClip<'a> {
    /// Index of the clip's track.
    pub track_index: usize,
    /// Index of the clip within its track.
    pub clip_index: usize,
    /// The clip itself.
    pub clip: &'a Clip,
    /// `time - clip.start`.
    pub local_time: f64,
    /// Transform resolved at `local_time`.
    pub transform: ClipTransform,
}

/// Resolves editor state into per-frame render input.
pub struct Evaluator;

impl Evaluator {
    /// Collect active clips at `time` and resolve their transforms.
    ///
    /// Nodes are ordered bottom to top: track order first, then clip order within a track.
    #[tracing::instrument(skip(state))]
    pub fn eval_frame(state: &EditorState, time: f64) -> ClipforgeResult<EvaluatedFrame<'_>> {
        if !time.is_finite() {
            return Err(ClipforgeError::evaluation(format!(
                "frame time must be finite (got {time})"
            )));
        }

        let nodes = active_clips_indexed(&state.tracks, time)
            .map(|a| EvaluatedClip {
                track_index: a.track_index,
                clip_index: a.clip_index,
                clip: a.clip,
                local_time: time - a.clip.start,
                transform: render_clip(a.clip, time),
            })
            .collect::<Vec<_>>();

        tracing::trace!(active = nodes.len(), "evaluated frame");
        Ok(EvaluatedFrame { time, nodes })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
