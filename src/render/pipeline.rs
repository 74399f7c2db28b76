use crate::{
    eval::evaluator::Evaluator,
    foundation::error::ClipforgeResult,
    render::backend::{FrameRGBA, RenderBackend},
    timeline::state::EditorState,
};

/// Evaluate and render a single frame.
///
/// This is the one integration point shared by preview and export: resolve the
/// active clips at `time`, then hand them to `backend`.
#[tracing::instrument(skip(state, backend))]
pub fn render_frame(
    state: &EditorState,
    time: f64,
    backend: &mut dyn RenderBackend,
) -> ClipforgeResult<FrameRGBA> {
    let eval = Evaluator::eval_frame(state, time)?;
    backend.render(&eval, state.resolution)
}

/// Render the frame under the playhead.
pub fn render_current(
    state: &EditorState,
    backend: &mut dyn RenderBackend,
) -> ClipforgeResult<FrameRGBA> {
    render_frame(state, state.time, backend)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
