//! Active-clip queries over ordered tracks.

use crate::timeline::model::{Clip, Track};

/// A clip that is visible at the query time, with its position in the track list.
#[derive(Clone, Copy, Debug)]
pub struct ActiveClip<'a> {
    /// Index of the clip's track.
    pub track_index: usize,
    /// Index of the clip within its track.
    pub clip_index: usize,
    /// The clip itself.
    pub clip: &'a Clip,
}

/// Clips whose closed interval `[start, start + duration]` contains `time`.
///
/// Order is track order, then clip order within each track. Renderers draw in
/// this order, so later entries end up on top.
pub fn active_clips(tracks: &[Track], time: f64) -> Vec<&Clip> {
    active_clips_indexed(tracks, time).map(|a| a.clip).collect()
}

/// Same as [`active_clips`] but keeps track/clip indices for z-ordering.
pub fn active_clips_indexed(tracks: &[Track], time: f64) -> impl Iterator<Item = ActiveClip<'_>> {
    tracks
        .iter()
        .enumerate()
        .flat_map(move |(track_index, track)| {
            track
                .clips
                .iter()
                .enumerate()
                .filter(move |(_, clip)| clip.is_active_at(time))
                .map(move |(clip_index, clip)| ActiveClip {
                    track_index,
                    clip_index,
                    clip,
                })
        })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/query.rs"]
mod tests;
