use std::collections::HashSet;

use crate::{
    animation::track::AnimProperty,
    eval::transform::render_clip,
    foundation::core::{Resolution, check_fps, check_seconds},
    foundation::error::{ClipforgeError, ClipforgeResult},
    timeline::model::{Clip, Track},
};

/// Id given to the track created when the first clip is added to an empty project.
pub const DEFAULT_TRACK_ID: &str = "track-1";

/// Defaults a fresh or reset editor starts from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorDefaults {
    /// Frames per second.
    pub fps: f64,
    /// Output size.
    pub resolution: Resolution,
    /// Project length in seconds.
    pub duration: f64,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            fps: 30.0,
            resolution: Resolution::default(),
            duration: 30.0,
        }
    }
}

/// The project model every engine reads: tracks, playhead, output format and selection.
///
/// Engines only ever borrow this immutably, so a render or export in flight
/// cannot observe a concurrent edit.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    /// Playhead position in seconds.
    pub time: f64,
    /// Frames per second.
    pub fps: f64,
    /// Output size.
    pub resolution: Resolution,
    /// Bottom-to-top draw order.
    pub tracks: Vec<Track>,
    /// Whether playback is running.
    pub playing: bool,
    selected_clip_id: Option<String>,
    /// Total project length in seconds.
    pub duration: f64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::with_defaults(EditorDefaults::default())
    }
}

impl EditorState {
    /// Empty project using `d`.
    pub fn with_defaults(d: EditorDefaults) -> Self {
        Self {
            time: 0.0,
            fps: d.fps,
            resolution: d.resolution,
            tracks: Vec::new(),
            playing: false,
            selected_clip_id: None,
            duration: d.duration,
        }
    }

    /// Check output settings, every clip and id uniqueness.
    pub fn validate(&self) -> ClipforgeResult<()> {
        check_fps(self.fps)?;
        check_seconds("duration", self.duration)?;
        check_seconds("time", self.time)?;
        self.resolution.validate()?;

        let mut seen = HashSet::new();
        for track in &self.tracks {
            for clip in &track.clips {
                clip.validate()?;
                if !seen.insert(clip.id.as_str()) {
                    return Err(ClipforgeError::validation(format!(
                        "duplicate clip id '{}'",
                        clip.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Move the playhead, clamped to `[0, duration]`.
    pub fn set_time(&mut self, time: f64) {
        self.time = if time.is_finite() {
            time.clamp(0.0, self.duration.max(0.0))
        } else {
            0.0
        };
    }

    /// Start or pause playback.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Change the frame rate.
    pub fn set_fps(&mut self, fps: f64) -> ClipforgeResult<()> {
        check_fps(fps)?;
        self.fps = fps;
        Ok(())
    }

    /// Change the output size.
    pub fn set_resolution(&mut self, resolution: Resolution) -> ClipforgeResult<()> {
        resolution.validate()?;
        self.resolution = resolution;
        Ok(())
    }

    /// Change the project length; the playhead is pulled back inside it.
    pub fn set_duration(&mut self, duration: f64) -> ClipforgeResult<()> {
        check_seconds("duration", duration)?;
        self.duration = duration;
        self.set_time(self.time);
        Ok(())
    }

    /// Advance playback by `dt` seconds.
    ///
    /// Does nothing while paused. Reaching the end clamps to `duration` and stops playback.
    pub fn tick(&mut self, dt: f64) {
        if !self.playing || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let next = self.time + dt;
        if next >= self.duration {
            self.time = self.duration.max(0.0);
            self.playing = false;
        } else {
            self.time = next.max(0.0);
        }
    }

    fn ensure_unique_id(&self, id: &str) -> ClipforgeResult<()> {
        if self.clip(id).is_some() {
            return Err(ClipforgeError::validation(format!(
                "duplicate clip id '{id}'"
            )));
        }
        Ok(())
    }

    /// Add a clip to the first track (creating `track-1` if none exist) and select it.
    pub fn add_clip(&mut self, clip: Clip) -> ClipforgeResult<()> {
        clip.validate()?;
        self.ensure_unique_id(&clip.id)?;
        if self.tracks.is_empty() {
            self.tracks.push(Track::new(DEFAULT_TRACK_ID));
        }
        self.selected_clip_id = Some(clip.id.clone());
        self.tracks[0].clips.push(clip);
        Ok(())
    }

    /// Add a clip to a specific track and select it.
    pub fn add_clip_to_track(&mut self, track_id: &str, clip: Clip) -> ClipforgeResult<()> {
        clip.validate()?;
        self.ensure_unique_id(&clip.id)?;
        let track = self
            .tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .ok_or_else(|| ClipforgeError::validation(format!("unknown track '{track_id}'")))?;
        self.selected_clip_id = Some(clip.id.clone());
        track.clips.push(clip);
        Ok(())
    }

    /// Append a new empty track on top of the existing ones.
    pub fn add_track(&mut self, id: impl Into<String>) -> ClipforgeResult<()> {
        let id = id.into();
        if self.tracks.iter().any(|t| t.id == id) {
            return Err(ClipforgeError::validation(format!(
                "duplicate track id '{id}'"
            )));
        }
        self.tracks.push(Track::new(id));
        Ok(())
    }

    /// Clip with `id` on any track.
    pub fn clip(&self, id: &str) -> Option<&Clip> {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .find(|c| c.id == id)
    }

    fn clip_mut(&mut self, id: &str) -> Option<&mut Clip> {
        self.tracks
            .iter_mut()
            .flat_map(|t| t.clips.iter_mut())
            .find(|c| c.id == id)
    }

    /// Apply `edit` to the clip with `id`.
    ///
    /// The edit runs on a copy that must validate before it replaces the stored
    /// clip. Returns `Ok(false)` if no clip has that id.
    pub fn update_clip(
        &mut self,
        id: &str,
        edit: impl FnOnce(&mut Clip),
    ) -> ClipforgeResult<bool> {
        let Some(current) = self.clip(id) else {
            return Ok(false);
        };
        let mut edited = current.clone();
        edit(&mut edited);
        edited.validate()?;
        if edited.id != id {
            self.ensure_unique_id(&edited.id)?;
            if self.selected_clip_id.as_deref() == Some(id) {
                self.selected_clip_id = Some(edited.id.clone());
            }
        }
        if let Some(slot) = self.clip_mut(id) {
            *slot = edited;
        }
        Ok(true)
    }

    /// Remove a clip everywhere it appears. A selection pointing at it is cleared.
    pub fn delete_clip(&mut self, id: &str) -> bool {
        let mut removed = false;
        for track in &mut self.tracks {
            let before = track.clips.len();
            track.clips.retain(|c| c.id != id);
            removed |= track.clips.len() != before;
        }
        if self.selected_clip_id.as_deref() == Some(id) {
            self.selected_clip_id = None;
        }
        removed
    }

    /// Select a clip by id, or clear the selection.
    pub fn select_clip(&mut self, id: Option<&str>) {
        self.selected_clip_id = id.map(str::to_string);
    }

    /// The raw selected id, which may not resolve to a live clip.
    pub fn selected_clip_id(&self) -> Option<&str> {
        self.selected_clip_id.as_deref()
    }

    /// The selected clip; a dangling selection resolves to `None`.
    pub fn selected_clip(&self) -> Option<&Clip> {
        self.selected_clip_id.as_deref().and_then(|id| self.clip(id))
    }

    /// Drop a selection that no longer resolves. Returns whether anything was cleared.
    pub fn prune_selection(&mut self) -> bool {
        if self.selected_clip_id.is_some() && self.selected_clip().is_none() {
            tracing::warn!(
                clip_id = self.selected_clip_id.as_deref().unwrap_or_default(),
                "clearing dangling selection"
            );
            self.selected_clip_id = None;
            return true;
        }
        false
    }

    /// Capture the currently resolved value of `prop` as a keyframe at the playhead.
    ///
    /// The keyframe time is clip-local (`time - clip.start`). Returns `Ok(false)`
    /// if the clip does not exist.
    pub fn add_keyframe_at_playhead(
        &mut self,
        clip_id: &str,
        prop: AnimProperty,
    ) -> ClipforgeResult<bool> {
        let time = self.time;
        let Some(clip) = self.clip(clip_id) else {
            return Ok(false);
        };
        let local = time - clip.start;
        let value = render_clip(clip, time).get(prop);
        let Some(clip) = self.clip_mut(clip_id) else {
            return Ok(false);
        };
        clip.transform.add_keyframe(prop, local, value)?;
        Ok(true)
    }

    /// Replace the whole project contents and rewind.
    pub fn load_project(
        &mut self,
        tracks: Vec<Track>,
        duration: f64,
        fps: f64,
        resolution: Resolution,
    ) -> ClipforgeResult<()> {
        let next = Self {
            time: 0.0,
            fps,
            resolution,
            tracks,
            playing: false,
            selected_clip_id: None,
            duration,
        };
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Back to an empty default project.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All clips, flattened in track order.
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.tracks.iter().flat_map(|t| t.clips.iter())
    }

    /// A clip id of the form `clip-N` not used by any clip yet.
    pub fn fresh_clip_id(&self) -> String {
        let mut n = self.clips().count() + 1;
        loop {
            let id = format!("clip-{n}");
            if self.clip(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/state.rs"]
mod tests;
