//! Project JSON document: the flat `{clips, duration, fps, resolution}` shape
//! plus an optional track layout.

use std::{collections::HashMap, path::Path};

use anyhow::Context;

use crate::{
    foundation::{
        core::Resolution,
        error::{ClipforgeError, ClipforgeResult},
    },
    timeline::{
        model::{Clip, Track},
        state::{DEFAULT_TRACK_ID, EditorDefaults, EditorState},
    },
};

/// Serialized project.
///
/// `clips` is every clip flattened in track order. `tracks`, when present,
/// records which clip ids sit on which track so multi-track projects survive a
/// round trip; documents without it load onto a single track.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Every clip, flattened in track order.
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Project length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Frames per second.
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Output size.
    #[serde(default)]
    pub resolution: Resolution,
    /// Clip ids per track, bottom to top.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<TrackLayout>>,
}

/// Clip ids placed on one track.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLayout {
    /// Track id.
    pub id: String,
    /// Clip ids in draw order.
    pub clip_ids: Vec<String>,
}

fn default_duration() -> f64 {
    EditorDefaults::default().duration
}

fn default_fps() -> f64 {
    EditorDefaults::default().fps
}

impl ProjectDocument {
    /// Snapshot `state`, including its track layout.
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            clips: state.clips().cloned().collect(),
            duration: state.duration,
            fps: state.fps,
            resolution: state.resolution,
            tracks: Some(
                state
                    .tracks
                    .iter()
                    .map(|t| TrackLayout {
                        id: t.id.clone(),
                        clip_ids: t.clips.iter().map(|c| c.id.clone()).collect(),
                    })
                    .collect(),
            ),
        }
    }

    /// Rebuild tracks from the document.
    ///
    /// Without a layout, clips load onto a single `track-1`; an empty document has no tracks.
    pub fn tracks(&self) -> ClipforgeResult<Vec<Track>> {
        let Some(layout) = &self.tracks else {
            if self.clips.is_empty() {
                return Ok(Vec::new());
            }
            return Ok(vec![Track {
                id: DEFAULT_TRACK_ID.to_string(),
                clips: self.clips.clone(),
            }]);
        };

        let mut by_id: HashMap<&str, &Clip> = HashMap::with_capacity(self.clips.len());
        for clip in &self.clips {
            if by_id.insert(clip.id.as_str(), clip).is_some() {
                return Err(ClipforgeError::validation(format!(
                    "duplicate clip id '{}'",
                    clip.id
                )));
            }
        }

        let mut tracks = Vec::with_capacity(layout.len());
        for lt in layout {
            let mut track = Track::new(lt.id.clone());
            for id in &lt.clip_ids {
                let clip = by_id.remove(id.as_str()).ok_or_else(|| {
                    ClipforgeError::validation(format!(
                        "track '{}' references unknown or repeated clip '{id}'",
                        lt.id
                    ))
                })?;
                track.clips.push(clip.clone());
            }
            tracks.push(track);
        }

        // Clips the layout forgot keep their document order on the first track.
        let orphans: Vec<Clip> = self
            .clips
            .iter()
            .filter(|c| by_id.contains_key(c.id.as_str()))
            .cloned()
            .collect();
        if !orphans.is_empty() {
            tracing::warn!(count = orphans.len(), "clips missing from track layout");
            if tracks.is_empty() {
                tracks.push(Track::new(DEFAULT_TRACK_ID));
            }
            tracks[0].clips.extend(orphans);
        }
        Ok(tracks)
    }

    /// Build a fresh editor state. Zero or NaN duration and fps fall back to defaults.
    pub fn into_state(self) -> ClipforgeResult<EditorState> {
        let defaults = EditorDefaults::default();
        let or_default = |v: f64, d: f64| if v == 0.0 || v.is_nan() { d } else { v };
        let tracks = self.tracks()?;
        let mut state = EditorState::with_defaults(defaults);
        state.load_project(
            tracks,
            or_default(self.duration, defaults.duration),
            or_default(self.fps, defaults.fps),
            self.resolution,
        )?;
        Ok(state)
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> ClipforgeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Compact JSON.
    pub fn to_json(&self) -> ClipforgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON.
    pub fn to_json_pretty(&self) -> ClipforgeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a document from a JSON file.
    pub fn read_from(path: &Path) -> ClipforgeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read project '{}'", path.display()))?;
        let doc = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), clips = doc.clips.len(), "loaded project");
        Ok(doc)
    }

    /// Write the document as indented JSON, atomically.
    pub fn write_to(&self, path: &Path) -> ClipforgeResult<()> {
        write_atomic(path, self.to_json_pretty()?.as_bytes())?;
        tracing::info!(path = %path.display(), clips = self.clips.len(), "saved project");
        Ok(())
    }
}

/// Write through a sibling temp file and rename over the target.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> ClipforgeResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir '{}'", parent.display()))?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("rename '{}' to '{}'", tmp.display(), path.display()))
            .into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/project/document.rs"]
mod tests;
