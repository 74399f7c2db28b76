use super::*;
use crate::timeline::model::ShapeKind;

#[test]
fn defaults_match_editor_defaults() {
    let s = EditorState::default();
    assert_eq!(s.fps, 30.0);
    assert_eq!(s.duration, 30.0);
    assert_eq!(s.resolution, Resolution::new(1920, 1080).unwrap());
    assert_eq!(s.time, 0.0);
    assert!(!s.playing);
    assert!(s.tracks.is_empty());
    assert!(s.selected_clip().is_none());
}

#[test]
fn add_clip_creates_first_track_and_selects() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "Hi")).unwrap();
    assert_eq!(s.tracks.len(), 1);
    assert_eq!(s.tracks[0].id, DEFAULT_TRACK_ID);
    assert_eq!(s.selected_clip_id(), Some("a"));

    s.add_clip(Clip::shape("b", ShapeKind::Circle)).unwrap();
    assert_eq!(s.tracks.len(), 1);
    assert_eq!(s.tracks[0].clips.len(), 2);
    assert_eq!(s.selected_clip().map(|c| c.id.as_str()), Some("b"));
}

#[test]
fn add_clip_rejects_duplicate_ids_and_invalid_clips() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "Hi")).unwrap();
    assert!(s.add_clip(Clip::text("a", "again")).is_err());
    assert!(s.add_clip(Clip::text("z", "bad").with_timing(0.0, 0.0)).is_err());
    assert_eq!(s.clips().count(), 1);
}

#[test]
fn add_clip_to_named_track() {
    let mut s = EditorState::default();
    s.add_track("bg").unwrap();
    s.add_track("fg").unwrap();
    assert!(s.add_track("fg").is_err());
    s.add_clip_to_track("fg", Clip::text("t", "x")).unwrap();
    assert_eq!(s.tracks[1].clips.len(), 1);
    assert!(s.add_clip_to_track("nope", Clip::text("u", "x")).is_err());
}

#[test]
fn delete_clip_clears_matching_selection_only() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "A")).unwrap();
    s.add_clip(Clip::text("b", "B")).unwrap();

    assert!(s.delete_clip("a"));
    assert_eq!(s.selected_clip_id(), Some("b"));
    assert!(s.delete_clip("b"));
    assert_eq!(s.selected_clip_id(), None);
    assert!(!s.delete_clip("b"));
}

#[test]
fn dangling_selection_resolves_to_none() {
    let mut s = EditorState::default();
    s.select_clip(Some("ghost"));
    assert_eq!(s.selected_clip_id(), Some("ghost"));
    assert!(s.selected_clip().is_none());
    assert!(s.prune_selection());
    assert_eq!(s.selected_clip_id(), None);
}

#[test]
fn update_clip_validates_before_commit() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "A")).unwrap();

    assert!(s.update_clip("a", |c| c.start = 2.0).unwrap());
    assert_eq!(s.clip("a").unwrap().start, 2.0);

    assert!(s.update_clip("a", |c| c.duration = -1.0).is_err());
    assert_eq!(s.clip("a").unwrap().duration, 5.0);

    assert!(!s.update_clip("missing", |c| c.start = 1.0).unwrap());
}

#[test]
fn renaming_a_clip_follows_selection() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "A")).unwrap();
    s.add_clip(Clip::text("b", "B")).unwrap();
    s.select_clip(Some("a"));

    assert!(s.update_clip("a", |c| c.id = "b".to_string()).is_err());
    assert!(s.update_clip("a", |c| c.id = "c".to_string()).unwrap());
    assert_eq!(s.selected_clip_id(), Some("c"));
}

#[test]
fn set_time_clamps_to_project() {
    let mut s = EditorState::default();
    s.set_time(-3.0);
    assert_eq!(s.time, 0.0);
    s.set_time(100.0);
    assert_eq!(s.time, 30.0);
    s.set_time(f64::NAN);
    assert_eq!(s.time, 0.0);
    s.set_time(12.5);
    s.set_duration(10.0).unwrap();
    assert_eq!(s.time, 10.0);
}

#[test]
fn setters_reject_invalid_values() {
    let mut s = EditorState::default();
    assert!(s.set_fps(0.0).is_err());
    assert!(s.set_fps(f64::INFINITY).is_err());
    assert!(s.set_duration(-1.0).is_err());
    assert!(s.set_resolution(Resolution { width: 0, height: 10 }).is_err());
    s.set_fps(24.0).unwrap();
    assert_eq!(s.fps, 24.0);
}

#[test]
fn tick_advances_only_while_playing_and_stops_at_end() {
    let mut s = EditorState::default();
    s.set_duration(1.0).unwrap();
    s.tick(0.5);
    assert_eq!(s.time, 0.0);

    s.set_playing(true);
    s.tick(0.25);
    assert!((s.time - 0.25).abs() < 1e-12);
    s.tick(10.0);
    assert_eq!(s.time, 1.0);
    assert!(!s.playing);
}

#[test]
fn keyframe_at_playhead_captures_resolved_value() {
    let mut s = EditorState::default();
    let mut clip = Clip::text("a", "A").with_timing(1.0, 4.0);
    clip.transform.add_keyframe(AnimProperty::X, 2.0, 100.0).unwrap();
    s.add_clip(clip).unwrap();

    s.set_time(2.0);
    assert!(s.add_keyframe_at_playhead("a", AnimProperty::X).unwrap());
    let keys = s.clip("a").unwrap().transform.curve(AnimProperty::X).to_vec();
    assert_eq!(keys.len(), 3);
    assert_eq!(keys[1].time, 1.0);
    assert!((keys[1].value - 50.0).abs() < 1e-9);

    assert!(!s.add_keyframe_at_playhead("nope", AnimProperty::X).unwrap());
}

#[test]
fn load_project_replaces_and_rewinds() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("old", "x")).unwrap();
    s.set_time(4.0);
    s.set_playing(true);

    let tracks = vec![Track::new("t").with_clip(Clip::text("new", "y"))];
    s.load_project(tracks, 12.0, 24.0, Resolution::new(640, 360).unwrap())
        .unwrap();
    assert_eq!(s.time, 0.0);
    assert!(!s.playing);
    assert_eq!(s.fps, 24.0);
    assert!(s.clip("old").is_none());
    assert!(s.clip("new").is_some());
    assert_eq!(s.selected_clip_id(), None);
}

#[test]
fn load_project_rejects_duplicates_and_keeps_old_state() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("keep", "x")).unwrap();
    let tracks = vec![
        Track::new("a").with_clip(Clip::text("dup", "1")),
        Track::new("b").with_clip(Clip::text("dup", "2")),
    ];
    assert!(s
        .load_project(tracks, 10.0, 30.0, Resolution::default())
        .is_err());
    assert!(s.clip("keep").is_some());
}

#[test]
fn reset_returns_to_defaults() {
    let mut s = EditorState::default();
    s.add_clip(Clip::text("a", "x")).unwrap();
    s.set_fps(60.0).unwrap();
    s.reset();
    assert_eq!(s, EditorState::default());
}

#[test]
fn fresh_clip_id_skips_taken_ids() {
    let mut s = EditorState::default();
    assert_eq!(s.fresh_clip_id(), "clip-1");
    s.add_clip(Clip::text("clip-2", "x")).unwrap();
    assert_eq!(s.fresh_clip_id(), "clip-3");
}
