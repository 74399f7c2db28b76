use std::io::Cursor;

use super::*;
use crate::timeline::model::Clip;

fn png_bytes(rgba: Vec<u8>, w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "clipforge-assets-{tag}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn decode_image_premultiplies() {
    let prepared = decode_image(&png_bytes(vec![100, 50, 200, 128], 1, 1)).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn from_straight_rejects_bad_length() {
    assert!(PreparedImage::from_straight_rgba8(2, 2, vec![0; 15]).is_err());
    assert!(PreparedImage::from_straight_rgba8(0, 2, vec![]).is_err());
}

#[test]
fn remote_urls_are_detected() {
    assert!(is_remote_url("blob:http://x/1"));
    assert!(is_remote_url("https://cdn/x.png"));
    assert!(is_remote_url("data:image/png;base64,AAAA"));
    assert!(!is_remote_url("media/x.png"));
}

#[test]
fn prepare_loads_local_images_and_skips_remote() {
    let dir = scratch_dir("prepare");
    std::fs::write(dir.join("red.png"), png_bytes(vec![255, 0, 0, 255], 1, 1)).unwrap();

    let mut state = EditorState::default();
    state.add_clip(Clip::image("a", "red.png")).unwrap();
    state.add_clip(Clip::image("b", "https://example.com/x.png")).unwrap();
    state.add_clip(Clip::text("c", "ignored")).unwrap();

    let store = AssetStore::prepare(&state, &dir).unwrap();
    assert_eq!(store.root(), dir.as_path());
    assert_eq!(store.image("red.png").unwrap().rgba8_premul[0], 255);
    assert!(store.image("https://example.com/x.png").is_none());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn prepare_fails_on_missing_local_file() {
    let dir = scratch_dir("missing");
    let mut state = EditorState::default();
    state.add_clip(Clip::image("a", "nope.png")).unwrap();
    assert!(AssetStore::prepare(&state, &dir).is_err());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn posters_are_keyed_by_video_url() {
    let mut store = AssetStore::new(".");
    let img = PreparedImage::from_straight_rgba8(1, 1, vec![1, 2, 3, 255]).unwrap();
    store.register_poster("clip.mp4", img.clone());
    assert_eq!(store.poster("clip.mp4"), Some(&img));
    assert!(store.image("clip.mp4").is_none());
    assert_eq!(store.resolve_path("file://a.png"), PathBuf::from("./a.png"));
}
