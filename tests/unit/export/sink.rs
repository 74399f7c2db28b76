use super::*;

fn frame(px: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: px.repeat(2),
        premultiplied: true,
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        resolution: Resolution::new(2, 1).unwrap(),
        fps: 30.0,
        total_frames: 2,
    }
}

fn scratch(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("clipforge-sink-{tag}-{}", std::process::id()))
}

#[test]
fn in_memory_sink_resets_on_begin() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame([1, 2, 3, 255])).unwrap();
    sink.end().unwrap();
    assert!(sink.is_finished());

    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}

#[test]
fn png_sequence_writes_numbered_straight_alpha_files() {
    let dir = scratch("png");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame([100, 50, 25, 128])).unwrap();
    sink.push_frame(1, &frame([0, 0, 0, 0])).unwrap();
    sink.end().unwrap();
    assert_eq!(sink.written(), 2);

    let path = sink.frame_path(0);
    assert!(path.ends_with("frame_00000.png"));
    let img = image::open(&path).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (2, 1));
    let px = img.get_pixel(0, 0).0;
    assert_eq!(px[3], 128);
    assert!((i16::from(px[0]) - 199).abs() <= 1);
    assert!(dir.join("frame_00001.png").exists());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn raw_sink_concatenates_frames() {
    let dir = scratch("raw");
    let path = dir.join("frames.rgba");
    let mut sink = RawFrameSink::new(&path);
    assert!(sink.push_frame(0, &frame([1, 1, 1, 255])).is_err());
    sink.begin(cfg()).unwrap();
    sink.push_frame(0, &frame([1, 2, 3, 255])).unwrap();
    sink.push_frame(1, &frame([4, 5, 6, 255])).unwrap();
    sink.end().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, vec![1, 2, 3, 255, 1, 2, 3, 255, 4, 5, 6, 255, 4, 5, 6, 255]);
    std::fs::remove_dir_all(&dir).ok();
}
