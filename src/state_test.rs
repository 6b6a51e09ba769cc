use super::*;
use frames::{FeedRef, OverlayToggle, RecordingFile, RecordingProgress, StreamSelection};

#[test]
fn default_state_is_empty() {
    let state = CameraState::default();
    assert!(!state.ready);
    assert!(state.devices.is_empty());
    assert_eq!(state.active_feeds().count(), 0);
    assert_eq!(state.messages_seen, 0);
}

#[test]
fn ready_and_device_list_are_recorded() {
    let mut state = CameraState::default();
    state.apply(&Event::CameraWsReady);
    state.apply(&Event::DeviceList {
        data: vec![Device { path: "/dev/video0".into(), width: Some(1920), height: Some(1080), fps: Some(30.0) }],
    });

    assert!(state.ready);
    assert_eq!(state.devices.len(), 1);
    assert_eq!(state.devices[0].path, "/dev/video0");
}

#[test]
fn device_list_replaces_previous_list() {
    let mut state = CameraState::default();
    let dev = |p: &str| Device { path: p.into(), width: None, height: None, fps: None };
    state.apply(&Event::DeviceList { data: vec![dev("/dev/video0"), dev("/dev/video1")] });
    state.apply(&Event::DeviceList { data: vec![dev("/dev/video2")] });

    assert_eq!(state.devices, vec![dev("/dev/video2")]);
}

#[test]
fn recording_lifecycle_tracks_active_feeds() {
    let mut state = CameraState::default();
    state.apply(&Event::RecordingStarted { data: RecordingFile { file: "main.mp4".into() } });
    state.apply(&Event::RecordingStatus { data: RecordingProgress { feed: "main".into(), elapsed: 1.0 } });
    state.apply(&Event::RecordingStatus { data: RecordingProgress { feed: "main".into(), elapsed: 2.0 } });

    assert_eq!(state.last_recording_file.as_deref(), Some("main.mp4"));
    assert_eq!(state.recordings.get("main"), Some(&2.0));
    assert_eq!(state.active_feeds().collect::<Vec<_>>(), vec!["main"]);

    state.apply(&Event::RecordingStopped { data: FeedRef { feed: "main".into() } });
    assert_eq!(state.active_feeds().count(), 0);
}

#[test]
fn overlay_stream_preview_and_errors_are_kept() {
    let mut state = CameraState::default();
    state.apply(&Event::OverlayToggled { data: OverlayToggle { overlay: "grid".into(), enabled: true } });
    state.apply(&Event::StreamSelected {
        data: StreamSelection { feed: "main".into(), device: "/dev/video2".into() },
    });
    state.apply(&Event::PreviewSettings { data: PreviewSettings { width: 1280, height: 720, fps: 60 } });
    state.apply(&Event::Error { data: "Invalid device: /dev/video9".into() });

    assert_eq!(state.overlays.get("grid"), Some(&true));
    assert_eq!(state.selected_streams.get("main").map(String::as_str), Some("/dev/video2"));
    assert_eq!(state.preview.map(|p| p.fps), Some(60));
    assert_eq!(state.last_error.as_deref(), Some("Invalid device: /dev/video9"));
}

#[test]
fn frames_are_counted() {
    let mut state = CameraState::default();
    for _ in 0..3 {
        state.apply(&Event::Frame { device: "/dev/video0".into(), data: String::new() });
    }
    assert_eq!(state.frames_captured, 3);
}
