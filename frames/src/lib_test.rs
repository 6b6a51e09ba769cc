use super::*;
use serde_json::json;

// =============================================================
// Commands
// =============================================================

#[test]
fn list_devices_encodes_as_bare_action() {
    let text = encode_command(&Command::ListDevices).expect("encode");
    let value: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value, json!({"action": "list_devices"}));
}

#[test]
fn start_record_uses_default_codec_and_omits_unset_fields() {
    let text = encode_command(&Command::start_record(DEFAULT_FEED, DEFAULT_DEVICE)).expect("encode");
    let value: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        value,
        json!({
            "action": "start_record",
            "feed": "main",
            "device": "/dev/video0",
            "codec": "h264"
        })
    );
}

#[test]
fn set_preview_flattens_settings_next_to_action() {
    let cmd = Command::SetPreview(PreviewSettings { width: 1280, height: 720, fps: 60 });
    let value = serde_json::to_value(&cmd).expect("json");
    assert_eq!(value, json!({"action": "set_preview", "width": 1280, "height": 720, "fps": 60}));
}

#[test]
fn command_action_matches_serialized_tag() {
    let commands = [
        Command::ListDevices,
        Command::capture_frame("/dev/video1"),
        Command::start_record("main", "/dev/video0"),
        Command::stop_record("main"),
        Command::SelectStream { feed: "main".into(), device: "/dev/video2".into() },
        Command::SetPreview(PreviewSettings::default()),
        Command::ToggleOverlay { overlay: "grid".into(), enabled: true },
    ];
    for cmd in &commands {
        let value = serde_json::to_value(cmd).expect("json");
        assert_eq!(value["action"], cmd.action());
    }
}

#[test]
fn preview_settings_default_is_full_hd_30() {
    let settings = PreviewSettings::default();
    assert_eq!((settings.width, settings.height, settings.fps), (1920, 1080, 30));
}

// =============================================================
// Events
// =============================================================

#[test]
fn decode_ready_event() {
    let event = decode_event(r#"{"event":"camera_ws_ready"}"#).expect("decode");
    assert_eq!(event, Event::CameraWsReady);
    assert_eq!(event.name(), "camera_ws_ready");
}

#[test]
fn decode_device_list_tolerates_missing_probe_fields() {
    let event = decode_event(
        r#"{"event":"device_list","data":[{"path":"/dev/video0","width":1920,"height":1080,"fps":30.0},{"path":"/dev/video2"}]}"#,
    )
    .expect("decode");
    let Event::DeviceList { data } = event else {
        panic!("expected device list");
    };
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].width, Some(1920));
    assert_eq!(data[1].path, "/dev/video2");
    assert_eq!(data[1].fps, None);
}

#[test]
fn decode_frame_keeps_device_at_top_level() {
    let event = decode_event(r#"{"event":"frame","device":"/dev/video0","data":"aGVsbG8="}"#).expect("decode");
    assert_eq!(
        event,
        Event::Frame { device: "/dev/video0".into(), data: "aGVsbG8=".into() }
    );
}

#[test]
fn decode_recording_status() {
    let event =
        decode_event(r#"{"event":"recording_status","data":{"feed":"main","elapsed":2.5}}"#).expect("decode");
    assert_eq!(
        event,
        Event::RecordingStatus { data: RecordingProgress { feed: "main".into(), elapsed: 2.5 } }
    );
}

#[test]
fn decode_rejects_non_json() {
    let err = decode_event("not json").expect_err("should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn decode_rejects_unknown_event_name() {
    let err = decode_event(r#"{"event":"teleport","data":{}}"#).expect_err("should fail");
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn event_from_value_ignores_foreign_shapes() {
    assert_eq!(event_from_value(&json!({"type": "frame", "seq": 1})), None);
    assert_eq!(
        event_from_value(&json!({"event": "error", "data": "unknown action"})),
        Some(Event::Error { data: "unknown action".into() })
    );
}
