//! Camera message model and JSON codec for the realtime WS transport.
//!
//! This crate owns the wire representation shared by the dashboard channel
//! and anything else that talks to the camera socket. Every message is one
//! JSON document in one text frame. Outbound messages are tagged by
//! `action`, inbound ones by `event`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Capture device used when a command does not name one.
pub const DEFAULT_DEVICE: &str = "/dev/video0";
/// Recording feed used when a command does not name one.
pub const DEFAULT_FEED: &str = "main";
/// Encoder requested for new recordings.
pub const DEFAULT_CODEC: &str = "h264";

/// Error returned by the encode/decode helpers.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The command could not be serialized.
    #[error("failed to encode command: {0}")]
    Encode(#[source] serde_json::Error),
    /// The text is not JSON, or not a known event shape.
    #[error("failed to decode event: {0}")]
    Decode(#[source] serde_json::Error),
}

// =============================================================================
// COMMANDS
// =============================================================================

/// A request sent from the dashboard to the camera service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Command {
    /// Ask for the list of capture devices.
    ListDevices,
    /// Grab a single JPEG frame from a device.
    CaptureFrame { device: String },
    /// Start a hardware-accelerated recording on a feed.
    StartRecord {
        feed: String,
        device: String,
        codec: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timecode: Option<String>,
    },
    /// Stop the recording running on a feed.
    StopRecord { feed: String },
    /// Route a device to a named feed.
    SelectStream { feed: String, device: String },
    /// Change preview resolution and frame rate.
    SetPreview(PreviewSettings),
    /// Enable or disable an overlay by name.
    ToggleOverlay { overlay: String, enabled: bool },
}

impl Command {
    #[must_use]
    pub fn capture_frame(device: impl Into<String>) -> Self {
        Self::CaptureFrame { device: device.into() }
    }

    /// Start a recording with the default codec and server-chosen filename.
    #[must_use]
    pub fn start_record(feed: impl Into<String>, device: impl Into<String>) -> Self {
        Self::StartRecord {
            feed: feed.into(),
            device: device.into(),
            codec: DEFAULT_CODEC.to_owned(),
            filename: None,
            timecode: None,
        }
    }

    #[must_use]
    pub fn stop_record(feed: impl Into<String>) -> Self {
        Self::StopRecord { feed: feed.into() }
    }

    /// Wire name of the action, e.g. `"start_record"`.
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::ListDevices => "list_devices",
            Self::CaptureFrame { .. } => "capture_frame",
            Self::StartRecord { .. } => "start_record",
            Self::StopRecord { .. } => "stop_record",
            Self::SelectStream { .. } => "select_stream",
            Self::SetPreview(_) => "set_preview",
            Self::ToggleOverlay { .. } => "toggle_overlay",
        }
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// A notification pushed by the camera service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Sent once right after the socket is accepted.
    CameraWsReady,
    DeviceList { data: Vec<Device> },
    /// Base64-encoded JPEG captured from `device`.
    Frame { device: String, data: String },
    Error { data: String },
    RecordingStarted { data: RecordingFile },
    RecordingStopped { data: FeedRef },
    /// Periodic progress for an active recording.
    RecordingStatus { data: RecordingProgress },
    PreviewSettings { data: PreviewSettings },
    OverlayToggled { data: OverlayToggle },
    StreamSelected { data: StreamSelection },
}

impl Event {
    /// Wire name of the event, e.g. `"device_list"`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CameraWsReady => "camera_ws_ready",
            Self::DeviceList { .. } => "device_list",
            Self::Frame { .. } => "frame",
            Self::Error { .. } => "error",
            Self::RecordingStarted { .. } => "recording_started",
            Self::RecordingStopped { .. } => "recording_stopped",
            Self::RecordingStatus { .. } => "recording_status",
            Self::PreviewSettings { .. } => "preview_settings",
            Self::OverlayToggled { .. } => "overlay_toggled",
            Self::StreamSelected { .. } => "stream_selected",
        }
    }
}

/// A V4L2 capture device as probed by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub path: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFile {
    pub file: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRef {
    pub feed: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordingProgress {
    pub feed: String,
    /// Seconds since the recording started.
    pub elapsed: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self { width: 1920, height: 1080, fps: 30 }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayToggle {
    pub overlay: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSelection {
    pub feed: String,
    pub device: String,
}

// =============================================================================
// CODEC
// =============================================================================

/// Encode a command into a single JSON text frame.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if serialization fails.
pub fn encode_command(command: &Command) -> Result<String, CodecError> {
    serde_json::to_string(command).map_err(CodecError::Encode)
}

/// Decode a JSON text frame into an event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for invalid JSON or an unknown event shape.
pub fn decode_event(text: &str) -> Result<Event, CodecError> {
    serde_json::from_str(text).map_err(CodecError::Decode)
}

/// Interpret an already-parsed JSON document as an event.
///
/// Returns `None` when the value is not a recognized event; the backend is
/// free to send other shapes on the same socket.
#[must_use]
pub fn event_from_value(value: &Value) -> Option<Event> {
    Event::deserialize(value).ok()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
