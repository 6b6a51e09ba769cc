//! Client-side camera state folded from inbound events.
//!
//! DESIGN
//! ======
//! `CameraState` is a plain value. The router owns it behind a mutex and
//! applies one event at a time in channel order; renderers take a clone.
//! Nothing here is persisted.

use std::collections::BTreeMap;

use frames::{Device, Event, PreviewSettings};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraState {
    /// Set once the service greeted us with `camera_ws_ready`.
    pub ready: bool,
    pub devices: Vec<Device>,
    /// Active recordings: feed -> seconds elapsed.
    pub recordings: BTreeMap<String, f64>,
    pub last_recording_file: Option<String>,
    /// Feed -> device routing announced by the service.
    pub selected_streams: BTreeMap<String, String>,
    pub overlays: BTreeMap<String, bool>,
    pub preview: Option<PreviewSettings>,
    pub last_error: Option<String>,
    pub frames_captured: u64,
    /// Every inbound message, recognized or not.
    pub messages_seen: u64,
}

impl CameraState {
    /// Fold one event into the state.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::CameraWsReady => self.ready = true,
            Event::DeviceList { data } => self.devices.clone_from(data),
            Event::Frame { .. } => self.frames_captured += 1,
            Event::Error { data } => self.last_error = Some(data.clone()),
            Event::RecordingStarted { data } => {
                self.last_recording_file = Some(data.file.clone());
            }
            Event::RecordingStatus { data } => {
                self.recordings.insert(data.feed.clone(), data.elapsed);
            }
            Event::RecordingStopped { data } => {
                self.recordings.remove(&data.feed);
            }
            Event::PreviewSettings { data } => self.preview = Some(*data),
            Event::OverlayToggled { data } => {
                self.overlays.insert(data.overlay.clone(), data.enabled);
            }
            Event::StreamSelected { data } => {
                self.selected_streams.insert(data.feed.clone(), data.device.clone());
            }
        }
    }

    /// Feeds with a recording in progress, sorted by name.
    pub fn active_feeds(&self) -> impl Iterator<Item = &str> {
        self.recordings.keys().map(String::as_str)
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
