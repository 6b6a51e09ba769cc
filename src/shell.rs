//! Text rendering for the dashboard and the camera view.
//!
//! The dashboard prints the layout groups as three sections. "Active &
//! Recent" is always present; "Related Tools" and "Other Tools" only when
//! they hold at least one tool. Cards are printed from the groups exactly,
//! nothing is filtered or added here.

use std::fmt;

use crate::layout::{LayoutEngine, ToolDescriptor, ToolSize};
use crate::state::CameraState;

pub const DASHBOARD_TITLE: &str = "\u{1F3AC} Cdaprods Video Dashboard";
pub const DASHBOARD_ROOT: &str = "/dashboard";

const RELATED_MARKER: &str = "\u{2605} related";

/// Click-to-focus: moves the focus onto `tool`.
pub fn focus_tool(engine: &mut LayoutEngine, tool: &ToolDescriptor) {
    engine.set_focused_tool(tool.id);
}

#[must_use]
pub fn render_dashboard(engine: &LayoutEngine) -> String {
    DashboardView(engine).to_string()
}

#[must_use]
pub fn render_camera_view(state: &CameraState) -> String {
    CameraView(state).to_string()
}

struct DashboardView<'a>(&'a LayoutEngine);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.0;
        let groups = engine.groups();

        writeln!(f, "{DASHBOARD_TITLE}")?;
        if let Some(focus) = engine.focused_tool() {
            writeln!(f, "focus: {focus}")?;
        }

        writeln!(f)?;
        writeln!(f, "Active & Recent")?;
        if groups.primary.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for tool in &groups.primary {
            card(f, tool, ToolSize::Large, false)?;
        }

        if !groups.secondary.is_empty() {
            writeln!(f)?;
            writeln!(f, "Related Tools")?;
            for tool in &groups.secondary {
                card(f, tool, ToolSize::Medium, engine.is_related(tool))?;
            }
        }

        if !groups.tertiary.is_empty() {
            writeln!(f)?;
            writeln!(f, "Other Tools")?;
            for tool in &groups.tertiary {
                card(f, tool, ToolSize::Small, false)?;
            }
        }
        Ok(())
    }
}

fn card(f: &mut fmt::Formatter<'_>, tool: &ToolDescriptor, size: ToolSize, related: bool) -> fmt::Result {
    write!(f, "  {} {:<18} {:<30} [{}]", tool.icon, tool.title, tool.href, size.as_str())?;
    if related {
        write!(f, "  {RELATED_MARKER}")?;
    }
    writeln!(f)
}

struct CameraView<'a>(&'a CameraState);

impl fmt::Display for CameraView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;

        writeln!(f, "\u{2190} Back  {DASHBOARD_ROOT}")?;
        writeln!(f)?;
        writeln!(f, "Camera Monitor ({})", if state.ready { "ready" } else { "waiting" })?;

        writeln!(f, "devices:")?;
        if state.devices.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for device in &state.devices {
            write!(f, "  {}", device.path)?;
            if let (Some(w), Some(h)) = (device.width, device.height) {
                write!(f, "  {w}x{h}")?;
            }
            if let Some(fps) = device.fps {
                write!(f, " @ {fps}fps")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "recording:")?;
        if state.recordings.is_empty() {
            writeln!(f, "  (idle)")?;
        }
        for (feed, elapsed) in &state.recordings {
            writeln!(f, "  {feed}  {elapsed:.1}s")?;
        }
        if let Some(file) = &state.last_recording_file {
            writeln!(f, "last file: {file}")?;
        }

        for (feed, device) in &state.selected_streams {
            writeln!(f, "stream {feed} -> {device}")?;
        }
        if let Some(preview) = &state.preview {
            writeln!(f, "preview: {}x{} @ {}fps", preview.width, preview.height, preview.fps)?;
        }
        for (overlay, enabled) in &state.overlays {
            writeln!(f, "overlay {overlay}: {}", if *enabled { "on" } else { "off" })?;
        }

        writeln!(f, "frames captured: {}", state.frames_captured)?;
        writeln!(f, "messages: {}", state.messages_seen)?;
        if let Some(error) = &state.last_error {
            writeln!(f, "last error: {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "shell_test.rs"]
mod tests;
