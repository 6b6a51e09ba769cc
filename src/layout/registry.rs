//! Built-in dashboard tools for the camera system.

use super::{Registry, RegistryError, ToolDescriptor, ToolSize};

pub const DASHBOARD_TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        id: "camera-monitor",
        title: "Camera Monitor",
        href: "/dashboard/camera-monitor",
        icon: "\u{1F3A5}",
        related: &["recorder", "motion-extractor"],
        size: ToolSize::Large,
    },
    ToolDescriptor {
        id: "recorder",
        title: "Recorder",
        href: "/dashboard/recorder",
        icon: "\u{23FA}",
        related: &["camera-monitor", "explorer"],
        size: ToolSize::Large,
    },
    ToolDescriptor {
        id: "explorer",
        title: "File Explorer",
        href: "/dashboard/explorer",
        icon: "\u{1F4C1}",
        related: &["uploader", "dam", "trim-idle"],
        size: ToolSize::Medium,
    },
    ToolDescriptor {
        id: "uploader",
        title: "Uploader",
        href: "/dashboard/uploader",
        icon: "\u{2B06}",
        related: &["explorer", "dam"],
        size: ToolSize::Medium,
    },
    ToolDescriptor {
        id: "dam",
        title: "Asset Manager",
        href: "/dashboard/dam",
        icon: "\u{1F5C2}",
        related: &["explorer", "uploader"],
        size: ToolSize::Small,
    },
    ToolDescriptor {
        id: "motion-extractor",
        title: "Motion Extractor",
        href: "/dashboard/motion-extractor",
        icon: "\u{1F3C3}",
        related: &["trim-idle", "camera-monitor"],
        size: ToolSize::Small,
    },
    ToolDescriptor {
        id: "trim-idle",
        title: "Idle Trimmer",
        href: "/dashboard/trim-idle",
        icon: "\u{2702}",
        related: &["motion-extractor", "ffmpeg-console"],
        size: ToolSize::Small,
    },
    ToolDescriptor {
        id: "ffmpeg-console",
        title: "FFmpeg Console",
        href: "/dashboard/ffmpeg-console",
        icon: "\u{2328}",
        related: &["trim-idle"],
        size: ToolSize::Small,
    },
];

/// Registry over [`DASHBOARD_TOOLS`].
///
/// # Errors
///
/// Only if the table above gains a duplicate or empty id.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    Registry::new(DASHBOARD_TOOLS.iter().copied())
}
