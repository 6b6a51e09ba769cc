use super::*;

const BASE: &str = "http://host.docker.internal:8080";

#[test]
fn video_api_prefix_keeps_the_remainder() {
    assert_eq!(
        resolve("/api/video/devices", BASE).as_deref(),
        Some("http://host.docker.internal:8080/api/video/devices")
    );
    assert_eq!(
        resolve("/api/video/record/main/stop", BASE).as_deref(),
        Some("http://host.docker.internal:8080/api/video/record/main/stop")
    );
}

#[test]
fn video_api_root_is_forwarded() {
    assert_eq!(resolve("/api/video", BASE).as_deref(), Some("http://host.docker.internal:8080/api/video"));
    assert_eq!(resolve("/api/video/", BASE).as_deref(), Some("http://host.docker.internal:8080/api/video/"));
    assert_eq!(
        resolve("/api/video?state=live", BASE).as_deref(),
        Some("http://host.docker.internal:8080/api/video?state=live")
    );
}

#[test]
fn fixed_routes_map_to_backend_paths() {
    assert_eq!(resolve("/api/v1/hwcapture/stream", BASE).as_deref(), Some("http://host.docker.internal:8080/preview"));
    assert_eq!(resolve("/assets", BASE).as_deref(), Some("http://host.docker.internal:8080/explorer/assets"));
    assert_eq!(resolve("/folders", BASE).as_deref(), Some("http://host.docker.internal:8080/explorer/folders"));
}

#[test]
fn query_string_is_preserved() {
    assert_eq!(
        resolve("/assets?limit=10&folder=raw", "http://backend:9000/").as_deref(),
        Some("http://backend:9000/explorer/assets?limit=10&folder=raw")
    );
}

#[test]
fn unmatched_paths_do_not_resolve() {
    assert_eq!(resolve("/dashboard", BASE), None);
    assert_eq!(resolve("/assets/extra", BASE), None);
    assert_eq!(resolve("/api/videos", BASE), None);
    assert_eq!(resolve("", BASE), None);
}
