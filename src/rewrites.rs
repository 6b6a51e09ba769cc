//! Dashboard path to backend URL rewrites.
//!
//! The dashboard never talks to the REST backend by its own paths; each
//! public path is forwarded to a backend route under a configured base URL.

/// How a public path maps onto the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// `prefix` itself and every path below it; the remainder is appended
    /// to `to`.
    Prefix { prefix: &'static str, to: &'static str },
    /// Only `path` itself.
    Exact { path: &'static str, to: &'static str },
}

pub const REWRITES: &[Target] = &[
    Target::Prefix { prefix: "/api/video", to: "/api/video" },
    Target::Exact { path: "/api/v1/hwcapture/stream", to: "/preview" },
    Target::Exact { path: "/assets", to: "/explorer/assets" },
    Target::Exact { path: "/folders", to: "/explorer/folders" },
];

impl Target {
    fn apply(&self, path: &str) -> Option<String> {
        match *self {
            Self::Prefix { prefix, to } => path
                .strip_prefix(prefix)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))
                .map(|rest| format!("{to}{rest}")),
            Self::Exact { path: exact, to } => (path == exact).then(|| to.to_owned()),
        }
    }
}

/// Backend URL for a dashboard `path`, or `None` when no rewrite matches.
///
/// A query string on `path` is carried over unchanged.
#[must_use]
pub fn resolve(path: &str, base: &str) -> Option<String> {
    let (path, query) = match path.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (path, None),
    };
    let target = REWRITES.iter().find_map(|rule| rule.apply(path))?;
    let base = base.trim_end_matches('/');
    Some(match query {
        Some(query) => format!("{base}{target}?{query}"),
        None => format!("{base}{target}"),
    })
}

#[cfg(test)]
#[path = "rewrites_test.rs"]
mod tests;
