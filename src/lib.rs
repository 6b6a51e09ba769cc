//! Client toolkit for the camera capture dashboard.
//!
//! `channel` and `provider` own the real-time link to the camera service,
//! `router` and `state` turn its traffic into a camera model, `layout` and
//! `shell` arrange and render the dashboard tools, and `api` reaches the REST
//! backend through the `rewrites` table.

pub mod api;
pub mod channel;
pub mod config;
pub mod layout;
pub mod provider;
pub mod rewrites;
pub mod router;
pub mod shell;
pub mod state;

#[cfg(test)]
mod test_helpers;
