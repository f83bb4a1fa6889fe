//! Topshelf CLI library
//!
//! Everything except argument parsing lives here so the integration tests
//! can drive the same pipeline the `shelf` binary runs.

pub mod cmd;
pub mod config;
pub mod util;
pub mod view;
