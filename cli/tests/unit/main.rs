//! Unit tests for the pullrun CLI library
//!
//! These tests use fake ports and temporary directories; nothing touches the
//! network or spawns the real tools.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod architecture;
mod helpers;
mod orchestrator;
mod tool_provisioner;
