//! Application services — use-case orchestration.
//!
//! Each service module implements one step of an invocation by composing
//! domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports`.

pub mod fetch;
pub mod install;
pub mod orchestrate;
pub mod platform;
pub mod provision;
