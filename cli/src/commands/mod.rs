//! Command implementations

pub mod launch;
