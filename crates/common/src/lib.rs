//! Process-level helpers shared by the course store binaries.

pub mod env;
pub mod utils;
