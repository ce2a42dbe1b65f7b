//! CLI command modules.

pub mod info;
pub mod set;
