//! CLI command implementations.

pub mod common;
pub mod index;
pub mod resolve;
pub mod scan;
