//! Library surface of the main menu converter.
//!
//! The binary in `main.rs` is a thin argument and prompt layer over
//! [`services::convert::run`]; everything else lives here so tests can
//! drive the pipeline directly.

pub mod services;
pub mod types;
