//! # Domain Models
//!
//! Settings and constants shared by the binding engine, the kernel and the CLI.
//! Keep it lean: only `serde`, no I/O and no behavior beyond defaults.

pub mod config;
pub mod constants;
