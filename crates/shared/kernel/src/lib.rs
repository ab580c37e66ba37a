//! Kernel utilities shared across slices.
//! Keep this crate lightweight; today it only owns layered configuration loading.
//!
//! ```rust,ignore
//! use bindery_kernel::config::load_config;
//! use bindery_kernel::domain::config::BinderyConfig;
//!
//! let cfg: BinderyConfig = load_config(Some("bindery.toml")).unwrap_or_default();
//! ```
pub mod config;

pub use bindery_domain as domain;
