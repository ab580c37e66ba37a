//! Handlers shipped with the engine.

mod default;

pub use default::DefaultService;

use crate::handler::HandlerCatalog;

pub const DEFAULT_MODULE: &str = "default";
pub const DEFAULT_HANDLER: &str = "DefaultService";

/// Catalog with every built-in handler registered.
#[must_use]
pub fn builtin_catalog() -> HandlerCatalog {
    HandlerCatalog::new().with(DEFAULT_MODULE, DEFAULT_HANDLER, |descriptor| {
        Box::new(DefaultService::new(descriptor))
    })
}
