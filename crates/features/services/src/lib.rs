//! # Service bindings
//!
//! Resolves bound services into runtime configuration for a hosted server.
//!
//! 1. **[`OptOutPolicy`]** turns the operator's opt-out directive into per-type [`AutoconfigTier`]s.
//! 2. **[`PluginRegistry`]** resolves reported service types to descriptors and builds handlers
//!    through the [`HandlerFactory`].
//! 3. **[`BindingRegistry`]** files each binding into a tier and answers aggregate queries.
//! 4. **[`ConfigDispatcher`]** and **[`ClientLibraryInstaller`]** act on the eligible bindings.
//!
//! [`ServiceManager`] ties these together for one server directory.
//!
//! ```rust
//! use bindery_services::{AutoconfigTier, BindingRegistry, OptOutPolicy, PluginRegistry, ServiceBindings};
//!
//! let bindings = ServiceBindings::from_json(
//!     r#"{"mysql":[{"name":"orders"}],"redis":[{"name":"cache"}]}"#,
//! )?;
//! let policy = OptOutPolicy::parse(Some("redis=all"));
//! let registry = BindingRegistry::parse(&bindings, &policy, &PluginRegistry::builtin())?;
//!
//! assert_eq!(registry.bindings(AutoconfigTier::Full).len(), 1);
//! assert_eq!(registry.bindings(AutoconfigTier::None).len(), 1);
//! # Ok::<(), bindery_services::BindingError>(())
//! ```

mod bindings;
mod descriptor;
mod dispatch;
mod error;
mod factory;
mod handler;
pub mod handlers;
mod installer;
mod instance;
mod manager;
mod opt_out;
mod registry;
mod resolver;
mod tier;
mod uris;
pub mod variables;

pub use crate::bindings::{BindingRegistry, BindingSummary, ServiceBinding, SummaryEntry};
pub use crate::descriptor::{DescriptorAttributes, ServiceDescriptor};
pub use crate::dispatch::{ConfigDispatcher, DispatchFailure, DispatchMode, DispatchReport};
pub use crate::error::{BindingError, BindingErrorExt, FetchError, HandlerError};
pub use crate::factory::HandlerFactory;
pub use crate::handler::{HandlerCatalog, HandlerConstructor, ServiceHandler, StanzaContext};
pub use crate::installer::{
    ArtifactFetcher, ArtifactKind, ClientLibraryInstaller, FetchedArtifact, installed_libraries,
};
pub use crate::instance::{ServiceBindings, ServiceInstance};
pub use crate::manager::{NoServer, ServiceManager, ServiceManagerBuilder, WithServer};
pub use crate::opt_out::OptOutPolicy;
pub use crate::registry::PluginRegistry;
pub use crate::resolver::resolve_service_type;
pub use crate::tier::AutoconfigTier;
pub use crate::uris::UriCatalog;
