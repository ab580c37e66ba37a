//! # Service handlers
//!
//! A handler is built per bound instance and knows how to configure that one service.
//! Handlers are looked up in a [`HandlerCatalog`] by the `(module, handler)` pair their
//! descriptor names; nothing is resolved by name at runtime beyond that lookup.

use crate::descriptor::ServiceDescriptor;
use crate::error::HandlerError;
use crate::instance::ServiceInstance;
use crate::uris::UriCatalog;
use bindery_xml::Element;
use fxhash::{FxHashMap, FxHashSet};
use std::fmt::{self, Debug};
use std::path::Path;
use std::sync::Arc;

/// Inputs shared by every create/update call of one dispatch pass.
#[derive(Debug, Clone, Copy)]
pub struct StanzaContext<'a> {
    /// Root directory of the hosted server.
    pub server_dir: &'a Path,
    /// Path expression pointing at the client library directory.
    pub library_ref: &'a str,
    /// Client library file names already present.
    pub client_libraries: &'a [String],
}

/// Capabilities every service handler provides.
pub trait ServiceHandler: Debug {
    /// Takes in the instance payload and records its binding variables under `variables`.
    ///
    /// # Errors
    /// A failure here is fatal to the whole parse pass.
    fn absorb(&mut self, instance: &ServiceInstance, variables: &mut Element) -> Result<(), HandlerError>;

    /// Whether the server's extended feature set must be enabled.
    fn requires_extensions(&self) -> bool;

    fn required_features(&self, features: &mut FxHashSet<String>);

    /// Adds installable component references, resolved through `uris` where needed.
    fn required_components(&self, uris: &UriCatalog, components: &mut Vec<String>);

    /// Writes this instance's stanzas into a fresh configuration document.
    ///
    /// # Errors
    /// Logged and skipped by the dispatcher.
    fn create(&self, root: &mut Element, context: &StanzaContext<'_>) -> Result<(), HandlerError>;

    /// Merges this instance's stanzas into an existing document. `instance_count` is the number of
    /// eligible bindings sharing this handler's stanza kind.
    ///
    /// # Errors
    /// Logged and skipped by the dispatcher.
    fn update(
        &self,
        root: &mut Element,
        context: &StanzaContext<'_>,
        instance_count: usize,
    ) -> Result<(), HandlerError>;

    /// Download URLs of client libraries still missing from `installed`.
    fn client_library_urls(&self, installed: &[String], uris: &UriCatalog) -> Vec<String>;
}

/// Builds an empty handler for a descriptor; the payload arrives through [`ServiceHandler::absorb`].
pub type HandlerConstructor = Box<dyn Fn(&Arc<ServiceDescriptor>) -> Box<dyn ServiceHandler>>;

/// Explicit `(module, handler) -> constructor` table.
#[derive(Default)]
pub struct HandlerCatalog {
    constructors: FxHashMap<(String, String), HandlerConstructor>,
}

impl HandlerCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor, replacing any previous one for the same pair.
    pub fn register<F>(&mut self, module: impl Into<String>, handler: impl Into<String>, constructor: F)
    where
        F: Fn(&Arc<ServiceDescriptor>) -> Box<dyn ServiceHandler> + 'static,
    {
        self.constructors.insert((module.into(), handler.into()), Box::new(constructor));
    }

    #[must_use]
    pub fn with<F>(mut self, module: impl Into<String>, handler: impl Into<String>, constructor: F) -> Self
    where
        F: Fn(&Arc<ServiceDescriptor>) -> Box<dyn ServiceHandler> + 'static,
    {
        self.register(module, handler, constructor);
        self
    }

    #[must_use]
    pub fn get(&self, module: &str, handler: &str) -> Option<&HandlerConstructor> {
        self.constructors.get(&(module.to_owned(), handler.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, module: &str, handler: &str) -> bool {
        self.get(module, handler).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.constructors.keys().map(|(m, h)| format!("{m}::{h}")).collect();
        keys.sort_unstable();
        f.debug_struct("HandlerCatalog").field("handlers", &keys).finish()
    }
}
