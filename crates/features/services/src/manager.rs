use crate::bindings::{BindingRegistry, BindingSummary};
use crate::dispatch::{ConfigDispatcher, DispatchMode, DispatchReport};
use crate::error::{BindingError, BindingErrorExt};
use crate::installer::{ArtifactFetcher, ClientLibraryInstaller, installed_libraries};
use crate::instance::ServiceBindings;
use crate::opt_out::OptOutPolicy;
use crate::registry::PluginRegistry;
use crate::uris::UriCatalog;
use bindery_domain::config::ServerConfig;
use bindery_domain::constants::LIBRARY_EXTENSION;
use bindery_xml::Element;
use fxhash::FxHashSet;
use private::Sealed;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Span, info, info_span};

#[derive(Debug, Default)]
pub struct NoServer;
#[derive(Debug)]
pub struct WithServer(ServerConfig);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoServer {}
impl Sealed for WithServer {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct ServiceManagerBuilder<S: Sealed = NoServer> {
    state: S,
    policy: OptOutPolicy,
    plugins: Option<PluginRegistry>,
    span: Option<Span>,
}

#[allow(private_bounds)]
impl<S: Sealed> ServiceManagerBuilder<S> {
    #[must_use = "Sets the opt-out policy applied while filing bindings"]
    pub fn opt_out(mut self, policy: OptOutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Defaults to [`PluginRegistry::builtin`].
    #[must_use = "Sets the plugin registry used to resolve service types"]
    pub fn plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = Some(plugins);
        self
    }

    /// Span entered by every manager operation. Defaults to a `service_manager` span.
    #[must_use = "Sets the logging context of the manager"]
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> ServiceManagerBuilder<N> {
        ServiceManagerBuilder { state, policy: self.policy, plugins: self.plugins, span: self.span }
    }
}

impl ServiceManagerBuilder<NoServer> {
    #[must_use = "Creates a new service manager builder"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the server layout the manager writes into"]
    pub fn server(self, server: ServerConfig) -> ServiceManagerBuilder<WithServer> {
        self.transition(WithServer(server))
    }

    #[must_use = "Sets the server directory with the default layout"]
    pub fn server_dir(self, dir: impl AsRef<Path>) -> ServiceManagerBuilder<WithServer> {
        self.server(ServerConfig::default().with_dir(dir))
    }
}

impl ServiceManagerBuilder<WithServer> {
    /// Files `bindings` and writes the binding-variables document into the server directory.
    ///
    /// The document is written even when there are no bindings.
    ///
    /// # Errors
    /// * [`BindingError::UnknownHandler`] / [`BindingError::HandlerConstruction`] from parsing.
    /// * [`BindingError::Io`] / [`BindingError::Document`] if the document cannot be written.
    pub fn initialize(self, bindings: &ServiceBindings) -> Result<ServiceManager, BindingError> {
        let server = self.state.0;
        let span = self
            .span
            .unwrap_or_else(|| info_span!("service_manager", server_dir = %server.dir.display()));
        let entered = span.enter();

        let plugins = self.plugins.unwrap_or_else(PluginRegistry::builtin);
        let registry = BindingRegistry::parse(bindings, &self.policy, &plugins)?;
        info!("{}", registry.summary().to_string().trim_end());

        fs::create_dir_all(&server.dir)
            .context(format!("Failed to create {}", server.dir.display()))?;
        let path = server.variables_path();
        registry.variables_document().write(&path).context("Failed to write binding variables")?;
        info!(path = %path.display(), "Binding variables written");

        drop(entered);
        Ok(ServiceManager { server, registry, span })
    }
}

/// Entry point owning the filed bindings of one server.
///
/// ```rust
/// use bindery_services::{DispatchMode, ServiceBindings, ServiceManager};
/// use bindery_xml::Element;
///
/// let dir = tempfile::tempdir().unwrap();
/// let bindings = ServiceBindings::from_json(r#"{"redis":[{"name":"cache"}]}"#).unwrap();
/// let manager = ServiceManager::builder().server_dir(dir.path()).initialize(&bindings).unwrap();
///
/// let mut server = Element::new("server");
/// let report = manager.update_configuration(&mut server, DispatchMode::Create);
/// assert!(report.is_clean());
/// assert!(dir.path().join("runtime-vars.xml").exists());
/// ```
#[derive(Debug)]
pub struct ServiceManager {
    server: ServerConfig,
    registry: BindingRegistry,
    span: Span,
}

impl ServiceManager {
    #[must_use = "Creates a new service manager builder"]
    pub fn builder() -> ServiceManagerBuilder {
        ServiceManagerBuilder::new()
    }

    /// Shortcut for the builder with the default server layout.
    ///
    /// # Errors
    /// See [`ServiceManagerBuilder::initialize`].
    pub fn initialize(
        bindings: &ServiceBindings,
        policy: OptOutPolicy,
        plugins: PluginRegistry,
        server_dir: impl AsRef<Path>,
    ) -> Result<Self, BindingError> {
        Self::builder().opt_out(policy).plugins(plugins).server_dir(server_dir).initialize(bindings)
    }

    #[must_use]
    pub const fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn server(&self) -> &ServerConfig {
        &self.server
    }

    #[must_use]
    pub fn summary(&self) -> BindingSummary {
        self.registry.summary()
    }

    #[must_use]
    pub fn requires_extensions(&self) -> bool {
        let _entered = self.span.enter();
        self.registry.requires_extensions()
    }

    #[must_use]
    pub fn required_features(&self) -> FxHashSet<String> {
        let _entered = self.span.enter();
        self.registry.required_features()
    }

    pub fn required_components(&self, uris: &UriCatalog, components: &mut Vec<String>) {
        let _entered = self.span.enter();
        self.registry.required_components(uris, components);
    }

    /// Client library URLs not yet present in the library directory.
    ///
    /// # Errors
    /// Returns [`BindingError::Io`] if the library directory cannot be read.
    pub fn client_library_urls(&self, uris: &UriCatalog) -> Result<Vec<String>, BindingError> {
        let _entered = self.span.enter();
        let installed = installed_libraries(&self.server.library_path(), LIBRARY_EXTENSION)?;
        Ok(self.registry.required_client_library_urls(&installed, uris))
    }

    /// Lets every `Full` binding create or update its stanzas in `root`. Persisting the document
    /// is up to the caller.
    pub fn update_configuration(&self, root: &mut Element, mode: DispatchMode) -> DispatchReport {
        let _entered = self.span.enter();
        ConfigDispatcher::new(&self.server.dir)
            .library_dir(self.server.library_path())
            .library_ref(self.server.library_ref.clone())
            .dispatch(&self.registry, root, mode)
    }

    /// # Errors
    /// Fetch, extraction and filesystem failures propagate.
    pub fn install_client_libraries(
        &self,
        uris: &UriCatalog,
        fetcher: &dyn ArtifactFetcher,
    ) -> Result<Vec<PathBuf>, BindingError> {
        let _entered = self.span.enter();
        ClientLibraryInstaller::new(self.server.library_path()).install(&self.registry, uris, fetcher)
    }
}
