use crate::bindings::BindingRegistry;
use crate::handler::StanzaContext;
use crate::installer::installed_libraries;
use crate::tier::AutoconfigTier;
use bindery_domain::constants::{LIBRARY_DIR, LIBRARY_EXTENSION, LIBRARY_REF};
use bindery_xml::Element;
use std::path::{Path, PathBuf};
use strum_macros::Display;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum DispatchMode {
    /// The configuration document is freshly created.
    Create,
    /// The configuration document already exists and is merged into.
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub reported_type: String,
    pub name: Option<String>,
    pub message: String,
}

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub mode: DispatchMode,
    pub applied: usize,
    pub failed: Vec<DispatchFailure>,
}

impl DispatchReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives create/update of every `Full` binding against a configuration document.
#[derive(Debug, Clone)]
pub struct ConfigDispatcher {
    server_dir: PathBuf,
    library_dir: PathBuf,
    library_ref: String,
}

impl ConfigDispatcher {
    #[must_use]
    pub fn new(server_dir: impl Into<PathBuf>) -> Self {
        let server_dir = server_dir.into();
        let library_dir = server_dir.join(LIBRARY_DIR);
        Self { server_dir, library_dir, library_ref: LIBRARY_REF.to_owned() }
    }

    #[must_use]
    pub fn library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dir = dir.into();
        self
    }

    #[must_use]
    pub fn library_ref(mut self, library_ref: impl Into<String>) -> Self {
        self.library_ref = library_ref.into();
        self
    }

    #[must_use]
    pub fn server_dir(&self) -> &Path {
        &self.server_dir
    }

    /// Calls create or update on every `Full` binding. `ConfigOnly` bindings are never passed
    /// the document.
    ///
    /// A failing handler is logged and recorded in the report; the remaining bindings are still
    /// dispatched.
    #[instrument(skip_all, fields(%mode))]
    pub fn dispatch(&self, registry: &BindingRegistry, root: &mut Element, mode: DispatchMode) -> DispatchReport {
        let client_libraries = installed_libraries(&self.library_dir, LIBRARY_EXTENSION)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Cannot list client libraries, dispatching without them");
                Vec::new()
            });
        let context = StanzaContext {
            server_dir: &self.server_dir,
            library_ref: &self.library_ref,
            client_libraries: &client_libraries,
        };

        let mut report = DispatchReport { mode, applied: 0, failed: Vec::new() };
        for binding in registry.bindings(AutoconfigTier::Full) {
            let result = match mode {
                DispatchMode::Create => binding.handler.create(root, &context),
                DispatchMode::Update => {
                    let count = registry.stanza_count(binding.stanza_kind());
                    binding.handler.update(root, &context, count)
                },
            };

            match result {
                Ok(()) => {
                    debug!(service = %binding.reported_type, stanza = binding.stanza_kind(), "Configured");
                    report.applied += 1;
                },
                Err(e) => {
                    warn!(
                        service = %binding.reported_type,
                        instance = binding.name.as_deref().unwrap_or_default(),
                        error = %e,
                        "Service configuration failed, continuing"
                    );
                    report.failed.push(DispatchFailure {
                        reported_type: binding.reported_type.clone(),
                        name: binding.name.clone(),
                        message: e.to_string(),
                    });
                },
            }
        }

        info!(applied = report.applied, failed = report.failed.len(), "Configuration dispatched");
        report
    }
}
