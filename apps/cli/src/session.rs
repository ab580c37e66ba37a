use crate::args::Cli;
use anyhow::{Context, Result};
use bindery_domain::config::{BinderyConfig, ServerConfig};
use bindery_kernel::config::load_document;
use bindery_services::{
    DescriptorAttributes, OptOutPolicy, PluginRegistry, ServiceBindings, UriCatalog, handlers,
};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::PathBuf;
use tracing::debug;

/// Inputs of one command, merged from flags, environment and settings.
#[derive(Debug)]
pub struct Session {
    pub server: ServerConfig,
    pub bindings: ServiceBindings,
    pub policy: OptOutPolicy,
    pub uris: UriCatalog,
    plugins: Option<PathBuf>,
}

impl Session {
    pub fn new(cli: &Cli, cfg: BinderyConfig) -> Result<Self> {
        let mut server = cfg.server;
        if let Some(dir) = &cli.server_dir {
            server = server.with_dir(dir);
        }

        let bindings = match (&cli.services, &cli.services_json) {
            (Some(path), _) => {
                let file = File::open(path)
                    .with_context(|| format!("Cannot open services file {}", path.display()))?;
                ServiceBindings::from_reader(file)?
            },
            (None, Some(json)) => ServiceBindings::from_json(json)?,
            (None, None) => ServiceBindings::empty(),
        };

        let directive = cli.opt_out.as_deref().or(cfg.services.opt_out.as_deref());
        debug!(types = bindings.len(), opt_out = directive, "Session inputs collected");

        Ok(Self {
            server,
            bindings,
            policy: OptOutPolicy::parse(directive),
            uris: cfg.services.uris.into(),
            plugins: cfg.services.plugins,
        })
    }

    /// Built-in registry, or the descriptors from the configured plugins file.
    pub fn plugins(&self) -> Result<PluginRegistry> {
        let Some(path) = &self.plugins else {
            return Ok(PluginRegistry::builtin());
        };
        let descriptors: BTreeMap<String, DescriptorAttributes> = load_document(path)
            .with_context(|| format!("Cannot load plugin descriptors from {}", path.display()))?;
        Ok(PluginRegistry::new(descriptors, handlers::builtin_catalog())?)
    }
}
