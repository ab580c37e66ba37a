#![allow(dead_code, unreachable_pub)]

use bindery_services::variables::add_variable;
use bindery_services::{
    ArtifactFetcher, ArtifactKind, DescriptorAttributes, FetchError, FetchedArtifact, HandlerError,
    PluginRegistry, ServiceDescriptor, ServiceHandler, ServiceInstance, StanzaContext, UriCatalog,
};
use bindery_xml::Element;
use fxhash::{FxHashMap, FxHashSet};
use serde_json::Value;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;

pub const MODULE: &str = "test";
pub const HANDLER: &str = "Recording";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create { service: String },
    Update { service: String, count: usize },
}

/// Shared log of create/update calls across every handler built from one catalog.
#[derive(Debug, Default, Clone)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn services(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|c| match c {
                Call::Create { service } | Call::Update { service, .. } => service,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }
}

/// Handler whose behavior is driven by descriptor attributes:
/// `feature`, `component`, `library` (URL), `extensions`, `fail`, `reject`.
#[derive(Debug)]
pub struct Recording {
    journal: Journal,
    descriptor: Arc<ServiceDescriptor>,
    name: String,
}

impl Recording {
    fn flag(&self, key: &str) -> bool {
        self.descriptor.attribute(key).and_then(Value::as_bool).unwrap_or_default()
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.descriptor.attribute(key).and_then(Value::as_str)
    }

    fn outcome(&self) -> Result<(), HandlerError> {
        if self.flag("fail") {
            return Err(HandlerError::Stanza { message: "refused".into(), context: Some(self.name.clone().into()) });
        }
        Ok(())
    }
}

impl ServiceHandler for Recording {
    fn absorb(&mut self, instance: &ServiceInstance, variables: &mut Element) -> Result<(), HandlerError> {
        if self.flag("reject") {
            return Err(HandlerError::InvalidPayload { message: "rejected".into(), context: None });
        }
        self.name = instance.name().unwrap_or("unnamed").to_owned();
        add_variable(variables, format!("test.{}", self.name), self.descriptor.type_key());
        Ok(())
    }

    fn requires_extensions(&self) -> bool {
        self.flag("extensions")
    }

    fn required_features(&self, features: &mut FxHashSet<String>) {
        if let Some(feature) = self.text("feature") {
            features.insert(feature.to_owned());
        }
    }

    fn required_components(&self, uris: &UriCatalog, components: &mut Vec<String>) {
        if let Some(uri) = self.text("component").and_then(|c| uris.get(c)) {
            components.push(uri.to_owned());
        }
    }

    fn create(&self, root: &mut Element, _: &StanzaContext<'_>) -> Result<(), HandlerError> {
        self.journal.record(Call::Create { service: self.name.clone() });
        self.outcome()?;
        root.push(Element::new(self.descriptor.stanza_kind()).with_attribute("id", &self.name));
        Ok(())
    }

    fn update(&self, root: &mut Element, _: &StanzaContext<'_>, count: usize) -> Result<(), HandlerError> {
        self.journal.record(Call::Update { service: self.name.clone(), count });
        self.outcome()?;
        root.push(Element::new(self.descriptor.stanza_kind()).with_attribute("id", &self.name));
        Ok(())
    }

    fn client_library_urls(&self, installed: &[String], _: &UriCatalog) -> Vec<String> {
        self.text("library")
            .filter(|url| !installed.iter().any(|name| url.ends_with(&format!("/{name}"))))
            .map(|url| vec![url.to_owned()])
            .unwrap_or_default()
    }
}

pub fn recording(stanza: &str) -> DescriptorAttributes {
    DescriptorAttributes::new(MODULE, HANDLER).with_stanza(stanza)
}

/// Registry with the built-in catch-all plus the given recording descriptors.
pub fn plugins(journal: &Journal, descriptors: Vec<(&str, DescriptorAttributes)>) -> PluginRegistry {
    let journal = journal.clone();
    let catalog = bindery_services::handlers::builtin_catalog().with(MODULE, HANDLER, move |descriptor| {
        Box::new(Recording { journal: journal.clone(), descriptor: Arc::clone(descriptor), name: String::new() })
    });

    let default = DescriptorAttributes::new(
        bindery_services::handlers::DEFAULT_MODULE,
        bindery_services::handlers::DEFAULT_HANDLER,
    );
    let entries = descriptors
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .chain([("default".to_owned(), default)]);

    PluginRegistry::new(entries, catalog).unwrap()
}

/// Fetcher serving prepared files. An archive is a text file listing the paths it contains.
#[derive(Debug, Default)]
pub struct FakeFetcher {
    artifacts: FxHashMap<String, FetchedArtifact>,
    fetched: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn library(mut self, dir: &Path, url: &str, kind: ArtifactKind) -> Self {
        let path = dir.join(format!("cached-{}", self.artifacts.len()));
        fs::write(&path, url).unwrap();
        self.artifacts.insert(url.to_owned(), FetchedArtifact { path, kind });
        self
    }

    pub fn archive(mut self, dir: &Path, url: &str, entries: &[&str]) -> Self {
        let path = dir.join(format!("cached-{}.zip", self.artifacts.len()));
        fs::write(&path, entries.join("\n")).unwrap();
        self.artifacts.insert(url.to_owned(), FetchedArtifact { path, kind: ArtifactKind::Archive });
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl ArtifactFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedArtifact, FetchError> {
        self.fetched.borrow_mut().push(url.to_owned());
        self.artifacts
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Unavailable { message: url.to_owned().into(), context: None })
    }

    fn extract(&self, archive: &Path, into: &Path) -> Result<(), FetchError> {
        for entry in fs::read_to_string(archive)?.lines() {
            let target: PathBuf = into.join(entry);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, entry)?;
        }
        Ok(())
    }
}
