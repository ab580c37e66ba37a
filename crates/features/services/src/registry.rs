use crate::descriptor::{DescriptorAttributes, ServiceDescriptor};
use crate::error::BindingError;
use crate::factory::HandlerFactory;
use crate::handler::HandlerCatalog;
use crate::handlers::{self, DEFAULT_HANDLER, DEFAULT_MODULE};
use crate::resolver::resolve_service_type;
use bindery_domain::constants::DEFAULT_TYPE_KEY;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Loaded plugin descriptors plus the handlers they can construct.
///
/// Keys iterate in lexicographic order, which makes resolver ties deterministic.
#[derive(Debug)]
pub struct PluginRegistry {
    descriptors: BTreeMap<String, Arc<ServiceDescriptor>>,
    default: Arc<ServiceDescriptor>,
    catalog: HandlerCatalog,
}

impl PluginRegistry {
    /// # Errors
    /// Returns [`BindingError::InvalidPlugins`] if there is no `"default"` key or a key is empty.
    pub fn new(
        descriptors: impl IntoIterator<Item = (String, DescriptorAttributes)>,
        catalog: HandlerCatalog,
    ) -> Result<Self, BindingError> {
        let mut loaded = BTreeMap::new();
        for (key, attributes) in descriptors {
            if key.is_empty() {
                return Err(BindingError::InvalidPlugins {
                    message: "descriptor with an empty type key".into(),
                    context: None,
                });
            }
            debug!(type_key = %key, stanza = ?attributes.stanza, "Descriptor loaded");
            loaded.insert(key.clone(), Arc::new(ServiceDescriptor::new(key, attributes)));
        }

        let default = loaded.get(DEFAULT_TYPE_KEY).cloned().ok_or_else(|| {
            BindingError::InvalidPlugins {
                message: format!("no '{DEFAULT_TYPE_KEY}' descriptor").into(),
                context: Some(format!("{} descriptors", loaded.len()).into()),
            }
        })?;

        Ok(Self { descriptors: loaded, default, catalog })
    }

    /// Registry holding only the catch-all descriptor backed by the built-in default handler.
    #[must_use]
    pub fn builtin() -> Self {
        let default = Arc::new(ServiceDescriptor::new(
            DEFAULT_TYPE_KEY,
            DescriptorAttributes::new(DEFAULT_MODULE, DEFAULT_HANDLER),
        ));
        let descriptors = BTreeMap::from([(DEFAULT_TYPE_KEY.to_owned(), Arc::clone(&default))]);
        Self { descriptors, default, catalog: handlers::builtin_catalog() }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.descriptors.keys().map(String::as_str)
    }

    #[must_use]
    pub fn descriptor(&self, type_key: &str) -> Option<&Arc<ServiceDescriptor>> {
        self.descriptors.get(type_key)
    }

    /// Descriptor for an externally reported service type, falling back to the catch-all.
    #[must_use]
    pub fn resolve(&self, reported: &str) -> &Arc<ServiceDescriptor> {
        let key = resolve_service_type(reported, self.keys());
        self.descriptors.get(key).unwrap_or(&self.default)
    }

    #[must_use]
    pub const fn catalog(&self) -> &HandlerCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn factory(&self) -> HandlerFactory<'_> {
        HandlerFactory::new(&self.catalog)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }
}
