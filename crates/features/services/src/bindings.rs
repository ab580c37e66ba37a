//! # Binding registry
//!
//! One parse pass files every bound instance into exactly one [`AutoconfigTier`] and counts,
//! per stanza kind, the bindings that take part in configuration. Aggregate queries always walk
//! the `Full` tier first and then `ConfigOnly`; `None` bindings are kept for diagnostics only.

use crate::descriptor::ServiceDescriptor;
use crate::error::BindingError;
use crate::handler::ServiceHandler;
use crate::instance::ServiceBindings;
use crate::opt_out::OptOutPolicy;
use crate::registry::PluginRegistry;
use crate::tier::AutoconfigTier;
use crate::uris::UriCatalog;
use bindery_domain::constants::VARIABLES_ROOT;
use bindery_xml::{Document, Element};
use fxhash::{FxHashMap, FxHashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One bound instance with its handler.
#[derive(Debug)]
pub struct ServiceBinding {
    pub reported_type: String,
    pub name: Option<String>,
    pub descriptor: Arc<ServiceDescriptor>,
    pub handler: Box<dyn ServiceHandler>,
}

impl ServiceBinding {
    /// Registry key the reported type resolved to.
    #[must_use]
    pub fn resolved_type(&self) -> &str {
        self.descriptor.type_key()
    }

    #[must_use]
    pub fn stanza_kind(&self) -> &str {
        self.descriptor.stanza_kind()
    }
}

#[derive(Debug)]
pub struct BindingRegistry {
    full: Vec<ServiceBinding>,
    config_only: Vec<ServiceBinding>,
    disabled: Vec<ServiceBinding>,
    stanza_counts: FxHashMap<String, usize>,
    variables: Element,
}

impl BindingRegistry {
    /// Resolves, builds and files every instance of `bindings`.
    ///
    /// The tier comes from the opt-out policy looked up by the *reported* type name. Only `Full`
    /// and `ConfigOnly` bindings are counted towards their stanza kind.
    ///
    /// # Errors
    /// Propagates [`BindingError::UnknownHandler`] and [`BindingError::HandlerConstruction`].
    #[instrument(skip_all, fields(types = bindings.len()))]
    pub fn parse(
        bindings: &ServiceBindings,
        policy: &OptOutPolicy,
        plugins: &PluginRegistry,
    ) -> Result<Self, BindingError> {
        let mut registry = Self::empty();
        let factory = plugins.factory();

        for (reported_type, instances) in bindings.iter() {
            let descriptor = plugins.resolve(reported_type);
            let tier = policy.tier_for(reported_type);
            debug!(reported_type, resolved = descriptor.type_key(), %tier, "Service type resolved");

            for instance in instances {
                let Some(handler) = factory.instantiate(descriptor, instance, &mut registry.variables)?
                else {
                    continue;
                };
                registry.file(
                    ServiceBinding {
                        reported_type: reported_type.to_owned(),
                        name: instance.name().map(str::to_owned),
                        descriptor: Arc::clone(descriptor),
                        handler,
                    },
                    tier,
                );
            }
        }

        info!(
            full = registry.full.len(),
            config_only = registry.config_only.len(),
            disabled = registry.disabled.len(),
            "Service bindings parsed"
        );
        Ok(registry)
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            full: Vec::new(),
            config_only: Vec::new(),
            disabled: Vec::new(),
            stanza_counts: FxHashMap::default(),
            variables: Element::new(VARIABLES_ROOT),
        }
    }

    /// Files a binding into `tier`, counting its stanza kind unless the tier is `None`.
    pub fn file(&mut self, binding: ServiceBinding, tier: AutoconfigTier) {
        if tier.is_eligible() {
            *self.stanza_counts.entry(binding.stanza_kind().to_owned()).or_default() += 1;
        }
        match tier {
            AutoconfigTier::Full => self.full.push(binding),
            AutoconfigTier::ConfigOnly => self.config_only.push(binding),
            AutoconfigTier::None => self.disabled.push(binding),
        }
    }

    #[must_use]
    pub fn bindings(&self, tier: AutoconfigTier) -> &[ServiceBinding] {
        match tier {
            AutoconfigTier::Full => &self.full,
            AutoconfigTier::ConfigOnly => &self.config_only,
            AutoconfigTier::None => &self.disabled,
        }
    }

    /// `Full` bindings followed by `ConfigOnly` bindings.
    pub fn eligible(&self) -> impl Iterator<Item = &ServiceBinding> {
        self.full.iter().chain(&self.config_only)
    }

    /// Eligible bindings sharing `stanza_kind`.
    #[must_use]
    pub fn stanza_count(&self, stanza_kind: &str) -> usize {
        self.stanza_counts.get(stanza_kind).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn requires_extensions(&self) -> bool {
        self.eligible().any(|b| b.handler.requires_extensions())
    }

    #[must_use]
    pub fn required_features(&self) -> FxHashSet<String> {
        let mut features = FxHashSet::default();
        for binding in self.eligible() {
            binding.handler.required_features(&mut features);
        }
        features
    }

    pub fn required_components(&self, uris: &UriCatalog, components: &mut Vec<String>) {
        for binding in self.eligible() {
            binding.handler.required_components(uris, components);
        }
    }

    /// Client library URLs still needed, deduplicated in first-seen order.
    #[must_use]
    pub fn required_client_library_urls(&self, installed: &[String], uris: &UriCatalog) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.eligible()
            .flat_map(|b| b.handler.client_library_urls(installed, uris))
            .filter(|url| seen.insert(url.clone()))
            .collect()
    }

    /// Root of the binding-variables document.
    #[must_use]
    pub const fn variables(&self) -> &Element {
        &self.variables
    }

    #[must_use]
    pub fn variables_document(&self) -> Document {
        Document::new(self.variables.clone())
    }

    #[must_use]
    pub fn summary(&self) -> BindingSummary {
        let tiers = [AutoconfigTier::Full, AutoconfigTier::ConfigOnly, AutoconfigTier::None];
        let entries = tiers
            .into_iter()
            .flat_map(|tier| {
                self.bindings(tier).iter().map(move |b| SummaryEntry {
                    tier,
                    reported_type: b.reported_type.clone(),
                    resolved_type: b.resolved_type().to_owned(),
                    name: b.name.clone(),
                })
            })
            .collect();
        BindingSummary { entries }
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

/// Flat, printable view of the filed bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingSummary {
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub tier: AutoconfigTier,
    pub reported_type: String,
    pub resolved_type: String,
    pub name: Option<String>,
}

impl BindingSummary {
    #[must_use]
    pub fn count(&self, tier: AutoconfigTier) -> usize {
        self.entries.iter().filter(|e| e.tier == tier).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12}{} -> {}", self.tier.to_string(), self.reported_type, self.resolved_type)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

impl fmt::Display for BindingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "no service bindings");
        }
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::DescriptorAttributes;
    use crate::error::HandlerError;
    use crate::handler::StanzaContext;
    use crate::instance::ServiceInstance;

    #[derive(Debug)]
    struct Fixed {
        feature: &'static str,
        url: &'static str,
    }

    impl ServiceHandler for Fixed {
        fn absorb(&mut self, _: &ServiceInstance, _: &mut Element) -> Result<(), HandlerError> {
            Ok(())
        }

        fn requires_extensions(&self) -> bool {
            self.feature == "ext"
        }

        fn required_features(&self, features: &mut FxHashSet<String>) {
            features.insert(self.feature.to_owned());
        }

        fn required_components(&self, _: &UriCatalog, components: &mut Vec<String>) {
            components.push(self.feature.to_owned());
        }

        fn create(&self, _: &mut Element, _: &StanzaContext<'_>) -> Result<(), HandlerError> {
            Ok(())
        }

        fn update(&self, _: &mut Element, _: &StanzaContext<'_>, _: usize) -> Result<(), HandlerError> {
            Ok(())
        }

        fn client_library_urls(&self, installed: &[String], _: &UriCatalog) -> Vec<String> {
            if installed.iter().any(|i| self.url.ends_with(i.as_str())) {
                return Vec::new();
            }
            vec![self.url.to_owned()]
        }
    }

    fn binding(stanza: &str, feature: &'static str, url: &'static str) -> ServiceBinding {
        let attrs = DescriptorAttributes::new("test", "Fixed").with_stanza(stanza);
        ServiceBinding {
            reported_type: feature.to_owned(),
            name: Some(feature.to_owned()),
            descriptor: Arc::new(ServiceDescriptor::new(feature, attrs)),
            handler: Box::new(Fixed { feature, url }),
        }
    }

    #[test]
    fn test_none_tier_is_not_counted() {
        let mut registry = BindingRegistry::empty();
        registry.file(binding("dataSource", "a", "u/a.jar"), AutoconfigTier::Full);
        registry.file(binding("dataSource", "b", "u/b.jar"), AutoconfigTier::ConfigOnly);
        registry.file(binding("dataSource", "c", "u/c.jar"), AutoconfigTier::None);

        assert_eq!(registry.stanza_count("dataSource"), 2);
        assert_eq!(registry.stanza_count("mongo"), 0);
        assert_eq!(registry.bindings(AutoconfigTier::None).len(), 1);
    }

    #[test]
    fn test_queries_skip_disabled_bindings() {
        let mut registry = BindingRegistry::empty();
        registry.file(binding("none", "a", "u/a.jar"), AutoconfigTier::ConfigOnly);
        registry.file(binding("none", "ext", "u/ext.jar"), AutoconfigTier::None);

        assert!(!registry.requires_extensions());
        assert_eq!(registry.required_features().into_iter().collect::<Vec<_>>(), vec!["a"]);

        let mut components = Vec::new();
        registry.required_components(&UriCatalog::new(), &mut components);
        assert_eq!(components, vec!["a"]);
    }

    #[test]
    fn test_full_tier_comes_first_and_urls_are_deduplicated() {
        let mut registry = BindingRegistry::empty();
        registry.file(binding("none", "b", "u/shared.jar"), AutoconfigTier::ConfigOnly);
        registry.file(binding("none", "a", "u/a.jar"), AutoconfigTier::Full);
        registry.file(binding("none", "c", "u/shared.jar"), AutoconfigTier::Full);

        let urls = registry.required_client_library_urls(&[], &UriCatalog::new());
        assert_eq!(urls, vec!["u/a.jar", "u/shared.jar"]);

        let urls = registry.required_client_library_urls(&["a.jar".to_owned()], &UriCatalog::new());
        assert_eq!(urls, vec!["u/shared.jar"]);
    }

    #[test]
    fn test_summary_lists_every_tier() {
        let mut registry = BindingRegistry::empty();
        registry.file(binding("none", "a", "u/a.jar"), AutoconfigTier::None);
        registry.file(binding("none", "b", "u/b.jar"), AutoconfigTier::Full);

        let summary = registry.summary();
        assert_eq!(summary.count(AutoconfigTier::Full), 1);
        assert_eq!(summary.count(AutoconfigTier::None), 1);
        assert_eq!(summary.entries[0].reported_type, "b");

        let text = summary.to_string();
        assert!(text.starts_with("full        b -> b (b)\n"), "{text}");
        assert!(text.contains("none        a -> a (a)"), "{text}");
        assert_eq!(BindingSummary::default().to_string(), "no service bindings\n");
    }
}
