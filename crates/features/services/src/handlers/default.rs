use crate::descriptor::ServiceDescriptor;
use crate::error::HandlerError;
use crate::handler::{ServiceHandler, StanzaContext};
use crate::instance::ServiceInstance;
use crate::uris::UriCatalog;
use crate::variables::add_variable;
use bindery_xml::Element;
use fxhash::FxHashSet;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::trace;

const PREFIX: &str = "cloud.services";

/// Catch-all handler: publishes the instance metadata and flattened credentials as binding
/// variables and configures nothing else.
#[derive(Debug)]
pub struct DefaultService {
    descriptor: Arc<ServiceDescriptor>,
    name: Option<String>,
}

impl DefaultService {
    #[must_use]
    pub fn new(descriptor: &Arc<ServiceDescriptor>) -> Self {
        Self { descriptor: Arc::clone(descriptor), name: None }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl ServiceHandler for DefaultService {
    fn absorb(&mut self, instance: &ServiceInstance, variables: &mut Element) -> Result<(), HandlerError> {
        let name = instance.name().filter(|n| !n.is_empty()).ok_or_else(|| {
            HandlerError::InvalidPayload {
                message: "service instance has no name".into(),
                context: Some(self.descriptor.type_key().to_owned().into()),
            }
        })?;
        let base = format!("{PREFIX}.{name}");

        add_variable(variables, format!("{base}.name"), name);
        for (key, value) in [("label", instance.label()), ("plan", instance.plan())] {
            if let Some(value) = value {
                add_variable(variables, format!("{base}.{key}"), value);
            }
        }
        if let Some(credentials) = instance.credentials() {
            flatten(variables, &format!("{base}.connection"), credentials);
        }

        trace!(service = name, "Binding variables recorded");
        self.name = Some(name.to_owned());
        Ok(())
    }

    fn requires_extensions(&self) -> bool {
        false
    }

    fn required_features(&self, _: &mut FxHashSet<String>) {}

    fn required_components(&self, _: &UriCatalog, _: &mut Vec<String>) {}

    fn create(&self, _: &mut Element, _: &StanzaContext<'_>) -> Result<(), HandlerError> {
        Ok(())
    }

    fn update(&self, _: &mut Element, _: &StanzaContext<'_>, _: usize) -> Result<(), HandlerError> {
        Ok(())
    }

    fn client_library_urls(&self, _: &[String], _: &UriCatalog) -> Vec<String> {
        Vec::new()
    }
}

/// Scalars become variables; objects recurse with a `.` separator; arrays and nulls are skipped.
fn flatten(variables: &mut Element, prefix: &str, object: &Map<String, Value>) {
    for (key, value) in object {
        let name = format!("{prefix}.{key}");
        match value {
            Value::String(s) => add_variable(variables, name, s.as_str()),
            Value::Number(n) => add_variable(variables, name, n.to_string()),
            Value::Bool(b) => add_variable(variables, name, b.to_string()),
            Value::Object(nested) => flatten(variables, &name, nested),
            Value::Array(_) | Value::Null => {},
        }
    }
}
