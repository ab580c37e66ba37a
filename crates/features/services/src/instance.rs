//! # Binding input
//!
//! The bound-services document maps each reported service type to an ordered list of instance
//! payloads (`{ "mysql": [ { "name": "db", "credentials": { .. } } ] }`). Payloads stay opaque
//! JSON; only handlers interpret them.

use crate::error::{BindingError, BindingErrorExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

/// One bound instance payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceInstance(Value);

impl ServiceInstance {
    #[must_use]
    pub const fn new(payload: Value) -> Self {
        Self(payload)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.str_field("label")
    }

    #[must_use]
    pub fn plan(&self) -> Option<&str> {
        self.str_field("plan")
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Map<String, Value>> {
        self.0.get("credentials").and_then(Value::as_object)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.0.get("tags").and_then(Value::as_array).into_iter().flatten().filter_map(Value::as_str)
    }

    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for ServiceInstance {
    fn from(payload: Value) -> Self {
        Self(payload)
    }
}

/// Reported service types with their instances, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceBindings {
    entries: Vec<(String, Vec<ServiceInstance>)>,
}

impl ServiceBindings {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a bound-services document. Blank input means no bindings.
    ///
    /// Types and their instances keep the order they have in the document.
    ///
    /// # Errors
    /// Returns [`BindingError::InvalidBindings`] if the text is not an object of arrays.
    pub fn from_json(text: &str) -> Result<Self, BindingError> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }
        let parsed = serde_json::from_str::<Map<String, Value>>(text)
            .context("Failed to parse bound services")?;
        parsed
            .into_iter()
            .map(|(reported_type, instances)| {
                let instances = serde_json::from_value::<Vec<ServiceInstance>>(instances)
                    .context(format!("Instances of '{reported_type}' must be an array"))?;
                Ok::<_, BindingError>((reported_type, instances))
            })
            .collect()
    }

    /// # Errors
    /// Returns [`BindingError::Io`] if the reader fails, or [`BindingError::InvalidBindings`].
    pub fn from_reader(mut reader: impl Read) -> Result<Self, BindingError> {
        let mut text = String::new();
        reader.read_to_string(&mut text).context("Failed to read bound services")?;
        Self::from_json(&text)
    }

    pub fn push(&mut self, reported_type: impl Into<String>, instances: Vec<ServiceInstance>) {
        self.entries.push((reported_type.into(), instances));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ServiceInstance])> {
        self.entries.iter().map(|(t, i)| (t.as_str(), i.as_slice()))
    }

    /// Number of reported types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<ServiceInstance>)> for ServiceBindings {
    fn from_iter<I: IntoIterator<Item = (S, Vec<ServiceInstance>)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(t, i)| (t.into(), i)).collect() }
    }
}
