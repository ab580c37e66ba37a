use bindery_domain::constants::NO_STANZA;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw per-type plugin attributes as loaded from a descriptor file.
///
/// The short names are canonical; the long names used by older descriptor files are accepted as
/// aliases. Anything else lands in `extra` for the handler to read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptorAttributes {
    #[serde(default, alias = "class_file")]
    pub module: Option<String>,
    #[serde(default, alias = "class_name")]
    pub handler: Option<String>,
    #[serde(default, alias = "server_xml_stanza")]
    pub stanza: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DescriptorAttributes {
    #[must_use]
    pub fn new(module: impl Into<String>, handler: impl Into<String>) -> Self {
        Self { module: Some(module.into()), handler: Some(handler.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_stanza(mut self, stanza: impl Into<String>) -> Self {
        self.stanza = Some(stanza.into());
        self
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Immutable descriptor of one registry key. Shared between every binding of that type.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    type_key: String,
    attributes: DescriptorAttributes,
}

impl ServiceDescriptor {
    #[must_use]
    pub fn new(type_key: impl Into<String>, attributes: DescriptorAttributes) -> Self {
        Self { type_key: type_key.into(), attributes }
    }

    #[must_use]
    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Stanza family this type writes; `"none"` when the descriptor leaves it out.
    #[must_use]
    pub fn stanza_kind(&self) -> &str {
        self.attributes.stanza.as_deref().filter(|s| !s.is_empty()).unwrap_or(NO_STANZA)
    }

    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.attributes.module.as_deref().filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn handler(&self) -> Option<&str> {
        self.attributes.handler.as_deref().filter(|s| !s.is_empty())
    }

    /// Handler-specific attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.extra.get(key)
    }

    #[must_use]
    pub const fn attributes(&self) -> &DescriptorAttributes {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_attribute_names_are_accepted() {
        let attrs: DescriptorAttributes = serde_json::from_str(
            r#"{"class_file":"mysql","class_name":"MySql","server_xml_stanza":"dataSource","driver":"5.1"}"#,
        )
        .unwrap();

        let desc = ServiceDescriptor::new("mysql", attrs);
        assert_eq!(desc.module(), Some("mysql"));
        assert_eq!(desc.handler(), Some("MySql"));
        assert_eq!(desc.stanza_kind(), "dataSource");
        assert_eq!(desc.attribute("driver"), Some(&Value::from("5.1")));
    }

    #[test]
    fn test_missing_stanza_is_none() {
        let desc = ServiceDescriptor::new("x", DescriptorAttributes::new("m", "H"));
        assert_eq!(desc.stanza_kind(), NO_STANZA);

        let desc = ServiceDescriptor::new("x", DescriptorAttributes::new("m", "H").with_stanza(""));
        assert_eq!(desc.stanza_kind(), NO_STANZA);
    }

    #[test]
    fn test_blank_locators_count_as_missing() {
        let attrs = DescriptorAttributes { module: Some(String::new()), ..DescriptorAttributes::default() };
        let desc = ServiceDescriptor::new("x", attrs);
        assert!(desc.module().is_none());
        assert!(desc.handler().is_none());
    }
}
