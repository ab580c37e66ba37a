use std::collections::BTreeMap;

/// Catalog of download locations handlers consult for components and client libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriCatalog {
    entries: BTreeMap<String, String>,
}

impl UriCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, uri: impl Into<String>) -> Self {
        self.insert(key, uri);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, uri: impl Into<String>) {
        self.entries.insert(key.into(), uri.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, String>> for UriCatalog {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UriCatalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}
