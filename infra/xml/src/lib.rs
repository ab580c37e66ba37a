//! # XML documents
//!
//! A small owned element tree for the server configuration document and the
//! binding-variables document. Parsing and serialization go through `quick-xml`.
//!
//! Output is always UTF-8 with an XML declaration, indented by two spaces, and
//! elements without children are written in the compact `<name/>` form.
//!
//! ```rust
//! use bindery_xml::{Document, Element};
//!
//! let mut doc = Document::new(Element::new("server"));
//! doc.root_mut().push(Element::new("variable").with_attribute("name", "a").with_attribute("value", "1"));
//!
//! let text = doc.to_pretty_string().unwrap();
//! assert!(text.contains("  <variable name=\"a\" value=\"1\"/>"));
//!
//! let parsed = Document::parse(&text).unwrap();
//! assert_eq!(parsed.root().find("variable").and_then(|v| v.attribute("value")), Some("1"));
//! ```

mod document;
mod element;
mod error;

pub use crate::document::Document;
pub use crate::element::{Element, Node};
pub use crate::error::{XmlError, XmlErrorExt};
