use crate::element::{Element, Node};
use crate::error::{XmlError, XmlErrorExt};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::debug;

const INDENT_WIDTH: usize = 2;

/// A document with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    pub const fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }

    /// Parses markup into a tree. Whitespace-only text between elements is dropped
    /// and remaining text is trimmed.
    ///
    /// # Errors
    /// Returns [`XmlError::Parse`] for malformed markup, mismatched end tags,
    /// unclosed elements, or a document without (or with more than one) root.
    pub fn parse(text: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                parse_error(e, format!("at byte {}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => stack.push(open(&start)?),
                Event::Empty(start) => close(&mut stack, &mut root, open(&start)?)?,
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| parse_error("unexpected end tag", "closing element"))?;
                    close(&mut stack, &mut root, element)?;
                },
                Event::Text(t) => {
                    let text = t.unescape().map_err(|e| parse_error(e, "text content"))?;
                    push_text(&mut stack, &text);
                },
                Event::CData(c) => push_text(&mut stack, &String::from_utf8_lossy(&c)),
                Event::Eof => break,
                _ => {},
            }
        }

        if let Some(open) = stack.last() {
            return Err(parse_error(format!("unclosed element <{}>", open.name()), "end of input"));
        }

        root.map(Self::new).ok_or_else(|| parse_error("document has no root element", "end of input"))
    }

    /// Reads and parses a document from disk.
    ///
    /// # Errors
    /// Returns [`XmlError::Io`] if the file cannot be read, or [`XmlError::Parse`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self, XmlError> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        Self::parse(&text).context(format!("Failed to parse {}", path.display()))
    }

    /// Serializes with an XML declaration and two-space indentation.
    ///
    /// # Errors
    /// Returns [`XmlError::Write`] if an event cannot be serialized.
    pub fn to_pretty_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| write_error(e, "declaration"))?;
        write_element(&mut writer, &self.root)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(|e| write_error(e, "utf-8 output"))
    }

    /// Writes the pretty-printed document as UTF-8, replacing any existing file.
    ///
    /// # Errors
    /// Returns [`XmlError::Write`] or [`XmlError::Io`].
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), XmlError> {
        let path = path.as_ref();
        let text = self.to_pretty_string()?;
        fs::write(path, text).context(format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), "Document written");
        Ok(())
    }
}

fn open(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| parse_error(e, "element name"))?
        .to_owned();
    let mut element = Element::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| parse_error(e, format!("attribute of <{}>", element.name())))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| parse_error(e, "attribute name"))?
            .to_owned();
        let value = attr.unescape_value().map_err(|e| parse_error(e, "attribute value"))?;
        element.set_attribute(key, value.into_owned());
    }

    Ok(element)
}

fn close(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(parse_error(
            format!("second root element <{}>", element.name()),
            "document root",
        ));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }
    if let Some(parent) = stack.last_mut() {
        parent.push_text(trimmed);
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name());
    for (key, value) in element.attributes() {
        start.push_attribute((key, value));
    }

    if element.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(|e| write_error(e, element.name()));
    }

    writer.write_event(Event::Start(start)).map_err(|e| write_error(e, element.name()))?;
    for child in element.children() {
        match child {
            Node::Element(e) => write_element(writer, e)?,
            Node::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(|e| write_error(e, element.name()))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name())))
        .map_err(|e| write_error(e, element.name()))
}

fn parse_error(err: impl Display, context: impl Into<Cow<'static, str>>) -> XmlError {
    XmlError::Parse { message: err.to_string().into(), context: Some(context.into()) }
}

fn write_error(err: impl Display, context: &str) -> XmlError {
    XmlError::Write { message: err.to_string().into(), context: Some(context.to_owned().into()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_root_is_compact() {
        let doc = Document::new(Element::new("server"));
        let text = doc.to_pretty_string().unwrap();
        assert_eq!(text, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<server/>\n");
    }

    #[test]
    fn test_nested_elements_use_two_space_indent() {
        let mut root = Element::new("server");
        root.push(Element::new("featureManager")).push(Element::new("feature")).push_text("jdbc-4.1");
        let text = Document::new(root).to_pretty_string().unwrap();

        assert!(text.contains("\n  <featureManager>\n"), "{text}");
        assert!(text.contains("\n    <feature>jdbc-4.1</feature>\n"), "{text}");
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let root = Element::new("server").with_attribute("v", "a<b&\"c\"");
        let text = Document::new(root.clone()).to_pretty_string().unwrap();
        assert!(!text.contains("a<b"));

        let parsed = Document::parse(&text).unwrap();
        assert_eq!(parsed.root(), &root);
    }

    #[test]
    fn test_parse_rejects_unbalanced_markup() {
        assert!(matches!(Document::parse("<server><a></server>"), Err(XmlError::Parse { .. })));
        assert!(matches!(Document::parse("<server>"), Err(XmlError::Parse { .. })));
        assert!(matches!(Document::parse(""), Err(XmlError::Parse { .. })));
        assert!(matches!(Document::parse("<a/><b/>"), Err(XmlError::Parse { .. })));
    }

    #[test]
    fn test_parse_keeps_text_and_drops_formatting() {
        let doc = Document::parse(
            "<?xml version=\"1.0\"?>\n<server>\n  <feature> servlet-3.1 </feature>\n  <!-- note -->\n</server>",
        )
        .unwrap();

        assert_eq!(doc.root().elements().count(), 1);
        assert_eq!(doc.root().find("feature").map(Element::text).as_deref(), Some("servlet-3.1"));
        assert!(doc.root().children().iter().all(|n| matches!(n, Node::Element(_))));
    }
}
