/// Owned element tree built from a single XML part.
///
/// The comment parts are small and are queried from several directions
/// (paragraph scans, marker lookups, attribute sweeps), so they are parsed
/// once into a tree instead of re-streamed per query.
use crate::error::{CommentsError, Result};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;

/// A prefix-qualified XML name such as `w:comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    prefix: Option<String>,
    local: String,
}

impl QualifiedName {
    /// Split a raw `prefix:local` name.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) => Self {
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => Self {
                prefix: None,
                local: raw.to_string(),
            },
        }
    }

    /// The namespace prefix, if any.
    #[inline]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// The local part of the name.
    #[inline]
    pub fn local(&self) -> &str {
        &self.local
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An attribute with its qualified name and unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// Raw qualified name as written in the part
    pub name: String,
    /// Unescaped value
    pub value: String,
}

/// A child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: QualifiedName,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Parse an XML part into its root element.
    ///
    /// # Arguments
    ///
    /// * `xml` - The part bytes
    /// * `part` - Part name, used in error messages
    ///
    /// # Errors
    ///
    /// Returns [`CommentsError::Xml`] when the part is not well-formed: mismatched
    /// or unclosed tags, broken attributes, unknown entities or no root element.
    pub fn parse(xml: &[u8], part: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_reader(xml);

        let mut stack: Vec<XmlElement> = Vec::with_capacity(16);
        let mut root: Option<XmlElement> = None;
        let mut buf = Vec::with_capacity(1024);

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(XmlElement::from_start(&e, part)?);
                },
                Ok(Event::Empty(e)) => {
                    let element = XmlElement::from_start(&e, part)?;
                    attach(&mut stack, &mut root, element, part)?;
                },
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| CommentsError::xml(part, "unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element, part)?;
                },
                Ok(Event::Text(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                },
                Ok(Event::CData(e)) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&String::from_utf8_lossy(e.as_ref()));
                    }
                },
                Ok(Event::GeneralRef(e)) => {
                    let name = String::from_utf8_lossy(e.as_ref());
                    let resolved = resolve_reference(&name).ok_or_else(|| {
                        CommentsError::xml(part, format!("unknown entity reference &{name};"))
                    })?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(&resolved);
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(CommentsError::xml(
                        part,
                        format!("at byte {}: {}", reader.buffer_position(), e),
                    ));
                },
                _ => {},
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(CommentsError::xml(
                part,
                format!("unclosed element <{}>", open.name),
            ));
        }

        root.ok_or_else(|| CommentsError::xml(part, "no root element"))
    }

    fn from_start(e: &BytesStart<'_>, part: &str) -> Result<XmlElement> {
        let name = QualifiedName::parse(&String::from_utf8_lossy(e.name().as_ref()));

        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| CommentsError::xml(part, err))?;
            let raw = String::from_utf8_lossy(&attr.value);
            let value = unescape(&raw).map_err(|err| CommentsError::xml(part, err))?;
            attributes.push(XmlAttribute {
                name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value: value.into_owned(),
            });
        }

        Ok(XmlElement {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        if let Some(XmlNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// The element's qualified name.
    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// The element's local name.
    #[inline]
    pub fn local_name(&self) -> &str {
        self.name.local()
    }

    /// Check the element's local name, ignoring its prefix.
    #[inline]
    pub fn is(&self, local: &[u8]) -> bool {
        self.name.local().as_bytes() == local
    }

    /// All attributes in source order.
    #[inline]
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Value of the first attribute whose local name is exactly `local`.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| QualifiedName::parse(&a.name).local() == local)
            .map(|a| a.value.as_str())
    }

    /// Child nodes in document order.
    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Descendant elements with the given local name, in document order.
    pub fn descendants_named<'a>(&'a self, local: &'a [u8]) -> impl Iterator<Item = &'a XmlElement> {
        self.descendants().filter(move |e| e.is(local))
    }

    /// First descendant element with the given local name.
    pub fn find(&self, local: &[u8]) -> Option<&XmlElement> {
        self.descendants().find(|e| e.is(local))
    }

    /// Text placed directly inside this element.
    pub fn own_text(&self) -> Cow<'_, str> {
        let mut texts = self.children.iter().filter_map(|node| match node {
            XmlNode::Text(t) => Some(t.as_str()),
            XmlNode::Element(_) => None,
        });
        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(first), None) => Cow::Borrowed(first),
            (Some(first), Some(second)) => {
                let mut joined = String::from(first);
                joined.push_str(second);
                texts.for_each(|t| joined.push_str(t));
                Cow::Owned(joined)
            },
        }
    }

    /// Concatenated text of every descendant element named `local`.
    ///
    /// With `local = b"t"` this yields the visible text of a paragraph.
    pub fn text_of(&self, local: &[u8]) -> String {
        let mut result = String::new();
        for element in self.descendants_named(local) {
            result.push_str(&element.own_text());
        }
        result
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, XmlNode>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(XmlNode::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                },
                Some(XmlNode::Text(_)) => {},
                None => {
                    self.stack.pop();
                },
            }
        }
    }
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    part: &str,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
        Ok(())
    } else if root.is_none() {
        *root = Some(element);
        Ok(())
    } else {
        Err(CommentsError::xml(part, "multiple root elements"))
    }
}

/// Resolve a predefined entity (`amp`) or character reference (`#39`, `#x27`).
fn resolve_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(String::from)
}
