//! XML document tree
//!
//! This module builds a namespace-resolved element tree from XML text.
//! Element names are resolved against the `xmlns` declarations in scope, so
//! `xs:simpleType` and `<simpleType xmlns="...XMLSchema">` both come out as
//! `{http://www.w3.org/2001/XMLSchema}simpleType`.

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::{is_valid_qname, NamespaceContext, QName};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// A child of an element: either a nested element or a run of text
#[derive(Debug, Clone)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Text or CDATA content
    Text(String),
}

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes (namespace declarations excluded)
    pub attributes: HashMap<QName, String>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// Namespace context in scope for this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: HashMap::new(),
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Check whether the element is `{namespace}local_name`
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.qname.matches(namespace, local_name)
    }

    /// Get an unqualified attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.get_attribute_qname(&QName::local(name))
    }

    /// Get an attribute value by qualified name
    pub fn get_attribute_qname(&self, qname: &QName) -> Option<&str> {
        self.attributes.get(qname).map(|s| s.as_str())
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Append a run of text
    pub fn add_text(&mut self, text: String) {
        self.children.push(Node::Text(text));
    }

    /// Iterate over the direct child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// Find the first direct child named `{namespace}local_name`
    pub fn find_child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.is(namespace, local_name))
    }

    /// Iterate over all descendant elements in document order, excluding
    /// the element itself
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Concatenated text of this element and all its descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(self, &mut text);
        text
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

/// Pre-order iterator over descendant elements
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(siblings) = self.stack.last_mut() {
            match siblings.next() {
                Some(Node::Element(e)) => {
                    self.stack.push(e.children.iter());
                    return Some(e);
                }
                Some(Node::Text(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

/// XML Document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes(), &Limits::default())
    }

    /// Parse an XML document from bytes
    ///
    /// The document must be well-formed: exactly one root element, every
    /// start tag closed, valid names, unique attributes after namespace
    /// resolution, and no XML declaration past the start of the input.
    pub fn parse(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_xml_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        reader.check_comments(true);

        let mut doc = Document::new();
        let root_namespaces = NamespaceContext::new();
        let mut element_stack: Vec<Element> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let position = reader.buffer_position();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let parent = element_stack
                        .last()
                        .map_or(&root_namespaces, |p| &p.namespaces);
                    let element = Self::parse_element(&e, parent, limits, position)?;
                    Self::check_single_root(&doc, &element_stack, position)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    let current = element_stack.pop().ok_or_else(|| {
                        syntax_error("unexpected closing tag", position)
                    })?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(current);
                    } else {
                        doc.root = Some(current);
                    }
                }
                Ok(Event::Empty(e)) => {
                    limits.check_xml_depth(element_stack.len() + 1)?;
                    let parent = element_stack
                        .last()
                        .map_or(&root_namespaces, |p| &p.namespaces);
                    let element = Self::parse_element(&e, parent, limits, position)?;
                    Self::check_single_root(&doc, &element_stack, position)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if contains(&e, b"]]>") {
                        return Err(syntax_error("']]>' is not allowed in text", position));
                    }
                    let text = e
                        .unescape()
                        .map_err(|e| syntax_error(format!("Failed to unescape text: {}", e), position))?
                        .into_owned();
                    // Whitespace between tags is not content
                    if !text.trim().is_empty() {
                        match element_stack.last_mut() {
                            Some(current) => current.add_text(text),
                            None => {
                                return Err(syntax_error(
                                    "text outside of the root element",
                                    position,
                                ))
                            }
                        }
                    }
                }
                Ok(Event::CData(e)) => {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| syntax_error(format!("Invalid CDATA section: {}", e), position))?
                        .to_string();
                    match element_stack.last_mut() {
                        Some(current) => current.add_text(text),
                        None => {
                            return Err(syntax_error("CDATA outside of the root element", position))
                        }
                    }
                }
                Ok(Event::Decl(_)) => {
                    if position != 0 && &xml[..position] != UTF8_BOM {
                        return Err(syntax_error(
                            "XML declaration is only allowed at the start of the document",
                            position,
                        ));
                    }
                }
                Ok(Event::PI(e)) => {
                    let target = e
                        .split(|b| b.is_ascii_whitespace())
                        .next()
                        .unwrap_or_default();
                    if target.eq_ignore_ascii_case(b"xml") {
                        return Err(syntax_error(
                            "processing instruction target 'xml' is reserved",
                            position,
                        ));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(syntax_error(
                        format!("Error parsing XML: {}", e),
                        reader.buffer_position(),
                    ))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
            buf.clear();
        }

        if let Some(open) = element_stack.last() {
            return Err(syntax_error(
                format!("unexpected end of document: unclosed element <{}>", open.local_name()),
                reader.buffer_position(),
            ));
        }
        if doc.root.is_none() {
            return Err(syntax_error("document has no root element", reader.buffer_position()));
        }

        tracing::trace!(bytes = xml.len(), "parsed XML document");
        Ok(doc)
    }

    fn check_single_root(doc: &Document, stack: &[Element], position: usize) -> Result<()> {
        if stack.is_empty() && doc.root.is_some() {
            Err(syntax_error("document has more than one root element", position))
        } else {
            Ok(())
        }
    }

    /// Parse element from BytesStart event, resolving its names against the
    /// parent's namespace context plus its own declarations
    fn parse_element(
        start: &BytesStart,
        parent: &NamespaceContext,
        limits: &Limits,
        position: usize,
    ) -> Result<Element> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| syntax_error(format!("Invalid element name: {}", e), position))?
            .to_string();
        if !is_valid_qname(&name) {
            return Err(syntax_error(format!("Invalid element name '{}'", name), position));
        }

        let mut namespaces = parent.clone();
        let mut raw_attributes = Vec::new();

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| syntax_error(format!("Failed to parse attribute: {}", e), position))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| syntax_error(format!("Invalid attribute name: {}", e), position))?
                .to_string();
            if !is_valid_qname(&attr_name) {
                return Err(syntax_error(
                    format!("Invalid attribute name '{}'", attr_name),
                    position,
                ));
            }
            if attr.value.contains(&b'<') {
                return Err(syntax_error(
                    format!("'<' is not allowed in the value of attribute '{}'", attr_name),
                    position,
                ));
            }

            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    syntax_error(format!("Failed to unescape attribute value: {}", e), position)
                })?
                .into_owned();

            // Handle namespace declarations
            if attr_name == "xmlns" {
                namespaces.set_default_namespace(attr_value);
            } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
                namespaces.add_prefix(prefix, attr_value);
            } else {
                raw_attributes.push((attr_name, attr_value));
            }
        }

        limits.check_attributes(raw_attributes.len())?;

        let qname = namespaces
            .resolve(&name)
            .map_err(|e| namespace_error(e, &name, position))?;
        let mut element = Element::new(qname);

        for (attr_name, attr_value) in raw_attributes {
            let attr_qname = namespaces
                .resolve_attribute(&attr_name)
                .map_err(|e| namespace_error(e, &attr_name, position))?;
            if element.attributes.insert(attr_qname, attr_value).is_some() {
                return Err(syntax_error(
                    format!("duplicate attribute '{}' after namespace resolution", attr_name),
                    position,
                ));
            }
        }
        element.namespaces = namespaces;

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Iterate over every element in document order, root included
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        self.root
            .iter()
            .flat_map(|root| std::iter::once(root).chain(root.descendants()))
    }
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn syntax_error(message: impl Into<String>, position: usize) -> Error {
    Error::Parse(ParseError::new(message).with_location(format!("position {}", position)))
}

fn namespace_error(err: Error, name: &str, position: usize) -> Error {
    match err {
        Error::Namespace(msg) => syntax_error(format!("{} in name '{}'", msg, name), position),
        other => other,
    }
}
