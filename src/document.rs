//! Tableau workbook document handling
//!
//! Parses a .twb file into an owned element tree. Tableau nests the elements
//! the extractor cares about at different depths depending on product
//! version, so the tree exposes depth-first descendant search rather than
//! direct-child lookups; every extraction query is "first matching
//! descendant regardless of depth".

use crate::error::{Error, ParseError, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// XML element in the workbook tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element tag name
    pub name: String,
    /// Attributes, in document order
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Get the text content
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get a direct child by tag name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.name() == name)
    }

    /// Iterate over all descendants in document (pre-)order, self excluded
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&Element> = self.children.iter().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Find the first descendant with the given tag name, at any depth
    pub fn find_descendant(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name() == name)
    }

    /// Iterate over all descendants with the given tag name, in document order
    pub fn descendants_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.name() == name)
    }

    fn add_child(&mut self, child: Element) {
        self.children.push(child);
    }

    fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}

/// Depth-first pre-order iterator over an element's descendants
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<&'a Element> {
        let next = self.stack.pop()?;
        // Push children reversed so the first child is visited next
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Parsed Tableau workbook document
#[derive(Debug)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parse a workbook document from a string.
    ///
    /// Malformed XML (including an input with no root element) yields
    /// [`Error::Parse`], distinguishable from a well-formed document that
    /// happens to contain no worksheets.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut root: Option<Element> = None;
        let mut element_stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let element = Self::parse_element(&e)?;
                    element_stack.push(element);
                }
                Ok(Event::End(_)) => {
                    if let Some(current) = element_stack.pop() {
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            // This is the root element
                            root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        // Empty root element
                        root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::new(format!("failed to unescape text: {}", e)))?
                            .to_string();
                        if !text.trim().is_empty() {
                            current.set_text(text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Parse(
                        ParseError::new(format!("malformed XML: {}", e))
                            .with_position(reader.buffer_position()),
                    ))
                }
                _ => {} // Ignore other events (comments, processing instructions, etc.)
            }
        }

        if !element_stack.is_empty() {
            return Err(Error::Parse(
                ParseError::new("unexpected end of document")
                    .with_position(reader.buffer_position()),
            ));
        }

        match root {
            Some(root) => Ok(Self { root }),
            None => Err(Error::Parse(ParseError::new("document has no root element"))),
        }
    }

    /// Read and parse a workbook file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let xml = fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Parse element name and attributes from a start/empty event
    fn parse_element(start: &BytesStart) -> Result<Element> {
        let name_bytes = start.name();
        let name = std::str::from_utf8(name_bytes.as_ref())
            .map_err(|e| ParseError::new(format!("invalid element name: {}", e)))?
            .to_string();

        let mut element = Element::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| ParseError::new(format!("failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::new(format!("invalid attribute name: {}", e)))?
                .to_string();

            let attr_value = attr
                .unescape_value()
                .map_err(|e| {
                    ParseError::new(format!("failed to unescape attribute value: {}", e))
                })?
                .to_string();

            element.attributes.insert(attr_name, attr_value);
        }

        Ok(element)
    }
}
