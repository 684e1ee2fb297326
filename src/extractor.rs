//! Documentation extraction
//!
//! Walks a parsed schema document and keeps only the `simpleType` and
//! `complexType` declarations that carry `xs:annotation/xs:documentation`
//! text, reshaping them into an [`ExtractionResult`].
//!
//! Declarations are found at any depth, not just as children of
//! `xs:schema`. Facets, attributes and elements are likewise collected from
//! every descendant of their enclosing type, so an anonymous inner type
//! contributes to each type that contains it.

use crate::documents::{Document, Element};
use crate::error::Result;
use crate::limits::Limits;
use crate::model::{
    is_blank, AttributeEntry, ComplexTypeSummary, EnumerationEntry, ExtractionResult,
    NestedElementEntry, SimpleTypeSummary,
};
use crate::XSD_NAMESPACE;

/// XSD element local names
mod xsd_elements {
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const ENUMERATION: &str = "enumeration";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ELEMENT: &str = "element";
    pub const ANNOTATION: &str = "annotation";
    pub const DOCUMENTATION: &str = "documentation";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const VALUE: &str = "value";
}

/// Parse `xml_text` and extract its documented declarations
pub fn extract(xml_text: &str) -> Result<ExtractionResult> {
    extract_with_limits(xml_text, &Limits::default())
}

/// Parse `xml_text` under the given limits and extract its documented
/// declarations
pub fn extract_with_limits(xml_text: &str, limits: &Limits) -> Result<ExtractionResult> {
    let doc = Document::parse(xml_text.as_bytes(), limits)?;
    Ok(extract_document(&doc))
}

/// Extract documented declarations from an already parsed document
pub fn extract_document(doc: &Document) -> ExtractionResult {
    let simple_types: Vec<_> = doc
        .descendants()
        .filter(|e| e.is(XSD_NAMESPACE, xsd_elements::SIMPLE_TYPE))
        .map(summarize_simple_type)
        .filter(SimpleTypeSummary::is_documented)
        .collect();

    let complex_types: Vec<_> = doc
        .descendants()
        .filter(|e| e.is(XSD_NAMESPACE, xsd_elements::COMPLEX_TYPE))
        .filter_map(summarize_complex_type)
        .filter(ComplexTypeSummary::is_documented)
        .collect();

    tracing::debug!(
        simple_types = simple_types.len(),
        complex_types = complex_types.len(),
        "extracted schema documentation"
    );

    ExtractionResult {
        simple_types,
        complex_types,
    }
}

fn summarize_simple_type(simple_type: &Element) -> SimpleTypeSummary {
    let enumerations = simple_type
        .descendants()
        .filter(|e| e.is(XSD_NAMESPACE, xsd_elements::ENUMERATION))
        .filter(|e| e.get_attribute(xsd_attrs::VALUE).is_some() || documentation(e).is_some())
        .map(|e| EnumerationEntry {
            value: e.get_attribute(xsd_attrs::VALUE).map(str::to_string),
            description: documentation(e),
        })
        // Value-only facets pass the first filter but are not listed
        .filter(|entry| !is_blank(entry.description.as_deref()))
        .collect();

    SimpleTypeSummary {
        name: simple_type.get_attribute(xsd_attrs::NAME).map(str::to_string),
        description: documentation(simple_type),
        enumerations,
    }
}

/// Returns `None` for a complex type without a `name` attribute, which is
/// never listed
fn summarize_complex_type(complex_type: &Element) -> Option<ComplexTypeSummary> {
    let name = complex_type.get_attribute(xsd_attrs::NAME)?.to_string();

    Some(ComplexTypeSummary {
        name,
        description: documentation(complex_type),
        attributes: documented_declarations(complex_type, xsd_elements::ATTRIBUTE, |name, description| {
            AttributeEntry { name, description }
        }),
        nested_elements: documented_declarations(complex_type, xsd_elements::ELEMENT, |name, description| {
            NestedElementEntry { name, description }
        }),
    })
}

/// Collect descendants named `xs:{local_name}` that have both a non-blank
/// name and non-blank documentation
fn documented_declarations<T>(
    parent: &Element,
    local_name: &str,
    build: impl Fn(String, String) -> T,
) -> Vec<T> {
    parent
        .descendants()
        .filter(|e| e.is(XSD_NAMESPACE, local_name))
        .filter_map(|e| {
            let name = e
                .get_attribute(xsd_attrs::NAME)
                .filter(|n| !n.trim().is_empty())?;
            let description = documentation(e).filter(|d| !d.trim().is_empty())?;
            Some(build(name.to_string(), description))
        })
        .collect()
}

/// Text of the element's `xs:annotation/xs:documentation` child, if present
fn documentation(element: &Element) -> Option<String> {
    element
        .find_child(XSD_NAMESPACE, xsd_elements::ANNOTATION)?
        .find_child(XSD_NAMESPACE, xsd_elements::DOCUMENTATION)
        .map(Element::text_content)
}
