//! Documentation summary model
//!
//! These structures are the JSON shape returned by the convert endpoint.
//! They are plain projections of the schema: built once per request and
//! serialized as-is.

use serde::{Deserialize, Serialize};

/// Result of extracting documentation from one schema document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Documented simple types, in document order
    pub simple_types: Vec<SimpleTypeSummary>,

    /// Documented complex types, in document order
    pub complex_types: Vec<ComplexTypeSummary>,
}

impl ExtractionResult {
    /// True when nothing in the schema carried documentation
    pub fn is_empty(&self) -> bool {
        self.simple_types.is_empty() && self.complex_types.is_empty()
    }
}

/// One `<xs:simpleType>` declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTypeSummary {
    /// Value of the `name` attribute; anonymous types may still be listed
    /// when an enumeration is documented
    pub name: Option<String>,

    /// Text of `annotation/documentation`
    pub description: Option<String>,

    /// Documented enumeration facets
    pub enumerations: Vec<EnumerationEntry>,
}

impl SimpleTypeSummary {
    /// A simple type is listed when it is named and described, or when any
    /// of its enumerations is described
    pub fn is_documented(&self) -> bool {
        (!is_blank(self.name.as_deref()) && !is_blank(self.description.as_deref()))
            || !self.enumerations.is_empty()
    }
}

/// One `<xs:enumeration>` facet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnumerationEntry {
    /// Value of the `value` attribute
    pub value: Option<String>,

    /// Text of `annotation/documentation`
    pub description: Option<String>,
}

/// One `<xs:complexType>` declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplexTypeSummary {
    /// Value of the `name` attribute
    pub name: String,

    /// Text of `annotation/documentation`
    pub description: Option<String>,

    /// Documented attribute declarations anywhere inside the type
    pub attributes: Vec<AttributeEntry>,

    /// Documented element declarations anywhere inside the type
    pub nested_elements: Vec<NestedElementEntry>,
}

impl ComplexTypeSummary {
    /// A complex type is listed when it is named and has at least one piece
    /// of documentation
    pub fn is_documented(&self) -> bool {
        !self.name.trim().is_empty()
            && (!is_blank(self.description.as_deref())
                || !self.attributes.is_empty()
                || !self.nested_elements.is_empty())
    }
}

/// A documented `<xs:attribute>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeEntry {
    /// Attribute name
    pub name: String,
    /// Documentation text
    pub description: String,
}

/// A documented `<xs:element>` inside a complex type's content model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NestedElementEntry {
    /// Element name
    pub name: String,
    /// Documentation text
    pub description: String,
}

/// Absent, empty, or whitespace-only
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}
