//! # xsd-docs
//!
//! Fetches XML Schema (XSD) documents and projects the declarations that
//! carry documentation into a flat JSON-ready summary.
//!
//! ## Features
//!
//! - Namespace-aware XML document tree
//! - Extraction of documented `simpleType` and `complexType` declarations,
//!   their enumeration facets, attributes and nested elements
//! - HTTP service exposing `POST /api/XmlToJson/convert`
//! - Size and depth limits on fetched documents
//!
//! ## Example
//!
//! ```rust
//! use xsd_docs::extract;
//!
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:simpleType name="Color">
//!     <xs:annotation><xs:documentation>A color code</xs:documentation></xs:annotation>
//!   </xs:simpleType>
//! </xs:schema>"#;
//!
//! let result = extract(xsd)?;
//! assert_eq!(result.simple_types[0].name.as_deref(), Some("Color"));
//! # Ok::<(), xsd_docs::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod locations;
pub mod namespaces;

// Resource loading
pub mod documents;
pub mod loaders;

// Extraction
pub mod extractor;
pub mod model;

// Service
#[cfg(feature = "cli")]
pub mod config;
pub mod server;

// Re-exports for convenience
pub use error::{Error, Result};
pub use extractor::extract;
pub use model::ExtractionResult;

/// XML Schema namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
