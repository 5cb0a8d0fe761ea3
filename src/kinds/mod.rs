//! Element kinds
//!
//! Every HTML element kind is one static [`ElementKind`] record: the tag names
//! it covers, its attribute table and the query strategy the compiler uses for
//! it. Elements are a single generic type parameterized by such a record.

mod table;

pub use table::*;

use crate::driver::{Driver, DriverResult};
use serde::Serialize;

/// Value type of an attribute, used to coerce the raw string the driver returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    Float,
}

/// One row of an attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeSpec {
    /// Locator key (`http_equiv`, `class_name`)
    pub name: &'static str,
    /// DOM attribute name (`http-equiv`, `class`)
    pub wire: &'static str,
    pub ty: AttributeType,
    pub case_insensitive: bool,
}

impl AttributeSpec {
    pub const fn new(name: &'static str, wire: &'static str, ty: AttributeType) -> Self {
        Self { name, wire, ty, case_insensitive: false }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, name, AttributeType::String)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, name, AttributeType::Bool)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, name, AttributeType::Int)
    }

    pub const fn float(name: &'static str) -> Self {
        Self::new(name, name, AttributeType::Float)
    }

    /// Builder method: compare values case-insensitively
    pub const fn ci(mut self) -> Self {
        self.case_insensitive = true;
        self
    }
}

/// Compiler specialization selected by kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStrategy {
    Generic,
    /// `button` elements plus button-typed `input` elements
    Button,
    /// `th`/`td` children of a row
    Cell,
    /// `tr` children of a table or table section
    Row,
    /// `input` elements that accept free text
    TextField,
}

/// Static description of one element kind
#[derive(Debug)]
pub struct ElementKind {
    pub name: &'static str,
    /// Tags covered by this kind; empty for the generic kind
    pub tag_names: &'static [&'static str],
    /// `type` implied for input sub-kinds
    pub input_type: Option<&'static str>,
    pub attributes: &'static [AttributeSpec],
    pub strategy: QueryStrategy,
    /// Queries below an element of this kind run inside its document
    pub frame: bool,
}

impl PartialEq for ElementKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl ElementKind {
    /// Most specific registered kind for a tag name
    pub fn for_tag(tag: &str) -> &'static ElementKind {
        let tag = tag.to_ascii_lowercase();
        KINDS
            .iter()
            .copied()
            .find(|kind| kind.input_type.is_none() && kind.strategy != QueryStrategy::TextField && kind.tag_names.contains(&tag.as_str()))
            .unwrap_or(&HTML_ELEMENT)
    }

    pub fn by_name(name: &str) -> Option<&'static ElementKind> {
        KINDS.iter().copied().find(|kind| kind.name == name)
    }

    pub fn is_generic(&self) -> bool {
        self.tag_names.is_empty()
    }

    /// Attribute table entry for a locator key, own table first, then global
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeSpec> {
        self.attributes
            .iter()
            .chain(GLOBAL_ATTRIBUTES.iter())
            .find(|spec| spec.name == name || spec.wire == name)
    }

    /// Whether the kind declares `name` as a real attribute
    pub fn declares(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Whether values of the attribute compare case-insensitively
    pub fn is_case_insensitive(&self, name: &str) -> bool {
        CASE_INSENSITIVE_ATTRIBUTES.contains(&name)
            || self.attribute(name).is_some_and(|spec| spec.case_insensitive)
    }

    /// Selector entries every element of this kind carries
    pub fn default_selector(&self) -> crate::selector::Selector {
        let mut selector = crate::selector::Selector::new();
        if let [tag] = self.tag_names {
            selector.insert(crate::selector::keys::TAG_NAME, *tag);
        }
        if let Some(input_type) = self.input_type {
            selector.insert(crate::selector::keys::TYPE, input_type);
        }
        selector
    }
}

/// Attribute value coerced according to its table entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

/// Locator key to DOM attribute name: table entries map explicitly, wildcard
/// `data_`/`aria_` keys are hyphenated, anything else is used verbatim
pub fn wire_name(kind: &ElementKind, key: &str) -> String {
    if let Some(spec) = kind.attribute(key) {
        return spec.wire.to_string();
    }
    if key.starts_with("data_") || key.starts_with("aria_") {
        return key.replace('_', "-");
    }
    key.to_string()
}

/// Read one attribute through the driver and coerce it.
///
/// Booleans reflect presence; numbers that fail to parse read as absent.
pub fn read_attribute<D: Driver>(
    driver: &D,
    handle: &D::Handle,
    spec: &AttributeSpec,
) -> DriverResult<Option<AttributeValue>> {
    let raw = driver.get_attribute(handle, spec.wire)?;
    Ok(match spec.ty {
        AttributeType::Bool => Some(AttributeValue::Bool(raw.is_some())),
        AttributeType::String => raw.map(AttributeValue::String),
        AttributeType::Int => raw.and_then(|v| v.trim().parse().ok()).map(AttributeValue::Int),
        AttributeType::Float => raw.and_then(|v| v.trim().parse().ok()).map(AttributeValue::Float),
    })
}
