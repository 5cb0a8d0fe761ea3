//! Declarative element selectors
//!
//! A [`Selector`] is an ordered mapping from locator key to [`SelectorValue`].
//! Keys fall into three groups:
//! - structural: `tag_name`, `css`, `xpath`, `index`, `adjacent`
//! - special: `text`, `visible_text`, `class`/`class_name`, `label`/`visible_label`, `visible`
//! - attributes: anything else, including `data_*` and `aria_*` wildcards

pub mod normalizer;
pub mod value;

pub use normalizer::SelectorNormalizer;
pub use value::{Adjacency, Pattern, SelectorValue};

use crate::error::{LocatorError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Locator key names
pub mod keys {
    pub const TAG_NAME: &str = "tag_name";
    pub const CSS: &str = "css";
    pub const XPATH: &str = "xpath";
    pub const LINK: &str = "link";
    pub const LINK_TEXT: &str = "link_text";
    pub const PARTIAL_LINK_TEXT: &str = "partial_link_text";
    pub const INDEX: &str = "index";
    pub const ADJACENT: &str = "adjacent";
    pub const TEXT: &str = "text";
    pub const CAPTION: &str = "caption";
    pub const VISIBLE_TEXT: &str = "visible_text";
    pub const CLASS: &str = "class";
    pub const CLASS_NAME: &str = "class_name";
    pub const LABEL: &str = "label";
    pub const VISIBLE_LABEL: &str = "visible_label";
    pub const LABEL_ELEMENT: &str = "label_element";
    pub const VISIBLE_LABEL_ELEMENT: &str = "visible_label_element";
    pub const VISIBLE: &str = "visible";
    pub const TYPE: &str = "type";
    pub const HREF: &str = "href";

    /// Keys handed to the driver verbatim; at most one may be present
    pub const NATIVE_LOCATORS: [&str; 5] = [CSS, XPATH, LINK, LINK_TEXT, PARTIAL_LINK_TEXT];
}

/// Ordered mapping from locator key to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector {
    entries: IndexMap<String, SelectorValue>,
}

impl Selector {
    /// Create an empty selector (matches any element)
    pub fn new() -> Self {
        Self { entries: IndexMap::new() }
    }

    /// Builder method: add an entry
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SelectorValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Parse a JSON object into a selector
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| LocatorError::InvalidSelectorJson(e.to_string()))
    }

    /// Insert or replace an entry, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SelectorValue>) -> Option<SelectorValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&SelectorValue> {
        self.entries.get(key)
    }

    /// Remove an entry, preserving the order of the others
    pub fn remove(&mut self, key: &str) -> Option<SelectorValue> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SelectorValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of `self` overridden by entries of `other`
    pub fn merged(&self, other: &Selector) -> Selector {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.insert(key, value.clone());
        }
        merged
    }

    /// Copy of this selector with `index` set
    pub fn with_index(&self, index: i64) -> Selector {
        let mut selector = self.clone();
        selector.insert(keys::INDEX, index);
        selector
    }

    pub fn index(&self) -> Option<i64> {
        self.get(keys::INDEX).and_then(SelectorValue::as_int)
    }

    /// Literal tag name, if the selector pins one
    pub fn tag_name(&self) -> Option<&str> {
        self.get(keys::TAG_NAME).and_then(SelectorValue::as_str)
    }

    pub fn adjacency(&self) -> Option<Adjacency> {
        match self.get(keys::ADJACENT) {
            Some(SelectorValue::Adjacent(adjacency)) => Some(*adjacency),
            Some(SelectorValue::Str(name)) => Adjacency::parse(name),
            _ => None,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl<K: Into<String>, V: Into<SelectorValue>> FromIterator<(K, V)> for Selector {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut selector = Selector::new();
        for (key, value) in iter {
            selector.insert(key, value);
        }
        selector
    }
}
