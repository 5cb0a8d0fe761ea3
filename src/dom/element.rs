use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Static description of one DOM element, used to build in-memory documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "div", "button", "input")
    pub tag_name: String,

    /// Element attributes (e.g., id, class, href, etc.)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Own text of the element, as `textContent` would report it before
    /// children are appended
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Rendered text when it differs from the DOM text (hidden descendants)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_text: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,

    /// Whether the element is displayed
    #[serde(default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: HashMap::new(),
            text_content: None,
            visible_text: None,
            children: Vec::new(),
            is_visible: true,
        }
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set rendered text distinct from the DOM text
    pub fn with_visible_text(mut self, text: impl Into<String>) -> Self {
        self.visible_text = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id")
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    /// Frame elements open a nested document
    pub fn is_frame(&self) -> bool {
        self.is_tag("iframe") || self.is_tag("frame")
    }

    /// Full DOM text: own text followed by every descendant's text
    pub fn full_text(&self) -> String {
        let mut text = self.text_content.clone().unwrap_or_default();
        for child in &self.children {
            text.push_str(&child.full_text());
        }
        text
    }

    /// Rendered text: nothing when hidden, otherwise the visible override or
    /// own text followed by visible descendants' text
    pub fn rendered_text(&self) -> String {
        if !self.is_visible {
            return String::new();
        }
        if let Some(visible) = &self.visible_text {
            return visible.clone();
        }
        let mut text = self.text_content.clone().unwrap_or_default();
        for child in &self.children {
            text.push_str(&child.rendered_text());
        }
        text.trim().to_string()
    }
}
