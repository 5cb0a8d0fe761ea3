//! Driver capability consumed by the locator
//!
//! The locator never talks to a browser directly. Everything it needs from a
//! live DOM goes through the narrow [`Driver`] trait:
//! - [`ChromeDriver`]: binding over a `headless_chrome` tab
//! - [`StubDriver`]: scripted in-memory driver for tests

pub mod chrome;
pub mod stub;

pub use chrome::{ChromeDriver, ChromeHandle};
pub use stub::{StubDriver, StubHandle};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Native query languages understood by a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum How {
    Css,
    #[serde(rename = "xpath")]
    XPath,
    LinkText,
    PartialLinkText,
    TagName,
}

impl How {
    /// Selector key naming this finder
    pub fn key(&self) -> &'static str {
        match self {
            How::Css => "css",
            How::XPath => "xpath",
            How::LinkText => "link_text",
            How::PartialLinkText => "partial_link_text",
            How::TagName => "tag_name",
        }
    }

    /// Native finder for a selector key, if the driver has one
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "css" => Some(How::Css),
            "xpath" => Some(How::XPath),
            "link_text" => Some(How::LinkText),
            "partial_link_text" => Some(How::PartialLinkText),
            "tag_name" => Some(How::TagName),
            _ => None,
        }
    }
}

impl fmt::Display for How {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Failures reported by a driver binding
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// The handle no longer refers to a node attached to the document
    #[error("stale element reference")]
    Stale,

    #[error("no such frame: {0}")]
    NoSuchFrame(String),

    #[error("{0}")]
    Other(String),
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Capabilities the locator needs from a browser-automation binding.
///
/// All calls are synchronous round trips. `scope` restricts a query to the
/// subtree of that element; `None` queries the document currently in focus
/// (see [`Driver::switch_to_frame`]).
pub trait Driver {
    /// Opaque reference to one live DOM node
    type Handle: Clone + PartialEq + fmt::Debug;

    /// First match of a native query, `None` when nothing matches
    fn find_one(&self, how: How, value: &str, scope: Option<&Self::Handle>) -> DriverResult<Option<Self::Handle>>;

    /// Every match of a native query in document order
    fn find_all(&self, how: How, value: &str, scope: Option<&Self::Handle>) -> DriverResult<Vec<Self::Handle>>;

    fn get_attribute(&self, handle: &Self::Handle, name: &str) -> DriverResult<Option<String>>;

    /// Rendered (visible) text
    fn get_text(&self, handle: &Self::Handle) -> DriverResult<String>;

    /// Full DOM text including hidden descendants
    fn get_text_content(&self, handle: &Self::Handle) -> DriverResult<String>;

    /// Lower-case local name
    fn get_tag_name(&self, handle: &Self::Handle) -> DriverResult<String>;

    fn is_displayed(&self, handle: &Self::Handle) -> DriverResult<bool>;

    /// Move query focus into a frame element, or back to the top document with `None`
    fn switch_to_frame(&self, frame: Option<&Self::Handle>) -> DriverResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_how_keys_round_trip() {
        for how in [How::Css, How::XPath, How::LinkText, How::PartialLinkText, How::TagName] {
            assert_eq!(How::from_key(how.key()), Some(how));
        }
        assert_eq!(How::from_key("class"), None);
    }

    #[test]
    fn test_how_serialization() {
        assert_eq!(serde_json::to_string(&How::XPath).unwrap(), "\"xpath\"");
        assert_eq!(serde_json::to_string(&How::PartialLinkText).unwrap(), "\"partial_link_text\"");
    }
}
