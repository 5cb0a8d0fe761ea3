//! One-time deprecation warnings

use std::sync::Once;

/// Deprecated usages the locator detects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deprecation {
    /// `link` used instead of `link_text`
    LinkLocator,
    /// A `text` regex matched visible text but would not match the full DOM text
    TextRegexVisibleOnly,
    /// A `text` regex matched the full DOM text only because of hidden nodes
    TextRegexHiddenText,
}

static LINK_LOCATOR: Once = Once::new();
static TEXT_REGEX_VISIBLE_ONLY: Once = Once::new();
static TEXT_REGEX_HIDDEN_TEXT: Once = Once::new();

impl Deprecation {
    pub fn id(&self) -> &'static str {
        match self {
            Deprecation::LinkLocator => "link_locator",
            Deprecation::TextRegexVisibleOnly => "text_regex_visible_only",
            Deprecation::TextRegexHiddenText => "text_regex_hidden_text",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Deprecation::LinkLocator => "`link` is deprecated, use `link_text` instead",
            Deprecation::TextRegexVisibleOnly => {
                "text regex matched visible text only; use `visible_text` to keep matching rendered text"
            }
            Deprecation::TextRegexHiddenText => {
                "text regex no longer matches hidden text; use `visible_text` or match the full text explicitly"
            }
        }
    }

    fn once(&self) -> &'static Once {
        match self {
            Deprecation::LinkLocator => &LINK_LOCATOR,
            Deprecation::TextRegexVisibleOnly => &TEXT_REGEX_VISIBLE_ONLY,
            Deprecation::TextRegexHiddenText => &TEXT_REGEX_HIDDEN_TEXT,
        }
    }

    /// Log the warning the first time this deprecation is hit in the process
    pub fn warn(&self) {
        self.once().call_once(|| {
            log::warn!("[DEPRECATED] {} ({})", self.message(), self.id());
        });
    }
}
