use thiserror::Error;

use crate::driver::DriverError;

/// Broad classes of locator failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed selector or contradictory request; never retried
    Caller,
    /// A handle went stale between two driver round trips
    Transient,
    /// Staleness persisted through every retry
    Resolution,
    /// The query scope (frame or container element) could not be established
    Context,
    /// Browser, session or driver failure
    Driver,
}

/// Errors that can occur while locating elements
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("expected one of {expected} for {key:?}, got {value}")]
    InvalidSelectorValue {
        key: String,
        value: String,
        expected: String,
    },

    #[error("can not combine native locators: {}", .0.join(", "))]
    ConflictingLocators(Vec<String>),

    #[error("unsupported selector combination: {0}")]
    UnsupportedCombination(String),

    #[error("can not use {key:?} locator to find a {tag} element")]
    DeprecatedLocatorMisuse { key: String, tag: String },

    #[error("can not locate a collection with an index")]
    IndexWithCollection,

    #[error("invalid regular expression: {0}")]
    InvalidPattern(String),

    #[error("invalid selector JSON: {0}")]
    InvalidSelectorJson(String),

    #[error("stale element reference while locating {0}")]
    StaleElement(String),

    #[error("unable to locate element from {0} due to changing page")]
    ResolutionFailure(String),

    #[error("unable to switch to frame: {0}")]
    UnknownFrame(String),

    #[error("unable to locate query scope: {0}")]
    UnknownContext(String),

    #[error("unable to locate element: {0}")]
    UnknownObject(String),

    #[error("driver error: {0}")]
    Driver(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),
}

impl LocatorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LocatorError::InvalidSelectorValue { .. }
            | LocatorError::ConflictingLocators(_)
            | LocatorError::UnsupportedCombination(_)
            | LocatorError::DeprecatedLocatorMisuse { .. }
            | LocatorError::IndexWithCollection
            | LocatorError::InvalidPattern(_)
            | LocatorError::InvalidSelectorJson(_) => ErrorCategory::Caller,
            LocatorError::StaleElement(_) => ErrorCategory::Transient,
            LocatorError::ResolutionFailure(_) => ErrorCategory::Resolution,
            LocatorError::UnknownFrame(_) | LocatorError::UnknownContext(_) => ErrorCategory::Context,
            LocatorError::UnknownObject(_)
            | LocatorError::Driver(_)
            | LocatorError::LaunchFailed(_)
            | LocatorError::ConnectionFailed(_)
            | LocatorError::NavigationFailed(_)
            | LocatorError::TabOperationFailed(_) => ErrorCategory::Driver,
        }
    }

    /// Check if the failure is worth another driver round trip
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Transient
    }

    pub fn is_caller_error(&self) -> bool {
        self.category() == ErrorCategory::Caller
    }

    pub fn is_context_error(&self) -> bool {
        self.category() == ErrorCategory::Context
    }
}

impl From<DriverError> for LocatorError {
    fn from(err: DriverError) -> Self {
        match err {
            DriverError::Stale => LocatorError::StaleElement("element handle".to_string()),
            DriverError::NoSuchFrame(reason) => LocatorError::UnknownFrame(reason),
            DriverError::Other(reason) => LocatorError::Driver(reason),
        }
    }
}

/// Result type alias for locator operations
pub type Result<T> = std::result::Result<T, LocatorError>;
