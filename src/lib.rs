//! # element-locator
//!
//! Declarative element locators for browser automation over the Chrome DevTools Protocol (CDP).
//!
//! ## Features
//!
//! - **Selectors**: ordered maps of locator keys (`tag_name`, `class`, `text`, `label`, `data_*`, ...)
//!   to literals, booleans or regular expressions
//! - **Structural compilation**: as much of a selector as possible becomes one XPath 1.0 query;
//!   the rest is checked per candidate
//! - **Lazy elements**: elements and collections locate on first use and re-locate when the page
//!   replaces their nodes
//! - **Typed element kinds**: buttons, text fields, rows, cells and friends, each with their own
//!   attribute table and query rules
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use element_locator::{BrowserSession, Container, LaunchOptions, Selector};
//!
//! # fn main() -> element_locator::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//!
//! let document = session.document()?;
//! let heading = document.element(Selector::new().with("tag_name", "h1"));
//! if heading.exists()? {
//!     println!("{}", heading.text()?);
//! }
//!
//! for link in document.links(Selector::new().with("visible", true)).iter()? {
//!     println!("{:?}", link.attribute_value("href")?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Explaining a Selector
//!
//! ```rust
//! use element_locator::kinds::HTML_ELEMENT;
//! use element_locator::{locator, Selector};
//!
//! let selector = Selector::new().with("tag_name", "div").with("class", "user");
//! let query = locator::explain(&HTML_ELEMENT, &selector).unwrap();
//! assert_eq!(query.value, ".//*[local-name()='div'][contains(concat(' ', @class, ' '), ' user ')]");
//! ```
//!
//! ## Module Overview
//!
//! - [`selector`]: selector maps, values and normalization
//! - [`locator`]: regex decomposition, query compilation, candidate matching and orchestration
//! - [`element`], [`collection`], [`container`]: lazily located elements and where they are searched
//! - [`kinds`]: the element kind registry and typed attributes
//! - [`driver`]: the driver capability, the Chrome binding and the scripted stub
//! - [`browser`]: Chrome session management and configuration
//! - [`dom`]: static element trees for the stub driver
//! - [`error`]: error types and result aliases

pub mod browser;
pub mod collection;
pub mod container;
pub mod deprecation;
pub mod dom;
pub mod driver;
pub mod element;
pub mod error;
pub mod kinds;
pub mod locator;
pub mod selector;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use collection::ElementCollection;
pub use container::{Container, Document};
pub use dom::ElementNode;
pub use driver::{ChromeDriver, Driver, DriverError, How, StubDriver};
pub use element::{Element, QueryScope};
pub use error::{ErrorCategory, LocatorError, Result};
pub use kinds::{AttributeValue, ElementKind};
pub use locator::{CompiledQuery, Locator, LocatorConfig, LocatorState};
pub use selector::{Adjacency, Pattern, Selector, SelectorValue};
