//! Chrome session management
//!
//! Launches or attaches to Chrome through `headless_chrome` and exposes the
//! active tab as a [`Document`](crate::container::Document) backed by
//! [`ChromeDriver`](crate::driver::ChromeDriver).

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
