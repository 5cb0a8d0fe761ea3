//! element-locator command line
//!
//! `explain` shows how a selector compiles without touching a browser;
//! `locate` runs it against a page in Chrome.

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use element_locator::browser::{BrowserSession, ConnectionOptions, LaunchOptions};
use element_locator::container::Container;
use element_locator::kinds::ElementKind;
use element_locator::locator::{self, LocatorConfig};
use element_locator::{Element, Selector};
use serde_json::json;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "element-locator")]
#[command(version)]
#[command(about = "Compile and run declarative element selectors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the query a selector compiles to
    Explain {
        /// Selector as a JSON object, e.g. '{"tag_name": "div", "class": "user"}'
        selector: String,

        /// Element kind (html_element, button, text_field, row, cell, ...)
        #[arg(long, short = 'k', default_value = "html_element")]
        kind: String,
    },

    /// Open a page and print what a selector matches
    Locate {
        /// Page to open
        url: String,

        /// Selector as a JSON object
        selector: String,

        /// Element kind (html_element, button, text_field, row, cell, ...)
        #[arg(long, short = 'k', default_value = "html_element")]
        kind: String,

        /// Print every match instead of the first
        #[arg(long, short = 'a')]
        all: bool,

        /// Launch browser in headed mode (default: headless)
        #[arg(long, short = 'H')]
        headed: bool,

        /// Path to custom browser executable
        #[arg(long, value_name = "PATH")]
        executable_path: Option<String>,

        /// WebSocket endpoint URL for remote browser connection
        #[arg(long, value_name = "URL")]
        ws_endpoint: Option<String>,

        /// Retries after a stale element reference
        #[arg(long, default_value = "2")]
        max_retries: usize,

        /// Pause between retries in milliseconds
        #[arg(long, default_value = "500")]
        retry_backoff_ms: u64,
    },
}

fn kind_named(name: &str) -> anyhow::Result<&'static ElementKind> {
    ElementKind::by_name(name).ok_or_else(|| anyhow!("unknown element kind: {}", name))
}

fn describe<D: element_locator::driver::Driver>(element: &Element<D>) -> anyhow::Result<serde_json::Value> {
    Ok(json!({
        "kind": element.kind().name,
        "tag_name": element.tag_name()?,
        "id": element.attribute_value("id")?,
        "text": element.text()?,
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Explain { selector, kind } => {
            let kind = kind_named(&kind)?;
            let selector = Selector::from_json(&selector)?;
            let query = locator::explain(kind, &selector)?;
            println!("{}", serde_json::to_string_pretty(&query)?);
        }
        Command::Locate {
            url,
            selector,
            kind,
            all,
            headed,
            executable_path,
            ws_endpoint,
            max_retries,
            retry_backoff_ms,
        } => {
            let kind = kind_named(&kind)?;
            let selector = Selector::from_json(&selector)?;
            let config = LocatorConfig::new()
                .max_retries(max_retries)
                .retry_backoff(Duration::from_millis(retry_backoff_ms));

            let session = match ws_endpoint {
                Some(ws_url) => BrowserSession::connect(ConnectionOptions::new(ws_url))?,
                None => {
                    let mut options = LaunchOptions::new().headless(!headed);
                    if let Some(path) = executable_path {
                        options = options.chrome_path(path);
                    }
                    BrowserSession::launch(options)?
                }
            }
            .with_config(config);

            session.navigate(&url).with_context(|| format!("opening {}", url))?;
            let document = session.document()?;

            if all {
                let matches = document.kind_elements(kind, selector);
                let described = matches
                    .iter()?
                    .map(|element| describe(&element))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&described)?);
            } else {
                let element = document.kind_element(kind, selector);
                if element.exists()? {
                    println!("{}", serde_json::to_string_pretty(&describe(&element)?)?);
                } else {
                    eprintln!("no element matches");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
