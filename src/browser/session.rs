use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            container::Document,
            driver::ChromeDriver,
            error::{LocatorError, Result},
            locator::LocatorConfig};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, rc::Rc, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// Retry policy handed to every document created from this session
    config: LocatorConfig,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // default is 30 seconds
        launch_opts.idle_browser_timeout = Duration::from_secs(60 * 60);

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }
        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }
        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| LocatorError::LaunchFailed(e.to_string()))?;

        browser.new_tab().map_err(|e| LocatorError::LaunchFailed(format!("Failed to create tab: {}", e)))?;
        log::debug!("launched browser (headless: {})", options.headless);

        Ok(Self { browser, config: LocatorConfig::default() })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| LocatorError::ConnectionFailed(e.to_string()))?;

        Ok(Self { browser, config: LocatorConfig::default() })
    }

    /// Launch a browser with default options
    pub fn new() -> Result<Self> {
        Self::launch(LaunchOptions::default())
    }

    /// Builder method: set the retry policy for documents of this session
    pub fn with_config(mut self, config: LocatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Create a new tab
    pub fn new_tab(&mut self) -> Result<Arc<Tab>> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| LocatorError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;
        Ok(tab)
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| LocatorError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        for check in ["document.visibilityState === 'visible' && document.hasFocus()", "document.visibilityState === 'visible'"] {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => {
                        log::debug!("Failed to check tab status: {}", e);
                    }
                }
            }
        }

        // a single background tab is still the only candidate
        match tabs.as_slice() {
            [only] => Ok(only.clone()),
            _ => Err(LocatorError::TabOperationFailed("No active tab found".to_string())),
        }
    }

    /// Close the active tab
    pub fn close_active_tab(&mut self) -> Result<()> {
        self.tab()?
            .close(true)
            .map_err(|e| LocatorError::TabOperationFailed(format!("Failed to close tab: {}", e)))?;

        Ok(())
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate the active tab and wait for the load to finish
    pub fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .map_err(|e| LocatorError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| LocatorError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Document of the active tab, searched through a fresh [`ChromeDriver`]
    pub fn document(&self) -> Result<Document<ChromeDriver>> {
        let driver = ChromeDriver::new(self.tab()?);
        Ok(Document::with_config(Rc::new(driver), self.config.clone()))
    }

    /// Close every tab; the browser process exits when the session is dropped
    pub fn close(&self) -> Result<()> {
        for tab in self.get_tabs()? {
            if let Err(e) = tab.close(false) {
                log::debug!("Failed to close tab: {}", e);
            }
        }
        Ok(())
    }
}
