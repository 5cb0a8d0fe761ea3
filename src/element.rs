//! Lazily located elements
//!
//! An [`Element`] is a description first and a DOM node second: it keeps the
//! selector and the scope it was created under, and asks the [`Locator`] for a
//! handle only when something needs one. The handle is cached; when the page
//! replaces the node, the element re-locates itself once before giving up.

use crate::collection::ElementCollection;
use crate::container::Container;
use crate::driver::{Driver, DriverError, DriverResult};
use crate::error::{LocatorError, Result};
use crate::kinds::{read_attribute, wire_name, AttributeValue, ElementKind, HTML_ELEMENT};
use crate::locator::{Locator, LocatorConfig, LocatorState, QueryContext};
use crate::selector::{keys, Selector, SelectorNormalizer};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Where an element's selector is resolved
pub enum QueryScope<D: Driver> {
    /// The top-level document
    Document,
    /// Descendants (or relatives) of another element, or the document of a frame
    Element(Box<Element<D>>),
}

impl<D: Driver> Clone for QueryScope<D> {
    fn clone(&self) -> Self {
        match self {
            QueryScope::Document => QueryScope::Document,
            QueryScope::Element(parent) => QueryScope::Element(parent.clone()),
        }
    }
}

impl<D: Driver> fmt::Debug for QueryScope<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryScope::Document => f.write_str("Document"),
            QueryScope::Element(parent) => write!(f, "Element({})", parent.selector),
        }
    }
}

impl<D: Driver> QueryScope<D> {
    /// Move driver focus to the document this scope lives in
    pub(crate) fn focus(&self, driver: &D) -> Result<()> {
        match self {
            QueryScope::Document => Ok(driver.switch_to_frame(None)?),
            QueryScope::Element(parent) if parent.kind.frame => parent.enter_frame(),
            QueryScope::Element(parent) => parent.scope.focus(driver),
        }
    }

    /// Establish the context a child selector runs under.
    ///
    /// Below an unlocated parent whose query is purely structural, the child
    /// is folded into one XPath anchored at the parent's query instead of
    /// locating the parent first.
    pub(crate) fn context(
        &self,
        driver: &D,
        child: &Selector,
        child_kind: &'static ElementKind,
    ) -> Result<QueryContext<D::Handle>> {
        let parent = match self {
            QueryScope::Document => {
                driver.switch_to_frame(None)?;
                return Ok(QueryContext::document());
            }
            QueryScope::Element(parent) if parent.kind.frame => {
                parent.enter_frame()?;
                return Ok(QueryContext::document());
            }
            QueryScope::Element(parent) => parent,
        };

        if parent.cached().is_none() && is_mergeable(child) {
            if let Some(context) = parent.merged_context()? {
                return Ok(context);
            }
        }

        let Some(handle) = parent.handle()? else {
            return Err(LocatorError::UnknownContext(parent.selector.to_string()));
        };
        let tag = match parent.selector.tag_name() {
            Some(tag) => Some(tag.to_string()),
            None if child_kind.strategy == crate::kinds::QueryStrategy::Row => Some(driver.get_tag_name(&handle)?),
            None => None,
        };
        Ok(QueryContext::element(handle, tag))
    }
}

/// Children anchored at a parent XPath can not use native finders or axes
fn is_mergeable(child: &Selector) -> bool {
    !child
        .keys()
        .any(|key| keys::NATIVE_LOCATORS.contains(&key) || key == keys::ADJACENT)
}

/// A DOM element located on demand
pub struct Element<D: Driver> {
    driver: Rc<D>,
    config: LocatorConfig,
    scope: QueryScope<D>,
    selector: Selector,
    /// Kind the element is exposed as
    kind: &'static ElementKind,
    /// Kind the selector is compiled for
    query_kind: &'static ElementKind,
    handle: RefCell<Option<D::Handle>>,
    state: Cell<LocatorState>,
}

impl<D: Driver> Clone for Element<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Rc::clone(&self.driver),
            config: self.config.clone(),
            scope: self.scope.clone(),
            selector: self.selector.clone(),
            kind: self.kind,
            query_kind: self.query_kind,
            handle: RefCell::new(self.handle.borrow().clone()),
            state: Cell::new(self.state.get()),
        }
    }
}

impl<D: Driver> fmt::Debug for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("kind", &self.kind.name)
            .field("selector", &self.selector.to_string())
            .field("scope", &self.scope)
            .field("state", &self.state.get())
            .finish()
    }
}

impl<D: Driver> Element<D> {
    /// Describe an element; nothing is located until it is needed.
    ///
    /// Generic selectors pinning a literal tag expose the kind of that tag.
    pub fn new(
        driver: Rc<D>,
        config: LocatorConfig,
        scope: QueryScope<D>,
        query_kind: &'static ElementKind,
        selector: Selector,
    ) -> Self {
        let kind = match selector.tag_name() {
            Some(tag) if query_kind.is_generic() => ElementKind::for_tag(tag),
            _ => query_kind,
        };
        Self {
            driver,
            config,
            scope,
            selector,
            kind,
            query_kind,
            handle: RefCell::new(None),
            state: Cell::new(LocatorState::NotLocated),
        }
    }

    /// An element whose handle is already known
    pub(crate) fn located(mut self, kind: &'static ElementKind, handle: D::Handle) -> Self {
        self.kind = kind;
        self.handle = RefCell::new(Some(handle));
        self.state = Cell::new(LocatorState::Located);
        self
    }

    pub fn kind(&self) -> &'static ElementKind {
        self.kind
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn scope(&self) -> &QueryScope<D> {
        &self.scope
    }

    pub fn state(&self) -> LocatorState {
        self.state.get()
    }

    fn cached(&self) -> Option<D::Handle> {
        self.handle.borrow().clone()
    }

    /// Forget the cached handle; the next access locates again
    pub fn reset(&self) {
        self.handle.replace(None);
        self.state.set(LocatorState::NotLocated);
    }

    fn mark_stale(&self) {
        self.handle.replace(None);
        self.state.set(LocatorState::Stale);
    }

    /// Cached handle, or the result of locating now
    pub fn handle(&self) -> Result<Option<D::Handle>> {
        match self.cached() {
            Some(handle) => Ok(Some(handle)),
            None => self.locate_handle(),
        }
    }

    /// Handle of the element, failing with `UnknownObject` when nothing matches
    pub fn locate(&self) -> Result<D::Handle> {
        self.handle()?
            .ok_or_else(|| LocatorError::UnknownObject(self.selector.to_string()))
    }

    fn locate_handle(&self) -> Result<Option<D::Handle>> {
        let context = self.scope.context(&self.driver, &self.selector, self.query_kind)?;
        self.state.set(LocatorState::Locating);
        let locator = Locator::new(&*self.driver, self.query_kind, &self.config);
        match locator.locate(&self.selector, &context) {
            Ok(Some(handle)) => {
                self.handle.replace(Some(handle.clone()));
                self.state.set(LocatorState::Located);
                Ok(Some(handle))
            }
            Ok(None) => {
                self.state.set(LocatorState::NotFound);
                Ok(None)
            }
            Err(err) => {
                self.state.set(match err {
                    LocatorError::ResolutionFailure(_) => LocatorState::Stale,
                    _ => LocatorState::NotLocated,
                });
                Err(err)
            }
        }
    }

    /// Whether the element is in the document.
    ///
    /// A missing element, or a missing non-frame container, is `false`.
    /// Malformed selectors and vanished frames still fail.
    pub fn exists(&self) -> Result<bool> {
        if let Some(handle) = self.cached() {
            self.scope.focus(&self.driver)?;
            match self.driver.get_tag_name(&handle) {
                Ok(_) => return Ok(true),
                Err(DriverError::Stale) => self.mark_stale(),
                Err(err) => return Err(err.into()),
            }
        }
        match self.locate_handle() {
            Ok(found) => Ok(found.is_some()),
            Err(LocatorError::UnknownContext(reason)) => {
                log::debug!("container of {} is gone: {}", self.selector, reason);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Run a driver call against the handle, re-locating once if it went stale
    fn with_handle<T>(&self, call: impl Fn(&D, &D::Handle) -> DriverResult<T>) -> Result<T> {
        let driver: &D = &self.driver;
        let handle = self.locate()?;
        self.scope.focus(driver)?;
        match call(driver, &handle) {
            Err(DriverError::Stale) => {
                log::debug!("cached handle for {} is stale, locating again", self.selector);
                self.mark_stale();
                let handle = self.locate()?;
                Ok(call(driver, &handle)?)
            }
            result => Ok(result?),
        }
    }

    /// Rendered text
    pub fn text(&self) -> Result<String> {
        self.with_handle(|driver, handle| driver.get_text(handle))
    }

    pub fn tag_name(&self) -> Result<String> {
        self.with_handle(|driver, handle| driver.get_tag_name(handle))
    }

    /// Raw attribute value; locator-style names (`data_id`, `class_name`) are accepted
    pub fn attribute_value(&self, name: &str) -> Result<Option<String>> {
        let wire = wire_name(self.kind, name);
        self.with_handle(|driver, handle| driver.get_attribute(handle, &wire))
    }

    /// Attribute coerced by the kind's attribute table; undeclared attributes read as strings
    pub fn attribute(&self, name: &str) -> Result<Option<AttributeValue>> {
        match self.kind.attribute(name) {
            Some(spec) => self.with_handle(|driver, handle| read_attribute(driver, handle, spec)),
            None => Ok(self.attribute_value(name)?.map(AttributeValue::String)),
        }
    }

    pub fn is_visible(&self) -> Result<bool> {
        self.with_handle(|driver, handle| driver.is_displayed(handle))
    }

    /// Exists and is displayed; a node vanishing mid-check counts as absent
    pub fn is_present(&self) -> Result<bool> {
        if !self.exists()? {
            return Ok(false);
        }
        match self.is_visible() {
            Ok(visible) => Ok(visible),
            Err(LocatorError::UnknownObject(_) | LocatorError::StaleElement(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Whether both elements resolve to the same DOM node; missing elements are never equal
    pub fn eq_element(&self, other: &Element<D>) -> Result<bool> {
        let (Some(mine), Some(theirs)) = (self.handle()?, other.handle()?) else {
            return Ok(false);
        };
        Ok(mine == theirs)
    }

    /// Locate this frame element and move driver focus into its document
    fn enter_frame(&self) -> Result<()> {
        let frame = match self.handle() {
            Ok(Some(handle)) => handle,
            Ok(None) => return Err(LocatorError::UnknownFrame(self.selector.to_string())),
            Err(LocatorError::UnknownContext(reason)) => return Err(LocatorError::UnknownFrame(reason)),
            Err(err) => return Err(err),
        };
        log::debug!("switching to frame {}", self.selector);
        self.driver
            .switch_to_frame(Some(&frame))
            .map_err(|err| LocatorError::UnknownFrame(format!("{}: {}", self.selector, err)))
    }

    /// Context for a child folded into this (unlocated) element's structural query
    fn merged_context(&self) -> Result<Option<QueryContext<D::Handle>>> {
        let selector = SelectorNormalizer::new(self.query_kind).normalize(&self.selector)?;
        if selector.adjacency().is_some() {
            return Ok(None);
        }
        let own = self.scope.context(&self.driver, &self.selector, self.query_kind)?;
        let query = Locator::new(&*self.driver, self.query_kind, &self.config).compile(&selector, &own)?;
        let Some(scope_xpath) = query.scope_xpath() else {
            return Ok(None);
        };
        log::debug!("scoping child query under {}", scope_xpath);
        Ok(Some(QueryContext::merged(
            own.scope,
            scope_xpath.to_string(),
            self.selector.tag_name().map(str::to_string),
        )))
    }

    fn relative(&self, adjacent: &str, selector: Selector) -> (&'static ElementKind, Selector) {
        let kind = selector.tag_name().map_or(&HTML_ELEMENT, ElementKind::for_tag);
        (kind, selector.with(keys::ADJACENT, adjacent))
    }

    fn relative_element(&self, adjacent: &str, selector: Selector) -> Element<D> {
        let (kind, selector) = self.relative(adjacent, selector);
        Element::new(Rc::clone(&self.driver), self.config.clone(), self.query_scope(), kind, selector)
    }

    fn relative_elements(&self, adjacent: &str, selector: Selector) -> ElementCollection<D> {
        let (kind, selector) = self.relative(adjacent, selector);
        ElementCollection::new(Rc::clone(&self.driver), self.config.clone(), self.query_scope(), kind, selector)
    }

    /// Nearest ancestor matching `selector`
    pub fn parent(&self, selector: Selector) -> Element<D> {
        self.relative_element("ancestor", selector)
    }

    pub fn following_sibling(&self, selector: Selector) -> Element<D> {
        self.relative_element("following_sibling", selector)
    }

    pub fn following_siblings(&self, selector: Selector) -> ElementCollection<D> {
        self.relative_elements("following_sibling", selector)
    }

    pub fn preceding_sibling(&self, selector: Selector) -> Element<D> {
        self.relative_element("preceding_sibling", selector)
    }

    /// Preceding siblings, nearest first
    pub fn preceding_siblings(&self, selector: Selector) -> ElementCollection<D> {
        self.relative_elements("preceding_sibling", selector)
    }

    pub fn child(&self, selector: Selector) -> Element<D> {
        self.relative_element("child", selector)
    }

    pub fn children(&self, selector: Selector) -> ElementCollection<D> {
        self.relative_elements("child", selector)
    }
}

impl<D: Driver> Container<D> for Element<D> {
    fn driver(&self) -> &Rc<D> {
        &self.driver
    }

    fn config(&self) -> &LocatorConfig {
        &self.config
    }

    fn query_scope(&self) -> QueryScope<D> {
        QueryScope::Element(Box::new(self.clone()))
    }
}
