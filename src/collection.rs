//! Lazily populated element collections

use crate::driver::Driver;
use crate::element::{Element, QueryScope};
use crate::error::Result;
use crate::kinds::ElementKind;
use crate::locator::{Locator, LocatorConfig};
use crate::selector::Selector;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Every element matching one selector under one scope.
///
/// Nothing is fetched on construction. The first call that needs the full
/// list (`len`, `to_vec`, iteration, negative slices) fetches it once and
/// caches it until [`ElementCollection::reset`].
pub struct ElementCollection<D: Driver> {
    driver: Rc<D>,
    config: LocatorConfig,
    scope: QueryScope<D>,
    query_kind: &'static ElementKind,
    selector: Selector,
    cache: RefCell<Option<Vec<Element<D>>>>,
}

impl<D: Driver> fmt::Debug for ElementCollection<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementCollection")
            .field("kind", &self.query_kind.name)
            .field("selector", &self.selector.to_string())
            .field("scope", &self.scope)
            .field("materialized", &self.cache.borrow().as_ref().map(Vec::len))
            .finish()
    }
}

impl<D: Driver> ElementCollection<D> {
    pub fn new(
        driver: Rc<D>,
        config: LocatorConfig,
        scope: QueryScope<D>,
        query_kind: &'static ElementKind,
        selector: Selector,
    ) -> Self {
        Self {
            driver,
            config,
            scope,
            query_kind,
            selector,
            cache: RefCell::new(None),
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Fetch every match and wrap each in an element typed by its tag
    fn materialize(&self) -> Result<Vec<Element<D>>> {
        if let Some(elements) = self.cache.borrow().as_ref() {
            return Ok(elements.clone());
        }

        let context = self.scope.context(&self.driver, &self.selector, self.query_kind)?;
        let handles = Locator::new(&*self.driver, self.query_kind, &self.config).locate_all(&self.selector, &context)?;
        log::debug!("{} elements match {}", handles.len(), self.selector);

        let mut elements = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let kind = self.retype(&handle)?;
            let element = self.element_at(index as i64).located(kind, handle);
            elements.push(element);
        }
        self.cache.replace(Some(elements.clone()));
        Ok(elements)
    }

    /// Most specific kind for a fetched handle; a pinned tag saves the round trip
    fn retype(&self, handle: &D::Handle) -> Result<&'static ElementKind> {
        if !self.query_kind.is_generic() {
            return Ok(self.query_kind);
        }
        Ok(match self.selector.tag_name() {
            Some(tag) => ElementKind::for_tag(tag),
            None => ElementKind::for_tag(&self.driver.get_tag_name(handle)?),
        })
    }

    fn element_at(&self, index: i64) -> Element<D> {
        Element::new(
            Rc::clone(&self.driver),
            self.config.clone(),
            self.scope.clone(),
            self.query_kind,
            self.selector.with_index(index),
        )
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.materialize()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn to_vec(&self) -> Result<Vec<Element<D>>> {
        self.materialize()
    }

    pub fn iter(&self) -> Result<std::vec::IntoIter<Element<D>>> {
        Ok(self.materialize()?.into_iter())
    }

    /// Element at `index`, negative counting from the end.
    ///
    /// Never fails: an out-of-range index yields an element that does not exist.
    pub fn get(&self, index: i64) -> Element<D> {
        if let Some(elements) = self.cache.borrow().as_ref() {
            let len = elements.len() as i64;
            let at = if index < 0 { len + index } else { index };
            if (0..len).contains(&at) {
                return elements[at as usize].clone();
            }
        }
        self.element_at(index)
    }

    pub fn first(&self) -> Element<D> {
        self.get(0)
    }

    pub fn last(&self) -> Element<D> {
        self.get(-1)
    }

    /// Elements in `start..end`, bounds clamped, negative bounds counted from the end
    pub fn slice(&self, start: i64, end: Option<i64>) -> Result<Vec<Element<D>>> {
        let elements = self.materialize()?;
        let len = elements.len() as i64;
        let clamp = |bound: i64| if bound < 0 { (len + bound).max(0) } else { bound.min(len) };
        let start = clamp(start);
        let end = end.map_or(len, clamp);
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(elements[start as usize..end as usize].to_vec())
    }

    /// Drop the cached list; the next access fetches again
    pub fn reset(&self) {
        self.cache.replace(None);
    }

    /// Pairwise equality of the fully fetched elements
    pub fn eq_elements(&self, other: &ElementCollection<D>) -> Result<bool> {
        let mine = self.materialize()?;
        let theirs = other.materialize()?;
        if mine.len() != theirs.len() {
            return Ok(false);
        }
        for (a, b) in mine.iter().zip(theirs.iter()) {
            if !a.eq_element(b)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<D: Driver> PartialEq for ElementCollection<D> {
    fn eq(&self, other: &Self) -> bool {
        self.eq_elements(other).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Container, Document};
    use crate::dom::ElementNode;
    use crate::driver::{How, StubDriver};
    use crate::error::LocatorError;
    use crate::kinds::{ANCHOR, BUTTON, HTML_ELEMENT};
    use crate::locator::LocatorState;
    use std::time::Duration;

    fn create_test_page() -> Rc<StubDriver> {
        Rc::new(StubDriver::new(ElementNode::new("html").with_children(vec![
            ElementNode::new("body").with_children(vec![
                ElementNode::new("a").with_attribute("id", "one").with_text("One"),
                ElementNode::new("button").with_attribute("id", "two").with_text("Two"),
                ElementNode::new("a").with_attribute("id", "three").with_text("Three"),
            ]),
        ])))
    }

    fn document(driver: &Rc<StubDriver>) -> Document<StubDriver> {
        Document::with_config(Rc::clone(driver), LocatorConfig::new().retry_backoff(Duration::ZERO))
    }

    #[test]
    fn test_lazy_until_needed() {
        let driver = create_test_page();
        let links = document(&driver).kind_elements(&ANCHOR, Selector::new());
        assert!(driver.queries().is_empty());

        assert_eq!(links.len().unwrap(), 2);
        assert_eq!(driver.queries().len(), 1);

        assert_eq!(links.len().unwrap(), 2);
        assert_eq!(links.to_vec().unwrap().len(), 2);
        assert_eq!(driver.queries().len(), 1);

        links.reset();
        links.len().unwrap();
        assert_eq!(driver.queries().len(), 2);
    }

    #[test]
    fn test_elements_are_located_and_retyped() {
        let driver = create_test_page();
        let body = driver.by_tag("body")[0];
        driver.script(How::XPath, ".//*", &[body, driver.by_id("one").unwrap(), driver.by_id("two").unwrap()]);

        let all = document(&driver).elements(Selector::new());
        let kinds: Vec<&str> = all.iter().unwrap().map(|e| e.kind().name).collect();
        assert_eq!(kinds, vec![HTML_ELEMENT.name, ANCHOR.name, BUTTON.name]);

        let second = all.get(1);
        assert_eq!(second.state(), LocatorState::Located);
        assert_eq!(second.selector().index(), Some(1));
        assert_eq!(second.text().unwrap(), "One");
    }

    #[test]
    fn test_negative_index_and_slices() {
        let driver = create_test_page();
        let links = document(&driver).kind_elements(&ANCHOR, Selector::new());

        assert_eq!(links.last().text().unwrap(), "Three");
        assert_eq!(links.first().text().unwrap(), "One");

        let tail = links.slice(-1, None).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].attribute_value("id").unwrap(), Some("three".to_string()));
        assert!(links.slice(1, Some(0)).unwrap().is_empty());
        assert_eq!(links.slice(0, Some(10)).unwrap().len(), 2);
    }

    #[test]
    fn test_out_of_range_does_not_exist() {
        let driver = create_test_page();
        let links = document(&driver).kind_elements(&ANCHOR, Selector::new());
        assert!(!links.get(5).exists().unwrap());
        links.len().unwrap();
        assert!(!links.get(-3).exists().unwrap());
    }

    #[test]
    fn test_empty_collection() {
        let driver = create_test_page();
        let tables = document(&driver).elements(Selector::new().with("tag_name", "table"));
        assert_eq!(tables.len().unwrap(), 0);
        assert!(tables.is_empty().unwrap());
    }

    #[test]
    fn test_index_is_rejected() {
        let driver = create_test_page();
        let links = document(&driver).kind_elements(&ANCHOR, Selector::new().with("index", 1));
        assert!(matches!(links.len().unwrap_err(), LocatorError::IndexWithCollection));
    }

    #[test]
    fn test_collection_equality() {
        let driver = create_test_page();
        let doc = document(&driver);
        let links = doc.kind_elements(&ANCHOR, Selector::new());
        let again = doc.elements(Selector::new().with("tag_name", "a"));
        assert!(links == again);
        assert!(links != doc.buttons(Selector::new()));
    }
}
