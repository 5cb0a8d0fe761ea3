//! Anything elements can be searched under

use crate::collection::ElementCollection;
use crate::driver::Driver;
use crate::element::{Element, QueryScope};
use crate::kinds::{self, ElementKind};
use crate::locator::LocatorConfig;
use crate::selector::Selector;
use std::rc::Rc;

/// Element factories shared by [`Document`] and [`Element`].
///
/// Typed shortcuts merge the kind's implied entries (tag, input `type`) with
/// the caller's selector; caller entries win.
pub trait Container<D: Driver> {
    fn driver(&self) -> &Rc<D>;

    fn config(&self) -> &LocatorConfig;

    /// Scope handed to elements created here
    fn query_scope(&self) -> QueryScope<D>;

    fn kind_element(&self, kind: &'static ElementKind, selector: Selector) -> Element<D> {
        Element::new(
            Rc::clone(self.driver()),
            self.config().clone(),
            self.query_scope(),
            kind,
            kind.default_selector().merged(&selector),
        )
    }

    fn kind_elements(&self, kind: &'static ElementKind, selector: Selector) -> ElementCollection<D> {
        ElementCollection::new(
            Rc::clone(self.driver()),
            self.config().clone(),
            self.query_scope(),
            kind,
            kind.default_selector().merged(&selector),
        )
    }

    fn element(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::HTML_ELEMENT, selector)
    }

    fn elements(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::HTML_ELEMENT, selector)
    }

    fn link(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::ANCHOR, selector)
    }

    fn links(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::ANCHOR, selector)
    }

    /// `button` elements and button-like `input` elements
    fn button(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::BUTTON, selector)
    }

    fn buttons(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::BUTTON, selector)
    }

    /// `input` elements accepting free text
    fn text_field(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::TEXT_FIELD, selector)
    }

    fn text_fields(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::TEXT_FIELD, selector)
    }

    fn checkbox(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::CHECKBOX, selector)
    }

    fn radio(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::RADIO, selector)
    }

    fn select_list(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::SELECT, selector)
    }

    fn option(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::OPTION, selector)
    }

    fn label(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::LABEL, selector)
    }

    fn form(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::FORM, selector)
    }

    fn image(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::IMAGE, selector)
    }

    fn table(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::TABLE, selector)
    }

    fn row(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::ROW, selector)
    }

    fn rows(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::ROW, selector)
    }

    fn cell(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::CELL, selector)
    }

    fn cells(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::CELL, selector)
    }

    fn div(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::DIV, selector)
    }

    fn divs(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::DIV, selector)
    }

    fn span(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::SPAN, selector)
    }

    fn spans(&self, selector: Selector) -> ElementCollection<D> {
        self.kind_elements(&kinds::SPAN, selector)
    }

    /// Elements created under an iframe are searched in its document
    fn iframe(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::IFRAME, selector)
    }

    fn frame(&self, selector: Selector) -> Element<D> {
        self.kind_element(&kinds::FRAME, selector)
    }
}

/// The top-level document of a driver
pub struct Document<D: Driver> {
    driver: Rc<D>,
    config: LocatorConfig,
}

impl<D: Driver> Document<D> {
    /// Create a document with the default retry policy
    pub fn new(driver: Rc<D>) -> Self {
        Self::with_config(driver, LocatorConfig::default())
    }

    pub fn with_config(driver: Rc<D>, config: LocatorConfig) -> Self {
        Self { driver, config }
    }
}

impl<D: Driver> Container<D> for Document<D> {
    fn driver(&self) -> &Rc<D> {
        &self.driver
    }

    fn config(&self) -> &LocatorConfig {
        &self.config
    }

    fn query_scope(&self) -> QueryScope<D> {
        QueryScope::Document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::driver::{How, StubDriver};
    use crate::kinds::QueryStrategy;
    use crate::locator::compiler::xpath;

    fn create_test_page() -> Rc<StubDriver> {
        Rc::new(StubDriver::new(ElementNode::new("html").with_children(vec![ElementNode::new("body")
            .with_children(vec![
                ElementNode::new("input").with_attribute("type", "checkbox").with_attribute("id", "agree"),
                ElementNode::new("input").with_attribute("type", "text").with_attribute("id", "name"),
            ])])))
    }

    #[test]
    fn test_kind_defaults_merge_with_selector() {
        let driver = create_test_page();
        let doc = Document::new(driver);
        let checkbox = doc.checkbox(Selector::new().with("id", "agree"));
        assert_eq!(checkbox.selector().tag_name(), Some("input"));
        assert_eq!(checkbox.selector().get("type").and_then(|v| v.as_str()), Some("checkbox"));
        assert_eq!(checkbox.selector().get("id").and_then(|v| v.as_str()), Some("agree"));

        let overridden = doc.element(Selector::new().with("tag_name", "input")).selector().clone();
        assert_eq!(overridden.len(), 1);
    }

    #[test]
    fn test_typed_shortcuts() {
        let driver = create_test_page();
        let doc = Document::new(driver);
        assert_eq!(doc.button(Selector::new()).kind().strategy, QueryStrategy::Button);
        assert_eq!(doc.text_field(Selector::new()).kind().strategy, QueryStrategy::TextField);
        assert_eq!(doc.rows(Selector::new()).selector().len(), 1);
        assert!(doc.iframe(Selector::new()).kind().frame);
        assert!(doc.frame(Selector::new()).kind().frame);
    }

    #[test]
    fn test_document_rows_and_cells() {
        let driver = Rc::new(StubDriver::new(ElementNode::new("body").with_children(vec![ElementNode::new("table")
            .with_children(vec![ElementNode::new("tbody").with_children(vec![
                ElementNode::new("tr").with_attribute("id", "r1").with_children(vec![
                    ElementNode::new("td").with_text("Tea"),
                    ElementNode::new("td").with_text("3"),
                ]),
            ])])])));
        let row = driver.by_id("r1").unwrap();
        let tea = driver.by_tag("td")[0];
        driver.script(How::XPath, ".//*[local-name()='tr']", &[row]);
        driver.script(
            How::XPath,
            ".//*[local-name()='th' or local-name()='td'][normalize-space()='Tea']",
            &[tea],
        );

        let doc = Document::new(Rc::clone(&driver));
        assert_eq!(doc.rows(Selector::new()).len().unwrap(), 1);
        assert_eq!(doc.cell(Selector::new().with("text", "Tea")).locate().unwrap(), tea);
    }

    #[test]
    fn test_checkbox_locates_by_type() {
        let driver = create_test_page();
        let agree = driver.by_id("agree").unwrap();
        let query = format!(".//*[local-name()='input'][{}='checkbox']", xpath::lower_case("@type"));
        driver.script(How::XPath, query, &[agree]);
        let doc = Document::new(Rc::clone(&driver));
        assert!(doc.checkbox(Selector::new()).exists().unwrap());
    }
}
