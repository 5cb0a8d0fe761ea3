//! In-process filtering of fetched candidates against residual constraints

use crate::deprecation::Deprecation;
use crate::driver::{Driver, How};
use crate::error::{LocatorError, Result};
use crate::kinds::{self, ElementKind, QueryStrategy};
use crate::locator::compiler::xpath;
use crate::selector::{keys, Pattern, Selector, SelectorValue};
use std::collections::HashMap;

/// Tags a `label` without `for` can wrap, in lookup order
const LABELABLE: [&str; 6] = ["input", "select", "textarea", "button", "meter", "progress"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The candidate at `index` among those passing (default 0)
    First,
    /// Every passing candidate in fetch order; `index` is rejected
    All,
}

/// Which deprecation, if any, a `text` regex triggers for one candidate.
///
/// The match outcome always uses the visible text; hidden text only decides
/// the warning.
pub fn text_regex_deprecation(pattern: &Pattern, visible_text: &str, full_text: &str) -> Option<Deprecation> {
    match (pattern.is_match(visible_text), pattern.is_match(full_text)) {
        (true, false) => Some(Deprecation::TextRegexVisibleOnly),
        (false, true) => Some(Deprecation::TextRegexHiddenText),
        _ => None,
    }
}

/// Collapse whitespace runs and trim, like XPath `normalize-space()`
pub fn normalize_space(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn matches_text(expected: &SelectorValue, actual: &str) -> bool {
    match expected {
        SelectorValue::Str(text) => actual == text,
        SelectorValue::Regex(pattern) => pattern.is_match(actual),
        _ => false,
    }
}

/// A list accepts any of its tags
fn matches_tag(expected: &SelectorValue, tag: &str) -> bool {
    match expected {
        SelectorValue::Str(expected) => tag.eq_ignore_ascii_case(expected),
        SelectorValue::Regex(pattern) => pattern.is_match(tag),
        SelectorValue::List(items) => items.iter().any(|item| matches_tag(item, tag)),
        _ => false,
    }
}

/// Checks candidates fetched by a structural query
pub struct CandidateMatcher<'a, D: Driver> {
    driver: &'a D,
    kind: &'static ElementKind,
}

impl<'a, D: Driver> CandidateMatcher<'a, D> {
    pub fn new(driver: &'a D, kind: &'static ElementKind) -> Self {
        Self { driver, kind }
    }

    pub fn first(&self, candidates: Vec<D::Handle>, residual: &Selector) -> Result<Option<D::Handle>> {
        Ok(self.filter(candidates, residual, MatchMode::First)?.into_iter().next())
    }

    pub fn all(&self, candidates: Vec<D::Handle>, residual: &Selector) -> Result<Vec<D::Handle>> {
        self.filter(candidates, residual, MatchMode::All)
    }

    /// Keep the candidates satisfying every residual constraint.
    ///
    /// Every candidate is checked even in `First` mode. A negative `index`
    /// counts from the end of the passing sequence.
    pub fn filter(&self, candidates: Vec<D::Handle>, residual: &Selector, mode: MatchMode) -> Result<Vec<D::Handle>> {
        let mut constraints = residual.clone();
        let index = match constraints.remove(keys::INDEX) {
            Some(SelectorValue::Int(index)) => Some(index),
            Some(other) => {
                return Err(LocatorError::InvalidSelectorValue {
                    key: keys::INDEX.to_string(),
                    value: other.to_string(),
                    expected: "Int".to_string(),
                });
            }
            None => None,
        };
        if mode == MatchMode::All && index.is_some() {
            return Err(LocatorError::IndexWithCollection);
        }

        let total = candidates.len();
        let mut labels = HashMap::new();
        let mut passing = Vec::new();
        for candidate in candidates {
            if self.satisfies(&candidate, &constraints, &mut labels)? {
                passing.push(candidate);
            }
        }
        log::debug!("{} of {} candidates satisfy {}", passing.len(), total, constraints);

        Ok(match mode {
            MatchMode::All => passing,
            MatchMode::First => {
                let index = index.unwrap_or(0);
                let picked = if index < 0 {
                    passing.into_iter().rev().nth(index.unsigned_abs() as usize - 1)
                } else {
                    passing.into_iter().nth(index as usize)
                };
                picked.into_iter().collect()
            }
        })
    }

    fn satisfies(
        &self,
        candidate: &D::Handle,
        constraints: &Selector,
        labels: &mut HashMap<&'static str, Vec<D::Handle>>,
    ) -> Result<bool> {
        for (key, value) in constraints.iter() {
            if !self.check(candidate, key, value, labels)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Test one constraint against one candidate
    fn check(
        &self,
        candidate: &D::Handle,
        key: &str,
        value: &SelectorValue,
        labels: &mut HashMap<&'static str, Vec<D::Handle>>,
    ) -> Result<bool> {
        match key {
            keys::INDEX | keys::ADJACENT => Ok(true),
            keys::TAG_NAME => {
                let tag = self.driver.get_tag_name(candidate)?;
                Ok(matches_tag(value, &tag))
            }
            keys::CLASS | keys::CLASS_NAME => self.check_classes(candidate, value),
            keys::VISIBLE => Ok(self.driver.is_displayed(candidate)? == value.as_bool().unwrap_or(true)),
            keys::VISIBLE_TEXT => {
                let text = self.driver.get_text(candidate)?;
                Ok(matches_text(value, text.trim()))
            }
            keys::TEXT => self.check_text(candidate, value),
            keys::HREF => {
                let href = self.driver.get_attribute(candidate, "href")?;
                Ok(match (value, href) {
                    (SelectorValue::Bool(expected), href) => href.is_some() == *expected,
                    (_, Some(href)) => matches_text(value, href.trim()),
                    (_, None) => false,
                })
            }
            keys::LABEL_ELEMENT | keys::VISIBLE_LABEL_ELEMENT => {
                let visible = key == keys::VISIBLE_LABEL_ELEMENT;
                let slot = if visible { keys::VISIBLE_LABEL_ELEMENT } else { keys::LABEL_ELEMENT };
                if !labels.contains_key(slot) {
                    let targets = self.labelled(value, visible)?;
                    labels.insert(slot, targets);
                }
                Ok(labels.get(slot).is_some_and(|targets| targets.contains(candidate)))
            }
            _ => self.check_attribute(candidate, key, value),
        }
    }

    /// Every expected token is matched by some token of the class attribute
    fn check_classes(&self, candidate: &D::Handle, expected: &SelectorValue) -> Result<bool> {
        let raw = self.driver.get_attribute(candidate, "class")?;
        let actual: Vec<&str> = raw.as_deref().map(|c| c.split_whitespace().collect()).unwrap_or_default();

        let expected = match expected {
            SelectorValue::List(items) => items.as_slice(),
            single => std::slice::from_ref(single),
        };
        Ok(expected.iter().all(|token| match token {
            SelectorValue::Bool(false) => actual.is_empty(),
            SelectorValue::Bool(true) => raw.is_some(),
            SelectorValue::Str(class) => match class.strip_prefix('!') {
                Some(negated) => !actual.contains(&negated),
                None => actual.contains(&class.as_str()),
            },
            SelectorValue::Regex(pattern) => actual.iter().any(|class| pattern.is_match(class)),
            _ => false,
        }))
    }

    fn check_text(&self, candidate: &D::Handle, expected: &SelectorValue) -> Result<bool> {
        if self.reads_value(candidate)? {
            let value = self.driver.get_attribute(candidate, "value")?.unwrap_or_default();
            return Ok(matches_text(expected, &value));
        }

        let visible = self.driver.get_text(candidate)?;
        let visible = visible.trim();
        if let SelectorValue::Regex(pattern) = expected {
            let full = self.driver.get_text_content(candidate)?;
            if let Some(deprecation) = text_regex_deprecation(pattern, visible, &full) {
                deprecation.warn();
            }
        }
        Ok(matches_text(expected, visible))
    }

    /// Whether the kind's text comes from the `value` attribute for this candidate
    fn reads_value(&self, candidate: &D::Handle) -> Result<bool> {
        Ok(match self.kind.strategy {
            QueryStrategy::TextField => true,
            QueryStrategy::Button => self.driver.get_tag_name(candidate)?.eq_ignore_ascii_case("input"),
            _ => false,
        })
    }

    fn check_attribute(&self, candidate: &D::Handle, key: &str, expected: &SelectorValue) -> Result<bool> {
        let wire = kinds::wire_name(self.kind, key);
        let actual = self.driver.get_attribute(candidate, &wire)?;
        Ok(match (expected, actual) {
            (SelectorValue::Bool(present), actual) => actual.is_some() == *present,
            (SelectorValue::Str(text), Some(actual)) => {
                if self.kind.is_case_insensitive(key) || self.kind.is_case_insensitive(&wire) {
                    actual.to_lowercase() == text.to_lowercase()
                } else {
                    actual == *text
                }
            }
            (SelectorValue::Regex(pattern), Some(actual)) => pattern.is_match(&actual),
            _ => false,
        })
    }

    /// Controls associated with the labels whose text matches `expected`
    fn labelled(&self, expected: &SelectorValue, visible: bool) -> Result<Vec<D::Handle>> {
        let mut targets = Vec::new();
        for label in self.driver.find_all(How::TagName, "label", None)? {
            let text = if visible {
                self.driver.get_text(&label)?.trim().to_string()
            } else {
                normalize_space(&self.driver.get_text_content(&label)?)
            };
            if !matches_text(expected, &text) {
                continue;
            }

            match self.driver.get_attribute(&label, "for")? {
                Some(id) if !id.is_empty() => {
                    let query = format!(".//*[@id={}]", xpath::literal(&id));
                    if let Some(target) = self.driver.find_one(How::XPath, &query, None)? {
                        targets.push(target);
                    }
                }
                _ => {
                    for tag in LABELABLE {
                        if let Some(target) = self.driver.find_one(How::TagName, tag, Some(&label))? {
                            targets.push(target);
                            break;
                        }
                    }
                }
            }
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementNode;
    use crate::driver::{StubDriver, StubHandle};
    use crate::kinds::{BUTTON, HTML_ELEMENT, INPUT, TEXT_FIELD};

    fn create_test_page() -> StubDriver {
        StubDriver::new(ElementNode::new("html").with_children(vec![ElementNode::new("body").with_children(vec![
            ElementNode::new("div").with_attribute("id", "a").with_attribute("class", "x a y b z"),
            ElementNode::new("div").with_attribute("id", "b").with_attribute("class", "x a y z"),
            ElementNode::new("div")
                .with_attribute("id", "c")
                .with_attribute("class", "b")
                .with_text("Hidden")
                .with_visibility(false),
            ElementNode::new("label").with_attribute("for", "name").with_text("Name"),
            ElementNode::new("input").with_attribute("id", "name").with_attribute("type", "TEXT"),
            ElementNode::new("label")
                .with_text("Wrapped ")
                .with_children(vec![ElementNode::new("input").with_attribute("id", "wrapped")]),
            ElementNode::new("input").with_attribute("type", "submit").with_attribute("value", "Go"),
            ElementNode::new("p").with_text("Hello ").with_children(vec![
                ElementNode::new("span").with_text("world").with_visibility(false),
            ]),
        ])]))
    }

    fn divs(driver: &StubDriver) -> Vec<StubHandle> {
        driver.by_tag("div")
    }

    #[test]
    fn test_tag_list_accepts_any() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let candidates = vec![driver.by_tag("div")[0], driver.by_tag("p")[0], driver.by_tag("label")[0]];
        let residual = Selector::new().with("tag_name", vec!["p", "LABEL"]);
        assert_eq!(matcher.all(candidates.clone(), &residual).unwrap(), candidates[1..].to_vec());
    }

    #[test]
    fn test_case_insensitive_residual_outside_latin() {
        let driver = StubDriver::new(ElementNode::new("body").with_children(vec![
            ElementNode::new("p").with_attribute("lang", "ΕΛ"),
            ElementNode::new("p").with_attribute("title", "Привет, мир"),
        ]));
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let paragraphs = driver.by_tag("p");

        let found = matcher.all(paragraphs.clone(), &Selector::new().with("lang", "ελ")).unwrap();
        assert_eq!(found, vec![paragraphs[0]]);

        let greeting = Selector::new().with("title", Pattern::ignore_case("привет").unwrap());
        assert_eq!(matcher.all(paragraphs.clone(), &greeting).unwrap(), vec![paragraphs[1]]);
    }

    #[test]
    fn test_class_containment() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let residual = Selector::new().with("class", vec!["a", "b"]);
        let found = matcher.all(divs(&driver), &residual).unwrap();
        assert_eq!(found, vec![driver.by_id("a").unwrap()]);
    }

    #[test]
    fn test_negated_and_absent_class() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);

        let residual = Selector::new().with("class", vec!["x", "!b"]);
        assert_eq!(matcher.all(divs(&driver), &residual).unwrap(), vec![driver.by_id("b").unwrap()]);

        let residual = Selector::new().with("class", SelectorValue::List(vec![false.into()]));
        let all = driver.by_tag("label");
        assert_eq!(matcher.all(all.clone(), &residual).unwrap(), all);
    }

    #[test]
    fn test_class_regex() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let residual = Selector::new().with("class", SelectorValue::List(vec![Pattern::new("^b$").unwrap().into()]));
        let found = matcher.all(divs(&driver), &residual).unwrap();
        assert_eq!(found, vec![driver.by_id("a").unwrap(), driver.by_id("c").unwrap()]);
    }

    #[test]
    fn test_index_symmetry() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let candidates = divs(&driver);
        let residual = Selector::new().with("class", vec!["b"]);
        let passing = matcher.all(candidates.clone(), &residual).unwrap();

        let last = matcher.first(candidates.clone(), &residual.with_index(-1)).unwrap();
        let positive = matcher
            .first(candidates.clone(), &residual.with_index(passing.len() as i64 - 1))
            .unwrap();
        assert_eq!(last, positive);
        assert_eq!(last, driver.by_id("c"));

        assert_eq!(matcher.first(candidates.clone(), &residual.with_index(-2)).unwrap(), driver.by_id("a"));
        assert_eq!(matcher.first(candidates, &residual.with_index(5)).unwrap(), None);
    }

    #[test]
    fn test_all_with_index_is_rejected() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let result = matcher.all(divs(&driver), &Selector::new().with("index", 0));
        assert!(matches!(result, Err(LocatorError::IndexWithCollection)));
    }

    #[test]
    fn test_visibility() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let hidden = matcher.all(divs(&driver), &Selector::new().with("visible", false)).unwrap();
        assert_eq!(hidden, vec![driver.by_id("c").unwrap()]);
    }

    #[test]
    fn test_case_insensitive_attribute() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &INPUT);
        let found = matcher
            .first(driver.by_tag("input"), &Selector::new().with("type", "text"))
            .unwrap();
        assert_eq!(found, driver.by_id("name"));
    }

    #[test]
    fn test_text_uses_rendered_text() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &HTML_ELEMENT);
        let paragraphs = driver.by_tag("p");

        let found = matcher.all(paragraphs.clone(), &Selector::new().with("text", "Hello")).unwrap();
        assert_eq!(found, paragraphs);

        let regex = Selector::new().with("text", Pattern::new("world").unwrap());
        assert!(matcher.all(paragraphs, &regex).unwrap().is_empty());
    }

    #[test]
    fn test_button_input_text_is_value() {
        let driver = create_test_page();
        let matcher = CandidateMatcher::new(&driver, &BUTTON);
        let found = matcher.all(driver.by_tag("input"), &Selector::new().with("text", "Go")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(driver.get_attribute(&found[0], "type").unwrap().as_deref(), Some("submit"));
    }

    #[test]
    fn test_label_association() {
        let driver = create_test_page();
        driver.script(How::XPath, ".//*[@id='name']", &[driver.by_id("name").unwrap()]);
        let matcher = CandidateMatcher::new(&driver, &TEXT_FIELD);

        let by_for = matcher
            .all(driver.by_tag("input"), &Selector::new().with("label_element", "Name"))
            .unwrap();
        assert_eq!(by_for, vec![driver.by_id("name").unwrap()]);

        let nested = matcher
            .all(
                driver.by_tag("input"),
                &Selector::new().with("visible_label_element", Pattern::new("^Wrap").unwrap()),
            )
            .unwrap();
        assert_eq!(nested, vec![driver.by_id("wrapped").unwrap()]);
    }

    #[test]
    fn test_text_regex_deprecation() {
        let pattern = Pattern::new("world").unwrap();
        assert_eq!(
            text_regex_deprecation(&pattern, "Hello", "Hello world"),
            Some(Deprecation::TextRegexHiddenText)
        );
        assert_eq!(text_regex_deprecation(&pattern, "Hello world", "Hello world"), None);

        let anchored = Pattern::new("^Hello$").unwrap();
        assert_eq!(
            text_regex_deprecation(&anchored, "Hello", "Hello world"),
            Some(Deprecation::TextRegexVisibleOnly)
        );
    }

    #[test]
    fn test_normalize_space() {
        assert_eq!(normalize_space("  a \n  b\tc "), "a b c");
    }
}
