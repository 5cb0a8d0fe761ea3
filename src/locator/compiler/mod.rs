//! Structural query compilation
//!
//! [`StructuralQueryCompiler`] turns a normalized [`Selector`] into the query
//! the driver runs plus the residual constraints it could not express. Every
//! key of the input ends up in exactly one place: consumed by the query, or
//! present in [`CompiledQuery::residual`].
//!
//! The XPath is assembled left to right: a start anchor (descendant search,
//! adjacency axis or a merged parent scope), the kind's own step predicate,
//! one predicate per consumed key, then positional wrapping for `index` when
//! nothing is left to check in-process.

mod button;
mod cell;
mod row;
mod text_field;
pub mod xpath;

use crate::driver::How;
use crate::error::Result;
use crate::kinds::{self, ElementKind, QueryStrategy};
use crate::locator::regex_decomposer::decompose;
use crate::selector::{keys, Adjacency, Pattern, Selector, SelectorValue};
use serde::Serialize;
use std::collections::HashSet;

/// A native query and the constraints left to check per candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    pub how: How,
    pub value: String,
    pub residual: Selector,
}

impl CompiledQuery {
    /// Every constraint is proven by the native query alone
    pub fn is_structural(&self) -> bool {
        self.residual.is_empty()
    }

    /// XPath usable as a parent scope prefix, if this query is purely structural
    pub fn scope_xpath(&self) -> Option<&str> {
        (self.how == How::XPath && self.is_structural()).then_some(self.value.as_str())
    }
}

/// What the compiler knows about the scope a query runs under
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileContext {
    /// The query runs below an element rather than from a document
    pub scoped: bool,
    /// Tag name of the scope element, when known
    pub scope_tag: Option<String>,
    /// Structural XPath of an unlocated parent to anchor the query at
    pub scope_xpath: Option<String>,
}

impl CompileContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: run below a scope element
    pub fn scoped(mut self) -> Self {
        self.scoped = true;
        self
    }

    /// Builder method: set the scope element's tag name
    pub fn with_scope_tag(mut self, tag: impl Into<String>) -> Self {
        self.scoped = true;
        self.scope_tag = Some(tag.into());
        self
    }

    /// Builder method: anchor at an unlocated parent's XPath
    pub fn with_scope_xpath(mut self, xpath: impl Into<String>) -> Self {
        self.scoped = true;
        self.scope_xpath = Some(xpath.into());
        self
    }
}

/// Compiles selectors for one element kind
#[derive(Debug, Clone, Copy)]
pub struct StructuralQueryCompiler {
    kind: &'static ElementKind,
}

impl StructuralQueryCompiler {
    pub fn new(kind: &'static ElementKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> &'static ElementKind {
        self.kind
    }

    /// Compile a normalized selector
    pub fn compile(&self, selector: &Selector, context: &CompileContext) -> Result<CompiledQuery> {
        if let Some(query) = self.passthrough(selector) {
            log::debug!("{} passthrough {} {:?}, residual {}", self.kind.name, query.how, query.value, query.residual);
            return Ok(query);
        }

        let mut builder = QueryBuilder::new(self.kind, selector, context);
        let branches = match self.kind.strategy {
            QueryStrategy::Generic => {
                builder.take_kind_tags();
                builder.take_generic_tag();
                vec![builder.start(false)]
            }
            QueryStrategy::Button => button::plan(&mut builder),
            QueryStrategy::TextField => text_field::plan(&mut builder)?,
            QueryStrategy::Cell => cell::plan(&mut builder),
            QueryStrategy::Row => row::plan(&mut builder),
        };
        builder.take_remaining();

        let query = builder.finish(branches);
        log::debug!("{} compiled {} to {}, residual {}", self.kind.name, selector, query.value, query.residual);
        Ok(query)
    }

    /// Native `css`/`xpath`/link-text queries run verbatim; all other keys are residual.
    /// A kind covering several tags re-checks that the result is one of them.
    fn passthrough(&self, selector: &Selector) -> Option<CompiledQuery> {
        let (key, value) = selector
            .iter()
            .find(|(key, _)| matches!(*key, keys::CSS | keys::XPATH | keys::LINK_TEXT | keys::PARTIAL_LINK_TEXT))?;
        let how = How::from_key(key)?;
        let value = value.as_str()?.to_string();
        let mut residual = selector.clone();
        residual.remove(key);
        if self.kind.tag_names.len() > 1 && !residual.contains_key(keys::TAG_NAME) {
            let tags = self.kind.tag_names.iter().map(|tag| SelectorValue::from(*tag)).collect();
            residual.insert(keys::TAG_NAME, SelectorValue::List(tags));
        }
        Some(CompiledQuery { how, value, residual })
    }
}

/// Accumulates predicates and residual constraints for one compilation
struct QueryBuilder<'a> {
    kind: &'static ElementKind,
    selector: &'a Selector,
    context: &'a CompileContext,
    adjacency: Option<Adjacency>,
    handled: HashSet<&'a str>,
    predicates: Vec<String>,
    residual: Selector,
    /// `starts-with` is only emitted when no visibility constraint competes
    allow_prefix: bool,
}

impl<'a> QueryBuilder<'a> {
    fn new(kind: &'static ElementKind, selector: &'a Selector, context: &'a CompileContext) -> Self {
        let mut handled = HashSet::new();
        handled.insert(keys::INDEX);
        handled.insert(keys::ADJACENT);
        Self {
            kind,
            selector,
            context,
            adjacency: selector.adjacency(),
            handled,
            predicates: Vec::new(),
            residual: Selector::new(),
            allow_prefix: !selector.contains_key(keys::VISIBLE) && !selector.contains_key(keys::VISIBLE_TEXT),
        }
    }

    /// Value of a key not yet handled, marking it handled
    fn take(&mut self, key: &'a str) -> Option<&'a SelectorValue> {
        let (key, value) = self.selector.iter().find(|(k, _)| *k == key)?;
        if !self.handled.insert(key) {
            return None;
        }
        Some(value)
    }

    fn push(&mut self, predicate: String) {
        self.predicates.push(predicate);
    }

    fn defer(&mut self, key: &str, value: &SelectorValue) {
        self.residual.insert(key, value.clone());
    }

    /// Start anchor: adjacency axis, merged parent scope, or descendant search.
    /// `children` restricts the search to direct children of the scope.
    fn start(&self, children: bool) -> String {
        let step = if children { "/*" } else { "//*" };
        match (&self.adjacency, &self.context.scope_xpath) {
            (Some(adjacency), _) => format!("./{}::*", adjacency.axis()),
            (None, Some(scope)) => format!("({})[1]{}", scope, step),
            (None, None) => format!(".{}", step),
        }
    }

    /// Path the scope's children are addressed from
    fn scope_prefix(&self) -> String {
        match &self.context.scope_xpath {
            Some(scope) => format!("({})[1]", scope),
            None => ".".to_string(),
        }
    }

    /// Consume `tag_name` when it only repeats what the kind's step already pins
    fn take_own_tag(&mut self) -> Option<String> {
        let tag = self.selector.tag_name()?;
        if !self.kind.tag_names.contains(&tag) {
            return None;
        }
        self.take(keys::TAG_NAME);
        Some(tag.to_string())
    }

    /// Restrict a generic search to the kind's tags when the selector pins none
    fn take_kind_tags(&mut self) {
        if self.kind.tag_names.len() > 1 && !self.selector.contains_key(keys::TAG_NAME) {
            self.push(xpath::any_local_name(self.kind.tag_names));
        }
    }

    fn take_generic_tag(&mut self) {
        let Some(value) = self.take(keys::TAG_NAME) else {
            return;
        };
        match value {
            SelectorValue::Str(tag) => self.push(xpath::local_name(tag)),
            SelectorValue::Regex(pattern) => {
                let (predicate, exact) = self.regex_predicate("local-name()", pattern, false);
                if let Some(predicate) = predicate {
                    self.push(predicate);
                }
                if !exact {
                    self.defer(keys::TAG_NAME, value);
                }
            }
            other => self.defer(keys::TAG_NAME, other),
        }
    }

    /// Consume every key not handled by the strategy, in selector order
    fn take_remaining(&mut self) {
        let selector = self.selector;
        for (key, value) in selector.iter() {
            if !self.handled.insert(key) {
                continue;
            }
            match key {
                keys::TAG_NAME => {
                    self.handled.remove(keys::TAG_NAME);
                    self.take_generic_tag();
                }
                keys::CLASS => self.class_predicate(value),
                keys::TEXT => self.text_predicate(value),
                keys::LABEL_ELEMENT => self.label_predicate(value),
                keys::VISIBLE | keys::VISIBLE_TEXT | keys::VISIBLE_LABEL_ELEMENT => self.defer(key, value),
                _ => self.attribute_predicate(key, value),
            }
        }
    }

    /// Predicate for `lhs` matching a regex and whether it is exact.
    /// `None` when the pattern has no guaranteed literal.
    fn regex_predicate(&self, lhs: &str, pattern: &Pattern, case_insensitive: bool) -> (Option<String>, bool) {
        let decomposition = decompose(pattern.source(), pattern.is_ignore_case());
        if decomposition.is_empty() {
            return (None, false);
        }

        let folded = decomposition.ignore_case || case_insensitive;
        if !folded {
            if let Some(literal) = decomposition.exact_equality() {
                return (Some(xpath::equals(lhs, literal)), true);
            }
            if let Some(literal) = decomposition.exact_prefix() {
                if self.allow_prefix {
                    return (Some(xpath::starts_with(lhs, literal)), true);
                }
            }
            if let Some(literal) = decomposition.exact_containment() {
                return (Some(xpath::contains(lhs, literal)), true);
            }
        }

        let lhs = if folded { xpath::lower_case(lhs) } else { lhs.to_string() };
        let parts: Vec<String> = decomposition
            .substrings
            .iter()
            .filter_map(|part| {
                if !folded {
                    return Some(xpath::contains(&lhs, part));
                }
                // translate() leaves letters outside its table unfolded
                xpath::foldable(part).then(|| xpath::contains(&lhs, &part.to_lowercase()))
            })
            .collect();
        if parts.is_empty() {
            return (None, false);
        }
        (Some(xpath::all_of(&parts)), false)
    }

    /// Predicate for a literal or regex constraint on `lhs` and whether it is exact
    fn value_predicate(&self, lhs: &str, value: &SelectorValue, case_insensitive: bool) -> (Option<String>, bool) {
        match value {
            SelectorValue::Str(text) if case_insensitive && !xpath::foldable(text) => (None, false),
            SelectorValue::Str(text) if case_insensitive => {
                (Some(xpath::equals(&xpath::lower_case(lhs), &text.to_lowercase())), true)
            }
            SelectorValue::Str(text) => (Some(xpath::equals(lhs, text)), true),
            SelectorValue::Regex(pattern) => self.regex_predicate(lhs, pattern, case_insensitive),
            _ => (None, false),
        }
    }

    fn class_predicate(&mut self, value: &SelectorValue) {
        let tokens = match value {
            SelectorValue::List(items) => items.clone(),
            other => vec![other.clone()],
        };

        let mut parts = Vec::new();
        let mut deferred = Vec::new();
        for token in tokens {
            match &token {
                SelectorValue::Bool(true) => parts.push("@class".to_string()),
                SelectorValue::Bool(false) => parts.push("not(@class)".to_string()),
                SelectorValue::Str(class) => match class.strip_prefix('!') {
                    Some(negated) => parts.push(format!("not({})", xpath::class_token(negated))),
                    None => parts.push(xpath::class_token(class)),
                },
                SelectorValue::Regex(pattern) => {
                    // substrings may span token boundaries, so the regex is always re-checked
                    let decomposition = decompose(pattern.source(), pattern.is_ignore_case());
                    if !decomposition.is_empty() {
                        let lhs = if decomposition.ignore_case {
                            xpath::lower_case("@class")
                        } else {
                            "@class".to_string()
                        };
                        let contains: Vec<String> = decomposition
                            .substrings
                            .iter()
                            .filter(|part| !decomposition.ignore_case || xpath::foldable(part))
                            .map(|part| xpath::contains(&lhs, part))
                            .collect();
                        if !contains.is_empty() {
                            parts.push(xpath::all_of(&contains));
                        }
                    }
                    deferred.push(token);
                }
                _ => deferred.push(token),
            }
        }

        if !parts.is_empty() {
            self.push(xpath::all_of(&parts));
        }
        if !deferred.is_empty() {
            self.residual.insert(keys::CLASS, SelectorValue::List(deferred));
        }
    }

    /// Node text; a regex is always re-checked against the rendered text
    fn text_predicate(&mut self, value: &SelectorValue) {
        let (predicate, exact) = self.value_predicate("normalize-space()", value, false);
        if let Some(predicate) = predicate {
            self.push(predicate);
        }
        if !exact || value.is_regex() {
            self.defer(keys::TEXT, value);
        }
    }

    fn label_predicate(&mut self, value: &SelectorValue) {
        let (text, exact) = self.value_predicate("normalize-space()", value, false);
        if let Some(text) = text {
            self.push(format!(
                "@id=//*[local-name()='label'][{text}]/@for or parent::*[local-name()='label'][{text}]"
            ));
        }
        if !exact {
            self.defer(keys::LABEL_ELEMENT, value);
        }
    }

    fn attribute_predicate(&mut self, key: &str, value: &SelectorValue) {
        let wire = kinds::wire_name(self.kind, key);
        let case_insensitive = self.kind.is_case_insensitive(key) || self.kind.is_case_insensitive(&wire);
        let presence = format!("@{}", wire);
        let lhs = if key == keys::HREF { format!("normalize-space({})", presence) } else { presence.clone() };

        match value {
            SelectorValue::Bool(true) => self.push(presence),
            SelectorValue::Bool(false) => self.push(format!("not({})", presence)),
            SelectorValue::Str(_) | SelectorValue::Regex(_) => {
                let (predicate, exact) = self.value_predicate(&lhs, value, case_insensitive);
                self.push(predicate.unwrap_or(presence));
                if !exact {
                    self.defer(key, value);
                }
            }
            other => self.defer(key, other),
        }
    }

    /// Assemble the branches with the collected predicates and place `index`
    fn finish(self, branches: Vec<String>) -> CompiledQuery {
        let filters: String = self.predicates.iter().map(|p| format!("[{}]", p)).collect();
        let mut residual = self.residual;
        let index = self.selector.index();

        let value = match index {
            Some(index) if residual.is_empty() && self.adjacency.is_some() => branches
                .iter()
                .map(|branch| format!("{}{}[{}]", branch, filters, xpath::position(index)))
                .collect::<Vec<_>>()
                .join(" | "),
            _ => {
                let paths = branches
                    .iter()
                    .map(|branch| format!("{}{}", branch, filters))
                    .collect::<Vec<_>>()
                    .join(" | ");
                match index {
                    Some(0) if residual.is_empty() => paths,
                    Some(index) if residual.is_empty() => xpath::nth(&paths, index),
                    Some(index) => {
                        residual.insert(keys::INDEX, index);
                        paths
                    }
                    None => paths,
                }
            }
        };

        CompiledQuery { how: How::XPath, value, residual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{ANCHOR, CHECKBOX, DIV, HEADING, HTML_ELEMENT, INPUT, LIST, TABLE_SECTION};
    use crate::selector::SelectorNormalizer;

    fn compile_for(kind: &'static ElementKind, selector: Selector) -> CompiledQuery {
        let normalized = SelectorNormalizer::new(kind).normalize(&selector).unwrap();
        StructuralQueryCompiler::new(kind).compile(&normalized, &CompileContext::new()).unwrap()
    }

    fn compile(selector: Selector) -> CompiledQuery {
        compile_for(&HTML_ELEMENT, selector)
    }

    #[test]
    fn test_tag_and_class() {
        let query = compile(Selector::new().with("tag_name", "div").with("class_name", "user"));
        assert_eq!(query.how, How::XPath);
        assert_eq!(
            query.value,
            ".//*[local-name()='div'][contains(concat(' ', @class, ' '), ' user ')]"
        );
        assert!(query.is_structural());
    }

    #[test]
    fn test_index_absorbed_when_nothing_residual() {
        let query = compile_for(&DIV, DIV.default_selector().with("index", 3));
        assert_eq!(query.value, "(.//*[local-name()='div'])[4]");
        assert!(query.is_structural());

        let query = compile(Selector::new().with("tag_name", "div").with("index", -1));
        assert_eq!(query.value, "(.//*[local-name()='div'])[last()]");

        let query = compile(Selector::new().with("tag_name", "div").with("index", 0));
        assert_eq!(query.value, ".//*[local-name()='div']");
    }

    #[test]
    fn test_index_deferred_with_residual() {
        let query = compile(
            Selector::new()
                .with("tag_name", "div")
                .with("visible", true)
                .with("index", 2),
        );
        assert_eq!(query.value, ".//*[local-name()='div']");
        assert_eq!(query.residual, Selector::new().with("visible", true).with("index", 2));
    }

    #[test]
    fn test_visible_is_residual() {
        let query = compile(Selector::new().with("tag_name", "div").with("visible", true));
        assert_eq!(query.value, ".//*[local-name()='div']");
        assert_eq!(query.residual, Selector::new().with("visible", true));
    }

    #[test]
    fn test_class_regex_narrows_and_defers() {
        let pattern = Pattern::new("he?r").unwrap();
        let query = compile(Selector::new().with("class_name", pattern.clone()));
        assert_eq!(query.value, ".//*[contains(@class, 'h') and contains(@class, 'r')]");
        assert_eq!(
            query.residual,
            Selector::new().with("class", SelectorValue::List(vec![pattern.into()]))
        );
    }

    #[test]
    fn test_class_tokens() {
        let query = compile(Selector::new().with("class", vec!["a", "!b"]));
        assert_eq!(
            query.value,
            ".//*[contains(concat(' ', @class, ' '), ' a ') and not(contains(concat(' ', @class, ' '), ' b '))]"
        );

        let query = compile(Selector::new().with("class", ""));
        assert_eq!(query.value, ".//*[not(@class)]");
        assert!(query.is_structural());
    }

    #[test]
    fn test_text_literal_and_regex() {
        let query = compile(Selector::new().with("text", "Sign in"));
        assert_eq!(query.value, ".//*[normalize-space()='Sign in']");
        assert!(query.is_structural());

        let pattern = Pattern::new("^Sign").unwrap();
        let query = compile(Selector::new().with("text", pattern.clone()));
        assert_eq!(query.value, ".//*[starts-with(normalize-space(), 'Sign')]");
        assert_eq!(query.residual, Selector::new().with("text", pattern));
    }

    #[test]
    fn test_attribute_forms() {
        let query = compile(
            Selector::new()
                .with("id", "main")
                .with("data_role", true)
                .with("title", false),
        );
        assert_eq!(query.value, ".//*[@id='main'][@data-role][not(@title)]");
    }

    #[test]
    fn test_href_is_trimmed() {
        let query = compile_for(&ANCHOR, ANCHOR.default_selector().with("href", "/home"));
        assert_eq!(query.value, ".//*[local-name()='a'][normalize-space(@href)='/home']");
    }

    #[test]
    fn test_regex_attribute_exactness() {
        let query = compile(Selector::new().with("id", Pattern::new("^main$").unwrap()));
        assert_eq!(query.value, ".//*[@id='main']");
        assert!(query.is_structural());

        let query = compile(Selector::new().with("id", Pattern::new("main").unwrap()));
        assert_eq!(query.value, ".//*[contains(@id, 'main')]");
        assert!(query.is_structural());

        let pattern = Pattern::new("ma.n").unwrap();
        let query = compile(Selector::new().with("id", pattern.clone()));
        assert_eq!(query.value, ".//*[contains(@id, 'ma') and contains(@id, 'n')]");
        assert_eq!(query.residual, Selector::new().with("id", pattern));
    }

    #[test]
    fn test_undecomposable_attribute_regex_requires_presence() {
        let pattern = Pattern::new("a|b").unwrap();
        let query = compile(Selector::new().with("name", pattern.clone()));
        assert_eq!(query.value, ".//*[@name]");
        assert_eq!(query.residual, Selector::new().with("name", pattern));
    }

    #[test]
    fn test_case_insensitive_attribute() {
        let query = compile_for(&CHECKBOX, CHECKBOX.default_selector());
        assert_eq!(
            query.value,
            format!(
                ".//*[local-name()='input'][translate(@type, '{}', '{}')='checkbox']",
                xpath::UPPERCASE,
                xpath::LOWERCASE
            )
        );
    }

    #[test]
    fn test_case_insensitive_anchored_regex_is_rechecked() {
        let pattern = Pattern::new("^Sub").unwrap();
        let query = compile_for(&INPUT, INPUT.default_selector().with("type", pattern.clone()));
        assert_eq!(
            query.value,
            format!(
                ".//*[local-name()='input'][contains(translate(@type, '{}', '{}'), 'sub')]",
                xpath::UPPERCASE,
                xpath::LOWERCASE
            )
        );
        assert_eq!(query.residual, Selector::new().with("type", pattern));
    }

    #[test]
    fn test_folding_outside_translate_table_is_rechecked() {
        let pattern = Pattern::ignore_case("Привет").unwrap();
        let query = compile(Selector::new().with("title", pattern.clone()));
        assert_eq!(query.value, ".//*[@title]");
        assert_eq!(query.residual, Selector::new().with("title", pattern));

        let pattern = Pattern::ignore_case("Crème.*мир").unwrap();
        let query = compile(Selector::new().with("title", pattern.clone()));
        assert_eq!(
            query.value,
            format!(
                ".//*[contains(translate(@title, '{}', '{}'), 'crème')]",
                xpath::UPPERCASE,
                xpath::LOWERCASE
            )
        );
        assert_eq!(query.residual, Selector::new().with("title", pattern));

        let query = compile(Selector::new().with("lang", "ΕΛ"));
        assert_eq!(query.value, ".//*[@lang]");
        assert_eq!(query.residual, Selector::new().with("lang", "ΕΛ"));

        let pattern = Pattern::ignore_case("^Ωμέγα").unwrap();
        let query = compile(Selector::new().with("class", pattern.clone()));
        assert_eq!(query.value, ".//*");
        assert_eq!(query.residual, Selector::new().with("class", vec![pattern]));
    }

    #[test]
    fn test_multi_tag_kinds_pin_their_tags() {
        let query = compile_for(&HEADING, HEADING.default_selector());
        assert_eq!(
            query.value,
            ".//*[local-name()='h1' or local-name()='h2' or local-name()='h3' or \
             local-name()='h4' or local-name()='h5' or local-name()='h6']"
        );
        assert!(query.is_structural());

        let query = compile_for(&HEADING, Selector::new().with("text", "Intro"));
        assert!(query.value.starts_with(".//*[local-name()='h1' or "));
        assert!(query.value.ends_with("local-name()='h6'][normalize-space()='Intro']"));

        let query = compile_for(&LIST, Selector::new().with("index", 1));
        assert_eq!(query.value, "(.//*[local-name()='ul' or local-name()='ol'])[2]");

        let query = compile_for(&LIST, Selector::new().with("tag_name", "ol"));
        assert_eq!(query.value, ".//*[local-name()='ol']");

        let query = compile_for(&TABLE_SECTION, Selector::new().with("class", "totals"));
        assert_eq!(
            query.value,
            ".//*[local-name()='tbody' or local-name()='thead' or local-name()='tfoot']\
             [contains(concat(' ', @class, ' '), ' totals ')]"
        );

        let query = compile_for(&TABLE_SECTION, Selector::new().with("css", "tbody.totals"));
        assert_eq!(query.how, How::Css);
        let sections = vec![SelectorValue::from("tbody"), SelectorValue::from("thead"), SelectorValue::from("tfoot")];
        assert_eq!(query.residual, Selector::new().with("tag_name", SelectorValue::List(sections)));
    }

    #[test]
    fn test_prefix_suppressed_by_visibility() {
        let pattern = Pattern::new("^main").unwrap();
        let query = compile(Selector::new().with("id", pattern.clone()).with("visible", true));
        assert_eq!(query.value, ".//*[contains(@id, 'main')]");
        assert_eq!(query.residual, Selector::new().with("id", pattern).with("visible", true));
    }

    #[test]
    fn test_label_association() {
        let query = compile(Selector::new().with("label", "Name"));
        assert_eq!(
            query.value,
            ".//*[@id=//*[local-name()='label'][normalize-space()='Name']/@for or parent::*[local-name()='label'][normalize-space()='Name']]"
        );
        assert!(query.is_structural());

        let pattern = Pattern::new("a|b").unwrap();
        let query = compile(Selector::new().with("label", pattern.clone()));
        assert_eq!(query.value, ".//*");
        assert_eq!(query.residual, Selector::new().with("label_element", pattern));
    }

    #[test]
    fn test_adjacent_index_in_step() {
        let query = compile(
            Selector::new()
                .with("adjacent", "following_sibling")
                .with("tag_name", "li")
                .with("index", 1),
        );
        assert_eq!(query.value, "./following-sibling::*[local-name()='li'][2]");

        let query = compile(Selector::new().with("adjacent", "ancestor").with("index", 0));
        assert_eq!(query.value, "./ancestor::*[1]");
    }

    #[test]
    fn test_passthrough_keeps_other_keys_residual() {
        let query = compile(Selector::new().with("xpath", "//p").with("tag_name", "p").with("index", 1));
        assert_eq!(query.how, How::XPath);
        assert_eq!(query.value, "//p");
        assert_eq!(query.residual, Selector::new().with("tag_name", "p").with("index", 1));

        let query = compile(Selector::new().with("css", "p.note"));
        assert_eq!(query.how, How::Css);
        assert!(query.is_structural());
    }

    #[test]
    fn test_scope_merge_prefix() {
        let normalized = SelectorNormalizer::new(&HTML_ELEMENT)
            .normalize(&Selector::new().with("tag_name", "span"))
            .unwrap();
        let context = CompileContext::new().with_scope_xpath(".//*[@id='main']");
        let query = StructuralQueryCompiler::new(&HTML_ELEMENT).compile(&normalized, &context).unwrap();
        assert_eq!(query.value, "(.//*[@id='main'])[1]//*[local-name()='span']");
    }

    #[test]
    fn test_every_key_accounted_for() {
        let selector = SelectorNormalizer::new(&HTML_ELEMENT)
            .normalize(
                &Selector::new()
                    .with("tag_name", "div")
                    .with("class", vec!["a"])
                    .with("title", Pattern::new("x|y").unwrap())
                    .with("visible_text", "Hi")
                    .with("data_id", "7")
                    .with("index", 1),
            )
            .unwrap();
        let query = StructuralQueryCompiler::new(&HTML_ELEMENT)
            .compile(&selector, &CompileContext::new())
            .unwrap();

        for key in ["title", "visible_text", "index"] {
            assert!(query.residual.contains_key(key), "{} should be residual", key);
        }
        for key in ["tag_name", "class", "data_id"] {
            assert!(!query.residual.contains_key(key), "{} should be structural", key);
        }
        assert!(query.value.contains("@data-id='7'"));
    }
}
