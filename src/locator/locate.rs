use crate::driver::{Driver, How};
use crate::error::{LocatorError, Result};
use crate::kinds::{ElementKind, QueryStrategy};
use crate::locator::compiler::{CompileContext, CompiledQuery, StructuralQueryCompiler};
use crate::locator::config::LocatorConfig;
use crate::locator::matcher::CandidateMatcher;
use crate::selector::{keys, Adjacency, Selector, SelectorNormalizer, SelectorValue};
use serde::Serialize;

/// Lifecycle of a lazily located element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocatorState {
    NotLocated,
    Locating,
    Located,
    /// The cached handle went stale, or staleness outlasted every retry
    Stale,
    /// The driver legitimately matched nothing
    NotFound,
}

/// Where a query runs: the scope element (or the focused document), plus what
/// the compiler may know about it
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext<H> {
    pub scope: Option<H>,
    pub scope_tag: Option<String>,
    /// Structural XPath of an unlocated parent; queries are anchored at it
    pub scope_xpath: Option<String>,
}

impl<H> QueryContext<H> {
    /// The document currently in focus
    pub fn document() -> Self {
        Self { scope: None, scope_tag: None, scope_xpath: None }
    }

    /// Below a located element
    pub fn element(handle: H, tag: Option<String>) -> Self {
        Self { scope: Some(handle), scope_tag: tag, scope_xpath: None }
    }

    /// Below an unlocated parent, expressed by its XPath and run from the parent's own scope
    pub fn merged(scope: Option<H>, scope_xpath: String, tag: Option<String>) -> Self {
        Self { scope, scope_tag: tag, scope_xpath: Some(scope_xpath) }
    }

    pub fn compile_context(&self) -> CompileContext {
        CompileContext {
            scoped: self.scope.is_some() || self.scope_xpath.is_some(),
            scope_tag: self.scope_tag.clone(),
            scope_xpath: self.scope_xpath.clone(),
        }
    }
}

/// Resolves selectors of one element kind: normalize, compile, fetch, match
pub struct Locator<'a, D: Driver> {
    driver: &'a D,
    kind: &'static ElementKind,
    config: &'a LocatorConfig,
}

impl<'a, D: Driver> Locator<'a, D> {
    pub fn new(driver: &'a D, kind: &'static ElementKind, config: &'a LocatorConfig) -> Self {
        Self { driver, kind, config }
    }

    /// Find the single element a selector describes; `None` when nothing matches
    pub fn locate(&self, selector: &Selector, context: &QueryContext<D::Handle>) -> Result<Option<D::Handle>> {
        let mut selector = SelectorNormalizer::new(self.kind).normalize(selector)?;
        if selector.adjacency().is_some() && !selector.contains_key(keys::INDEX) {
            // nearest relative
            selector.insert(keys::INDEX, 0);
        }
        self.retrying(&selector, || self.locate_once(&selector, context))
    }

    /// Find every element a selector describes, in document order
    pub fn locate_all(&self, selector: &Selector, context: &QueryContext<D::Handle>) -> Result<Vec<D::Handle>> {
        let selector = SelectorNormalizer::new(self.kind).normalize(selector)?;
        if selector.contains_key(keys::INDEX) {
            return Err(LocatorError::IndexWithCollection);
        }
        self.retrying(&selector, || self.locate_all_once(&selector, context))
    }

    /// Compile an already normalized selector for this context
    pub fn compile(&self, selector: &Selector, context: &QueryContext<D::Handle>) -> Result<CompiledQuery> {
        StructuralQueryCompiler::new(self.kind).compile(selector, &context.compile_context())
    }

    fn locate_once(&self, selector: &Selector, context: &QueryContext<D::Handle>) -> Result<Option<D::Handle>> {
        if let Some((how, value)) = self.native_finder(selector, context) {
            let index = selector.index().unwrap_or(0);
            log::debug!("native {} {:?} index {}", how, value, index);
            if index == 0 {
                return Ok(self.driver.find_one(how, value, context.scope.as_ref())?);
            }
            let found = self.driver.find_all(how, value, context.scope.as_ref())?;
            return Ok(pick(found, index));
        }

        let query = self.compile(selector, context)?;
        let candidates = self.fetch(&query, selector, context)?;
        CandidateMatcher::new(self.driver, self.kind).first(candidates, &query.residual)
    }

    fn locate_all_once(&self, selector: &Selector, context: &QueryContext<D::Handle>) -> Result<Vec<D::Handle>> {
        if let Some((how, value)) = self.native_finder(selector, context) {
            log::debug!("native {} {:?} for all", how, value);
            return Ok(self.driver.find_all(how, value, context.scope.as_ref())?);
        }

        let query = self.compile(selector, context)?;
        let candidates = self.fetch(&query, selector, context)?;
        CandidateMatcher::new(self.driver, self.kind).all(candidates, &query.residual)
    }

    /// Run the query; reverse axes are reordered nearest first
    fn fetch(
        &self,
        query: &CompiledQuery,
        selector: &Selector,
        context: &QueryContext<D::Handle>,
    ) -> Result<Vec<D::Handle>> {
        let mut candidates = self.driver.find_all(query.how, &query.value, context.scope.as_ref())?;
        if matches!(selector.adjacency(), Some(Adjacency::Ancestor | Adjacency::PrecedingSibling)) {
            candidates.reverse();
        }
        Ok(candidates)
    }

    /// A single key the driver resolves by itself, besides an optional `index`
    fn native_finder<'s>(&self, selector: &'s Selector, context: &QueryContext<D::Handle>) -> Option<(How, &'s str)> {
        if context.scope_xpath.is_some() {
            return None;
        }
        let mut entries = selector.iter().filter(|(key, _)| *key != keys::INDEX);
        let (key, value) = entries.next()?;
        if entries.next().is_some() {
            return None;
        }
        let SelectorValue::Str(value) = value else {
            return None;
        };
        match key {
            // kinds spanning several tags re-check the tag after the query
            keys::CSS | keys::XPATH | keys::LINK_TEXT | keys::PARTIAL_LINK_TEXT if self.kind.tag_names.len() <= 1 => {
                How::from_key(key).map(|how| (how, value.as_str()))
            }
            keys::TAG_NAME if self.kind.strategy == QueryStrategy::Generic => Some((How::TagName, value.as_str())),
            _ => None,
        }
    }

    /// Retry on stale references with a fixed backoff, then give up with a resolution failure
    fn retrying<T>(&self, selector: &Selector, mut attempt: impl FnMut() -> Result<T>) -> Result<T> {
        let mut retries = 0;
        loop {
            match attempt() {
                Err(err) if err.is_retryable() => {
                    if retries >= self.config.max_retries {
                        log::debug!("giving up on {} after {} retries: {}", selector, retries, err);
                        return Err(LocatorError::ResolutionFailure(selector.to_string()));
                    }
                    retries += 1;
                    log::debug!("{} while locating {}, retry {}/{}", err, selector, retries, self.config.max_retries);
                    std::thread::sleep(self.config.retry_backoff);
                }
                result => return result,
            }
        }
    }
}

/// Element at a zero-based index, negative counting from the end
fn pick<H>(mut found: Vec<H>, index: i64) -> Option<H> {
    if index < 0 {
        let from_end = index.unsigned_abs() as usize;
        if from_end > found.len() {
            return None;
        }
        let at = found.len() - from_end;
        Some(found.swap_remove(at))
    } else {
        let at = index as usize;
        (at < found.len()).then(|| found.swap_remove(at))
    }
}
