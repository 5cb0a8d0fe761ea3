//! Selector resolution
//!
//! A selector travels through four stages before it names a DOM node:
//! 1. [`SelectorNormalizer`](crate::selector::SelectorNormalizer) validates and canonicalizes it
//! 2. [`StructuralQueryCompiler`] turns what it can into one XPath, leaving a residual
//! 3. the driver runs the query
//! 4. [`CandidateMatcher`] filters the candidates against the residual
//!
//! [`Locator`] drives the stages and retries when the page changes underneath.

pub mod compiler;
pub mod config;
pub mod locate;
pub mod matcher;
pub mod regex_decomposer;

pub use compiler::{CompileContext, CompiledQuery, StructuralQueryCompiler};
pub use config::LocatorConfig;
pub use locate::{Locator, LocatorState, QueryContext};
pub use matcher::{CandidateMatcher, MatchMode};
pub use regex_decomposer::{decompose, Decomposition};

use crate::error::Result;
use crate::kinds::ElementKind;
use crate::selector::{Selector, SelectorNormalizer};

/// Normalize and compile a selector against the document, without a driver
pub fn explain(kind: &'static ElementKind, selector: &Selector) -> Result<CompiledQuery> {
    let normalized = SelectorNormalizer::new(kind).normalize(&kind.default_selector().merged(selector))?;
    StructuralQueryCompiler::new(kind).compile(&normalized, &CompileContext::new())
}
