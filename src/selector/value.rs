use crate::error::{LocatorError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A caller-supplied regular expression.
///
/// Equality compares the source and the case flag, never the compiled automaton.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "RawPattern", into = "RawPattern")]
pub struct Pattern {
    source: String,
    ignore_case: bool,
    regex: Regex,
}

#[derive(Serialize, Deserialize)]
struct RawPattern {
    regex: String,
    #[serde(default)]
    ignore_case: bool,
}

impl Pattern {
    /// Compile a case-sensitive pattern
    pub fn new(source: impl Into<String>) -> Result<Self> {
        Self::with_ignore_case(source, false)
    }

    /// Compile a case-insensitive pattern
    pub fn ignore_case(source: impl Into<String>) -> Result<Self> {
        Self::with_ignore_case(source, true)
    }

    pub fn with_ignore_case(source: impl Into<String>, ignore_case: bool) -> Result<Self> {
        let source = source.into();
        let regex = RegexBuilder::new(&source)
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| LocatorError::InvalidPattern(e.to_string()))?;
        Ok(Self { source, ignore_case, regex })
    }

    /// Pattern exactly matching a literal string
    pub fn literal(text: &str, ignore_case: bool) -> Result<Self> {
        Self::with_ignore_case(regex::escape(text), ignore_case)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Unanchored search, the way `=~` behaves
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.ignore_case == other.ignore_case
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, if self.ignore_case { "i" } else { "" })
    }
}

impl TryFrom<RawPattern> for Pattern {
    type Error = LocatorError;

    fn try_from(raw: RawPattern) -> Result<Self> {
        Self::with_ignore_case(raw.regex, raw.ignore_case)
    }
}

impl From<Pattern> for RawPattern {
    fn from(pattern: Pattern) -> Self {
        Self { regex: pattern.source, ignore_case: pattern.ignore_case }
    }
}

/// Relative position searched by an adjacency directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjacency {
    Ancestor,
    FollowingSibling,
    PrecedingSibling,
    Child,
}

impl Adjacency {
    /// XPath axis name
    pub fn axis(&self) -> &'static str {
        match self {
            Adjacency::Ancestor => "ancestor",
            Adjacency::FollowingSibling => "following-sibling",
            Adjacency::PrecedingSibling => "preceding-sibling",
            Adjacency::Child => "child",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ancestor" | "parent" => Some(Adjacency::Ancestor),
            "following_sibling" | "following-sibling" => Some(Adjacency::FollowingSibling),
            "preceding_sibling" | "preceding-sibling" => Some(Adjacency::PrecedingSibling),
            "child" => Some(Adjacency::Child),
            _ => None,
        }
    }
}

/// Value of one selector entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectorValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Regex(Pattern),
    List(Vec<SelectorValue>),
    Adjacent(Adjacency),
}

impl SelectorValue {
    /// Type name used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SelectorValue::Bool(_) => "Bool",
            SelectorValue::Int(_) => "Int",
            SelectorValue::Str(_) => "String",
            SelectorValue::Regex(_) => "Regex",
            SelectorValue::List(_) => "List",
            SelectorValue::Adjacent(_) => "Adjacent",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SelectorValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SelectorValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SelectorValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            SelectorValue::Regex(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, SelectorValue::Regex(_))
    }
}

impl fmt::Display for SelectorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorValue::Bool(b) => write!(f, "{}", b),
            SelectorValue::Int(i) => write!(f, "{}", i),
            SelectorValue::Str(s) => write!(f, "{:?}", s),
            SelectorValue::Regex(p) => write!(f, "{}", p),
            SelectorValue::List(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            SelectorValue::Adjacent(a) => write!(f, ":{}", a.axis()),
        }
    }
}

impl From<&str> for SelectorValue {
    fn from(value: &str) -> Self {
        SelectorValue::Str(value.to_string())
    }
}

impl From<String> for SelectorValue {
    fn from(value: String) -> Self {
        SelectorValue::Str(value)
    }
}

impl From<bool> for SelectorValue {
    fn from(value: bool) -> Self {
        SelectorValue::Bool(value)
    }
}

impl From<i64> for SelectorValue {
    fn from(value: i64) -> Self {
        SelectorValue::Int(value)
    }
}

impl From<i32> for SelectorValue {
    fn from(value: i32) -> Self {
        SelectorValue::Int(i64::from(value))
    }
}

impl From<Pattern> for SelectorValue {
    fn from(value: Pattern) -> Self {
        SelectorValue::Regex(value)
    }
}

impl From<Adjacency> for SelectorValue {
    fn from(value: Adjacency) -> Self {
        SelectorValue::Adjacent(value)
    }
}

impl<T: Into<SelectorValue>> From<Vec<T>> for SelectorValue {
    fn from(values: Vec<T>) -> Self {
        SelectorValue::List(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_equality_ignores_automaton() {
        let a = Pattern::new("he?r").unwrap();
        let b = Pattern::new("he?r").unwrap();
        let c = Pattern::ignore_case("he?r").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.to_string(), "/he?r/i");
    }

    #[test]
    fn test_pattern_search_semantics() {
        let pattern = Pattern::ignore_case("^SUB").unwrap();
        assert!(pattern.is_match("submit"));
        assert!(!Pattern::new("^SUB").unwrap().is_match("submit"));
        assert!(Pattern::literal("a.b", false).unwrap().is_match("xa.by"));
        assert!(!Pattern::literal("a.b", false).unwrap().is_match("axb"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, LocatorError::InvalidPattern(_)));
    }

    #[test]
    fn test_value_deserialization() {
        let value: SelectorValue = serde_json::from_str(r#"{"regex": "foo.*bar", "ignore_case": true}"#).unwrap();
        assert_eq!(value, SelectorValue::Regex(Pattern::ignore_case("foo.*bar").unwrap()));

        let value: SelectorValue = serde_json::from_str(r#"["a", true, 3]"#).unwrap();
        assert_eq!(
            value,
            SelectorValue::List(vec!["a".into(), true.into(), 3.into()])
        );
    }

    #[test]
    fn test_adjacency_parse() {
        assert_eq!(Adjacency::parse("parent"), Some(Adjacency::Ancestor));
        assert_eq!(Adjacency::parse("following_sibling").unwrap().axis(), "following-sibling");
        assert_eq!(Adjacency::parse("cousin"), None);
    }
}
