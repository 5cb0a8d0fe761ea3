use super::{keys, Adjacency, Selector, SelectorValue};
use crate::deprecation::Deprecation;
use crate::error::{LocatorError, Result};
use crate::kinds::{ANCHOR, ElementKind};

/// Value types accepted for a key, used in validation messages
#[derive(Debug, Clone, Copy)]
enum Allowed {
    Int,
    Bool,
    Str,
    StrOrRegex,
    StrRegexOrBool,
}

impl Allowed {
    fn accepts(&self, value: &SelectorValue) -> bool {
        matches!(
            (self, value),
            (Allowed::Int, SelectorValue::Int(_))
                | (Allowed::Bool, SelectorValue::Bool(_))
                | (Allowed::Str, SelectorValue::Str(_))
                | (Allowed::StrOrRegex, SelectorValue::Str(_) | SelectorValue::Regex(_))
                | (
                    Allowed::StrRegexOrBool,
                    SelectorValue::Str(_) | SelectorValue::Regex(_) | SelectorValue::Bool(_)
                )
        )
    }

    fn describe(&self) -> &'static str {
        match self {
            Allowed::Int => "Int",
            Allowed::Bool => "Bool",
            Allowed::Str => "String",
            Allowed::StrOrRegex => "String, Regex",
            Allowed::StrRegexOrBool => "String, Regex, Bool",
        }
    }
}

fn invalid(key: &str, value: &SelectorValue, expected: &str) -> LocatorError {
    LocatorError::InvalidSelectorValue {
        key: key.to_string(),
        value: format!("{} ({})", value, value.type_name()),
        expected: expected.to_string(),
    }
}

fn expect(key: &str, value: &SelectorValue, allowed: Allowed) -> Result<SelectorValue> {
    if allowed.accepts(value) {
        Ok(value.clone())
    } else {
        Err(invalid(key, value, allowed.describe()))
    }
}

/// Validates a raw selector and reshapes it into canonical form.
///
/// Normalization is a projection: normalizing a normalized selector returns it
/// unchanged.
#[derive(Debug, Clone, Copy)]
pub struct SelectorNormalizer {
    kind: &'static ElementKind,
}

impl SelectorNormalizer {
    pub fn new(kind: &'static ElementKind) -> Self {
        Self { kind }
    }

    pub fn normalize(&self, raw: &Selector) -> Result<Selector> {
        Self::check_native_conflicts(raw)?;

        let mut normalized = Selector::new();
        let mut classes: Option<Vec<SelectorValue>> = None;

        for (key, value) in raw.iter() {
            match key {
                keys::INDEX => {
                    normalized.insert(key, expect(key, value, Allowed::Int)?);
                }
                keys::ADJACENT => {
                    normalized.insert(key, Self::adjacency(value)?);
                }
                keys::TAG_NAME => {
                    let tag = match value {
                        SelectorValue::Str(tag) => SelectorValue::Str(tag.to_ascii_lowercase()),
                        SelectorValue::Regex(_) => value.clone(),
                        _ => return Err(invalid(key, value, Allowed::StrOrRegex.describe())),
                    };
                    normalized.insert(key, tag);
                }
                keys::CSS | keys::XPATH | keys::LINK_TEXT | keys::PARTIAL_LINK_TEXT => {
                    normalized.insert(key, expect(key, value, Allowed::Str)?);
                }
                keys::LINK => {
                    Deprecation::LinkLocator.warn();
                    normalized.insert(keys::LINK_TEXT, expect(key, value, Allowed::Str)?);
                }
                keys::VISIBLE => {
                    normalized.insert(key, expect(key, value, Allowed::Bool)?);
                }
                keys::CAPTION => {
                    normalized.insert(keys::TEXT, expect(key, value, Allowed::StrOrRegex)?);
                }
                keys::TEXT | keys::VISIBLE_TEXT | keys::LABEL_ELEMENT | keys::VISIBLE_LABEL_ELEMENT => {
                    normalized.insert(key, expect(key, value, Allowed::StrOrRegex)?);
                }
                keys::LABEL => {
                    let value = expect(key, value, Allowed::StrOrRegex)?;
                    if self.kind.declares(keys::LABEL) {
                        normalized.insert(keys::LABEL, value);
                    } else {
                        normalized.insert(keys::LABEL_ELEMENT, value);
                    }
                }
                keys::VISIBLE_LABEL => {
                    normalized.insert(keys::VISIBLE_LABEL_ELEMENT, expect(key, value, Allowed::StrOrRegex)?);
                }
                keys::CLASS | keys::CLASS_NAME => {
                    let tokens = Self::class_tokens(key, value)?;
                    if classes.is_none() {
                        // reserve the position of the first class key
                        normalized.insert(keys::CLASS, SelectorValue::List(Vec::new()));
                    }
                    classes.get_or_insert_with(Vec::new).extend(tokens);
                }
                _ => {
                    normalized.insert(key, expect(key, value, Allowed::StrRegexOrBool)?);
                }
            }
        }

        if let Some(tokens) = classes {
            let tokens = if tokens.is_empty() { vec![SelectorValue::Bool(false)] } else { tokens };
            normalized.insert(keys::CLASS, SelectorValue::List(tokens));
        }

        self.check_link_target(&normalized)?;
        Self::check_combinations(&normalized)?;
        Ok(normalized)
    }

    fn check_native_conflicts(raw: &Selector) -> Result<()> {
        let natives: Vec<String> = raw
            .keys()
            .filter(|key| keys::NATIVE_LOCATORS.contains(key))
            .map(str::to_string)
            .collect();
        if natives.len() > 1 {
            return Err(LocatorError::ConflictingLocators(natives));
        }
        Ok(())
    }

    fn adjacency(value: &SelectorValue) -> Result<SelectorValue> {
        let parsed = match value {
            SelectorValue::Adjacent(adjacency) => Some(*adjacency),
            SelectorValue::Str(name) => Adjacency::parse(name),
            _ => None,
        };
        parsed.map(SelectorValue::Adjacent).ok_or_else(|| {
            invalid(keys::ADJACENT, value, "ancestor, following_sibling, preceding_sibling, child")
        })
    }

    fn class_tokens(key: &str, value: &SelectorValue) -> Result<Vec<SelectorValue>> {
        match value {
            SelectorValue::Str(classes) => Ok(classes.split_whitespace().map(SelectorValue::from).collect()),
            SelectorValue::Regex(_) | SelectorValue::Bool(_) => Ok(vec![value.clone()]),
            SelectorValue::List(items) => {
                let mut tokens = Vec::new();
                for item in items {
                    match item {
                        SelectorValue::List(_) => {
                            return Err(invalid(key, value, "String, Regex, Bool, or a List of them"));
                        }
                        _ => tokens.extend(Self::class_tokens(key, item)?),
                    }
                }
                Ok(tokens)
            }
            _ => Err(invalid(key, value, "String, Regex, Bool, or a List of them")),
        }
    }

    /// Link-text finders only ever match anchors
    fn check_link_target(&self, selector: &Selector) -> Result<()> {
        let Some(key) = [keys::LINK_TEXT, keys::PARTIAL_LINK_TEXT]
            .into_iter()
            .find(|key| selector.contains_key(key))
        else {
            return Ok(());
        };

        let kind_allows = self.kind.is_generic() || *self.kind == ANCHOR;
        let tag = match selector.get(keys::TAG_NAME) {
            None => None,
            Some(SelectorValue::Str(tag)) => Some(tag.clone()),
            Some(other) => Some(other.to_string()),
        };
        if kind_allows && tag.as_deref().is_none_or(|tag| tag == "a") {
            return Ok(());
        }
        Err(LocatorError::DeprecatedLocatorMisuse {
            key: key.to_string(),
            tag: tag.unwrap_or_else(|| self.kind.name.to_string()),
        })
    }

    fn check_combinations(selector: &Selector) -> Result<()> {
        let Some(adjacency) = selector.adjacency() else {
            return Ok(());
        };
        if let Some(native) = selector.keys().find(|key| keys::NATIVE_LOCATORS.contains(key)) {
            return Err(LocatorError::UnsupportedCombination(format!(
                "{} can not be combined with {}",
                keys::ADJACENT,
                native
            )));
        }
        if adjacency == Adjacency::Ancestor && selector.contains_key(keys::TEXT) {
            return Err(LocatorError::UnsupportedCombination(
                "text can not be evaluated on ancestors".to_string(),
            ));
        }
        Ok(())
    }
}
