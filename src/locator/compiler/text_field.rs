//! Text fields: `input` elements whose `type` accepts free text.
//! Their text is the `value` attribute.

use super::{xpath, QueryBuilder};
use crate::error::{LocatorError, Result};
use crate::kinds::NON_TEXT_INPUT_TYPES;
use crate::selector::{keys, SelectorValue};

pub(super) fn plan(builder: &mut QueryBuilder<'_>) -> Result<Vec<String>> {
    builder.take_own_tag();
    builder.push(xpath::local_name("input"));

    match builder.selector.get(keys::TYPE) {
        Some(SelectorValue::Str(ty)) => {
            if NON_TEXT_INPUT_TYPES.contains(&ty.to_ascii_lowercase().as_str()) {
                return Err(LocatorError::InvalidSelectorValue {
                    key: keys::TYPE.to_string(),
                    value: format!("{:?}", ty),
                    expected: "a text input type".to_string(),
                });
            }
        }
        _ => builder.push(excluded_types()),
    }

    if let Some(value) = builder.take(keys::TEXT) {
        let (predicate, exact) = builder.value_predicate("@value", value, false);
        if let Some(predicate) = predicate {
            builder.push(predicate);
        }
        if !exact {
            builder.defer(keys::TEXT, value);
        }
    }

    Ok(vec![builder.start(false)])
}

/// `type` absent, or not one of the types that never take text
fn excluded_types() -> String {
    let types: Vec<String> = NON_TEXT_INPUT_TYPES
        .iter()
        .map(|ty| xpath::equals(&xpath::lower_case("@type"), ty))
        .collect();
    format!("not(@type) or not({})", types.join(" or "))
}
