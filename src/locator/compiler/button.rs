//! Buttons: `button` elements plus `input` elements of a button type.
//! Text is the node text of a `button` and the `value` of an `input`.

use super::{xpath, QueryBuilder};
use crate::kinds::BUTTON_INPUT_TYPES;
use crate::selector::keys;

pub(super) fn plan(builder: &mut QueryBuilder<'_>) -> Vec<String> {
    builder.take_own_tag();

    let input_types: Vec<String> = BUTTON_INPUT_TYPES
        .iter()
        .map(|ty| xpath::equals(&xpath::lower_case("@type"), ty))
        .collect();
    builder.push(format!(
        "{} or ({} and {})",
        xpath::local_name("button"),
        xpath::local_name("input"),
        xpath::any_of(&input_types)
    ));

    if let Some(value) = builder.take(keys::TEXT) {
        let (node_text, node_exact) = builder.value_predicate("normalize-space()", value, false);
        let (input_value, _) = builder.value_predicate("@value", value, false);
        if let (Some(node_text), Some(input_value)) = (node_text, input_value) {
            builder.push(format!(
                "({} and {}) or ({} and {})",
                xpath::local_name("button"),
                xpath::grouped(&node_text),
                xpath::local_name("input"),
                xpath::grouped(&input_value)
            ));
        }
        if !node_exact || value.is_regex() {
            builder.defer(keys::TEXT, value);
        }
    }

    vec![builder.start(false)]
}
