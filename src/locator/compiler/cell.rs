//! Cells: `th`/`td` direct children of the scope, so cells of nested
//! tables never match. From a document every cell is searched.

use super::{xpath, QueryBuilder};

pub(super) fn plan(builder: &mut QueryBuilder<'_>) -> Vec<String> {
    let predicate = match builder.take_own_tag() {
        Some(tag) => xpath::local_name(&tag),
        None => xpath::any_local_name(&["th", "td"]),
    };
    builder.push(predicate);
    vec![builder.start(builder.context.scoped)]
}
