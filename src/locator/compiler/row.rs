//! Rows: `tr` children of a table, directly or through its sections.
//! Under a section only its direct `tr` children are searched; from a
//! document every `tr` is.

use super::{xpath, QueryBuilder};

const SECTIONS: [&str; 3] = ["tbody", "thead", "tfoot"];

pub(super) fn plan(builder: &mut QueryBuilder<'_>) -> Vec<String> {
    builder.take_own_tag();
    let row = xpath::local_name("tr");

    if builder.adjacency.is_some() || !builder.context.scoped {
        builder.push(row);
        return vec![builder.start(false)];
    }

    let prefix = builder.scope_prefix();
    let mut branches = vec![format!("{}/*[{}]", prefix, row)];
    let in_section = builder
        .context
        .scope_tag
        .as_deref()
        .is_some_and(|tag| SECTIONS.contains(&tag.to_ascii_lowercase().as_str()));
    if !in_section {
        for section in SECTIONS {
            branches.push(format!("{}/*[{}]/*[{}]", prefix, xpath::local_name(section), row));
        }
    }
    branches
}

#[cfg(test)]
mod tests {
    use crate::kinds::ROW;
    use crate::locator::compiler::{CompileContext, StructuralQueryCompiler};
    use crate::selector::{Selector, SelectorNormalizer};

    fn compile(selector: Selector, context: &CompileContext) -> crate::locator::CompiledQuery {
        let selector = SelectorNormalizer::new(&ROW)
            .normalize(&ROW.default_selector().merged(&selector))
            .unwrap();
        StructuralQueryCompiler::new(&ROW).compile(&selector, context).unwrap()
    }

    #[test]
    fn test_table_scope_unions_sections() {
        let query = compile(Selector::new(), &CompileContext::new().with_scope_tag("table"));
        assert_eq!(
            query.value,
            "./*[local-name()='tr'] | ./*[local-name()='tbody']/*[local-name()='tr'] | \
             ./*[local-name()='thead']/*[local-name()='tr'] | ./*[local-name()='tfoot']/*[local-name()='tr']"
        );
    }

    #[test]
    fn test_section_scope_direct_rows() {
        let query = compile(Selector::new().with("id", "r1"), &CompileContext::new().with_scope_tag("TBODY"));
        assert_eq!(query.value, "./*[local-name()='tr'][@id='r1']");
    }

    #[test]
    fn test_index_wraps_union() {
        let query = compile(Selector::new().with("index", -1), &CompileContext::new().with_scope_tag("tbody"));
        assert_eq!(query.value, "(./*[local-name()='tr'])[last()]");
    }

    #[test]
    fn test_document_scope_searches_descendants() {
        let query = compile(Selector::new().with("id", "r2"), &CompileContext::new());
        assert_eq!(query.value, ".//*[local-name()='tr'][@id='r2']");
    }

    #[test]
    fn test_untagged_element_scope_unions_sections() {
        let query = compile(Selector::new(), &CompileContext::new().scoped());
        assert_eq!(query.value.matches(" | ").count(), 3);
        assert!(query.value.starts_with("./*[local-name()='tr']"));
    }

    #[test]
    fn test_predicates_apply_to_every_branch() {
        let query = compile(Selector::new().with("class", "odd"), &CompileContext::new().with_scope_tag("table"));
        assert_eq!(query.value.matches("[contains(concat(' ', @class, ' '), ' odd ')]").count(), 4);
    }
}
