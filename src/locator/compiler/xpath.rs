//! XPath 1.0 fragments

/// Characters folded by [`lower_case`]
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZÀÁÂÃÄÅÆÇÈÉÊËÌÍÎÏÐÑÒÓÔÕÖØÙÚÛÜÝÞŸŽŠŒ";
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyzàáâãäåæçèéêëìíîïðñòóôõöøùúûüýþÿžšœ";

/// Quote a string as an XPath literal.
///
/// XPath 1.0 has no escape sequences, so a value holding both quote kinds is
/// assembled with `concat()`.
pub fn literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{}'", value);
    }
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

pub fn lower_case(expr: &str) -> String {
    format!("translate({}, '{}', '{}')", expr, UPPERCASE, LOWERCASE)
}

/// Whether [`lower_case`] folds every cased character of `text`
pub fn foldable(text: &str) -> bool {
    text.chars()
        .filter(|c| c.is_lowercase() || c.is_uppercase())
        .all(|c| LOWERCASE.contains(c) || UPPERCASE.contains(c))
}

pub fn equals(lhs: &str, value: &str) -> String {
    format!("{}={}", lhs, literal(value))
}

pub fn contains(lhs: &str, value: &str) -> String {
    format!("contains({}, {})", lhs, literal(value))
}

pub fn starts_with(lhs: &str, value: &str) -> String {
    format!("starts-with({}, {})", lhs, literal(value))
}

pub fn local_name(tag: &str) -> String {
    equals("local-name()", tag)
}

/// Element named any of `tags`, as one predicate body
pub fn any_local_name(tags: &[&str]) -> String {
    tags.iter().map(|tag| local_name(tag)).collect::<Vec<_>>().join(" or ")
}

/// One token of a space-separated `class` attribute
pub fn class_token(token: &str) -> String {
    format!("contains(concat(' ', @class, ' '), {})", literal(&format!(" {} ", token)))
}

/// Disjunction, parenthesized when it has to live inside a conjunction
pub fn any_of(parts: &[String]) -> String {
    match parts {
        [only] => only.clone(),
        _ => format!("({})", parts.join(" or ")),
    }
}

pub fn all_of(parts: &[String]) -> String {
    parts.join(" and ")
}

/// Wrap a conjunction so it can be or-ed with other terms
pub fn grouped(expr: &str) -> String {
    if expr.contains(" and ") || expr.contains(" or ") {
        format!("({})", expr)
    } else {
        expr.to_string()
    }
}

/// Positional predicate body for a zero-based index, negative counting from the end
pub fn position(index: i64) -> String {
    match index {
        i if i >= 0 => (i + 1).to_string(),
        -1 => "last()".to_string(),
        i => format!("last()-{}", -i - 1),
    }
}

/// Select one node of the whole result set of `path`
pub fn nth(path: &str, index: i64) -> String {
    format!("({})[{}]", path, position(index))
}
