//! Literal substring extraction from regular expressions
//!
//! [`decompose`] simplifies a pattern into a sequence of literal characters and
//! wildcards, then splits on the wildcards. Every returned substring is
//! guaranteed to appear in any string the pattern matches. Alternation makes
//! that guarantee impossible without simulating the automaton, so such
//! patterns decompose to nothing.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Char(char),
    Wild,
}

/// Reasons a pattern yields no guaranteed substrings
#[derive(Debug)]
enum Unsupported {
    Alternation,
    Malformed,
    VerboseMode,
}

/// Result of decomposing one pattern
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    /// Distinct literal segments in match order, case-folded when `ignore_case`
    pub substrings: Vec<String>,
    /// Pattern starts with `^` outside any group
    pub anchored_start: bool,
    /// Pattern ends with `$` outside any group
    pub anchored_end: bool,
    /// No wildcard survived simplification: the pattern denotes one literal string
    pub literal: bool,
    /// Case-insensitive, either by the caller's flag or an inline `(?i)`
    pub ignore_case: bool,
}

impl Decomposition {
    fn unsupported(ignore_case: bool) -> Self {
        Self { ignore_case, ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty()
    }

    /// The pattern matches exactly one whole string
    pub fn exact_equality(&self) -> Option<&str> {
        self.exact_literal().filter(|_| self.anchored_start && self.anchored_end)
    }

    /// The pattern matches exactly the strings starting with a literal
    pub fn exact_prefix(&self) -> Option<&str> {
        self.exact_literal().filter(|_| self.anchored_start && !self.anchored_end)
    }

    /// The pattern matches exactly the strings containing a literal
    pub fn exact_containment(&self) -> Option<&str> {
        self.exact_literal().filter(|_| !self.anchored_start && !self.anchored_end)
    }

    fn exact_literal(&self) -> Option<&str> {
        if !self.literal || self.ignore_case {
            return None;
        }
        match self.substrings.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}

/// Extract the literal substrings every match of `pattern` must contain
pub fn decompose(pattern: &str, case_insensitive: bool) -> Decomposition {
    let mut parser = Parser {
        chars: pattern.chars().collect(),
        pos: 0,
        ignore_case: case_insensitive,
        multi_line: false,
        trailing_anchor: false,
    };

    let mut anchored_start = false;
    if parser.peek() == Some('^') {
        parser.pos += 1;
        anchored_start = true;
    }

    let mut tokens = match parser.sequence(0) {
        Ok(tokens) => tokens,
        Err(reason) => {
            log::debug!("no literal substrings in /{}/: {:?}", pattern, reason);
            return Decomposition::unsupported(parser.ignore_case);
        }
    };

    let anchored_end = parser.trailing_anchor;
    if parser.multi_line {
        tokens.insert(0, Token::Wild);
        tokens.push(Token::Wild);
    }

    let literal = !tokens.contains(&Token::Wild);
    let mut substrings: Vec<String> = Vec::new();
    for segment in tokens.split(|t| *t == Token::Wild) {
        let mut text: String = segment
            .iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(*c),
                Token::Wild => None,
            })
            .collect();
        if text.is_empty() {
            continue;
        }
        if parser.ignore_case {
            text = text.to_lowercase();
        }
        if !substrings.contains(&text) {
            substrings.push(text);
        }
    }

    Decomposition {
        substrings,
        anchored_start: anchored_start && !parser.multi_line,
        anchored_end: anchored_end && !parser.multi_line,
        literal: literal && !parser.multi_line,
        ignore_case: parser.ignore_case,
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    ignore_case: bool,
    multi_line: bool,
    trailing_anchor: bool,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Parse until `)` (depth > 0) or end of input (depth 0)
    fn sequence(&mut self, depth: usize) -> Result<Vec<Token>, Unsupported> {
        let mut out = Vec::new();
        while let Some(c) = self.peek() {
            let atom = match c {
                '|' => return Err(Unsupported::Alternation),
                ')' if depth > 0 => {
                    self.pos += 1;
                    return Ok(out);
                }
                ')' => return Err(Unsupported::Malformed),
                '\\' => {
                    self.escape()?;
                    vec![Token::Wild]
                }
                '[' => {
                    self.class()?;
                    vec![Token::Wild]
                }
                '.' => {
                    self.pos += 1;
                    vec![Token::Wild]
                }
                '^' => {
                    self.pos += 1;
                    vec![Token::Wild]
                }
                '$' => {
                    self.pos += 1;
                    if depth == 0 && self.peek().is_none() {
                        self.trailing_anchor = true;
                        continue;
                    }
                    vec![Token::Wild]
                }
                '(' => match self.group(depth)? {
                    Some(content) => content,
                    None => continue,
                },
                '*' | '+' | '?' => return Err(Unsupported::Malformed),
                _ => {
                    self.pos += 1;
                    vec![Token::Char(c)]
                }
            };
            out.extend(self.quantified(atom)?);
        }
        if depth > 0 {
            return Err(Unsupported::Malformed);
        }
        Ok(out)
    }

    /// Skip an escape sequence including `\xHH` digits and `{..}` bodies
    fn escape(&mut self) -> Result<(), Unsupported> {
        self.pos += 1;
        let kind = self.peek().ok_or(Unsupported::Malformed)?;
        self.pos += 1;
        if matches!(kind, 'x' | 'p' | 'P' | 'u' | 'U') && self.peek() == Some('{') {
            while let Some(c) = self.peek() {
                self.pos += 1;
                if c == '}' {
                    return Ok(());
                }
            }
            return Err(Unsupported::Malformed);
        }
        if kind == 'x' {
            self.pos += 2;
        }
        Ok(())
    }

    /// Skip a bracketed character class, nested classes included
    fn class(&mut self) -> Result<(), Unsupported> {
        self.pos += 1;
        if self.peek() == Some('^') {
            self.pos += 1;
        }
        if self.peek() == Some(']') {
            self.pos += 1;
        }
        let mut depth = 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.escape()?;
                    continue;
                }
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(Unsupported::Malformed)
    }

    /// Parse a group; `None` for flag-only groups and lookarounds
    fn group(&mut self, depth: usize) -> Result<Option<Vec<Token>>, Unsupported> {
        self.pos += 1;
        if self.peek() != Some('?') {
            return self.sequence(depth + 1).map(Some);
        }
        self.pos += 1;
        match self.peek() {
            Some(':') => {
                self.pos += 1;
                self.sequence(depth + 1).map(Some)
            }
            Some('=') | Some('!') => {
                self.pos += 1;
                self.skip_group()?;
                Ok(None)
            }
            Some('<') if matches!(self.peek_at(1), Some('=') | Some('!')) => {
                self.pos += 2;
                self.skip_group()?;
                Ok(None)
            }
            Some('P') | Some('<') => {
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    if c == '>' {
                        return self.sequence(depth + 1).map(Some);
                    }
                }
                Err(Unsupported::Malformed)
            }
            _ => {
                let mut negated = false;
                while let Some(c) = self.peek() {
                    self.pos += 1;
                    match c {
                        '-' => negated = true,
                        'i' if !negated => self.ignore_case = true,
                        'm' if !negated => self.multi_line = true,
                        'x' if !negated => return Err(Unsupported::VerboseMode),
                        ')' => return Ok(None),
                        ':' => return self.sequence(depth + 1).map(Some),
                        _ => {}
                    }
                }
                Err(Unsupported::Malformed)
            }
        }
    }

    fn skip_group(&mut self) -> Result<(), Unsupported> {
        let mut depth = 1;
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.escape()?;
                    continue;
                }
                '[' => {
                    self.class()?;
                    continue;
                }
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
        Err(Unsupported::Malformed)
    }

    /// Parse `{m}`, `{m,}` or `{m,n}` at `start`: `(min, max, end)`
    fn counted_repeat_at(&self, start: usize) -> Option<(usize, Option<usize>, usize)> {
        if self.chars.get(start) != Some(&'{') {
            return None;
        }
        let close = start + self.chars[start..].iter().position(|&c| c == '}')?;
        let body: String = self.chars[start + 1..close].iter().collect();
        let (min, max) = match body.split_once(',') {
            None => {
                let m = body.trim().parse().ok()?;
                (m, Some(m))
            }
            Some((m, n)) if n.trim().is_empty() => (m.trim().parse().ok()?, None),
            Some((m, n)) => (m.trim().parse().ok()?, Some(n.trim().parse().ok()?)),
        };
        Some((min, max, close + 1))
    }

    /// Apply the quantifier (if any) following an atom
    fn quantified(&mut self, atom: Vec<Token>) -> Result<Vec<Token>, Unsupported> {
        let result = match self.peek() {
            Some('*') | Some('?') => {
                self.pos += 1;
                vec![Token::Wild]
            }
            Some('+') => {
                self.pos += 1;
                let mut out = atom;
                out.push(Token::Wild);
                out
            }
            Some('{') => match self.counted_repeat_at(self.pos) {
                Some((min, max, end)) => {
                    self.pos = end;
                    let mut out = Vec::with_capacity(atom.len() * min + 1);
                    for _ in 0..min {
                        out.extend_from_slice(&atom);
                    }
                    if max.is_none_or(|max| max > min) || min == 0 {
                        out.push(Token::Wild);
                    }
                    out
                }
                None => return Ok(atom),
            },
            _ => return Ok(atom),
        };
        // lazy or possessive suffix
        if matches!(self.peek(), Some('?') | Some('+')) {
            self.pos += 1;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substrings(pattern: &str) -> Vec<String> {
        decompose(pattern, false).substrings
    }

    #[test]
    fn test_wildcard_split() {
        assert_eq!(substrings("foo.*bar"), vec!["foo", "bar"]);
        assert_eq!(substrings("he?r"), vec!["h", "r"]);
        assert_eq!(substrings("a[0-9]b\\dc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_alternation_fails() {
        assert!(decompose("a|b", false).is_empty());
        assert!(decompose("foo(bar|baz)", false).is_empty());
    }

    #[test]
    fn test_nothing_to_extract() {
        let decomposition = decompose(".*", false);
        assert!(decomposition.is_empty());
        assert!(!decomposition.literal);
    }

    #[test]
    fn test_groups_and_quantifiers() {
        assert_eq!(substrings("x(ab)*y"), vec!["x", "y"]);
        assert_eq!(substrings("x(ab)+y"), vec!["xab", "y"]);
        assert_eq!(substrings("(ab){2}c"), vec!["ababc"]);
        assert_eq!(substrings("(ab){2,}c"), vec!["abab", "c"]);
        assert_eq!(substrings("(ab){2,3}c"), vec!["abab", "c"]);
        assert_eq!(substrings("a{3}"), vec!["aaa"]);
        assert_eq!(substrings("ab+?c"), vec!["ab", "c"]);
        assert_eq!(substrings("(?:foo)bar"), vec!["foobar"]);
        assert_eq!(substrings("(?P<word>foo)bar"), vec!["foobar"]);
    }

    #[test]
    fn test_duplicates_removed() {
        assert_eq!(substrings("ab.ab.cd"), vec!["ab", "cd"]);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(decompose("Foo.Bar", true).substrings, vec!["foo", "bar"]);
        let inline = decompose("(?i)Submit", false);
        assert!(inline.ignore_case);
        assert_eq!(inline.substrings, vec!["submit"]);
    }

    #[test]
    fn test_anchors() {
        let exact = decompose("^exact$", false);
        assert!(exact.anchored_start && exact.anchored_end && exact.literal);
        assert_eq!(exact.exact_equality(), Some("exact"));
        assert_eq!(exact.exact_prefix(), None);

        let prefix = decompose("^Sub", false);
        assert_eq!(prefix.exact_prefix(), Some("Sub"));
        assert_eq!(prefix.exact_containment(), None);

        let contains = decompose("mid", false);
        assert_eq!(contains.exact_containment(), Some("mid"));

        let suffix = decompose("end$", false);
        assert!(suffix.anchored_end);
        assert_eq!(suffix.exact_containment(), None);
        assert_eq!(suffix.substrings, vec!["end"]);
    }

    #[test]
    fn test_inner_anchor_is_wildcard() {
        let decomposition = decompose("a^b", false);
        assert_eq!(decomposition.substrings, vec!["a", "b"]);
        assert!(!decomposition.anchored_start);
    }

    #[test]
    fn test_case_insensitive_is_never_exact() {
        let decomposition = decompose("^exact$", true);
        assert_eq!(decomposition.exact_equality(), None);
        assert_eq!(decomposition.substrings, vec!["exact"]);
    }

    #[test]
    fn test_multi_line_drops_anchors() {
        let decomposition = decompose("(?m)^line$", false);
        assert!(!decomposition.anchored_start);
        assert!(!decomposition.anchored_end);
        assert_eq!(decomposition.substrings, vec!["line"]);
    }

    #[test]
    fn test_lookaround_removed() {
        assert_eq!(substrings("foo(?=bar)baz"), vec!["foobaz"]);
    }

    #[test]
    fn test_verbose_mode_unsupported() {
        assert!(decompose("(?x) a b", false).is_empty());
    }
}
