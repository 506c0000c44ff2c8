use regex::bytes::Regex;

use crate::token::Token;

/// A compiled form of a stored token, ready to be tested against a literal
/// query token.
///
/// Mirrors the literal/regex split the teacher's `compiler.rs` uses for
/// `Component`: purely literal tokens (the common case) are compared
/// byte-for-byte rather than through the regex engine.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    Literal,
    Glob(Regex),
}

/// Compile `token`'s text into a [`CompiledPattern`].
///
/// Never fails: a pattern with no metacharacters compiles to
/// [`CompiledPattern::Literal`], and a pattern with metacharacters always
/// produces a valid anchored regex, since every character we pass to the
/// class builder is either a literal (escaped) or a recognized
/// metacharacter. An unmatched `[` degrades to being treated as a literal
/// character (see [`glob_to_regex`]).
pub fn compile_pattern(token: &Token) -> CompiledPattern {
    let text = token.as_str();

    if !has_metacharacters(text) {
        return CompiledPattern::Literal;
    }

    let regex_source = glob_to_regex(text);
    match Regex::new(&regex_source) {
        Ok(regex) => CompiledPattern::Glob(regex),
        // Unreachable in practice: `glob_to_regex` only ever emits valid
        // anchored regex syntax. Fall back to literal matching rather than
        // panic, per the infallibility contract in spec §4.5/§7.
        Err(_) => CompiledPattern::Literal,
    }
}

/// `true` iff `pattern` contains no glob metacharacters, i.e. it can only
/// ever match a literal of the exact same text.
fn has_metacharacters(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Test whether `literal` conforms to the compiled form of a stored pattern
/// token.
pub fn pattern_matches(compiled: &CompiledPattern, pattern_text: &str, literal: &str) -> bool {
    match compiled {
        CompiledPattern::Literal => pattern_text == literal,
        CompiledPattern::Glob(regex) => regex.is_match(literal.as_bytes()),
    }
}

/// Translate a single glob token into an anchored byte-regex source string.
///
/// - `*` -> `.*`
/// - `?` -> `.`
/// - `[abc]`, `[a-z]` -> `[abc]`, `[a-z]` (passed through, already valid
///   character-class syntax)
/// - `[!abc]` -> `[^abc]` (leading `!` negation becomes `^`)
/// - An unmatched `[` (no corresponding `]`) is treated as a literal `[`
///   rather than rejected, per spec §4.5's tolerance of malformed patterns.
/// - Every other character is escaped and matched literally.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                out.push_str(".*");
                i += 1;
            }
            '?' => {
                out.push('.');
                i += 1;
            }
            '[' => match find_class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..=end]));
                    i = end + 1;
                }
                None => {
                    // Unmatched '[': fall back to a literal bracket.
                    out.push_str("\\[");
                    i += 1;
                }
            },
            other => {
                out.push_str(&regex::escape(&other.to_string()));
                i += 1;
            }
        }
    }

    out.push('$');
    out
}

/// Find the index of the `]` that closes the class opened at `start` (which
/// must point at `[`), if any.
fn find_class_end(chars: &[char], start: usize) -> Option<usize> {
    debug_assert_eq!(chars[start], '[');

    // A leading '!' or a ']' immediately after '[' (or after "[!") is a
    // literal member of the class rather than the closing bracket, matching
    // common shell-glob behavior.
    let mut i = start + 1;
    if chars.get(i) == Some(&'!') {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }

    while i < chars.len() {
        if chars[i] == ']' {
            return Some(i);
        }
        i += 1;
    }

    None
}

/// Translate a complete `[...]` class (including the brackets) into regex
/// character-class syntax.
fn translate_class(class_chars: &[char]) -> String {
    debug_assert_eq!(class_chars[0], '[');
    debug_assert_eq!(*class_chars.last().unwrap(), ']');

    let inner = &class_chars[1..class_chars.len() - 1];
    let (negated, body) = match inner.first() {
        Some('!') => (true, &inner[1..]),
        _ => (false, inner),
    };

    let mut out = String::from("[");
    if negated {
        out.push('^');
    }
    for &c in body {
        if c == '^' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The ordering key described in spec §4.1's `PatternLess`: the longest
    /// literal prefix of `pattern` (the substring preceding the first
    /// metacharacter). Purely literal patterns fall into their own distinct
    /// bucket; patterns sharing a literal stem cluster together.
    ///
    /// This crate stores children in a flat vector scanned linearly rather
    /// than an ordered multimap (see DESIGN.md), so this key is never used to
    /// order storage at runtime — it is exercised here only to pin down the
    /// normative definition from spec §4.1.
    fn pattern_key(pattern: &str) -> &str {
        let end = pattern.find(['*', '?', '[']).unwrap_or(pattern.len());
        &pattern[..end]
    }

    fn matches(pattern: &str, literal: &str) -> bool {
        let token = Token::new(pattern);
        let compiled = compile_pattern(&token);
        pattern_matches(&compiled, pattern, literal)
    }

    #[test]
    fn literal_pattern_matches_only_itself() {
        assert!(matches("foo", "foo"));
        assert!(!matches("foo", "foobar"));
    }

    #[test]
    fn star_matches_any_run_including_empty() {
        assert!(matches("foo*", "foo"));
        assert!(matches("foo*", "foobar"));
        assert!(!matches("foo*", "fo"));
    }

    #[test]
    fn question_mark_matches_exactly_one_char() {
        assert!(matches("b?r", "bar"));
        assert!(matches("b?r", "bzr"));
        assert!(!matches("b?r", "br"));
        assert!(!matches("b?r", "baar"));
    }

    #[test]
    fn character_class_matches_members() {
        assert!(matches("[abc]", "a"));
        assert!(matches("[abc]", "b"));
        assert!(!matches("[abc]", "d"));
    }

    #[test]
    fn character_range_matches_span() {
        assert!(matches("[a-z]", "m"));
        assert!(!matches("[a-z]", "M"));
    }

    #[test]
    fn negated_class_excludes_members() {
        assert!(matches("[!abc]", "d"));
        assert!(!matches("[!abc]", "a"));
    }

    #[test]
    fn unmatched_bracket_is_treated_as_literal() {
        assert!(matches("[abc", "[abc"));
        assert!(!matches("[abc", "a"));
    }

    #[test]
    fn pattern_key_stops_at_first_metacharacter() {
        assert_eq!(pattern_key("foo*"), "foo");
        assert_eq!(pattern_key("foo"), "foo");
        assert_eq!(pattern_key("*foo"), "");
        assert_eq!(pattern_key("b?r"), "b");
    }
}
