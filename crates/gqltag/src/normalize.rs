//! Cache key normalization.
//!
//! Runs of whitespace and commas collapse to a single space and the result is
//! trimmed. Braces outside string literals are always separated from their
//! neighbours by one space, so `{a}`, `{ a }` and `{,a,}` share a key.
//! `#` comments are ignored tokens and are left out of the key; the line break
//! ending one still separates the code around it.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    String,
    BlockString,
    Comment,
}

#[inline]
fn is_separator(ch: char) -> bool {
    ch == ',' || ch == '\u{feff}' || ch.is_whitespace()
}

struct Normalizer {
    out: String,
    pending_space: bool,
}

impl Normalizer {
    fn push(&mut self, ch: char) {
        if self.pending_space && !self.out.is_empty() {
            self.out.push(' ');
        }
        self.pending_space = false;
        self.out.push(ch);
    }
}

/// Normalizes source text into a cache key.
///
/// Pure and idempotent: `normalize(&normalize(s)) == normalize(s)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut n = Normalizer {
        out: String::with_capacity(text.len()),
        pending_space: false,
    };
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if matches!(ch, '\n' | '\r') && matches!(state, State::Comment | State::String) {
            // Both end at a line terminator; an open string is a lexer error.
            state = State::Code;
            n.pending_space = true;
            continue;
        }
        if state == State::Comment {
            continue;
        }
        if is_separator(ch) {
            n.pending_space = true;
            continue;
        }

        match state {
            State::Code => match ch {
                '{' | '}' => {
                    n.pending_space = true;
                    n.push(ch);
                    n.pending_space = true;
                }
                '#' => {
                    state = State::Comment;
                    n.pending_space = true;
                }
                '"' => {
                    n.push(ch);
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        if chars.peek() == Some(&'"') {
                            chars.next();
                            n.out.push_str("\"\"");
                            state = State::BlockString;
                        } else {
                            // empty string literal
                            n.out.push('"');
                        }
                    } else {
                        state = State::String;
                    }
                }
                _ => n.push(ch),
            },
            State::String => {
                n.push(ch);
                match ch {
                    '\\' => {
                        if let Some(escaped) = chars.next_if(|c| !is_separator(*c)) {
                            n.out.push(escaped);
                        }
                    }
                    '"' => state = State::Code,
                    _ => {}
                }
            }
            State::BlockString => {
                n.push(ch);
                if ch == '\\' && chars.peek() == Some(&'"') {
                    n.out.push('"');
                    chars.next();
                } else if ch == '"' && chars.peek() == Some(&'"') {
                    chars.next();
                    n.out.push('"');
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        n.out.push('"');
                        state = State::Code;
                    }
                }
            }
            State::Comment => {}
        }
    }

    n.out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_commas() {
        insta::assert_snapshot!(
            normalize("  query  Q(\n\t$a: Int,\n  $b: Int\n) {\n  a,\n  b\n}\n"),
            @"query Q( $a: Int $b: Int ) { a b }"
        );
    }

    #[test]
    fn test_brace_spacing_is_canonical() {
        assert_eq!(normalize("{ a }"), "{ a }");
        assert_eq!(normalize("{a}"), "{ a }");
        assert_eq!(normalize("{,a,}"), "{ a }");
        assert_eq!(normalize("{user{id}}"), "{ user { id } }");
    }

    #[test]
    fn test_strings_keep_braces_and_quotes() {
        insta::assert_snapshot!(
            normalize(r#"{ a(b: "{x}", c: "q\"{") }"#),
            @r#"{ a(b: "{x}" c: "q\"{") }"#
        );
        insta::assert_snapshot!(
            normalize(r#"{ a(b: """{ "x" }""", c: "") }"#),
            @r#"{ a(b: """{ "x" }""" c: "") }"#
        );
    }

    #[test]
    fn test_comments_are_left_out() {
        assert_eq!(normalize("# {x}\n{a}"), "{ a }");
        assert_eq!(normalize("{ a } # note\n{ b }"), "{ a } { b }");
        assert_eq!(normalize("{ a } # note { b }"), "{ a }");
        assert_eq!(normalize("# c { a }"), "");
        assert_eq!(normalize("# c\n{ a }"), "{ a }");
        assert_eq!(normalize("a#x\r\nb"), "a b");
        assert_eq!(normalize(r##"{ a(s: "# not a comment") }"##), r##"{ a(s: "# not a comment") }"##);
    }

    #[test]
    fn test_unterminated_string_ends_at_line_break() {
        assert_eq!(normalize("{ a(s: \"x\n# y\n) }"), "{ a(s: \"x ) }");
    }

    #[test]
    fn test_comment_text_never_merges_with_code() {
        assert_ne!(normalize("{ a } # note\n{ b }"), normalize("{ a } # note { b }"));
        assert_ne!(normalize("# c { a }"), normalize("# c\n{ a }"));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" ,\n\t, "), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "{a}",
            "query { a(s: \"x  y\") }",
            "# c {x}\nfragment F on T {a}",
            "{ a(b: \"\"\"x\n\"\"\") }",
            "\u{feff}{ a }",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {input:?}");
        }
    }
}
