//! Token scanning for `{{identifier}}` placeholders.
//!
//! The scanner splits text into literal runs and tokens in a single left to
//! right pass. A token is `{{`, one or more `[A-Za-z0-9_]`, then `}}`. Anything
//! else (unclosed braces, whitespace or punctuation inside) is literal text.

use std::collections::BTreeSet;

/// One piece of scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text that is not part of any token.
    Literal(&'a str),
    /// A well-formed token. `raw` includes the braces, `name` does not.
    Token { name: &'a str, raw: &'a str },
}

/// Iterator over the [`Segment`]s of a string.
///
/// Concatenating every segment's text reproduces the input exactly.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Segments<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Segment<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];

        let mut search = 0;
        while let Some(offset) = rest[search..].find("{{") {
            let start = search + offset;
            if let Some(len) = token_len(&rest.as_bytes()[start..]) {
                if start > 0 {
                    // Flush the literal run; the token is picked up next call.
                    self.pos += start;
                    return Some(Segment::Literal(&rest[..start]));
                }
                self.pos += len;
                let raw = &rest[..len];
                return Some(Segment::Token {
                    name: &raw[2..len - 2],
                    raw,
                });
            }
            // `{` is one byte, so start + 1 is always a char boundary.
            search = start + 1;
        }

        self.pos = self.text.len();
        Some(Segment::Literal(rest))
    }
}

/// Identifier characters allowed inside a token.
#[inline]
pub fn is_token_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length in bytes of the token at the start of `bytes`, if it is one.
///
/// `bytes` must start with `{{`.
fn token_len(bytes: &[u8]) -> Option<usize> {
    let ident = bytes[2..].iter().take_while(|b| is_token_char(**b)).count();
    if ident == 0 {
        return None;
    }
    let end = 2 + ident;
    match (bytes.get(end), bytes.get(end + 1)) {
        (Some(b'}'), Some(b'}')) => Some(end + 2),
        _ => None,
    }
}

/// Collect the distinct token names in `text`.
///
/// ```
/// use certcanvas::template::scan;
///
/// let names = scan("{{name}} turns {{age}}, {{name}}!");
/// assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["age", "name"]);
/// ```
pub fn scan(text: &str) -> BTreeSet<String> {
    Segments::new(text)
        .filter_map(|seg| match seg {
            Segment::Token { name, .. } => Some(name.to_string()),
            Segment::Literal(_) => None,
        })
        .collect()
}
