//! Line tokenizer for env files.
//!
//! A line has the shape `KEY = VALUE #annotation`. The key ends at the first
//! `=`; there is no escape for it, since a process environment cannot hold a
//! key containing `=`. The value may be wrapped in double quotes, in which case
//! `#`, `=` and surrounding spaces are part of the value, `\"` stands for a
//! literal quote and `\\` for a literal backslash. Any other backslash is kept
//! as written. In an unquoted value the first `#` ends the value and starts the
//! annotation.

use super::LineError;

/// One tokenized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub key: String,
    pub value: String,
    pub annotation: Option<String>,
}

/// Splits a non-empty, non-comment line into key, value and annotation.
pub fn tokenize(line: &str) -> Result<Line, LineError> {
    if line.as_bytes().contains(&0) {
        return Err(LineError::NulByte);
    }

    let mut scanner = Scanner::new(line);

    let key = scanner.take_key()?;
    scanner.skip_whitespace();

    let value = match scanner.peek() {
        Some(b'"') => {
            let value = scanner.take_quoted()?;
            scanner.skip_whitespace();
            if !matches!(scanner.peek(), None | Some(b'#')) {
                return Err(LineError::TrailingCharacters);
            }
            value
        }
        _ => scanner.take_unquoted(),
    };

    let annotation = scanner.take_annotation();

    Ok(Line {
        key: key.to_string(),
        value,
        annotation,
    })
}

/// Forward-only cursor over the bytes of a line.
///
/// Every position the scanner stops at is either the end of input or an ASCII
/// delimiter, so slicing `src` at `pos` never splits a UTF-8 sequence.
struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.as_bytes().get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Consumes the key region and the `=` that ends it.
    fn take_key(&mut self) -> Result<&'a str, LineError> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(LineError::MissingSeparator),
                Some(b'=') => break,
                Some(_) => self.pos += 1,
            }
        }

        let key = self.src[start..self.pos].trim();
        self.pos += 1;

        if key.is_empty() {
            return Err(LineError::EmptyKey);
        }
        Ok(key)
    }

    /// Consumes a double-quoted value, including both quotes.
    fn take_quoted(&mut self) -> Result<String, LineError> {
        self.pos += 1;

        let mut value = String::new();
        let mut segment = self.pos;
        loop {
            match self.peek() {
                None => return Err(LineError::UnterminatedQuote),
                Some(b'\\') if matches!(self.peek_at(1), Some(b'"' | b'\\')) => {
                    value.push_str(&self.src[segment..self.pos]);
                    self.pos += 1;
                    segment = self.pos;
                    self.pos += 1;
                }
                Some(b'"') => {
                    value.push_str(&self.src[segment..self.pos]);
                    self.pos += 1;
                    return Ok(value);
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consumes an unquoted value up to the annotation marker or end of line.
    fn take_unquoted(&mut self) -> String {
        let start = self.pos;
        while !matches!(self.peek(), None | Some(b'#')) {
            self.pos += 1;
        }
        self.src[start..self.pos].trim().to_string()
    }

    fn take_annotation(&mut self) -> Option<String> {
        if self.peek() != Some(b'#') {
            return None;
        }
        let annotation = self.src[self.pos + 1..].trim();
        self.pos = self.src.len();
        (!annotation.is_empty()).then(|| annotation.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn value_of(line: &str) -> String {
        tokenize(line).unwrap().value
    }

    #[test]
    fn test_simple_pair() {
        let line = tokenize("KEY=value").unwrap();
        assert_eq!(line.key, "KEY");
        assert_eq!(line.value, "value");
        assert_eq!(line.annotation, None);
    }

    #[test]
    fn test_whitespace_around_key_and_value() {
        let line = tokenize("  KEY   =   some value  ").unwrap();
        assert_eq!(line.key, "KEY");
        assert_eq!(line.value, "some value");
    }

    #[test]
    fn test_quoted_value_keeps_hash_and_spaces() {
        assert_eq!(value_of(r#"KEY="a # b""#), "a # b");
        assert_eq!(value_of(r#"KEY="  padded  ""#), "  padded  ");
        assert_eq!(value_of(r#"KEY="x=y""#), "x=y");
    }

    #[test]
    fn test_unquoted_hash_starts_annotation() {
        let line = tokenize("KEY=a # b").unwrap();
        assert_eq!(line.value, "a");
        assert_eq!(line.annotation.as_deref(), Some("b"));
    }

    #[test]
    fn test_annotation_after_quoted_value() {
        let line = tokenize(r#"PORT = "8080" #u16"#).unwrap();
        assert_eq!(line.value, "8080");
        assert_eq!(line.annotation.as_deref(), Some("u16"));
    }

    #[test]
    fn test_empty_annotation_is_none() {
        let line = tokenize("KEY=value #").unwrap();
        assert_eq!(line.value, "value");
        assert_eq!(line.annotation, None);
    }

    #[test]
    fn test_escaped_quote_is_literal() {
        assert_eq!(value_of(r#"KEY="say \"hi\"""#), r#"say "hi""#);
    }

    #[test]
    fn test_other_backslashes_are_verbatim() {
        assert_eq!(value_of(r#"KEY="C:\temp\n""#), r"C:\temp\n");
        assert_eq!(value_of(r"KEY=a\b"), r"a\b");
        assert_eq!(value_of(r"KEY=a\\b\"), r"a\\b\");
    }

    #[test]
    fn test_escaped_backslash_in_quotes() {
        assert_eq!(value_of(r#"KEY="a=b\\""#), r"a=b\");
        assert_eq!(value_of(r#"KEY="\\\"""#), r#"\""#);
        assert_eq!(value_of(r#"KEY="C:\\temp""#), r"C:\temp");
    }

    #[test]
    fn test_key_ends_at_first_equals() {
        let line = tokenize(r"A\=B=c").unwrap();
        assert_eq!(line.key, r"A\");
        assert_eq!(line.value, "B=c");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(value_of(r#"KEY="""#), "");
        assert_eq!(value_of("KEY="), "");
        assert_eq!(value_of("KEY=   "), "");
    }

    #[test]
    fn test_value_may_contain_equals() {
        assert_eq!(
            value_of("URL=postgres://u:p@h/db?sslmode=disable"),
            "postgres://u:p@h/db?sslmode=disable"
        );
    }

    #[test]
    fn test_quote_inside_unquoted_value_is_literal() {
        assert_eq!(value_of(r#"KEY=it"s"#), r#"it"s"#);
    }

    #[test]
    fn test_utf8_value() {
        assert_eq!(value_of("GREETING=\"héllo wörld\""), "héllo wörld");
        assert_eq!(value_of("GREETING=日本語"), "日本語");
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(tokenize("JUST_A_KEY"), Err(LineError::MissingSeparator));
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(tokenize("  = value"), Err(LineError::EmptyKey));
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize(r#"KEY="open"#), Err(LineError::UnterminatedQuote));
        assert_eq!(tokenize(r#"KEY="open\""#), Err(LineError::UnterminatedQuote));
    }

    #[test]
    fn test_trailing_characters_after_quote() {
        assert_eq!(
            tokenize(r#"KEY="a" b"#),
            Err(LineError::TrailingCharacters)
        );
    }

    #[test]
    fn test_nul_byte_rejected() {
        assert_eq!(tokenize("KEY=a\0b"), Err(LineError::NulByte));
    }

    fn render(key: &str, value: &str) -> String {
        let needs_quotes = value != value.trim()
            || value.contains('#')
            || value.contains('=')
            || value.starts_with('"');
        if needs_quotes {
            let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
            format!("{key}=\"{escaped}\"")
        } else {
            format!("{key}={value}")
        }
    }

    proptest! {
        #[test]
        fn prop_render_then_tokenize_round_trips(
            key in "[A-Za-z_][A-Za-z0-9_]{0,15}",
            value in "[ -~]{0,32}",
        ) {
            let line = tokenize(&render(&key, &value)).unwrap();
            prop_assert_eq!(line.key, key);
            prop_assert_eq!(line.value, value);
        }
    }
}
