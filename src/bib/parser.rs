//! BibTeX subset parser.
//!
//! Handles `@type{key, field = {value}, ...}` entries with braced or quoted
//! field values (nested braces allowed) and bare values such as years. Text
//! between entries is treated as commentary and skipped, which is how BibTeX
//! itself behaves.

use thiserror::Error;

use super::Entry;

/// Errors raised while parsing bibliography source text.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("entry starting at offset {offset} is missing a citation key")]
    MissingKey { offset: usize },
    #[error("malformed @{entry_type} entry: {detail}")]
    MalformedEntry { entry_type: String, detail: String },
    #[error("malformed field in entry {key:?}: {detail}")]
    MalformedField { key: String, detail: String },
    #[error("entry {key:?} is not terminated")]
    Unterminated { key: String },
    #[error("duplicate citation key {0:?}")]
    DuplicateKey(String),
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }
}

/// Parse all entries from BibTeX source text, in source order.
pub(super) fn parse(source: &str) -> Result<Vec<Entry>, ParseError> {
    let mut scanner = Scanner::new(source);
    let mut entries = Vec::new();
    loop {
        while matches!(scanner.peek(), Some(c) if c != '@') {
            scanner.bump();
        }
        if scanner.peek().is_none() {
            break;
        }
        scanner.bump();
        entries.push(parse_entry(&mut scanner)?);
    }
    Ok(entries)
}

fn parse_entry(s: &mut Scanner) -> Result<Entry, ParseError> {
    let entry_start = s.pos;
    let entry_type = s
        .take_while(|c| c.is_alphanumeric())
        .to_ascii_lowercase();
    if entry_type.is_empty() {
        return Err(ParseError::MalformedEntry {
            entry_type,
            detail: "missing entry type after '@'".into(),
        });
    }
    s.skip_whitespace();
    if s.bump() != Some('{') {
        return Err(ParseError::MalformedEntry {
            entry_type,
            detail: "expected '{' after entry type".into(),
        });
    }
    s.skip_whitespace();
    let key = s
        .take_while(|c| c != ',' && c != '}' && !c.is_whitespace())
        .to_string();
    if key.is_empty() {
        return Err(ParseError::MissingKey { offset: entry_start });
    }

    let mut fields = Vec::new();
    loop {
        s.skip_whitespace();
        match s.peek() {
            Some('}') => {
                s.bump();
                break;
            }
            Some(',') => {
                s.bump();
            }
            None => return Err(ParseError::Unterminated { key }),
            Some(c) => {
                let name = s
                    .take_while(|c| c.is_alphanumeric() || c == '_' || c == '-')
                    .to_ascii_lowercase();
                if name.is_empty() {
                    return Err(ParseError::MalformedField {
                        key,
                        detail: format!("unexpected character {:?}", c),
                    });
                }
                s.skip_whitespace();
                if s.bump() != Some('=') {
                    return Err(ParseError::MalformedField {
                        key,
                        detail: format!("expected '=' after field name {:?}", name),
                    });
                }
                s.skip_whitespace();
                let value = match parse_value(s) {
                    Ok(value) => value,
                    Err(detail) => return Err(ParseError::MalformedField { key, detail }),
                };
                fields.push((name, value));
            }
        }
    }

    Ok(Entry {
        entry_type,
        key,
        fields,
    })
}

fn parse_value(s: &mut Scanner) -> Result<String, String> {
    match s.peek() {
        Some('{') => {
            s.bump();
            let mut depth = 1usize;
            let mut out = String::new();
            while let Some(c) = s.bump() {
                match c {
                    '{' => {
                        depth += 1;
                        out.push(c);
                    }
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(out);
                        }
                        out.push(c);
                    }
                    _ => out.push(c),
                }
            }
            Err("unterminated braced value".into())
        }
        Some('"') => {
            s.bump();
            let mut out = String::new();
            while let Some(c) = s.bump() {
                if c == '"' {
                    return Ok(out);
                }
                out.push(c);
            }
            Err("unterminated quoted value".into())
        }
        Some(_) => {
            let value = s.take_while(|c| c != ',' && c != '}' && c != '\n');
            let value = value.trim();
            if value.is_empty() {
                Err("empty field value".into())
            } else {
                Ok(value.to_string())
            }
        }
        None => Err("missing field value".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_entry() {
        let entries = parse("@article{smith2020, title = {On Things}, year = 2020}").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry_type, "article");
        assert_eq!(entries[0].key, "smith2020");
        assert_eq!(
            entries[0].fields,
            vec![
                ("title".to_string(), "On Things".to_string()),
                ("year".to_string(), "2020".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_preserves_field_order() {
        let entries = parse("@book{b, year = {1999}, author = {A}, title = {T}}").unwrap();
        let names: Vec<_> = entries[0].fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["year", "author", "title"]);
    }

    #[test]
    fn test_parse_nested_braces() {
        let entries = parse("@misc{m, note = {outer {inner} text}}").unwrap();
        assert_eq!(entries[0].fields[0].1, "outer {inner} text");
    }

    #[test]
    fn test_parse_quoted_value() {
        let entries = parse(r#"@misc{m, note = "quoted, with comma"}"#).unwrap();
        assert_eq!(entries[0].fields[0].1, "quoted, with comma");
    }

    #[test]
    fn test_parse_trailing_comma() {
        let entries = parse("@misc{m, note = {x},}").unwrap();
        assert_eq!(entries[0].fields.len(), 1);
    }

    #[test]
    fn test_parse_skips_inter_entry_text() {
        let entries = parse("stray comment\n@misc{a, note = {x}}\nmore text\n@misc{b, note = {y}}").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, "a");
        assert_eq!(entries[1].key, "b");
    }

    #[test]
    fn test_parse_missing_key_fails() {
        assert!(matches!(
            parse("@article{, title = {x}}"),
            Err(ParseError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_parse_unterminated_entry_fails() {
        assert!(matches!(
            parse("@article{a, title = {x}"),
            Err(ParseError::Unterminated { .. })
        ));
    }

    #[test]
    fn test_parse_malformed_field_fails() {
        assert!(matches!(
            parse("@article{a, title {x}}"),
            Err(ParseError::MalformedField { .. })
        ));
    }

    #[test]
    fn test_parse_empty_source() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("no entries here").unwrap().is_empty());
    }
}
