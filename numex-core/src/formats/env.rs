//! dotenv extraction
//!
//! Values are collected in the order their keys are first assigned; a repeated key keeps its
//! first position and its last value. Every value is a string and goes through the permissive
//! float parse.
//!
//! Line grammar:
//!
//!     # comment
//!     KEY=value            (unquoted: ends at '#', trimmed)
//!     KEY: value
//!     export KEY=value
//!     KEY="double"         KEY='single'        KEY=`backtick`
//!
//! Quoted values may span several lines. A quote that is never closed is taken literally as an
//! unquoted value. Values are not expanded: `$NAME` stays as written. Lines that are not
//! assignments are skipped, so no document is malformed.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::numeric::parse_float_prefix;

pub struct EnvExtractor;

impl Extractor for EnvExtractor {
    fn name(&self) -> &str {
        "env"
    }

    fn description(&self) -> &str {
        "dotenv files, values coerced by numeric prefix"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Env]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        Ok(parse_env(source)
            .iter()
            .filter_map(|(_, value)| parse_float_prefix(value))
            .collect())
    }
}

/// Parse dotenv text into `(key, value)` pairs in first-assignment order.
pub fn parse_env(source: &str) -> Vec<(String, String)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let lines: Vec<&str> = source.lines().collect();
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut index = 0;

    while index < lines.len() {
        let line = lines[index].trim();
        index += 1;

        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map_or(line, str::trim_start);
        let Some((key, rest)) = split_assignment(line) else {
            continue;
        };

        let rest = rest.trim_start();
        let quoted = match rest.chars().next() {
            Some(quote @ ('"' | '\'' | '`')) => closing_quote(&lines, index, &rest[1..], quote)
                .map(|(body, consumed)| (quote, body, consumed)),
            _ => None,
        };
        let value = match quoted {
            Some((quote, body, consumed)) => {
                index += consumed;
                if quote == '"' {
                    body.replace("\\n", "\n").replace("\\r", "\r")
                } else {
                    body
                }
            }
            None => unquoted(rest),
        };

        match pairs.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => pairs.push((key.to_string(), value)),
        }
    }

    pairs
}

/// Split `KEY=value` or `KEY: value` into key and raw value.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let key_end = line
        .find(|c: char| !is_key_char(c))
        .unwrap_or(line.len());
    if key_end == 0 {
        return None;
    }
    let (key, rest) = line.split_at(key_end);

    if let Some(value) = rest.trim_start().strip_prefix('=') {
        return Some((key, value));
    }
    let value = rest.strip_prefix(':')?;
    value
        .starts_with(char::is_whitespace)
        .then_some((key, value))
}

/// Body of a quoted value starting on the current line, and how many further lines it used.
fn closing_quote(
    lines: &[&str],
    next: usize,
    first: &str,
    quote: char,
) -> Option<(String, usize)> {
    let mut body = first.to_string();
    let mut consumed = 0;
    loop {
        if let Some(close) = body.find(quote) {
            body.truncate(close);
            return Some((body, consumed));
        }
        let line = lines.get(next + consumed)?;
        body.push('\n');
        body.push_str(line);
        consumed += 1;
    }
}

fn unquoted(rest: &str) -> String {
    rest.split_once('#')
        .map_or(rest, |(value, _)| value)
        .trim()
        .to_string()
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
