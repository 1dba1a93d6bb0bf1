//! INI extraction
//!
//! The parser builds a section -> key -> value tree and the shared walk collects it with
//! permissive coercion, so `port = "8080"` and `ratio = 50%` both yield numbers.
//!
//! Grammar accepted:
//!
//!     ; comment            # comment
//!     key = value          (before any section: top level)
//!     [section]
//!     key = "quoted value"
//!     key[] = item         (repeated keys with [] build an array)
//!     flag                 (no '=': a boolean true)
//!
//! Unquoted values end at an inline `;` or `#`. The literals `true`, `false` and `null` map
//! to their native kinds. A line that opens a section header without closing it is the only
//! malformed input.

use crate::error::FormatError;
use crate::file_type::FileType;
use crate::format::Extractor;
use crate::value::{Coercion, Node};

pub struct IniExtractor;

impl Extractor for IniExtractor {
    fn name(&self) -> &str {
        "ini"
    }

    fn description(&self) -> &str {
        "INI files, string values coerced by numeric prefix"
    }

    fn file_types(&self) -> &[FileType] {
        &[FileType::Ini]
    }

    fn collect(&self, source: &str) -> Result<Vec<f64>, FormatError> {
        Ok(parse_ini(source)?.collect_numbers(Coercion::Permissive))
    }
}

/// Members of one section (or of the top level), in encounter order.
#[derive(Default)]
struct Section {
    members: Vec<(String, Node)>,
}

impl Section {
    fn set(&mut self, key: &str, value: Node) {
        if let Some(array_key) = key.strip_suffix("[]") {
            match self.members.iter_mut().find(|(k, _)| k == array_key) {
                Some((_, Node::Array(items))) => items.push(value),
                Some((_, existing)) => *existing = Node::Array(vec![value]),
                None => self
                    .members
                    .push((array_key.to_string(), Node::Array(vec![value]))),
            }
            return;
        }

        match self.members.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.members.push((key.to_string(), value)),
        }
    }

    fn into_node(self) -> Node {
        Node::Object(self.members)
    }
}

/// Parse INI text into a tree: top-level keys first, then one object per section.
pub fn parse_ini(source: &str) -> Result<Node, FormatError> {
    let mut root = Section::default();
    let mut sections: Vec<(String, Section)> = Vec::new();
    let mut current: Option<usize> = None;

    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let name = line
                .find(']')
                .map(|close| line[1..close].trim().to_string())
                .ok_or_else(|| FormatError::Ini {
                    line: index + 1,
                    message: format!("unterminated section header '{}'", line),
                })?;
            // Reopening a section appends to it.
            current = match sections.iter().position(|(existing, _)| *existing == name) {
                Some(position) => Some(position),
                None => {
                    sections.push((name, Section::default()));
                    Some(sections.len() - 1)
                }
            };
            continue;
        }

        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), parse_value(value)),
            None => (line, Node::Bool(true)),
        };
        if key.is_empty() {
            continue;
        }

        let target = match current {
            Some(position) => &mut sections[position].1,
            None => &mut root,
        };
        target.set(&unquote(key), value);
    }

    let mut members = root.members;
    members.extend(
        sections
            .into_iter()
            .map(|(name, section)| (name, section.into_node())),
    );
    Ok(Node::Object(members))
}

fn parse_value(raw: &str) -> Node {
    let value = raw.trim();
    if is_quoted(value) {
        return Node::String(value[1..value.len() - 1].to_string());
    }

    let value = strip_inline_comment(value).trim();
    match value {
        "true" => Node::Bool(true),
        "false" => Node::Bool(false),
        "null" => Node::Null,
        _ => Node::String(value.to_string()),
    }
}

fn is_quoted(value: &str) -> bool {
    value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')))
}

fn unquote(value: &str) -> String {
    if is_quoted(value) {
        value[1..value.len() - 1].to_string()
    } else {
        value.to_string()
    }
}

/// Cut an unquoted value at the first `;` or `#` not escaped with a backslash.
fn strip_inline_comment(value: &str) -> &str {
    let mut escaped = false;
    for (i, c) in value.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            ';' | '#' if !escaped => return &value[..i],
            _ => escaped = false,
        }
    }
    value
}
