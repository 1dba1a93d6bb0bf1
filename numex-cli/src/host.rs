//! Document access and result delivery
//!
//! The CLI stands in for an editor: the "active document" is a file on disk, a fresh view is
//! stdout, and replacing the document rewrites the file.

use crate::error::CliError;
use numex_core::{join_lines, SortMode};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// A document loaded from disk.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Document { path, text })
    }

    /// Path as shown to the user and passed to extractors.
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }

    pub fn size(&self) -> u64 {
        self.text.len() as u64
    }
}

/// Where a finished list of numbers goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Print to stdout.
    FreshView,
    /// Overwrite the source document.
    Replace,
}

impl Delivery {
    pub fn from_flag(in_place: bool) -> Self {
        if in_place {
            Delivery::Replace
        } else {
            Delivery::FreshView
        }
    }
}

/// Deliver `content` for `document`.
pub fn deliver(document: &Document, content: &str, delivery: Delivery) -> Result<(), CliError> {
    match delivery {
        Delivery::FreshView => show(content),
        Delivery::Replace => write_file(&document.path, content),
    }
}

/// Print `content` to stdout, always ending with a newline.
pub fn show(content: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

pub fn deliver_numbers(
    document: &Document,
    numbers: &[f64],
    delivery: Delivery,
) -> Result<(), CliError> {
    deliver(document, &join_lines(numbers), delivery)
}

pub fn write_file(path: &Path, content: &str) -> Result<(), CliError> {
    fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Ask for a sort mode on stderr and read the choice from `input`.
///
/// Accepts the option number or the mode name. Empty input or end of input cancels.
pub fn pick_sort_mode(input: &mut impl BufRead) -> Result<Option<SortMode>, CliError> {
    let mut stderr = io::stderr().lock();
    writeln!(stderr, "Select sort mode:")?;
    for (i, mode) in SortMode::CHOICES.iter().enumerate() {
        writeln!(stderr, "  {}) {} ({})", i + 1, mode.label(), mode)?;
    }
    write!(stderr, "> ")?;
    stderr.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    parse_sort_choice(&line)
}

fn parse_sort_choice(line: &str) -> Result<Option<SortMode>, CliError> {
    let choice = line.trim();
    if choice.is_empty() {
        return Ok(None);
    }
    if let Ok(index) = choice.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| SortMode::CHOICES.get(i).copied())
            .map(Some)
            .ok_or_else(|| CliError::Usage(format!("No sort mode numbered {}", index)));
    }
    choice
        .parse::<SortMode>()
        .map(Some)
        .map_err(CliError::Usage)
}

/// Ask a yes/no question on stderr. Anything but `y`/`yes` is a no.
pub fn confirm(question: &str, input: &mut impl BufRead) -> Result<bool, CliError> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{} [y/N] ", question)?;
    stderr.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
