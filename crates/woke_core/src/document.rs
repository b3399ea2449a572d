//! Document snapshots handed to the orchestrator.

use std::path::{Path, PathBuf};

use crate::diagnostic::LineRange;

/// The state of a document at the moment a lint is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSnapshot {
    /// Full text of the buffer.
    pub text: String,
    /// File system path, absent for buffers that were never saved.
    pub path: Option<PathBuf>,
    /// Whether the buffer is untitled.
    pub untitled: bool,
}

impl DocumentSnapshot {
    /// Creates a snapshot of a saved file.
    pub fn file(text: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            path: Some(path.into()),
            untitled: false,
        }
    }

    /// Creates a snapshot of an untitled buffer.
    pub fn untitled(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
            untitled: true,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Returns the text covered by `range`, or `None` if it lies outside `text`.
///
/// Columns are UTF-16 code units. A column that falls inside a surrogate pair
/// is rounded to the enclosing character's start.
pub fn text_in_range<'a>(text: &'a str, range: &LineRange) -> Option<&'a str> {
    let line = text
        .split('\n')
        .nth(range.line as usize)
        .map(|l| l.strip_suffix('\r').unwrap_or(l))?;

    let start = utf16_to_byte(line, range.start)?;
    let end = utf16_to_byte(line, range.end)?;
    if start > end {
        return None;
    }
    Some(&line[start..end])
}

fn utf16_to_byte(line: &str, column: u32) -> Option<usize> {
    let mut units = 0u32;
    for (byte_idx, ch) in line.char_indices() {
        if units >= column {
            return Some(byte_idx);
        }
        units += ch.len_utf16() as u32;
        if units > column {
            return Some(byte_idx);
        }
    }
    (units >= column).then_some(line.len())
}
