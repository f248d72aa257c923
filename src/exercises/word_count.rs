//! Regex-based word counting over text and files.

use super::{ExerciseError, Result};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Alphanumeric runs, optionally joined by single apostrophes or hyphens
/// (`don't`, `well-known`).
static WORD_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+(?:['-][A-Za-z0-9]+)*").ok());

pub fn count_words_in_text(text: &str) -> usize {
    WORD_RE.as_ref().map_or(0, |re| re.find_iter(text).count())
}

pub fn count_words_in_file(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ExerciseError::NotFound(path.to_path_buf()));
    }
    if path.is_dir() {
        return Err(ExerciseError::IsADirectory(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| ExerciseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(count_words_in_text(&text))
}
