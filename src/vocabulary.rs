use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Flagged-word set, loaded once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    words: HashSet<String>,
}

impl Vocabulary {
    /// Load a word list with one entry per line.
    ///
    /// Blank lines are skipped and entries are lowercased. A missing or
    /// unreadable file is fatal for the caller; the service does not start
    /// without its word list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list at {}", path.display()))?;

        Ok(Self::from_words(content.lines()))
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when any whitespace-delimited word of `text` is in the set,
    /// compared case-insensitively.
    pub fn contains_flagged(&self, text: &str) -> bool {
        text.split_whitespace()
            .any(|word| self.words.contains(&word.to_lowercase()))
    }
}
