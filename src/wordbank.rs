use rand::Rng;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

pub const EMBEDDED_FALLBACK: &str = include_str!("resources/fallback_words.txt");

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    #[error("secret word is empty")]
    Empty,
    #[error("secret word '{0}' contains non-alphabetic characters")]
    NonAlphabetic(String),
    #[error("definition for '{0}' is empty")]
    MissingDefinition(String),
}

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("failed to read word list: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("word list contains no entries")]
    Empty,
}

/// The word a round is played against, with the clue shown for hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretWord {
    text: String,
    definition: String,
}

impl SecretWord {
    /// Builds a secret word, uppercasing `text`.
    ///
    /// Rejects empty text, text with anything other than ASCII letters, and
    /// blank definitions.
    pub fn new(text: &str, definition: &str) -> Result<Self, WordError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WordError::Empty);
        }
        if !is_alphabetic(text) {
            return Err(WordError::NonAlphabetic(text.to_string()));
        }
        let definition = definition.trim();
        if definition.is_empty() {
            return Err(WordError::MissingDefinition(text.to_uppercase()));
        }
        Ok(Self {
            text: text.to_ascii_uppercase(),
            definition: definition.to_string(),
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }
}

/// Matches `^[a-zA-Z]+$`.
#[must_use]
pub fn is_alphabetic(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Offline (word, definition) pairs. Never empty.
#[derive(Debug, Clone)]
pub struct FallbackTable {
    entries: Vec<SecretWord>,
}

impl FallbackTable {
    pub fn new(entries: Vec<SecretWord>) -> Result<Self, WordListError> {
        if entries.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(Self { entries })
    }

    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, WordListError> {
        load_fallback_from_str(EMBEDDED_FALLBACK)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[SecretWord] {
        &self.entries
    }

    /// Picks an entry uniformly at random.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> SecretWord {
        self.entries[rng.gen_range(0..self.entries.len())].clone()
    }
}

fn parse_line(line_number: usize, line: &str) -> Result<Option<SecretWord>, WordListError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let Some((word, definition)) = line.split_once(':') else {
        return Err(WordListError::Malformed {
            line: line_number,
            reason: "expected WORD:Definition".to_string(),
        });
    };
    SecretWord::new(word, definition)
        .map(Some)
        .map_err(|e| WordListError::Malformed {
            line: line_number,
            reason: e.to_string(),
        })
}

pub fn load_fallback_from_str(data: &str) -> Result<FallbackTable, WordListError> {
    let mut entries = Vec::new();
    for (i, line) in data.lines().enumerate() {
        if let Some(word) = parse_line(i + 1, line)? {
            entries.push(word);
        }
    }
    FallbackTable::new(entries)
}

pub fn load_fallback_from_file<P: AsRef<Path>>(path: P) -> Result<FallbackTable, WordListError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        if let Some(word) = parse_line(i + 1, &line?)? {
            entries.push(word);
        }
    }
    FallbackTable::new(entries)
}
