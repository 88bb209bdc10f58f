//! Round state machine.
//!
//! A [`GameSession`] owns everything about one round: the secret word, the
//! reveal buffer, the tried letters and the wrong-guess counter. Guesses go
//! through [`GameSession::submit_guess`], which classifies the token,
//! applies its effect and reports an [`Outcome`] carrying a [`Snapshot`] so
//! front ends never need to look inside the session.

use crate::debug_log;
use crate::wordbank::{SecretWord, WordError};
use std::collections::BTreeSet;

pub const MAX_WRONG_GUESSES: u8 = 6;
pub const PLACEHOLDER: char = '_';
pub const HINT_TOKEN: &str = "HINT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    InProgress,
    Won,
    Lost,
}

impl RoundStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// How a single guess was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessResult {
    /// Letter already tried this round; nothing changed.
    RepeatLetter(char),
    CorrectLetter(char),
    IncorrectLetter(char),
    CorrectWord,
    IncorrectWord,
    HintConsumed,
}

impl GuessResult {
    #[must_use]
    pub fn is_penalty(self) -> bool {
        matches!(
            self,
            Self::IncorrectLetter(_) | Self::IncorrectWord | Self::HintConsumed
        )
    }
}

/// Read-only view of a round for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub status: RoundStatus,
    pub wrong_guesses: u8,
    pub reveal: Vec<char>,
    /// Alphabetical.
    pub tried_letters: Vec<char>,
}

impl Snapshot {
    #[must_use]
    pub fn reveal_string(&self) -> String {
        self.reveal.iter().collect()
    }

    #[must_use]
    pub fn remaining_guesses(&self) -> u8 {
        MAX_WRONG_GUESSES.saturating_sub(self.wrong_guesses)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: GuessResult,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    InvalidWord(#[from] WordError),
    #[error("invalid guess token '{0}'")]
    InvalidToken(String),
    #[error("round is already over ({0:?})")]
    RoundOver(RoundStatus),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    secret: SecretWord,
    reveal: Vec<char>,
    tried: BTreeSet<char>,
    wrong_guesses: u8,
    status: RoundStatus,
}

impl GameSession {
    #[must_use]
    pub fn new(secret: SecretWord) -> Self {
        let reveal = vec![PLACEHOLDER; secret.text().len()];
        Self {
            secret,
            reveal,
            tried: BTreeSet::new(),
            wrong_guesses: 0,
            status: RoundStatus::InProgress,
        }
    }

    /// Validates the word and starts a round on it.
    pub fn start(text: &str, definition: &str) -> Result<Self, SessionError> {
        Ok(Self::new(SecretWord::new(text, definition)?))
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn wrong_guesses(&self) -> u8 {
        self.wrong_guesses
    }

    #[must_use]
    pub fn word_length(&self) -> usize {
        self.reveal.len()
    }

    /// The clue text a hint request surfaces.
    #[must_use]
    pub fn hint(&self) -> &str {
        self.secret.definition()
    }

    /// The secret word, once the round is over.
    #[must_use]
    pub fn revealed_secret(&self) -> Option<&SecretWord> {
        self.status.is_terminal().then_some(&self.secret)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            wrong_guesses: self.wrong_guesses,
            reveal: self.reveal.clone(),
            tried_letters: self.tried.iter().copied().collect(),
        }
    }

    /// Applies one guess.
    ///
    /// `token` is `HINT` or a run of ASCII letters. Anything else, or any
    /// guess after the round has ended, is rejected without touching state.
    pub fn submit_guess(&mut self, token: &str) -> Result<Outcome, SessionError> {
        if self.status.is_terminal() {
            return Err(SessionError::RoundOver(self.status));
        }
        if !token.chars().all(|c| c.is_ascii_alphabetic()) || token.is_empty() {
            return Err(SessionError::InvalidToken(token.to_string()));
        }
        let token = token.to_ascii_uppercase();

        let result = if token == HINT_TOKEN {
            self.penalize();
            GuessResult::HintConsumed
        } else if token.len() > 1 {
            self.guess_word(&token)
        } else {
            // Single ASCII letter; checked above.
            let letter = token.chars().next().unwrap_or(PLACEHOLDER);
            self.guess_letter(letter)
        };

        debug_log!(
            "Guess '{}' -> {:?} (wrong {}/{}, status {:?})",
            token,
            result,
            self.wrong_guesses,
            MAX_WRONG_GUESSES,
            self.status
        );

        Ok(Outcome {
            result,
            snapshot: self.snapshot(),
        })
    }

    fn guess_word(&mut self, word: &str) -> GuessResult {
        if word == self.secret.text() {
            self.reveal = self.secret.text().chars().collect();
            self.status = RoundStatus::Won;
            GuessResult::CorrectWord
        } else {
            self.penalize();
            GuessResult::IncorrectWord
        }
    }

    fn guess_letter(&mut self, letter: char) -> GuessResult {
        if !self.tried.insert(letter) {
            return GuessResult::RepeatLetter(letter);
        }

        let mut found = false;
        for (slot, c) in self.reveal.iter_mut().zip(self.secret.text().chars()) {
            if c == letter {
                *slot = c;
                found = true;
            }
        }

        if !found {
            self.penalize();
            return GuessResult::IncorrectLetter(letter);
        }
        if !self.reveal.contains(&PLACEHOLDER) {
            self.status = RoundStatus::Won;
        }
        GuessResult::CorrectLetter(letter)
    }

    fn penalize(&mut self) {
        self.wrong_guesses += 1;
        if self.wrong_guesses >= MAX_WRONG_GUESSES {
            self.status = RoundStatus::Lost;
        }
    }
}
