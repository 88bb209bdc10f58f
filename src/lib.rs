// Library interface for hangman
// This allows integration tests to access internal modules

pub mod cli;
pub mod dictionary;
pub mod gallows;
pub mod game_state;
pub mod logging;
pub mod session;
pub mod tui;
pub mod word_source;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use dictionary::{Definition, DictionaryClient, LookupError, RandomWord, WordnikClient};
pub use game_state::{GameInterface, GameStats, UserAction, game_loop};
pub use session::{
    GameSession, GuessResult, MAX_WRONG_GUESSES, Outcome, RoundStatus, SessionError, Snapshot,
};
pub use word_source::WordSource;
pub use wordbank::{FallbackTable, SecretWord, load_fallback_from_file, load_fallback_from_str};
