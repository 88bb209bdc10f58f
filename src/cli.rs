use crate::dictionary::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, DictionaryConfig};
use crate::gallows;
use crate::game_state::{GameInterface, GameStats, RoundSummary, UserAction};
use crate::session::{GuessResult, HINT_TOKEN, MAX_WRONG_GUESSES, Outcome, RoundStatus, Snapshot};
use crate::wordbank::is_alphabetic;
use clap::Parser;
use std::io::BufRead;
use std::time::Duration;

const RULE: &str = "========================================";

/// Hangman against words from an online dictionary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to an offline word list, one `WORD:Definition` per line
    #[arg(short = 'i', long = "input")]
    pub wordlist_path: Option<String>,

    /// Use the full-screen terminal interface
    #[arg(long)]
    pub tui: bool,

    /// Never contact the dictionary service
    #[arg(long)]
    pub offline: bool,

    /// Wordnik API key. Without one the game plays offline from the word list
    #[arg(long, env = "WORDNIK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Dictionary service base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Remote lookups need a key; without one every request is refused.
    #[must_use]
    pub fn uses_dictionary(&self) -> bool {
        !self.offline && self.api_key.is_some()
    }

    #[must_use]
    pub fn dictionary_config(&self) -> DictionaryConfig {
        DictionaryConfig {
            base_url: self.api_base.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub enum GuessInput {
    Valid(String),
    Invalid,
    Closed,
}

/// Expects input that is already trimmed and uppercased.
fn is_valid_guess(input: &str) -> bool {
    input == HINT_TOKEN || is_alphabetic(input)
}

fn read_trimmed_line<R: BufRead>(reader: &mut R) -> Option<String> {
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn display_input_closed() {
    println!("\nInput stream closed. Exiting game.");
}

pub fn read_guess<R: BufRead>(reader: &mut R) -> GuessInput {
    println!("\nEnter your guess (a letter, a word, or 'hint'):");
    let Some(input) = read_trimmed_line(reader) else {
        display_input_closed();
        return GuessInput::Closed;
    };
    let input = input.to_ascii_uppercase();

    if is_valid_guess(&input) {
        GuessInput::Valid(input)
    } else {
        println!("Invalid input. Please try again.");
        GuessInput::Invalid
    }
}

pub fn read_play_again<R: BufRead>(reader: &mut R) -> Option<UserAction> {
    println!("\nDo you want to play again? (y/n):");
    let Some(input) = read_trimmed_line(reader) else {
        display_input_closed();
        return Some(UserAction::InputClosed);
    };

    match input.to_lowercase().as_str() {
        "y" | "yes" => Some(UserAction::PlayAgain),
        "n" | "no" => Some(UserAction::Quit),
        _ => {
            println!("Invalid input. Please enter 'y' or 'n'.");
            None
        }
    }
}

#[must_use]
pub fn format_state(snapshot: &Snapshot) -> String {
    let word: Vec<String> = snapshot.reveal.iter().map(char::to_string).collect();
    let used = if snapshot.tried_letters.is_empty() {
        "None".to_string()
    } else {
        snapshot
            .tried_letters
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "{}\n{}\n\nWord: {}\nUsed letters: {}\nWrong Guesses: {} of {}",
        "-".repeat(40),
        gallows::stage(snapshot.wrong_guesses),
        word.join(" "),
        used,
        snapshot.wrong_guesses,
        MAX_WRONG_GUESSES
    )
}

/// Player-facing line for a guess; `None` when the round summary says it all.
#[must_use]
pub fn guess_feedback(result: GuessResult, hint: &str) -> Option<String> {
    match result {
        GuessResult::HintConsumed => Some(format!("--> Hint (Definition): {hint}")),
        GuessResult::CorrectLetter(_) => Some("--> Good guess!".to_string()),
        GuessResult::IncorrectLetter(_) => {
            Some("--> Sorry, that letter is not in the word.".to_string())
        }
        GuessResult::RepeatLetter(_) => Some("--> You've already tried that letter!".to_string()),
        GuessResult::IncorrectWord => Some("--> Sorry, that's not the right word.".to_string()),
        GuessResult::CorrectWord => None,
    }
}

#[must_use]
pub fn format_round_over(summary: &RoundSummary) -> String {
    let headline = match summary.status {
        RoundStatus::Won => "   CONGRATULATIONS! YOU WON!",
        _ => "          GAME OVER! You lost.",
    };
    let art = if summary.status == RoundStatus::Lost {
        format!("{}\n", gallows::stage(MAX_WRONG_GUESSES))
    } else {
        String::new()
    };
    format!(
        "{art}{RULE}\n{headline}\n   The word was: {}\n   Definition: {}\n{RULE}",
        summary.word, summary.definition
    )
}

/// Closing line printed after the full-screen interface exits. Nothing when
/// input closed or no round finished.
#[must_use]
pub fn format_farewell(stats: &GameStats) -> Option<String> {
    if stats.input_closed || stats.rounds_played() == 0 {
        return None;
    }
    Some(format!(
        "Thanks for playing! You won {} of {} rounds.",
        stats.rounds_won,
        stats.rounds_played()
    ))
}

pub fn display_welcome() {
    println!("{RULE}");
    println!("        WELCOME TO HANGMAN");
    println!("   Words courtesy of the Wordnik API");
    println!("{RULE}");
}

pub fn display_fetching_message() {
    println!("\nFetching a new word...");
}

pub fn display_round_start(word_length: usize) {
    println!("Let's begin! The word has {word_length} letters.");
}

pub fn display_goodbye() {
    println!("\nThanks for playing!");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for line-based play
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_welcome(&mut self) {
        display_welcome();
    }

    fn display_fetching_message(&mut self) {
        display_fetching_message();
    }

    fn display_round_start(&mut self, word_length: usize) {
        display_round_start(word_length);
    }

    fn display_state(&mut self, snapshot: &Snapshot) {
        println!("\n{}", format_state(snapshot));
    }

    fn read_guess(&mut self) -> Option<UserAction> {
        match read_guess(&mut self.reader) {
            GuessInput::Valid(guess) => Some(UserAction::Guess(guess)),
            GuessInput::Closed => Some(UserAction::InputClosed),
            GuessInput::Invalid => None,
        }
    }

    fn display_guess_result(&mut self, outcome: &Outcome, hint: &str) {
        if let Some(line) = guess_feedback(outcome.result, hint) {
            println!("{line}");
        }
    }

    fn display_round_over(&mut self, summary: &RoundSummary) {
        println!("\n{}", format_round_over(summary));
    }

    fn read_play_again(&mut self) -> Option<UserAction> {
        read_play_again(&mut self.reader)
    }

    fn display_goodbye(&mut self) {
        display_goodbye();
    }
}
