//! TUI (Terminal User Interface) module for Hangman
//!
//! This module provides a full-screen terminal interface using Ratatui.
//!
//! # Architecture
//! - `TuiModel`: everything shown on screen plus the key handling, with no
//!   terminal attached so it can be driven directly
//! - `TuiInterface`: owns the terminal, renders the model and implements
//!   `GameInterface`
//!
//! # State Machine
//! - `Fetching` → `EnteringGuess` → `RoundOver` → back to `Fetching` on replay

use crate::cli::guess_feedback;
use crate::gallows;
use crate::game_state::{GameInterface, RoundSummary, UserAction};
use crate::session::{GuessResult, HINT_TOKEN, MAX_WRONG_GUESSES, Outcome, RoundStatus, Snapshot};
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const MAX_INPUT_LEN: usize = 24;
const GALLOWS_PANEL_WIDTH: u16 = 15;
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

// Style constants for consistent UI
const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const WORD_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum TuiState {
    #[default]
    Fetching,
    EnteringGuess,
    /// Round finished; waiting for the replay answer.
    RoundOver,
}

#[derive(Debug, Clone)]
struct FinishedRound {
    status: RoundStatus,
    word: String,
    definition: String,
}

#[derive(Debug, Default)]
struct TuiModel {
    state: TuiState,
    current_input: String,
    snapshot: Option<Snapshot>,
    hint: Option<String>,
    finished: Option<FinishedRound>,
    message: String,
    message_costly: bool,
    error_message: String,
    status: String,
}

impl TuiModel {
    fn handle_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        // Only process Press events, ignore Release and Repeat to avoid double input
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            info_log!("handle_key() - Ctrl-C pressed, returning Quit");
            return Some(UserAction::Quit);
        }
        match self.state {
            TuiState::EnteringGuess => self.handle_guess_key(key),
            TuiState::RoundOver => Self::handle_round_over_key(key),
            TuiState::Fetching => None,
        }
    }

    fn handle_guess_key(&mut self, key: KeyEvent) -> Option<UserAction> {
        self.error_message.clear();
        let has_modifier = key.modifiers.contains(KeyModifiers::ALT)
            || key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char(c) if c.is_ascii_alphabetic() => {
                if has_modifier {
                    debug_log!(
                        "handle_guess_key() - Ignoring character with modifier: {:?}",
                        key.modifiers
                    );
                } else if self.current_input.len() >= MAX_INPUT_LEN {
                    self.error_message = format!("Guesses are limited to {MAX_INPUT_LEN} letters.");
                } else {
                    self.current_input.push(c.to_ascii_uppercase());
                }
            }
            KeyCode::Char('?') => {
                self.current_input.clear();
                return Some(UserAction::Guess(HINT_TOKEN.to_string()));
            }
            KeyCode::Char(c) => {
                self.error_message = format!("Only letters are allowed! ('{c}' is not a letter)");
            }
            KeyCode::Backspace => {
                self.current_input.pop();
            }
            KeyCode::Enter if self.current_input.is_empty() => {
                self.error_message = "Type a letter, a word, or 'hint' first.".to_string();
            }
            KeyCode::Enter => {
                let guess = std::mem::take(&mut self.current_input);
                info_log!("handle_guess_key() - Submitting guess '{}'", guess);
                return Some(UserAction::Guess(guess));
            }
            KeyCode::Esc => {
                info_log!("handle_guess_key() - ESC pressed, returning Quit");
                return Some(UserAction::Quit);
            }
            _ => {
                debug_log!("handle_guess_key() - Ignoring key: {:?}", key.code);
            }
        }
        None
    }

    fn handle_round_over_key(key: KeyEvent) -> Option<UserAction> {
        match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(UserAction::PlayAgain),
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(UserAction::Quit),
            _ => None,
        }
    }

    fn start_round(&mut self, word_length: usize) {
        self.state = TuiState::EnteringGuess;
        self.current_input.clear();
        self.hint = None;
        self.finished = None;
        self.error_message.clear();
        self.message = format!("Let's begin! The word has {word_length} letters.");
        self.message_costly = false;
        self.status = "Enter a letter, a whole word, or 'hint'".to_string();
    }

    fn record_outcome(&mut self, outcome: &Outcome, hint: &str) {
        if outcome.result == GuessResult::HintConsumed {
            self.hint = Some(hint.to_string());
            self.message = "Hint revealed. That cost a guess.".to_string();
        } else if let Some(line) = guess_feedback(outcome.result, hint) {
            self.message = line.trim_start_matches("--> ").to_string();
        }
        self.message_costly = outcome.result.is_penalty();
        self.snapshot = Some(outcome.snapshot.clone());
    }

    fn finish_round(&mut self, summary: &RoundSummary) {
        self.state = TuiState::RoundOver;
        self.snapshot = Some(summary.snapshot.clone());
        self.finished = Some(FinishedRound {
            status: summary.status,
            word: summary.word.to_string(),
            definition: summary.definition.to_string(),
        });
        self.status = match summary.status {
            RoundStatus::Won => "You won! Play again?".to_string(),
            _ => "Game over. Play again?".to_string(),
        };
    }
}

/// Render the complete UI layout from the model.
fn render(f: &mut Frame, model: &TuiModel) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Title
            Constraint::Length(9),  // Gallows and word
            Constraint::Min(6),     // Messages
            Constraint::Length(3),  // Status line
            Constraint::Length(3),  // Instructions
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(GALLOWS_PANEL_WIDTH), Constraint::Min(20)])
        .split(chunks[1]);

    render_title(f, chunks[0]);
    render_gallows(f, body[0], model);
    render_word(f, body[1], model);
    render_messages(f, chunks[2], model);
    render_status(f, chunks[3], &model.status);
    render_instructions(f, chunks[4], model.state);
}

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("HANGMAN")
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_gallows(f: &mut Frame, area: Rect, model: &TuiModel) {
    let wrong = model.snapshot.as_ref().map_or(0, |s| s.wrong_guesses);
    let style = if wrong >= MAX_WRONG_GUESSES {
        ERROR_STYLE
    } else {
        Style::default()
    };
    let lines: Vec<Line> = gallows::stage(wrong).lines().map(Line::from).collect();
    let paragraph = Paragraph::new(lines)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_word(f: &mut Frame, area: Rect, model: &TuiModel) {
    let mut lines = Vec::new();

    if let Some(snapshot) = &model.snapshot {
        let word: Vec<String> = snapshot.reveal.iter().map(char::to_string).collect();
        lines.push(Line::from(vec![
            Span::raw("Word:  "),
            Span::styled(word.join(" "), WORD_STYLE),
        ]));
        lines.push(Line::from(""));

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
        lines.push(Line::from(format!("Used letters: {used}")));

        let remaining = snapshot.remaining_guesses();
        let counter_style = if remaining <= 1 { ERROR_STYLE } else { INFO_STYLE };
        lines.push(Line::from(vec![
            Span::raw("Wrong guesses: "),
            Span::styled(
                format!("{} of {}", snapshot.wrong_guesses, MAX_WRONG_GUESSES),
                counter_style,
            ),
        ]));
    }

    if model.state == TuiState::EnteringGuess {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("> ", HEADER_STYLE),
            Span::styled(format!("{}_", model.current_input), WORD_STYLE),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(Block::default().title("Word").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, area: Rect, model: &TuiModel) {
    let mut lines = Vec::new();

    if let Some(finished) = &model.finished {
        let (headline, style) = match finished.status {
            RoundStatus::Won => ("CONGRATULATIONS! YOU WON!", SUCCESS_STYLE),
            _ => ("GAME OVER! You lost.", ERROR_STYLE),
        };
        lines.push(Line::from(Span::styled(headline, style)));
        lines.push(Line::from(format!("The word was: {}", finished.word)));
        lines.push(Line::from(format!("Definition: {}", finished.definition)));
        lines.push(Line::from(""));
    } else if let Some(hint) = &model.hint {
        lines.push(Line::from(vec![
            Span::styled("Hint: ", INFO_STYLE),
            Span::raw(hint.as_str()),
        ]));
        lines.push(Line::from(""));
    }

    if !model.message.is_empty() && model.finished.is_none() {
        let style = if model.message_costly {
            ERROR_STYLE
        } else {
            MESSAGE_STYLE
        };
        lines.push(Line::from(Span::styled(model.message.as_str(), style)));
    }

    if !model.error_message.is_empty() {
        lines.push(Line::from(Span::styled(model.error_message.as_str(), ERROR_STYLE)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Messages").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::Fetching => "Fetching a new word...",
        TuiState::EnteringGuess => {
            "Type a letter or word | ENTER: Submit | ?: Hint (costs a guess) | ESC: Quit"
        }
        TuiState::RoundOver => "Y: Play again | N: Quit",
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let status_text = if status.is_empty() { "Ready" } else { status };
    let paragraph = Paragraph::new(status_text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

/// Main TUI interface component.
///
/// Manages terminal rendering, input handling, and game state display.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    model: TuiModel,
}

impl TuiInterface {
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal setup complete: alternate screen, cursor hidden");

        Ok(Self {
            terminal,
            model: TuiModel::default(),
        })
    }

    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        draw_model(&mut self.terminal, &self.model)
    }

    /// Log and handle draw errors appropriately
    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Blocks until a key produces an action. Terminal errors end the game.
    fn wait_for_action(&mut self) -> UserAction {
        loop {
            if self.draw().is_err() {
                info_log!("wait_for_action() - Draw failed, returning InputClosed");
                return UserAction::InputClosed;
            }
            match read_key() {
                Ok(Some(key)) => {
                    if let Some(action) = self.model.handle_key(key) {
                        return action;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    info_log!("wait_for_action() - Input error: {}", e);
                    return UserAction::InputClosed;
                }
            }
        }
    }
}

fn draw_model<B: Backend>(terminal: &mut Terminal<B>, model: &TuiModel) -> Result<(), io::Error> {
    terminal.draw(|f| render(f, model))?;
    Ok(())
}

/// Poll with a timeout, returning the next key event if one arrived.
fn read_key() -> Result<Option<KeyEvent>, io::Error> {
    if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) => Ok(Some(key)),
        other => {
            debug_log!("read_key() - Ignoring event: {:?}", other);
            Ok(None)
        }
    }
}

impl GameInterface for TuiInterface {
    fn display_welcome(&mut self) {
        self.model.message = "Welcome to Hangman!".to_string();
        self.draw_or_log();
    }

    fn display_fetching_message(&mut self) {
        self.model.state = TuiState::Fetching;
        self.model.status = "Fetching a new word...".to_string();
        self.draw_or_log();
    }

    fn display_round_start(&mut self, word_length: usize) {
        self.model.start_round(word_length);
        self.draw_or_log();
    }

    fn display_state(&mut self, snapshot: &Snapshot) {
        self.model.snapshot = Some(snapshot.clone());
    }

    fn read_guess(&mut self) -> Option<UserAction> {
        Some(self.wait_for_action())
    }

    fn display_guess_result(&mut self, outcome: &Outcome, hint: &str) {
        self.model.record_outcome(outcome, hint);
        self.draw_or_log();
    }

    fn display_round_over(&mut self, summary: &RoundSummary) {
        self.model.finish_round(summary);
        self.draw_or_log();
    }

    fn read_play_again(&mut self) -> Option<UserAction> {
        Some(self.wait_for_action())
    }

    fn display_goodbye(&mut self) {
        self.model.status = "Thanks for playing!".to_string();
        self.draw_or_log();
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
