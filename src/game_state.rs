use crate::dictionary::DictionaryClient;
use crate::info_log;
use crate::session::{GameSession, Outcome, RoundStatus, Snapshot};
use crate::word_source::WordSource;
use log::warn;

/// What the player asked for at a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    /// `HINT` or one or more uppercase letters.
    Guess(String),
    PlayAgain,
    Quit,
    /// Input ended; stop without further output.
    InputClosed,
}

/// End-of-round details for display.
#[derive(Debug)]
pub struct RoundSummary<'a> {
    pub status: RoundStatus,
    pub word: &'a str,
    pub definition: &'a str,
    pub snapshot: &'a Snapshot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub rounds_won: u32,
    pub rounds_lost: u32,
    /// Play stopped because input ended, not because the player left.
    pub input_closed: bool,
}

impl GameStats {
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.rounds_won + self.rounds_lost
    }

    fn record(&mut self, status: RoundStatus) {
        match status {
            RoundStatus::Won => self.rounds_won += 1,
            RoundStatus::Lost => self.rounds_lost += 1,
            RoundStatus::InProgress => {}
        }
    }
}

/// Front-end seam for the game loop.
///
/// Readers return `None` when the input was invalid and the prompt should be
/// repeated; the implementation is responsible for telling the player why.
pub trait GameInterface {
    fn display_welcome(&mut self);
    fn display_fetching_message(&mut self);
    fn display_round_start(&mut self, word_length: usize);
    fn display_state(&mut self, snapshot: &Snapshot);
    fn read_guess(&mut self) -> Option<UserAction>;
    fn display_guess_result(&mut self, outcome: &Outcome, hint: &str);
    fn display_round_over(&mut self, summary: &RoundSummary);
    fn read_play_again(&mut self) -> Option<UserAction>;
    fn display_goodbye(&mut self);
}

enum RoundEnd {
    Finished(RoundStatus),
    Quit,
    InputClosed,
}

/// Plays rounds until the player declines another or input closes.
pub fn game_loop<C, I>(source: &WordSource<C>, interface: &mut I) -> GameStats
where
    C: DictionaryClient,
    I: GameInterface + ?Sized,
{
    let mut stats = GameStats::default();
    interface.display_welcome();

    loop {
        match play_round(source, interface) {
            RoundEnd::Finished(status) => stats.record(status),
            RoundEnd::Quit => {
                interface.display_goodbye();
                return stats;
            }
            RoundEnd::InputClosed => {
                stats.input_closed = true;
                return stats;
            }
        }

        match ask_play_again(interface) {
            UserAction::PlayAgain => {}
            UserAction::InputClosed => {
                stats.input_closed = true;
                return stats;
            }
            _ => {
                interface.display_goodbye();
                return stats;
            }
        }
    }
}

fn play_round<C, I>(source: &WordSource<C>, interface: &mut I) -> RoundEnd
where
    C: DictionaryClient,
    I: GameInterface + ?Sized,
{
    interface.display_fetching_message();
    let mut session = GameSession::new(source.acquire());
    interface.display_round_start(session.word_length());

    while !session.status().is_terminal() {
        interface.display_state(&session.snapshot());
        let token = match interface.read_guess() {
            Some(UserAction::Guess(token)) => token,
            Some(UserAction::Quit) => return RoundEnd::Quit,
            Some(UserAction::InputClosed) => return RoundEnd::InputClosed,
            Some(UserAction::PlayAgain) | None => continue,
        };
        match session.submit_guess(&token) {
            Ok(outcome) => interface.display_guess_result(&outcome, session.hint()),
            Err(e) => warn!("Rejected guess '{token}': {e}"),
        }
    }

    let snapshot = session.snapshot();
    let status = snapshot.status;
    if let Some(secret) = session.revealed_secret() {
        info_log!("Round over: {:?} on '{}'", status, secret.text());
        interface.display_round_over(&RoundSummary {
            status,
            word: secret.text(),
            definition: secret.definition(),
            snapshot: &snapshot,
        });
    }
    RoundEnd::Finished(status)
}

fn ask_play_again<I: GameInterface + ?Sized>(interface: &mut I) -> UserAction {
    loop {
        match interface.read_play_again() {
            Some(UserAction::Guess(_)) | None => {}
            Some(action) => return action,
        }
    }
}
