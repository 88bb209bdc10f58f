use crate::session::MAX_WRONG_GUESSES;

const STAGES: [&str; MAX_WRONG_GUESSES as usize + 1] = [
    "  +---+\n  |   |\n      |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n      |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n  |   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|   |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n      |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n /    |\n      |\n=========",
    "  +---+\n  |   |\n  O   |\n /|\\  |\n / \\  |\n      |\n=========",
];

/// Gallows drawing for the given number of wrong guesses, clamped to the
/// final stage.
#[must_use]
pub fn stage(wrong_guesses: u8) -> &'static str {
    STAGES[usize::from(wrong_guesses.min(MAX_WRONG_GUESSES))]
}
