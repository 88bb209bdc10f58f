use hangman::cli::{CliInterface, format_farewell, parse_cli};
use hangman::dictionary::WordnikClient;
use hangman::game_state::game_loop;
use hangman::logging::{init_logger, log_target_for};
use hangman::tui::TuiInterface;
use hangman::word_source::WordSource;
use hangman::wordbank::{FallbackTable, load_fallback_from_file};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Some(target) = &log_target_for(cli.tui, cli.verbose)
        && let Err(e) = init_logger(target, cli.verbose)
    {
        eprintln!("Failed to initialise logging: {e}");
    }

    let fallback = match &cli.wordlist_path {
        Some(path) => load_fallback_from_file(path).map_err(|e| format!("from '{path}': {e}")),
        None => FallbackTable::embedded().map_err(|e| format!("(embedded): {e}")),
    };
    let fallback = match fallback {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Failed to load word list {e}");
            return ExitCode::FAILURE;
        }
    };

    let source = if cli.uses_dictionary() {
        WordSource::new(WordnikClient::new(&cli.dictionary_config()), fallback)
    } else {
        if !cli.offline {
            log::warn!("No dictionary API key configured; playing offline from the word list");
        }
        WordSource::offline(fallback)
    };

    if cli.tui {
        let stats = match TuiInterface::new() {
            Ok(mut tui) => game_loop(&source, &mut tui),
            Err(e) => {
                eprintln!("Failed to start terminal interface: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Some(line) = format_farewell(&stats) {
            println!("{line}");
        }
    } else {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&source, &mut interface);
    }

    ExitCode::SUCCESS
}
