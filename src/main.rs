use anyhow::{Context, Result};
use password_solver::cli::{CliInterface, parse_cli};
use password_solver::logging::{default_log_path, init_logging};
use password_solver::session::session_loop;
use password_solver::tui::TuiInterface;
use password_solver::wordbank::{EMBEDDED_WORDBANK, load_wordbank_from_file, load_wordbank_from_str};
use password_solver::info_log;
use std::io;

fn main() -> Result<()> {
    let cli = parse_cli();

    if let Some(path) = cli.log_file.clone().or_else(default_log_path) {
        init_logging(&path, cli.verbose)
            .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
    }

    let wordbank = match &cli.wordbank_path {
        Some(path) => load_wordbank_from_file(path)
            .with_context(|| format!("Failed to load word list from '{path}'"))?,
        None => load_wordbank_from_str(EMBEDDED_WORDBANK),
    };
    info_log!("Loaded {} suggestion words", wordbank.len());

    if cli.plain {
        println!("Loaded {} suggestion words.", wordbank.len());
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        session_loop(&wordbank, &mut interface);
    } else {
        let mut interface =
            TuiInterface::new(wordbank.clone()).context("Failed to set up the terminal")?;
        session_loop(&wordbank, &mut interface);
        interface.cleanup().context("Failed to restore the terminal")?;
    }

    Ok(())
}
