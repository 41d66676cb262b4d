use crate::candidate::{Candidate, CandidateId};
use crate::session::{SessionError, SessionInterface, UserAction};
use crate::store::Store;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;

/// Terminal password solver CLI options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited word list used for suggestions
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Use the line-oriented interface instead of the terminal UI
    #[arg(long)]
    pub plain: bool,

    /// Where to write the log (defaults to the local data directory)
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),
    #[error("'{command}' needs {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    #[error("'{0}' is not a candidate id")]
    BadId(String),
    #[error("'{0}' is not a match count (use a number or '-')")]
    BadCount(String),
    #[error("'{0}' is not a word (letters only)")]
    BadWord(String),
    #[error("unexpected '{0}' at the end of the command")]
    Trailing(String),
}

const HELP_TEXT: &str = "\
Commands:
  WORD | add WORD     add a candidate (use 'add' for words that are
                      commands, e.g. 'add reset')
  set ID N            record N matching letters for a candidate
  set ID - | clear ID forget the recorded matches
  edit ID WORD        replace a candidate's word
  rm ID               remove a candidate
  reset               remove every candidate (no arguments)
  list                show the candidates again
  suggest [PREFIX]    suggest words from the word list
  help                show this help
  exit                quit";

fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

fn parse_word(token: Option<&str>, command: &'static str) -> Result<String, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument {
        command,
        what: "a word",
    })?;
    if is_valid_word(token) {
        Ok(token.to_uppercase())
    } else {
        Err(CommandError::BadWord(token.to_string()))
    }
}

fn parse_id(token: Option<&str>, command: &'static str) -> Result<CandidateId, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument {
        command,
        what: "a candidate id",
    })?;
    token
        .parse::<u64>()
        .map(CandidateId::from)
        .map_err(|_| CommandError::BadId(token.to_string()))
}

fn parse_count(token: Option<&str>) -> Result<Option<usize>, CommandError> {
    match token {
        None => Err(CommandError::MissingArgument {
            command: "set",
            what: "a match count",
        }),
        Some("-") => Ok(None),
        Some(token) => token
            .parse::<usize>()
            .map(Some)
            .map_err(|_| CommandError::BadCount(token.to_string())),
    }
}

/// Commands that only make sense with arguments. Typed alone they are
/// taken as a candidate word instead.
const ARGUMENT_COMMANDS: [&str; 6] = ["add", "rm", "remove", "set", "clear", "edit"];

/// Parses one line of the plain interface. Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns a [`CommandError`] describing what is wrong with the line.
pub fn parse_command(line: &str) -> Result<Option<UserAction>, CommandError> {
    let mut tokens = line.split_whitespace();
    let Some(first) = tokens.next() else {
        return Ok(None);
    };

    let keyword = first.to_lowercase();
    let has_arguments = tokens.clone().next().is_some();
    let action = match keyword.as_str() {
        word if !has_arguments && ARGUMENT_COMMANDS.contains(&word) => {
            UserAction::Add(first.to_uppercase())
        }
        "add" => UserAction::Add(parse_word(tokens.next(), "add")?),
        "rm" | "remove" => UserAction::Remove(parse_id(tokens.next(), "rm")?),
        "set" => {
            let id = parse_id(tokens.next(), "set")?;
            UserAction::SetMatches(id, parse_count(tokens.next())?)
        }
        "clear" => UserAction::SetMatches(parse_id(tokens.next(), "clear")?, None),
        "edit" => {
            let id = parse_id(tokens.next(), "edit")?;
            UserAction::Edit(id, parse_word(tokens.next(), "edit")?)
        }
        "reset" => UserAction::Reset,
        "list" | "ls" => UserAction::List,
        "suggest" => UserAction::Suggest(tokens.next().unwrap_or_default().to_uppercase()),
        "help" | "?" => UserAction::Help,
        "exit" | "quit" => UserAction::Exit,
        _ if is_valid_word(first) => UserAction::Add(first.to_uppercase()),
        _ => return Err(CommandError::Unknown(first.to_string())),
    };

    match tokens.next() {
        Some(extra) => Err(CommandError::Trailing(extra.to_string())),
        None => Ok(Some(action)),
    }
}

fn status_label(
    candidate: &Candidate,
    store: &Store,
    only_valid: Option<CandidateId>,
) -> &'static str {
    if only_valid == Some(candidate.id()) {
        "<- PASSWORD"
    } else if candidate.is_valid(store.get_candidates()) {
        "possible"
    } else {
        "ruled out"
    }
}

pub fn display_store(store: &Store) {
    let Some(len) = store.get_fixed_candidate_length() else {
        println!("No candidates yet. Enter a word to add it ('help' for commands).");
        return;
    };

    let only_valid = store.get_only_valid().map(Candidate::id);
    println!("Candidates ({} letters):", len);
    for candidate in store.get_candidates() {
        let matches = candidate
            .matches()
            .map_or_else(|| "-".to_string(), |m| m.to_string());
        println!(
            "  [{:>2}] {:<width$}  matches: {:>2}  {}",
            candidate.id().get(),
            candidate.value(),
            matches,
            status_label(candidate, store, only_valid),
            width = len
        );
    }
}

pub fn display_suggestions(prefix: &str, words: &[&str]) {
    if words.is_empty() {
        println!("No suggestions for '{prefix}'.");
    } else {
        println!("Suggestions: {}", words.join(", "));
    }
}

pub fn display_error(error: &SessionError) {
    println!("Rejected: {error}");
}

pub fn display_solution_found(solution: &Candidate) {
    println!("Password found: {}", solution.value());
}

pub fn display_help() {
    println!("{HELP_TEXT}");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// Plain line-oriented front end reading commands from any `BufRead`.
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> SessionInterface for CliInterface<R> {
    fn read_action(&mut self, _store: &Store) -> Option<UserAction> {
        println!("\nEnter a word or command ('help' for a list):");
        let mut input = String::new();
        match self.reader.read_line(&mut input) {
            Ok(0) | Err(_) => return Some(UserAction::Exit),
            Ok(_) => {}
        }

        match parse_command(&input) {
            Ok(action) => action,
            Err(e) => {
                println!("{e}");
                None
            }
        }
    }

    fn display_store(&mut self, store: &Store) {
        display_store(store);
    }

    fn display_suggestions(&mut self, prefix: &str, words: &[&str]) {
        display_suggestions(prefix, words);
    }

    fn display_error(&mut self, error: &SessionError) {
        display_error(error);
    }

    fn display_solution_found(&mut self, solution: &Candidate) {
        display_solution_found(solution);
    }

    fn display_help(&mut self) {
        display_help();
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn id(n: u64) -> CandidateId {
        CandidateId::from(n)
    }

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["password-solver"]).unwrap();
        assert_eq!(cli.wordbank_path, None);
        assert!(!cli.plain);
        assert!(!cli.verbose);
        assert_eq!(cli.log_file, None);
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "password-solver",
            "-i",
            "words.txt",
            "--plain",
            "--log-file",
            "/tmp/solver.log",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.wordbank_path, Some("words.txt".to_string()));
        assert!(cli.plain);
        assert!(cli.verbose);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/solver.log")));
    }

    #[test]
    fn test_parse_bare_word_adds() {
        assert_eq!(
            parse_command("  apple \n"),
            Ok(Some(UserAction::Add("APPLE".to_string())))
        );
        assert_eq!(
            parse_command("add grape"),
            Ok(Some(UserAction::Add("GRAPE".to_string())))
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_command("   \n"), Ok(None));
    }

    #[test]
    fn test_parse_set_and_clear() {
        assert_eq!(
            parse_command("set 1 3"),
            Ok(Some(UserAction::SetMatches(id(1), Some(3))))
        );
        assert_eq!(
            parse_command("SET 1 -"),
            Ok(Some(UserAction::SetMatches(id(1), None)))
        );
        assert_eq!(
            parse_command("clear 2"),
            Ok(Some(UserAction::SetMatches(id(2), None)))
        );
        assert_eq!(
            parse_command("set 1 lots"),
            Err(CommandError::BadCount("lots".to_string()))
        );
        assert_eq!(
            parse_command("set 1"),
            Err(CommandError::MissingArgument {
                command: "set",
                what: "a match count"
            })
        );
    }

    #[test]
    fn test_parse_edit_remove() {
        assert_eq!(
            parse_command("edit 0 ample"),
            Ok(Some(UserAction::Edit(id(0), "AMPLE".to_string())))
        );
        assert_eq!(parse_command("rm 4"), Ok(Some(UserAction::Remove(id(4)))));
        assert_eq!(
            parse_command("remove x"),
            Err(CommandError::BadId("x".to_string()))
        );
        assert_eq!(
            parse_command("edit 0 b4d"),
            Err(CommandError::BadWord("b4d".to_string()))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("reset"), Ok(Some(UserAction::Reset)));
        assert_eq!(parse_command("list"), Ok(Some(UserAction::List)));
        assert_eq!(parse_command("help"), Ok(Some(UserAction::Help)));
        assert_eq!(parse_command("EXIT"), Ok(Some(UserAction::Exit)));
        assert_eq!(parse_command("quit"), Ok(Some(UserAction::Exit)));
        assert_eq!(
            parse_command("suggest te"),
            Ok(Some(UserAction::Suggest("TE".to_string())))
        );
        assert_eq!(
            parse_command("suggest"),
            Ok(Some(UserAction::Suggest(String::new())))
        );
    }

    #[test]
    fn test_parse_command_words_as_candidates() {
        // Alone, an argument-taking keyword is a word
        assert_eq!(
            parse_command("clear"),
            Ok(Some(UserAction::Add("CLEAR".to_string())))
        );
        assert_eq!(
            parse_command("Edit"),
            Ok(Some(UserAction::Add("EDIT".to_string())))
        );
        assert_eq!(
            parse_command("clear 3"),
            Ok(Some(UserAction::SetMatches(id(3), None)))
        );

        // Argument-less commands need the explicit form
        assert_eq!(
            parse_command("add reset"),
            Ok(Some(UserAction::Add("RESET".to_string())))
        );
        assert_eq!(
            parse_command("reset now"),
            Err(CommandError::Trailing("now".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            parse_command("r2d2"),
            Err(CommandError::Unknown("r2d2".to_string()))
        );
        assert_eq!(
            parse_command("apple grape"),
            Err(CommandError::Trailing("grape".to_string()))
        );
    }

    #[test]
    fn test_read_action_eof_exits() {
        let mut cli = CliInterface::new(Cursor::new(""));
        assert_eq!(cli.read_action(&Store::new()), Some(UserAction::Exit));
    }

    #[test]
    fn test_read_action_invalid_is_none() {
        let mut cli = CliInterface::new(Cursor::new("set x 1\n"));
        assert_eq!(cli.read_action(&Store::new()), None);
    }

    #[test]
    fn test_read_action_sequence() {
        let mut cli = CliInterface::new(Cursor::new("terms\nset 0 2\n"));
        let store = Store::new();
        assert_eq!(
            cli.read_action(&store),
            Some(UserAction::Add("TERMS".to_string()))
        );
        assert_eq!(
            cli.read_action(&store),
            Some(UserAction::SetMatches(id(0), Some(2)))
        );
        assert_eq!(cli.read_action(&store), Some(UserAction::Exit));
    }

    #[test]
    fn test_status_label() {
        let mut store = Store::new();
        let apple = store.add_candidate("APPLE").unwrap();
        let grape = store.add_candidate("GRAPE").unwrap();
        store.update_candidate_matches(grape, Some(1));
        let only = store.get_only_valid().map(Candidate::id);
        assert_eq!(
            status_label(store.candidate(apple).unwrap(), &store, only),
            "<- PASSWORD"
        );
        assert_eq!(
            status_label(store.candidate(grape).unwrap(), &store, only),
            "ruled out"
        );
    }
}
