//! Session controller shared by the plain and terminal front ends.
//!
//! A front end implements [`SessionInterface`]; [`session_loop`] owns the
//! [`Store`], turns each [`UserAction`] into a store mutation and asks the
//! front end to redraw whenever the store reports a change.

use crate::candidate::{Candidate, CandidateId};
use crate::store::{AddCandidateError, Store};
use crate::wordbank::suggestions;
use crate::{debug_log, info_log};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

pub const SUGGESTION_LIMIT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Add(String),
    Remove(CandidateId),
    SetMatches(CandidateId, Option<usize>),
    Edit(CandidateId, String),
    Reset,
    List,
    Suggest(String),
    Help,
    Exit,
}

/// A user request the session refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] AddCandidateError),
    #[error("no candidate with id {0}")]
    UnknownCandidate(CandidateId),
    #[error("{value} has {actual} letters, the other candidates have {expected}")]
    EditLengthMismatch {
        value: String,
        expected: usize,
        actual: usize,
    },
    #[error("'{0}' is already a candidate")]
    EditDuplicate(String),
    #[error("{value} has only {len} letters, it cannot have {matches} matches")]
    MatchesOutOfRange {
        value: String,
        len: usize,
        matches: usize,
    },
}

/// Front end driven by [`session_loop`].
pub trait SessionInterface {
    /// Waits for the next request. `None` means nothing actionable was entered.
    fn read_action(&mut self, store: &Store) -> Option<UserAction>;
    fn display_store(&mut self, store: &Store);
    fn display_suggestions(&mut self, prefix: &str, words: &[&str]);
    fn display_error(&mut self, error: &SessionError);
    fn display_solution_found(&mut self, solution: &Candidate);
    fn display_help(&mut self);
    fn display_exit_message(&mut self);
}

fn find(store: &Store, id: CandidateId) -> Result<&Candidate, SessionError> {
    store
        .candidate(id)
        .ok_or(SessionError::UnknownCandidate(id))
}

/// Checks an edit the store itself would accept blindly: the new value must
/// keep the length shared with the other candidates and must not duplicate
/// one of them.
///
/// # Errors
///
/// Returns the first rule the edit breaks.
pub fn validate_edit(store: &Store, id: CandidateId, value: &str) -> Result<(), SessionError> {
    find(store, id)?;
    let mut others = store.get_candidates().iter().filter(|c| c.id() != id);
    let actual = value.chars().count();
    if let Some(first) = others.clone().next()
        && first.len() != actual
    {
        return Err(SessionError::EditLengthMismatch {
            value: value.to_string(),
            expected: first.len(),
            actual,
        });
    }
    if others.any(|c| c.value() == value) {
        return Err(SessionError::EditDuplicate(value.to_string()));
    }
    Ok(())
}

/// Match counts above the candidate's length can never be observed.
///
/// # Errors
///
/// Returns an error for unknown ids and impossible counts.
pub fn validate_matches(
    store: &Store,
    id: CandidateId,
    matches: Option<usize>,
) -> Result<(), SessionError> {
    let candidate = find(store, id)?;
    match matches {
        Some(matches) if matches > candidate.len() => Err(SessionError::MatchesOutOfRange {
            value: candidate.value().to_string(),
            len: candidate.len(),
            matches,
        }),
        _ => Ok(()),
    }
}

/// Applies a mutating action to the store. Non-mutating actions are ignored.
///
/// # Errors
///
/// Returns why the action was refused; the store is left untouched then.
pub fn apply_action(store: &mut Store, action: UserAction) -> Result<(), SessionError> {
    debug_log!("apply_action() - {:?}", action);
    match action {
        UserAction::Add(value) => {
            store.add_candidate(value)?;
        }
        UserAction::Remove(id) => {
            find(store, id)?;
            store.remove_candidate(id);
        }
        UserAction::SetMatches(id, matches) => {
            validate_matches(store, id, matches)?;
            store.update_candidate_matches(id, matches);
        }
        UserAction::Edit(id, value) => {
            validate_edit(store, id, &value)?;
            store.update_candidate_value(id, value);
        }
        UserAction::Reset => store.reset(),
        UserAction::List | UserAction::Suggest(_) | UserAction::Help | UserAction::Exit => {}
    }
    Ok(())
}

/// Suggestions for `prefix` that fit the puzzle and are not candidates yet.
pub fn suggest<'a>(store: &Store, wordbank: &'a [String], prefix: &str) -> Vec<&'a str> {
    let mut words = suggestions(
        wordbank,
        prefix,
        store.get_fixed_candidate_length(),
        SUGGESTION_LIMIT + store.len(),
    );
    words.retain(|word| store.get_candidates().iter().all(|c| c.value() != *word));
    words.truncate(SUGGESTION_LIMIT);
    words
}

/// Runs a session until the front end asks to exit, returning the final store.
pub fn session_loop<I: SessionInterface>(wordbank: &[String], interface: &mut I) -> Store {
    let mut store = Store::new();
    let changed = Rc::new(Cell::new(true));
    let flag = Rc::clone(&changed);
    let observer = store.add_callback(move |_| flag.set(true));
    let mut announced: Option<CandidateId> = None;

    loop {
        if changed.replace(false) {
            interface.display_store(&store);
            let solution = store.get_only_valid();
            if let Some(candidate) = solution
                && announced != Some(candidate.id())
            {
                info_log!("session_loop() - solution found: {}", candidate.value());
                interface.display_solution_found(candidate);
            }
            announced = solution.map(Candidate::id);
        }

        let Some(action) = interface.read_action(&store) else {
            continue;
        };
        info_log!("session_loop() - action: {:?}", action);

        match action {
            UserAction::Exit => {
                interface.display_exit_message();
                break;
            }
            UserAction::List => changed.set(true),
            UserAction::Help => interface.display_help(),
            UserAction::Suggest(prefix) => {
                let words = suggest(&store, wordbank, &prefix);
                interface.display_suggestions(&prefix, &words);
            }
            action => {
                if let Err(e) = apply_action(&mut store, action) {
                    debug_log!("session_loop() - refused: {}", e);
                    interface.display_error(&e);
                }
            }
        }
    }

    store.remove_callback(observer);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted front end recording everything it was asked to show.
    #[derive(Default)]
    struct Scripted {
        actions: VecDeque<UserAction>,
        redraws: usize,
        errors: Vec<SessionError>,
        solutions: Vec<String>,
        suggestions: Vec<Vec<String>>,
        helped: bool,
        exited: bool,
    }

    impl Scripted {
        fn new(actions: Vec<UserAction>) -> Self {
            Self {
                actions: actions.into(),
                ..Self::default()
            }
        }
    }

    impl SessionInterface for Scripted {
        fn read_action(&mut self, _store: &Store) -> Option<UserAction> {
            Some(self.actions.pop_front().unwrap_or(UserAction::Exit))
        }

        fn display_store(&mut self, _store: &Store) {
            self.redraws += 1;
        }

        fn display_suggestions(&mut self, _prefix: &str, words: &[&str]) {
            self.suggestions
                .push(words.iter().map(ToString::to_string).collect());
        }

        fn display_error(&mut self, error: &SessionError) {
            self.errors.push(error.clone());
        }

        fn display_solution_found(&mut self, solution: &Candidate) {
            self.solutions.push(solution.value().to_string());
        }

        fn display_help(&mut self) {
            self.helped = true;
        }

        fn display_exit_message(&mut self) {
            self.exited = true;
        }
    }

    fn id(n: u64) -> CandidateId {
        CandidateId::from(n)
    }

    fn words() -> Vec<String> {
        ["APPLE", "AMPLE", "GRAPE", "ANGEL", "ABOUT", "ARMY"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_validate_edit_rules() {
        let mut store = Store::new();
        store.add_candidate("APPLE").unwrap();
        store.add_candidate("GRAPE").unwrap();

        assert_eq!(validate_edit(&store, id(1), "AMPLE"), Ok(()));
        assert_eq!(
            validate_edit(&store, id(1), "FIG"),
            Err(SessionError::EditLengthMismatch {
                value: "FIG".to_string(),
                expected: 5,
                actual: 3
            })
        );
        assert_eq!(
            validate_edit(&store, id(1), "APPLE"),
            Err(SessionError::EditDuplicate("APPLE".to_string()))
        );
        assert_eq!(
            validate_edit(&store, id(5), "APPLE"),
            Err(SessionError::UnknownCandidate(id(5)))
        );
    }

    #[test]
    fn test_validate_edit_lone_candidate_may_change_length() {
        let mut store = Store::new();
        store.add_candidate("APPLE").unwrap();
        assert_eq!(validate_edit(&store, id(0), "FIG"), Ok(()));
    }

    #[test]
    fn test_validate_matches_range() {
        let mut store = Store::new();
        store.add_candidate("APPLE").unwrap();
        assert_eq!(validate_matches(&store, id(0), Some(5)), Ok(()));
        assert_eq!(validate_matches(&store, id(0), None), Ok(()));
        assert!(matches!(
            validate_matches(&store, id(0), Some(6)),
            Err(SessionError::MatchesOutOfRange { matches: 6, .. })
        ));
    }

    #[test]
    fn test_apply_action_refusal_leaves_store_untouched() {
        let mut store = Store::new();
        apply_action(&mut store, UserAction::Add("APPLE".to_string())).unwrap();
        let err = apply_action(&mut store, UserAction::Add("HI".to_string())).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Rejected(AddCandidateError::LengthMismatch { .. })
        ));
        assert_eq!(
            apply_action(&mut store, UserAction::Remove(id(3))),
            Err(SessionError::UnknownCandidate(id(3)))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_suggest_excludes_existing_and_wrong_length() {
        let mut store = Store::new();
        store.add_candidate("APPLE").unwrap();
        let bank = words();
        assert_eq!(suggest(&store, &bank, "A"), vec!["AMPLE", "ANGEL", "ABOUT"]);
    }

    #[test]
    fn test_session_loop_solves_two_candidates() {
        let mut ui = Scripted::new(vec![
            UserAction::Add("APPLE".to_string()),
            UserAction::Add("GRAPE".to_string()),
            UserAction::SetMatches(id(1), Some(1)),
        ]);
        let store = session_loop(&words(), &mut ui);

        assert_eq!(store.len(), 2);
        assert_eq!(ui.solutions, vec!["APPLE"]);
        assert!(ui.errors.is_empty());
        assert!(ui.exited);
        // initial draw plus one per mutation
        assert_eq!(ui.redraws, 4);
    }

    #[test]
    fn test_session_loop_reports_errors() {
        let mut ui = Scripted::new(vec![
            UserAction::Add("APPLE".to_string()),
            UserAction::Add("APPLE".to_string()),
            UserAction::SetMatches(id(0), Some(9)),
            UserAction::Edit(id(4), "GRAPE".to_string()),
        ]);
        let store = session_loop(&words(), &mut ui);

        assert_eq!(store.len(), 1);
        assert_eq!(ui.errors.len(), 3);
        assert_eq!(ui.redraws, 2);
    }

    #[test]
    fn test_session_loop_solution_announced_on_change() {
        let mut ui = Scripted::new(vec![
            UserAction::Add("APPLE".to_string()),
            UserAction::SetMatches(id(0), Some(5)),
            UserAction::List,
            UserAction::SetMatches(id(0), Some(3)),
            UserAction::SetMatches(id(0), Some(5)),
        ]);
        session_loop(&words(), &mut ui);
        assert_eq!(ui.solutions, vec!["APPLE", "APPLE"]);
    }

    #[test]
    fn test_session_loop_non_mutating_actions() {
        let mut ui = Scripted::new(vec![
            UserAction::Help,
            UserAction::Suggest("GR".to_string()),
            UserAction::Reset,
        ]);
        let store = session_loop(&words(), &mut ui);
        assert!(ui.helped);
        assert_eq!(ui.suggestions, vec![vec!["GRAPE".to_string()]]);
        assert!(store.is_empty());
    }
}
