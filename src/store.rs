//! The candidate store.
//!
//! Holds every candidate of the current puzzle, answers the derived queries
//! (fixed length, validity, the only valid candidate) and notifies registered
//! observers after each state change.
//!
//! Validity is never cached: every query recomputes it from the current
//! values and match counts, so an edit to one candidate is immediately
//! reflected in the validity of all the others.

use crate::candidate::{Candidate, CandidateId};
use crate::{debug_log, info_log};
use thiserror::Error;

/// Reason a candidate was not added.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddCandidateError {
    #[error("'{0}' is already a candidate")]
    Duplicate(String),
    #[error("candidates must be {expected} letters long, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Handle returned by [`Store::add_callback`], used to deregister the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

type Callback = Box<dyn FnMut(&Store)>;

/// Puts the observer list back into the store on drop, so an observer that
/// panics does not take the others with it.
struct RestoreCallbacks<'a> {
    store: &'a mut Store,
    callbacks: Vec<(CallbackId, Callback)>,
}

impl Drop for RestoreCallbacks<'_> {
    fn drop(&mut self) {
        self.store.callbacks = std::mem::take(&mut self.callbacks);
    }
}

/// Ordered collection of candidates plus the observers of its changes.
///
/// Observers run synchronously inside the mutator that triggered them, in
/// registration order. A panicking observer unwinds through that mutator.
/// Observers only get a shared borrow, so they cannot mutate the store.
#[derive(Default)]
pub struct Store {
    candidates: Vec<Candidate>,
    next_candidate_id: u64,
    callbacks: Vec<(CallbackId, Callback)>,
    next_callback_id: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("candidates", &self.candidates)
            .field("next_candidate_id", &self.next_candidate_id)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut(&Store) + 'static,
    {
        let id = CallbackId(self.next_callback_id);
        self.next_callback_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Deregisters an observer. Returns `false` if it was not registered.
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(cb_id, _)| *cb_id != id);
        self.callbacks.len() != before
    }

    /// Invokes every registered observer.
    pub fn emit_update(&mut self) {
        let callbacks = std::mem::take(&mut self.callbacks);
        debug_log!("Store::emit_update() - notifying {} observers", callbacks.len());
        let mut guard = RestoreCallbacks {
            store: self,
            callbacks,
        };
        let RestoreCallbacks { store, callbacks } = &mut guard;
        for (_, callback) in callbacks.iter_mut() {
            callback(&**store);
        }
    }

    #[must_use]
    pub fn get_candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    #[must_use]
    pub fn candidate(&self, id: CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Length shared by all candidates, or `None` when there are none.
    #[must_use]
    pub fn get_fixed_candidate_length(&self) -> Option<usize> {
        self.candidates.first().map(Candidate::len)
    }

    /// Validity of one candidate against the current set.
    #[must_use]
    pub fn is_valid(&self, id: CandidateId) -> Option<bool> {
        self.candidate(id).map(|c| c.is_valid(&self.candidates))
    }

    pub fn valid_candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates
            .iter()
            .filter(|c| c.is_valid(&self.candidates))
    }

    /// The candidate that is provably the secret, if exactly one is.
    ///
    /// A lone candidate only qualifies once its own recorded matches cover
    /// its whole length; vacuous validity is not evidence.
    #[must_use]
    pub fn get_only_valid(&self) -> Option<&Candidate> {
        match self.candidates.as_slice() {
            [] => None,
            [only] => (only.matches() == Some(only.len())).then_some(only),
            _ => {
                let mut valid = self.valid_candidates();
                let first = valid.next()?;
                valid.next().is_none().then_some(first)
            }
        }
    }

    /// Adds a new candidate with no recorded matches.
    ///
    /// # Errors
    ///
    /// Rejects a value already present, and a value whose length differs from
    /// the existing candidates. A rejected add changes nothing and notifies
    /// no one.
    pub fn add_candidate(
        &mut self,
        value: impl Into<String>,
    ) -> Result<CandidateId, AddCandidateError> {
        let value = value.into();
        if self.candidates.iter().any(|c| c.value() == value) {
            debug_log!("Store::add_candidate() - rejecting duplicate '{}'", value);
            return Err(AddCandidateError::Duplicate(value));
        }

        let actual = value.chars().count();
        if let Some(expected) = self.get_fixed_candidate_length()
            && expected != actual
        {
            debug_log!(
                "Store::add_candidate() - rejecting '{}': length {} != {}",
                value,
                actual,
                expected
            );
            return Err(AddCandidateError::LengthMismatch { expected, actual });
        }

        let id = CandidateId(self.next_candidate_id);
        self.next_candidate_id += 1;
        info_log!("Store::add_candidate() - added '{}' as {}", value, id);
        self.candidates.push(Candidate::new(id, value));
        self.emit_update();
        Ok(id)
    }

    /// Removes the candidate if present. Observers are notified either way.
    pub fn remove_candidate(&mut self, id: CandidateId) {
        self.candidates.retain(|c| c.id() != id);
        info_log!("Store::remove_candidate() - removed {}", id);
        self.emit_update();
    }

    /// Removes every candidate. Ids are not reused afterwards.
    pub fn reset(&mut self) {
        self.candidates.clear();
        info_log!("Store::reset() - cleared all candidates");
        self.emit_update();
    }

    /// Records (or clears, with `None`) the match count of a candidate.
    ///
    /// The count is not range checked; an impossible count simply makes the
    /// candidate invalid. Unknown ids are ignored.
    pub fn update_candidate_matches(&mut self, id: CandidateId, matches: Option<usize>) {
        let Some(candidate) = self.candidates.iter_mut().find(|c| c.id() == id) else {
            debug_log!("Store::update_candidate_matches() - no candidate {}", id);
            return;
        };
        candidate.matches = matches;
        info_log!(
            "Store::update_candidate_matches() - {} now {:?}",
            id,
            matches
        );
        self.emit_update();
    }

    /// Replaces the value of a candidate.
    ///
    /// No length or duplicate check happens here; callers validate edits
    /// beforehand. Unknown ids are ignored.
    pub fn update_candidate_value(&mut self, id: CandidateId, value: impl Into<String>) {
        let Some(candidate) = self.candidates.iter_mut().find(|c| c.id() == id) else {
            debug_log!("Store::update_candidate_value() - no candidate {}", id);
            return;
        };
        candidate.value = value.into();
        info_log!(
            "Store::update_candidate_value() - {} now '{}'",
            id,
            candidate.value
        );
        self.emit_update();
    }
}
