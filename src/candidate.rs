use std::fmt;

/// Identifier of a candidate, unique for the lifetime of a [`Store`](crate::Store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateId(pub(crate) u64);

impl CandidateId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CandidateId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One guessed word and the number of positions it was observed to share
/// with the secret, if that has been recorded yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    id: CandidateId,
    pub(crate) value: String,
    pub(crate) matches: Option<usize>,
}

impl Candidate {
    pub(crate) fn new(id: CandidateId, value: String) -> Self {
        Self {
            id,
            value,
            matches: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> CandidateId {
        self.id
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn matches(&self) -> Option<usize> {
        self.matches
    }

    /// Length of the value in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Stable key for list rendering.
    #[must_use]
    pub fn key(&self) -> String {
        self.id.to_string()
    }

    /// Whether this candidate could still be the secret given every match
    /// count recorded in `all`.
    ///
    /// A recorded count on the candidate itself must cover its whole length.
    /// Every other candidate with a recorded count must share exactly that
    /// many positions with this one. Candidates without a count constrain
    /// nothing.
    #[must_use]
    pub fn is_valid(&self, all: &[Candidate]) -> bool {
        if let Some(matches) = self.matches
            && matches != self.len()
        {
            return false;
        }

        all.iter()
            .filter(|other| other.id != self.id)
            .all(|other| match other.matches {
                Some(matches) => match_count(&other.value, &self.value) == matches,
                None => true,
            })
    }
}

/// Counts the positions at which `a` and `b` hold the same character.
///
/// Both words are expected to have the same length; otherwise only the
/// shorter prefix is compared.
#[must_use]
pub fn match_count(a: &str, b: &str) -> usize {
    a.chars().zip(b.chars()).filter(|(x, y)| x == y).count()
}
