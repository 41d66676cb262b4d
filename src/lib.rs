// Library interface for password-solver
// This allows integration tests to access internal modules

pub mod candidate;
pub mod cli;
pub mod logging;
pub mod session;
pub mod store;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use candidate::{Candidate, CandidateId, match_count};
pub use session::{SessionError, SessionInterface, UserAction, apply_action, session_loop};
pub use store::{AddCandidateError, CallbackId, Store};
pub use wordbank::{load_wordbank_from_file, load_wordbank_from_str, suggestions};
