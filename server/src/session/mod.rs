//! Accounts, login sessions and authenticated review edits

pub mod manager;
pub mod routes;
pub mod state;

pub use manager::{SessionError, SessionManager};
pub use state::{Account, CredentialHasher, ReviewerPolicy, SessionConfig, Sha256Hasher};
