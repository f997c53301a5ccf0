use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. Credential hashes never leave the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub has_security_answer: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of checking a name/password pair. Storage failures are reported
/// separately through `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated(i64),
    WrongUsername,
    WrongPassword,
}

impl LoginOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Authenticated(_) => "true",
            Self::WrongUsername => "Username is incorrect",
            Self::WrongPassword => "Password is incorrect",
        }
    }

    pub fn player_id(&self) -> Option<i64> {
        match self {
            Self::Authenticated(id) => Some(*id),
            _ => None,
        }
    }
}
