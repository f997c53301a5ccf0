//! Shape checks on user-supplied input, run before any storage access.

use crate::models::StatsInput;

/// Minimum length, in characters, of a player name and of a password.
pub const MIN_CREDENTIAL_LEN: usize = 3;

pub const BOTH_REQUIRED: &str = "You need to input a username and a password";
pub const USERNAME_REQUIRED: &str = "You need to input a username";
pub const PASSWORD_REQUIRED: &str = "You need to input a password";
pub const TOO_SHORT: &str = "Username or Password is less than 3 characters. Too short, try again!";
pub const PASSWORD_TOO_SHORT: &str = "Password is less than 3 characters. Too short, try again!";
pub const ANSWER_REQUIRED: &str = "You need to input a security answer";

/// Checks a name/password pair. Returns the message for the first rule that
/// fails, or `None` when the pair is well-formed.
pub fn validate_credentials(name: &str, password: &str) -> Option<&'static str> {
    match (name.is_empty(), password.is_empty()) {
        (true, true) => Some(BOTH_REQUIRED),
        (true, false) => Some(USERNAME_REQUIRED),
        (false, true) => Some(PASSWORD_REQUIRED),
        _ if too_short(name) || too_short(password) => Some(TOO_SHORT),
        _ => None,
    }
}

/// Checks a replacement password on its own.
pub fn validate_password(password: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if too_short(password) {
        Some(PASSWORD_TOO_SHORT)
    } else {
        None
    }
}

pub fn validate_security_answer(answer: &str) -> Option<&'static str> {
    answer.trim().is_empty().then_some(ANSWER_REQUIRED)
}

/// Battle stats are counters; none of them may go below zero and a pokemon
/// always has a name.
pub fn validate_stats(stats: &StatsInput) -> Option<String> {
    if stats.name.trim().is_empty() {
        return Some("Pokemon name is required".to_string());
    }
    [
        ("xp", stats.xp),
        ("level", stats.level),
        ("hp", stats.hp),
        ("evolution", stats.evolution),
    ]
    .into_iter()
    .find(|(_, value)| *value < 0)
    .map(|(field, _)| format!("Pokemon {field} must not be negative"))
}

fn too_short(value: &str) -> bool {
    value.chars().count() < MIN_CREDENTIAL_LEN
}
