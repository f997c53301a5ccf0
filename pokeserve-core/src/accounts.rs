//! Registration, login and credential recovery.

use chrono::Utc;
use rusqlite::params;

use crate::credentials::CredentialHasher;
use crate::db::Database;
use crate::error::{Constraint, Error, Result};
use crate::models::{LoginOutcome, Player};
use crate::validation;

pub const NAME_TAKEN: &str = "PlayerName already exists!";

#[derive(Debug, Clone)]
pub struct AccountManager {
    db: Database,
    hasher: CredentialHasher,
}

impl AccountManager {
    pub fn new(db: Database) -> Self {
        Self::with_hasher(db, CredentialHasher::default())
    }

    pub fn with_hasher(db: Database, hasher: CredentialHasher) -> Self {
        Self { db, hasher }
    }

    pub fn player_id(&self, name: &str) -> Result<Option<i64>> {
        self.db
            .query_one("SELECT id FROM players WHERE name = ?1", [name], |row| {
                row.get(0)
            })
    }

    pub fn get_player(&self, id: i64) -> Result<Option<Player>> {
        self.db.query_one(
            "SELECT p.id, p.name, s.player_id IS NOT NULL, p.created_at
             FROM players p
             LEFT JOIN player_security s ON s.player_id = p.id
             WHERE p.id = ?1",
            [id],
            |row| {
                Ok(Player {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    has_security_answer: row.get(2)?,
                    created_at: row.get(3)?,
                })
            },
        )
    }

    /// Checks the name first so a caller can tell which half was wrong.
    pub fn authenticate(&self, name: &str, password: &str) -> Result<LoginOutcome> {
        let row = self.db.query_one(
            "SELECT id, password_hash FROM players WHERE name = ?1",
            [name],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )?;
        let Some((id, stored)) = row else {
            tracing::debug!("login rejected: unknown player name");
            return Ok(LoginOutcome::WrongUsername);
        };

        if self.hasher.verify(password, &stored)? {
            tracing::debug!(player_id = id, "player authenticated");
            Ok(LoginOutcome::Authenticated(id))
        } else {
            tracing::debug!(player_id = id, "login rejected: wrong password");
            Ok(LoginOutcome::WrongPassword)
        }
    }

    /// Creates a player. The name check here is only a fast path; the unique
    /// index on `players.name` decides races between concurrent registrations.
    pub fn register(&self, name: &str, password: &str) -> Result<bool> {
        if let Some(message) = validation::validate_credentials(name, password) {
            return Err(Error::Validation(message.to_string()));
        }

        let taken: i64 = self
            .db
            .query_one(
                "SELECT COUNT(*) FROM players WHERE name = ?1",
                [name],
                |row| row.get(0),
            )?
            .unwrap_or(0);
        if taken > 0 {
            return Err(Error::Conflict(NAME_TAKEN.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let inserted = self.db.insert(
            "INSERT INTO players (name, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![name, password_hash, Utc::now()],
        );
        match inserted {
            Ok(id) => {
                tracing::info!(player_id = id, "registered player");
                Ok(true)
            }
            Err(err) if err.constraint() == Some(Constraint::Unique) => {
                Err(Error::Conflict(NAME_TAKEN.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Stores or replaces the player's recovery answer in one statement.
    pub fn set_security_answer(&self, player_id: i64, answer: &str) -> Result<()> {
        if let Some(message) = validation::validate_security_answer(answer) {
            return Err(Error::Validation(message.to_string()));
        }

        let answer_hash = self.hasher.hash(answer)?;
        let written = self.db.execute(
            "INSERT INTO player_security (player_id, answer_hash, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(player_id) DO UPDATE SET
                 answer_hash = excluded.answer_hash,
                 updated_at = excluded.updated_at",
            params![player_id, answer_hash, Utc::now()],
        );
        match written {
            Ok(_) => {
                tracing::info!(player_id, "stored security answer");
                Ok(())
            }
            Err(err) if err.constraint() == Some(Constraint::ForeignKey) => {
                Err(Error::NotFound("player"))
            }
            Err(err) => Err(err),
        }
    }

    /// False when the answer differs, when no answer was ever set, or when the
    /// player does not exist.
    pub fn check_security_answer(&self, player_id: i64, answer: &str) -> Result<bool> {
        let stored: Option<String> = self.db.query_one(
            "SELECT answer_hash FROM player_security WHERE player_id = ?1",
            [player_id],
            |row| row.get(0),
        )?;
        match stored {
            Some(hash) => self.hasher.verify(answer, &hash),
            None => Ok(false),
        }
    }

    /// Replaces the password. Returns false when no such player exists.
    pub fn reset_password(&self, player_id: i64, new_password: &str) -> Result<bool> {
        if let Some(message) = validation::validate_password(new_password) {
            return Err(Error::Validation(message.to_string()));
        }

        let password_hash = self.hasher.hash(new_password)?;
        let updated = self.db.execute(
            "UPDATE players SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, player_id],
        )?;
        if updated > 0 {
            tracing::info!(player_id, "password reset");
        }
        Ok(updated > 0)
    }
}
