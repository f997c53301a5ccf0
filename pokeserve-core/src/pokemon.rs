//! Player-owned and enemy pokemon persistence.
//!
//! A player pokemon is created empty and gets its stats in a second call. In
//! between, stats lookups for it miss (`Ok(None)`), which callers treat as
//! "not found" rather than as a failure.

use chrono::Utc;
use rusqlite::{params, Row};

use crate::db::Database;
use crate::error::{Constraint, Error, Result};
use crate::models::{EnemyPokemon, PlayerPokemon, PokemonStats, StatsInput};
use crate::validation;

pub const STATS_EXIST: &str = "Pokemon stats already exist; update them instead";

const PLAYER_POKEMON_COLUMNS: &str = "pp.id, pp.player_id, pp.created_at,
    s.pokemon_id, s.name, s.xp, s.level, s.hp, s.evolution";

#[derive(Debug, Clone)]
pub struct PokemonRepository {
    db: Database,
}

impl PokemonRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Inserts a stats-less pokemon for `player_id` and returns its id.
    pub fn create_player_pokemon(&self, player_id: i64) -> Result<i64> {
        let inserted = self.db.insert(
            "INSERT INTO player_pokemon (player_id, created_at) VALUES (?1, ?2)",
            params![player_id, Utc::now()],
        );
        match inserted {
            Ok(id) => {
                tracing::info!(player_id, pokemon_id = id, "created player pokemon");
                Ok(id)
            }
            Err(err) if err.constraint() == Some(Constraint::ForeignKey) => {
                Err(Error::NotFound("player"))
            }
            Err(err) => Err(err),
        }
    }

    /// Attaches the first stats row to a pokemon and returns the stored record.
    /// A pokemon has at most one stats row; later changes go through
    /// [`Self::update_stats`].
    pub fn attach_stats(&self, pokemon_id: i64, stats: StatsInput) -> Result<PokemonStats> {
        if let Some(message) = validation::validate_stats(&stats) {
            return Err(Error::Validation(message));
        }

        let inserted = self.db.execute(
            "INSERT INTO player_pokemon_stats (pokemon_id, name, xp, level, hp, evolution)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                pokemon_id,
                stats.name,
                stats.xp,
                stats.level,
                stats.hp,
                stats.evolution
            ],
        );
        match inserted {
            Ok(_) => {
                tracing::info!(pokemon_id, "attached pokemon stats");
                Ok(stats.into_stats(pokemon_id))
            }
            Err(err) => match err.constraint() {
                Some(Constraint::ForeignKey) => Err(Error::NotFound("pokemon")),
                Some(Constraint::PrimaryKey | Constraint::Unique) => {
                    Err(Error::Conflict(STATS_EXIST.to_string()))
                }
                _ => Err(err),
            },
        }
    }

    /// Overwrites a pokemon's stats. Returns false when it has no stats row.
    pub fn update_stats(&self, pokemon_id: i64, stats: &StatsInput) -> Result<bool> {
        if let Some(message) = validation::validate_stats(stats) {
            return Err(Error::Validation(message));
        }

        let updated = self.db.execute(
            "UPDATE player_pokemon_stats
             SET xp = ?1, level = ?2, hp = ?3, name = ?4, evolution = ?5
             WHERE pokemon_id = ?6",
            params![
                stats.xp,
                stats.level,
                stats.hp,
                stats.name,
                stats.evolution,
                pokemon_id
            ],
        )?;
        tracing::debug!(pokemon_id, updated, "updated pokemon stats");
        Ok(updated > 0)
    }

    pub fn get_player_pokemon_stats(&self, pokemon_id: i64) -> Result<Option<PokemonStats>> {
        self.db.query_one(
            "SELECT pokemon_id, name, xp, level, hp, evolution
             FROM player_pokemon_stats WHERE pokemon_id = ?1",
            [pokemon_id],
            |row| {
                Ok(PokemonStats {
                    pokemon_id: row.get(0)?,
                    name: row.get(1)?,
                    xp: row.get(2)?,
                    level: row.get(3)?,
                    hp: row.get(4)?,
                    evolution: row.get(5)?,
                })
            },
        )
    }

    pub fn get_player_pokemon(&self, pokemon_id: i64) -> Result<Option<PlayerPokemon>> {
        self.db.query_one(
            &format!(
                "SELECT {PLAYER_POKEMON_COLUMNS}
                 FROM player_pokemon pp
                 LEFT JOIN player_pokemon_stats s ON s.pokemon_id = pp.id
                 WHERE pp.id = ?1"
            ),
            [pokemon_id],
            player_pokemon_from_row,
        )
    }

    /// The oldest pokemon owned by the player, if any.
    pub fn first_pokemon_id(&self, player_id: i64) -> Result<Option<i64>> {
        self.db.query_one(
            "SELECT id FROM player_pokemon WHERE player_id = ?1 ORDER BY id LIMIT 1",
            [player_id],
            |row| row.get(0),
        )
    }

    pub fn list_player_pokemon(&self, player_id: i64) -> Result<Vec<PlayerPokemon>> {
        self.db.query_all(
            &format!(
                "SELECT {PLAYER_POKEMON_COLUMNS}
                 FROM player_pokemon pp
                 LEFT JOIN player_pokemon_stats s ON s.pokemon_id = pp.id
                 WHERE pp.player_id = ?1
                 ORDER BY pp.id"
            ),
            [player_id],
            player_pokemon_from_row,
        )
    }

    pub fn get_enemy_pokemon(&self, id: i64) -> Result<Option<EnemyPokemon>> {
        self.db.query_one(
            "SELECT e.id, e.name, s.level, s.hp, s.special_move
             FROM enemy_pokemon e
             JOIN enemy_pokemon_stats s ON s.enemy_pokemon_id = e.id
             WHERE e.id = ?1",
            [id],
            |row| {
                Ok(EnemyPokemon {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    level: row.get(2)?,
                    hp: row.get(3)?,
                    special_move: row.get(4)?,
                })
            },
        )
    }

    /// Writes an enemy and its stats, replacing any existing entry with the same id.
    pub fn upsert_enemy_pokemon(&self, enemy: &EnemyPokemon) -> Result<()> {
        self.db.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO enemy_pokemon (id, name) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET name = excluded.name",
                params![enemy.id, enemy.name],
            )?;
            tx.execute(
                "INSERT INTO enemy_pokemon_stats (enemy_pokemon_id, level, hp, special_move)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(enemy_pokemon_id) DO UPDATE SET
                     level = excluded.level,
                     hp = excluded.hp,
                     special_move = excluded.special_move",
                params![enemy.id, enemy.level, enemy.hp, enemy.special_move],
            )?;
            tx.commit()?;
            Ok(())
        })
    }

    /// Loads enemies from a JSON array and returns how many were written.
    pub fn seed_enemies(&self, json: &str) -> Result<usize> {
        let enemies: Vec<EnemyPokemon> = serde_json::from_str(json)?;
        for enemy in &enemies {
            self.upsert_enemy_pokemon(enemy)?;
        }
        tracing::info!(count = enemies.len(), "seeded enemy pokemon");
        Ok(enemies.len())
    }
}

fn player_pokemon_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerPokemon> {
    let stats = match row.get::<_, Option<i64>>(3)? {
        Some(pokemon_id) => Some(PokemonStats {
            pokemon_id,
            name: row.get(4)?,
            xp: row.get(5)?,
            level: row.get(6)?,
            hp: row.get(7)?,
            evolution: row.get(8)?,
        }),
        None => None,
    };
    Ok(PlayerPokemon {
        id: row.get(0)?,
        player_id: row.get(1)?,
        stats,
        created_at: row.get(2)?,
    })
}
