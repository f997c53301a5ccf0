use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pokemon owned by a player. `stats` is `None` between creation and the
/// first stats attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerPokemon {
    pub id: i64,
    pub player_id: i64,
    pub stats: Option<PokemonStats>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStats {
    pub pokemon_id: i64,
    pub name: String,
    pub xp: i64,
    pub level: i64,
    pub hp: i64,
    pub evolution: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsInput {
    pub name: String,
    pub xp: i64,
    pub level: i64,
    pub hp: i64,
    pub evolution: i64,
}

impl StatsInput {
    pub fn into_stats(self, pokemon_id: i64) -> PokemonStats {
        PokemonStats {
            pokemon_id,
            name: self.name,
            xp: self.xp,
            level: self.level,
            hp: self.hp,
            evolution: self.evolution,
        }
    }
}
