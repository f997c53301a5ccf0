use serde::{Deserialize, Serialize};

/// An NPC opponent. Seeded outside the request path and read-only to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPokemon {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub hp: i64,
    pub special_move: String,
}
