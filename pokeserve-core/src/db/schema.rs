pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- At most one recovery answer per player; rewritten in place by upsert
CREATE TABLE IF NOT EXISTS player_security (
    player_id INTEGER PRIMARY KEY REFERENCES players(id) ON DELETE CASCADE,
    answer_hash TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS player_pokemon (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES players(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL
);

-- Keyed by pokemon so a second stats insert for the same pokemon is rejected
CREATE TABLE IF NOT EXISTS player_pokemon_stats (
    pokemon_id INTEGER PRIMARY KEY REFERENCES player_pokemon(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0),
    level INTEGER NOT NULL DEFAULT 1 CHECK (level >= 0),
    hp INTEGER NOT NULL CHECK (hp >= 0),
    evolution INTEGER NOT NULL DEFAULT 0 CHECK (evolution >= 0)
);

CREATE TABLE IF NOT EXISTS enemy_pokemon (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS enemy_pokemon_stats (
    enemy_pokemon_id INTEGER PRIMARY KEY REFERENCES enemy_pokemon(id) ON DELETE CASCADE,
    level INTEGER NOT NULL,
    hp INTEGER NOT NULL,
    special_move TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_player_pokemon_player ON player_pokemon(player_id);
"#;
