use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pokeserve_core::models::{EnemyPokemon, PlayerPokemon, PokemonStats, StatsInput};

use super::params::FormValues;
use super::{blocking, parse_int, ApiError, AppState, OrInternal};

#[derive(Debug, Deserialize)]
pub struct IdParams {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    #[serde(default, rename = "playerID")]
    player_id: String,
}

/// Raw form fields for a stats write; every number is parsed by hand so a bad
/// field gets a message naming it.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    #[serde(default, rename = "pokemonID")]
    pokemon_id: String,
    #[serde(default)]
    xp: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    hp: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    evolution: String,
}

impl StatsParams {
    fn parse(self) -> Result<(i64, StatsInput), ApiError> {
        let pokemon_id = parse_int(&self.pokemon_id, "pokemon ID")?;
        let stats = StatsInput {
            xp: parse_int(&self.xp, "XP")?,
            level: parse_int(&self.level, "level")?,
            hp: parse_int(&self.hp, "HP")?,
            evolution: parse_int(&self.evolution, "evolution")?,
            name: self.name,
        };
        Ok((pokemon_id, stats))
    }
}

pub async fn create_player_pokemon(
    State(state): State<AppState>,
    FormValues(params): FormValues<PlayerParams>,
) -> Result<String, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let pokemon_id = blocking(move || {
        state
            .pokemon
            .create_player_pokemon(player_id)
            .or_internal("Could not insert player Pokemon")
    })
    .await?;

    Ok(pokemon_id.to_string())
}

pub async fn attach_stats(
    State(state): State<AppState>,
    FormValues(params): FormValues<StatsParams>,
) -> Result<String, ApiError> {
    let (pokemon_id, stats) = params.parse()?;

    blocking(move || {
        state
            .pokemon
            .attach_stats(pokemon_id, stats)
            .or_internal("Could not insert Pokemon stats")
    })
    .await?;

    Ok("Pokemon stats inserted successfully!".to_string())
}

pub async fn update_stats(
    State(state): State<AppState>,
    FormValues(params): FormValues<StatsParams>,
) -> Result<String, ApiError> {
    let (pokemon_id, stats) = params.parse()?;

    let updated = blocking(move || {
        state
            .pokemon
            .update_stats(pokemon_id, &stats)
            .or_internal("Could not update Pokemon stats")
    })
    .await?;

    if !updated {
        return Err(ApiError::NotFound("Cannot find Pokemon stats".to_string()));
    }
    Ok("Pokemon stats updated successfully!".to_string())
}

pub async fn get_player_pokemon_stats(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<PokemonStats>, ApiError> {
    let pokemon_id = parse_int(&params.id, "Player Pokemon ID")?;

    let stats = blocking(move || {
        state
            .pokemon
            .get_player_pokemon_stats(pokemon_id)
            .or_internal("Could not retrieve Pokemon stats")
    })
    .await?;

    stats
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Cannot find Pokemon stats".to_string()))
}

pub async fn get_player_pokemon(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<PlayerPokemon>, ApiError> {
    let pokemon_id = parse_int(&params.id, "Player Pokemon ID")?;

    let pokemon = blocking(move || {
        state
            .pokemon
            .get_player_pokemon(pokemon_id)
            .or_internal("Could not retrieve player Pokemon")
    })
    .await?;

    pokemon
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Cannot find player Pokemon".to_string()))
}

pub async fn get_player_pokemon_id(
    State(state): State<AppState>,
    Query(params): Query<PlayerParams>,
) -> Result<String, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let pokemon_id = blocking(move || {
        state
            .pokemon
            .first_pokemon_id(player_id)
            .or_internal("Could not retrieve player Pokemon ID")
    })
    .await?;

    pokemon_id.map(|id| id.to_string()).ok_or_else(|| {
        ApiError::NotFound("No player Pokemon found for the provided player ID".to_string())
    })
}

pub async fn list_player_pokemon(
    State(state): State<AppState>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<Vec<PlayerPokemon>>, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let owned = blocking(move || {
        state
            .pokemon
            .list_player_pokemon(player_id)
            .or_internal("Could not retrieve player Pokemon")
    })
    .await?;

    Ok(Json(owned))
}

pub async fn get_enemy_pokemon(
    State(state): State<AppState>,
    Query(params): Query<IdParams>,
) -> Result<Json<EnemyPokemon>, ApiError> {
    let enemy_id = parse_int(&params.id, "Enemy Pokemon ID")?;

    let enemy = blocking(move || {
        state
            .pokemon
            .get_enemy_pokemon(enemy_id)
            .or_internal("Could not retrieve Enemy Pokemon")
    })
    .await?;

    enemy
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Cannot find Enemy Pokemon".to_string()))
}
