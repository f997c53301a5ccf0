use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use pokeserve_core::models::Player;
use pokeserve_core::validation;

use super::params::FormValues;
use super::{blocking, parse_int, ApiError, AppState, OrInternal};

#[derive(Debug, Deserialize)]
pub struct UsernameParams {
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialParams {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    #[serde(default, rename = "playerID")]
    player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SecurityAnswerParams {
    #[serde(default, rename = "playerID")]
    player_id: String,
    #[serde(default, rename = "securityAnswer")]
    security_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordParams {
    #[serde(default, rename = "playerID")]
    player_id: String,
    #[serde(default, rename = "newPassword")]
    new_password: String,
}

pub async fn get_player_id(
    State(state): State<AppState>,
    Query(params): Query<UsernameParams>,
) -> Result<String, ApiError> {
    if params.username.is_empty() {
        return Err(ApiError::BadRequest("Username needed".to_string()));
    }

    let id = blocking(move || {
        state
            .accounts
            .player_id(&params.username)
            .or_internal("Could not retrieve playerID")
    })
    .await?;

    id.map(|id| id.to_string())
        .ok_or_else(|| ApiError::NotFound("Cannot find player".to_string()))
}

pub async fn get_player(
    State(state): State<AppState>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<Player>, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let player = blocking(move || {
        state
            .accounts
            .get_player(player_id)
            .or_internal("Could not retrieve player")
    })
    .await?;

    player
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Cannot find player".to_string()))
}

/// Validation and credential failures are answered with a 200 and the
/// message as body; only `"true"` means the player is logged in.
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<CredentialParams>,
) -> Result<String, ApiError> {
    if let Some(message) = validation::validate_credentials(&params.username, &params.password) {
        return Ok(message.to_string());
    }

    let outcome = blocking(move || {
        state
            .accounts
            .authenticate(&params.username, &params.password)
            .or_internal("An error occurred while checking the user.")
    })
    .await?;

    Ok(outcome.message().to_string())
}

pub async fn register(
    State(state): State<AppState>,
    FormValues(params): FormValues<CredentialParams>,
) -> Result<String, ApiError> {
    blocking(move || {
        state
            .accounts
            .register(&params.username, &params.password)
            .or_internal("Could not insert you into the database!")
    })
    .await?;

    Ok("true".to_string())
}

pub async fn set_security_answer(
    State(state): State<AppState>,
    FormValues(params): FormValues<SecurityAnswerParams>,
) -> Result<String, ApiError> {
    let player_id = parse_int(&params.player_id, "playerID")?;

    blocking(move || {
        state
            .accounts
            .set_security_answer(player_id, &params.security_answer)
            .or_internal("Could not insert security answer into the database!")
    })
    .await?;

    Ok("Security answer stored successfully!".to_string())
}

pub async fn check_security_answer(
    State(state): State<AppState>,
    Query(params): Query<SecurityAnswerParams>,
) -> Result<String, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let matches = blocking(move || {
        state
            .accounts
            .check_security_answer(player_id, &params.security_answer)
            .or_internal("An error occurred while checking the security answer.")
    })
    .await?;

    if !matches {
        return Err(ApiError::NotFound("Security answers don't match!".to_string()));
    }
    Ok("true".to_string())
}

pub async fn reset_password(
    State(state): State<AppState>,
    Query(params): Query<ResetPasswordParams>,
) -> Result<String, ApiError> {
    let player_id = parse_int(&params.player_id, "player ID")?;

    let reset = blocking(move || {
        state
            .accounts
            .reset_password(player_id, &params.new_password)
            .or_internal("An error occurred while resetting the password.")
    })
    .await?;

    if !reset {
        return Err(ApiError::NotFound("Could not reset password!".to_string()));
    }
    Ok("true".to_string())
}
