//! HTTP surface. Handlers parse parameters, call into the core and are the
//! only place that picks a status code.

mod accounts;
mod params;
mod pokemon;

use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pokeserve_core::{AccountManager, CredentialHasher, Database, PokemonRepository};

const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct AppState {
    pub accounts: AccountManager,
    pub pokemon: PokemonRepository,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self::with_hasher(db, CredentialHasher::default())
    }

    pub fn with_hasher(db: Database, hasher: CredentialHasher) -> Self {
        Self {
            accounts: AccountManager::with_hasher(db.clone(), hasher),
            pokemon: PokemonRepository::new(db),
        }
    }
}

pub fn create_router(db: Database) -> Router {
    router(AppState::new(db))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/getPlayerID", get(accounts::get_player_id))
        .route("/getPlayer", get(accounts::get_player))
        .route("/login", get(accounts::login))
        .route("/register", post(accounts::register))
        .route("/securityAnswer", post(accounts::set_security_answer))
        .route("/checkSecurityAnswer", get(accounts::check_security_answer))
        .route("/resetPassword", get(accounts::reset_password))
        .route("/insertPlayerPokemon", post(pokemon::create_player_pokemon))
        .route("/insertPokemonStats", post(pokemon::attach_stats))
        .route("/updatePokemonStats", post(pokemon::update_stats))
        .route("/getPlayerPokemonStats", get(pokemon::get_player_pokemon_stats))
        .route("/getPlayerPokemon", get(pokemon::get_player_pokemon))
        .route("/getPlayerPokemonID", get(pokemon::get_player_pokemon_id))
        .route("/getPlayerPokemons", get(pokemon::list_player_pokemon))
        .route("/getEnemyPokemon", get(pokemon::get_enemy_pokemon))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(reject_head)),
        )
        .with_state(state)
}

/// Method routing answers HEAD through the GET handler; every route here is
/// strictly GET or POST.
async fn reject_head(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, "Invalid request method").into_response();
    }
    next.run(request).await
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<pokeserve_core::Error> for ApiError {
    fn from(err: pokeserve_core::Error) -> Self {
        use pokeserve_core::Error;

        match err {
            Error::Validation(message) => Self::BadRequest(message),
            Error::NotFound(what) => Self::NotFound(format!("Cannot find {what}")),
            Error::Conflict(message) => Self::Conflict(message),
            other => {
                tracing::error!(error = %other, "request failed");
                Self::Internal(INTERNAL_ERROR.to_string())
            }
        }
    }
}

/// Maps core results into API errors, replacing the body of internal
/// failures with `message` so storage details never reach the client.
trait OrInternal<T> {
    fn or_internal(self, message: &str) -> Result<T, ApiError>;
}

impl<T> OrInternal<T> for pokeserve_core::Result<T> {
    fn or_internal(self, message: &str) -> Result<T, ApiError> {
        self.map_err(|err| {
            if err.is_internal() {
                tracing::error!(error = %err, "{message}");
                ApiError::Internal(message.to_string())
            } else {
                err.into()
            }
        })
    }
}

/// Storage and hashing block; keep them off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        tracing::error!(error = %err, "storage task did not complete");
        ApiError::Internal(INTERNAL_ERROR.to_string())
    })?
}

fn parse_int(raw: &str, label: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {label}")))
}
