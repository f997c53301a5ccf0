//! Core library for pokeserve.
//!
//! This crate provides the domain models, input validation, credential hashing
//! and database operations for the game backend, independent of any transport
//! layer (HTTP, CLI, etc.).
//!
//! # Usage
//!
//! ```no_run
//! use pokeserve_core::{AccountManager, Database, PokemonRepository};
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let accounts = AccountManager::new(db.clone());
//! accounts.register("ash", "pikachu123")?;
//!
//! let pokemon = PokemonRepository::new(db);
//! let enemy = pokemon.get_enemy_pokemon(1)?;
//! # Ok::<(), pokeserve_core::Error>(())
//! ```

pub mod accounts;
pub mod credentials;
pub mod db;
pub mod error;
pub mod models;
pub mod pokemon;
pub mod validation;

// Re-export commonly used types at crate root
pub use accounts::AccountManager;
pub use credentials::CredentialHasher;
pub use db::Database;
pub use error::{Error, Result};
pub use pokemon::PokemonRepository;
