//! Server settings resolved from CLI flags and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use pokeserve_core::{Database, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Falls back to the platform data directory when unset.
    pub database: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        match self.host.parse::<std::net::IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Database::default_path(),
        }
    }

    /// Opens the configured database and brings its schema up to date.
    pub fn open_database(&self) -> Result<Database> {
        let path = self.database_path()?;
        tracing::info!(path = %path.display(), "using database");
        let db = Database::open(path)?;
        db.migrate()?;
        Ok(db)
    }
}
