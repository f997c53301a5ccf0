use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokeserve::api;
use pokeserve::config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use pokeserve_core::PokemonRepository;

#[derive(Parser)]
#[command(name = "pokeserve")]
#[command(about = "Account and pokemon storage server for the creature-collecting game")]
struct Cli {
    /// Path to the SQLite database (defaults to the platform data directory)
    #[arg(long, global = true, env = "POKESERVE_DB")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Create or upgrade the database schema and exit
    Migrate,
    /// Load enemy pokemon from a JSON file
    Seed {
        /// JSON array of {id, name, level, hp, special_move}
        file: PathBuf,
    },
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST, env = "POKESERVE_HOST")]
    host: String,

    /// Port for the HTTP API
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "POKESERVE_PORT")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| {
                "pokeserve=debug,pokeserve_core=debug,tower_http=debug".into()
            }),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig {
        database: cli.database,
        ..ServerConfig::default()
    };

    match cli.command {
        Some(Commands::Serve(args)) => {
            config.host = args.host;
            config.port = args.port;
            serve(config).await?;
        }
        Some(Commands::Migrate) => {
            config.open_database()?;
        }
        Some(Commands::Seed { file }) => {
            let json = std::fs::read_to_string(&file)?;
            let db = config.open_database()?;
            let count = PokemonRepository::new(db).seed_enemies(&json)?;
            println!("Seeded {} enemy pokemon from {}", count, file.display());
        }
        None => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    tracing::info!("Starting pokeserve on {}", addr);

    let db = config.open_database()?;
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("pokeserve listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
