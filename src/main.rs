//! shelf binary.
//!
//! Run with:
//!   RUST_LOG=info cargo run -- --port 3000 --db db.json
//!
//! Try:
//!   curl http://localhost:3000/api/products
//!   curl -X POST http://localhost:3000/api/products \
//!        -H 'content-type: application/json' \
//!        -d '{"title":"Blue Hat","description":"wool"}'
//!   curl 'http://localhost:3000/api/products/search?query=wool'
//!   curl -X DELETE http://localhost:3000/api/products/1

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use shelf::{JsonFileStore, Server, ServerConfig, products};

#[derive(Parser, Debug)]
#[command(name = "shelf", version, about = "Product catalogue backed by a JSON file")]
struct Cli {
    /// Address to bind to
    #[arg(long, env = "SHELF_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SHELF_PORT", default_value_t = 3000)]
    port: u16,

    /// Product file
    #[arg(long = "db", env = "SHELF_DB", default_value = "db.json")]
    db_path: PathBuf,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        Self { host: cli.host, port: cli.port, db_path: cli.db_path }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from(Cli::parse());

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), shelf::Error> {
    let app = products::router(JsonFileStore::new(&config.db_path));
    Server::bind(config.socket_addr()?).await?.serve(app).await
}
