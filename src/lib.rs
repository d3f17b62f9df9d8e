//! # shelf
//!
//! A product catalogue served over HTTP, stored as one JSON file.
//!
//! ## The contract
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/api/products` | 200, every product |
//! | GET | `/api/products/{id}` | 200, one product |
//! | POST | `/api/products` | 201, the created product |
//! | PUT | `/api/products/{id}` | 200, the merged product |
//! | DELETE | `/api/products/{id}` | 204 |
//! | GET | `/api/products/search?query=TEXT` | 200, matching products |
//!
//! Unknown ids answer 404, malformed bodies and a missing `query` answer
//! 400, and any storage failure answers 500. Error bodies are plain text.
//!
//! Each request loads the whole file, changes it in memory and writes the
//! whole file back. Concurrent writers are not serialized: the last save
//! wins.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shelf::{JsonFileStore, Server, ServerConfig, products};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), shelf::Error> {
//!     let config = ServerConfig::default();
//!     let app = products::router(JsonFileStore::new(&config.db_path));
//!     Server::bind(config.socket_addr()?).await?.serve(app).await
//! }
//! ```

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod middleware;
pub mod product;
pub mod products;
pub mod storage;

pub use config::ServerConfig;
pub use error::{ApiError, Error};
pub use handler::Handler;
pub use method::Method;
pub use product::Product;
pub use request::Request;
pub use response::{IntoResponse, Json, Response};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use storage::{JsonFileStore, MemoryStore, ProductStore, StoreError};
