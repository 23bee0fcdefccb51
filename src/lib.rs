//! Cadastro - a small JSON CRUD service over two SQLite tables.
//!
//! - **Config**: Layered configuration (file → env → CLI)
//! - **Database**: one shared libsql connection, serialized per statement
//! - **Records / Cities**: validation and CRUD for `dados` and `cidades`
//! - **Bootstrap**: usage page and schema initialization
//! - **Router**: HTTP routing with path parameters
//! - **Server**: Hyper-based HTTP server
//!
//! # Example
//!
//! ```ignore
//! #[tokio::main]
//! async fn main() -> cadastro::Result<()> {
//!     let config = cadastro::Loader::default().load(None, &Default::default())?;
//!     let db = cadastro::db::connect(&config.database.url).await?;
//!     db.init_schema().await?;
//!     cadastro::server::run(config, db, cadastro::router().into_handle()).await
//! }
//! ```

pub mod bootstrap;
pub mod cities;
pub mod config;
pub mod db;
pub mod error;
pub mod module;
pub mod records;
pub mod response;
pub mod router;
pub mod server;

// Re-export main types at crate root
pub use config::{Config, Loader};
pub use db::Handle as DbHandle;
pub use error::{Error, Result};
pub use module::Module;
pub use router::{Context, Router};

/// Build a router with every route of the service mounted.
pub fn router() -> Router {
    let mut router = Router::new();
    router.mount(&bootstrap::Bootstrap);
    router.mount(&records::Records);
    router.mount(&cities::Cities);
    router
}
