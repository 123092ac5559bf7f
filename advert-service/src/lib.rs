//! # advert-service
//!
//! HTTP catalog of adverts backed by PostgreSQL.
//!
//! - `GET /adverts/{id}?fields=` fetches one advert with an optional field
//!   selection
//! - `GET /adverts?sort=&order=&page=` lists adverts, sorted and paged
//! - `POST /advert` creates an advert
//!
//! Every route shares one token-bucket rate limiter. The database
//! connection is established once at startup with bounded retries.
//!
//! ## Example
//!
//! ```rust,no_run
//! use advert_service::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config);
//!
//!     let pool = create_pool(&config.database).await?;
//!     let bucket = Arc::new(TokenBucket::from_config(&config.rate_limit)?);
//!     let state = AppState::new(config.clone(), Arc::new(PgCatalog::new(pool)));
//!
//!     Server::new(config).serve(router(state, bucket)).await
//! }
//! ```

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod server;
pub mod sorting;
pub mod state;

pub mod prelude {
    pub use crate::bootstrap::{BootstrapState, Bootstrapper, Connector};
    pub use crate::catalog::{AdvertCatalog, PgCatalog};
    pub use crate::config::{Config, DatabaseConfig, RateLimitConfig};
    pub use crate::database::{create_pool, PgConnector};
    pub use crate::error::{
        BootstrapError, DatabaseError, DatabaseErrorKind, DatabaseOperation, Error, Result,
    };
    pub use crate::middleware::TokenBucket;
    pub use crate::models::{Advert, AdvertField, CreateAdvert};
    pub use crate::observability::init_tracing;
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::AppState;
}
