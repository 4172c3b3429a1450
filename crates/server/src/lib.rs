//! Service broker daemon for object storage.
//!
//! This crate provides:
//! - Configuration loading (TOML file layered with environment variables)
//! - The repository bootstrapper run once at start-up
//! - The broker protocol HTTP layer: catalog, instances and bindings

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use bootstrap::{RepositoryCredentials, initialize, prepare_repository};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
