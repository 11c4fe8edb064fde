use std::sync::Arc;

use knitlog_db::services::{ProjectReader, ProjectWriter};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: knitlog_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Listing and detail views.
    pub reader: ProjectReader,
    /// Project create / replace / delete.
    pub writer: ProjectWriter,
}

impl AppState {
    /// Wire the services to the given pool.
    pub fn new(pool: knitlog_db::DbPool, config: Arc<ServerConfig>) -> Self {
        Self {
            reader: ProjectReader::new(pool.clone()),
            writer: ProjectWriter::new(pool.clone(), config.child_write_policy),
            pool,
            config,
        }
    }
}
