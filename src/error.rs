//! Error types shared by the engine, the order store and configuration loading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A caller-supplied filter is malformed (e.g. month 13)
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Bounded scope is required but neither a year nor a customer was given
    #[error("query scope must include a year or a customer filter")]
    UnboundedQuery,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("database not found: {0}")]
    DatabaseMissing(String),

    #[error("schema directory not found: {0}")]
    SchemaDirMissing(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: String, value: String },
}
