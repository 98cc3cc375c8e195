//! Analytics configuration from environment variables

use crate::analytics_core::EngineSettings;
use crate::error::ConfigError;
use std::env;
use std::str::FromStr;

/// Configuration for the reporting runtime
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Path to the SQLite order database
    pub db_path: String,

    /// Directory holding the `*.sql` schema files
    pub schema_dir: String,

    /// Default length of top/bottom rankings
    pub ranking_limit: usize,

    /// Number of products returned by recommendations
    pub recommendation_limit: usize,

    /// Maximum number of similar customers considered by recommendations
    pub similar_customer_limit: usize,

    /// Stock level at or below which a product dashboard raises a low-stock advisory
    pub low_stock_threshold: i64,

    /// Reject queries that have neither a year nor a customer filter
    pub require_bounded_scope: bool,
}

impl AnalyticsConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SALESFLOW_DB_PATH` (default: data/traders.db)
    /// - `SALESFLOW_SCHEMA_DIR` (default: sql)
    /// - `RANKING_LIMIT` (default: 10)
    /// - `RECOMMENDATION_LIMIT` (default: 10)
    /// - `SIMILAR_CUSTOMER_LIMIT` (default: 50)
    /// - `LOW_STOCK_THRESHOLD` (default: 10)
    /// - `REQUIRE_BOUNDED_SCOPE` (default: false)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            db_path: lookup("SALESFLOW_DB_PATH").unwrap_or_else(|| "data/traders.db".to_string()),
            schema_dir: lookup("SALESFLOW_SCHEMA_DIR").unwrap_or_else(|| "sql".to_string()),
            ranking_limit: parse_or(&lookup, "RANKING_LIMIT", 10)?,
            recommendation_limit: parse_or(&lookup, "RECOMMENDATION_LIMIT", 10)?,
            similar_customer_limit: parse_or(&lookup, "SIMILAR_CUSTOMER_LIMIT", 50)?,
            low_stock_threshold: parse_or(&lookup, "LOW_STOCK_THRESHOLD", 10)?,
            require_bounded_scope: parse_or(&lookup, "REQUIRE_BOUNDED_SCOPE", false)?,
        })
    }

    /// Engine settings derived from this configuration
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            ranking_limit: self.ranking_limit,
            recommendation_limit: self.recommendation_limit,
            similar_customer_limit: self.similar_customer_limit,
            low_stock_threshold: self.low_stock_threshold,
            require_bounded_scope: self.require_bounded_scope,
        }
    }
}

fn parse_or<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}
