pub mod analytics_core;
pub mod config;
pub mod error;
pub mod sqlite_pragma;
pub mod store;

pub use analytics_core::{
    Advisory, EngineSettings, Outcome, QuerySpec, SalesAnalytics, SalesSummary,
};
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, ConfigError, StoreError};
