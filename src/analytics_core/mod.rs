//! Analytics Core - Sales Aggregation Engine
//!
//! Pure, read-only aggregation over order line snapshots: revenue totals,
//! calendar rollups, product/category rankings and recommendations.
//!
//! # Architecture
//!
//! ```text
//! OrderStore → Vec<OrderLine> + Catalog
//!     ↓
//! QuerySpec (year / month / product / category / customer filters)
//!     ↓
//! summarize · bucket_by_period · EntityRanker · Recommender
//!     ↓
//! SalesAnalytics → Outcome<dashboard> (value + advisories, or error)
//! ```
//!
//! `VolumeDiscountPolicy` lives here as well; it is applied when orders are
//! placed, never to lines already stored.

pub mod advisory;
pub mod discount;
pub mod engine;
pub mod model;
pub mod period;
pub mod ranking;
pub mod recommend;
pub mod scope;
pub mod summary;

pub use advisory::{Advisory, Outcome};
pub use discount::{DiscountTier, VolumeDiscountPolicy};
pub use engine::{
    CategoryDashboard, CustomerDashboard, CustomerRevenue, EngineSettings, ProductDashboard,
    SalesAnalytics, SalesReport,
};
pub use model::{Catalog, Category, Customer, Dataset, Order, OrderLine, Product};
pub use period::{bucket_by_period, revenue_trend, Granularity, Period, PeriodChange, PeriodSummary};
pub use ranking::{Dimension, Direction, EntityRanker, Metric, RankedEntity, TopBottom};
pub use recommend::{Recommendation, Recommender};
pub use scope::QuerySpec;
pub use summary::{compare, summarize, Comparison, SalesSummary};
