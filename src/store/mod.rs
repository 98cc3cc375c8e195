//! Order Store adapters
//!
//! The engine only ever reads. Stores hand out a catalog plus order lines
//! already narrowed by a `QuerySpec`, so a database-backed store can push
//! the filters down into SQL.
//!
//! - `sqlite_store` - Northwind-style SQLite database, opened read-only
//! - `snapshot` - JSON dataset snapshots

pub mod snapshot;
pub mod sqlite_store;

pub use snapshot::{load_snapshot, save_snapshot, SnapshotStore};
pub use sqlite_store::{run_schema_migrations, SqliteOrderStore};

use crate::analytics_core::model::{Catalog, Dataset, Order, OrderLine};
use crate::analytics_core::scope::QuerySpec;
use crate::error::StoreError;

pub trait OrderStore {
    /// Products, categories and customers
    fn catalog(&self) -> Result<Catalog, StoreError>;

    /// Order lines matching `spec`, ordered by (order_id, product_id)
    fn lines(&self, spec: &QuerySpec) -> Result<Vec<OrderLine>, StoreError>;

    /// Orders matching the year, month and customer filters of `spec`
    fn orders(&self, spec: &QuerySpec) -> Result<Vec<Order>, StoreError>;

    /// Everything in scope, bundled for export
    fn dataset(&self, spec: &QuerySpec) -> Result<Dataset, StoreError> {
        Ok(Dataset {
            catalog: self.catalog()?,
            orders: self.orders(spec)?,
            lines: self.lines(spec)?,
        })
    }
}
