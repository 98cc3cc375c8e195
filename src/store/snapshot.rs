//! JSON dataset snapshots
//!
//! Lets reports run without the database: `sales_report export` writes a
//! snapshot, `--snapshot` reads it back through `SnapshotStore`.

use super::OrderStore;
use crate::analytics_core::model::{Catalog, Dataset, Order, OrderLine};
use crate::analytics_core::scope::QuerySpec;
use crate::error::StoreError;
use chrono::Datelike;
use std::fs;
use std::path::Path;

/// Save a dataset to a JSON file
pub fn save_snapshot(dataset: &Dataset, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(dataset)?;
    fs::write(path, json)?;

    log::info!(
        "💾 Saved snapshot with {} orders and {} lines to {}",
        dataset.orders.len(),
        dataset.lines.len(),
        path.display()
    );
    Ok(())
}

/// Load a dataset from a JSON file; a missing file is an empty dataset
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Dataset, StoreError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No existing snapshot file found: {}", path.display());
        return Ok(Dataset::default());
    }

    let json = fs::read_to_string(path)?;
    let dataset: Dataset = serde_json::from_str(&json)?;

    log::info!("Loaded {} order lines from {}", dataset.lines.len(), path.display());
    Ok(dataset)
}

/// Order store serving an in-memory dataset
pub struct SnapshotStore {
    dataset: Dataset,
}

impl SnapshotStore {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(load_snapshot(path)?))
    }
}

impl OrderStore for SnapshotStore {
    fn catalog(&self) -> Result<Catalog, StoreError> {
        Ok(self.dataset.catalog.clone())
    }

    fn lines(&self, spec: &QuerySpec) -> Result<Vec<OrderLine>, StoreError> {
        Ok(spec.select(&self.dataset.lines).into_iter().cloned().collect())
    }

    fn orders(&self, spec: &QuerySpec) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .dataset
            .orders
            .iter()
            .filter(|order| order_matches(spec, order))
            .cloned()
            .collect())
    }
}

/// Year, month and customer filters applied to an order header
fn order_matches(spec: &QuerySpec, order: &Order) -> bool {
    if spec.year.is_some() || spec.month.is_some() {
        let Some(date) = order.order_date else {
            return false;
        };
        if spec.year.is_some_and(|year| date.year() != year) {
            return false;
        }
        if spec.month.is_some_and(|month| date.month() != month) {
            return false;
        }
    }
    match spec.customer_id {
        Some(ref customer_id) => order.customer_id.as_ref() == Some(customer_id),
        None => true,
    }
}
