//! Query scope: the optional filters a dashboard request carries

use super::model::{CategoryId, OrderLine, ProductId};
use crate::error::AnalyticsError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Filters applied to an order line collection before aggregation
///
/// Every field is optional; an empty spec selects everything. Built once with
/// the chained setters and handed to a single aggregation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub product_id: Option<ProductId>,
    pub category_id: Option<CategoryId>,
    pub customer_id: Option<String>,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn product(mut self, product_id: ProductId) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Reject filters that can never match anything
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err(AnalyticsError::InvalidFilter(format!(
                    "month must be within 1..=12, got {}",
                    month
                )));
            }
        }
        Ok(())
    }

    /// True when a year or a customer filter limits the scan
    pub fn is_bounded(&self) -> bool {
        self.year.is_some() || self.customer_id.is_some()
    }

    pub fn matches(&self, line: &OrderLine) -> bool {
        if let Some(year) = self.year {
            if line.order_date.year() != year {
                return false;
            }
        }
        if let Some(month) = self.month {
            if line.order_date.month() != month {
                return false;
            }
        }
        if let Some(product_id) = self.product_id {
            if line.product_id != product_id {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if line.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(ref customer_id) = self.customer_id {
            if line.customer_id.as_ref() != Some(customer_id) {
                return false;
            }
        }
        true
    }

    /// Lines in scope, in input order
    pub fn select<'a>(&self, lines: &'a [OrderLine]) -> Vec<&'a OrderLine> {
        lines.iter().filter(|line| self.matches(line)).collect()
    }
}
