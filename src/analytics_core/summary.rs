//! Headline totals and comparative averages for a set of order lines

use super::model::{OrderId, OrderLine};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    /// Distinct orders
    pub total_orders: usize,
    pub total_quantity: u64,
    /// Net revenue after discounts
    pub total_revenue: f64,
    pub avg_order_value: f64,
    /// Mean of the per-line discount fractions
    pub avg_discount: f64,
    /// Revenue before discounts
    pub gross_revenue: f64,
    /// `gross_revenue - total_revenue`
    pub discount_amount: f64,
}

/// Summarize order lines
///
/// Lines are folded in iteration order so repeated calls on the same input
/// produce bit-identical totals. Every ratio with a zero denominator is 0.
pub fn summarize<'a, I>(lines: I) -> SalesSummary
where
    I: IntoIterator<Item = &'a OrderLine>,
{
    let mut orders: HashSet<OrderId> = HashSet::new();
    let mut line_count = 0usize;
    let mut total_quantity = 0u64;
    let mut total_revenue = 0.0;
    let mut gross_revenue = 0.0;
    let mut discount_sum = 0.0;

    for line in lines {
        orders.insert(line.order_id);
        line_count += 1;
        total_quantity += line.quantity as u64;
        total_revenue += line.revenue();
        gross_revenue += line.gross_revenue();
        discount_sum += line.discount;
    }

    let total_orders = orders.len();

    SalesSummary {
        total_orders,
        total_quantity,
        total_revenue,
        avg_order_value: ratio(total_revenue, total_orders as f64),
        avg_discount: ratio(discount_sum, line_count as f64),
        gross_revenue,
        discount_amount: gross_revenue - total_revenue,
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// An entity's averages next to the averages of the whole population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub avg_order_value: f64,
    pub overall_avg_order_value: f64,
    /// `avg_order_value / overall_avg_order_value`
    pub avg_order_value_ratio: f64,
    pub avg_discount: f64,
    pub overall_avg_discount: f64,
    /// Entity revenue as a fraction of overall revenue
    pub revenue_share: f64,
}

pub fn compare(entity: &SalesSummary, overall: &SalesSummary) -> Comparison {
    Comparison {
        avg_order_value: entity.avg_order_value,
        overall_avg_order_value: overall.avg_order_value,
        avg_order_value_ratio: ratio(entity.avg_order_value, overall.avg_order_value),
        avg_discount: entity.avg_discount,
        overall_avg_discount: overall.avg_discount,
        revenue_share: ratio(entity.total_revenue, overall.total_revenue),
    }
}
