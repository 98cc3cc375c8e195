//! Sales analytics engine - assembles dashboards from an order line snapshot
//!
//! ## Architecture
//!
//! ```text
//! QuerySpec
//!     ↓
//! SalesAnalytics::resolve_scope()  (validation, advisories, line selection)
//!     ↓
//! summarize / bucket_by_period / EntityRanker / Recommender
//!     ↓
//! Outcome<SalesReport | CustomerDashboard | ProductDashboard | CategoryDashboard>
//! ```
//!
//! The engine owns a read-only snapshot. Every call recomputes from that
//! snapshot, so repeated calls with the same spec return identical values.

use super::advisory::{Advisory, Outcome};
use super::model::{Catalog, CategoryId, CustomerId, OrderId, OrderLine, ProductId};
use super::period::{bucket_by_period, revenue_trend, Granularity, PeriodChange, PeriodSummary};
use super::ranking::{Dimension, Direction, EntityRanker, Metric, RankedEntity, TopBottom};
use super::recommend::{Recommendation, Recommender};
use super::scope::QuerySpec;
use super::summary::{compare, ratio, summarize, Comparison, SalesSummary};
use crate::error::AnalyticsError;
use crate::store::OrderStore;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Tunables for dashboard assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Length of top/bottom rankings
    pub ranking_limit: usize,
    pub recommendation_limit: usize,
    pub similar_customer_limit: usize,
    /// Stock level at or below which a LowStock advisory is raised
    pub low_stock_threshold: i64,
    /// Turn UnboundedScan advisories into UnboundedQuery errors
    pub require_bounded_scope: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            ranking_limit: 10,
            recommendation_limit: 10,
            similar_customer_limit: 50,
            low_stock_threshold: 10,
            require_bounded_scope: false,
        }
    }
}

/// Sales overview for an arbitrary scope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub scope: QuerySpec,
    pub summary: SalesSummary,
    /// Monthly (oldest first) when a year is selected, yearly (newest first) otherwise
    pub periods: Vec<PeriodSummary>,
    pub trend: Vec<PeriodChange>,
    pub products: TopBottom,
    pub top_categories: Vec<RankedEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDashboard {
    pub customer_id: CustomerId,
    pub company_name: Option<String>,
    pub summary: SalesSummary,
    pub comparison: Comparison,
    pub periods: Vec<PeriodSummary>,
    /// Most-ordered products by quantity
    pub top_products: Vec<RankedEntity>,
    pub recommendations: Vec<Recommendation>,
}

/// One customer's purchases of a single product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRevenue {
    pub customer_id: CustomerId,
    pub company_name: Option<String>,
    pub quantity_sum: u64,
    pub revenue_sum: f64,
    pub order_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductDashboard {
    pub product_id: ProductId,
    pub name: String,
    pub summary: SalesSummary,
    pub periods: Vec<PeriodSummary>,
    /// Product revenue over its category's revenue in the same period
    pub category_revenue_share: f64,
    pub top_customers: Vec<CustomerRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDashboard {
    pub category_id: CategoryId,
    pub name: String,
    pub summary: SalesSummary,
    pub periods: Vec<PeriodSummary>,
    /// Category revenue over all revenue in the same period
    pub revenue_share: f64,
    pub products: TopBottom,
}

pub struct SalesAnalytics {
    catalog: Catalog,
    lines: Vec<OrderLine>,
    settings: EngineSettings,
}

impl SalesAnalytics {
    pub fn new(catalog: Catalog, lines: Vec<OrderLine>) -> Self {
        Self::with_settings(catalog, lines, EngineSettings::default())
    }

    pub fn with_settings(catalog: Catalog, lines: Vec<OrderLine>, settings: EngineSettings) -> Self {
        Self {
            catalog,
            lines,
            settings,
        }
    }

    /// Load a full snapshot from an order store
    ///
    /// A store failure is logged and treated as "no data": the engine starts
    /// with whatever part of the snapshot could be read.
    pub fn from_store(store: &dyn OrderStore, settings: EngineSettings) -> Self {
        let catalog = store.catalog().unwrap_or_else(|e| {
            log::warn!("⚠️  Failed to load catalog, continuing with an empty one: {}", e);
            Catalog::default()
        });
        let lines = store.lines(&QuerySpec::default()).unwrap_or_else(|e| {
            log::warn!("⚠️  Failed to load order lines, continuing with none: {}", e);
            Vec::new()
        });

        log::info!(
            "📥 Loaded {} order lines, {} products, {} customers",
            lines.len(),
            catalog.products.len(),
            catalog.customers.len()
        );

        Self::with_settings(catalog, lines, settings)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Summary, periods, trend and rankings for `spec`
    pub fn overview(&self, spec: &QuerySpec) -> Outcome<SalesReport> {
        Outcome::from_result(self.build_overview(spec))
    }

    pub fn customer_dashboard(&self, customer_id: &str) -> Outcome<CustomerDashboard> {
        Outcome::from_result(self.build_customer_dashboard(customer_id))
    }

    /// Product detail, optionally narrowed to one year
    pub fn product_dashboard(&self, product_id: ProductId, year: Option<i32>) -> Outcome<ProductDashboard> {
        Outcome::from_result(self.build_product_dashboard(product_id, year))
    }

    pub fn category_dashboard(
        &self,
        category_id: CategoryId,
        year: Option<i32>,
    ) -> Outcome<CategoryDashboard> {
        Outcome::from_result(self.build_category_dashboard(category_id, year))
    }

    /// Product recommendations for a customer, best first
    pub fn recommendations(&self, customer_id: &str) -> Outcome<Vec<Recommendation>> {
        let spec = QuerySpec::new().customer(customer_id);
        Outcome::from_result(self.resolve_scope(&spec).map(|(_, advisories)| {
            // ranking runs against the full snapshot, not the customer's scope
            let recs = if advisories_hide_scope(&advisories) {
                Vec::new()
            } else {
                self.recommend(customer_id)
            };
            (recs, advisories)
        }))
    }

    fn recommend(&self, customer_id: &str) -> Vec<Recommendation> {
        Recommender::new(self.settings.similar_customer_limit).recommend_detailed(
            customer_id,
            &self.lines,
            &self.catalog,
            self.settings.recommendation_limit,
        )
    }

    fn build_overview(&self, spec: &QuerySpec) -> Result<(SalesReport, Vec<Advisory>), AnalyticsError> {
        let (lines, advisories) = self.resolve_scope(spec)?;
        let ranker = EntityRanker::new(&self.catalog);
        let limit = self.settings.ranking_limit;

        let periods = bucket_by_period(lines.iter().copied(), granularity_for(spec.year));
        let trend = revenue_trend(&periods);

        let report = SalesReport {
            scope: spec.clone(),
            summary: summarize(lines.iter().copied()),
            trend,
            periods,
            products: ranker.top_bottom_by_revenue(lines.iter().copied(), limit),
            top_categories: ranker.rank(
                lines.iter().copied(),
                Dimension::Category,
                Metric::Revenue,
                Direction::Desc,
                limit,
            ),
        };

        log::debug!(
            "📊 Overview: {} orders, revenue {:.2}, {} advisories",
            report.summary.total_orders,
            report.summary.total_revenue,
            advisories.len()
        );

        Ok((report, advisories))
    }

    fn build_customer_dashboard(
        &self,
        customer_id: &str,
    ) -> Result<(CustomerDashboard, Vec<Advisory>), AnalyticsError> {
        let spec = QuerySpec::new().customer(customer_id);
        let (lines, advisories) = self.resolve_scope(&spec)?;

        let summary = summarize(lines.iter().copied());
        let overall = summarize(&self.lines);
        let recommendations = if advisories_hide_scope(&advisories) {
            Vec::new()
        } else {
            self.recommend(customer_id)
        };

        let dashboard = CustomerDashboard {
            customer_id: customer_id.to_string(),
            company_name: self.catalog.customer(customer_id).map(|c| c.company_name.clone()),
            comparison: compare(&summary, &overall),
            summary,
            periods: bucket_by_period(lines.iter().copied(), Granularity::Year),
            top_products: EntityRanker::new(&self.catalog).rank(
                lines.iter().copied(),
                Dimension::Product,
                Metric::Quantity,
                Direction::Desc,
                self.settings.ranking_limit,
            ),
            recommendations,
        };

        Ok((dashboard, advisories))
    }

    fn build_product_dashboard(
        &self,
        product_id: ProductId,
        year: Option<i32>,
    ) -> Result<(ProductDashboard, Vec<Advisory>), AnalyticsError> {
        let mut spec = QuerySpec::new().product(product_id);
        spec.year = year;
        let (lines, mut advisories) = self.resolve_scope(&spec)?;

        let summary = summarize(lines.iter().copied());

        let product = self.catalog.product(product_id);
        let category_revenue = match product.and_then(|p| p.category_id) {
            Some(category_id) => {
                let mut category_spec = QuerySpec::new().category(category_id);
                category_spec.year = year;
                summarize(category_spec.select(&self.lines)).total_revenue
            }
            None => 0.0,
        };

        if let Some(p) = product {
            if let Some(units_in_stock) = p.units_in_stock {
                if !p.discontinued && units_in_stock <= self.settings.low_stock_threshold {
                    advisories.push(Advisory::LowStock {
                        product_id,
                        units_in_stock,
                    });
                }
            }
        }

        let dashboard = ProductDashboard {
            product_id,
            name: self.catalog.product_name(product_id),
            category_revenue_share: ratio(summary.total_revenue, category_revenue),
            summary,
            periods: bucket_by_period(lines.iter().copied(), granularity_for(year)),
            top_customers: self.top_customers(&lines),
        };

        Ok((dashboard, advisories))
    }

    fn build_category_dashboard(
        &self,
        category_id: CategoryId,
        year: Option<i32>,
    ) -> Result<(CategoryDashboard, Vec<Advisory>), AnalyticsError> {
        let mut spec = QuerySpec::new().category(category_id);
        spec.year = year;
        let (lines, advisories) = self.resolve_scope(&spec)?;

        let summary = summarize(lines.iter().copied());
        let mut period_spec = QuerySpec::new();
        period_spec.year = year;
        let period_revenue = summarize(period_spec.select(&self.lines)).total_revenue;

        let dashboard = CategoryDashboard {
            category_id,
            name: self.catalog.category_name(category_id),
            revenue_share: ratio(summary.total_revenue, period_revenue),
            summary,
            periods: bucket_by_period(lines.iter().copied(), granularity_for(year)),
            products: EntityRanker::new(&self.catalog)
                .top_bottom(lines.iter().copied(), Dimension::Product, self.settings.ranking_limit),
        };

        Ok((dashboard, advisories))
    }

    /// Validate `spec`, collect advisories and select the lines in scope
    ///
    /// A filter naming an entity missing from the catalog yields no lines.
    fn resolve_scope(&self, spec: &QuerySpec) -> Result<(Vec<&OrderLine>, Vec<Advisory>), AnalyticsError> {
        spec.validate()?;

        let mut advisories = Vec::new();

        if !spec.is_bounded() {
            if self.settings.require_bounded_scope {
                return Err(AnalyticsError::UnboundedQuery);
            }
            advisories.push(Advisory::UnboundedScan);
        }

        if let Some(product_id) = spec.product_id {
            if self.catalog.product(product_id).is_none() {
                advisories.push(Advisory::UnknownProduct { product_id });
            }
        }
        if let Some(category_id) = spec.category_id {
            if self.catalog.category(category_id).is_none() {
                advisories.push(Advisory::UnknownCategory { category_id });
            }
        }
        if let Some(ref customer_id) = spec.customer_id {
            if self.catalog.customer(customer_id).is_none() {
                advisories.push(Advisory::UnknownCustomer {
                    customer_id: customer_id.clone(),
                });
            }
        }

        if advisories_hide_scope(&advisories) {
            return Ok((Vec::new(), advisories));
        }

        let lines = spec.select(&self.lines);

        for line in &lines {
            if line.has_discount_out_of_range() {
                advisories.push(Advisory::DiscountOutOfRange {
                    order_id: line.order_id,
                    product_id: line.product_id,
                    discount: line.discount,
                });
            }
        }

        Ok((lines, advisories))
    }

    /// Customers ranked by revenue on the given lines, ties in customer id order
    fn top_customers(&self, lines: &[&OrderLine]) -> Vec<CustomerRevenue> {
        #[derive(Default)]
        struct Acc {
            orders: HashSet<OrderId>,
            quantity_sum: u64,
            revenue_sum: f64,
        }

        let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
        for line in lines {
            let Some(ref customer_id) = line.customer_id else {
                continue;
            };
            let acc = groups.entry(customer_id.as_str()).or_default();
            acc.orders.insert(line.order_id);
            acc.quantity_sum += line.quantity as u64;
            acc.revenue_sum += line.revenue();
        }

        let mut ranked: Vec<CustomerRevenue> = groups
            .into_iter()
            .map(|(customer_id, acc)| CustomerRevenue {
                customer_id: customer_id.to_string(),
                company_name: self.catalog.customer(customer_id).map(|c| c.company_name.clone()),
                quantity_sum: acc.quantity_sum,
                revenue_sum: acc.revenue_sum,
                order_count: acc.orders.len(),
            })
            .collect();

        ranked.sort_by(|a, b| b.revenue_sum.total_cmp(&a.revenue_sum));
        ranked.truncate(self.settings.ranking_limit);
        ranked
    }
}

fn granularity_for(year: Option<i32>) -> Granularity {
    if year.is_some() {
        Granularity::Month
    } else {
        Granularity::Year
    }
}

/// True when a filter failed to resolve, so the scope is empty
fn advisories_hide_scope(advisories: &[Advisory]) -> bool {
    advisories.iter().any(|a| {
        matches!(
            a,
            Advisory::UnknownProduct { .. }
                | Advisory::UnknownCategory { .. }
                | Advisory::UnknownCustomer { .. }
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics_core::model::{Category, Customer, Product};
    use chrono::NaiveDate;

    fn line(
        order_id: i64,
        customer: &str,
        product_id: i64,
        quantity: u32,
        unit_price: f64,
        discount: f64,
        date: (i32, u32, u32),
    ) -> OrderLine {
        OrderLine {
            order_id,
            product_id,
            category_id: Some(if product_id <= 2 { 1 } else { 2 }),
            customer_id: Some(customer.to_string()),
            unit_price,
            quantity,
            discount,
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        }
    }

    fn create_test_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (id, name, category, stock) in [
            (1, "Chai", 1, 39),
            (2, "Chang", 1, 5),
            (3, "Aniseed Syrup", 2, 13),
            (4, "Ikura", 2, 0),
        ] {
            catalog.add_product(Product {
                product_id: id,
                name: name.to_string(),
                category_id: Some(category),
                unit_price: Some(10.0),
                units_in_stock: Some(stock),
                discontinued: id == 4,
            });
        }
        catalog.add_category(Category {
            category_id: 1,
            name: "Beverages".to_string(),
        });
        catalog.add_category(Category {
            category_id: 2,
            name: "Condiments".to_string(),
        });
        for (id, name) in [
            ("ALFKI", "Alfreds Futterkiste"),
            ("ANATR", "Ana Trujillo"),
            ("BERGS", "Berglunds snabbköp"),
        ] {
            catalog.add_customer(Customer {
                customer_id: id.to_string(),
                company_name: name.to_string(),
            });
        }
        catalog
    }

    fn create_test_lines() -> Vec<OrderLine> {
        vec![
            line(1, "ALFKI", 1, 2, 10.0, 0.0, (1997, 1, 10)),
            line(1, "ALFKI", 1, 3, 10.0, 0.1, (1997, 1, 10)),
            line(2, "ANATR", 2, 10, 19.0, 0.05, (1997, 3, 2)),
            line(2, "ANATR", 3, 4, 10.0, 0.0, (1997, 3, 2)),
            line(3, "ALFKI", 3, 1, 10.0, 0.0, (1998, 2, 1)),
            line(4, "BERGS", 1, 6, 18.0, 0.0, (1996, 8, 8)),
        ]
    }

    fn create_test_engine() -> SalesAnalytics {
        SalesAnalytics::new(create_test_catalog(), create_test_lines())
    }

    #[test]
    fn test_overview_for_year_is_monthly() {
        let engine = create_test_engine();
        let outcome = engine.overview(&QuerySpec::new().year(1997));

        assert!(matches!(outcome, Outcome::Ok(_)));
        let report = outcome.value().unwrap();
        assert_eq!(report.summary.total_orders, 2);
        assert!((report.summary.total_revenue - (47.0 + 180.5 + 40.0)).abs() < 1e-9);

        let periods: Vec<String> = report.periods.iter().map(|p| p.period.to_string()).collect();
        assert_eq!(periods, vec!["1997-01", "1997-03"]);
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.products.top[0].name, "Chang");
        assert_eq!(report.top_categories[0].name, "Beverages");
    }

    #[test]
    fn test_unbounded_overview_is_advised() {
        let engine = create_test_engine();
        let outcome = engine.overview(&QuerySpec::new());

        assert_eq!(outcome.advisories(), &[Advisory::UnboundedScan]);
        let report = outcome.value().unwrap();
        let years: Vec<i32> = report.periods.iter().map(|p| p.period.year).collect();
        assert_eq!(years, vec![1998, 1997, 1996]);
    }

    #[test]
    fn test_unbounded_overview_rejected_when_required() {
        let settings = EngineSettings {
            require_bounded_scope: true,
            ..Default::default()
        };
        let engine = SalesAnalytics::with_settings(create_test_catalog(), create_test_lines(), settings);

        assert!(matches!(
            engine.overview(&QuerySpec::new()),
            Outcome::Err(AnalyticsError::UnboundedQuery)
        ));
        assert!(!engine.overview(&QuerySpec::new().year(1997)).is_err());
    }

    #[test]
    fn test_invalid_month_is_error() {
        let engine = create_test_engine();
        assert!(matches!(
            engine.overview(&QuerySpec::new().year(1997).month(13)),
            Outcome::Err(AnalyticsError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_unknown_product_yields_empty_report() {
        let engine = create_test_engine();
        let outcome = engine.overview(&QuerySpec::new().year(1997).product(99));

        assert_eq!(
            outcome.advisories(),
            &[Advisory::UnknownProduct { product_id: 99 }]
        );
        let report = outcome.value().unwrap();
        assert_eq!(report.summary, SalesSummary::default());
        assert!(report.periods.is_empty());
    }

    #[test]
    fn test_discount_out_of_range_flagged_but_aggregated() {
        let mut lines = create_test_lines();
        lines.push(line(5, "ALFKI", 2, 1, 10.0, 1.5, (1997, 6, 1)));
        let engine = SalesAnalytics::new(create_test_catalog(), lines);

        let outcome = engine.overview(&QuerySpec::new().customer("ALFKI").year(1997));

        assert_eq!(
            outcome.advisories(),
            &[Advisory::DiscountOutOfRange {
                order_id: 5,
                product_id: 2,
                discount: 1.5
            }]
        );
        // 47 from order 1, -5 from the bad line
        let report = outcome.value().unwrap();
        assert!((report.summary.total_revenue - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_customer_dashboard() {
        let engine = create_test_engine();
        let (dashboard, advisories) = engine.customer_dashboard("ALFKI").into_result().unwrap();

        assert!(advisories.is_empty());
        assert_eq!(dashboard.company_name.as_deref(), Some("Alfreds Futterkiste"));
        assert_eq!(dashboard.summary.total_orders, 2);
        assert_eq!(dashboard.summary.total_quantity, 6);
        assert!((dashboard.summary.total_revenue - 57.0).abs() < 1e-9);
        assert_eq!(dashboard.top_products[0].name, "Chai");
        assert_eq!(dashboard.periods.len(), 2);

        let overall = summarize(engine.lines());
        assert!((dashboard.comparison.overall_avg_order_value - overall.avg_order_value).abs() < 1e-9);
        assert!((dashboard.comparison.revenue_share - 57.0 / overall.total_revenue).abs() < 1e-9);

        // ANATR shares product 3 and also bought Chang
        let recommended: Vec<i64> = dashboard.recommendations.iter().map(|r| r.product_id).collect();
        assert_eq!(recommended, vec![2]);
    }

    #[test]
    fn test_unknown_customer_dashboard_is_empty() {
        let engine = create_test_engine();
        let outcome = engine.customer_dashboard("ZZZZZ");

        assert_eq!(
            outcome.advisories(),
            &[Advisory::UnknownCustomer {
                customer_id: "ZZZZZ".to_string()
            }]
        );
        let dashboard = outcome.value().unwrap();
        assert_eq!(dashboard.summary.total_orders, 0);
        assert!(dashboard.recommendations.is_empty());
        assert_eq!(dashboard.comparison.avg_order_value_ratio, 0.0);
    }

    #[test]
    fn test_product_dashboard_with_low_stock() {
        let engine = create_test_engine();
        let outcome = engine.product_dashboard(2, Some(1997));

        assert_eq!(
            outcome.advisories(),
            &[Advisory::LowStock {
                product_id: 2,
                units_in_stock: 5
            }]
        );
        let dashboard = outcome.value().unwrap();
        assert_eq!(dashboard.name, "Chang");
        assert!((dashboard.summary.total_revenue - 180.5).abs() < 1e-9);
        // Beverages 1997: 47 (Chai) + 180.5 (Chang)
        assert!((dashboard.category_revenue_share - 180.5 / 227.5).abs() < 1e-9);
        assert_eq!(dashboard.top_customers.len(), 1);
        assert_eq!(dashboard.top_customers[0].customer_id, "ANATR");
        assert_eq!(dashboard.periods[0].period.to_string(), "1997-03");
    }

    #[test]
    fn test_product_dashboard_all_years() {
        let engine = create_test_engine();
        let outcome = engine.product_dashboard(1, None);

        // Chai is well stocked, so only the scan advisory remains
        assert_eq!(outcome.advisories(), &[Advisory::UnboundedScan]);
        let dashboard = outcome.value().unwrap();
        let customers: Vec<&str> = dashboard
            .top_customers
            .iter()
            .map(|c| c.customer_id.as_str())
            .collect();
        // BERGS 108 beats ALFKI 47
        assert_eq!(customers, vec!["BERGS", "ALFKI"]);
        assert_eq!(dashboard.top_customers[0].company_name.as_deref(), Some("Berglunds snabbköp"));
    }

    #[test]
    fn test_discontinued_product_not_low_stock() {
        let engine = create_test_engine();
        let outcome = engine.product_dashboard(4, Some(1997));
        assert!(matches!(outcome, Outcome::Ok(_)));
    }

    #[test]
    fn test_category_dashboard() {
        let engine = create_test_engine();
        let (dashboard, advisories) = engine.category_dashboard(2, Some(1997)).into_result().unwrap();

        assert!(advisories.is_empty());
        assert_eq!(dashboard.name, "Condiments");
        assert!((dashboard.summary.total_revenue - 40.0).abs() < 1e-9);
        assert!((dashboard.revenue_share - 40.0 / 267.5).abs() < 1e-9);
        assert_eq!(dashboard.products.top.len(), 1);
        assert_eq!(dashboard.products.top[0].name, "Aniseed Syrup");
    }

    #[test]
    fn test_unknown_category() {
        let engine = create_test_engine();
        let outcome = engine.category_dashboard(42, Some(1997));

        assert_eq!(
            outcome.advisories(),
            &[Advisory::UnknownCategory { category_id: 42 }]
        );
        assert_eq!(outcome.value().unwrap().name, "Category 42");
    }

    #[test]
    fn test_recommendations() {
        let engine = create_test_engine();

        let (recs, advisories) = engine.recommendations("BERGS").into_result().unwrap();
        assert!(advisories.is_empty());
        // BERGS shares Chai with ALFKI, who also bought Aniseed Syrup
        assert_eq!(recs.iter().map(|r| r.product_id).collect::<Vec<_>>(), vec![3]);

        let unknown = engine.recommendations("NOONE");
        assert_eq!(unknown.advisories().len(), 1);
        assert!(unknown.value().unwrap().is_empty());
    }

    #[test]
    fn test_overview_is_idempotent() {
        let engine = create_test_engine();
        let spec = QuerySpec::new().year(1997);
        assert_eq!(engine.overview(&spec).value(), engine.overview(&spec).value());
    }
}
