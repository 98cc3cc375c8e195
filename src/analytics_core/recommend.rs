//! Collaborative-filtering product recommendations

use super::model::{Catalog, CustomerId, OrderId, OrderLine, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// One recommended product with the counters it was ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: ProductId,
    /// Distinct orders containing the product
    pub purchase_count: usize,
    /// Distinct customers who bought it (similar customers only; 0 for top-seller fallbacks)
    pub customer_count: usize,
    pub total_quantity: u64,
}

#[derive(Default)]
struct ProductAccumulator {
    orders: HashSet<OrderId>,
    customers: HashSet<CustomerId>,
    total_quantity: u64,
}

pub struct Recommender {
    similar_customer_limit: usize,
}

impl Recommender {
    pub fn new(similar_customer_limit: usize) -> Self {
        Self {
            similar_customer_limit,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(50)
    }

    /// Recommended product ids for `customer_id`, best first
    pub fn recommend(
        &self,
        customer_id: &str,
        lines: &[OrderLine],
        catalog: &Catalog,
        limit: usize,
    ) -> Vec<ProductId> {
        self.recommend_detailed(customer_id, lines, catalog, limit)
            .into_iter()
            .map(|r| r.product_id)
            .collect()
    }

    /// Recommendations for `customer_id` with their ranking counters
    ///
    /// 1. Collect the products the customer already bought.
    /// 2. No history: global top sellers.
    /// 3. Otherwise rank other customers by shared distinct products and keep
    ///    the most similar ones.
    /// 4. No similar customers: top sellers the customer does not own yet.
    /// 5. Otherwise rank what the similar customers bought, excluding owned
    ///    and discontinued products, by (orders, customers, quantity).
    pub fn recommend_detailed(
        &self,
        customer_id: &str,
        lines: &[OrderLine],
        catalog: &Catalog,
        limit: usize,
    ) -> Vec<Recommendation> {
        let owned: BTreeSet<ProductId> = lines
            .iter()
            .filter(|l| l.customer_id.as_deref() == Some(customer_id))
            .map(|l| l.product_id)
            .collect();

        if owned.is_empty() {
            log::debug!("No purchase history for {}, using top sellers", customer_id);
            return top_sellers(lines, catalog, &owned, limit);
        }

        let similar = self.similar_customers(customer_id, lines, &owned);
        if similar.is_empty() {
            log::debug!("No similar customers for {}, using top sellers", customer_id);
            return top_sellers(lines, catalog, &owned, limit);
        }

        let mut groups: BTreeMap<ProductId, ProductAccumulator> = BTreeMap::new();
        for line in lines {
            let Some(ref buyer) = line.customer_id else {
                continue;
            };
            if !similar.contains(buyer) || owned.contains(&line.product_id) {
                continue;
            }
            if catalog.is_discontinued(line.product_id) != Some(false) {
                continue;
            }
            let acc = groups.entry(line.product_id).or_default();
            acc.orders.insert(line.order_id);
            acc.customers.insert(buyer.clone());
            acc.total_quantity += line.quantity as u64;
        }

        let mut ranked: Vec<Recommendation> = groups
            .into_iter()
            .map(|(product_id, acc)| Recommendation {
                product_id,
                purchase_count: acc.orders.len(),
                customer_count: acc.customers.len(),
                total_quantity: acc.total_quantity,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.purchase_count
                .cmp(&a.purchase_count)
                .then(b.customer_count.cmp(&a.customer_count))
                .then(b.total_quantity.cmp(&a.total_quantity))
        });
        ranked.truncate(limit);

        log::debug!(
            "Recommended {} products for {} from {} similar customers",
            ranked.len(),
            customer_id,
            similar.len()
        );

        ranked
    }

    /// Other customers ranked by how many distinct products they share with
    /// the target, capped at `similar_customer_limit`
    fn similar_customers(
        &self,
        customer_id: &str,
        lines: &[OrderLine],
        owned: &BTreeSet<ProductId>,
    ) -> HashSet<CustomerId> {
        let mut shared: BTreeMap<&str, BTreeSet<ProductId>> = BTreeMap::new();

        for line in lines {
            let Some(ref other) = line.customer_id else {
                continue;
            };
            if other == customer_id || !owned.contains(&line.product_id) {
                continue;
            }
            shared.entry(other.as_str()).or_default().insert(line.product_id);
        }

        let mut ranked: Vec<(&str, usize)> = shared
            .into_iter()
            .map(|(customer, products)| (customer, products.len()))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        ranked
            .into_iter()
            .take(self.similar_customer_limit)
            .map(|(customer, _)| customer.to_string())
            .collect()
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Best-selling non-discontinued products by (orders desc, quantity desc)
fn top_sellers(
    lines: &[OrderLine],
    catalog: &Catalog,
    exclude: &BTreeSet<ProductId>,
    limit: usize,
) -> Vec<Recommendation> {
    let mut groups: BTreeMap<ProductId, ProductAccumulator> = BTreeMap::new();

    for line in lines {
        if exclude.contains(&line.product_id) {
            continue;
        }
        if catalog.is_discontinued(line.product_id) != Some(false) {
            continue;
        }
        let acc = groups.entry(line.product_id).or_default();
        acc.orders.insert(line.order_id);
        acc.total_quantity += line.quantity as u64;
    }

    let mut ranked: Vec<Recommendation> = groups
        .into_iter()
        .map(|(product_id, acc)| Recommendation {
            product_id,
            purchase_count: acc.orders.len(),
            customer_count: 0,
            total_quantity: acc.total_quantity,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.purchase_count
            .cmp(&a.purchase_count)
            .then(b.total_quantity.cmp(&a.total_quantity))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics_core::model::Product;
    use chrono::NaiveDate;

    fn line(order_id: i64, customer: &str, product_id: i64, quantity: u32) -> OrderLine {
        OrderLine {
            order_id,
            product_id,
            category_id: Some(1),
            customer_id: Some(customer.to_string()),
            unit_price: 10.0,
            quantity,
            discount: 0.0,
            order_date: NaiveDate::from_ymd_opt(1997, 1, 1).unwrap(),
        }
    }

    fn catalog(discontinued: &[i64]) -> Catalog {
        let mut catalog = Catalog::new();
        for id in 1..=10 {
            catalog.add_product(Product {
                product_id: id,
                name: format!("Product {}", id),
                category_id: Some(1),
                unit_price: Some(10.0),
                units_in_stock: Some(100),
                discontinued: discontinued.contains(&id),
            });
        }
        catalog
    }

    fn history() -> Vec<OrderLine> {
        vec![
            // target customer
            line(1, "ALFKI", 1, 5),
            line(1, "ALFKI", 2, 5),
            // shares products 1 and 2
            line(2, "ANATR", 1, 3),
            line(2, "ANATR", 2, 3),
            line(2, "ANATR", 3, 4),
            line(3, "ANATR", 4, 1),
            // shares product 1
            line(4, "ANTON", 1, 2),
            line(4, "ANTON", 3, 9),
            line(5, "ANTON", 5, 20),
            // shares nothing
            line(6, "BERGS", 6, 50),
            line(7, "BERGS", 6, 50),
        ]
    }

    #[test]
    fn test_recommends_from_similar_customers() {
        let lines = history();
        let recs = Recommender::with_defaults().recommend_detailed("ALFKI", &lines, &catalog(&[]), 10);

        let ids: Vec<i64> = recs.iter().map(|r| r.product_id).collect();
        // product 3: two orders, two customers; then 5 (qty 20) beats 4 (qty 1)
        assert_eq!(ids, vec![3, 5, 4]);
        assert_eq!(recs[0].purchase_count, 2);
        assert_eq!(recs[0].customer_count, 2);
        assert_eq!(recs[0].total_quantity, 13);
        // BERGS is not similar, so product 6 never shows up
        assert!(!ids.contains(&6));
        // owned products are excluded
        assert!(!ids.contains(&1) && !ids.contains(&2));
    }

    #[test]
    fn test_discontinued_products_excluded() {
        let lines = history();
        let ids = Recommender::with_defaults().recommend("ALFKI", &lines, &catalog(&[3]), 10);
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn test_limit_truncates() {
        let lines = history();
        let ids = Recommender::with_defaults().recommend("ALFKI", &lines, &catalog(&[]), 1);
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_new_customer_gets_top_sellers() {
        let lines = history();
        let catalog = catalog(&[]);
        let recommender = Recommender::with_defaults();

        let recs = recommender.recommend("NEWCO", &lines, &catalog, 3);
        let fallback: Vec<i64> = top_sellers(&lines, &catalog, &BTreeSet::new(), 3)
            .into_iter()
            .map(|r| r.product_id)
            .collect();

        assert_eq!(recs, fallback);
        // product 1: 3 orders; 6: 2 orders, qty 100; 3: 2 orders, qty 13
        assert_eq!(recs, vec![1, 6, 3]);
    }

    #[test]
    fn test_no_similar_customers_falls_back_without_owned() {
        let lines = vec![
            line(1, "ALFKI", 7, 1),
            line(2, "BERGS", 6, 5),
            line(3, "BLAUS", 6, 5),
            line(4, "BLAUS", 8, 1),
        ];

        let ids = Recommender::with_defaults().recommend("ALFKI", &lines, &catalog(&[]), 10);
        assert_eq!(ids, vec![6, 8]);
    }

    #[test]
    fn test_similar_customer_cap() {
        let mut lines = vec![line(1, "ALFKI", 1, 1), line(1, "ALFKI", 2, 1)];
        // CUST0 shares two products, the rest share one
        lines.push(line(100, "CUST0", 1, 1));
        lines.push(line(100, "CUST0", 2, 1));
        lines.push(line(100, "CUST0", 9, 1));
        for i in 1..5 {
            let customer = format!("CUST{}", i);
            lines.push(line(100 + i, &customer, 1, 1));
            lines.push(line(100 + i, &customer, 10, 1));
        }

        let ids = Recommender::new(1).recommend("ALFKI", &lines, &catalog(&[]), 10);
        assert_eq!(ids, vec![9]);

        let ids = Recommender::new(50).recommend("ALFKI", &lines, &catalog(&[]), 10);
        assert_eq!(ids, vec![10, 9]);
    }

    #[test]
    fn test_recommendations_idempotent() {
        let lines = history();
        let catalog = catalog(&[]);
        let recommender = Recommender::with_defaults();
        assert_eq!(
            recommender.recommend_detailed("ALFKI", &lines, &catalog, 10),
            recommender.recommend_detailed("ALFKI", &lines, &catalog, 10)
        );
    }
}
