//! Top/bottom-N rankings of products and categories

use super::model::{Catalog, OrderId, OrderLine};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Product,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Quantity,
    Revenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntity {
    pub entity_id: i64,
    pub name: String,
    pub quantity_sum: u64,
    pub revenue_sum: f64,
    pub order_count: usize,
}

impl RankedEntity {
    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Quantity => self.quantity_sum as f64,
            Metric::Revenue => self.revenue_sum,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopBottom {
    pub top: Vec<RankedEntity>,
    pub bottom: Vec<RankedEntity>,
}

#[derive(Default)]
struct EntityAccumulator {
    orders: HashSet<OrderId>,
    quantity_sum: u64,
    revenue_sum: f64,
}

/// Ranks grouped order lines, naming entities through the catalog
pub struct EntityRanker<'c> {
    catalog: &'c Catalog,
}

impl<'c> EntityRanker<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// Group lines by `dimension`, sort by `metric` and keep at most `limit`
    ///
    /// Groups are built in ascending id order and sorted with a stable sort,
    /// so entities with equal metrics stay in ascending id order. Lines
    /// without a category are left out of category rankings.
    pub fn rank<'a, I>(
        &self,
        lines: I,
        dimension: Dimension,
        metric: Metric,
        direction: Direction,
        limit: usize,
    ) -> Vec<RankedEntity>
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        let mut ranked = self.group(lines, dimension);
        sort_by_metric(&mut ranked, metric, direction);
        ranked.truncate(limit);
        ranked
    }

    /// Best and worst `n` products by revenue
    ///
    /// When `n` is at least the number of products, every product appears in
    /// both lists.
    pub fn top_bottom_by_revenue<'a, I>(&self, lines: I, n: usize) -> TopBottom
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        self.top_bottom(lines, Dimension::Product, n)
    }

    pub fn top_bottom<'a, I>(&self, lines: I, dimension: Dimension, n: usize) -> TopBottom
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        let grouped = self.group(lines, dimension);

        let mut top = grouped.clone();
        sort_by_metric(&mut top, Metric::Revenue, Direction::Desc);
        top.truncate(n);

        let mut bottom = grouped;
        sort_by_metric(&mut bottom, Metric::Revenue, Direction::Asc);
        bottom.truncate(n);

        TopBottom { top, bottom }
    }

    fn group<'a, I>(&self, lines: I, dimension: Dimension) -> Vec<RankedEntity>
    where
        I: IntoIterator<Item = &'a OrderLine>,
    {
        let mut groups: BTreeMap<i64, EntityAccumulator> = BTreeMap::new();

        for line in lines {
            let key = match dimension {
                Dimension::Product => line.product_id,
                Dimension::Category => match line.category_id {
                    Some(category_id) => category_id,
                    None => continue,
                },
            };
            let acc = groups.entry(key).or_default();
            acc.orders.insert(line.order_id);
            acc.quantity_sum += line.quantity as u64;
            acc.revenue_sum += line.revenue();
        }

        groups
            .into_iter()
            .map(|(entity_id, acc)| RankedEntity {
                entity_id,
                name: match dimension {
                    Dimension::Product => self.catalog.product_name(entity_id),
                    Dimension::Category => self.catalog.category_name(entity_id),
                },
                quantity_sum: acc.quantity_sum,
                revenue_sum: acc.revenue_sum,
                order_count: acc.orders.len(),
            })
            .collect()
    }
}

fn sort_by_metric(entities: &mut [RankedEntity], metric: Metric, direction: Direction) {
    // slice::sort_by is stable
    entities.sort_by(|a, b| {
        let ord: Ordering = a.metric(metric).total_cmp(&b.metric(metric));
        match direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        }
    });
}
