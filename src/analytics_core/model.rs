//! Order data model: order lines, orders and the catalog they reference

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type OrderId = i64;
pub type ProductId = i64;
pub type CategoryId = i64;
pub type CustomerId = String;

/// One product line within an order
///
/// Lines are immutable once written; every aggregate in this crate is derived
/// from a slice of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Derived from the product row
    pub category_id: Option<CategoryId>,
    /// Derived from the owning order
    pub customer_id: Option<CustomerId>,
    pub unit_price: f64,
    pub quantity: u32,
    /// Fraction in [0, 1)
    pub discount: f64,
    pub order_date: NaiveDate,
}

impl OrderLine {
    /// Net revenue after discount: `unit_price * quantity * (1 - discount)`
    pub fn revenue(&self) -> f64 {
        self.unit_price * self.quantity as f64 * (1.0 - self.discount)
    }

    /// Revenue before discount
    pub fn gross_revenue(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    /// Whether the stored discount lies outside [0, 1)
    pub fn has_discount_out_of_range(&self) -> bool {
        !(0.0..1.0).contains(&self.discount)
    }

    /// Parse an OrderLine from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub employee_id: Option<i64>,
    pub order_date: Option<NaiveDate>,
    pub freight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub category_id: Option<CategoryId>,
    /// List price
    pub unit_price: Option<f64>,
    pub units_in_stock: Option<i64>,
    pub discontinued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub company_name: String,
}

/// Lookup tables for the entities order lines reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: BTreeMap<ProductId, Product>,
    pub categories: BTreeMap<CategoryId, Category>,
    pub customers: BTreeMap<CustomerId, Customer>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&mut self, product: Product) {
        self.products.insert(product.product_id, product);
    }

    pub fn add_category(&mut self, category: Category) {
        self.categories.insert(category.category_id, category);
    }

    pub fn add_customer(&mut self, customer: Customer) {
        self.customers.insert(customer.customer_id.clone(), customer);
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.get(&product_id)
    }

    pub fn category(&self, category_id: CategoryId) -> Option<&Category> {
        self.categories.get(&category_id)
    }

    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers.get(customer_id)
    }

    pub fn product_name(&self, product_id: ProductId) -> String {
        self.product(product_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("Product {}", product_id))
    }

    pub fn category_name(&self, category_id: CategoryId) -> String {
        self.category(category_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("Category {}", category_id))
    }

    /// `Some(true)` for a discontinued product, `None` when the product is unknown
    pub fn is_discontinued(&self, product_id: ProductId) -> Option<bool> {
        self.product(product_id).map(|p| p.discontinued)
    }
}

/// Catalog, orders and lines exported together as one snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub catalog: Catalog,
    pub orders: Vec<Order>,
    pub lines: Vec<OrderLine>,
}
