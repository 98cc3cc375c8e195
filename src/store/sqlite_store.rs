//! SQLite-backed order store
//!
//! Reads the Northwind-style `orders` / `order_details` / `products` tables.
//! Scope filters are pushed into one static statement: each filter is bound
//! as a parameter and a NULL parameter disables its predicate.

use super::OrderStore;
use crate::analytics_core::model::{Catalog, Category, Customer, Order, OrderLine, Product};
use crate::analytics_core::scope::QuerySpec;
use crate::error::StoreError;
use crate::sqlite_pragma::apply_reader_pragmas;
use rusqlite::{params, Connection, OpenFlags};
use std::fs;
use std::path::Path;

const LINES_SQL: &str = "
    SELECT od.order_id, od.product_id, p.category_id, o.customer_id,
           od.unit_price, od.quantity, od.discount, date(o.order_date)
    FROM order_details od
    JOIN orders o ON o.order_id = od.order_id
    LEFT JOIN products p ON p.product_id = od.product_id
    WHERE date(o.order_date) IS NOT NULL
      AND (?1 IS NULL OR CAST(strftime('%Y', o.order_date) AS INTEGER) = ?1)
      AND (?2 IS NULL OR CAST(strftime('%m', o.order_date) AS INTEGER) = ?2)
      AND (?3 IS NULL OR od.product_id = ?3)
      AND (?4 IS NULL OR p.category_id = ?4)
      AND (?5 IS NULL OR o.customer_id = ?5)
    ORDER BY od.order_id, od.product_id";

const ORDERS_SQL: &str = "
    SELECT order_id, customer_id, employee_id, date(order_date), COALESCE(freight, 0.0)
    FROM orders
    WHERE (?1 IS NULL OR CAST(strftime('%Y', order_date) AS INTEGER) = ?1)
      AND (?2 IS NULL OR CAST(strftime('%m', order_date) AS INTEGER) = ?2)
      AND (?3 IS NULL OR customer_id = ?3)
    ORDER BY order_id";

/// Read-only order store over a SQLite database
pub struct SqliteOrderStore {
    conn: Connection,
}

impl SqliteOrderStore {
    /// Open the existing database at `db_path` read-only
    ///
    /// A missing file is an error; the store never creates one.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref();
        if !db_path.is_file() {
            return Err(StoreError::DatabaseMissing(db_path.display().to_string()));
        }

        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        apply_reader_pragmas(&conn)?;
        conn.execute("PRAGMA query_only = ON", [])?;

        log::info!("📥 SQLite order store opened: {}", db_path.display());

        Ok(Self { conn })
    }

    /// Wrap an already configured connection
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn products(&self) -> Result<Vec<Product>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT product_id, product_name, category_id, unit_price, units_in_stock, discontinued
             FROM products
             ORDER BY product_id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Product {
                product_id: row.get(0)?,
                name: row.get(1)?,
                category_id: row.get(2)?,
                unit_price: row.get(3)?,
                units_in_stock: row.get(4)?,
                discontinued: row.get::<_, i64>(5)? != 0,
            })
        })?;

        collect_valid_rows(rows, "product")
    }

    fn categories(&self) -> Result<Vec<Category>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT category_id, category_name FROM categories ORDER BY category_id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                category_id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        collect_valid_rows(rows, "category")
    }

    fn customers(&self) -> Result<Vec<Customer>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id, company_name FROM customers ORDER BY customer_id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Customer {
                customer_id: row.get(0)?,
                company_name: row.get(1)?,
            })
        })?;

        collect_valid_rows(rows, "customer")
    }
}

impl OrderStore for SqliteOrderStore {
    fn catalog(&self) -> Result<Catalog, StoreError> {
        let mut catalog = Catalog::new();
        for product in self.products()? {
            catalog.add_product(product);
        }
        for category in self.categories()? {
            catalog.add_category(category);
        }
        for customer in self.customers()? {
            catalog.add_customer(customer);
        }

        log::debug!(
            "📥 Catalog loaded: {} products, {} categories, {} customers",
            catalog.products.len(),
            catalog.categories.len(),
            catalog.customers.len()
        );

        Ok(catalog)
    }

    fn lines(&self, spec: &QuerySpec) -> Result<Vec<OrderLine>, StoreError> {
        let mut stmt = self.conn.prepare_cached(LINES_SQL)?;

        let rows = stmt.query_map(
            params![
                spec.year,
                spec.month,
                spec.product_id,
                spec.category_id,
                spec.customer_id
            ],
            |row| {
                Ok(OrderLine {
                    order_id: row.get(0)?,
                    product_id: row.get(1)?,
                    category_id: row.get(2)?,
                    customer_id: row.get(3)?,
                    unit_price: row.get(4)?,
                    quantity: row.get(5)?,
                    discount: row.get(6)?,
                    order_date: row.get(7)?,
                })
            },
        )?;

        let lines = collect_valid_rows(rows, "order line")?;
        log::debug!("📥 Read {} order lines for {:?}", lines.len(), spec);
        Ok(lines)
    }

    fn orders(&self, spec: &QuerySpec) -> Result<Vec<Order>, StoreError> {
        let mut stmt = self.conn.prepare_cached(ORDERS_SQL)?;

        let rows = stmt.query_map(params![spec.year, spec.month, spec.customer_id], |row| {
            Ok(Order {
                order_id: row.get(0)?,
                customer_id: row.get(1)?,
                employee_id: row.get(2)?,
                order_date: row.get(3)?,
                freight: row.get(4)?,
            })
        })?;

        collect_valid_rows(rows, "order")
    }
}

/// Collect mapped rows, skipping rows whose values don't fit their fields
///
/// Negative quantities or text in numeric columns drop only that row.
/// Any other error aborts the fetch.
fn collect_valid_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
    kind: &str,
) -> Result<Vec<T>, StoreError> {
    let mut valid = Vec::new();
    for row in rows {
        match row {
            Ok(value) => valid.push(value),
            Err(
                e @ (rusqlite::Error::IntegralValueOutOfRange(..)
                | rusqlite::Error::InvalidColumnType(..)
                | rusqlite::Error::FromSqlConversionFailure(..)),
            ) => {
                log::warn!("⚠️  Skipping malformed {} row: {}", kind, e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(valid)
}

/// Run schema files from `schema_dir`
///
/// Executes every `.sql` file in name order (00_, 01_, ...). Files must use
/// `IF NOT EXISTS` so that re-running is a no-op.
pub fn run_schema_migrations(conn: &Connection, schema_dir: impl AsRef<Path>) -> Result<(), StoreError> {
    let schema_path = schema_dir.as_ref();

    if !schema_path.is_dir() {
        return Err(StoreError::SchemaDirMissing(schema_path.display().to_string()));
    }

    let mut sql_files: Vec<_> = fs::read_dir(schema_path)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("sql"))
        .collect();

    sql_files.sort_by_key(|entry| entry.file_name());

    log::info!("🔧 Running schema migrations from: {}", schema_path.display());

    for entry in sql_files {
        let filename = entry.file_name();
        let filename = filename.to_string_lossy();

        log::info!("   ├─ Executing: {}", filename);
        let sql_content = fs::read_to_string(entry.path())?;
        conn.execute_batch(&sql_content)?;
        log::info!("   └─ ✅ Success: {}", filename);
    }

    Ok(())
}
