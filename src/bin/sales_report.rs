//! Sales Report Binary - dashboards from the Traders order database
//!
//! Prints one JSON document per invocation on stdout; logs go to stderr.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin sales_report -- overview --year 1997
//! cargo run --release --bin sales_report -- customer ALFKI
//! cargo run --release --bin sales_report -- --snapshot traders.json product 11 --year 1997
//! cargo run --release --bin sales_report -- discount 15 10 2
//! ```
//!
//! ## Environment Variables
//!
//! - SALESFLOW_DB_PATH - SQLite database path (default: data/traders.db)
//! - SALESFLOW_SCHEMA_DIR - Schema directory used by `init-db` (default: sql)
//! - RANKING_LIMIT - Length of top/bottom rankings (default: 10)
//! - RECOMMENDATION_LIMIT - Recommended products per customer (default: 10)
//! - SIMILAR_CUSTOMER_LIMIT - Similar customers considered (default: 50)
//! - LOW_STOCK_THRESHOLD - Low-stock advisory level (default: 10)
//! - REQUIRE_BOUNDED_SCOPE - Reject scans without year/customer filter (default: false)
//! - RUST_LOG - Logging level (optional, default: info)

use clap::{Args, Parser, Subcommand};
use rusqlite::Connection;
use salesflow::analytics_core::{Outcome, QuerySpec, SalesAnalytics, VolumeDiscountPolicy};
use salesflow::sqlite_pragma::apply_optimized_pragmas;
use salesflow::store::{
    run_schema_migrations, save_snapshot, OrderStore, SnapshotStore, SqliteOrderStore,
};
use salesflow::{AnalyticsConfig, StoreError};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sales_report", version, about = "Sales analytics reports for the Traders order database")]
struct Cli {
    /// SQLite database (overrides SALESFLOW_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Read a JSON snapshot instead of the database
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summary, periods and rankings for a filtered scope
    Overview(Filters),

    /// Customer summary, comparison and recommendations
    Customer { customer_id: String },

    /// Product summary, top customers and category share
    Product {
        product_id: i64,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Category summary and product ranking
    Category {
        category_id: i64,
        #[arg(long)]
        year: Option<i32>,
    },

    /// Product recommendations for a customer
    Recommend {
        customer_id: String,
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Volume discounts for the line quantities of a draft order
    Discount {
        #[arg(required = true)]
        quantities: Vec<u32>,
    },

    /// Write the filtered dataset to a JSON snapshot
    Export {
        #[arg(short, long)]
        output: PathBuf,
        #[command(flatten)]
        filters: Filters,
    },

    /// Create the schema in an empty database
    InitDb,
}

#[derive(Args, Debug, Clone, Default)]
struct Filters {
    #[arg(long)]
    year: Option<i32>,
    #[arg(long)]
    month: Option<u32>,
    #[arg(long)]
    product: Option<i64>,
    #[arg(long)]
    category: Option<i64>,
    #[arg(long)]
    customer: Option<String>,
}

impl Filters {
    fn to_spec(&self) -> QuerySpec {
        QuerySpec {
            year: self.year,
            month: self.month,
            product_id: self.product,
            category_id: self.category,
            customer_id: self.customer.clone(),
        }
    }
}

#[derive(Serialize)]
struct LineDiscount {
    quantity: u32,
    discount: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = AnalyticsConfig::from_env()?;
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.db_path));

    log::info!("🚀 Starting sales report: {:?}", cli.command);

    match cli.command {
        Command::Discount { ref quantities } => {
            let policy = VolumeDiscountPolicy::with_defaults();
            let discounts: Vec<LineDiscount> = quantities
                .iter()
                .zip(policy.discounts_for_order(quantities))
                .map(|(&quantity, discount)| LineDiscount { quantity, discount })
                .collect();
            print_json(&discounts, cli.pretty)
        }
        Command::InitDb => {
            let conn = Connection::open(&db_path)?;
            apply_optimized_pragmas(&conn)?;
            run_schema_migrations(&conn, &config.schema_dir)?;
            log::info!("✅ Schema ready in {}", db_path.display());
            Ok(())
        }
        Command::Export {
            ref output,
            ref filters,
        } => {
            let spec = filters.to_spec();
            spec.validate()?;
            let store = open_store(cli.snapshot.as_ref(), &db_path)?;
            save_snapshot(&store.dataset(&spec)?, output)?;
            Ok(())
        }
        ref command => {
            let mut settings = config.engine_settings();
            if let Command::Recommend {
                limit: Some(limit), ..
            } = command
            {
                settings.recommendation_limit = *limit;
            }

            let store = open_store(cli.snapshot.as_ref(), &db_path)?;
            let engine = SalesAnalytics::from_store(&*store, settings);

            match command {
                Command::Overview(filters) => emit(engine.overview(&filters.to_spec()), cli.pretty),
                Command::Customer { customer_id } => {
                    emit(engine.customer_dashboard(customer_id), cli.pretty)
                }
                Command::Product { product_id, year } => {
                    emit(engine.product_dashboard(*product_id, *year), cli.pretty)
                }
                Command::Category { category_id, year } => {
                    emit(engine.category_dashboard(*category_id, *year), cli.pretty)
                }
                Command::Recommend { customer_id, .. } => {
                    emit(engine.recommendations(customer_id), cli.pretty)
                }
                Command::Discount { .. } | Command::Export { .. } | Command::InitDb => Ok(()),
            }
        }
    }
}

fn open_store(snapshot: Option<&PathBuf>, db_path: &Path) -> Result<Box<dyn OrderStore>, StoreError> {
    match snapshot {
        Some(path) => Ok(Box::new(SnapshotStore::load(path)?)),
        None => Ok(Box::new(SqliteOrderStore::open(db_path)?)),
    }
}

/// Log advisories and print the value, or fail with the error
fn emit<T: Serialize>(outcome: Outcome<T>, pretty: bool) -> Result<(), Box<dyn Error>> {
    let (value, advisories) = outcome.into_result()?;
    for advisory in &advisories {
        log::warn!("⚠️  {}", advisory);
    }
    print_json(&value, pretty)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), Box<dyn Error>> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}
