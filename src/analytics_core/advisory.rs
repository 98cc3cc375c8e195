//! Non-fatal advisories returned alongside aggregation results

use super::model::{CategoryId, CustomerId, OrderId, ProductId};
use crate::error::AnalyticsError;
use serde::Serialize;
use std::fmt;

/// Something the caller should know about a result that is still usable
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Product filter does not resolve to a catalog entry
    UnknownProduct { product_id: ProductId },
    UnknownCategory { category_id: CategoryId },
    UnknownCustomer { customer_id: CustomerId },
    /// Neither a year nor a customer filter limits the scan
    UnboundedScan,
    /// Stored discount outside [0, 1); aggregated as stored
    DiscountOutOfRange {
        order_id: OrderId,
        product_id: ProductId,
        discount: f64,
    },
    LowStock {
        product_id: ProductId,
        units_in_stock: i64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnknownProduct { product_id } => write!(f, "unknown product {}", product_id),
            Advisory::UnknownCategory { category_id } => {
                write!(f, "unknown category {}", category_id)
            }
            Advisory::UnknownCustomer { customer_id } => {
                write!(f, "unknown customer {}", customer_id)
            }
            Advisory::UnboundedScan => write!(f, "no year or customer filter, scanning all orders"),
            Advisory::DiscountOutOfRange {
                order_id,
                product_id,
                discount,
            } => write!(
                f,
                "order {} product {} has discount {} outside [0, 1)",
                order_id, product_id, discount
            ),
            Advisory::LowStock {
                product_id,
                units_in_stock,
            } => write!(f, "product {} is low on stock ({} units)", product_id, units_in_stock),
        }
    }
}

/// Result of an aggregation request
#[derive(Debug)]
pub enum Outcome<T> {
    Ok(T),
    Advised(T, Vec<Advisory>),
    Err(AnalyticsError),
}

impl<T> Outcome<T> {
    /// `Ok` when there are no advisories, `Advised` otherwise
    pub fn from_parts(value: T, advisories: Vec<Advisory>) -> Self {
        if advisories.is_empty() {
            Outcome::Ok(value)
        } else {
            Outcome::Advised(value, advisories)
        }
    }

    pub fn from_result(result: Result<(T, Vec<Advisory>), AnalyticsError>) -> Self {
        match result {
            Ok((value, advisories)) => Self::from_parts(value, advisories),
            Err(e) => Outcome::Err(e),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Ok(value) | Outcome::Advised(value, _) => Some(value),
            Outcome::Err(_) => None,
        }
    }

    pub fn advisories(&self) -> &[Advisory] {
        match self {
            Outcome::Advised(_, advisories) => advisories,
            _ => &[],
        }
    }

    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    /// Split into the value with its advisories, or the error
    pub fn into_result(self) -> Result<(T, Vec<Advisory>), AnalyticsError> {
        match self {
            Outcome::Ok(value) => Ok((value, Vec::new())),
            Outcome::Advised(value, advisories) => Ok((value, advisories)),
            Outcome::Err(e) => Err(e),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Advised(value, advisories) => Outcome::Advised(f(value), advisories),
            Outcome::Err(e) => Outcome::Err(e),
        }
    }
}

impl<T> From<AnalyticsError> for Outcome<T> {
    fn from(e: AnalyticsError) -> Self {
        Outcome::Err(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert!(matches!(Outcome::from_parts(1, vec![]), Outcome::Ok(1)));

        let advised = Outcome::from_parts(2, vec![Advisory::UnboundedScan]);
        assert_eq!(advised.value(), Some(&2));
        assert_eq!(advised.advisories(), &[Advisory::UnboundedScan]);
        assert!(!advised.is_err());
    }

    #[test]
    fn test_error_has_no_value() {
        let outcome: Outcome<u32> = AnalyticsError::UnboundedQuery.into();
        assert!(outcome.is_err());
        assert_eq!(outcome.value(), None);
        assert!(outcome.advisories().is_empty());
        assert!(matches!(
            outcome.into_result(),
            Err(AnalyticsError::UnboundedQuery)
        ));
    }

    #[test]
    fn test_map_keeps_advisories() {
        let outcome = Outcome::from_parts(3, vec![Advisory::UnknownProduct { product_id: 9 }])
            .map(|v| v * 2);

        let (value, advisories) = outcome.into_result().unwrap();
        assert_eq!(value, 6);
        assert_eq!(advisories.len(), 1);
    }

    #[test]
    fn test_advisory_serializes_tagged() {
        let json = serde_json::to_string(&Advisory::LowStock {
            product_id: 5,
            units_in_stock: 0,
        })
        .unwrap();
        assert_eq!(json, r#"{"kind":"low_stock","product_id":5,"units_in_stock":0}"#);
        assert_eq!(
            Advisory::UnknownCustomer {
                customer_id: "ZZZZZ".to_string()
            }
            .to_string(),
            "unknown customer ZZZZZ"
        );
    }
}
