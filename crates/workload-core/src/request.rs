//! Synthetic order parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest quantity a generated order may ask for.
pub const MIN_QUANTITY: i32 = 1;

/// Largest quantity a generated order may ask for.
pub const MAX_QUANTITY: i32 = 3;

/// Parameters of a single `place_order` call.
///
/// Created fresh for every attempt and consumed once by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl OrderRequest {
    pub fn new(customer_id: i32, product_id: i32, quantity: i32) -> Self {
        Self {
            customer_id,
            product_id,
            quantity,
        }
    }

    /// Check that every field lies inside the given bounds.
    pub fn is_within(&self, bounds: &OrderBounds) -> bool {
        (1..=bounds.max_customers()).contains(&self.customer_id)
            && (1..=bounds.max_products()).contains(&self.product_id)
            && (MIN_QUANTITY..=MAX_QUANTITY).contains(&self.quantity)
    }
}

/// Bounds configuration is invalid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidBounds {
    #[error("max customers must be at least 1, got {0}")]
    Customers(i32),

    #[error("max products must be at least 1, got {0}")]
    Products(i32),
}

/// Upper bounds for the customer and product id ranges.
///
/// Both ranges start at 1, so a bound below 1 would leave nothing to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBounds {
    max_customers: i32,
    max_products: i32,
}

impl OrderBounds {
    pub fn new(max_customers: i32, max_products: i32) -> Result<Self, InvalidBounds> {
        if max_customers < 1 {
            return Err(InvalidBounds::Customers(max_customers));
        }
        if max_products < 1 {
            return Err(InvalidBounds::Products(max_products));
        }
        Ok(Self {
            max_customers,
            max_products,
        })
    }

    pub fn max_customers(&self) -> i32 {
        self.max_customers
    }

    pub fn max_products(&self) -> i32 {
        self.max_products
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_reject_empty_ranges() {
        assert_eq!(OrderBounds::new(0, 5), Err(InvalidBounds::Customers(0)));
        assert_eq!(OrderBounds::new(5, -1), Err(InvalidBounds::Products(-1)));
        assert!(OrderBounds::new(1, 1).is_ok());
    }

    #[test]
    fn test_is_within() {
        let bounds = OrderBounds::new(10, 20).unwrap();

        assert!(OrderRequest::new(1, 1, 1).is_within(&bounds));
        assert!(OrderRequest::new(10, 20, 3).is_within(&bounds));
        assert!(!OrderRequest::new(0, 1, 1).is_within(&bounds));
        assert!(!OrderRequest::new(11, 1, 1).is_within(&bounds));
        assert!(!OrderRequest::new(1, 21, 1).is_within(&bounds));
        assert!(!OrderRequest::new(1, 1, 4).is_within(&bounds));
        assert!(!OrderRequest::new(1, 1, 0).is_within(&bounds));
    }
}
