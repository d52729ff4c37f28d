use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::TrackerError;

/// Products below this quantity are reported by [`Inventory::low_stock_default`].
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// What a successful [`Inventory::update`] did to the stored quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockChange {
    /// Product was absent and has been added with this quantity.
    Created(i64),
    /// Quantity changed and is still positive.
    Adjusted(i64),
    /// Quantity dropped below zero. Stored anyway.
    Negative(i64),
    /// Quantity reached exactly zero and the product was dropped.
    Removed,
}

/// Product name → quantity on hand.
///
/// A product whose quantity reaches exactly zero is removed. Quantities may go
/// negative; that is logged but not blocked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    stock: IndexMap<String, i64>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory that owns a copy of `snapshot`.
    pub fn from_snapshot<I, K>(snapshot: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self {
            stock: snapshot
                .into_iter()
                .map(|(name, qty)| (name.into(), qty))
                .collect(),
        }
    }

    /// Apply a relative change to `product`.
    ///
    /// An absent product is created when `delta` is positive; a zero or
    /// negative change to an absent product is rejected.
    pub fn update(&mut self, product: &str, delta: i64) -> Result<StockChange, TrackerError> {
        let Some(current) = self.stock.get_mut(product) else {
            if delta > 0 {
                self.stock.insert(product.to_string(), delta);
                debug!(product, quantity = delta, "product added");
                return Ok(StockChange::Created(delta));
            }
            debug!(product, delta, "rejected change to missing product");
            return Err(TrackerError::UnknownProduct {
                product: product.to_string(),
                delta,
            });
        };

        let updated = current
            .checked_add(delta)
            .ok_or_else(|| TrackerError::QuantityOverflow {
                product: product.to_string(),
            })?;

        if updated == 0 {
            self.stock.shift_remove(product);
            debug!(product, "quantity reached zero, product removed");
            return Ok(StockChange::Removed);
        }

        *current = updated;
        if updated < 0 {
            warn!(product, quantity = updated, "quantity went negative");
            Ok(StockChange::Negative(updated))
        } else {
            debug!(product, quantity = updated, "quantity updated");
            Ok(StockChange::Adjusted(updated))
        }
    }

    /// Products with quantity strictly below `threshold`, in insertion order.
    pub fn low_stock(&self, threshold: i64) -> Vec<&str> {
        self.stock
            .iter()
            .filter(|(_, qty)| **qty < threshold)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn low_stock_default(&self) -> Vec<&str> {
        self.low_stock(DEFAULT_LOW_STOCK_THRESHOLD)
    }

    pub fn quantity(&self, product: &str) -> Option<i64> {
        self.stock.get(product).copied()
    }

    pub fn contains(&self, product: &str) -> bool {
        self.stock.contains_key(product)
    }

    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.stock.iter().map(|(name, qty)| (name.as_str(), *qty))
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.stock.is_empty() {
            return writeln!(f, "Inventory is empty.");
        }
        for (name, qty) in &self.stock {
            writeln!(f, "- {name}: {qty}")?;
        }
        Ok(())
    }
}
