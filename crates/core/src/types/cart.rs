//! Session cart value.
//!
//! A cart maps product ids to requested quantities. It is stored in the
//! session as a JSON object (`{"3": 2, "7": 1}`) and iterates in ascending
//! product id order, which is also the order checkout processes lines in.
//!
//! Quantities are always at least 1; a line that would drop to zero or below
//! is removed instead of stored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Largest quantity a single cart line can hold (fits a Postgres `INTEGER`).
pub const MAX_LINE_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A shopping cart keyed by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Quantity stored for a product, if it is in the cart.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.lines.get(&product_id).copied()
    }

    /// Iterate `(product, quantity)` lines in ascending product id order.
    pub fn lines(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    /// The quantity a line would hold after [`Cart::add`] with `requested`.
    ///
    /// Requests below 1 count as 1.
    #[must_use]
    pub fn quantity_after_add(&self, product_id: ProductId, requested: i64) -> u32 {
        let increment = clamp_quantity(requested.max(1));
        self.quantity(product_id)
            .unwrap_or(0)
            .saturating_add(increment)
            .min(MAX_LINE_QUANTITY)
    }

    /// Add `requested` units (at least 1) of a product, returning the new
    /// line quantity.
    pub fn add(&mut self, product_id: ProductId, requested: i64) -> u32 {
        let quantity = self.quantity_after_add(product_id, requested);
        self.lines.insert(product_id, quantity);
        quantity
    }

    /// Overwrite the quantity of a line already in the cart.
    ///
    /// A quantity of zero or less removes the line. Products not in the cart
    /// are left alone. Returns whether the cart changed.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) -> bool {
        let Some(current) = self.lines.get_mut(&product_id) else {
            return false;
        };

        if quantity <= 0 {
            self.lines.remove(&product_id);
            return true;
        }

        let quantity = clamp_quantity(quantity);
        let changed = *current != quantity;
        *current = quantity;
        changed
    }

    /// Remove a line. Returns whether it was present.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        self.lines.remove(&product_id).is_some()
    }
}

impl FromIterator<(ProductId, u32)> for Cart {
    fn from_iter<I: IntoIterator<Item = (ProductId, u32)>>(iter: I) -> Self {
        Self {
            lines: iter
                .into_iter()
                .filter(|(_, qty)| *qty > 0)
                .map(|(id, qty)| (id, qty.min(MAX_LINE_QUANTITY)))
                .collect(),
        }
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0))
        .unwrap_or(MAX_LINE_QUANTITY)
        .min(MAX_LINE_QUANTITY)
}
