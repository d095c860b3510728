//! The session-held shopping cart.
//!
//! The cart is stored in the customer's session as a JSON array of lines.
//! Each line snapshots the product's name, image and effective price at the
//! moment it was added, so later catalog edits do not change what the
//! customer sees or what checkout charges.
//!
//! # Invariants
//!
//! - A product appears in at most one line.
//! - Every line has a quantity of at least one; a decrement that would reach
//!   zero removes the line instead.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub image: String,
    /// Unit price snapshot.
    pub price: Price,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Quantity change requested from the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Increase,
    Decrease,
    Remove,
}

impl FromStr for CartAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            "remove" => Ok(Self::Remove),
            _ => Err(format!("invalid cart action: {s}")),
        }
    }
}

/// A customer's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item, merging into the existing line for the same product.
    ///
    /// A zero quantity is treated as one. When the product is already in
    /// the cart only the quantity changes; the original snapshot is kept.
    pub fn add(&mut self, mut item: CartItem) {
        item.quantity = item.quantity.max(1);

        if let Some(line) = self
            .items
            .iter_mut()
            .find(|line| line.product_id == item.product_id)
        {
            line.quantity = line.quantity.saturating_add(item.quantity);
        } else {
            self.items.push(item);
        }
    }

    /// Apply a quantity change to the line for `product_id`.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn apply(&mut self, product_id: &ProductId, action: CartAction) -> bool {
        let Some(pos) = self
            .items
            .iter()
            .position(|line| &line.product_id == product_id)
        else {
            return false;
        };

        match action {
            CartAction::Increase => {
                if let Some(line) = self.items.get_mut(pos) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            CartAction::Decrease => {
                let remaining = self
                    .items
                    .get(pos)
                    .map_or(0, |line| line.quantity.saturating_sub(1));
                if remaining == 0 {
                    self.items.remove(pos);
                } else if let Some(line) = self.items.get_mut(pos) {
                    line.quantity = remaining;
                }
            }
            CartAction::Remove => {
                self.items.remove(pos);
            }
        }
        true
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
