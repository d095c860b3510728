//! Orders and order items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoop_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

/// An order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Sum of item price × quantity when the order was placed.
    pub total_amount: Price,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Short human-facing reference.
    #[must_use]
    pub fn code(&self) -> &str {
        self.id.short()
    }
}

/// An order line with the product name resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    /// Current product name; the product may since have been soft-deleted.
    pub product_name: Option<String>,
    pub quantity: u32,
    /// Unit price snapshot.
    pub price: Price,
}

impl OrderItem {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An order row for list pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order: Order,
    /// Registered customer name, if the account still exists.
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_count: i64,
}

/// An order with its items, for the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub items: Vec<OrderItem>,
}

/// One line of a new order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Price,
}

/// Fields for placing an order.
///
/// The total is not supplied: it is computed from `items` when the order is
/// written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub note: String,
    pub items: Vec<NewOrderItem>,
}

impl NewOrder {
    /// Sum of price × quantity over all items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items
            .iter()
            .map(|item| item.price.times(item.quantity))
            .sum()
    }
}
