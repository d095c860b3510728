//! Order repository.
//!
//! An order and its items are written in a single transaction, so a failed
//! checkout never leaves an order header without lines.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use shoop_core::{OrderId, OrderItemId, OrderStatus, Price, ProductId, UserId};

use crate::RepositoryError;
use crate::models::{NewOrder, Order, OrderDetail, OrderItem, OrderSummary};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    user_id: String,
    status: String,
    total_amount: String,
    name: String,
    phone: String,
    address: String,
    note: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(|e| RepositoryError::DataCorruption(format!("{e}")))?;
        let total_amount = Price::parse(&row.total_amount).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order total in database: {e}"))
        })?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status,
            total_amount,
            name: row.name,
            phone: row.phone,
            address: row.address,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    #[sqlx(flatten)]
    order: OrderRow,
    customer_name: Option<String>,
    customer_email: Option<String>,
    item_count: i64,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            order: row.order.try_into()?,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            item_count: row.item_count,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: String,
    order_id: String,
    product_id: String,
    product_name: Option<String>,
    quantity: i64,
    price: String,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("invalid quantity in database: {}", row.quantity))
        })?;
        let price = Price::parse(&row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid item price in database: {e}"))
        })?;

        Ok(Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity,
            price,
        })
    }
}

const SELECT_SUMMARY: &str = "
    SELECT o.id, o.user_id, o.status, o.total_amount, o.name, o.phone, o.address, o.note,
           o.created_at, o.updated_at,
           u.name AS customer_name, u.email AS customer_email,
           (SELECT COUNT(*) FROM order_items i
             WHERE i.order_id = o.id AND i.deleted_at IS NULL) AS item_count
    FROM orders o
    LEFT JOIN users u ON u.id = o.user_id AND u.deleted_at IS NULL";

const NEWEST_FIRST: &str = "ORDER BY o.created_at DESC, o.rowid DESC";

// =============================================================================
// Repository
// =============================================================================

/// Repository for orders and order items.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Place an order.
    ///
    /// The header and every item are inserted in one transaction. The total
    /// is the sum of item price × quantity; status starts as pending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails, in which
    /// case nothing is written.
    #[instrument(skip(self, new), fields(user_id = %new.user_id, items = new.items.len()))]
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let now = Utc::now();
        let order = Order {
            id: OrderId::generate(),
            user_id: new.user_id.clone(),
            status: OrderStatus::Pending,
            total_amount: new.total(),
            name: new.name.clone(),
            phone: new.phone.clone(),
            address: new.address.clone(),
            note: new.note.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO orders
                (id, user_id, status, total_amount, name, phone, address, note,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(order.id.as_str())
        .bind(order.user_id.as_str())
        .bind(order.status.as_str())
        .bind(order.total_amount.amount().to_string())
        .bind(&order.name)
        .bind(&order.phone)
        .bind(&order.address)
        .bind(&order.note)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for item in &new.items {
            sqlx::query(
                "INSERT INTO order_items
                    (id, order_id, product_id, quantity, price, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(OrderItemId::generate().as_str())
            .bind(order.id.as_str())
            .bind(item.product_id.as_str())
            .bind(i64::from(item.quantity))
            .bind(item.price.amount().to_string())
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(order_id = %order.id, total = %order.total_amount.amount(), "Order placed");
        Ok(order)
    }

    /// List orders newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(&format!(
            "{SELECT_SUMMARY}
             WHERE o.deleted_at IS NULL AND (?1 IS NULL OR o.status = ?1)
             {NEWEST_FIRST}"
        ))
        .bind(status.as_ref().map(OrderStatus::as_str))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// The most recent orders, for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn recent(&self, limit: u32) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(&format!(
            "{SELECT_SUMMARY} WHERE o.deleted_at IS NULL {NEWEST_FIRST} LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(&format!(
            "{SELECT_SUMMARY} WHERE o.deleted_at IS NULL AND o.user_id = ? {NEWEST_FIRST}"
        ))
        .bind(user_id.as_str())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Get an order with its items.
    ///
    /// Item product names are resolved even for soft-deleted products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_detail(&self, id: &OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, OrderSummaryRow>(&format!(
            "{SELECT_SUMMARY} WHERE o.id = ? AND o.deleted_at IS NULL"
        ))
        .bind(id.as_str())
        .fetch_optional(self.pool)
        .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT i.id, i.order_id, i.product_id, p.name AS product_name, i.quantity, i.price
             FROM order_items i
             LEFT JOIN products p ON p.id = i.product_id
             WHERE i.order_id = ? AND i.deleted_at IS NULL
             ORDER BY i.rowid ASC",
        )
        .bind(id.as_str())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(TryInto::try_into)
        .collect::<Result<Vec<OrderItem>, _>>()?;

        let summary = OrderSummary::try_from(row)?;
        Ok(Some(OrderDetail {
            order: summary.order,
            customer_name: summary.customer_name,
            customer_email: summary.customer_email,
            items,
        }))
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(id = %id, status = %status))]
    pub async fn update_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count live orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE deleted_at IS NULL")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{NewOrderItem, NewUser, ProductInput};
    use crate::pool::in_memory;
    use crate::{ProductRepository, UserRepository};
    use shoop_core::{Cart, CartItem, Email};

    async fn customer(pool: &SqlitePool) -> UserId {
        UserRepository::new(pool)
            .create(&NewUser {
                email: Email::parse("khach@occ.io.vn").unwrap(),
                password_hash: "$argon2id$stub".to_owned(),
                name: "Khách".to_owned(),
                phone: String::new(),
                address: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    async fn product(pool: &SqlitePool, name: &str, price: i64) -> ProductId {
        ProductRepository::new(pool)
            .create(&ProductInput {
                name: name.to_owned(),
                slug: shoop_core::slugify(name),
                original_price: Price::from_dong(price),
                is_active: true,
                ..ProductInput::default()
            })
            .await
            .unwrap()
            .id
    }

    fn order_for(user_id: UserId, items: Vec<NewOrderItem>) -> NewOrder {
        NewOrder {
            user_id,
            name: "Nguyễn Văn A".to_owned(),
            phone: "0901234567".to_owned(),
            address: "Hà Nội".to_owned(),
            note: String::new(),
            items,
        }
    }

    #[tokio::test]
    async fn test_order_total_matches_cart_total() {
        let pool = in_memory().await.unwrap();
        let user = customer(&pool).await;
        let a = product(&pool, "Tuong", 1_990_000).await;
        let b = product(&pool, "Vong", 150_000).await;

        let mut cart = Cart::new();
        for (id, price) in [(&a, 1_990_000), (&a, 1_990_000), (&b, 150_000)] {
            cart.add(CartItem {
                product_id: id.clone(),
                name: String::new(),
                image: String::new(),
                price: Price::from_dong(price),
                quantity: 1,
            });
        }

        let items = cart
            .items()
            .iter()
            .map(|line| NewOrderItem {
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                price: line.price,
            })
            .collect();
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&order_for(user, items)).await.unwrap();

        assert_eq!(order.total_amount, cart.total());
        assert_eq!(order.total_amount, Price::from_dong(4_130_000));
        assert_eq!(order.status, OrderStatus::Pending);

        let detail = repo.get_detail(&order.id).await.unwrap().unwrap();
        assert_eq!(detail.order.total_amount, cart.total());
        assert_eq!(detail.items.len(), 2);
        let line = detail.items.first().unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.product_name.as_deref(), Some("Tuong"));
        assert_eq!(detail.customer_name.as_deref(), Some("Khách"));
    }

    #[tokio::test]
    async fn test_total_is_a_snapshot() {
        let pool = in_memory().await.unwrap();
        let user = customer(&pool).await;
        let a = product(&pool, "Tuong", 1000).await;

        let repo = OrderRepository::new(&pool);
        let order = repo
            .create(&order_for(
                user,
                vec![NewOrderItem {
                    product_id: a.clone(),
                    quantity: 3,
                    price: Price::from_dong(1000),
                }],
            ))
            .await
            .unwrap();

        sqlx::query("UPDATE products SET original_price = '9999' WHERE id = ?")
            .bind(a.as_str())
            .execute(&pool)
            .await
            .unwrap();

        let detail = repo.get_detail(&order.id).await.unwrap().unwrap();
        assert_eq!(detail.order.total_amount, Price::from_dong(3000));
        assert_eq!(detail.items.first().unwrap().line_total(), Price::from_dong(3000));
    }

    #[tokio::test]
    async fn test_failed_item_rolls_back_order() {
        let pool = in_memory().await.unwrap();
        let user = customer(&pool).await;
        let a = product(&pool, "Tuong", 1000).await;

        let repo = OrderRepository::new(&pool);
        let result = repo
            .create(&order_for(
                user,
                vec![
                    NewOrderItem {
                        product_id: a,
                        quantity: 1,
                        price: Price::from_dong(1000),
                    },
                    NewOrderItem {
                        product_id: ProductId::new("missing"),
                        quantity: 1,
                        price: Price::from_dong(1000),
                    },
                ],
            ))
            .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
    }

    #[tokio::test]
    async fn test_status_filter_and_update() {
        let pool = in_memory().await.unwrap();
        let user = customer(&pool).await;
        let a = product(&pool, "Tuong", 1000).await;
        let line = || {
            vec![NewOrderItem {
                product_id: a.clone(),
                quantity: 1,
                price: Price::from_dong(1000),
            }]
        };

        let repo = OrderRepository::new(&pool);
        let first = repo.create(&order_for(user.clone(), line())).await.unwrap();
        let second = repo.create(&order_for(user.clone(), line())).await.unwrap();

        repo.update_status(&first.id, OrderStatus::Shipping)
            .await
            .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().unwrap().order.id, second.id);
        assert_eq!(all.first().unwrap().item_count, 1);

        let shipping = repo.list(Some(OrderStatus::Shipping)).await.unwrap();
        assert_eq!(shipping.len(), 1);
        assert_eq!(shipping.first().unwrap().order.id, first.id);

        assert_eq!(repo.recent(1).await.unwrap().len(), 1);
        assert_eq!(repo.list_for_user(&user).await.unwrap().len(), 2);

        assert!(matches!(
            repo.update_status(&OrderId::new("missing"), OrderStatus::Cancelled)
                .await,
            Err(RepositoryError::NotFound)
        ));
    }
}
