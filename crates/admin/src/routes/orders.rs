//! Order route handlers.
//!
//! Orders are created by the storefront checkout; the back-office only
//! reads them and moves them between statuses.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::{OrderId, OrderStatus};
use shoop_db::models::{OrderDetail, OrderItem, OrderSummary};
use shoop_db::{OrderRepository, RepositoryError};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, flash_success};
use crate::state::AppState;

/// Shown for line items whose product row is gone.
const MISSING_PRODUCT: &str = "Sản phẩm đã xóa";

/// One row in an order table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub id: String,
    pub code: String,
    pub customer: String,
    pub phone: String,
    pub item_count: i64,
    pub total: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderSummary> for OrderRowView {
    fn from(summary: &OrderSummary) -> Self {
        let order = &summary.order;
        Self {
            id: order.id.to_string(),
            code: order.code().to_owned(),
            customer: customer_label(
                &order.name,
                summary.customer_name.as_deref(),
                summary.customer_email.as_deref(),
            ),
            phone: order.phone.clone(),
            item_count: summary.item_count,
            total: order.total_amount.display_vnd(),
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Shipping name first, then the account's name, then its email.
fn customer_label(shipping_name: &str, name: Option<&str>, email: Option<&str>) -> String {
    [Some(shipping_name), name, email]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("-")
        .to_owned()
}

/// A line item on the order detail page.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub product_name: String,
    pub quantity: u32,
    pub price: String,
    pub line_total: String,
}

impl From<&OrderItem> for OrderItemView {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_name: item
                .product_name
                .clone()
                .unwrap_or_else(|| MISSING_PRODUCT.to_owned()),
            quantity: item.quantity,
            price: item.price.display_vnd(),
            line_total: item.line_total().display_vnd(),
        }
    }
}

/// An entry in the status filter or the status select.
#[derive(Debug, Clone)]
pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

fn status_options(selected: Option<OrderStatus>) -> Vec<StatusOption> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            label: status.label(),
            selected: selected == Some(status),
        })
        .collect()
}

/// Order list query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<String>,
}

impl OrderFilter {
    /// The requested status; blank or unknown values mean "all".
    fn status(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(|s| s.trim().parse().ok())
    }
}

/// Orders list template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub ctx: AdminContext,
    pub orders: Vec<OrderRowView>,
    pub statuses: Vec<StatusOption>,
    pub filtered: bool,
}

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub ctx: AdminContext,
    pub order: OrderRowView,
    pub customer_email: String,
    pub address: String,
    pub note: String,
    pub items: Vec<OrderItemView>,
    pub statuses: Vec<StatusOption>,
}

impl OrderShowTemplate {
    fn new(ctx: AdminContext, detail: &OrderDetail) -> Self {
        let order = &detail.order;
        Self {
            ctx,
            order: OrderRowView {
                id: order.id.to_string(),
                code: order.code().to_owned(),
                customer: customer_label(
                    &order.name,
                    detail.customer_name.as_deref(),
                    detail.customer_email.as_deref(),
                ),
                phone: order.phone.clone(),
                item_count: i64::try_from(detail.items.len()).unwrap_or(i64::MAX),
                total: order.total_amount.display_vnd(),
                status: order.status,
                created_at: order.created_at,
            },
            customer_email: detail.customer_email.clone().unwrap_or_default(),
            address: order.address.clone(),
            note: order.note.clone(),
            items: detail.items.iter().map(OrderItemView::from).collect(),
            statuses: status_options(Some(order.status)),
        }
    }
}

/// Status update form.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// GET /admin/orders
#[instrument(skip_all)]
pub async fn index(
    ctx: AdminContext,
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<OrdersIndexTemplate> {
    let status = filter.status();
    let orders = OrderRepository::new(state.pool()).list(status).await?;

    Ok(OrdersIndexTemplate {
        ctx: ctx.titled("Đơn hàng"),
        orders: orders.iter().map(OrderRowView::from).collect(),
        statuses: status_options(status),
        filtered: status.is_some(),
    })
}

/// GET /admin/orders/{id}
#[instrument(skip(ctx, state))]
pub async fn show(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<OrderShowTemplate> {
    let detail = OrderRepository::new(state.pool())
        .get_detail(&OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("order".to_string()))?;

    Ok(OrderShowTemplate::new(ctx.titled("Chi tiết đơn hàng"), &detail))
}

/// POST /admin/orders/{id}/status
///
/// An unknown status leaves the order untouched and returns to the list.
#[instrument(skip_all, fields(order_id = %id))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let Ok(status) = form.status.trim().parse::<OrderStatus>() else {
        tracing::warn!(status = %form.status, "ignoring unknown order status");
        return Ok(Redirect::to("/admin/orders"));
    };

    let id = OrderId::new(id);
    match OrderRepository::new(state.pool())
        .update_status(&id, status)
        .await
    {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound("order".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(order_id = %id, status = %status, admin = %admin.email, "order status updated");
    flash_success(&session, "Đã cập nhật trạng thái đơn hàng").await?;
    Ok(Redirect::to(&format!("/admin/orders/{id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_customer_label_fallbacks() {
        assert_eq!(customer_label("Nguyễn Văn A", Some("Khách"), None), "Nguyễn Văn A");
        assert_eq!(customer_label("  ", Some("Khách"), Some("k@occ.io.vn")), "Khách");
        assert_eq!(customer_label("", None, Some("k@occ.io.vn")), "k@occ.io.vn");
        assert_eq!(customer_label("", None, None), "-");
    }

    #[test]
    fn test_filter_ignores_unknown_status() {
        let filter = |s: &str| OrderFilter {
            status: Some(s.to_owned()),
        };
        assert_eq!(filter("shipping").status(), Some(OrderStatus::Shipping));
        assert_eq!(filter("").status(), None);
        assert_eq!(filter("lost").status(), None);
        assert_eq!(OrderFilter::default().status(), None);
    }

    #[test]
    fn test_status_options_mark_selection() {
        let options = status_options(Some(OrderStatus::Delivered));
        assert_eq!(options.len(), OrderStatus::ALL.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).map(|o| o.value).collect();
        assert_eq!(selected, ["delivered"]);
    }
}
