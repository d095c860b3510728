//! Dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tracing::instrument;

use shoop_db::{CategoryRepository, OrderRepository, ProductRepository, UserRepository};

use super::auth::DASHBOARD_PATH;
use super::orders::OrderRowView;
use crate::error::Result;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth};
use crate::state::AppState;

/// Orders shown on the dashboard.
const RECENT_ORDERS: u32 = 5;

/// Dashboard counters.
#[derive(Debug, Clone, Default)]
pub struct DashboardMetrics {
    pub products: i64,
    pub orders: i64,
    pub users: i64,
    pub categories: i64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub ctx: AdminContext,
    pub metrics: DashboardMetrics,
    /// Most recent orders, newest first.
    pub orders: Vec<OrderRowView>,
}

/// GET /admin
pub async fn index(RequireAdminAuth(_admin): RequireAdminAuth) -> Redirect {
    Redirect::to(DASHBOARD_PATH)
}

/// GET /admin/dashboard
#[instrument(skip_all)]
pub async fn dashboard(ctx: AdminContext, State(state): State<AppState>) -> Result<DashboardTemplate> {
    let pool = state.pool();
    let orders = OrderRepository::new(pool);

    let metrics = DashboardMetrics {
        products: ProductRepository::new(pool).count().await?,
        orders: orders.count().await?,
        users: UserRepository::new(pool).count().await?,
        categories: CategoryRepository::new(pool).count().await?,
    };
    let recent = orders
        .recent(RECENT_ORDERS)
        .await?
        .iter()
        .map(OrderRowView::from)
        .collect();

    Ok(DashboardTemplate {
        ctx: ctx.titled("Dashboard"),
        metrics,
        orders: recent,
    })
}
