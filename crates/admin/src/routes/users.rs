//! Customer account route handlers. Read-only.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use tracing::instrument;

use shoop_core::UserId;
use shoop_db::models::User;
use shoop_db::{OrderRepository, UserRepository};

use super::orders::OrderRowView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::AdminContext;
use crate::state::AppState;

/// Customer for templates.
#[derive(Debug, Clone)]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into_inner(),
            email: user.email.into_inner(),
            name: user.name,
            phone: user.phone,
            address: user.address,
            created_at: user.created_at,
        }
    }
}

/// Customer list template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub ctx: AdminContext,
    pub users: Vec<UserView>,
}

/// Customer detail template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub ctx: AdminContext,
    pub user: UserView,
    pub orders: Vec<OrderRowView>,
}

/// GET /admin/users
#[instrument(skip_all)]
pub async fn index(ctx: AdminContext, State(state): State<AppState>) -> Result<UsersIndexTemplate> {
    let users = UserRepository::new(state.pool()).list().await?;

    Ok(UsersIndexTemplate {
        ctx: ctx.titled("Khách hàng"),
        users: users.into_iter().map(UserView::from).collect(),
    })
}

/// GET /admin/users/{id}
#[instrument(skip(ctx, state))]
pub async fn show(
    ctx: AdminContext,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<UserShowTemplate> {
    let id = UserId::new(id);
    let user = UserRepository::new(state.pool())
        .get_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("user".to_string()))?;
    let orders = OrderRepository::new(state.pool()).list_for_user(&id).await?;

    Ok(UserShowTemplate {
        ctx: ctx.titled("Chi tiết khách hàng"),
        user: UserView::from(user),
        orders: orders.iter().map(OrderRowView::from).collect(),
    })
}
