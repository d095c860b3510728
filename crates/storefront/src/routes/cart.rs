//! Cart and checkout route handlers.
//!
//! The cart lives in the session as JSON (`shoop_core::Cart`). Lines carry
//! a price snapshot taken when the product was first added; checkout
//! charges those snapshots.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use shoop_core::{Cart, CartAction, CartItem, ProductId};
use shoop_db::models::{NewOrder, NewOrderItem};
use shoop_db::{OrderRepository, ProductRepository};

use crate::error::{ApiError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::{RequireAuth, SiteContext, flash_success};
use crate::models::session_keys;
use crate::routes::views::cover_image;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price.display_vnd(),
            quantity: item.quantity,
            line_total: item.line_total().display_vnd(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart.html")]
pub struct CartTemplate {
    pub site: SiteContext,
    pub items: Vec<CartLineView>,
    pub total: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the cart from the session; a missing cart is empty.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn load_cart(session: &Session) -> std::result::Result<Cart, tower_sessions::session::Error> {
    Ok(session
        .get::<Cart>(session_keys::CART)
        .await?
        .unwrap_or_default())
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

// =============================================================================
// Forms and Responses
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    #[serde(default)]
    pub product_id: String,
    /// Missing, unparsable or non-positive values mean one.
    pub quantity: Option<String>,
}

impl AddToCartForm {
    fn quantity(&self) -> u32 {
        self.quantity
            .as_deref()
            .and_then(|q| q.trim().parse::<u32>().ok())
            .filter(|q| *q > 0)
            .unwrap_or(1)
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub action: String,
}

/// Response to cart mutations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub status: &'static str,
    pub cart_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_total: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_total_formatted: Option<String>,
}

/// Shipping contact details, from a JSON body or an urlencoded form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactDetails {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub note: String,
}

impl<S> FromRequest<S> for ContactDetails
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            let Json(details) = Json::<Self>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(details);
        }

        // All fields are optional, so a body that is not a form counts as empty
        Ok(Form::<Self>::from_request(req, state)
            .await
            .map(|Form(details)| details)
            .unwrap_or_default())
    }
}

/// Checkout success response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order_id: String,
    pub redirect: &'static str,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart page.
#[instrument(skip(site, session))]
pub async fn show(site: SiteContext, session: Session) -> Result<CartTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartTemplate {
        site: site.titled("Giỏ hàng"),
        items: cart.items().iter().map(CartLineView::from).collect(),
        total: cart.total().display_vnd(),
    })
}

/// Add a product to the cart.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> std::result::Result<Json<CartResponse>, ApiError> {
    let product = ProductRepository::new(state.pool())
        .get_active_by_id(&ProductId::new(form.product_id.trim()))
        .await?
        .ok_or_else(|| ApiError::NotFound("Sản phẩm không tồn tại".to_string()))?;

    let mut cart = load_cart(&session).await?;
    cart.add(CartItem {
        product_id: product.id.clone(),
        name: product.name.clone(),
        image: cover_image(&product),
        price: product.effective_price(),
        quantity: form.quantity(),
    });
    save_cart(&session, &cart).await?;

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));

    Ok(Json(CartResponse {
        status: "ok",
        cart_count: cart.count(),
        cart_total: None,
        cart_total_formatted: None,
    }))
}

/// Change the quantity of a cart line.
///
/// Unknown products and actions leave the cart unchanged.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> std::result::Result<Json<CartResponse>, ApiError> {
    let mut cart = load_cart(&session).await?;

    if let Ok(action) = form.action.parse::<CartAction>()
        && cart.apply(&ProductId::new(form.product_id.trim()), action)
    {
        save_cart(&session, &cart).await?;
    }

    let total = cart.total();
    Ok(Json(CartResponse {
        status: "ok",
        cart_count: cart.count(),
        cart_total: Some(total.whole_dong()),
        cart_total_formatted: Some(total.display_vnd()),
    }))
}

/// Turn the cart into an order.
///
/// The order header and its items are written in one transaction. The cart
/// is emptied only after the order is committed.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    contact: ContactDetails,
) -> std::result::Result<Json<CheckoutResponse>, ApiError> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Err(ApiError::BadRequest("Giỏ hàng trống".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .create(&NewOrder {
            user_id: user.id.clone(),
            name: contact.name.trim().to_owned(),
            phone: contact.phone.trim().to_owned(),
            address: contact.address.trim().to_owned(),
            note: contact.note.trim().to_owned(),
            items: cart
                .items()
                .iter()
                .map(|item| NewOrderItem {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        })
        .await?;

    cart.clear();
    save_cart(&session, &cart).await?;

    let message = format!("Đặt hàng thành công! Mã đơn: {}", order.code());
    flash_success(&session, message.clone()).await?;

    Ok(Json(CheckoutResponse {
        success: true,
        order_id: order.id.to_string(),
        redirect: "/",
        message,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn add_form(quantity: Option<&str>) -> AddToCartForm {
        AddToCartForm {
            product_id: "p1".to_owned(),
            quantity: quantity.map(str::to_owned),
        }
    }

    #[test]
    fn test_add_quantity_defaults_to_one() {
        assert_eq!(add_form(None).quantity(), 1);
        assert_eq!(add_form(Some("0")).quantity(), 1);
        assert_eq!(add_form(Some("-3")).quantity(), 1);
        assert_eq!(add_form(Some("x")).quantity(), 1);
        assert_eq!(add_form(Some("4")).quantity(), 4);
    }

    #[test]
    fn test_cart_response_shape() {
        let json = serde_json::to_value(CartResponse {
            status: "ok",
            cart_count: 3,
            cart_total: None,
            cart_total_formatted: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "status": "ok", "cartCount": 3 }));
    }
}
