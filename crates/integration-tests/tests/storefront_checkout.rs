//! Storefront cart and checkout against a running server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::StatusCode;
use serde_json::Value;
use shoop_core::{OrderId, OrderStatus, Price, ProductId};
use shoop_db::models::ProductInput;
use shoop_db::{OrderRepository, ProductRepository};
use shoop_integration_tests::{TestContext, location};

const BUDDHA_SLUG: &str = "tuong-phat-di-lac-ngoc-bich";
const TY_HUU_SLUG: &str = "tuong-ty-huu-vang";

fn unique_email() -> String {
    format!("khach-{}@example.vn", uuid::Uuid::new_v4().simple())
}

async fn product_id(ctx: &TestContext, slug: &str) -> ProductId {
    ProductRepository::new(&ctx.pool)
        .get_active_by_slug(slug)
        .await
        .unwrap()
        .expect("seeded product")
        .id
}

/// Change a product's prices the way the back-office form does.
async fn reprice(ctx: &TestContext, id: &ProductId, original: i64, sale: i64) {
    let products = ProductRepository::new(&ctx.pool);
    let product = products
        .get_by_id(id, shoop_db::Deleted::Exclude)
        .await
        .unwrap()
        .expect("product exists");
    products
        .update(
            id,
            &ProductInput {
                name: product.name,
                slug: product.slug,
                description: product.description,
                content: product.content,
                original_price: Price::from_dong(original),
                sale_price: Price::from_dong(sale),
                sku: product.sku,
                stock: product.stock,
                category_id: product.category_id,
                is_active: product.is_active,
                is_featured: product.is_featured,
            },
        )
        .await
        .unwrap();
}

async fn add_to_cart(ctx: &TestContext, id: &ProductId, quantity: u32) -> reqwest::Response {
    ctx.client
        .post(ctx.storefront("/cart/add"))
        .form(&[("product_id", id.as_str()), ("quantity", &quantity.to_string())])
        .send()
        .await
        .unwrap()
}

async fn update_cart(ctx: &TestContext, id: &ProductId, action: &str) -> Value {
    ctx.client
        .post(ctx.storefront("/cart/update"))
        .form(&[("product_id", id.as_str()), ("action", action)])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.storefront("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = ctx.client.get(ctx.storefront("/health/ready")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_add_to_cart_requires_login() {
    let ctx = TestContext::new().await;
    let id = product_id(&ctx, BUDDHA_SLUG).await;

    let resp = add_to_cart(&ctx, &id, 1).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "login_required");
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let ctx = TestContext::new().await;
    let email = unique_email();
    ctx.register_customer(&email).await;

    let resp = shoop_integration_tests::new_client()
        .post(ctx.storefront("/register"))
        .form(&[
            ("name", "Tran Thi B"),
            ("email", email.as_str()),
            ("password", "matkhau456"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_decrement_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.register_customer(&unique_email()).await;
    let id = product_id(&ctx, BUDDHA_SLUG).await;

    let resp = add_to_cart(&ctx, &id, 2).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cartCount"], 2);

    let body = update_cart(&ctx, &id, "decrease").await;
    assert_eq!(body["cartCount"], 1);
    assert_eq!(body["cartTotal"], 1_990_000);

    let body = update_cart(&ctx, &id, "decrease").await;
    assert_eq!(body["cartCount"], 0);
    assert_eq!(body["cartTotal"], 0);

    // The line is gone, so a further increase has nothing to act on.
    let body = update_cart(&ctx, &id, "increase").await;
    assert_eq!(body["cartCount"], 0);
}

#[tokio::test]
async fn test_checkout_snapshots_total_and_items() {
    let ctx = TestContext::new().await;
    ctx.register_customer(&unique_email()).await;
    let buddha = product_id(&ctx, BUDDHA_SLUG).await;
    let ty_huu = product_id(&ctx, TY_HUU_SLUG).await;

    add_to_cart(&ctx, &buddha, 2).await;
    add_to_cart(&ctx, &ty_huu, 1).await;

    // Prices change between adding to the cart and checking out.
    reprice(&ctx, &buddha, 3_000_000, 0).await;
    reprice(&ctx, &ty_huu, 3_200_000, 1_000_000).await;

    let resp = ctx
        .client
        .post(ctx.storefront("/checkout"))
        .form(&[
            ("name", "Nguyen Van A"),
            ("phone", "0909000000"),
            ("address", "1 Le Loi, Q1"),
            ("note", "Giao buoi sang"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["redirect"], "/");
    let order_id = OrderId::new(body["order_id"].as_str().unwrap());

    let detail = OrderRepository::new(&ctx.pool)
        .get_detail(&order_id)
        .await
        .unwrap()
        .expect("order was written");
    assert_eq!(detail.order.status, OrderStatus::Pending);
    assert_eq!(detail.order.total_amount, Price::from_dong(6_670_000));
    assert_eq!(detail.order.note, "Giao buoi sang");
    assert_eq!(detail.items.len(), 2);
    for item in &detail.items {
        let added_at = if item.product_id == buddha { 1_990_000 } else { 2_690_000 };
        assert_eq!(item.price, Price::from_dong(added_at));
    }
    let line_sum = detail
        .items
        .iter()
        .map(|item| item.line_total().whole_dong())
        .sum::<i64>();
    assert_eq!(line_sum, 6_670_000);

    // Cart is empty afterwards.
    let body = update_cart(&ctx, &buddha, "increase").await;
    assert_eq!(body["cartCount"], 0);
}

#[tokio::test]
async fn test_checkout_with_empty_cart() {
    let ctx = TestContext::new().await;
    ctx.register_customer(&unique_email()).await;

    let resp = ctx
        .client
        .post(ctx.storefront("/checkout"))
        .form(&[("name", "A"), ("phone", "1"), ("address", "x")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(OrderRepository::new(&ctx.pool).count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_soft_deleted_product_is_hidden() {
    let ctx = TestContext::new().await;
    ctx.register_customer(&unique_email()).await;
    let id = product_id(&ctx, TY_HUU_SLUG).await;

    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/products/{TY_HUU_SLUG}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    ProductRepository::new(&ctx.pool).soft_delete(&id).await.unwrap();

    let resp = ctx
        .client
        .get(ctx.storefront(&format!("/products/{TY_HUU_SLUG}")))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), "/products");

    let resp = add_to_cart(&ctx, &id, 1).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
