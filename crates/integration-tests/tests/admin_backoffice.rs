//! Back-office flows against a running server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use shoop_core::{OrderId, OrderStatus};
use shoop_db::{CategoryRepository, Deleted, OrderRepository, ProductRepository};
use shoop_integration_tests::{TestContext, location, new_client};

/// Smallest valid PNG header; the store only checks the extension.
const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[tokio::test]
async fn test_health_endpoint() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.admin("/health")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_pages_require_login() {
    let ctx = TestContext::new().await;

    for path in ["/admin", "/admin/dashboard", "/admin/products", "/admin/seo"] {
        let resp = ctx.client.get(ctx.admin(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), "/admin/login", "{path}");
    }
}

#[tokio::test]
async fn test_bad_password_rerenders_login() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.admin("/admin/login"))
        .form(&[("email", "admin@occ.io.vn"), ("password", "wrong-password")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("không đúng"));

    let resp = ctx.client.get(ctx.admin("/admin/dashboard")).send().await.unwrap();
    assert_eq!(location(&resp), "/admin/login");
}

#[tokio::test]
async fn test_login_and_dashboard() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx.client.get(ctx.admin("/admin")).send().await.unwrap();
    assert_eq!(location(&resp), "/admin/dashboard");

    let resp = ctx.client.get(ctx.admin("/admin/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx.client.get(ctx.admin("/admin/logout")).send().await.unwrap();
    assert!(resp.status().is_redirection());
    let resp = ctx.client.get(ctx.admin("/admin/dashboard")).send().await.unwrap();
    assert_eq!(location(&resp), "/admin/login");
}

#[tokio::test]
async fn test_category_lifecycle() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .client
        .post(ctx.admin("/admin/categories/create"))
        .form(&[
            ("name", "Test Category"),
            ("description", "Created by a test"),
            ("image", ""),
            ("sort_order", "9"),
            ("is_active", "on"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/categories");

    let category = CategoryRepository::new(&ctx.pool)
        .get_by_slug("test-category")
        .await
        .unwrap()
        .expect("category created");
    assert_eq!(category.sort_order, 9);

    let resp = ctx
        .client
        .post(ctx.admin(&format!("/admin/categories/{}/edit", category.id)))
        .form(&[
            ("name", "Test Category Renamed"),
            ("description", ""),
            ("image", ""),
            ("sort_order", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/categories");

    let resp = ctx
        .client
        .post(ctx.admin(&format!("/admin/categories/{}/delete", category.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/categories");

    let repo = CategoryRepository::new(&ctx.pool);
    assert!(repo.get_by_id(&category.id, Deleted::Exclude).await.unwrap().is_none());
    let deleted = repo
        .get_by_id(&category.id, Deleted::Include)
        .await
        .unwrap()
        .expect("row kept");
    assert_eq!(deleted.name, "Test Category Renamed");
    assert!(deleted.deleted_at.is_some());

    let live = ctx.client.get(ctx.admin("/admin/categories")).send().await.unwrap();
    assert!(!live.text().await.unwrap().contains("Test Category Renamed"));

    let all = ctx
        .client
        .get(ctx.admin("/admin/categories?deleted=include"))
        .send()
        .await
        .unwrap();
    assert!(all.text().await.unwrap().contains("Test Category Renamed"));
}

#[tokio::test]
async fn test_product_upload_and_image_delete() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let form = Form::new()
        .text("name", "Test Crystal Ball")
        .text("description", "A test product")
        .text("content", "")
        .text("original_price", "500000")
        .text("sale_price", "450000")
        .text("sku", "TEST-001")
        .text("stock", "3")
        .text("category_id", "")
        .text("is_active", "on")
        .part(
            "images",
            Part::bytes(PNG_BYTES.to_vec())
                .file_name("ball.png")
                .mime_str("image/png")
                .unwrap(),
        );

    let resp = ctx
        .client
        .post(ctx.admin("/admin/products/create"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/products");

    let products = ProductRepository::new(&ctx.pool);
    let product = products
        .get_active_by_slug("test-crystal-ball")
        .await
        .unwrap()
        .expect("product created");
    assert_eq!(product.effective_price().whole_dong(), 450_000);
    assert_eq!(product.images.len(), 1);
    let image = product.images.first().unwrap();
    assert!(image.url.starts_with("/uploads/products/"));
    assert!(image.url.ends_with(".png"));
    assert_eq!(image.alt_text, "ball.png");

    // The stored file is served back.
    let resp = ctx.client.get(ctx.admin(&image.url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let image_path = format!("/admin/images/{}/delete", image.id);

    let resp = new_client().post(ctx.admin(&image_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx.client.post(ctx.admin(&image_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let product = products.get_active_by_slug("test-crystal-ball").await.unwrap().unwrap();
    assert!(product.images.is_empty());

    let resp = ctx.client.post(ctx.admin(&image_path)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_status_update() {
    let ctx = TestContext::new().await;
    ctx.register_customer("status-test@example.vn").await;

    let product = ProductRepository::new(&ctx.pool)
        .get_active_by_slug("tuong-phat-di-lac-ngoc-bich")
        .await
        .unwrap()
        .unwrap();
    ctx.client
        .post(ctx.storefront("/cart/add"))
        .form(&[("product_id", product.id.as_str())])
        .send()
        .await
        .unwrap();
    let body: Value = ctx
        .client
        .post(ctx.storefront("/checkout"))
        .form(&[("name", "A"), ("phone", "0909"), ("address", "HCM")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order_id = OrderId::new(body["order_id"].as_str().unwrap());

    ctx.login_admin().await;
    let status_path = format!("/admin/orders/{order_id}/status");

    let resp = ctx
        .client
        .post(ctx.admin(&status_path))
        .form(&[("status", "shipping")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), format!("/admin/orders/{order_id}"));

    let orders = OrderRepository::new(&ctx.pool);
    let detail = orders.get_detail(&order_id).await.unwrap().unwrap();
    assert_eq!(detail.order.status, OrderStatus::Shipping);

    let resp = ctx
        .client
        .post(ctx.admin(&status_path))
        .form(&[("status", "lost-in-transit")])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/orders");
    let detail = orders.get_detail(&order_id).await.unwrap().unwrap();
    assert_eq!(detail.order.status, OrderStatus::Shipping);

    let resp = ctx
        .client
        .get(ctx.admin(&format!("/admin/orders/{order_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("status-test@example.vn"));
}

#[tokio::test]
async fn test_seo_reaches_storefront() {
    let ctx = TestContext::new().await;
    ctx.login_admin().await;

    let resp = ctx
        .client
        .post(ctx.admin("/admin/seo/home"))
        .form(&[
            ("title", "OCC Home"),
            ("description", "Feng shui gifts delivered nationwide"),
            ("keywords", "feng shui"),
            ("og_image", ""),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(location(&resp), "/admin/seo");

    let html = ctx
        .client
        .get(ctx.storefront("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"<meta name="description" content="Feng shui gifts delivered nationwide">"#));

    let resp = ctx.client.get(ctx.admin("/admin/seo/nowhere")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
