//! Integration tests for browsing and the session cart.

use aquacafe_integration_tests::TestContext;
use axum::http::StatusCode;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_cart_worked_scenario() {
    let ctx = TestContext::start().await;
    assert_eq!(ctx.cart_count().await, 0);

    // Anubias Nana (Rs. 120) once.
    let (status, drawer) = ctx.post_form("/cart/add", &[("product_id", "1")]).await;
    assert_eq!(status, StatusCode::OK);
    assert!(drawer.contains("Your Basket"));
    assert!(drawer.contains("Rs. 120.00"));
    assert_eq!(ctx.cart_count().await, 1);

    // Again: one line, quantity 2.
    let (_, drawer) = ctx.post_form("/cart/add", &[("product_id", "1")]).await;
    assert!(drawer.contains("Rs. 240.00"));
    assert_eq!(ctx.cart_count().await, 2);

    // Java Fern (Rs. 50).
    let (_, drawer) = ctx.post_form("/cart/add", &[("product_id", "2")]).await;
    assert!(drawer.contains("Rs. 290.00"));
    assert_eq!(ctx.cart_count().await, 3);

    // Anubias Nana down to one.
    let (_, drawer) = ctx
        .post_form("/cart/update", &[("product_id", "1"), ("delta", "-1")])
        .await;
    assert!(drawer.contains("Rs. 170.00"));
    assert_eq!(ctx.cart_count().await, 2);

    // Drop the fern.
    let (_, drawer) = ctx.post_form("/cart/remove", &[("product_id", "2")]).await;
    assert!(drawer.contains("Rs. 120.00"));
    assert!(!drawer.contains("Java Fern"));
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_quantity_never_drops_below_one() {
    let ctx = TestContext::start().await;
    ctx.post_form("/cart/add", &[("product_id", "3")]).await;

    let (status, _) = ctx
        .post_form("/cart/update", &[("product_id", "3"), ("delta", "-5")])
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_unknown_ids() {
    let ctx = TestContext::start().await;

    let (status, _) = ctx.post_form("/cart/add", &[("product_id", "999")]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.post_form("/cart/add", &[("product_id", "4")]).await;
    let (status, _) = ctx
        .post_form("/cart/update", &[("product_id", "999"), ("delta", "1")])
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = ctx.post_form("/cart/remove", &[("product_id", "999")]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_carts_are_isolated_per_session() {
    let ctx = TestContext::start().await;
    ctx.post_form("/cart/add", &[("product_id", "1")]).await;
    ctx.post_form("/cart/add", &[("product_id", "5")]).await;
    assert_eq!(ctx.cart_count().await, 2);

    let other = TestContext {
        client: aquacafe_integration_tests::new_client(),
        base_url: ctx.base_url.clone(),
    };
    assert_eq!(other.cart_count().await, 0);
    let (_, page) = other.get("/cart").await;
    assert!(page.contains("Your garden is empty."));
}

#[tokio::test]
async fn test_cart_page_lists_lines() {
    let ctx = TestContext::start().await;
    ctx.post_form("/cart/add", &[("product_id", "6")]).await;

    let (status, page) = ctx.get("/cart").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Silver Pothos"));
    assert!(page.contains("Subtotal"));
    assert!(page.contains("Rs. 40.00"));
}

#[tokio::test]
async fn test_category_filter_is_remembered() {
    let ctx = TestContext::start().await;

    let (status, page) = ctx.get("/shop?category=Crypt").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Cryptocoryne Wendtii Brown"));
    assert!(!page.contains("Java Fern"));

    // Switching views and coming back keeps the selection.
    ctx.get("/about").await;
    let (_, page) = ctx.get("/shop").await;
    assert!(page.contains("Cryptocoryne Wendtii Brown"));
    assert!(!page.contains("Java Fern"));

    let (_, page) = ctx.get("/shop?category=All").await;
    assert!(page.contains("Java Fern"));
    assert!(page.contains("Silver Pothos"));
}

#[tokio::test]
async fn test_unknown_category_is_rejected() {
    let ctx = TestContext::start().await;
    let (status, body) = ctx.get("/shop?category=Cactus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Cactus"));
}

#[tokio::test]
async fn test_filtering_leaves_cart_alone() {
    let ctx = TestContext::start().await;
    ctx.post_form("/cart/add", &[("product_id", "2")]).await;
    ctx.get("/shop?category=Decorative").await;
    assert_eq!(ctx.cart_count().await, 1);
}

#[tokio::test]
async fn test_product_card_carousel_wraps() {
    let ctx = TestContext::start().await;

    let (status, card) = ctx.get("/products/2/card?image=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(card.contains("/products/2/card?image=0"));
    assert!(card.contains("view 2"));

    // Out-of-range index clamps to the last image.
    let (status, card) = ctx.get("/products/2/card?image=9").await;
    assert_eq!(status, StatusCode::OK);
    assert!(card.contains("view 2"));

    let (status, _) = ctx.get("/products/nope/card").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
