//! Cart API integration tests
//!
//! Merged quantities, line and cart totals, and removal.

#[cfg(feature = "ssr")]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestResponse;
    use merkato::backend::auth::Role;
    use merkato::shared::cart::{CartItemResponse, CartResponse, MAX_LINE_QUANTITY};
    use merkato::shared::listing::ListingResponse;
    use merkato::shared::Currency;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    use crate::common::assertions::assert_api_error;
    use crate::common::{mock_rates, register_user, spawn_app, spawn_app_with_rates, TestApp, TestUser};

    async fn listing(app: &TestApp, seller: &TestUser, title: &str, price: &str) -> ListingResponse {
        app.server
            .post("/api/product/products")
            .authorization_bearer(&seller.token)
            .json(&json!({"title": title, "price": price}))
            .await
            .json()
    }

    async fn add(app: &TestApp, user: &TestUser, listing_id: Uuid, quantity: u32) -> TestResponse {
        app.server
            .post("/api/cart")
            .authorization_bearer(&user.token)
            .json(&json!({"listing_id": listing_id, "quantity": quantity}))
            .await
    }

    async fn cart_of(app: &TestApp, user: &TestUser) -> CartResponse {
        let response = app.server.get("/api/cart").authorization_bearer(&user.token).await;
        response.assert_status_ok();
        response.json()
    }

    #[tokio::test]
    async fn test_adding_twice_merges_quantity() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;

        let first = add(&app, &buyer, mug.id, 2).await;
        first.assert_status(StatusCode::CREATED);
        let second: CartItemResponse = add(&app, &buyer, mug.id, 3).await.json();
        assert_eq!(second.quantity, 5);
        assert_eq!(second.total_price.to_string(), "750.00");

        let cart = cart_of(&app, &buyer).await;
        assert_eq!(cart.cart_items.len(), 1);
        assert_eq!(cart.cart_items[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_cart_total_sums_lines() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;
        let kettle = listing(&app, &seller, "Kettle", "899.99").await;

        add(&app, &buyer, mug.id, 2).await.assert_status(StatusCode::CREATED);
        let response = app
            .server
            .post("/api/cart")
            .authorization_bearer(&buyer.token)
            .json(&json!({"listing_id": kettle.id}))
            .await;
        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<CartItemResponse>().quantity, 1);

        let cart = cart_of(&app, &buyer).await;
        let titles: Vec<&str> = cart.cart_items.iter().map(|i| i.listing.title.as_str()).collect();
        assert_eq!(titles, vec!["Mug", "Kettle"]);
        assert_eq!(cart.total_price.to_string(), "1199.99");
        assert_eq!(cart.currency, Currency::Etb);
    }

    #[tokio::test]
    async fn test_cart_priced_in_display_currency() {
        let rates = mock_rates(&[("USD", 0.02)], 1).await;
        let app = spawn_app_with_rates(&rates);
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;
        add(&app, &buyer, mug.id, 3).await.assert_status(StatusCode::CREATED);

        let cart: CartResponse = app
            .server
            .get("/api/cart")
            .authorization_bearer(&buyer.token)
            .add_query_param("currency", "USD")
            .await
            .json();

        assert_eq!(cart.currency, Currency::Usd);
        assert_eq!(cart.cart_items[0].listing.converted_price.amount.to_string(), "3.00");
        assert_eq!(cart.total_price.to_string(), "9.00");
    }

    #[tokio::test]
    async fn test_add_validation() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;

        assert_api_error(&add(&app, &buyer, Uuid::new_v4(), 1).await, StatusCode::NOT_FOUND);
        assert_api_error(&add(&app, &buyer, mug.id, 0).await, StatusCode::BAD_REQUEST);

        add(&app, &buyer, mug.id, MAX_LINE_QUANTITY).await.assert_status(StatusCode::CREATED);
        assert_api_error(&add(&app, &buyer, mug.id, 1).await, StatusCode::BAD_REQUEST);
        assert_eq!(cart_of(&app, &buyer).await.cart_items[0].quantity, MAX_LINE_QUANTITY);
    }

    #[tokio::test]
    async fn test_remove_line() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;
        add(&app, &buyer, mug.id, 1).await.assert_status(StatusCode::CREATED);

        let path = format!("/api/cart/{}", mug.id);
        app.server
            .delete(&path)
            .authorization_bearer(&buyer.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert!(cart_of(&app, &buyer).await.cart_items.is_empty());

        let again = app.server.delete(&path).authorization_bearer(&buyer.token).await;
        assert_api_error(&again, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_carts_are_private_and_need_a_user() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let other = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;
        add(&app, &buyer, mug.id, 1).await.assert_status(StatusCode::CREATED);

        let cart = cart_of(&app, &other).await;
        assert!(cart.cart_items.is_empty());
        assert_eq!(cart.total_price, rust_decimal::Decimal::ZERO);

        assert_api_error(&app.server.get("/api/cart").await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_deleted_listing_leaves_cart() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let mug = listing(&app, &seller, "Mug", "150.00").await;
        add(&app, &buyer, mug.id, 2).await.assert_status(StatusCode::CREATED);

        app.server
            .delete(&format!("/api/product/products/{}", mug.id))
            .authorization_bearer(&seller.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let cart = cart_of(&app, &buyer).await;
        assert!(cart.cart_items.is_empty());
        assert_eq!(cart.total_price, rust_decimal::Decimal::ZERO);
    }
}
