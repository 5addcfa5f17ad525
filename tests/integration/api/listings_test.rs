//! Listing API integration tests
//!
//! Search, pagination, ownership rules and the role-scoped "my listings"
//! view.

#[cfg(feature = "ssr")]
mod tests {
    use axum::http::StatusCode;
    use merkato::backend::auth::Role;
    use merkato::shared::listing::{ListListingsResponse, ListingResponse};
    use merkato::shared::Currency;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    use crate::common::assertions::assert_api_error;
    use crate::common::{create_admin, register_user, spawn_app, TestApp, TestUser};

    async fn create(app: &TestApp, owner: &TestUser, body: Value) -> ListingResponse {
        let response = app
            .server
            .post("/api/product/products")
            .authorization_bearer(&owner.token)
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json()
    }

    async fn create_titled(app: &TestApp, owner: &TestUser, title: &str, price: &str) -> ListingResponse {
        create(app, owner, json!({ "title": title, "price": price })).await
    }

    async fn my_listings(app: &TestApp, user: &TestUser) -> ListListingsResponse {
        app.server
            .get("/api/product/my-listings")
            .authorization_bearer(&user.token)
            .await
            .json()
    }

    fn titles(page: &ListListingsResponse) -> Vec<&str> {
        page.results.iter().map(|l| l.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;

        let created = create(
            &app,
            &seller,
            json!({"title": "  Leather sofa ", "description": "Three seats", "price": "15000.5"}),
        )
        .await;

        assert_eq!(created.title, "Leather sofa");
        assert_eq!(created.price.to_string(), "15000.50");
        assert_eq!(created.currency, Currency::Etb);
        assert_eq!(created.seller_id, Some(seller.id));
        assert_eq!(created.formatted_price.formatted, "15000.50 ETB");

        let fetched: ListingResponse = app
            .server
            .get(&format!("/api/product/products/{}", created.id))
            .await
            .json();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;

        for body in [
            json!({"title": "", "price": "10"}),
            json!({"title": "Lamp", "price": "-1"}),
            json!({"title": "Lamp", "price": "1.999"}),
            json!({"title": "Lamp", "price": "100000000.00"}),
        ] {
            let response = app
                .server
                .post("/api/product/products")
                .authorization_bearer(&seller.token)
                .json(&body)
                .await;
            assert_api_error(&response, StatusCode::BAD_REQUEST);
        }

        let anonymous = app
            .server
            .post("/api/product/products")
            .json(&json!({"title": "Lamp", "price": "10"}))
            .await;
        assert_api_error(&anonymous, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_filters_and_ordering() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        create_titled(&app, &seller, "Wooden chair", "300").await;
        create_titled(&app, &seller, "Office chair", "2500").await;
        create_titled(&app, &seller, "Dining table", "9000").await;

        let page: ListListingsResponse = app
            .server
            .get("/api/product/products")
            .add_query_param("search", "CHAIR")
            .add_query_param("ordering", "-price")
            .await
            .json();
        assert_eq!(page.count, 2);
        assert_eq!(titles(&page), vec!["Office chair", "Wooden chair"]);

        let page: ListListingsResponse = app
            .server
            .get("/api/product/products")
            .add_query_param("min_price", "1000")
            .add_query_param("max_price", "9000")
            .add_query_param("ordering", "price")
            .await
            .json();
        assert_eq!(titles(&page), vec!["Office chair", "Dining table"]);
    }

    #[tokio::test]
    async fn test_pagination() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        for i in 0..5 {
            create_titled(&app, &seller, &format!("Item {}", i), &format!("{}", 100 + i)).await;
        }

        let page: ListListingsResponse = app
            .server
            .get("/api/product/products")
            .add_query_param("ordering", "price")
            .add_query_param("page", "2")
            .add_query_param("page_size", "2")
            .await
            .json();

        assert_eq!(page.count, 5);
        assert_eq!((page.page, page.page_size), (2, 2));
        assert_eq!(titles(&page), vec!["Item 2", "Item 3"]);

        let bad = app
            .server
            .get("/api/product/products")
            .add_query_param("page", "0")
            .await;
        assert_api_error(&bad, StatusCode::BAD_REQUEST);

        let bad = app
            .server
            .get("/api/product/products")
            .add_query_param("ordering", "rating")
            .await;
        assert_api_error(&bad, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_only_owner_edits() {
        let app = spawn_app();
        let owner = register_user(&app.server, Role::Vendor).await;
        let other = register_user(&app.server, Role::Vendor).await;
        let admin = create_admin(&app).await;
        let listing = create_titled(&app, &owner, "Bicycle", "4000").await;
        let path = format!("/api/product/products/{}", listing.id);

        for intruder in [&other, &admin] {
            let response = app
                .server
                .patch(&path)
                .authorization_bearer(&intruder.token)
                .json(&json!({"price": "1"}))
                .await;
            assert_api_error(&response, StatusCode::FORBIDDEN);
        }

        let updated: ListingResponse = app
            .server
            .patch(&path)
            .authorization_bearer(&owner.token)
            .json(&json!({"price": "3500", "status": "sold"}))
            .await
            .json();
        assert_eq!(updated.price.to_string(), "3500.00");
    }

    #[tokio::test]
    async fn test_owner_or_admin_deletes() {
        let app = spawn_app();
        let owner = register_user(&app.server, Role::Vendor).await;
        let other = register_user(&app.server, Role::Customer).await;
        let admin = create_admin(&app).await;

        let first = create_titled(&app, &owner, "Desk", "800").await;
        let second = create_titled(&app, &owner, "Shelf", "600").await;

        let denied = app
            .server
            .delete(&format!("/api/product/products/{}", first.id))
            .authorization_bearer(&other.token)
            .await;
        assert_api_error(&denied, StatusCode::FORBIDDEN);

        app.server
            .delete(&format!("/api/product/products/{}", first.id))
            .authorization_bearer(&owner.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        app.server
            .delete(&format!("/api/product/products/{}", second.id))
            .authorization_bearer(&admin.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        let gone = app.server.get(&format!("/api/product/products/{}", first.id)).await;
        assert_api_error(&gone, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_my_listings_by_role() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let rival = register_user(&app.server, Role::Vendor).await;
        let customer = register_user(&app.server, Role::Customer).await;
        let admin = create_admin(&app).await;
        create_titled(&app, &seller, "Mine", "10").await;
        create_titled(&app, &rival, "Theirs", "20").await;

        assert_eq!(titles(&my_listings(&app, &seller).await), vec!["Mine"]);
        assert_eq!(my_listings(&app, &admin).await.count, 2);
        assert_eq!(my_listings(&app, &customer).await.count, 0);
    }
}
