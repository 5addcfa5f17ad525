//! Favorites API integration tests

#[cfg(feature = "ssr")]
mod tests {
    use axum::http::StatusCode;
    use merkato::backend::auth::Role;
    use merkato::shared::listing::{FavoriteResponse, ListFavoritesResponse, ListingResponse};
    use serde_json::json;
    use uuid::Uuid;

    use crate::common::assertions::assert_api_error;
    use crate::common::{register_user, spawn_app, TestApp, TestUser};

    async fn listing(app: &TestApp, seller: &TestUser, title: &str) -> ListingResponse {
        app.server
            .post("/api/product/products")
            .authorization_bearer(&seller.token)
            .json(&json!({"title": title, "price": "250"}))
            .await
            .json()
    }

    async fn favorite(app: &TestApp, user: &TestUser, listing_id: Uuid) -> axum_test::TestResponse {
        app.server
            .post("/api/product/favorites")
            .authorization_bearer(&user.token)
            .json(&json!({ "listing_id": listing_id }))
            .await
    }

    async fn favorites_of(app: &TestApp, user: &TestUser) -> ListFavoritesResponse {
        app.server
            .get("/api/product/favorites")
            .authorization_bearer(&user.token)
            .await
            .json()
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let lamp = listing(&app, &seller, "Lamp").await;
        let rug = listing(&app, &seller, "Rug").await;

        let added = favorite(&app, &buyer, lamp.id).await;
        added.assert_status(StatusCode::CREATED);
        let added: FavoriteResponse = added.json();
        assert_eq!(added.listing.title, "Lamp");
        favorite(&app, &buyer, rug.id).await.assert_status(StatusCode::CREATED);

        let listed = favorites_of(&app, &buyer).await;
        let ids: Vec<Uuid> = listed.favorites.iter().map(|f| f.listing_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&lamp.id) && ids.contains(&rug.id));

        app.server
            .delete(&format!("/api/product/favorites/{}", lamp.id))
            .authorization_bearer(&buyer.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);
        assert_eq!(favorites_of(&app, &buyer).await.favorites.len(), 1);

        let again = app
            .server
            .delete(&format!("/api/product/favorites/{}", lamp.id))
            .authorization_bearer(&buyer.token)
            .await;
        assert_api_error(&again, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_are_validation_errors() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let lamp = listing(&app, &seller, "Lamp").await;

        favorite(&app, &buyer, lamp.id).await.assert_status(StatusCode::CREATED);
        assert_api_error(&favorite(&app, &buyer, lamp.id).await, StatusCode::BAD_REQUEST);
        assert_api_error(&favorite(&app, &buyer, Uuid::new_v4()).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_deleted_listing_leaves_favorites() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let lamp = listing(&app, &seller, "Lamp").await;
        favorite(&app, &buyer, lamp.id).await.assert_status(StatusCode::CREATED);

        app.server
            .delete(&format!("/api/product/products/{}", lamp.id))
            .authorization_bearer(&seller.token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        assert!(favorites_of(&app, &buyer).await.favorites.is_empty());
    }

    #[tokio::test]
    async fn test_favorites_are_private() {
        let app = spawn_app();
        let seller = register_user(&app.server, Role::Vendor).await;
        let buyer = register_user(&app.server, Role::Customer).await;
        let other = register_user(&app.server, Role::Customer).await;
        let lamp = listing(&app, &seller, "Lamp").await;
        favorite(&app, &buyer, lamp.id).await.assert_status(StatusCode::CREATED);

        assert!(favorites_of(&app, &other).await.favorites.is_empty());
        assert_api_error(&app.server.get("/api/product/favorites").await, StatusCode::UNAUTHORIZED);
    }
}
