/**
 * API Routes
 *
 * ## Users
 * - `POST /api/user/register`
 * - `POST /api/user/login`
 * - `GET /api/user/me`
 *
 * ## Products
 * - `GET, POST /api/product/products`
 * - `GET, PATCH, DELETE /api/product/products/{id}`
 * - `GET /api/product/my-listings`
 * - `GET, POST /api/product/favorites`
 * - `DELETE /api/product/favorites/{listing_id}`
 *
 * ## Cart
 * - `GET, POST /api/cart`
 * - `DELETE /api/cart/{listing_id}`
 *
 * ## Chat
 * - `GET, POST /api/chat/conversations`
 * - `GET /api/chat/conversations/{conversation_id}/messages`
 * - `POST /api/chat/messages`
 * - `PATCH /api/chat/messages/{message_id}/read`
 *
 * Whether a route needs a user is decided by its handler taking `AuthUser`.
 */

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::backend::auth::{get_me, login, register};
use crate::backend::cart;
use crate::backend::listings::{favorites, handlers as products};
use crate::backend::messaging::handlers as chat;
use crate::backend::server::state::AppState;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .merge(user_routes())
        .merge(product_routes())
        .merge(cart_routes())
        .merge(chat_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/user/register", post(register))
        .route("/api/user/login", post(login))
        .route("/api/user/me", get(get_me))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/product/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/product/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/product/my-listings", get(products::my_listings))
        .route(
            "/api/product/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route(
            "/api/product/favorites/{listing_id}",
            delete(favorites::remove_favorite),
        )
}

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart", get(cart::view_cart).post(cart::add_to_cart))
        .route("/api/cart/{listing_id}", delete(cart::remove_from_cart))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/chat/conversations",
            get(chat::list_conversations).post(chat::start_conversation),
        )
        .route(
            "/api/chat/conversations/{conversation_id}/messages",
            get(chat::list_messages),
        )
        .route("/api/chat/messages", post(chat::send_message))
        .route(
            "/api/chat/messages/{message_id}/read",
            patch(chat::mark_message_read),
        )
}
