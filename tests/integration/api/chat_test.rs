//! Chat API integration tests
//!
//! Conversations between registered users, message ordering, the derived
//! receiver, read state and who is allowed to see what.

#[cfg(feature = "ssr")]
mod tests {
    use axum::http::StatusCode;
    use merkato::backend::auth::Role;
    use merkato::shared::messaging::{
        Conversation, ListConversationsResponse, ListMessagesResponse, MessageView,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use uuid::Uuid;

    use crate::common::assertions::assert_api_error;
    use crate::common::{register_user, spawn_app, TestApp, TestUser};

    async fn open(app: &TestApp, from: &TestUser, to: Uuid) -> axum_test::TestResponse {
        app.server
            .post("/api/chat/conversations")
            .authorization_bearer(&from.token)
            .json(&json!({ "receiver_id": to }))
            .await
    }

    async fn send(app: &TestApp, from: &TestUser, conversation: Uuid, content: &str) -> axum_test::TestResponse {
        app.server
            .post("/api/chat/messages")
            .authorization_bearer(&from.token)
            .json(&json!({ "conversation_id": conversation, "content": content }))
            .await
    }

    #[tokio::test]
    async fn test_conversation_is_shared_by_both_directions() {
        let app = spawn_app();
        let buyer = register_user(&app.server, Role::Customer).await;
        let seller = register_user(&app.server, Role::Vendor).await;

        let first: Conversation = open(&app, &buyer, seller.id).await.json();
        let second: Conversation = open(&app, &seller, buyer.id).await.json();

        assert_eq!(first.id, second.id);
        assert_eq!(first.sender_id, buyer.id);
        assert_eq!(first.receiver_id, seller.id);

        let listed: ListConversationsResponse = app
            .server
            .get("/api/chat/conversations")
            .authorization_bearer(&seller.token)
            .await
            .json();
        assert_eq!(listed.conversations.len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_talk_to_yourself_or_strangers() {
        let app = spawn_app();
        let user = register_user(&app.server, Role::Customer).await;

        assert_api_error(&open(&app, &user, user.id).await, StatusCode::BAD_REQUEST);
        assert_api_error(&open(&app, &user, Uuid::new_v4()).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_messages_flow() {
        let app = spawn_app();
        let buyer = register_user(&app.server, Role::Customer).await;
        let seller = register_user(&app.server, Role::Vendor).await;
        let conversation: Conversation = open(&app, &buyer, seller.id).await.json();

        let question = send(&app, &buyer, conversation.id, "Is the sofa still available?").await;
        question.assert_status(StatusCode::CREATED);
        let question: MessageView = question.json();
        assert_eq!(question.receiver_id, seller.id);
        assert!(!question.is_read);

        let answer: MessageView = send(&app, &seller, conversation.id, "Yes, come by tomorrow").await.json();
        assert_eq!(answer.receiver_id, buyer.id);

        let listed: ListMessagesResponse = app
            .server
            .get(&format!("/api/chat/conversations/{}/messages", conversation.id))
            .authorization_bearer(&buyer.token)
            .await
            .json();
        let contents: Vec<&str> = listed.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["Is the sofa still available?", "Yes, come by tomorrow"]);

        let read_path = format!("/api/chat/messages/{}/read", question.id);
        for _ in 0..2 {
            let read: MessageView = app
                .server
                .patch(&read_path)
                .authorization_bearer(&seller.token)
                .await
                .json();
            assert!(read.is_read);
            assert_eq!(read.receiver_id, seller.id);
        }
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let app = spawn_app();
        let buyer = register_user(&app.server, Role::Customer).await;
        let seller = register_user(&app.server, Role::Vendor).await;
        let conversation: Conversation = open(&app, &buyer, seller.id).await.json();

        assert_api_error(&send(&app, &buyer, conversation.id, "   ").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_outsiders_are_kept_out() {
        let app = spawn_app();
        let buyer = register_user(&app.server, Role::Customer).await;
        let seller = register_user(&app.server, Role::Vendor).await;
        let outsider = register_user(&app.server, Role::Customer).await;
        let conversation: Conversation = open(&app, &buyer, seller.id).await.json();
        let message: MessageView = send(&app, &buyer, conversation.id, "hello").await.json();

        assert_api_error(&send(&app, &outsider, conversation.id, "hi all").await, StatusCode::FORBIDDEN);
        assert_api_error(&send(&app, &outsider, Uuid::new_v4(), "anyone?").await, StatusCode::NOT_FOUND);

        let listing = app
            .server
            .get(&format!("/api/chat/conversations/{}/messages", conversation.id))
            .authorization_bearer(&outsider.token)
            .await;
        assert_api_error(&listing, StatusCode::NOT_FOUND);

        let mark = app
            .server
            .patch(&format!("/api/chat/messages/{}/read", message.id))
            .authorization_bearer(&outsider.token)
            .await;
        assert_api_error(&mark, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_chat_requires_authentication() {
        let app = spawn_app();
        let response = app.server.get("/api/chat/conversations").await;
        assert_api_error(&response, StatusCode::UNAUTHORIZED);
    }
}
