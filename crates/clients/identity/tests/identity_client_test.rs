//! Integration tests for the identity client using wiremock mock servers
//! for both the identity provider and the sync endpoint.

use identity_client::{
    AuthChangeEvent, IdentityClient, IdentityConfig, IdentityError, IdentityProvider,
    SignUpCredentials, SignUpError, SyncError,
};

use domain::UserRole;
use serde_json::{json, Value};
use wiremock::{
    matchers::{bearer_token, body_partial_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const ANON_KEY: &str = "anon-test-key";

fn client_for(server: &MockServer) -> IdentityClient {
    IdentityClient::new(IdentityConfig::new(server.uri(), ANON_KEY, server.uri())).unwrap()
}

fn provider_user() -> Value {
    json!({
        "id": "sub-1",
        "aud": "authenticated",
        "role": "authenticated",
        "email": "ana@example.com",
        "user_metadata": {"name": "Ana", "role": "RECRUITER"}
    })
}

fn session_body() -> Value {
    json!({
        "access_token": "access-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1700003600u64,
        "refresh_token": "refresh-1",
        "user": provider_user()
    })
}

async fn mount_sync(server: &MockServer, status: u16, body: Value, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth/sync-user"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected)
        .mount(server)
        .await;
}

// =============================================================================
// Sign-up
// =============================================================================

#[tokio::test]
async fn test_sign_up_rejects_short_password_without_network() {
    let server = MockServer::start().await;
    let client = client_for(&server);

    let result = client
        .sign_up(SignUpCredentials::new("a@x.com", "12345"))
        .await;

    match result {
        Err(SignUpError::Validation(message)) => {
            assert_eq!(message, "La contraseña debe tener al menos 6 caracteres.")
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sign_up_pending_confirmation_syncs_user() {
    let server = MockServer::start().await;
    let redirect = format!("{}/auth/callback", server.uri());

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(header("apikey", ANON_KEY))
        .and(query_param("redirect_to", redirect.as_str()))
        .and(body_partial_json(json!({
            "email": "ana@example.com",
            "password": "secret1",
            "data": {"name": "Ana", "role": "RECRUITER"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/sync-user"))
        .and(body_partial_json(json!({
            "id": "sub-1",
            "email": "ana@example.com",
            "name": "Ana",
            "role": "RECRUITER"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "User synced successfully",
            "userId": "sub-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let success = client
        .sign_up(
            SignUpCredentials::new("ana@example.com", "secret1")
                .with_name("Ana")
                .with_role(UserRole::Recruiter),
        )
        .await
        .unwrap();

    assert_eq!(success.user.id, "sub-1");
    assert!(success.session.is_none());
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn test_sign_up_with_session_signs_in() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&server)
        .await;
    mount_sync(&server, 200, json!({"message": "User already exists and is in sync", "userId": "sub-1"}), 1).await;

    let client = client_for(&server);
    let mut events = client.subscribe().await;
    assert_eq!(
        events.next().await.unwrap().event,
        AuthChangeEvent::InitialSession
    );

    let success = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await
        .unwrap();

    assert_eq!(success.session.unwrap().access_token, "access-1");
    let change = events.next().await.unwrap();
    assert_eq!(change.event, AuthChangeEvent::SignedIn);
    assert_eq!(change.session.unwrap().user.id, "sub-1");
}

#[tokio::test]
async fn test_sign_up_sync_failure_keeps_provider_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .mount(&server)
        .await;
    mount_sync(
        &server,
        500,
        json!({"code": "DATABASE_ERROR", "message": "Internal Server Error", "error": "connection refused"}),
        1,
    )
    .await;

    let client = client_for(&server);
    let result = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await;

    match result {
        Err(SignUpError::Sync {
            user,
            session,
            source: SyncError::Endpoint { status, message },
        }) => {
            assert_eq!(user.id, "sub-1");
            assert!(session.is_none());
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected sync error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_up_unreachable_sync_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .expect(1)
        .mount(&server)
        .await;

    let config = IdentityConfig::new(server.uri(), ANON_KEY, "http://127.0.0.1:1");
    let client = IdentityClient::new(config).unwrap();
    let result = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await;

    match result {
        Err(SignUpError::Sync {
            user,
            session,
            source: SyncError::Network(_),
        }) => {
            assert_eq!(user.id, "sub-1");
            assert!(session.is_none());
        }
        other => panic!("expected sync network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_up_sync_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/sync-user"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Failed to sync user with database");
}

#[tokio::test]
async fn test_sign_up_provider_rejection_skips_sync() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({
                "code": 422,
                "error_code": "user_already_exists",
                "msg": "User already registered"
            })),
        )
        .mount(&server)
        .await;
    mount_sync(&server, 201, json!({}), 0).await;

    let client = client_for(&server);
    let result = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await;

    match result {
        Err(SignUpError::Provider(IdentityError::Provider { status, message })) => {
            assert_eq!(status, 422);
            assert_eq!(message, "User already registered");
        }
        other => panic!("expected provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sign_up_without_user_is_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": null, "session": null})))
        .mount(&server)
        .await;
    mount_sync(&server, 201, json!({}), 0).await;

    let client = client_for(&server);
    let result = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await;

    assert!(matches!(result, Err(SignUpError::Unknown)));
}

#[tokio::test]
async fn test_sign_up_unreachable_provider() {
    let config = IdentityConfig::new("http://127.0.0.1:1", ANON_KEY, "http://127.0.0.1:1");
    let client = IdentityClient::new(config).unwrap();

    let result = client
        .sign_up(SignUpCredentials::new("ana@example.com", "secret1"))
        .await;

    assert!(matches!(
        result,
        Err(SignUpError::Provider(IdentityError::Network(_)))
    ));
}

// =============================================================================
// Session lifecycle
// =============================================================================

#[tokio::test]
async fn test_sign_in_get_user_sign_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", ANON_KEY))
        .and(body_partial_json(json!({"email": "ana@example.com", "password": "secret1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(bearer_token("access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(bearer_token("access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.current_user().await.unwrap().is_none());

    let mut events = client.subscribe().await;
    assert!(events.next().await.unwrap().session.is_none());

    let session = client.sign_in("ana@example.com", "secret1").await.unwrap();
    assert_eq!(session.refresh_token, "refresh-1");
    assert_eq!(events.next().await.unwrap().event, AuthChangeEvent::SignedIn);

    let user = client.current_user().await.unwrap().unwrap();
    assert_eq!(user.user_metadata.name.as_deref(), Some("Ana"));

    client.sign_out().await.unwrap();
    let change = events.next().await.unwrap();
    assert_eq!(change.event, AuthChangeEvent::SignedOut);
    assert!(change.session.is_none());

    // No session held: answered locally
    assert!(client.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn test_sign_in_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sign_in("ana@example.com", "wrong-pw").await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn test_subscription_starts_with_held_session() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.sign_in("ana@example.com", "secret1").await.unwrap();

    let mut events = client.subscribe().await;
    let initial = events.next().await.unwrap();
    assert_eq!(initial.event, AuthChangeEvent::InitialSession);
    assert_eq!(initial.session.unwrap().user.id, "sub-1");
}
