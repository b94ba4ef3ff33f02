//! Integration tests for the HTTP client against a mock server.

use std::sync::Arc;

use roster_business::{
    ApiError, ClientConfig, DirectoryApi, FileTokenStore, HttpDirectoryApi, MemoryTokenStore,
    NewUser, TokenStore,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn page_body(page: u32, ids: &[i64]) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "page": page,
        "total_pages": 3,
        "total_users": 14,
        "count": ids.len(),
        "links": {"next_url": null, "prev_url": null},
        "users": ids.iter().map(|id| serde_json::json!({
            "id": id,
            "name": format!("User {id}"),
            "email": format!("user{id}@example.com"),
            "phone": "+380501234567",
            "position": "Designer",
            "position_id": 2,
            "photo": format!("https://example.com/{id}.jpg")
        })).collect::<Vec<_>>()
    })
}

fn new_user() -> NewUser {
    NewUser {
        name: "Ada Lovelace".to_owned(),
        email: "ada@example.com".to_owned(),
        phone: "+380501234567".to_owned(),
        position_id: 2,
    }
}

#[tokio::test(flavor = "current_thread")]
async fn get_users_sends_page_and_count() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "2"))
        .and(query_param("count", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(2, &[7, 8])))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    let page = api.get_users(2, 6).await.expect("page");
    assert_eq!(page.page, 2);
    assert_eq!(page.users.len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn client_from_config_targets_the_configured_base() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "positions": [{"id": 1, "name": "Lawyer"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri());
    let api = HttpDirectoryApi::from_config(&config, Arc::new(MemoryTokenStore::new()));
    let positions = api.get_positions().await.expect("positions");
    assert_eq!(positions.len(), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn stored_token_travels_as_a_bearer() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/9"))
        .and(header("Authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 9,
            "name": "User 9",
            "email": "user9@example.com",
            "phone": "+380501234567",
            "position": "QA",
            "position_id": 3,
            "photo": "https://example.com/9.jpg"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::with_token("tok-9")));
    let user = api.get_user(9).await.expect("user");
    assert_eq!(user.id, 9);
    assert_eq!(user.position, "QA");
}

#[tokio::test(flavor = "current_thread")]
async fn positions_unwrap_the_envelope() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "positions": [
                {"id": 1, "name": "Lawyer"},
                {"id": 2, "name": "Designer"}
            ]
        })))
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    let positions = api.get_positions().await.expect("positions");
    assert_eq!(positions.len(), 2);
    assert_eq!(positions[1].name, "Designer");
}

#[tokio::test(flavor = "current_thread")]
async fn refresh_token_persists_across_instances() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "token": "fresh-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("tempdir");
    let token_path = dir.path().join("token.json");

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(FileTokenStore::new(&token_path)));
    api.refresh_token().await.expect("refresh");

    // A second client over the same file sees the refreshed token.
    let reopened = FileTokenStore::new(&token_path);
    assert_eq!(reopened.load(), Some("fresh-token".to_owned()));
}

#[tokio::test(flavor = "current_thread")]
async fn create_user_sends_the_raw_token_and_multipart_fields() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Token", "raw-token"))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"name\"",
        ))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"email\"",
        ))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"phone\"",
        ))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"position_id\"",
        ))
        .and(body_string_contains(
            "Content-Disposition: form-data; name=\"photo\"; filename=\"photo.jpg\"",
        ))
        .and(body_string_contains("ada@example.com"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "success": true,
            "user_id": 42,
            "message": "New user successfully registered"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(
        server.uri(),
        Arc::new(MemoryTokenStore::with_token("raw-token")),
    );
    let outcome = api
        .create_user(&new_user(), b"jpegbytes")
        .await
        .expect("outcome");
    assert_eq!(outcome.new_user_id(), Some(42));
}

#[tokio::test(flavor = "current_thread")]
async fn create_user_without_a_token_never_hits_the_network() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    let err = api.create_user(&new_user(), b"jpeg").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test(flavor = "current_thread")]
async fn status_401_maps_to_unauthorized() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "success": false,
            "message": "The token expired."
        })))
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::with_token("old")));
    let err = api.create_user(&new_user(), b"jpeg").await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test(flavor = "current_thread")]
async fn server_errors_keep_their_status() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    let err = api.get_users(1, 6).await.unwrap_err();
    assert_eq!(err, ApiError::Server { status: 500 });
}

#[tokio::test(flavor = "current_thread")]
async fn garbage_payload_is_a_decoding_error() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    assert!(matches!(
        api.get_users(1, 6).await.unwrap_err(),
        ApiError::Decoding(_)
    ));
}

#[tokio::test(flavor = "current_thread")]
async fn empty_success_body_is_no_data() {
    init_logs();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/positions"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let api = HttpDirectoryApi::new(server.uri(), Arc::new(MemoryTokenStore::new()));
    assert_eq!(api.get_positions().await.unwrap_err(), ApiError::NoData);
}
