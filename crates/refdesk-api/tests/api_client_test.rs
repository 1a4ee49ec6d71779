#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use refdesk_api::types::{CategoryInput, RoleInput};
use refdesk_api::{
    ApiClient, Branches, Categories, CredentialStore, Error, ListParams, MemoryCredentials, Roles,
    SortDirection,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(token: Option<&str>) -> (MockServer, ApiClient, Arc<MemoryCredentials>) {
    let server = MockServer::start().await;
    let store = Arc::new(match token {
        Some(t) => MemoryCredentials::with_token(SecretString::from(t.to_owned())),
        None => MemoryCredentials::new(),
    });
    let client =
        ApiClient::with_client(reqwest::Client::new(), &server.uri(), store.clone()).unwrap();
    (server, client, store)
}

fn empty_page() -> serde_json::Value {
    json!({
        "status": true,
        "data": [],
        "pagination": { "per_page": 10, "current_page": 1, "last_page": 1, "total": 0 }
    })
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_query_parameters() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("page", "2"))
        .and(query_param("perpage", "25"))
        .and(query_param("sort", "name"))
        .and(query_param("orderby", "desc"))
        .and(query_param("search", "fru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": [{ "id": 5, "name": "Fruit" }],
            "pagination": { "per_page": 25, "current_page": 2, "last_page": 2, "total": 26 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = ListParams {
        page: 2,
        per_page: 25,
        sort: "name".into(),
        order: SortDirection::Desc,
        search: "fru".into(),
        filters: Vec::new(),
    };
    let page = client.list::<Categories>(&params).await.unwrap();

    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].name, "Fruit");
    assert_eq!(page.pagination.total, 26);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let (server, client, _) = setup(Some("abc123")).await;

    Mock::given(method("GET"))
        .and(path("/api/branches"))
        .and(header("Authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .expect(1)
        .mount(&server)
        .await;

    client
        .list::<Branches>(&ListParams::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_anonymous_request_has_no_authorization_header() {
    let (server, client, _) = setup(None).await;

    Mock::given(method("GET"))
        .and(path("/api/branches"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_page()))
        .mount(&server)
        .await;

    client
        .list::<Branches>(&ListParams::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_clears_store_and_wins_over_errors() {
    let (server, client, store) = setup(Some("expired")).await;

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": false,
            "message": "Unauthenticated.",
            "errors": [{ "input": "name", "message": "required" }]
        })))
        .mount(&server)
        .await;

    let result = client
        .create::<Categories>(&CategoryInput { name: String::new() })
        .await;

    assert!(
        matches!(result, Err(Error::Unauthorized { .. })),
        "expected Unauthorized, got: {result:?}"
    );
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_validation_errors_are_kept_in_order() {
    let (server, client, store) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": false,
            "errors": [
                { "input": "name", "message": "required" },
                { "input": "name", "message": "too short" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client
        .create::<Categories>(&CategoryInput { name: String::new() })
        .await
        .unwrap_err();

    let violations = err.field_violations().unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[1].message, "too short");
    assert_eq!(err.status(), Some(422));
    assert!(store.get().is_some());
}

#[tokio::test]
async fn test_message_only_error_is_api_error() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("DELETE"))
        .and(path("/api/categories/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "status": false,
            "message": "Category is in use"
        })))
        .mount(&server)
        .await;

    let err = client.remove::<Categories>(9).await.unwrap_err();
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Category is in use");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_has_no_status() {
    // Nothing listens on port 9 of localhost.
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9/",
        Arc::new(MemoryCredentials::new()),
    )
    .unwrap();

    let err = client
        .list::<Categories>(&ListParams::default())
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_returns_message() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("DELETE"))
        .and(path("/api/branches/4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": true, "message": "Deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.remove::<Branches>(4).await.unwrap();
    assert!(resp.status);
    assert_eq!(resp.message, "Deleted");
}

#[tokio::test]
async fn test_role_update_uses_method_override() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/roles/3"))
        .and(body_partial_json(json!({
            "_method": "PUT",
            "name": "auditor",
            "permissions": [1, 2]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": true, "message": "Updated" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let input = RoleInput {
        name: "auditor".into(),
        permissions: vec![1, 2],
    };
    let resp = client.update::<Roles>(3, &input).await.unwrap();
    assert_eq!(resp.message, "Updated");
}

#[tokio::test]
async fn test_fetch_reads_edit_view() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/categories/12/edit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": { "id": 12, "name": "Dairy" }
        })))
        .mount(&server)
        .await;

    let category = client.fetch::<Categories>(12).await.unwrap();
    assert_eq!(category.id, 12);
    assert_eq!(category.name, "Dairy");
}

// ── Filters ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_branch_options_request_flat_list() {
    let (server, client, _) = setup(Some("tok")).await;

    Mock::given(method("GET"))
        .and(path("/api/filter/branches"))
        .and(query_param("tree", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": [
                { "id": 1, "name": "North", "parent_id": 0, "parent_name": null },
                { "id": 2, "name": "North-A", "parent_id": 1, "parent_name": "North" }
            ]
        })))
        .mount(&server)
        .await;

    let options = client.branch_options().await.unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options[1].parent_name.as_deref(), Some("North"));
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token() {
    let (server, client, store) = setup(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({ "phone": "998901234567" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": {
                "token": "fresh-token",
                "user": { "id": 1, "name": "Admin", "phone": "998901234567" }
            }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("secret".to_owned());
    let user = client.login("998901234567", &password).await.unwrap();

    assert_eq!(user.name, "Admin");
    assert_eq!(
        store.get().as_ref().map(ExposeSecret::expose_secret),
        Some("fresh-token")
    );
}

#[tokio::test]
async fn test_logout_clears_store_even_on_failure() {
    let (server, client, store) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_string(""))
        .mount(&server)
        .await;

    assert!(client.logout().await.is_err());
    assert!(store.get().is_none());
}

#[tokio::test]
async fn test_logout_accepts_empty_body() {
    let (server, client, store) = setup(Some("tok")).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(store.get().is_none());
}
