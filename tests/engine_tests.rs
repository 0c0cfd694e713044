//! Integration tests for the raw-record engine.
//!
//! These tests run [`RestClient`] against a local mock server and verify
//! URL building, pagination cursor handling, status checks and error
//! reporting.

use drf_consumer::clients::SDK_VERSION;
use drf_consumer::{BaseUrl, ConsumerConfig, Page, ResourceError, RestClient};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a client whose base URL points at the mock server's `/api`.
fn create_client(server: &MockServer) -> RestClient {
    RestClient::new(ConsumerConfig::new(format!("{}/api", server.uri())).unwrap())
}

fn create_verbose_client(server: &MockServer) -> RestClient {
    let config = ConsumerConfig::builder()
        .base_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
        .verbose_errors(true)
        .build()
        .unwrap();
    RestClient::new(config)
}

/// Mounts a three-page `user` collection: page 1 (ids 1, 2), page 2
/// (ids 3, 4) and page 3 (id 5).
async fn mount_user_pages(server: &MockServer) {
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": null,
            "next": format!("{uri}/api/user/?page=2"),
            "results": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": format!("{uri}/api/user/?page=1"),
            "next": format!("{uri}/api/user/?page=3"),
            "results": [{"id": 3, "name": "c"}, {"id": 4, "name": "d"}],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": null,
            "next": format!("{uri}/api/user/?page=2"),
            "results": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": format!("{uri}/api/user/?page=2"),
            "next": null,
            "results": [{"id": 5, "name": "e"}],
        })))
        .mount(server)
        .await;
}

// ============================================================================
// Listing and Pagination Tests
// ============================================================================

#[tokio::test]
async fn test_first_page_returns_results_and_stores_cursor() {
    let server = MockServer::start().await;
    let next = format!("{}/api/user?page=2", server.uri());

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": null,
            "next": next,
            "results": [{"id": 1, "name": "a"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    let records = client.list("user", &[], Page::First).await.unwrap();

    assert_eq!(records, vec![json!({"id": 1, "name": "a"})]);
    assert_eq!(client.cursor().next_page_url(), Some(next.as_str()));
    assert!(client.cursor().prev_page_url().is_none());
}

#[tokio::test]
async fn test_next_and_prev_follow_stored_urls() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;

    let mut client = create_client(&server);

    let first = client.list("user", &[], Page::First).await.unwrap();
    let second = client.list("user", &[], Page::Next).await.unwrap();
    let third = client.list("user", &[], Page::Next).await.unwrap();

    assert_eq!(first[0]["id"], 1);
    assert_eq!(second[0]["id"], 3);
    assert_eq!(third, vec![json!({"id": 5, "name": "e"})]);
    assert!(!client.cursor().has_next());

    let back = client.list("user", &[], Page::Prev).await.unwrap();
    assert_eq!(back[1]["id"], 4);
}

#[tokio::test]
async fn test_next_without_prior_list_makes_no_request() {
    let server = MockServer::start().await;
    let mut client = create_client(&server);

    let records = client.list("user", &[], Page::Next).await.unwrap();

    assert!(records.is_empty());
    let received = server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_next_after_last_page_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous": null,
            "next": null,
            "results": [{"id": 1}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    client.list("user", &[], Page::First).await.unwrap();

    assert!(client.list("user", &[], Page::Next).await.unwrap().is_empty());
    assert!(client.list("user", &[], Page::Prev).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_options_are_appended_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "15"))
        .and(query_param("search", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    client
        .list("user", &["limit=15", "search=bob"], Page::First)
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(
        received[0].url.query(),
        Some("format=json&limit=15&search=bob")
    );
}

#[tokio::test]
async fn test_bare_array_leaves_cursor_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tag/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1}, {"id": 2}])))
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    let records = client.list("tag", &[], Page::First).await.unwrap();

    assert_eq!(records.len(), 2);
    assert!(client.cursor().is_empty());
}

#[tokio::test]
async fn test_unusable_collection_body_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "ok"})))
        .mount(&server)
        .await;

    let mut client = create_client(&server);
    let err = client.list("user", &[], Page::First).await.unwrap_err();

    assert!(matches!(err, ResourceError::UnexpectedPayload { .. }));
    assert!(err.is_remote());
}

#[tokio::test]
async fn test_failed_first_page_leaves_cursor_reset() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;

    let mut client = create_client(&server);
    client.list("user", &[], Page::First).await.unwrap();
    assert!(client.cursor().has_next());

    Mock::given(method("GET"))
        .and(path("/api/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.list("broken", &[], Page::First).await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.to_string(), "API error (broken) - Err GET 500");
    assert!(client.cursor().is_empty());
}

#[tokio::test]
async fn test_configure_resets_cursor() {
    let server = MockServer::start().await;
    mount_user_pages(&server).await;

    let mut client = create_client(&server);
    client.list("user", &[], Page::First).await.unwrap();
    assert!(client.cursor().has_next());

    client.configure(ConsumerConfig::new(format!("{}/api", server.uri())).unwrap());

    assert!(client.cursor().is_empty());
    assert!(client.list("user", &[], Page::Next).await.unwrap().is_empty());
}

// ============================================================================
// Item Operation Tests
// ============================================================================

#[tokio::test]
async fn test_get_one_returns_record() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/5/"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 5, "name": "e"})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let record = client.get_one("user", 5, &[]).await.unwrap();

    assert_eq!(record["name"], "e");
}

#[tokio::test]
async fn test_get_one_not_found_is_remote_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/9/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let err = client.get_one("user", 9, &[]).await.unwrap_err();

    let ResourceError::Remote(remote) = &err else {
        panic!("expected a remote error, got {err:?}");
    };
    assert_eq!(remote.code, 404);
    assert_eq!(remote.resource, "user");
    assert!(remote.url.ends_with("/api/user/9/?format=json"));
    assert_eq!(remote.body["detail"], "Not found.");
}

#[tokio::test]
async fn test_create_posts_payload_and_returns_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .and(body_json(json!({"id": 0, "name": "new"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 12, "name": "new"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let body = client
        .create("user", json!({"id": 0, "name": "new"}), &[])
        .await
        .unwrap();

    assert_eq!(body["id"], 12);
}

#[tokio::test]
async fn test_rejected_create_keeps_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"name": ["This field may not be blank."]})),
        )
        .mount(&server)
        .await;

    let client = create_client(&server);
    let err = client
        .create("user", json!({"name": ""}), &[])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(400));
    assert_eq!(
        err.body(),
        Some(&json!({"name": ["This field may not be blank."]}))
    );
    assert_eq!(err.to_string(), "API error (user) - Err POST 400");
}

#[tokio::test]
async fn test_create_with_200_is_not_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .mount(&server)
        .await;

    let client = create_client(&server);
    let err = client.create("user", json!({}), &[]).await.unwrap_err();

    assert_eq!(err.status_code(), Some(200));
}

#[tokio::test]
async fn test_update_patches_item_url() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/user/3/"))
        .and(body_json(json!({"id": 3, "name": "z"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3, "name": "z"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let body = client
        .update("user", json!({"id": 3, "name": "z"}), &[])
        .await
        .unwrap();

    assert_eq!(body, Some(json!({"id": 3, "name": "z"})));
}

#[tokio::test]
async fn test_replace_puts_item_url() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/user/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    let body = client
        .replace("user", json!({"id": 3, "name": "z"}), &[])
        .await
        .unwrap();

    assert_eq!(body, Some(json!({"id": 3})));
}

#[tokio::test]
async fn test_writes_without_id_make_no_request() {
    let server = MockServer::start().await;
    let client = create_client(&server);

    assert!(client
        .update("user", json!({"name": "x"}), &[])
        .await
        .unwrap()
        .is_none());
    assert!(client
        .replace("user", json!({"id": 0}), &[])
        .await
        .unwrap()
        .is_none());
    assert!(!client.remove("user", json!({"id": null}), &[]).await.unwrap());

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_succeeds_on_204_only() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/user/4/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/user/5/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = create_client(&server);

    assert!(client.remove("user", json!({"id": 4}), &[]).await.unwrap());

    let err = client.remove("user", json!({"id": 5}), &[]).await.unwrap_err();
    assert_eq!(err.status_code(), Some(200));
    assert_eq!(err.to_string(), "API error (user) - Err DELETE 200");
}

// ============================================================================
// Error Reporting Tests
// ============================================================================

#[tokio::test]
async fn test_verbose_error_includes_url_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/user/3/"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad things"))
        .mount(&server)
        .await;

    let client = create_verbose_client(&server);
    let err = client
        .update("user", json!({"id": 3}), &[])
        .await
        .unwrap_err();

    let expected = format!(
        "API error (user)\nErr PATCH 400\n{}/api/user/3/?format=json\n##########\nbad things\n##########",
        server.uri()
    );
    assert_eq!(err.to_string(), expected);
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Nothing listens on port 1
    let mut client = RestClient::new(ConsumerConfig::new("http://127.0.0.1:1/api").unwrap());
    let err = client.list("user", &[], Page::First).await.unwrap_err();

    assert!(matches!(err, ResourceError::Transport { .. }));
    assert!(err.is_remote());
    assert_eq!(err.status_code(), None);
}

#[tokio::test]
async fn test_truncated_body_is_transport_error() {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Promise 100 bytes, send a few, then hang up
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n{\"id\": 1")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let client = RestClient::new(ConsumerConfig::new(format!("http://{addr}/api")).unwrap());
    let err = client.get_one("user", 1, &[]).await.unwrap_err();

    assert!(matches!(err, ResourceError::Transport { .. }));
    assert!(err.is_remote());
}

// ============================================================================
// Header Tests
// ============================================================================

#[tokio::test]
async fn test_default_headers_are_sent() {
    let server = MockServer::start().await;
    let user_agent = format!(
        "DRF Consumer Library v{SDK_VERSION} | Rust {}",
        env!("CARGO_PKG_RUST_VERSION")
    );

    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .and(header("user-agent", user_agent.as_str()))
        .and(header("content-type", "application/json; charset=utf8"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_client(&server);
    client.create("user", json!({"name": "x"}), &[]).await.unwrap();
}

#[tokio::test]
async fn test_configured_headers_override_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/1/"))
        .and(header("user-agent", "custom-agent"))
        .and(header("authorization", "Token abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConsumerConfig::builder()
        .base_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
        .header("User-Agent", "custom-agent")
        .header("Authorization", "Token abc")
        .build()
        .unwrap();
    let client = RestClient::new(config);

    client.get_one("user", 1, &[]).await.unwrap();
}

#[tokio::test]
async fn test_output_format_is_configurable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/user/1/"))
        .and(query_param("format", "api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ConsumerConfig::builder()
        .base_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
        .output_format(drf_consumer::OutputFormat::new("api").unwrap())
        .build()
        .unwrap();
    let client = RestClient::new(config);

    client.get_one("user", 1, &[]).await.unwrap();
}

#[tokio::test]
async fn test_configured_content_type_is_sent_on_writes() {
    for key in ["Content-Type", "content-type"] {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/user/"))
            .and(header("content-type", "application/vnd.api+json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ConsumerConfig::builder()
            .base_url(BaseUrl::new(format!("{}/api", server.uri())).unwrap())
            .header(key, "application/vnd.api+json")
            .build()
            .unwrap();
        let client = RestClient::new(config);

        let created = client.create("user", json!({"name": "x"}), &[]).await;
        assert!(created.is_ok(), "override through {key} was not sent alone");
    }
}
