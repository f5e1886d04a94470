//! Tests for the Roster client against a mock user service.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real server connection.

use roster_client::{ClientConfig, ClientError, RosterClient, APP_ID_HEADER};
use roster_core::{RosterError, UserApi, UserDraft, UserId};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const APP_ID: &str = "test-app-id";

fn client_for(server: &MockServer) -> RosterClient {
    RosterClient::new(ClientConfig::new(server.uri(), APP_ID)).expect("valid config")
}

fn user_json(id: &str, first: &str, last: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": "ms",
        "firstName": first,
        "lastName": last,
        "picture": format!("https://randomuser.me/api/portraits/women/{}.jpg", id.len())
    })
}

// =============================================================================
// Client Config Tests
// =============================================================================

mod client_config {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_new_uses_default_timeouts() {
        let config = ClientConfig::new("https://dummyapi.io/data/v1", "key");
        assert_eq!(config.url, "https://dummyapi.io/data/v1");
        assert_eq!(config.app_id, "key");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_with_timeouts() {
        let config = ClientConfig::new("https://example.com", "key")
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_empty_url_rejected() {
        let result = RosterClient::new(ClientConfig::new("", APP_ID));
        match result {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_scheme_required() {
        let result = RosterClient::new(ClientConfig::new("dummyapi.io/data/v1", APP_ID));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_trailing_slashes_trimmed() {
        let client =
            RosterClient::new(ClientConfig::new("https://dummyapi.io/data/v1///", APP_ID)).unwrap();
        assert_eq!(client.url(), "https://dummyapi.io/data/v1");
    }
}

// =============================================================================
// List Tests
// =============================================================================

mod list_users {
    use super::*;

    #[tokio::test]
    async fn test_list_sends_paging_query_and_app_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "6"))
            .and(header(APP_ID_HEADER, APP_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [user_json("a1", "Sara", "Andersen"), user_json("b2", "Edita", "Vestering")],
                "total": 8,
                "page": 2,
                "limit": 6
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server).users().list(2, 6).await.unwrap();

        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 6);
        assert_eq!(page.total, 8);
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].first_name, "Sara");
        assert_eq!(page.data[1].id.as_str(), "b2");
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_list_keeps_server_order() {
        let server = MockServer::start().await;

        let data: Vec<_> = (0..6)
            .map(|i| user_json(&format!("u{}", i), "First", &format!("Last{}", i)))
            .collect();
        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": data,
                "total": 30,
                "page": 1,
                "limit": 6
            })))
            .mount(&server)
            .await;

        let page = client_for(&server).users().list(1, 6).await.unwrap();
        let ids: Vec<&str> = page.data.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u0", "u1", "u2", "u3", "u4", "u5"]);
        assert!(page.has_more());
    }

    #[tokio::test]
    async fn test_list_server_error_keeps_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({ "error": "APP_ID_NOT_EXIST" })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).users().list(1, 6).await;
        match result {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "APP_ID_NOT_EXIST");
            }
            other => panic!("Expected ServerError, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_list_404_is_server_error_not_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no route"))
            .mount(&server)
            .await;

        let result = client_for(&server).users().list(1, 6).await;
        match result {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "no route");
            }
            other => panic!("Expected ServerError, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_list_invalid_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).users().list(1, 6).await;
        assert!(matches!(result, Err(ClientError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Port 9 (discard) on localhost is not listening in test environments
        let client = RosterClient::new(ClientConfig::new("http://127.0.0.1:9", APP_ID)).unwrap();

        let result = client.users().list(1, 6).await;
        assert!(matches!(result, Err(ClientError::Unreachable(_))));

        let err: RosterError = result.unwrap_err().into();
        assert!(err.is_transport());
    }
}

// =============================================================================
// Single User Tests
// =============================================================================

mod single_user {
    use super::*;

    #[tokio::test]
    async fn test_get_user() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/60d0fe4f5311236168a109ca"))
            .and(header(APP_ID_HEADER, APP_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "60d0fe4f5311236168a109ca",
                "title": "ms",
                "firstName": "Sara",
                "lastName": "Andersen",
                "gender": "female",
                "email": "sara.andersen@example.com",
                "dateOfBirth": "1996-04-30T19:26:49.610Z",
                "phone": "92694011",
                "picture": "https://randomuser.me/api/portraits/women/58.jpg",
                "location": {
                    "street": "9614, Søndermarksvej",
                    "city": "Kongsvinger",
                    "state": "Nordjylland",
                    "country": "Denmark",
                    "timezone": "-9:00"
                },
                "registerDate": "2021-06-21T21:02:07.374Z",
                "updatedDate": "2021-06-21T21:02:07.374Z"
            })))
            .mount(&server)
            .await;

        let id = UserId::new("60d0fe4f5311236168a109ca");
        let user = client_for(&server).users().get(&id).await.unwrap();

        assert_eq!(user.id, id);
        assert_eq!(user.full_name(), "Sara Andersen");
        assert_eq!(user.email.as_deref(), Some("sara.andersen@example.com"));
        let location = user.location.expect("location");
        assert_eq!(location.country.as_deref(), Some("Denmark"));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "error": "RESOURCE_NOT_FOUND" })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).users().get(&UserId::new("missing")).await;
        match result {
            Err(ClientError::NotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("Expected NotFound, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_create_user_posts_draft() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user/create"))
            .and(header(APP_ID_HEADER, APP_ID))
            .and(body_json(json!({
                "title": "mr",
                "firstName": "Roope",
                "lastName": "Niskanen",
                "email": "roope.niskanen@example.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "new-id",
                "title": "mr",
                "firstName": "Roope",
                "lastName": "Niskanen",
                "email": "roope.niskanen@example.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = UserDraft {
            title: Some("mr".into()),
            first_name: Some("Roope".into()),
            last_name: Some("Niskanen".into()),
            email: Some("roope.niskanen@example.com".into()),
            ..UserDraft::default()
        };
        let user = client_for(&server).users().create(&draft).await.unwrap();
        assert_eq!(user.id.as_str(), "new-id");
    }

    #[tokio::test]
    async fn test_create_validation_error_is_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user/create"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "BODY_NOT_VALID",
                "data": { "email": "Email already used" }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).users().create(&UserDraft::default()).await;
        match result {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 400);
                assert!(message.contains("BODY_NOT_VALID"));
            }
            other => panic!("Expected ServerError, got: {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_update_user_puts_only_set_fields() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/user/abc"))
            .and(body_json(json!({ "phone": "0612345678" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc",
                "firstName": "Sara",
                "lastName": "Andersen",
                "phone": "0612345678"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = UserDraft {
            phone: Some("0612345678".into()),
            ..UserDraft::default()
        };
        let user = client_for(&server)
            .users()
            .update(&UserId::new("abc"), &draft)
            .await
            .unwrap();
        assert_eq!(user.phone.as_deref(), Some("0612345678"));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/user/abc"))
            .and(header(APP_ID_HEADER, APP_ID))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .users()
            .delete(&UserId::new("abc"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/user/gone"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).users().delete(&UserId::new("gone")).await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_id_is_percent_encoded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/a%2Fb"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(
                "a/b", "Sara", "Andersen",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let user = client_for(&server).users().get(&UserId::new("a/b")).await.unwrap();
        assert_eq!(user.id.as_str(), "a/b");
    }
}

// =============================================================================
// UserApi Trait Tests
// =============================================================================

mod user_api {
    use super::*;

    #[tokio::test]
    async fn test_trait_maps_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_user(&UserId::new("missing")).await.unwrap_err();
        match err {
            RosterError::NotFound { id, .. } => assert_eq!(id, "missing"),
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_trait_maps_server_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.list_users(1, 6).await.unwrap_err();
        assert!(err.is_transport());
        assert!(matches!(err, RosterError::Server { status: 500, .. }));
    }
}
