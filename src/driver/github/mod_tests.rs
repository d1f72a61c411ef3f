//! Tests for the GitHub constructors and the response wrapper.

use std::sync::{Arc, Mutex};

use http::{HeaderMap, HeaderValue, StatusCode};

use super::*;
use crate::transport::{HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client returning one canned response and capturing requests.
pub(super) struct MockClient {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockClient {
    pub(super) fn new(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(super) fn with_header(mut self, name: &'static str, value: &str) -> Self {
        self.headers
            .insert(name, HeaderValue::from_str(value).unwrap());
        self
    }

    /// Builds a GitHub client around the mock and returns its request log.
    pub(super) fn into_client(self) -> (Client, Arc<Mutex<Vec<HttpRequest>>>) {
        let requests = Arc::clone(&self.requests);
        let client = new_with_client("https://api.github.com", self).unwrap();
        (client, requests)
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        Ok(HttpResponse::new(
            self.status,
            self.headers.clone(),
            self.body.clone(),
        ))
    }
}

/// Returns the single captured request.
pub(super) fn only_request(requests: &Arc<Mutex<Vec<HttpRequest>>>) -> HttpRequest {
    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    requests[0].clone()
}

/// Returns the captured request body as JSON.
pub(super) fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().unwrap()).unwrap()
}

mod constructors {
    use super::*;

    #[test]
    fn new_sets_driver_and_normalizes_base_url() {
        let client = new("https://github.example.com/api/v3").unwrap();

        assert_eq!(client.driver(), Driver::Github);
        assert_eq!(
            client.base_url().as_str(),
            "https://github.example.com/api/v3/"
        );
    }

    #[test]
    fn new_default_targets_public_api() {
        let client = new_default().unwrap();

        assert_eq!(client.base_url().as_str(), "https://api.github.com/");
    }

    #[test]
    fn invalid_uri_is_a_transport_error() {
        let err = new("not a url").unwrap_err();

        assert!(matches!(err, ScmError::Transport(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn proxy_is_accepted_or_rejected() {
        assert!(new_with_proxy(DEFAULT_BASE_URL, "http://proxy.internal:3128").is_ok());
        assert!(new_with_proxy(DEFAULT_BASE_URL, "").is_ok());
        assert!(new_with_proxy(DEFAULT_BASE_URL, "not a url").is_err());
    }

    #[test]
    fn website_address_maps_public_api() {
        let public = url::Url::parse("https://api.github.com/").unwrap();
        let enterprise = url::Url::parse("https://github.example.com:8443/api/v3/").unwrap();

        assert_eq!(website_address(&public), "https://github.com/");
        assert_eq!(
            website_address(&enterprise),
            "https://github.example.com:8443/"
        );
    }
}

mod wrapper {
    use super::*;

    #[tokio::test]
    async fn records_request_id_and_rate() {
        let (client, _) = MockClient::new(200, include_str!("testdata/repo.json"))
            .with_header("X-GitHub-Request-Id", "DD0E:6011:12F21A8:1926790:5A2064E2")
            .with_header("X-RateLimit-Limit", "60")
            .with_header("X-RateLimit-Remaining", "59")
            .with_header("X-RateLimit-Reset", "1512076018")
            .into_client();

        let (_, response) = client
            .repositories()
            .find(None, "octocat/Hello-World")
            .await
            .unwrap();

        assert_eq!(response.id, "DD0E:6011:12F21A8:1926790:5A2064E2");
        assert_eq!(
            response.rate,
            Rate {
                limit: 60,
                remaining: 59,
                reset: 1_512_076_018,
            }
        );
        assert_eq!(client.rate(), response.rate);
    }

    #[tokio::test]
    async fn missing_rate_headers_reset_the_snapshot() {
        let (client, _) = MockClient::new(200, include_str!("testdata/repo.json")).into_client();

        let (_, response) = client.repositories().find(None, "o/r").await.unwrap();

        assert_eq!(response.rate, Rate::default());
        assert!(response.id.is_empty());
    }

    #[tokio::test]
    async fn not_found_is_classified() {
        let (client, _) = MockClient::new(404, r#"{"message":"Not Found"}"#).into_client();

        let err = client.repositories().find(None, "o/missing").await.unwrap_err();

        assert!(matches!(err, ScmError::NotFound));
    }

    #[tokio::test]
    async fn bad_credentials_are_not_authorized() {
        let (client, _) = MockClient::new(401, r#"{"message":"Bad credentials"}"#).into_client();

        let err = client.repositories().find(None, "o/r").await.unwrap_err();

        assert!(matches!(err, ScmError::NotAuthorized));
    }

    #[tokio::test]
    async fn other_errors_keep_the_message() {
        let (client, _) = MockClient::new(422, r#"{"message":"Validation Failed"}"#)
            .with_header("X-RateLimit-Remaining", "10")
            .into_client();

        let err = client.repositories().find(None, "o/r").await.unwrap_err();

        assert!(matches!(
            err,
            ScmError::Provider { status, ref message }
                if status == StatusCode::UNPROCESSABLE_ENTITY && message == "Validation Failed"
        ));
        // The snapshot is taken before the status is checked.
        assert_eq!(client.rate().remaining, 10);
    }

    #[tokio::test]
    async fn unreadable_error_body_gives_empty_message() {
        let (client, _) = MockClient::new(500, "<html>oops</html>").into_client();

        let err = client.repositories().find(None, "o/r").await.unwrap_err();

        assert!(matches!(err, ScmError::Provider { ref message, .. } if message.is_empty()));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let (client, _) = MockClient::new(200, r#"{"id":"not a number"}"#).into_client();

        let err = client.repositories().find(None, "o/r").await.unwrap_err();

        assert!(matches!(err, ScmError::Decode { ref event, .. } if event == "repos/o/r"));
    }

    #[tokio::test]
    async fn auth_override_is_honored() {
        let (client, requests) = MockClient::new(200, include_str!("testdata/repo.json")).into_client();
        let auth = AuthContext::new()
            .with_base_url("https://proxy.internal/upstream")
            .with_token(crate::transport::Token::new("t0k3n"));

        client.repositories().find(Some(&auth), "o/r").await.unwrap();

        let request = only_request(&requests);
        assert_eq!(request.url.as_str(), "https://proxy.internal/upstream/repos/o/r");
        assert_eq!(request.token.unwrap().token, "t0k3n");
        assert_eq!(client.base_url().as_str(), "https://api.github.com/");
    }
}
