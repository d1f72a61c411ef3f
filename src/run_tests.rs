//! Tests for the run module.

use std::sync::{Arc, Mutex};

use http::{HeaderValue, StatusCode};
use scm_client::transport::{HttpError, HttpRequest, HttpResponse};
use scm_client::webhook::MAX_PAYLOAD_BYTES;
use scm_client::webhook::signature::sign;

use super::*;

/// Mock HTTP client returning one canned response and capturing requests.
#[derive(Clone)]
struct MockClient {
    status: StatusCode,
    body: &'static str,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockClient {
    fn new(status: u16, body: &'static str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        let mut headers = HeaderMap::new();
        headers.insert("X-RateLimit-Limit", HeaderValue::from_static("5000"));
        headers.insert("X-RateLimit-Remaining", HeaderValue::from_static("4999"));
        headers.insert("X-RateLimit-Reset", HeaderValue::from_static("1700000000"));
        Ok(HttpResponse::new(
            self.status,
            headers,
            self.body.as_bytes().to_vec(),
        ))
    }
}

fn transport<H: HttpClient>(client: H) -> Transport<H> {
    Transport::with_client("https://scm.example.com", client).unwrap()
}

fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(*name, HeaderValue::from_str(value).unwrap());
    }
    map
}

mod run_error {
    use super::*;

    #[test]
    fn client_creation_names_provider() {
        let error = RunError::ClientCreation {
            provider: Driver::Gitea,
            source: ScmError::NotSupported,
        };
        assert!(error.to_string().starts_with("Failed to create gitea client"));
    }

    #[test]
    fn repository_error_names_repository() {
        let error = RunError::Repository {
            name: "o/r".to_string(),
            source: ScmError::NotFound,
        };
        assert!(error.to_string().contains("'o/r'"));
    }

    #[test]
    fn missing_payload_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let error = read_payload(&path).unwrap_err();

        assert!(matches!(error, RunError::PayloadRead { .. }));
        assert!(error.to_string().contains("absent.json"));
    }

    #[test]
    fn payload_read_stops_at_cap() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.json");
        std::fs::write(&path, vec![b' '; MAX_PAYLOAD_BYTES + 4096]).unwrap();

        let body = read_payload(&path).unwrap();

        assert_eq!(body.len(), MAX_PAYLOAD_BYTES);
    }
}

mod client {
    use super::*;

    #[test]
    fn builds_each_supported_provider() {
        for provider in [Driver::Github, Driver::Gitea, Driver::Azure] {
            let client = build_client(provider, transport(MockClient::new(200, "{}"))).unwrap();
            assert_eq!(client.driver(), provider);
            assert_eq!(client.base_url().as_str(), "https://scm.example.com/");
        }
    }

    #[test]
    fn other_providers_are_not_supported() {
        let result = build_client(Driver::Gitlab, transport(MockClient::new(200, "{}")));

        assert!(matches!(result, Err(ScmError::NotSupported)));
    }

    #[tokio::test]
    async fn bearer_token_reaches_the_wire() {
        let mock = MockClient::new(200, include_str!("driver/github/testdata/repo.json"));
        let requests = Arc::clone(&mock.requests);
        let auth = BearerAuth::new(mock).with_token(Token::new("t0k"));
        let client = build_client(Driver::Github, transport(auth)).unwrap();

        let repo = fetch_repository(&client, "octocat/hello-world").await.unwrap();

        assert_eq!(repo.name, "Hello-World");
        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].url.as_str(),
            "https://scm.example.com/repos/octocat/hello-world"
        );
        assert_eq!(requests[0].headers["authorization"], "Bearer t0k");
    }
}

mod repo {
    use super::*;

    #[tokio::test]
    async fn not_found_is_repository_error() {
        let mock = MockClient::new(404, r#"{"message": "Not Found"}"#);
        let client = build_client(Driver::Github, transport(mock)).unwrap();

        let error = fetch_repository(&client, "o/missing").await.unwrap_err();

        assert!(matches!(
            error,
            RunError::Repository {
                source: ScmError::NotFound,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn unsupported_provider_operation() {
        let client = build_client(Driver::Gitea, transport(MockClient::new(200, "{}"))).unwrap();

        let error = fetch_repository(&client, "o/r").await.unwrap_err();

        assert!(matches!(
            error,
            RunError::Repository {
                source: ScmError::NotSupported,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn render_includes_rate_snapshot() {
        let mock = MockClient::new(200, include_str!("driver/github/testdata/repo.json"));
        let client = build_client(Driver::Github, transport(mock)).unwrap();
        let repo = fetch_repository(&client, "octocat/hello-world").await.unwrap();

        let output = render_repository(&repo, client.rate()).unwrap();

        let (json, rate_line) = output.rsplit_once('\n').unwrap();
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["name"], "Hello-World");
        assert_eq!(rate_line, "rate: 4999/5000 remaining, resets at 1700000000");
    }
}

mod webhook {
    use super::*;

    const PUSH: &str = include_str!("driver/github/testdata/push.json");

    fn github() -> Client {
        build_client(Driver::Github, transport(MockClient::new(200, "{}"))).unwrap()
    }

    #[test]
    fn parses_unsigned_delivery_without_secret() {
        let hook = parse_webhook(
            &github(),
            PUSH.as_bytes().to_vec(),
            headers(&[("X-GitHub-Event", "push")]),
            None,
        )
        .unwrap();

        assert_eq!(hook.kind(), "push");
        let json = serde_json::to_value(&hook).unwrap();
        assert_eq!(json["kind"], "push");
        assert_eq!(json["event"]["ref"], "refs/heads/main");
    }

    #[test]
    fn verifies_signature_with_secret() {
        let signature = format!("sha256={}", sign(b"s3cr3t", PUSH.as_bytes()));

        let hook = parse_webhook(
            &github(),
            PUSH.as_bytes().to_vec(),
            headers(&[
                ("X-GitHub-Event", "push"),
                ("X-Hub-Signature-256", signature.as_str()),
            ]),
            Some("s3cr3t"),
        )
        .unwrap();

        assert_eq!(hook.kind(), "push");
    }

    #[test]
    fn rejects_unsigned_delivery_with_secret() {
        let error = parse_webhook(
            &github(),
            PUSH.as_bytes().to_vec(),
            headers(&[("X-GitHub-Event", "push")]),
            Some("s3cr3t"),
        )
        .unwrap_err();

        assert!(matches!(error, RunError::Webhook(ScmError::SignatureMismatch)));
    }

    #[test]
    fn azure_reads_event_from_body() {
        let client =
            build_client(Driver::Azure, transport(MockClient::new(200, "{}"))).unwrap();

        let hook = parse_webhook(
            &client,
            include_str!("driver/azure/testdata/pull_request_merged.json")
                .as_bytes()
                .to_vec(),
            HeaderMap::new(),
            Some("ignored"),
        )
        .unwrap();

        assert_eq!(hook.kind(), "pull_request");
    }

    #[test]
    fn unknown_event_is_webhook_error() {
        let error = parse_webhook(
            &github(),
            b"{}".to_vec(),
            headers(&[("X-GitHub-Event", "watch")]),
            None,
        )
        .unwrap_err();

        assert!(matches!(error, RunError::Webhook(ScmError::UnknownEvent(_))));
    }
}
