use super::signature::*;
use crate::ScmError;
use crate::model::Driver;
use crate::service::{SecretRequest, StaticSecret};
use http::{HeaderMap, HeaderValue};

const PAYLOAD: &[u8] = br#"{"zen":"Keep it logically awesome."}"#;

fn request<'a>(headers: &'a HeaderMap) -> SecretRequest<'a> {
    SecretRequest {
        driver: Driver::Github,
        event: "ping",
        headers,
    }
}

fn signed_headers(name: &'static str, value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(name, HeaderValue::from_str(value).unwrap());
    headers
}

mod primitives {
    use super::*;

    #[test]
    fn sign_matches_known_vector() {
        // RFC 4231 test case 2
        let mac = sign(b"Jefe", b"what do ya want for nothing?");

        assert_eq!(
            mac,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_accepts_own_signature() {
        let mac = sign(b"secret", PAYLOAD);

        assert!(verify(b"secret", PAYLOAD, &mac));
        assert!(verify(b"secret", PAYLOAD, &mac.to_uppercase()));
    }

    #[test]
    fn verify_rejects_other_secret_and_garbage() {
        let mac = sign(b"secret", PAYLOAD);

        assert!(!verify(b"other", PAYLOAD, &mac));
        assert!(!verify(b"secret", b"tampered", &mac));
        assert!(!verify(b"secret", PAYLOAD, "not-hex"));
        assert!(!verify(b"secret", PAYLOAD, ""));
    }
}

mod check_step {
    use super::*;

    #[test]
    fn no_resolver_skips_verification() {
        let headers = HeaderMap::new();

        assert!(check(None, &request(&headers), PAYLOAD, "X-Hub-Signature-256", None).is_ok());
    }

    #[test]
    fn empty_secret_skips_verification() {
        let headers = HeaderMap::new();
        let resolver = StaticSecret::new("");

        let result = check(
            Some(&resolver),
            &request(&headers),
            PAYLOAD,
            "X-Hub-Signature-256",
            Some("sha256="),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn prefixed_signature_is_accepted() {
        let value = format!("sha256={}", sign(b"topsecret", PAYLOAD));
        let headers = signed_headers("X-Hub-Signature-256", &value);
        let resolver = StaticSecret::new("topsecret");

        let result = check(
            Some(&resolver),
            &request(&headers),
            PAYLOAD,
            "X-Hub-Signature-256",
            Some("sha256="),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let headers = signed_headers("X-Hub-Signature-256", &sign(b"topsecret", PAYLOAD));
        let resolver = StaticSecret::new("topsecret");

        let result = check(
            Some(&resolver),
            &request(&headers),
            PAYLOAD,
            "X-Hub-Signature-256",
            Some("sha256="),
        );

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }

    #[test]
    fn missing_header_is_rejected() {
        let headers = HeaderMap::new();
        let resolver = StaticSecret::new("topsecret");

        let result = check(
            Some(&resolver),
            &request(&headers),
            PAYLOAD,
            "X-Gitea-Signature",
            None,
        );

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }

    #[test]
    fn wrong_signature_is_rejected() {
        let headers = signed_headers("X-Gitea-Signature", &sign(b"other", PAYLOAD));
        let resolver = StaticSecret::new("topsecret");

        let result = check(
            Some(&resolver),
            &request(&headers),
            PAYLOAD,
            "X-Gitea-Signature",
            None,
        );

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }
}
