//! Tests for `ReqwestClient`.
//!
//! These cover construction only; requests against real servers are left to
//! manual testing.

use super::*;

mod reqwest_client {
    use super::*;

    #[test]
    fn default_creates_same_as_new() {
        let client1 = ReqwestClient::new();
        let client2 = ReqwestClient::default();

        assert!(format!("{client1:?}").contains("ReqwestClient"));
        assert!(format!("{client2:?}").contains("ReqwestClient"));
    }

    #[test]
    fn from_client_accepts_custom_client() {
        let custom = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let client = ReqwestClient::from_client(custom);

        let _ = format!("{client:?}");
    }

    #[test]
    fn empty_proxy_builds_direct_client() {
        assert!(ReqwestClient::with_proxy("").is_ok());
    }

    #[test]
    fn valid_proxy_builds_client() {
        assert!(ReqwestClient::with_proxy("http://proxy.internal:3128").is_ok());
    }

    #[test]
    fn invalid_proxy_is_rejected() {
        let result = ReqwestClient::with_proxy("not a url");

        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ReqwestClient>();
    }
}
