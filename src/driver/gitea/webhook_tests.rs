use http::Request;

use super::WebhookService;
use crate::ScmError;
use crate::model::{Action, Visibility, Webhook};
use crate::service::{StaticSecret, WebhookService as _};
use crate::webhook::signature::sign;

const SECRET: &str = "gitea-secret";

fn delivery(event: &str, body: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method("POST")
        .uri("/hook")
        .header("X-Gitea-Event", event)
        .header("X-Gitea-Delivery", "f6266f16-1bf3-46a5-9ea4-602e06ead473")
        .body(body.as_bytes().to_vec())
        .unwrap()
}

fn signed(event: &str, body: &str, signature: &str) -> Request<Vec<u8>> {
    let mut request = delivery(event, body);
    request
        .headers_mut()
        .insert("X-Gitea-Signature", signature.parse().unwrap());
    request
}

fn parse(event: &str, body: &str) -> Result<Webhook, ScmError> {
    WebhookService.parse(&delivery(event, body), None)
}

mod variants {
    use super::*;

    #[test]
    fn push() {
        let hook = parse("push", include_str!("testdata/push.json")).unwrap();

        let Webhook::Push(push) = hook else {
            panic!("expected push, got {hook:?}");
        };
        assert_eq!(push.ref_name, "refs/heads/main");
        assert_eq!(push.before, "aaa111");
        assert_eq!(push.after, "bbb222");
        assert_eq!(push.commits.len(), 1);
        let commit = &push.commits[0];
        assert_eq!(commit.sha, "bbb222");
        assert_eq!(commit.author, commit.committer);
        assert_eq!(commit.author.login, "gitea");
        assert_eq!(
            commit.author.date.unwrap().to_rfc3339(),
            "2017-12-21T09:03:40+00:00"
        );
        assert_eq!(push.commit, *commit);
        assert_eq!(push.repo.id, "41");
        assert_eq!(push.repo.full_name(), "gitea/webhooks");
        assert_eq!(push.repo.visibility, Visibility::Public);
        assert_eq!(push.repo.clone_ssh, "git@try.gitea.io:gitea/webhooks.git");
        assert_eq!(push.sender.login, "gitea");
        assert_eq!(push.sender.name, "Gitea");
    }

    #[test]
    fn create_tag() {
        let hook = parse("create", include_str!("testdata/create_tag.json")).unwrap();

        let Webhook::Tag(tag) = hook else {
            panic!("expected tag, got {hook:?}");
        };
        assert_eq!(tag.action, Action::Create);
        assert_eq!(tag.reference.name, "v1.0.0");
        assert_eq!(tag.reference.path, "refs/tags/v1.0.0");
        assert_eq!(tag.reference.sha, "bbb222");
    }

    #[test]
    fn delete_branch() {
        let hook = parse("delete", include_str!("testdata/delete_branch.json")).unwrap();

        let Webhook::Branch(branch) = hook else {
            panic!("expected branch, got {hook:?}");
        };
        assert_eq!(branch.action, Action::Delete);
        assert_eq!(branch.reference.path, "refs/heads/feature");
        assert_eq!(branch.repo.name, "webhooks");
    }

    #[test]
    fn pull_request_opened() {
        let hook = parse("pull_request", include_str!("testdata/pull_request_opened.json")).unwrap();

        let Webhook::PullRequest(hook) = hook else {
            panic!("expected pull request, got {hook:?}");
        };
        assert_eq!(hook.action, Action::Open);
        let pr = &hook.pull_request;
        assert_eq!(pr.number, 1);
        assert_eq!(pr.ref_name, "refs/pull/1/head");
        assert_eq!(pr.sha, "bbb222");
        assert_eq!(pr.source, "feature");
        assert_eq!(pr.target, "main");
        assert_eq!(pr.fork, "contributor/webhooks");
        assert_eq!(pr.diff, "https://try.gitea.io/gitea/webhooks/pulls/1.diff");
        assert!(!pr.closed);
        assert!(!pr.merged);
    }
}

mod actions {
    use super::*;

    fn action_of(name: &str) -> Action {
        let body = serde_json::json!({"action": name, "pull_request": {"number": 3}});
        match parse("pull_request", &body.to_string()).unwrap() {
            Webhook::PullRequest(hook) => hook.action,
            other => panic!("expected pull request, got {other:?}"),
        }
    }

    #[test]
    fn gitea_action_names() {
        assert_eq!(action_of("opened"), Action::Open);
        assert_eq!(action_of("reopened"), Action::Reopen);
        assert_eq!(action_of("closed"), Action::Close);
        assert_eq!(action_of("synchronized"), Action::Sync);
        assert_eq!(action_of("label_updated"), Action::Label);
        assert_eq!(action_of("label_cleared"), Action::Unlabel);
        assert_eq!(action_of("edited"), Action::Edit);
    }

    #[test]
    fn unrecognized_action_is_unknown() {
        assert_eq!(action_of("assigned"), Action::Unknown);
        assert_eq!(action_of("synchronize"), Action::Unknown);
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn unsupported_event_is_unknown() {
        let err = parse("issues", "{}").unwrap_err();

        assert!(matches!(err, ScmError::UnknownEvent(ref name) if name == "issues"));
    }

    #[test]
    fn missing_header_is_unknown() {
        let request = Request::builder()
            .method("POST")
            .body(b"{}".to_vec())
            .unwrap();

        let err = WebhookService.parse(&request, None).unwrap_err();

        assert!(err.is_unknown_event());
    }

    #[test]
    fn unknown_ref_type_is_unknown() {
        let err = parse("create", r#"{"ref": "x", "ref_type": "note"}"#).unwrap_err();

        assert!(matches!(err, ScmError::UnknownEvent(ref name) if name == "create:note"));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let err = parse("push", "[1, 2").unwrap_err();

        assert!(matches!(err, ScmError::Decode { ref event, .. } if event == "push"));
    }
}

mod signatures {
    use super::*;

    const BODY: &str = include_str!("testdata/push.json");

    #[test]
    fn bare_hex_signature_is_accepted() {
        let request = signed("push", BODY, &sign(SECRET.as_bytes(), BODY.as_bytes()));

        let hook = WebhookService
            .parse(&request, Some(&StaticSecret::new(SECRET)))
            .unwrap();

        assert_eq!(hook.kind(), "push");
    }

    #[test]
    fn prefixed_signature_is_rejected() {
        let value = format!("sha256={}", sign(SECRET.as_bytes(), BODY.as_bytes()));
        let request = signed("push", BODY, &value);

        let result = WebhookService.parse(&request, Some(&StaticSecret::new(SECRET)));

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let request = signed("push", BODY, &sign(b"other", BODY.as_bytes()));

        let result = WebhookService.parse(&request, Some(&StaticSecret::new(SECRET)));

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }

    #[test]
    fn missing_signature_is_rejected() {
        let result = WebhookService.parse(
            &delivery("push", BODY),
            Some(&StaticSecret::new(SECRET)),
        );

        assert!(matches!(result, Err(ScmError::SignatureMismatch)));
    }

    #[test]
    fn empty_secret_skips_verification() {
        let result = WebhookService.parse(&delivery("push", BODY), Some(&StaticSecret::new("")));

        assert!(result.is_ok());
    }
}
