use std::sync::{Arc, Mutex};

use http::Request;
use serde_json::json;

use super::WebhookService;
use crate::ScmError;
use crate::model::{Action, Webhook};
use crate::service::{SecretRequest, WebhookService as _};

fn delivery(body: &str) -> Request<Vec<u8>> {
    Request::builder()
        .method("POST")
        .uri("/hook")
        .header("Content-Type", "application/json")
        .body(body.as_bytes().to_vec())
        .unwrap()
}

fn parse(body: &str) -> Result<Webhook, ScmError> {
    WebhookService.parse(&delivery(body), None)
}

mod push {
    use super::*;

    #[test]
    fn fixture() {
        let hook = parse(include_str!("testdata/push.json")).unwrap();

        let Webhook::Push(push) = hook else {
            panic!("expected push, got {hook:?}");
        };
        assert_eq!(push.ref_name, "refs/heads/main");
        assert_eq!(push.before, "aad331d8d3b131fa9ae03cf5e53965b51942618a");
        assert_eq!(push.after, "33b55f7cb7e7e245323987634f960cf4a6e6bc74");
        assert_eq!(push.repo.id, "278d5cd2-584d-4b63-824a-2ba458937249");
        assert_eq!(push.repo.namespace, "Fabrikam-Fiber-Git");
        assert_eq!(push.repo.name, "Fabrikam-Fiber-Git");
        assert_eq!(push.repo.branch, "main");
        assert_eq!(
            push.repo.link,
            "https://fabrikam-fiber-inc.visualstudio.com/DefaultCollection/_git/Fabrikam-Fiber-Git"
        );
        assert_eq!(push.sender.name, "Jamal Hartnett");
        assert_eq!(push.commits.len(), 1);
        assert_eq!(push.commit.message, "Fixed bug in web.config file");
        assert_eq!(push.commit.author.email, "fabrikamfiber4@hotmail.com");
        assert!(push.commit.author.date.is_some());
        assert!(push.additional_refs.is_empty());
    }

    #[test]
    fn single_commit_range() {
        let body = json!({
            "eventType": "git.push",
            "resource": {
                "refUpdates": [
                    {"name": "refs/heads/main", "oldObjectId": "aaa111", "newObjectId": "bbb222"}
                ],
                "commits": [{
                    "commitId": "bbb222",
                    "comment": "update readme",
                    "author": {"name": "Jane", "email": "jane@example.com", "date": "2024-01-02T03:04:05Z"},
                    "committer": {"name": "Jane", "email": "jane@example.com", "date": "2024-01-02T03:04:05Z"}
                }],
                "repository": {"id": "r1", "name": "widgets", "project": {"name": "acme"}},
                "pushedBy": {"id": "u1", "displayName": "Jane", "uniqueName": "jane@example.com"}
            }
        });

        let hook = parse(&body.to_string()).unwrap();

        let Webhook::Push(push) = hook else {
            panic!("expected push, got {hook:?}");
        };
        assert_eq!(push.ref_name, "refs/heads/main");
        assert_eq!(push.before, "aaa111");
        assert_eq!(push.after, "bbb222");
        assert_eq!(push.commits.len(), 1);
        assert_eq!(push.commits[0].author, push.commits[0].committer);
        assert_eq!(push.commit, push.commits[0]);
        assert_eq!(push.sender.login, "jane@example.com");
        assert_eq!(push.repo.full_name(), "acme/widgets");
    }

    #[test]
    fn extra_ref_updates_are_kept() {
        let body = json!({
            "eventType": "git.push",
            "resource": {
                "refUpdates": [
                    {"name": "refs/heads/main", "oldObjectId": "aaa111", "newObjectId": "bbb222"},
                    {"name": "refs/tags/v1", "oldObjectId": "000000", "newObjectId": "bbb222"}
                ]
            }
        });

        let Webhook::Push(push) = parse(&body.to_string()).unwrap() else {
            panic!("expected push");
        };
        assert_eq!(push.ref_name, "refs/heads/main");
        assert_eq!(push.additional_refs.len(), 1);
        assert_eq!(push.additional_refs[0].ref_name, "refs/tags/v1");
        assert_eq!(push.additional_refs[0].before, "000000");
    }

    #[test]
    fn no_ref_updates_leaves_range_empty() {
        let body = json!({"eventType": "git.push", "resource": {"refUpdates": []}});

        let Webhook::Push(push) = parse(&body.to_string()).unwrap() else {
            panic!("expected push");
        };
        assert!(push.ref_name.is_empty());
        assert!(push.before.is_empty());
        assert!(push.after.is_empty());
        assert!(push.commits.is_empty());
        assert_eq!(push.commit, crate::model::Commit::default());
    }
}

mod pull_request {
    use super::*;

    #[test]
    fn created_is_open() {
        let hook = parse(include_str!("testdata/pull_request_created.json")).unwrap();

        let Webhook::PullRequest(hook) = hook else {
            panic!("expected pull request, got {hook:?}");
        };
        assert_eq!(hook.action, Action::Open);
        let pr = &hook.pull_request;
        assert_eq!(pr.number, 1);
        assert_eq!(pr.title, "my first pull request");
        assert_eq!(pr.sha, "53d54ac915144006c2c9e90d2c7d3880920db49c");
        assert_eq!(pr.ref_name, "refs/pull/1/merge");
        assert_eq!(pr.source, "mytopic");
        assert_eq!(pr.target, "master");
        assert!(!pr.closed);
        assert!(!pr.merged);
        assert!(pr.created.is_some());
        assert_eq!(pr.author.login, "fabrikamfiber4@hotmail.com");
        assert_eq!(hook.sender, pr.author);
        assert_eq!(hook.repo.namespace, "Fabrikam");
        assert_eq!(hook.repo.branch, "master");
    }

    #[test]
    fn updated_is_update() {
        let Webhook::PullRequest(hook) =
            parse(include_str!("testdata/pull_request_updated.json")).unwrap()
        else {
            panic!("expected pull request");
        };
        assert_eq!(hook.action, Action::Update);
    }

    #[test]
    fn merged_is_merge() {
        let hook = parse(include_str!("testdata/pull_request_merged.json")).unwrap();

        let Webhook::PullRequest(hook) = hook else {
            panic!("expected pull request, got {hook:?}");
        };
        assert_eq!(hook.action, Action::Merge);
        assert!(hook.pull_request.closed);
        assert!(hook.pull_request.merged);
        assert_eq!(
            hook.pull_request.updated.unwrap().to_rfc3339(),
            "2014-06-17T17:02:00+00:00"
        );
    }

    #[test]
    fn comment() {
        let hook = parse(include_str!("testdata/pull_request_comment.json")).unwrap();

        let Webhook::PullRequestComment(hook) = hook else {
            panic!("expected pull request comment, got {hook:?}");
        };
        assert_eq!(hook.action, Action::Create);
        assert_eq!(hook.comment.id, 2);
        assert_eq!(hook.comment.body, "This is my comment");
        assert_eq!(hook.comment.author.name, "Jamal Hartnett");
        assert_eq!(hook.sender, hook.comment.author);
        assert_eq!(hook.pull_request.number, 1);
        assert_eq!(hook.repo.name, "Fabrikam");
    }

    #[test]
    fn sparse_payload_degrades_to_defaults() {
        let body = json!({"eventType": "git.pullrequest.created"});

        let Webhook::PullRequest(hook) = parse(&body.to_string()).unwrap() else {
            panic!("expected pull request");
        };
        assert_eq!(hook.action, Action::Open);
        assert_eq!(hook.pull_request.number, 0);
        assert!(hook.pull_request.created.is_none());
        assert!(hook.repo.id.is_empty());
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn unsupported_event_is_unknown() {
        let body = json!({"eventType": "some.unsupported.event", "resource": {}});

        let err = parse(&body.to_string()).unwrap_err();

        assert!(err.is_unknown_event());
        assert!(matches!(err, ScmError::UnknownEvent(ref name) if name == "some.unsupported.event"));
    }

    #[test]
    fn missing_event_type_is_unknown() {
        let err = parse(r#"{"resource": {}}"#).unwrap_err();

        assert!(matches!(err, ScmError::UnknownEvent(ref name) if name.is_empty()));
    }

    #[test]
    fn non_json_body_is_unknown() {
        let err = parse("definitely not json").unwrap_err();

        assert!(err.is_unknown_event());
    }

    #[test]
    fn malformed_resource_is_decode_error() {
        let body = json!({"eventType": "git.push", "resource": {"refUpdates": "nope"}});

        let err = parse(&body.to_string()).unwrap_err();

        assert!(matches!(err, ScmError::Decode { ref event, .. } if event == "git.push"));
    }

    fn always_wrong(_: &SecretRequest<'_>) -> Option<String> {
        Some("never-matches".to_string())
    }

    #[test]
    fn resolver_is_not_consulted() {
        let request = delivery(include_str!("testdata/pull_request_created.json"));

        let hook = WebhookService.parse(&request, Some(&always_wrong)).unwrap();

        assert_eq!(hook.kind(), "pull_request");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn logs_while(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn unused_secret_is_logged() {
        let request = delivery(include_str!("testdata/pull_request_created.json"));

        let logs = logs_while(|| {
            WebhookService.parse(&request, Some(&always_wrong)).unwrap();
        });

        assert!(logs.contains("secret not used"));
    }

    #[test]
    fn no_resolver_logs_nothing_about_secrets() {
        let request = delivery(include_str!("testdata/pull_request_created.json"));

        let logs = logs_while(|| {
            WebhookService.parse(&request, None).unwrap();
        });

        assert!(logs.contains("Parsing Azure DevOps webhook"));
        assert!(!logs.contains("secret not used"));
    }
}
