use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ScmError;
use crate::model::{
    Action, BranchHook, Commit, Driver, PullRequest, PullRequestHook, PushHook, Reference,
    Repository, Signature, TagHook, User, Visibility, Webhook,
};
use crate::service::{self, SecretRequest, SecretResolver};
use crate::webhook::{decode, header, read_body, signature};

const EVENT_HEADER: &str = "X-Gitea-Event";
const SIGNATURE_HEADER: &str = "X-Gitea-Signature";

/// Parses Gitea webhook deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Push,
    Create,
    Delete,
    PullRequest,
}

impl Event {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "push" => Self::Push,
            "create" => Self::Create,
            "delete" => Self::Delete,
            "pull_request" => Self::PullRequest,
            _ => return None,
        })
    }
}

impl service::WebhookService for WebhookService {
    fn parse(
        &self,
        request: &http::Request<Vec<u8>>,
        resolver: Option<&dyn SecretResolver>,
    ) -> Result<Webhook, ScmError> {
        let data = read_body(request.body());
        let name = header(request.headers(), EVENT_HEADER).unwrap_or_default();

        tracing::debug!(event = name, bytes = data.len(), "Parsing Gitea webhook");

        let event = Event::from_name(name).ok_or_else(|| ScmError::UnknownEvent(name.to_string()))?;

        let secret_request = SecretRequest {
            driver: Driver::Gitea,
            event: name,
            headers: request.headers(),
        };
        signature::check(resolver, &secret_request, data, SIGNATURE_HEADER, None)?;

        match event {
            Event::Push => Ok(Webhook::Push(convert_push_hook(decode(name, data)?))),
            Event::Create => convert_ref_hook(decode(name, data)?, Action::Create),
            Event::Delete => convert_ref_hook(decode(name, data)?, Action::Delete),
            Event::PullRequest => Ok(Webhook::PullRequest(convert_pull_request_hook(
                decode(name, data)?,
            ))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireUser {
    login: String,
    username: String,
    full_name: String,
    email: String,
    avatar_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireRepository {
    id: i64,
    owner: WireUser,
    name: String,
    full_name: String,
    private: bool,
    default_branch: String,
    html_url: String,
    clone_url: String,
    ssh_url: String,
    archived: bool,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PushEvent {
    #[serde(rename = "ref")]
    ref_name: String,
    before: String,
    after: String,
    head_commit: Option<WireCommit>,
    commits: Vec<WireCommit>,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCommit {
    id: String,
    message: String,
    url: String,
    author: WireCommitUser,
    committer: WireCommitUser,
    #[serde(deserialize_with = "crate::time::deserialize")]
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCommitUser {
    name: String,
    email: String,
    username: String,
}

/// Payload of `create` and `delete`. `ref` is the short name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RefEvent {
    #[serde(rename = "ref")]
    ref_name: String,
    ref_type: String,
    sha: String,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestEvent {
    action: String,
    pull_request: WirePullRequest,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WirePullRequest {
    number: i64,
    title: String,
    body: String,
    state: String,
    merged: bool,
    html_url: String,
    diff_url: String,
    user: WireUser,
    head: WireBranch,
    base: WireBranch,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireBranch {
    #[serde(rename = "ref")]
    ref_name: String,
    sha: String,
    repo: Option<WireRepository>,
}

fn convert_push_hook(src: PushEvent) -> PushHook {
    let commits: Vec<Commit> = src.commits.into_iter().map(convert_commit).collect();
    let commit = src
        .head_commit
        .map(convert_commit)
        .or_else(|| commits.first().cloned())
        .unwrap_or_default();

    PushHook {
        ref_name: src.ref_name,
        base_ref: String::new(),
        repo: convert_repository(src.repository),
        before: src.before,
        after: src.after,
        commit,
        commits,
        sender: convert_user(src.sender),
        additional_refs: Vec::new(),
    }
}

fn convert_commit(src: WireCommit) -> Commit {
    Commit {
        sha: src.id,
        message: src.message,
        author: convert_signature(src.author, src.timestamp),
        committer: convert_signature(src.committer, src.timestamp),
        link: src.url,
    }
}

fn convert_signature(src: WireCommitUser, date: Option<DateTime<Utc>>) -> Signature {
    Signature {
        login: src.username,
        name: src.name,
        email: src.email,
        date,
        avatar: String::new(),
    }
}

// Older Gitea releases send `username` instead of `login`.
fn convert_user(src: WireUser) -> User {
    User {
        login: if src.login.is_empty() {
            src.username
        } else {
            src.login
        },
        name: src.full_name,
        email: src.email,
        avatar: src.avatar_url,
    }
}

fn convert_repository(src: WireRepository) -> Repository {
    let owner = convert_user(src.owner);
    let namespace = if owner.login.is_empty() {
        src.full_name
            .split_once('/')
            .map(|(ns, _)| ns.to_string())
            .unwrap_or_default()
    } else {
        owner.login
    };
    let visibility = match (src.id, src.private) {
        (0, _) => Visibility::Undefined,
        (_, true) => Visibility::Private,
        (_, false) => Visibility::Public,
    };

    Repository {
        id: if src.id == 0 {
            String::new()
        } else {
            src.id.to_string()
        },
        namespace,
        name: src.name,
        perm: None,
        branch: src.default_branch,
        archived: src.archived,
        private: src.private,
        visibility,
        clone: src.clone_url,
        clone_ssh: src.ssh_url,
        link: src.html_url,
        created: src.created_at,
        updated: src.updated_at,
    }
}

fn convert_ref_hook(src: RefEvent, action: Action) -> Result<Webhook, ScmError> {
    let prefix = match src.ref_type.as_str() {
        "tag" => "refs/tags/",
        "branch" => "refs/heads/",
        other => return Err(ScmError::UnknownEvent(format!("{action}:{other}"))),
    };
    let reference = Reference {
        path: format!("{prefix}{}", src.ref_name),
        name: src.ref_name,
        sha: src.sha,
    };
    let repo = convert_repository(src.repository);
    let sender = convert_user(src.sender);

    Ok(if src.ref_type == "tag" {
        Webhook::Tag(TagHook {
            reference,
            repo,
            action,
            sender,
        })
    } else {
        Webhook::Branch(BranchHook {
            reference,
            repo,
            action,
            sender,
        })
    })
}

fn convert_pull_request_hook(src: PullRequestEvent) -> PullRequestHook {
    PullRequestHook {
        action: convert_action(&src.action),
        repo: convert_repository(src.repository),
        pull_request: convert_pull_request(src.pull_request),
        sender: convert_user(src.sender),
    }
}

fn convert_pull_request(src: WirePullRequest) -> PullRequest {
    PullRequest {
        ref_name: format!("refs/pull/{}/head", src.number),
        number: src.number,
        title: src.title,
        body: src.body,
        sha: src.head.sha,
        source: src.head.ref_name,
        target: src.base.ref_name,
        fork: src.head.repo.map(|r| r.full_name).unwrap_or_default(),
        link: src.html_url,
        diff: src.diff_url,
        draft: false,
        closed: src.state == "closed",
        merged: src.merged,
        author: convert_user(src.user),
        created: src.created_at,
        updated: src.updated_at,
    }
}

fn convert_action(action: &str) -> Action {
    match action {
        "opened" => Action::Open,
        "reopened" => Action::Reopen,
        "closed" => Action::Close,
        "synchronized" => Action::Sync,
        "label_updated" => Action::Label,
        "label_cleared" => Action::Unlabel,
        "edited" => Action::Edit,
        _ => Action::Unknown,
    }
}
