use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ScmError;
use crate::model::{
    Action, BranchHook, Comment, Commit, DeployHook, Driver, Issue, IssueCommentHook, IssueHook,
    PullRequest, PullRequestHook, PushHook, Reference, Review, ReviewCommentHook, Signature,
    TagHook, Webhook,
};
use crate::service::{self, SecretRequest, SecretResolver};
use crate::webhook::{decode, header, read_body, signature};

use super::WireUser;
use super::repo::{WireRepository, convert_repository};

const EVENT_HEADER: &str = "X-GitHub-Event";
const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
const SIGNATURE_PREFIX: &str = "sha256=";

/// Parses GitHub webhook deliveries.
///
/// The event is named by the `X-GitHub-Event` header; the signature is the
/// `X-Hub-Signature-256` header (`sha256=<hex>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookService;

/// Every `X-GitHub-Event` value this driver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Push,
    Create,
    Delete,
    PullRequest,
    Issues,
    IssueComment,
    ReviewComment,
    Deployment,
}

impl Event {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "push" => Self::Push,
            "create" => Self::Create,
            "delete" => Self::Delete,
            "pull_request" => Self::PullRequest,
            "issues" => Self::Issues,
            "issue_comment" => Self::IssueComment,
            "pull_request_review_comment" => Self::ReviewComment,
            "deployment" => Self::Deployment,
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

        tracing::debug!(event = name, bytes = data.len(), "Parsing GitHub webhook");

        let event = Event::from_name(name).ok_or_else(|| ScmError::UnknownEvent(name.to_string()))?;

        let secret_request = SecretRequest {
            driver: Driver::Github,
            event: name,
            headers: request.headers(),
        };
        signature::check(
            resolver,
            &secret_request,
            data,
            SIGNATURE_HEADER,
            Some(SIGNATURE_PREFIX),
        )?;

        match event {
            Event::Push => Ok(Webhook::Push(convert_push_hook(decode(name, data)?))),
            Event::Create => convert_ref_hook(decode(name, data)?, Action::Create),
            Event::Delete => convert_ref_hook(decode(name, data)?, Action::Delete),
            Event::PullRequest => Ok(Webhook::PullRequest(convert_pull_request_hook(
                decode(name, data)?,
            ))),
            Event::Issues => Ok(Webhook::Issue(convert_issue_hook(decode(name, data)?))),
            Event::IssueComment => Ok(Webhook::IssueComment(convert_issue_comment_hook(
                decode(name, data)?,
            ))),
            Event::ReviewComment => Ok(Webhook::ReviewComment(convert_review_comment_hook(
                decode(name, data)?,
            ))),
            Event::Deployment => Ok(Webhook::Deployment(convert_deployment_hook(decode(
                name, data,
            )?))),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PushEvent {
    #[serde(rename = "ref")]
    ref_name: String,
    base_ref: Option<String>,
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
    #[serde(deserialize_with = "crate::time::deserialize")]
    timestamp: Option<DateTime<Utc>>,
    url: String,
    author: WireCommitUser,
    committer: WireCommitUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireCommitUser {
    name: String,
    email: String,
    username: String,
}

/// Payload of `create` and `delete`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RefEvent {
    #[serde(rename = "ref")]
    ref_name: String,
    ref_type: String,
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
    body: Option<String>,
    state: String,
    draft: bool,
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
    repo: Option<WireBranchRepo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireBranchRepo {
    full_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IssueEvent {
    action: String,
    issue: WireIssue,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireIssue {
    number: i64,
    title: String,
    body: Option<String>,
    html_url: String,
    labels: Vec<WireLabel>,
    state: String,
    locked: bool,
    user: WireUser,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireLabel {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IssueCommentEvent {
    action: String,
    issue: WireIssue,
    comment: WireComment,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireComment {
    id: i64,
    body: String,
    user: WireUser,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReviewCommentEvent {
    action: String,
    pull_request: WirePullRequest,
    comment: WireReviewComment,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireReviewComment {
    id: i64,
    body: String,
    path: String,
    commit_id: String,
    line: Option<i64>,
    original_line: Option<i64>,
    html_url: String,
    user: WireUser,
    #[serde(deserialize_with = "crate::time::deserialize")]
    created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeploymentEvent {
    deployment: WireDeployment,
    repository: WireRepository,
    sender: WireUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireDeployment {
    id: i64,
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
    task: String,
    environment: String,
    description: Option<String>,
    payload: serde_json::Value,
    url: String,
}

fn convert_push_hook(src: PushEvent) -> PushHook {
    let commits: Vec<Commit> = src.commits.into_iter().map(convert_commit).collect();
    let commit = src
        .head_commit
        .map(convert_commit)
        .or_else(|| commits.last().cloned())
        .unwrap_or_default();

    PushHook {
        ref_name: src.ref_name,
        base_ref: src.base_ref.unwrap_or_default(),
        repo: convert_repository(src.repository),
        before: src.before,
        after: src.after,
        commit,
        commits,
        sender: src.sender.into(),
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

/// Converts `create`/`delete`; `ref_type` selects the tag or branch variant.
fn convert_ref_hook(src: RefEvent, action: Action) -> Result<Webhook, ScmError> {
    let prefix = match src.ref_type.as_str() {
        "tag" => "refs/tags/",
        "branch" => "refs/heads/",
        other => return Err(ScmError::UnknownEvent(format!("{action}:{other}"))),
    };
    let reference = Reference {
        path: format!("{prefix}{}", src.ref_name),
        name: src.ref_name,
        sha: String::new(),
    };
    let repo = convert_repository(src.repository);
    let sender = src.sender.into();

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
        sender: src.sender.into(),
    }
}

fn convert_pull_request(src: WirePullRequest) -> PullRequest {
    PullRequest {
        ref_name: format!("refs/pull/{}/head", src.number),
        number: src.number,
        title: src.title,
        body: src.body.unwrap_or_default(),
        sha: src.head.sha,
        source: src.head.ref_name,
        target: src.base.ref_name,
        fork: src.head.repo.map(|r| r.full_name).unwrap_or_default(),
        link: src.html_url,
        diff: src.diff_url,
        draft: src.draft,
        closed: src.state == "closed",
        merged: src.merged,
        author: src.user.into(),
        created: src.created_at,
        updated: src.updated_at,
    }
}

fn convert_issue_hook(src: IssueEvent) -> IssueHook {
    IssueHook {
        action: convert_action(&src.action),
        repo: convert_repository(src.repository),
        issue: convert_issue(src.issue),
        sender: src.sender.into(),
    }
}

fn convert_issue(src: WireIssue) -> Issue {
    Issue {
        number: src.number,
        title: src.title,
        body: src.body.unwrap_or_default(),
        link: src.html_url,
        labels: src.labels.into_iter().map(|l| l.name).collect(),
        closed: src.state == "closed",
        locked: src.locked,
        author: src.user.into(),
        created: src.created_at,
        updated: src.updated_at,
    }
}

fn convert_issue_comment_hook(src: IssueCommentEvent) -> IssueCommentHook {
    IssueCommentHook {
        action: convert_action(&src.action),
        repo: convert_repository(src.repository),
        issue: convert_issue(src.issue),
        comment: Comment {
            id: src.comment.id,
            body: src.comment.body,
            author: src.comment.user.into(),
            created: src.comment.created_at,
            updated: src.comment.updated_at,
        },
        sender: src.sender.into(),
    }
}

fn convert_review_comment_hook(src: ReviewCommentEvent) -> ReviewCommentHook {
    let comment = src.comment;
    ReviewCommentHook {
        action: convert_action(&src.action),
        repo: convert_repository(src.repository),
        pull_request: convert_pull_request(src.pull_request),
        review: Review {
            id: comment.id,
            body: comment.body,
            path: comment.path,
            sha: comment.commit_id,
            line: comment.line.or(comment.original_line).unwrap_or_default(),
            link: comment.html_url,
            author: comment.user.into(),
            created: comment.created_at,
            updated: comment.updated_at,
        },
        sender: src.sender.into(),
    }
}

fn convert_deployment_hook(src: DeploymentEvent) -> DeployHook {
    let deployment = src.deployment;
    DeployHook {
        number: deployment.id,
        desc: deployment.description.unwrap_or_default(),
        reference: Reference {
            name: deployment.ref_name.clone(),
            path: deployment.ref_name,
            sha: deployment.sha,
        },
        repo: convert_repository(src.repository),
        sender: src.sender.into(),
        target: deployment.environment,
        target_url: deployment.url,
        task: deployment.task,
        data: deployment.payload,
    }
}

fn convert_action(action: &str) -> Action {
    match action {
        "opened" => Action::Open,
        "reopened" => Action::Reopen,
        "closed" => Action::Close,
        "synchronize" => Action::Sync,
        "labeled" => Action::Label,
        "unlabeled" => Action::Unlabel,
        "edited" => Action::Edit,
        "created" => Action::Create,
        "deleted" => Action::Delete,
        _ => Action::Unknown,
    }
}
