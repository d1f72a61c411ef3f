use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::ScmError;
use crate::model::{
    Action, Comment, Commit, PullRequest, PullRequestCommentHook, PullRequestHook, PushHook,
    RefUpdate, Repository, Signature, User, Webhook,
};
use crate::service::{self, SecretResolver};
use crate::webhook::{body_field, decode, read_body};

const EVENT_FIELD: &str = "eventType";

/// Parses Azure DevOps service hook deliveries.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebhookService;

/// Every `eventType` this driver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Push,
    PullRequestCreated,
    PullRequestUpdated,
    PullRequestMerged,
    PullRequestComment,
}

impl Event {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "git.push" => Self::Push,
            "git.pullrequest.created" => Self::PullRequestCreated,
            "git.pullrequest.updated" => Self::PullRequestUpdated,
            "git.pullrequest.merged" => Self::PullRequestMerged,
            "ms.vss-code.git-pullrequest-comment-event" => Self::PullRequestComment,
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
        let name = body_field(data, EVENT_FIELD).unwrap_or_default();

        tracing::debug!(event = %name, bytes = data.len(), "Parsing Azure DevOps webhook");
        if resolver.is_some() {
            tracing::debug!(
                event = %name,
                "Azure DevOps deliveries are unsigned; secret not used, payload not verified"
            );
        }

        let event = Event::from_name(&name).ok_or_else(|| ScmError::UnknownEvent(name.clone()))?;

        let hook = match event {
            Event::Push => Webhook::Push(convert_push_hook(decode(&name, data)?)),
            Event::PullRequestCreated => {
                Webhook::PullRequest(convert_pull_request_hook(decode(&name, data)?, Action::Open))
            }
            Event::PullRequestUpdated => Webhook::PullRequest(convert_pull_request_hook(
                decode(&name, data)?,
                Action::Update,
            )),
            Event::PullRequestMerged => Webhook::PullRequest(convert_pull_request_hook(
                decode(&name, data)?,
                Action::Merge,
            )),
            Event::PullRequestComment => {
                Webhook::PullRequestComment(convert_comment_hook(decode(&name, data)?))
            }
        };
        Ok(hook)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PushEvent {
    resource: PushResource,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PushResource {
    commits: Vec<WireCommit>,
    pushed_by: WireIdentity,
    ref_updates: Vec<WireRefUpdate>,
    repository: WireRepository,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireCommit {
    commit_id: String,
    comment: String,
    url: String,
    author: WireGitUser,
    committer: WireGitUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireGitUser {
    name: String,
    email: String,
    #[serde(deserialize_with = "crate::time::deserialize")]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireRefUpdate {
    name: String,
    old_object_id: String,
    new_object_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireIdentity {
    id: String,
    display_name: String,
    unique_name: String,
    image_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireRepository {
    id: String,
    name: String,
    url: String,
    remote_url: String,
    default_branch: String,
    project: WireProject,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireProject {
    name: String,
}

/// Payload of the `git.pullrequest.*` events.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PullRequestEvent {
    resource: WirePullRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePullRequest {
    pull_request_id: i64,
    status: String,
    merge_status: String,
    is_draft: bool,
    title: String,
    description: String,
    source_ref_name: String,
    target_ref_name: String,
    last_merge_source_commit: WireCommitRef,
    created_by: WireIdentity,
    #[serde(deserialize_with = "crate::time::deserialize")]
    creation_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    closed_date: Option<DateTime<Utc>>,
    repository: WireRepository,
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireCommitRef {
    commit_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommentEvent {
    resource: CommentResource,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CommentResource {
    comment: WireComment,
    pull_request: WirePullRequest,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireComment {
    id: i64,
    content: String,
    author: WireIdentity,
    #[serde(deserialize_with = "crate::time::deserialize")]
    published_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "crate::time::deserialize")]
    last_updated_date: Option<DateTime<Utc>>,
}

/// Converts a push. The first ref update is the primary range; any further
/// updates are kept in `additional_refs`.
fn convert_push_hook(src: PushEvent) -> PushHook {
    let resource = src.resource;
    let mut refs = resource.ref_updates.into_iter().map(|r| RefUpdate {
        ref_name: r.name,
        before: r.old_object_id,
        after: r.new_object_id,
    });
    let primary = refs.next().unwrap_or_default();
    let commits: Vec<Commit> = resource.commits.into_iter().map(convert_commit).collect();

    PushHook {
        ref_name: primary.ref_name,
        base_ref: String::new(),
        repo: convert_repository(resource.repository),
        before: primary.before,
        after: primary.after,
        commit: commits.first().cloned().unwrap_or_default(),
        commits,
        sender: convert_identity(resource.pushed_by),
        additional_refs: refs.collect(),
    }
}

fn convert_commit(src: WireCommit) -> Commit {
    Commit {
        sha: src.commit_id,
        message: src.comment,
        author: convert_git_user(src.author),
        committer: convert_git_user(src.committer),
        link: src.url,
    }
}

// Azure commit identities carry no login; the display name stands in.
fn convert_git_user(src: WireGitUser) -> Signature {
    Signature {
        login: src.name.clone(),
        name: src.name,
        email: src.email,
        date: src.date,
        avatar: String::new(),
    }
}

fn convert_identity(src: WireIdentity) -> User {
    User {
        login: if src.unique_name.is_empty() {
            src.id
        } else {
            src.unique_name.clone()
        },
        name: src.display_name,
        email: src.unique_name,
        avatar: src.image_url,
    }
}

fn convert_repository(src: WireRepository) -> Repository {
    Repository {
        id: src.id,
        namespace: src.project.name,
        name: src.name,
        branch: short_branch(&src.default_branch).to_string(),
        clone: src.remote_url.clone(),
        link: if src.remote_url.is_empty() {
            src.url
        } else {
            src.remote_url
        },
        ..Repository::default()
    }
}

fn convert_pull_request_hook(src: PullRequestEvent, action: Action) -> PullRequestHook {
    let mut pr = src.resource;
    let repo = convert_repository(std::mem::take(&mut pr.repository));
    let sender = convert_identity(pr.created_by.clone());

    PullRequestHook {
        action,
        repo,
        pull_request: convert_pull_request(pr),
        sender,
    }
}

fn convert_pull_request(src: WirePullRequest) -> PullRequest {
    PullRequest {
        number: src.pull_request_id,
        title: src.title,
        body: src.description,
        sha: src.last_merge_source_commit.commit_id,
        ref_name: format!("refs/pull/{}/merge", src.pull_request_id),
        source: short_branch(&src.source_ref_name).to_string(),
        target: short_branch(&src.target_ref_name).to_string(),
        fork: String::new(),
        link: src.url,
        diff: String::new(),
        draft: src.is_draft,
        closed: !src.status.is_empty() && src.status != "active",
        merged: src.status == "completed" && src.merge_status == "succeeded",
        author: convert_identity(src.created_by),
        created: src.creation_date,
        updated: src.closed_date.or(src.creation_date),
    }
}

fn convert_comment_hook(src: CommentEvent) -> PullRequestCommentHook {
    let CommentResource {
        comment,
        mut pull_request,
    } = src.resource;
    let repo = convert_repository(std::mem::take(&mut pull_request.repository));
    let author = convert_identity(comment.author);

    PullRequestCommentHook {
        action: Action::Create,
        repo,
        pull_request: convert_pull_request(pull_request),
        comment: Comment {
            id: comment.id,
            body: comment.content,
            author: author.clone(),
            created: comment.published_date,
            updated: comment.last_updated_date,
        },
        sender: author,
    }
}

/// Strips `refs/heads/` from a branch ref.
fn short_branch(name: &str) -> &str {
    name.strip_prefix("refs/heads/").unwrap_or(name)
}
