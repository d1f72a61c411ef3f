use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Comment, Commit, Issue, PullRequest, Reference, Repository, Review, User};

/// What happened to the subject of a webhook event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Unknown,
    Create,
    Update,
    Delete,
    Open,
    Reopen,
    Close,
    Label,
    Unlabel,
    Sync,
    Merge,
    Edit,
}

impl Action {
    /// Returns the lowercase action name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Open => "open",
            Self::Reopen => "reopen",
            Self::Close => "close",
            Self::Label => "label",
            Self::Unlabel => "unlabel",
            Self::Sync => "sync",
            Self::Merge => "merge",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ref range moved by a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefUpdate {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub before: String,
    pub after: String,
}

/// Commits pushed to a branch or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushHook {
    /// Primary ref, e.g. `refs/heads/main`.
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub base_ref: String,
    pub repo: Repository,
    pub before: String,
    pub after: String,
    /// Head commit of the push.
    pub commit: Commit,
    pub commits: Vec<Commit>,
    pub sender: User,
    /// Ref updates beyond the primary one, when the provider batches them.
    pub additional_refs: Vec<RefUpdate>,
}

/// A branch was created or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchHook {
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub action: Action,
    pub sender: User,
}

/// A tag was created or deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHook {
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub action: Action,
    pub sender: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub sender: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueHook {
    pub action: Action,
    pub repo: Repository,
    pub issue: Issue,
    pub sender: User,
}

/// A comment on an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub issue: Issue,
    pub comment: Comment,
    pub sender: User,
}

/// A conversation comment on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub comment: Comment,
    pub sender: User,
}

/// A line comment on a pull request diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCommentHook {
    pub action: Action,
    pub repo: Repository,
    pub pull_request: PullRequest,
    pub review: Review,
    pub sender: User,
}

/// A deployment was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployHook {
    pub number: i64,
    pub desc: String,
    #[serde(rename = "ref")]
    pub reference: Reference,
    pub repo: Repository,
    pub sender: User,
    /// Target environment.
    pub target: String,
    pub target_url: String,
    pub task: String,
    /// Free-form deployment payload.
    pub data: serde_json::Value,
}

/// A normalized webhook event.
///
/// Every successfully parsed delivery becomes exactly one variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum Webhook {
    Push(PushHook),
    Tag(TagHook),
    Branch(BranchHook),
    PullRequest(PullRequestHook),
    IssueComment(IssueCommentHook),
    PullRequestComment(PullRequestCommentHook),
    ReviewComment(ReviewCommentHook),
    Issue(IssueHook),
    Deployment(DeployHook),
}

impl Webhook {
    /// Returns the repository the event belongs to.
    #[must_use]
    pub const fn repository(&self) -> &Repository {
        match self {
            Self::Push(h) => &h.repo,
            Self::Tag(h) => &h.repo,
            Self::Branch(h) => &h.repo,
            Self::PullRequest(h) => &h.repo,
            Self::IssueComment(h) => &h.repo,
            Self::PullRequestComment(h) => &h.repo,
            Self::ReviewComment(h) => &h.repo,
            Self::Issue(h) => &h.repo,
            Self::Deployment(h) => &h.repo,
        }
    }

    /// Returns the user that triggered the event.
    #[must_use]
    pub const fn sender(&self) -> &User {
        match self {
            Self::Push(h) => &h.sender,
            Self::Tag(h) => &h.sender,
            Self::Branch(h) => &h.sender,
            Self::PullRequest(h) => &h.sender,
            Self::IssueComment(h) => &h.sender,
            Self::PullRequestComment(h) => &h.sender,
            Self::ReviewComment(h) => &h.sender,
            Self::Issue(h) => &h.sender,
            Self::Deployment(h) => &h.sender,
        }
    }

    /// Returns the variant name in snake case.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Push(_) => "push",
            Self::Tag(_) => "tag",
            Self::Branch(_) => "branch",
            Self::PullRequest(_) => "pull_request",
            Self::IssueComment(_) => "issue_comment",
            Self::PullRequestComment(_) => "pull_request_comment",
            Self::ReviewComment(_) => "review_comment",
            Self::Issue(_) => "issue",
            Self::Deployment(_) => "deployment",
        }
    }
}
