use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A git repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    /// Owner, organization or project path.
    pub namespace: String,
    pub name: String,
    /// Permissions of the authenticated user, when the provider reports them.
    pub perm: Option<Perm>,
    /// Default branch.
    pub branch: String,
    pub archived: bool,
    pub private: bool,
    pub visibility: Visibility,
    /// HTTP clone URL.
    pub clone: String,
    /// SSH clone URL.
    pub clone_ssh: String,
    /// Web URL.
    pub link: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

impl Repository {
    /// Returns `namespace/name`, or just `name` without a namespace.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.namespace, self.name)
        }
    }
}

/// A user's permissions on a repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perm {
    pub pull: bool,
    pub push: bool,
    pub admin: bool,
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Undefined,
    Public,
    Internal,
    Private,
}

/// A repository webhook registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    pub name: String,
    /// Delivery URL.
    pub target: String,
    pub events: Vec<String>,
    pub active: bool,
    pub skip_verify: bool,
}

/// Input for creating or updating a repository webhook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookInput {
    pub name: String,
    pub target: String,
    pub secret: String,
    pub events: HookEvents,
    pub skip_verify: bool,
    /// Provider-specific event names that [`HookEvents`] cannot express.
    pub native_events: Vec<String>,
}

/// Canonical webhook event subscriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)] // one flag per event family
pub struct HookEvents {
    pub branch: bool,
    pub deployment: bool,
    pub issue: bool,
    pub issue_comment: bool,
    pub pull_request: bool,
    pub pull_request_comment: bool,
    pub push: bool,
    pub review_comment: bool,
    pub tag: bool,
}

/// Commit status state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    #[default]
    Unknown,
    Pending,
    Running,
    Success,
    Failure,
    Canceled,
    Error,
}

/// A commit status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: State,
    /// Context / key identifying the status.
    pub label: String,
    pub desc: String,
    /// Details URL.
    pub target: String,
}

/// Input for creating a commit status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInput {
    pub state: State,
    pub label: String,
    pub title: String,
    pub desc: String,
    pub target: String,
}
