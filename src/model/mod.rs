//! Canonical, provider-independent data model.
//!
//! Every driver produces and consumes these types; nothing provider-specific
//! crosses the Driver Contract.

mod apps;
mod driver;
mod options;
mod pull;
mod repo;
mod user;
mod webhook;

pub use self::apps::{
    App, Installation, InstallationPermissions, InstallationToken, InstallationTokenOptions,
};
pub use self::driver::Driver;
pub use self::options::{ListOptions, RepoListOptions, RepoSearchTerm};
pub use self::pull::{Comment, Issue, PullRequest, Review};
pub use self::repo::{
    Hook, HookEvents, HookInput, Perm, Repository, State, Status, StatusInput, Visibility,
};
pub use self::user::{Commit, Reference, Signature, User};
pub use self::webhook::{
    Action, BranchHook, DeployHook, IssueCommentHook, IssueHook, PullRequestCommentHook,
    PullRequestHook, PushHook, RefUpdate, ReviewCommentHook, TagHook, Webhook,
};
