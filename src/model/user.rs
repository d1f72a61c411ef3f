use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provider user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub name: String,
    pub email: String,
    pub avatar: String,
}

/// Identifies a commit author or committer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub login: String,
    pub name: String,
    pub email: String,
    pub date: Option<DateTime<Utc>>,
    pub avatar: String,
}

/// A git commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub message: String,
    pub author: Signature,
    pub committer: Signature,
    pub link: String,
}

/// A git reference (branch or tag).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Short name, e.g. `main` or `v1.0.0`.
    pub name: String,
    /// Full path, e.g. `refs/heads/main`.
    pub path: String,
    pub sha: String,
}
