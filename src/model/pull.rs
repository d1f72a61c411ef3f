use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;

/// A pull (merge) request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct PullRequest {
    pub number: i64,
    pub title: String,
    pub body: String,
    /// Head commit.
    pub sha: String,
    /// Ref the provider exposes for this pull request.
    pub ref_name: String,
    /// Source branch.
    pub source: String,
    /// Target branch.
    pub target: String,
    /// Source repository when it differs from the target.
    pub fork: String,
    pub link: String,
    pub diff: String,
    pub draft: bool,
    pub closed: bool,
    pub merged: bool,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// An issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: i64,
    pub title: String,
    pub body: String,
    pub link: String,
    pub labels: Vec<String>,
    pub closed: bool,
    pub locked: bool,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// A comment on an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}

/// A line comment made as part of a review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub body: String,
    /// File the comment is attached to.
    pub path: String,
    pub sha: String,
    pub line: i64,
    pub link: String,
    pub author: User,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
}
