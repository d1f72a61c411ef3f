use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Repository, User};

/// A provider app (e.g. a GitHub App).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: i64,
    pub slug: String,
    pub node_id: String,
    pub owner: Option<User>,
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub html_url: String,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub permissions: Option<InstallationPermissions>,
    pub events: Vec<String>,
}

/// An installation of an app on a user or organization account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub id: i64,
    pub node_id: String,
    pub app_id: i64,
    pub app_slug: String,
    pub target_id: i64,
    pub account: Option<User>,
    pub access_tokens_url: String,
    pub repositories_url: String,
    pub html_url: String,
    /// `User` or `Organization`.
    pub target_type: String,
    pub single_file_name: String,
    /// `all` or `selected`.
    pub repository_selection: String,
    pub events: Vec<String>,
    pub single_file_paths: Vec<String>,
    pub permissions: Option<InstallationPermissions>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub has_multiple_single_files: bool,
    pub suspended_by: Option<User>,
    pub suspended_at: Option<DateTime<Utc>>,
}

impl Installation {
    /// Returns true if the installation is currently suspended.
    #[must_use]
    pub const fn is_suspended(&self) -> bool {
        self.suspended_at.is_some()
    }
}

/// A short-lived installation access token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationToken {
    pub token: String,
    pub expires: Option<DateTime<Utc>>,
    pub permissions: Option<InstallationPermissions>,
    pub repositories: Vec<Repository>,
}

/// Restricts the access of a new installation token.
///
/// Serialized as the request body, so empty fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationTokenOptions {
    /// Repository ids the token may access.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repository_ids: Vec<i64>,
    /// Repository names the token may access.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<String>,
    /// Permissions granted to the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<InstallationPermissions>,
}

/// Repository and organization permissions of an installation.
///
/// Each value is an access level such as `read` or `write`; `None` means
/// the permission is not granted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallationPermissions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_references: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_administration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_custom_roles: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_hooks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_packages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_pre_receive_hooks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_projects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_secrets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_self_hosted_runners: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_user_blocking: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_requests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_hooks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_projects: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_pre_receive_hooks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secrets: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_scanning_alerts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_events: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_discussions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_alerts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflows: Option<String>,
}
