use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies the provider a [`Client`](crate::Client) talks to.
///
/// Set once at construction and never changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// Unset or unrecognized provider.
    #[default]
    Unknown,
    /// GitHub and GitHub Enterprise.
    Github,
    /// GitLab.
    Gitlab,
    /// Gitea.
    Gitea,
    /// Gogs.
    Gogs,
    /// Bitbucket Cloud.
    Bitbucket,
    /// Bitbucket Server (Stash).
    Stash,
    /// Azure DevOps.
    Azure,
}

impl Driver {
    /// Returns the lowercase provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Github => "github",
            Self::Gitlab => "gitlab",
            Self::Gitea => "gitea",
            Self::Gogs => "gogs",
            Self::Bitbucket => "bitbucket",
            Self::Stash => "stash",
            Self::Azure => "azure",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
