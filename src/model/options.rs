use serde::{Deserialize, Serialize};

/// Pagination parameters for list operations.
///
/// Zero values are omitted from the query string. When `url` is set it is
/// requested as-is and `page` and `size` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Next-page URL for providers that paginate by cursor.
    pub url: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub size: u32,
}

impl ListOptions {
    /// Requests a specific page.
    #[must_use]
    pub const fn page(page: u32, size: u32) -> Self {
        Self {
            url: None,
            page,
            size,
        }
    }

    /// Requests the page at `url`, typically a `next` link from a previous
    /// response.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }
}

/// Repository search terms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSearchTerm {
    /// Name, or part of a name, to match.
    pub repo_name: String,
    /// Restricts the search to one user's repositories.
    pub user: String,
}

/// Pagination plus search terms for repository search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoListOptions {
    pub list: ListOptions,
    pub search: RepoSearchTerm,
}
