//! Default values for configuration options.

/// Default configuration file written by `scm init`.
pub const CONFIG_FILE: &str = "scm.toml";

/// Default GitHub API endpoint.
pub const GITHUB_BASE_URL: &str = "https://api.github.com/";
