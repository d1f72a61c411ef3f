//! Provider drivers.
//!
//! Each driver speaks one vendor's REST and webhook dialect and hands back
//! canonical [`model`](crate::model) values through a [`Client`](crate::Client).

pub mod azure;
pub mod gitea;
pub mod github;

use crate::model::ListOptions;

/// Encodes page and page-size query parameters, omitting zero values.
///
/// `size_key` is the provider's name for the page size, e.g. `per_page`.
fn encode_list_options(opts: &ListOptions, size_key: &str) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if opts.page != 0 {
        query.append_pair("page", &opts.page.to_string());
    }
    if opts.size != 0 {
        query.append_pair(size_key, &opts.size.to_string());
    }
    query.finish()
}

/// Builds the request path for a list call.
///
/// A set [`ListOptions::url`] wins over `path`; it is resolved against the
/// base URL, so absolute next-page links are followed as given.
pub(crate) fn list_path(path: String, opts: &ListOptions, size_key: &str) -> String {
    match opts.url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => with_query(path, &encode_list_options(opts, size_key)),
    }
}

/// Appends an encoded query to `path`, if there is one.
fn with_query(path: String, query: &str) -> String {
    if query.is_empty() {
        path
    } else if path.contains('?') {
        format!("{path}&{query}")
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_options_omit_zero_values() {
        assert_eq!(encode_list_options(&ListOptions::default(), "per_page"), "");
        assert_eq!(
            encode_list_options(&ListOptions::page(2, 50), "per_page"),
            "page=2&per_page=50"
        );
        assert_eq!(
            encode_list_options(&ListOptions::page(3, 0), "limit"),
            "page=3"
        );
    }

    #[test]
    fn list_url_replaces_built_path() {
        let next = ListOptions::url("https://api.github.com/user/repos?page=3");
        assert_eq!(
            list_path("user/repos".to_string(), &next, "per_page"),
            "https://api.github.com/user/repos?page=3"
        );

        let empty = ListOptions {
            url: Some(String::new()),
            page: 2,
            size: 0,
        };
        assert_eq!(
            list_path("user/repos".to_string(), &empty, "per_page"),
            "user/repos?page=2"
        );
    }

    #[test]
    fn query_is_appended() {
        assert_eq!(with_query("user/repos".to_string(), ""), "user/repos");
        assert_eq!(with_query("user/repos".to_string(), "page=2"), "user/repos?page=2");
        assert_eq!(
            with_query("user/repos?visibility=all".to_string(), "page=2"),
            "user/repos?visibility=all&page=2"
        );
    }
}
