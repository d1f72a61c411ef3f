//! Pagination values parsed from the `Link` response header.

use http::HeaderMap;
use http::header::LINK;
use url::Url;

/// Page numbers advertised by a provider's `Link` header.
///
/// Zero means the relation was absent, never "page zero".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// Next page number.
    pub next: u32,
    /// Last page number.
    pub last: u32,
    /// First page number.
    pub first: u32,
    /// Previous page number.
    pub prev: u32,
}

impl Page {
    /// Returns true if no relation was present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Renders the page values as a canonical `Link` header value against
    /// `base`, in `next`, `prev`, `first`, `last` order. Absent relations are
    /// omitted.
    #[must_use]
    pub fn link_header(&self, base: &Url) -> String {
        [
            ("next", self.next),
            ("prev", self.prev),
            ("first", self.first),
            ("last", self.last),
        ]
        .into_iter()
        .filter(|(_, page)| *page != 0)
        .map(|(rel, page)| {
            let mut target = base.clone();
            target.query_pairs_mut().append_pair("page", &page.to_string());
            format!("<{target}>; rel=\"{rel}\"")
        })
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Parses the first `Link` header into [`Page`] values.
///
/// Parsing is best-effort: a malformed segment is skipped and leaves its
/// relation at zero. A missing or non-UTF-8 header yields an empty page.
#[must_use]
pub fn parse_link_header(headers: &HeaderMap) -> Page {
    headers
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .map(parse_link_value)
        .unwrap_or_default()
}

/// Parses a raw `Link` header value into [`Page`] values.
#[must_use]
pub fn parse_link_value(value: &str) -> Page {
    let mut page = Page::default();

    for link in value.split(',') {
        let segments: Vec<&str> = link.trim().split(';').collect();
        if segments.len() < 2 {
            continue;
        }

        let Some(target) = segments[0]
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
        else {
            continue;
        };

        let Some(number) = page_param(target) else {
            continue;
        };
        // Non-numeric page values count as absent.
        let number = number.parse().unwrap_or(0);

        for attribute in &segments[1..] {
            match attribute.trim() {
                r#"rel="next""# => page.next = number,
                r#"rel="prev""# => page.prev = number,
                r#"rel="first""# => page.first = number,
                r#"rel="last""# => page.last = number,
                _ => {}
            }
        }
    }

    page
}

/// Extracts the `page` query parameter, accepting relative link targets.
fn page_param(target: &str) -> Option<String> {
    let url = match Url::parse(target) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://relative.invalid/").ok()?.join(target).ok()?
        }
        Err(_) => return None,
    };

    url.query_pairs()
        .find(|(key, _)| key == "page")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
