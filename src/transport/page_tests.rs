//! Tests for `Link` header pagination parsing.

use http::HeaderMap;
use http::header::{HeaderValue, LINK};
use url::Url;

use super::{Page, parse_link_header, parse_link_value};

fn headers_with_link(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(LINK, HeaderValue::from_static(value));
    headers
}

mod parsing {
    use super::*;

    #[test]
    fn next_and_last_are_parsed() {
        let headers = headers_with_link(
            r#"<https://api.example.com/x?page=2>; rel="next", <https://api.example.com/x?page=5>; rel="last""#,
        );

        let page = parse_link_header(&headers);

        assert_eq!(
            page,
            Page {
                next: 2,
                last: 5,
                first: 0,
                prev: 0,
            }
        );
    }

    #[test]
    fn all_four_relations_are_parsed() {
        let page = parse_link_value(concat!(
            r#"<https://api.github.com/user/repos?page=3&per_page=100>; rel="next", "#,
            r#"<https://api.github.com/user/repos?page=1&per_page=100>; rel="prev", "#,
            r#"<https://api.github.com/user/repos?page=1&per_page=100>; rel="first", "#,
            r#"<https://api.github.com/user/repos?page=50&per_page=100>; rel="last""#,
        ));

        assert_eq!(page.next, 3);
        assert_eq!(page.prev, 1);
        assert_eq!(page.first, 1);
        assert_eq!(page.last, 50);
    }

    #[test]
    fn missing_header_yields_empty_page() {
        let page = parse_link_header(&HeaderMap::new());

        assert!(page.is_empty());
    }

    #[test]
    fn relative_targets_are_accepted() {
        let page = parse_link_value(r#"</api/v1/repos/search?page=4>; rel="next""#);

        assert_eq!(page.next, 4);
    }

    #[test]
    fn extra_whitespace_around_attributes_is_trimmed() {
        let page = parse_link_value(r#"  <https://x.test/?page=7>;   rel="last"  "#);

        assert_eq!(page.last, 7);
    }
}

mod leniency {
    use super::*;

    #[test]
    fn segment_without_attributes_is_skipped() {
        let page = parse_link_value(r#"<https://x.test/?page=9>, <https://x.test/?page=2>; rel="next""#);

        assert_eq!(page.next, 2);
        assert_eq!(page.last, 0);
    }

    #[test]
    fn target_without_angle_brackets_is_skipped() {
        let page = parse_link_value(r#"https://x.test/?page=2; rel="next""#);

        assert!(page.is_empty());
    }

    #[test]
    fn target_without_page_param_is_skipped() {
        let page = parse_link_value(r#"<https://x.test/?cursor=abc>; rel="next""#);

        assert!(page.is_empty());
    }

    #[test]
    fn unknown_or_malformed_rel_is_ignored() {
        let page = parse_link_value(
            r#"<https://x.test/?page=2>; rel=next, <https://x.test/?page=3>; rel="alternate""#,
        );

        assert!(page.is_empty());
    }

    #[test]
    fn non_numeric_page_counts_as_absent() {
        let page = parse_link_value(r#"<https://x.test/?page=abc>; rel="next""#);

        assert_eq!(page.next, 0);
    }

    #[test]
    fn garbage_does_not_disturb_valid_segments() {
        let page = parse_link_value(r#";;;, <>; rel="prev", <https://x.test/?page=6>; rel="last""#);

        assert_eq!(
            page,
            Page {
                last: 6,
                ..Page::default()
            }
        );
    }
}

mod serialization {
    use super::*;

    #[test]
    fn reparsing_canonical_form_is_idempotent() {
        let inputs = [
            r#"<https://api.example.com/x?page=2>; rel="next", <https://api.example.com/x?page=5>; rel="last""#,
            r#"<https://api.example.com/x?page=1>; rel="first", <https://api.example.com/x?page=3>; rel="prev""#,
            r#"<https://api.example.com/x?page=8>; rel="next""#,
            "",
        ];
        let base = Url::parse("https://api.example.com/x").unwrap();

        for input in inputs {
            let parsed = parse_link_value(input);
            let reparsed = parse_link_value(&parsed.link_header(&base));

            assert_eq!(parsed, reparsed, "round trip changed {input:?}");
        }
    }

    #[test]
    fn link_header_omits_absent_relations() {
        let base = Url::parse("https://api.example.com/x").unwrap();
        let page = Page {
            next: 2,
            ..Page::default()
        };

        assert_eq!(
            page.link_header(&base),
            r#"<https://api.example.com/x?page=2>; rel="next""#
        );
    }
}
