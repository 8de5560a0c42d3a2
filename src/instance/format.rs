//! Instance checks for the `format` keyword's closed set.
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    net::{Ipv4Addr, Ipv6Addr},
    str::FromStr,
};
use url::Url;

lazy_static! {
    static ref IRI_REFERENCE_RE: Regex =
        Regex::new(r"^(\w+:(/?/?))?[^#\\\s]*(#[^\\\s]*)?\z").expect("Is a valid regex");
    static ref RELATIVE_JSON_POINTER_RE: Regex =
        Regex::new(r"^(?:0|[1-9][0-9]*)(?:#|(?:/(?:[^~/]|~0|~1)*)*)\z").expect("Is a valid regex");
    static ref URI_TEMPLATE_RE: Regex = Regex::new(
        r#"^(?:(?:[^\x00-\x20"'<>%\\^`{|}]|%[0-9a-f]{2})|\{[+#./;?&=,!@|]?(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?(?:,(?:[a-z0-9_]|%[0-9a-f]{2})+(?::[1-9][0-9]{0,3}|\*)?)*})*\z"#
    )
    .expect("Is a valid regex");
}

/// Checks `value` against a named format. `None` for names outside the
/// closed set, which the caller ignores.
pub(super) fn check(format: &str, value: &str) -> Option<bool> {
    let valid = match format {
        "ipv4" => Ipv4Addr::from_str(value).is_ok(),
        "ipv6" => Ipv6Addr::from_str(value).is_ok(),
        "email" | "idn-email" => value.contains('@'),
        "hostname" | "idn-hostname" => is_valid_hostname(value),
        "iri" => Url::from_str(value).is_ok(),
        "iri-reference" => IRI_REFERENCE_RE.is_match(value),
        "uri-template" => URI_TEMPLATE_RE.is_match(value),
        "relative-json-pointer" => RELATIVE_JSON_POINTER_RE.is_match(value),
        "regex" => fancy_regex::Regex::new(value).is_ok(),
        _ => return None,
    };
    Some(valid)
}

fn is_valid_hostname(item: &str) -> bool {
    !(item.ends_with('-')
        || item.starts_with('-')
        || item.is_empty()
        || item.chars().count() > 255
        || item
            .chars()
            .any(|c| !(c.is_alphanumeric() || c == '-' || c == '.'))
        || item.split('.').any(|part| part.chars().count() > 63))
}

#[cfg(test)]
mod tests {
    use super::check;
    use test_case::test_case;

    #[test_case("ipv4", "127.0.0.1", true)]
    #[test_case("ipv4", "2001:db8::1", false)]
    #[test_case("ipv6", "2001:db8::1", true)]
    #[test_case("ipv6", "127.0.0.1", false)]
    #[test_case("email", "user@example.com", true)]
    #[test_case("email", "not-an-email", false)]
    #[test_case("hostname", "example.com", true)]
    #[test_case("hostname", "-leading.example", false)]
    #[test_case("iri", "https://example.com/path", true)]
    #[test_case("iri", "no scheme here", false)]
    #[test_case("uri-template", "http://example.com/{id}", true)]
    #[test_case("relative-json-pointer", "0/a", true)]
    #[test_case("relative-json-pointer", "/a", false)]
    #[test_case("regex", "^a+$", true)]
    #[test_case("regex", "(unclosed", false)]
    fn known_formats(format: &str, value: &str, expected: bool) {
        assert_eq!(check(format, value), Some(expected));
    }

    #[test]
    fn unknown_format_is_ignored() {
        assert_eq!(check("zipcode", "12345"), None);
    }
}
