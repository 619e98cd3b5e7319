// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Repository URL normalization
//!
//! Two references point at the same repository iff their normalized
//! identities are equal. The identity is `netloc + path`, lowercased, with
//! trailing slashes removed. Scheme, query string and fragment are dropped.
//!
//! Host aliases are not unified: `www.gitlab.com/o/r` and `gitlab.com/o/r`
//! are different identities.

/// Canonicalize a repository URL into a comparable identity key.
///
/// Netloc and path are taken lexically: no percent-encoding, dot-segment
/// removal or default-port elision, so `https://h/o/ñ` and `h/o/ñ` agree.
/// Never fails; input that cannot name a repository yields `""`.
/// Normalizing an identity returns it unchanged.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return String::new();
    }

    let identity = match split_scheme(trimmed) {
        Some(rest) => {
            let netloc_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
            let (netloc, tail) = rest.split_at(netloc_end);
            if netloc.is_empty() {
                return String::new();
            }
            format!("{netloc}{}", until_query(tail))
        }
        // No network location: everything up to the query or fragment is path.
        None => until_query(trimmed).to_string(),
    };

    let identity = identity.trim_end_matches('/').to_lowercase();
    // `a://b://c` would name a different repository on a second pass.
    if split_scheme(&identity).is_some() {
        return String::new();
    }
    identity
}

/// Text after a `scheme://` prefix, where scheme is
/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn split_scheme(s: &str) -> Option<&str> {
    let (scheme, rest) = s.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(rest)
}

fn until_query(s: &str) -> &str {
    s.find(['?', '#']).map_or(s, |end| &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_case_and_trailing_slash_ignored() {
        assert_eq!(
            normalize("HTTPS://GitLab.com/org/repo/"),
            normalize("http://gitlab.com/org/repo")
        );
        assert_eq!(normalize("http://gitlab.com/org/repo"), "gitlab.com/org/repo");
    }

    #[test]
    fn test_query_and_fragment_dropped() {
        assert_eq!(
            normalize("https://gitlab.com/org/repo?ref=main#readme"),
            "gitlab.com/org/repo"
        );
    }

    #[test]
    fn test_path_case_folded() {
        assert_eq!(normalize("https://gitlab.com/Org/Repo"), "gitlab.com/org/repo");
    }

    #[test]
    fn test_schemeless_reference_keeps_host_as_path() {
        assert_eq!(normalize("gitlab.com/org/repo/"), "gitlab.com/org/repo");
        assert_eq!(normalize("gitlab.com/org/repo"), normalize("https://gitlab.com/org/repo"));
    }

    #[test]
    fn test_port_and_credentials_kept_in_netloc() {
        assert_eq!(
            normalize("https://git.example.com:8443/team/app"),
            "git.example.com:8443/team/app"
        );
        assert_eq!(
            normalize("https://deploy@git.example.com/team/app"),
            "deploy@git.example.com/team/app"
        );
    }

    #[test]
    fn test_www_alias_not_unified() {
        assert_ne!(
            normalize("https://www.gitlab.com/org/repo"),
            normalize("https://gitlab.com/org/repo")
        );
    }

    #[test]
    fn test_non_urls_yield_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("not a url"), "");
        assert_eq!(normalize("https://"), "");
    }

    #[test]
    fn test_non_ascii_path_matches_schemeless_form() {
        assert_eq!(normalize("https://gitlab.com/o/ñ"), "gitlab.com/o/ñ");
        assert_eq!(normalize("https://gitlab.com/o/ñ"), normalize("gitlab.com/o/ñ"));
    }

    #[test]
    fn test_netloc_and_path_kept_verbatim() {
        assert_eq!(normalize("https://gitlab.com/o/x/../r"), "gitlab.com/o/x/../r");
        assert_eq!(normalize("https://gitlab.com:443/o/r"), "gitlab.com:443/o/r");
        assert_eq!(normalize("https://gitlab.com\\o\\r"), "gitlab.com\\o\\r");
        assert_eq!(normalize("https://gitlab.com/o/r%2Fx"), "gitlab.com/o/r%2fx");
    }

    #[test]
    fn test_nested_scheme_yields_empty() {
        assert_eq!(normalize("a://b://c"), "");
    }

    #[test]
    fn test_idempotent_on_identities() {
        for raw in [
            "HTTPS://GitLab.com/org/repo/",
            "https://git.example.com:8443/team/app//",
            "gitlab.com/o/r?x=1",
            "https://h/a://b",
            "https://gitlab.com/o/ñ/",
            "https://x:/",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw}");
        }
    }
}
