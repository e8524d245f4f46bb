use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid URI '{0}'")]
pub struct InvalidUri(pub String);

/// An immutable, globally unique textual identifier.
///
/// The sole key for plugin identity and for relation predicates.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uri(String);

impl Uri {
    /// Parses caller-supplied text, rejecting syntactically invalid URIs.
    ///
    /// A valid URI has a scheme (a letter followed by letters, digits,
    /// `+`, `-` or `.`), a `:`, at least one further character, and no
    /// whitespace or control characters anywhere.
    pub fn parse(text: &str) -> Result<Self, InvalidUri> {
        if is_valid(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(InvalidUri(text.to_string()))
        }
    }

    /// Wraps trusted text without validation.
    ///
    /// For identifiers that did not come from user input: namespace
    /// constants and IRIs extracted from metadata documents. Index
    /// construction re-validates plugin subjects built this way.
    pub fn new_unchecked(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_valid(text: &str) -> bool {
    let Some(colon) = text.find(':') else {
        return false;
    };
    let scheme = &text[..colon];
    let rest = &text[colon + 1..];
    if scheme.is_empty() || rest.is_empty() {
        return false;
    }
    let mut chars = scheme.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return false;
    }
    !text.chars().any(|c| c.is_whitespace() || c.is_control())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_plain_http_uri() {
        let uri = Uri::parse("http://example.org/plugin").unwrap();
        assert_eq!(uri.as_str(), "http://example.org/plugin");
    }

    #[test]
    fn parse_is_stable() {
        let first = Uri::parse("http://example.org/plugin").unwrap();
        let second = Uri::parse("http://example.org/plugin").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parse_rejects_text_without_scheme() {
        assert_eq!(
            Uri::parse("not a uri"),
            Err(InvalidUri("not a uri".to_string()))
        );
    }

    #[test]
    fn parse_rejects_embedded_whitespace() {
        assert!(Uri::parse("http://bad uri").is_err());
        assert!(Uri::parse("http://bad\turi").is_err());
    }

    #[test]
    fn parse_rejects_empty_scheme_or_remainder() {
        assert!(Uri::parse("://example.org").is_err());
        assert!(Uri::parse("http:").is_err());
        assert!(Uri::parse("9http://example.org").is_err());
    }

    #[test]
    fn urn_schemes_are_accepted() {
        assert!(Uri::parse("urn:isbn:0451450523").is_ok());
        assert!(Uri::parse("file:///usr/lib/lv2/amp.lv2/").is_ok());
    }
}
