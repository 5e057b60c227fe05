//! Inbound path parsing.
//!
//! # Responsibilities
//! - Validate the `/proxy/{name}/{remainder...}` shape
//! - Extract the backend name and the opaque remainder
//!
//! # Design Decisions
//! - Split on the first two slash boundaries only; embedded slashes in the
//!   remainder are preserved untouched
//! - A trailing-slash form (`/proxy/openai/`) yields an empty remainder and
//!   is accepted; a missing third segment (`/proxy/openai`) is not

use crate::error::ProxyError;

/// Where a request should go: backend name plus the path to forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub backend: String,
    pub remainder: String,
}

/// Parse a raw request path into a [`TargetDescriptor`].
///
/// The path must be `/proxy/{name}/{remainder...}` with `proxy` as a literal
/// first segment. No side effects; registry lookup happens later.
pub fn parse_target(path: &str) -> Result<TargetDescriptor, ProxyError> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let mut parts = trimmed.splitn(3, '/');

    let literal = parts.next().unwrap_or("");
    let name = parts.next();
    let remainder = parts.next();

    match (literal, name, remainder) {
        ("proxy", Some(name), Some(remainder)) => Ok(TargetDescriptor {
            backend: name.to_string(),
            remainder: remainder.to_string(),
        }),
        _ => Err(ProxyError::MalformedPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_path_splits_once() {
        let target = parse_target("/proxy/openai/v1/chat/completions").unwrap();
        assert_eq!(target.backend, "openai");
        assert_eq!(target.remainder, "v1/chat/completions");
    }

    #[test]
    fn remainder_is_opaque() {
        let target = parse_target("/proxy/claude/v1/messages/batch%2F1").unwrap();
        assert_eq!(target.remainder, "v1/messages/batch%2F1");
    }

    #[test]
    fn trailing_slash_gives_empty_remainder() {
        let target = parse_target("/proxy/openai/").unwrap();
        assert_eq!(target.remainder, "");
    }

    #[test]
    fn missing_remainder_rejected() {
        assert!(matches!(
            parse_target("/proxy/openai"),
            Err(ProxyError::MalformedPath)
        ));
    }

    #[test]
    fn wrong_literal_rejected() {
        assert!(matches!(
            parse_target("/relay/openai/v1/models"),
            Err(ProxyError::MalformedPath)
        ));
    }

    #[test]
    fn root_and_short_paths_rejected() {
        for path in ["/", "", "/proxy", "/favicon.ico"] {
            assert!(matches!(parse_target(path), Err(ProxyError::MalformedPath)));
        }
    }
}
