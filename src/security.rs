use subtle::ConstantTimeEq;

/// Check an `Authorization` header of the form `Bearer <token>` against the
/// configured API token. The token bytes are compared in constant time.
pub fn bearer_matches(header: Option<&str>, expected: &str) -> bool {
    let Some(token) = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
    else {
        return false;
    };

    token.len() == expected.len() && bool::from(token.as_bytes().ct_eq(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_matches_exact_token() {
        assert!(bearer_matches(Some("Bearer secret"), "secret"));
        assert!(bearer_matches(Some("Bearer  secret "), "secret"));
    }

    #[test]
    fn test_bearer_rejects_wrong_or_partial_tokens() {
        assert!(!bearer_matches(Some("Bearer wrong!"), "secret"));
        assert!(!bearer_matches(Some("Bearer secre"), "secret"));
        assert!(!bearer_matches(Some("Bearer secret2"), "secret"));
        assert!(!bearer_matches(Some("Bearer "), "secret"));
    }

    #[test]
    fn test_bearer_requires_scheme() {
        assert!(!bearer_matches(Some("secret"), "secret"));
        assert!(!bearer_matches(Some("Basic secret"), "secret"));
        assert!(!bearer_matches(None, "secret"));
    }
}
