//! API key check for the HTTP message endpoint.

use std::collections::HashMap;

use super::AuthError;

/// Validates HTTP requests against a configured API key.
///
/// Accepts the key in either:
/// - `Authorization: Bearer <key>` header
/// - `X-API-Key: <key>` header
pub struct ApiKey {
    expected_key: String,
}

impl ApiKey {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            expected_key: api_key.into(),
        }
    }

    /// Check lowercase-keyed request headers.
    pub fn verify(&self, headers: &HashMap<String, String>) -> Result<(), AuthError> {
        let provided = extract_key(headers).ok_or(AuthError::NotAuthenticated)?;

        if constant_time_eq(provided.as_bytes(), self.expected_key.as_bytes()) {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials("Invalid API key".to_string()))
        }
    }
}

fn extract_key(headers: &HashMap<String, String>) -> Option<&str> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Some(key) = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
        {
            return Some(key);
        }
    }

    headers.get("x-api-key").map(String::as_str)
}

/// Constant-time byte comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: Vec<(&str, &str)>) -> HashMap<String, String> {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_bearer_token_valid() {
        let key = ApiKey::new("secret-key-123");
        assert!(key
            .verify(&headers(vec![("Authorization", "Bearer secret-key-123")]))
            .is_ok());
        assert!(key
            .verify(&headers(vec![("Authorization", "bearer secret-key-123")]))
            .is_ok());
    }

    #[test]
    fn test_x_api_key_header_valid() {
        let key = ApiKey::new("secret-key-123");
        assert!(key
            .verify(&headers(vec![("X-API-Key", "secret-key-123")]))
            .is_ok());
    }

    #[test]
    fn test_invalid_key() {
        let key = ApiKey::new("secret-key-123");
        let result = key.verify(&headers(vec![("Authorization", "Bearer wrong-key")]));
        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[test]
    fn test_missing_header() {
        let key = ApiKey::new("secret-key-123");
        let result = key.verify(&HashMap::new());
        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"hello", b"hello"));
        assert!(!constant_time_eq(b"hello", b"world"));
        assert!(!constant_time_eq(b"hello", b"hell"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
