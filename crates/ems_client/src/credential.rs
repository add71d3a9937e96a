use std::fmt;

/// Opaque bearer token. Passed through to the records API untouched; never
/// inspected, refreshed or logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<String> for Credential {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for Credential {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_value() {
        let cred = Credential::new("abc.def");
        assert_eq!(cred.bearer(), "Bearer abc.def");
        assert_eq!(cred.token(), "abc.def");
    }

    #[test]
    fn test_debug_redacts_token() {
        let cred = Credential::from("super-secret");
        assert!(!format!("{cred:?}").contains("super-secret"));
    }
}
