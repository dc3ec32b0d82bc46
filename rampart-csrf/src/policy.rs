/// Decides which requests the engine touches and which it verifies.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestPolicy {
    ignore_methods: Vec<String>,
    exclude_path_prefixes: Vec<String>,
}

impl RequestPolicy {
    pub fn new(ignore_methods: Vec<String>, exclude_path_prefixes: Vec<String>) -> Self {
        Self {
            ignore_methods,
            exclude_path_prefixes,
        }
    }

    /// Excluded paths skip the engine entirely: no secret, no token.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_path_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_ignored_method(&self, method: &str) -> bool {
        self.ignore_methods
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(method))
    }

    /// Whether a submitted token must be checked for this request.
    pub fn should_verify(&self, method: &str, path: &str) -> bool {
        !self.is_ignored_method(method) && !self.is_excluded(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RequestPolicy {
        RequestPolicy::new(
            vec!["GET".to_string(), "HEAD".to_string(), "OPTIONS".to_string()],
            vec!["/_next/".to_string(), "/api/webhook".to_string()],
        )
    }

    #[test]
    fn test_safe_methods() {
        let policy = policy();
        assert!(!policy.should_verify("GET", "/form"));
        assert!(!policy.should_verify("head", "/form"));
        assert!(policy.should_verify("POST", "/form"));
        assert!(policy.should_verify("DELETE", "/form"));
    }

    #[test]
    fn test_excluded_paths() {
        let policy = policy();
        assert!(policy.is_excluded("/_next/static/chunk.js"));
        assert!(policy.is_excluded("/api/webhook/github"));
        assert!(!policy.is_excluded("/api/submit"));
        assert!(!policy.should_verify("POST", "/api/webhook/github"));
    }

    #[test]
    fn test_empty_policy_verifies_everything() {
        let policy = RequestPolicy::default();
        assert!(policy.should_verify("GET", "/"));
        assert!(!policy.is_excluded("/"));
    }
}
