//! Single-secret bearer token authenticator.

use sha2::{Digest, Sha256};
use std::fmt;

use super::grant::{AccessGrant, WILDCARD_SCOPE};
use crate::types::AuthConfig;

/// Validates presented tokens against one configured secret.
///
/// Only the SHA-256 digest of the secret is kept. Presented tokens are
/// digested too and compared with a branch-free fold, so the comparison
/// takes the same time whatever the token length or content.
#[derive(Clone)]
pub struct TokenAuthenticator {
    secret_digest: [u8; 32],
    subject: String,
}

impl TokenAuthenticator {
    pub fn new(secret: &str, subject: impl Into<String>) -> Self {
        Self {
            secret_digest: digest(secret),
            subject: subject.into(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.bearer_token, config.subject.clone())
    }

    /// Issue a grant if `token` matches the configured secret.
    ///
    /// Returns `None` on mismatch; turning that into an authorization
    /// failure is up to the caller.
    pub fn authenticate(&self, token: &str) -> Option<AccessGrant> {
        if token.is_empty() {
            return None;
        }
        if digests_equal(&digest(token), &self.secret_digest) {
            Some(AccessGrant::new(self.subject.clone(), [WILDCARD_SCOPE], None))
        } else {
            None
        }
    }
}

impl fmt::Debug for TokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

fn digests_equal(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_matching_token_issues_wildcard_grant() {
        let auth = TokenAuthenticator::new("s3cret", "astro-client");
        let grant = auth.authenticate("s3cret").unwrap();
        assert_eq!(grant.subject(), "astro-client");
        assert_eq!(grant.scopes().collect::<Vec<_>>(), vec![WILDCARD_SCOPE]);
        assert!(grant.expires_at().is_none());
    }

    #[test]
    fn test_near_misses_are_rejected() {
        let auth = TokenAuthenticator::new("s3cret", "astro-client");
        assert!(auth.authenticate("").is_none());
        assert!(auth.authenticate("s3cre").is_none());
        assert!(auth.authenticate("s3cret ").is_none());
        assert!(auth.authenticate("S3CRET").is_none());
    }

    #[test]
    fn test_from_config() {
        let config = AuthConfig {
            bearer_token: "tok".into(),
            subject: "someone".into(),
            caller_identity: "id".into(),
        };
        let auth = TokenAuthenticator::from_config(&config);
        assert_eq!(auth.authenticate("tok").unwrap().subject(), "someone");
    }

    #[test]
    fn test_debug_hides_secret() {
        let auth = TokenAuthenticator::new("s3cret", "astro-client");
        assert!(!format!("{:?}", auth).contains("s3cret"));
    }

    proptest! {
        #[test]
        fn prop_only_the_secret_is_granted(token in ".*") {
            let auth = TokenAuthenticator::new("correct-horse-battery-staple", "astro-client");
            let granted = auth.authenticate(&token).is_some();
            prop_assert_eq!(granted, token == "correct-horse-battery-staple");
        }
    }
}
