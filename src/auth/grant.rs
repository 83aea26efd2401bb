//! Access grants: the result of a successful bearer token check.

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Scope that permits every tool.
pub const WILDCARD_SCOPE: &str = "*";

/// Authorization issued for a single inbound call.
///
/// Grants are only minted by [`TokenAuthenticator`](super::TokenAuthenticator)
/// and are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    subject: String,
    scopes: BTreeSet<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessGrant {
    pub(crate) fn new<I, S>(subject: impl Into<String>, scopes: I, expires_at: Option<DateTime<Utc>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            expires_at,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Granted scopes, sorted.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check whether this grant covers `scope` right now.
    pub fn permits(&self, scope: &str) -> bool {
        self.permits_at(scope, Utc::now())
    }

    /// Check whether this grant covers `scope` at `now`.
    pub fn permits_at(&self, scope: &str, now: DateTime<Utc>) -> bool {
        if self.expires_at.is_some_and(|exp| exp <= now) {
            return false;
        }
        self.scopes.contains(WILDCARD_SCOPE) || self.scopes.contains(scope)
    }
}
