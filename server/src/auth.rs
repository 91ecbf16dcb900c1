//! Bearer token resolution for the administrative endpoints.

use crate::config::AdminToken;
use atelier_web::{Principal, PrincipalResolver};
use axum::async_trait;
use std::collections::HashMap;

/// Resolves tokens from a fixed table loaded at startup.
///
/// Each principal's subject is a short, non-secret fingerprint of its token so
/// logs can tell admins apart without recording the secret.
#[derive(Default)]
pub struct StaticTokenResolver {
    principals: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    /// Build the table from configured tokens. Later duplicates win.
    #[must_use]
    pub fn new(tokens: &[AdminToken]) -> Self {
        let principals = tokens
            .iter()
            .map(|t| {
                let principal = Principal {
                    subject: fingerprint(&t.token),
                    role: t.role,
                };
                (t.token.clone(), principal)
            })
            .collect();
        Self { principals }
    }

    /// Number of configured tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.principals.len()
    }

    /// Whether no token is configured (all admin requests will be rejected)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.principals.is_empty()
    }
}

impl std::fmt::Debug for StaticTokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenResolver")
            .field("tokens", &self.principals.len())
            .finish()
    }
}

#[async_trait]
impl PrincipalResolver for StaticTokenResolver {
    async fn resolve(&self, token: &str) -> Option<Principal> {
        self.principals.get(token).cloned()
    }
}

/// `admin-` plus the first four characters, enough to tell tokens apart in logs
fn fingerprint(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("admin-{prefix}…")
}
