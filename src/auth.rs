//! Authenticated-principal abstraction
//!
//! Token issuance and validation live outside this backend; handlers
//! resolve the bearer token into a [`Principal`] once and pass it down
//! explicitly. No operation reads the caller's identity from ambient
//! state.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::TripAiError;

/// The authenticated caller of an operation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: u64,
    pub username: String,
}

/// Resolves a bearer token to a principal.
///
/// The production deployment plugs an identity provider in here; the
/// bundled [`StaticTokenResolver`] covers development and tests.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, bearer_token: &str) -> crate::Result<Principal>;
}

/// Fixed token-to-principal mapping
#[derive(Debug, Default)]
pub struct StaticTokenResolver {
    tokens: HashMap<String, Principal>,
}

impl StaticTokenResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for a principal
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, principal: Principal) -> Self {
        self.tokens.insert(token.into(), principal);
        self
    }
}

#[async_trait]
impl PrincipalResolver for StaticTokenResolver {
    async fn resolve(&self, bearer_token: &str) -> crate::Result<Principal> {
        self.tokens
            .get(bearer_token)
            .cloned()
            .ok_or_else(|| TripAiError::validation("unknown bearer token"))
    }
}
