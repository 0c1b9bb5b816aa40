//! The capability set every identity provider plugin implements.

use crate::{Credentials, IdentityResult, State, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query parameters received on the OAuth2 callback endpoint.
pub type CallbackParams = HashMap<String, String>;

/// Options for building the authorization URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// Extra scopes to request, space or comma separated. Merged with the
    /// provider's default scope, never replacing it.
    pub scope: Option<String>,
}

impl AuthOptions {
    pub fn with_scope(scope: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
        }
    }
}

/// Builds HTTP clients that attach a provider's credentials to every request.
pub trait TripperFactory: Send + Sync {
    /// `None` yields an unauthenticated client, e.g. for the token exchange.
    fn new_client(&self, creds: Option<&Credentials>) -> IdentityResult<reqwest::Client>;
}

/// Public, serializable description of a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderPublicData {
    pub name: String,
    pub display: String,
}

#[async_trait]
pub trait Provider: Send + Sync {
    /// Short unique identifier, used as the key when composing providers.
    fn name(&self) -> &str;

    /// Human readable label.
    fn display_name(&self) -> &str;

    /// URL the end user's browser must visit to begin authenticating.
    fn begin_auth_url(
        &self,
        state: Option<&State>,
        options: Option<&AuthOptions>,
    ) -> IdentityResult<String>;

    /// Exchanges the callback parameters for credentials.
    async fn complete_auth(&self, params: &CallbackParams) -> IdentityResult<Credentials>;

    /// Loads the user's profile with the given credentials.
    async fn get_user(&self, creds: &Credentials) -> IdentityResult<Box<dyn User>>;

    /// HTTP client that authenticates every request with `creds`.
    fn get_client(&self, creds: &Credentials) -> IdentityResult<reqwest::Client>;

    fn tripper_factory(&self) -> &dyn TripperFactory;

    fn public_data(&self) -> ProviderPublicData {
        ProviderPublicData {
            name: self.name().to_string(),
            display: self.display_name().to_string(),
        }
    }
}
