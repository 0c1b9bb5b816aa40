//! Normalized view of an authenticated user.

use crate::{Credentials, RawProfile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only identity derived from a provider's profile payload and the
/// credentials obtained during the exchange. Accessors never fail; missing
/// data reads as the empty string.
pub trait User: Send + Sync {
    fn name(&self) -> String;

    fn nickname(&self) -> String;

    fn email(&self) -> String;

    fn avatar_url(&self) -> String;

    fn auth_code(&self) -> String;

    /// The profile payload exactly as received.
    fn data(&self) -> &RawProfile;

    /// Credentials keyed by provider name.
    fn provider_credentials(&self) -> &HashMap<String, Credentials>;

    /// Stable identifier assigned by `provider`, or `""` if the user never
    /// authenticated with it.
    fn id_for_provider(&self, provider: &str) -> String;

    fn public_data(&self) -> UserPublicData {
        UserPublicData {
            name: self.name(),
            nickname: self.nickname(),
            email: self.email(),
            avatar_url: self.avatar_url(),
            ids: self
                .provider_credentials()
                .keys()
                .map(|provider| (provider.clone(), self.id_for_provider(provider)))
                .collect(),
        }
    }
}

/// Serializable projection of a [`User`] without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublicData {
    pub name: String,
    pub nickname: String,
    pub email: String,
    pub avatar_url: String,
    pub ids: HashMap<String, String>,
}
