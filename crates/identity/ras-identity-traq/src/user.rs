//! traQ user profile.

use ras_identity_core::{CREDENTIALS_KEY_ID, Credentials, Provider, RawProfile, User};
use ras_identity_oauth2::OAUTH2_KEY_CODE;
use std::collections::HashMap;

pub(crate) const TRAQ_KEY_ID: &str = "userId";
pub(crate) const TRAQ_KEY_ALT_ID: &str = "id";
pub(crate) const TRAQ_KEY_NAME: &str = "name";
pub(crate) const TRAQ_KEY_ALT_NAME: &str = "userName";
pub(crate) const TRAQ_KEY_DISPLAY_NAME: &str = "displayName";
pub(crate) const TRAQ_KEY_ICON_FILE_ID: &str = "iconFileId";
pub(crate) const TRAQ_USER_ICON_PATH: &str = "https://q.trap.jp/api/1.0/files/";

/// Identity view over a traQ `users/me` response.
#[derive(Debug, Clone, Default)]
pub struct TraqUser {
    data: RawProfile,
    provider_credentials: HashMap<String, Credentials>,
}

impl TraqUser {
    /// Keeps `data` as received and records `creds`, tagged with the profile's
    /// user id, under the provider's name.
    pub fn new(data: RawProfile, creds: &Credentials, provider: &dyn Provider) -> Self {
        let mut creds = creds.clone();
        creds.set(
            CREDENTIALS_KEY_ID,
            data.first_str(&[TRAQ_KEY_ID, TRAQ_KEY_ALT_ID]),
        );

        let mut provider_credentials = HashMap::new();
        provider_credentials.insert(provider.name().to_string(), creds);

        Self {
            data,
            provider_credentials,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        data: RawProfile,
        provider_credentials: HashMap<String, Credentials>,
    ) -> Self {
        Self {
            data,
            provider_credentials,
        }
    }
}

impl User for TraqUser {
    fn name(&self) -> String {
        self.data.first_str(&[TRAQ_KEY_NAME, TRAQ_KEY_ALT_NAME])
    }

    fn nickname(&self) -> String {
        let display_name = self.data.get_str(TRAQ_KEY_DISPLAY_NAME);
        if display_name.is_empty() {
            self.name()
        } else {
            display_name
        }
    }

    /// traQ does not expose email addresses.
    fn email(&self) -> String {
        String::new()
    }

    fn avatar_url(&self) -> String {
        let icon_file_id = self.data.get_str(TRAQ_KEY_ICON_FILE_ID);
        if icon_file_id.is_empty() {
            String::new()
        } else {
            format!("{}{}", TRAQ_USER_ICON_PATH, icon_file_id)
        }
    }

    fn auth_code(&self) -> String {
        self.data.get_str(OAUTH2_KEY_CODE)
    }

    fn data(&self) -> &RawProfile {
        &self.data
    }

    fn provider_credentials(&self) -> &HashMap<String, Credentials> {
        &self.provider_credentials
    }

    fn id_for_provider(&self, provider: &str) -> String {
        self.provider_credentials
            .get(provider)
            .map(|creds| creds.get_str(CREDENTIALS_KEY_ID))
            .unwrap_or_default()
    }
}
