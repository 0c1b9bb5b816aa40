//! HTTP clients that carry OAuth2 bearer credentials.

use crate::OAUTH2_KEY_ACCESS_TOKEN;
use ras_identity_core::{Credentials, IdentityError, IdentityResult, TripperFactory};
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Stateless factory for OAuth2-authenticated `reqwest` clients.
#[derive(Debug, Clone)]
pub struct OAuth2TripperFactory {
    timeout: Duration,
}

impl Default for OAuth2TripperFactory {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl OAuth2TripperFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl TripperFactory for OAuth2TripperFactory {
    fn new_client(&self, creds: Option<&Credentials>) -> IdentityResult<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(creds) = creds {
            let access_token = creds.get_str(OAUTH2_KEY_ACCESS_TOKEN);
            if access_token.is_empty() {
                return Err(IdentityError::MissingAccessToken);
            }
            let mut value = HeaderValue::from_str(&format!("Bearer {}", access_token))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .default_headers(headers)
            .build()?;

        Ok(client)
    }
}
