//! traQ OAuth2 provider.

use crate::user::TraqUser;
use async_trait::async_trait;
use ras_identity_core::{
    AuthOptions, CallbackParams, Credentials, IdentityResult, Provider, RawProfile, State,
    TripperFactory, User,
};
use ras_identity_oauth2::{
    AccessType, ApprovalPrompt, OAuth2Config, OAuth2TripperFactory, merge_scopes,
};

pub(crate) const TRAQ_DEFAULT_SCOPE: &str = "read";
pub(crate) const TRAQ_NAME: &str = "traq";
pub(crate) const TRAQ_DISPLAY_NAME: &str = "traQ";
pub(crate) const TRAQ_AUTH_URL: &str = "https://q.trap.jp/api/1.0/oauth2/authorize";
pub(crate) const TRAQ_TOKEN_URL: &str = "https://q.trap.jp/api/1.0/oauth2/token";
pub(crate) const TRAQ_ENDPOINT_PROFILE: &str = "https://q.trap.jp/api/1.0/users/me";

/// Talks OAuth2 to traQ on behalf of the host application.
///
/// Holds no per-request state: the configuration is fixed at construction and
/// every call builds whatever it needs locally, so one instance can be shared
/// across concurrent logins.
#[derive(Debug, Clone)]
pub struct TraqProvider {
    config: OAuth2Config,
    profile_url: String,
    tripper_factory: OAuth2TripperFactory,
}

impl TraqProvider {
    /// Client id and secret come from the traQ developer console and must be
    /// non-empty; `redirect_url` must match the one registered there.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self::with_endpoints(
            client_id,
            client_secret,
            redirect_url,
            TRAQ_AUTH_URL,
            TRAQ_TOKEN_URL,
            TRAQ_ENDPOINT_PROFILE,
        )
    }

    pub(crate) fn with_endpoints(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        profile_url: impl Into<String>,
    ) -> Self {
        let config = OAuth2Config::new(
            auth_url,
            token_url,
            client_id,
            client_secret,
            redirect_url,
            TRAQ_DEFAULT_SCOPE,
        )
        .with_access_type(AccessType::Online)
        .with_approval_prompt(ApprovalPrompt::Auto);

        Self {
            config,
            profile_url: profile_url.into(),
            tripper_factory: OAuth2TripperFactory::default(),
        }
    }

    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Makes an authenticated request and returns the response object.
    pub async fn get(&self, creds: &Credentials, endpoint: &str) -> IdentityResult<RawProfile> {
        ras_identity_oauth2::get(self, creds, endpoint).await
    }

    /// Fetches the profile of the user owning `creds`.
    pub async fn fetch_user(&self, creds: &Credentials) -> IdentityResult<TraqUser> {
        let profile = self.get(creds, &self.profile_url).await?;
        Ok(TraqUser::new(profile, creds, self))
    }
}

#[async_trait]
impl Provider for TraqProvider {
    fn name(&self) -> &str {
        TRAQ_NAME
    }

    fn display_name(&self) -> &str {
        TRAQ_DISPLAY_NAME
    }

    /// The options may carry extra scopes; they are merged with `read` for
    /// this URL only.
    fn begin_auth_url(
        &self,
        state: Option<&State>,
        options: Option<&AuthOptions>,
    ) -> IdentityResult<String> {
        match options.and_then(|o| o.scope.as_deref()) {
            Some(scope) => {
                let config = self
                    .config
                    .with_scope(merge_scopes(&[TRAQ_DEFAULT_SCOPE, scope]));
                ras_identity_oauth2::begin_auth_url_with_base(&config.auth_url, state, &config)
            }
            None => ras_identity_oauth2::begin_auth_url_with_base(
                &self.config.auth_url,
                state,
                &self.config,
            ),
        }
    }

    async fn complete_auth(&self, params: &CallbackParams) -> IdentityResult<Credentials> {
        ras_identity_oauth2::complete_auth(self.tripper_factory(), params, &self.config, self)
            .await
    }

    async fn get_user(&self, creds: &Credentials) -> IdentityResult<Box<dyn User>> {
        let user = self.fetch_user(creds).await?;
        Ok(Box::new(user))
    }

    fn get_client(&self, creds: &Credentials) -> IdentityResult<reqwest::Client> {
        ras_identity_oauth2::get_client(self.tripper_factory(), creds)
    }

    fn tripper_factory(&self) -> &dyn TripperFactory {
        &self.tripper_factory
    }
}
