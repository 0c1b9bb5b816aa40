//! Tests for the traQ provider and user mapping.

#[cfg(test)]
mod user_tests {
    use crate::TraqUser;
    use crate::user::{
        TRAQ_KEY_DISPLAY_NAME, TRAQ_KEY_ICON_FILE_ID, TRAQ_KEY_ID, TRAQ_KEY_NAME,
        TRAQ_USER_ICON_PATH,
    };
    use async_trait::async_trait;
    use ras_identity_core::{
        AuthOptions, CREDENTIALS_KEY_ID, CallbackParams, Credentials, IdentityError,
        IdentityResult, Provider, RawProfile, State, TripperFactory, User,
    };
    use ras_identity_oauth2::{OAUTH2_KEY_ACCESS_TOKEN, OAuth2TripperFactory};
    use std::collections::HashMap;

    struct NamedProvider {
        name: &'static str,
        tripper_factory: OAuth2TripperFactory,
    }

    impl NamedProvider {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                tripper_factory: OAuth2TripperFactory::default(),
            }
        }
    }

    #[async_trait]
    impl Provider for NamedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn display_name(&self) -> &str {
            self.name
        }

        fn begin_auth_url(
            &self,
            _state: Option<&State>,
            _options: Option<&AuthOptions>,
        ) -> IdentityResult<String> {
            Err(IdentityError::ConfigError("not used".to_string()))
        }

        async fn complete_auth(&self, _params: &CallbackParams) -> IdentityResult<Credentials> {
            Err(IdentityError::MissingAuthorizationCode)
        }

        async fn get_user(&self, _creds: &Credentials) -> IdentityResult<Box<dyn User>> {
            Err(IdentityError::ProfileFetchFailed("not used".to_string()))
        }

        fn get_client(&self, creds: &Credentials) -> IdentityResult<reqwest::Client> {
            self.tripper_factory.new_client(Some(creds))
        }

        fn tripper_factory(&self) -> &dyn TripperFactory {
            &self.tripper_factory
        }
    }

    fn mathew() -> RawProfile {
        RawProfile::new()
            .with(TRAQ_KEY_ID, "123435467890")
            .with(TRAQ_KEY_NAME, "Mathew")
            .with(TRAQ_KEY_DISPLAY_NAME, "Mat")
            .with(TRAQ_KEY_ICON_FILE_ID, "aaaa")
    }

    #[test]
    fn test_user_is_usable_as_trait_object() {
        let user: Box<dyn User> = Box::new(TraqUser::default());

        assert_eq!(user.name(), "");
        assert_eq!(user.nickname(), "");
        assert_eq!(user.avatar_url(), "");
        assert!(user.provider_credentials().is_empty());
    }

    #[test]
    fn test_new_user() {
        let provider = NamedProvider::new("providerName");
        let data = mathew();
        let creds = Credentials::new().with(OAUTH2_KEY_ACCESS_TOKEN, "ABC123");

        let user = TraqUser::new(data.clone(), &creds, &provider);

        assert_eq!(user.data(), &data);
        assert_eq!(user.name(), "Mathew");
        assert_eq!(user.email(), "");
        assert_eq!(user.nickname(), "Mat");
        assert_eq!(user.avatar_url(), format!("{}aaaa", TRAQ_USER_ICON_PATH));
        assert_eq!(user.auth_code(), "");

        let creds = &user.provider_credentials()[provider.name()];
        assert_eq!(creds.get_str(OAUTH2_KEY_ACCESS_TOKEN), "ABC123");
        assert_eq!(creds.get_str(CREDENTIALS_KEY_ID), "123435467890");
    }

    #[test]
    fn test_new_user_leaves_callers_credentials_alone() {
        let provider = NamedProvider::new("traq");
        let creds = Credentials::new().with(OAUTH2_KEY_ACCESS_TOKEN, "ABC123");

        let _user = TraqUser::new(mathew(), &creds, &provider);

        assert!(!creds.contains_key(CREDENTIALS_KEY_ID));
    }

    #[test]
    fn test_nickname_falls_back_to_name() {
        let provider = NamedProvider::new("traq");
        let data = RawProfile::new().with(TRAQ_KEY_NAME, "Mathew");

        let user = TraqUser::new(data, &Credentials::new(), &provider);
        assert_eq!(user.nickname(), "Mathew");

        let data = RawProfile::new()
            .with(TRAQ_KEY_NAME, "Mathew")
            .with(TRAQ_KEY_DISPLAY_NAME, "");
        let user = TraqUser::new(data, &Credentials::new(), &provider);
        assert_eq!(user.nickname(), "Mathew");
    }

    #[test]
    fn test_name_falls_back_through_candidates() {
        let provider = NamedProvider::new("traq");
        let data = RawProfile::new().with("userName", "mat");

        let user = TraqUser::new(data, &Credentials::new(), &provider);
        assert_eq!(user.name(), "mat");
        assert_eq!(user.nickname(), "mat");
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let provider = NamedProvider::new("traq");
        let user = TraqUser::new(RawProfile::new(), &Credentials::new(), &provider);

        assert_eq!(user.name(), "");
        assert_eq!(user.nickname(), "");
        assert_eq!(user.email(), "");
        assert_eq!(user.avatar_url(), "");
        assert_eq!(user.id_for_provider("traq"), "");
    }

    #[test]
    fn test_numeric_and_alternate_ids() {
        let provider = NamedProvider::new("traq");

        let data = RawProfile::new().with(TRAQ_KEY_ID, 42);
        let user = TraqUser::new(data, &Credentials::new(), &provider);
        assert_eq!(user.id_for_provider("traq"), "42");

        let data = RawProfile::new().with("id", "uuid-like-id");
        let user = TraqUser::new(data, &Credentials::new(), &provider);
        assert_eq!(user.id_for_provider("traq"), "uuid-like-id");
    }

    #[test]
    fn test_id_for_provider() {
        let mut provider_credentials = HashMap::new();
        provider_credentials.insert(
            "traq".to_string(),
            Credentials::new().with(CREDENTIALS_KEY_ID, "traqid"),
        );
        let user = TraqUser::from_parts(RawProfile::new(), provider_credentials);

        assert_eq!(user.id_for_provider("traq"), "traqid");
        assert_eq!(user.id_for_provider("github"), "");
        assert_eq!(user.id_for_provider(""), "");
    }

    #[test]
    fn test_public_data_omits_credentials() {
        let provider = NamedProvider::new("traq");
        let creds = Credentials::new().with(OAUTH2_KEY_ACCESS_TOKEN, "secret-token");
        let user = TraqUser::new(mathew(), &creds, &provider);

        let public = user.public_data();
        assert_eq!(public.name, "Mathew");
        assert_eq!(public.nickname, "Mat");
        assert_eq!(public.ids["traq"], "123435467890");

        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("secret-token"));
    }
}

#[cfg(test)]
mod provider_tests {
    use crate::provider::{TRAQ_AUTH_URL, TRAQ_DEFAULT_SCOPE};
    use crate::{AuthOptions, State, TraqProvider};
    use ras_identity_core::{Provider, ProviderRegistry};
    use std::collections::HashMap;
    use url::Url;

    fn provider() -> TraqProvider {
        TraqProvider::new(
            "test_client_id",
            "test_secret",
            "http://localhost:8000/auth/traq/callback",
        )
    }

    fn query(auth_url: &str) -> HashMap<String, String> {
        Url::parse(auth_url)
            .unwrap()
            .query_pairs()
            .into_owned()
            .collect()
    }

    #[test]
    fn test_names() {
        let provider = provider();

        assert_eq!(provider.name(), "traq");
        assert_eq!(provider.display_name(), "traQ");

        let public = provider.public_data();
        assert_eq!(public.name, "traq");
        assert_eq!(public.display, "traQ");
    }

    #[test]
    fn test_default_configuration() {
        let provider = provider();
        let config = provider.config();

        assert_eq!(config.auth_url, TRAQ_AUTH_URL);
        assert_eq!(config.token_url, "https://q.trap.jp/api/1.0/oauth2/token");
        assert_eq!(config.scope, TRAQ_DEFAULT_SCOPE);
        assert_eq!(config.client_id, "test_client_id");
        assert_eq!(config.client_secret, "test_secret");
        assert_eq!(config.response_type, "code");
    }

    #[test]
    fn test_begin_auth_url() {
        let state = State::new().with("after", "success");
        let auth_url = provider().begin_auth_url(Some(&state), None).unwrap();

        assert!(auth_url.starts_with(TRAQ_AUTH_URL));

        let params = query(&auth_url);
        assert_eq!(params["client_id"], "test_client_id");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:8000/auth/traq/callback"
        );
        assert_eq!(params["scope"], "read");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["access_type"], "online");
        assert_eq!(params["approval_prompt"], "auto");
        assert_eq!(State::decode(&params["state"]).unwrap(), state);
    }

    #[test]
    fn test_scope_option_is_merged_with_default() {
        let provider = provider();
        let options = AuthOptions::with_scope("read,write");

        let auth_url = provider.begin_auth_url(None, Some(&options)).unwrap();
        assert_eq!(query(&auth_url)["scope"], "read write");

        let options = AuthOptions::with_scope("write");
        let auth_url = provider.begin_auth_url(None, Some(&options)).unwrap();
        assert_eq!(query(&auth_url)["scope"], "read write");

        let auth_url = provider
            .begin_auth_url(None, Some(&AuthOptions::default()))
            .unwrap();
        assert_eq!(query(&auth_url)["scope"], "read");
    }

    #[test]
    fn test_scope_does_not_leak_between_calls() {
        let provider = provider();

        let options = AuthOptions::with_scope("write manage_bot");
        let widened = provider.begin_auth_url(None, Some(&options)).unwrap();
        assert_eq!(query(&widened)["scope"], "read write manage_bot");

        let plain = provider.begin_auth_url(None, None).unwrap();
        assert_eq!(query(&plain)["scope"], "read");

        let options = AuthOptions::with_scope("write");
        let other = provider.begin_auth_url(None, Some(&options)).unwrap();
        assert_eq!(query(&other)["scope"], "read write");

        assert_eq!(provider.config().scope, "read");
    }

    #[test]
    fn test_tripper_factory_is_stable() {
        let provider = provider();

        let first = provider.tripper_factory();
        let second = provider.tripper_factory();
        assert!(std::ptr::addr_eq(first, second));
    }

    #[test]
    fn test_registered_by_name() {
        let registry = ProviderRegistry::new().with_provider(provider());

        let traq = registry.get("traq").unwrap();
        assert_eq!(traq.display_name(), "traQ");
    }
}

#[cfg(test)]
mod flow_tests {
    use crate::TraqProvider;
    use ras_identity_core::{CallbackParams, Credentials, IdentityError, Provider, User};
    use ras_identity_oauth2::OAUTH2_KEY_ACCESS_TOKEN;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, TraqProvider) {
        let mock_server = MockServer::start().await;

        let provider = TraqProvider::with_endpoints(
            "mock_client_id",
            "mock_secret",
            "http://localhost:8000/auth/traq/callback",
            format!("{}/api/1.0/oauth2/authorize", mock_server.uri()),
            format!("{}/api/1.0/oauth2/token", mock_server.uri()),
            format!("{}/api/1.0/users/me", mock_server.uri()),
        );

        (mock_server, provider)
    }

    fn callback(code: &str) -> CallbackParams {
        let mut params = CallbackParams::new();
        params.insert("code".to_string(), code.to_string());
        params
    }

    #[tokio::test]
    async fn test_full_login_flow() {
        let (mock_server, provider) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/1.0/oauth2/token"))
            .and(body_string_contains("code=traq_code"))
            .and(body_string_contains(
                "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fauth%2Ftraq%2Fcallback",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "traq_access_token",
                "token_type": "Bearer",
                "expires_in": 31536000,
                "scope": "read"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/1.0/users/me"))
            .and(header("Authorization", "Bearer traq_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "userId": "d8d1a8b9-5b9e-4c4e-9c1a-3f8e6b1e2c4d",
                "name": "takashi_trap",
                "displayName": "東京工業大学",
                "iconFileId": "0a1b2c3d",
                "bot": false,
                "twitterId": ""
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let creds = provider.complete_auth(&callback("traq_code")).await.unwrap();
        assert_eq!(creds.get_str(OAUTH2_KEY_ACCESS_TOKEN), "traq_access_token");

        let user = provider.get_user(&creds).await.unwrap();

        assert_eq!(user.name(), "takashi_trap");
        assert_eq!(user.nickname(), "東京工業大学");
        assert_eq!(user.email(), "");
        assert_eq!(
            user.avatar_url(),
            "https://q.trap.jp/api/1.0/files/0a1b2c3d"
        );
        assert_eq!(
            user.id_for_provider("traq"),
            "d8d1a8b9-5b9e-4c4e-9c1a-3f8e6b1e2c4d"
        );
        assert_eq!(user.data().get_str("bot"), "false");
        assert_eq!(
            user.provider_credentials()["traq"].get_str(OAUTH2_KEY_ACCESS_TOKEN),
            "traq_access_token"
        );
    }

    #[tokio::test]
    async fn test_exchange_failure_is_propagated() {
        let (mock_server, provider) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/1.0/oauth2/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&mock_server)
            .await;

        let result = provider.complete_auth(&callback("expired")).await;
        assert!(matches!(result, Err(IdentityError::TokenExchangeFailed(_))));
    }

    #[tokio::test]
    async fn test_profile_failure_is_propagated() {
        let (mock_server, provider) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/1.0/users/me"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&mock_server)
            .await;

        let creds = Credentials::new().with(OAUTH2_KEY_ACCESS_TOKEN, "token");
        let result = provider.fetch_user(&creds).await;

        assert!(matches!(result, Err(IdentityError::ProfileFetchFailed(_))));
    }

    #[tokio::test]
    async fn test_client_reaches_other_endpoints() {
        let (mock_server, provider) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/1.0/channels"))
            .and(header("Authorization", "Bearer token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let creds = Credentials::new().with(OAUTH2_KEY_ACCESS_TOKEN, "token");

        let channels = provider
            .get(&creds, &format!("{}/api/1.0/channels", mock_server.uri()))
            .await
            .unwrap();
        assert!(channels.as_map().is_empty());
    }
}
