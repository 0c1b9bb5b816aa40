//! Authorization-code flow helpers shared by OAuth2 providers.

use crate::config::OAuth2Config;
use crate::{OAUTH2_KEY_ACCESS_TOKEN, OAUTH2_KEY_CODE};
use ras_identity_core::{
    CallbackParams, Credentials, IdentityError, IdentityResult, Provider, RawProfile, State,
    TripperFactory,
};
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use url::Url;

/// Builds the authorization URL for `base` from `config`, attaching the
/// encoded `state` when one is given.
pub fn begin_auth_url_with_base(
    base: &str,
    state: Option<&State>,
    config: &OAuth2Config,
) -> IdentityResult<String> {
    let mut url = Url::parse(base)?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("client_id", &config.client_id);
        params.append_pair("redirect_uri", &config.redirect_url);
        params.append_pair("scope", &config.scope);
        params.append_pair("access_type", config.access_type.as_str());
        params.append_pair("approval_prompt", config.approval_prompt.as_str());
        params.append_pair("response_type", &config.response_type);

        if let Some(state) = state {
            params.append_pair("state", &state.encode()?);
        }
    }

    debug!("Generated authorization URL for {}", base);

    Ok(url.to_string())
}

/// Exchanges the authorization code in `params` for credentials at the
/// configured token endpoint.
pub async fn complete_auth(
    factory: &dyn TripperFactory,
    params: &CallbackParams,
    config: &OAuth2Config,
    provider: &dyn Provider,
) -> IdentityResult<Credentials> {
    if let Some(error) = params.get("error") {
        return Err(IdentityError::AuthorizationDenied {
            error: error.clone(),
            description: params
                .get("error_description")
                .cloned()
                .unwrap_or_else(|| "No description".to_string()),
        });
    }

    let code = params
        .get(OAUTH2_KEY_CODE)
        .filter(|code| !code.is_empty())
        .ok_or(IdentityError::MissingAuthorizationCode)?;

    let form = [
        ("grant_type", "authorization_code"),
        ("code", code.as_str()),
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("redirect_uri", config.redirect_url.as_str()),
    ];

    let client = factory.new_client(None)?;
    let response = client.post(&config.token_url).form(&form).send().await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("Token exchange with {} failed: {}", provider.name(), body);
        return Err(IdentityError::TokenExchangeFailed(format!(
            "{}: {}",
            status, body
        )));
    }

    let values = parse_token_body(&body);

    if let Some(error) = values.get("error") {
        let error = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        error!("Token exchange with {} failed: {}", provider.name(), error);
        return Err(IdentityError::TokenExchangeFailed(error));
    }

    let creds = Credentials::from(values);
    if creds.get_str(OAUTH2_KEY_ACCESS_TOKEN).is_empty() {
        return Err(IdentityError::InvalidTokenResponse(
            "response carries no access_token".to_string(),
        ));
    }

    info!("Successfully exchanged code for tokens with {}", provider.name());
    Ok(creds)
}

/// Token endpoints answer in JSON or, for older servers, form encoding.
fn parse_token_body(body: &str) -> Map<String, Value> {
    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(map) => map,
        Err(_) => url::form_urlencoded::parse(body.as_bytes())
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect(),
    }
}

/// Authenticated GET against `endpoint`, returning the JSON object body.
pub async fn get(
    provider: &dyn Provider,
    creds: &Credentials,
    endpoint: &str,
) -> IdentityResult<RawProfile> {
    let client = provider.tripper_factory().new_client(Some(creds))?;
    let response = client.get(endpoint).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        error!("Request to {} failed: {}", endpoint, error_text);
        return Err(IdentityError::ProfileFetchFailed(format!(
            "{}: {}",
            status, error_text
        )));
    }

    let data: Map<String, Value> = response.json().await?;

    debug!("Successfully retrieved {} from {}", endpoint, provider.name());
    Ok(RawProfile::from(data))
}

/// HTTP client that sends `creds` with every request.
pub fn get_client(
    factory: &dyn TripperFactory,
    creds: &Credentials,
) -> IdentityResult<reqwest::Client> {
    factory.new_client(Some(creds))
}
