use anyhow::{Context, Result, bail};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{Html, Redirect},
    routing::get,
};
use ras_identity_core::{AuthOptions, CallbackParams, Provider, ProviderRegistry, UserPublicData};
use ras_identity_traq::TraqProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Configuration for the traQ login demo
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub traq_client_id: String,
    pub traq_client_secret: String,
    pub redirect_uri: String,
    pub server_host: String,
    pub server_port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let traq_client_id = std::env::var("TRAQ_CLIENT_ID")
            .context("TRAQ_CLIENT_ID environment variable is required")?;
        let traq_client_secret = std::env::var("TRAQ_CLIENT_SECRET")
            .context("TRAQ_CLIENT_SECRET environment variable is required")?;

        if traq_client_id.is_empty() {
            bail!("TRAQ_CLIENT_ID must not be empty");
        }
        if traq_client_secret.is_empty() {
            bail!("TRAQ_CLIENT_SECRET must not be empty");
        }

        Ok(Self {
            traq_client_id,
            traq_client_secret,
            // Must match the redirect URL registered for the traQ client.
            redirect_uri: std::env::var("REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8000/auth/traq/callback".to_string()),
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderRegistry>,
}

/// Query parameters for the login route, e.g. `?scope=write,manage_bot`
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    scope: Option<String>,
}

/// Response returned once the callback completes
#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    provider: String,
    after: String,
    user: UserPublicData,
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    let links: String = state
        .providers
        .public_data()
        .into_iter()
        .map(|p| format!(r#"<li><a href="auth/{}/login">{}</a></li>"#, p.name, p.display))
        .collect();

    Html(format!(
        r#"
<html>
  <body>
    <h2>Log in with...</h2>
    <ul>{}</ul>
  </body>
</html>
        "#,
        links
    ))
}

/// Redirects the browser to the provider's authorization page
async fn login_handler(
    State(state): State<AppState>,
    Path(provider_name): Path<String>,
    Query(query): Query<LoginQuery>,
) -> Result<Redirect, String> {
    let provider = state
        .providers
        .get(&provider_name)
        .map_err(|e| e.to_string())?;

    let round_trip = ras_identity_core::State::new().with("after", "success");
    let options = query.scope.map(AuthOptions::with_scope);

    let auth_url = provider
        .begin_auth_url(Some(&round_trip), options.as_ref())
        .map_err(|e| format!("Failed to build authorization URL: {}", e))?;

    info!("Redirecting to {} for login", provider.display_name());
    Ok(Redirect::to(&auth_url))
}

/// Completes the exchange and returns the normalized user
async fn callback_handler(
    State(state): State<AppState>,
    Path(provider_name): Path<String>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<CallbackResponse>, String> {
    let provider = state
        .providers
        .get(&provider_name)
        .map_err(|e| e.to_string())?;

    let creds = provider.complete_auth(&params).await.map_err(|e| {
        error!("OAuth2 callback for {} failed: {}", provider_name, e);
        e.to_string()
    })?;

    let user = provider.get_user(&creds).await.map_err(|e| {
        error!("Failed to load {} user: {}", provider_name, e);
        e.to_string()
    })?;

    let after = params
        .get("state")
        .and_then(|param| ras_identity_core::State::decode(param).ok())
        .map(|s| s.get_str_or_default("after", "error?e=No after parameter was set in the state"))
        .unwrap_or_else(|| "error?e=No state was returned".to_string());

    info!("{} logged in via {}", user.name(), provider.display_name());

    Ok(Json(CallbackResponse {
        provider: provider_name,
        after,
        user: user.public_data(),
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Stopping the server...");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    info!("Starting traQ login demo server");

    let providers = ProviderRegistry::new().with_provider(TraqProvider::new(
        config.traq_client_id.clone(),
        config.traq_client_secret.clone(),
        config.redirect_uri.clone(),
    ));
    info!("Registered providers: {:?}", providers.names());

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/auth/{provider}/login", get(login_handler))
        .route("/auth/{provider}/callback", get(callback_handler))
        .with_state(AppState {
            providers: Arc::new(providers),
        });

    let bind_addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);
    info!("OAuth2 redirect URI: {}", config.redirect_uri);
    warn!(
        "This is an example application. Do not use in production without proper security review."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
