//! Core identity provider traits and types.
//!
//! Every identity provider plugin implements [`Provider`] and hands back a
//! [`User`] once an OAuth2 exchange has completed. The OAuth2 plumbing itself
//! lives in `ras-identity-oauth2`; this crate only fixes the contract.

mod data;
mod provider;
mod registry;
mod state;
mod user;

use thiserror::Error;

pub use data::{CREDENTIALS_KEY_ID, Credentials, RawProfile};
pub use provider::{AuthOptions, CallbackParams, Provider, ProviderPublicData, TripperFactory};
pub use registry::ProviderRegistry;
pub use state::State;
pub use user::{User, UserPublicData};

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Invalid state parameter")]
    InvalidState,

    #[error("Missing authorization code")]
    MissingAuthorizationCode,

    #[error("Authorization denied: {error}: {description}")]
    AuthorizationDenied { error: String, description: String },

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("Profile request failed: {0}")]
    ProfileFetchFailed(String),

    #[error("Credentials carry no access token")]
    MissingAccessToken,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type IdentityResult<T> = Result<T, IdentityError>;
