//! Generic OAuth2 authorization-code helpers.
//!
//! Provider plugins describe their endpoints with an [`OAuth2Config`] and
//! delegate the protocol work here: building the authorization URL,
//! exchanging the callback code for [`Credentials`](ras_identity_core::Credentials),
//! and making bearer-authenticated requests through an [`OAuth2TripperFactory`].
//! Errors are reported as [`IdentityError`](ras_identity_core::IdentityError)
//! so providers can hand them to their caller untouched.

mod client;
mod config;
mod tripper;


pub use client::{begin_auth_url_with_base, complete_auth, get, get_client};
pub use config::{AccessType, ApprovalPrompt, OAuth2Config, merge_scopes};
pub use tripper::OAuth2TripperFactory;

// Re-export common types for convenience
pub use ras_identity_core::{Credentials, IdentityError, IdentityResult, Provider, State};

pub const OAUTH2_KEY_ACCESS_TOKEN: &str = "access_token";
pub const OAUTH2_KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const OAUTH2_KEY_EXPIRES_IN: &str = "expires_in";
pub const OAUTH2_KEY_SCOPE: &str = "scope";
pub const OAUTH2_KEY_CODE: &str = "code";
