//! traQ identity provider.
//!
//! Plugs the traQ chat service into the `ras-identity` provider contract.
//! [`TraqProvider`] declares traQ's OAuth2 endpoints and delegates the
//! protocol to `ras-identity-oauth2`; [`TraqUser`] maps the `users/me`
//! response onto the common [`User`] view.
//!
//! ```no_run
//! use ras_identity_traq::{Provider, State, TraqProvider};
//!
//! let provider = TraqProvider::new(
//!     "client-id",
//!     "client-secret",
//!     "http://localhost:8000/auth/traq/callback",
//! );
//! let state = State::new().with("after", "/");
//! let url = provider.begin_auth_url(Some(&state), None).unwrap();
//! assert!(url.starts_with("https://q.trap.jp/api/1.0/oauth2/authorize"));
//! ```

mod provider;
mod user;

#[cfg(test)]
mod tests;

pub use provider::TraqProvider;
pub use user::TraqUser;

// Re-export common types for convenience
pub use ras_identity_core::{AuthOptions, CallbackParams, Credentials, Provider, State, User};
