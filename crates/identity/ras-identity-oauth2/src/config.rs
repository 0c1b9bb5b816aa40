//! OAuth2 configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `access_type` sent with the authorization request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    #[default]
    Online,
    Offline,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `approval_prompt` sent with the authorization request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPrompt {
    #[default]
    Auto,
    Force,
}

impl ApprovalPrompt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Force => "force",
        }
    }
}

impl fmt::Display for ApprovalPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth2 provider configuration
///
/// Treated as immutable once a provider is built. Per-request changes such as
/// widening the scope go through [`OAuth2Config::with_scope`], which returns a
/// copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Config {
    pub auth_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    /// Space separated scopes.
    pub scope: String,
    pub access_type: AccessType,
    pub approval_prompt: ApprovalPrompt,
    pub response_type: String,
}

impl OAuth2Config {
    pub fn new(
        auth_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            auth_url: auth_url.into(),
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
            scope: scope.into(),
            access_type: AccessType::default(),
            approval_prompt: ApprovalPrompt::default(),
            response_type: crate::OAUTH2_KEY_CODE.to_string(),
        }
    }

    pub fn with_scope(&self, scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            ..self.clone()
        }
    }

    pub fn with_access_type(mut self, access_type: AccessType) -> Self {
        self.access_type = access_type;
        self
    }

    pub fn with_approval_prompt(mut self, approval_prompt: ApprovalPrompt) -> Self {
        self.approval_prompt = approval_prompt;
        self
    }
}

/// Union of every scope in `scopes`, in first-seen order, joined by spaces.
///
/// Each entry may itself hold several scopes separated by spaces or commas.
pub fn merge_scopes(scopes: &[&str]) -> String {
    let mut merged: Vec<&str> = Vec::new();
    for scope in scopes
        .iter()
        .flat_map(|s| s.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|s| !s.is_empty())
    {
        if !merged.contains(&scope) {
            merged.push(scope);
        }
    }
    merged.join(" ")
}
