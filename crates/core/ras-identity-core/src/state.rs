//! Caller-opaque data threaded through the authorize/callback round trip.

use crate::{IdentityError, IdentityResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Round-trip state sent to the provider with the authorization request and
/// echoed back on the callback. Providers pass it through without looking
/// inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(Map<String, Value>);

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str_or_default(&self, key: &str, default: &str) -> String {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    }

    /// URL-safe base64 of the JSON form, suitable for a `state` query parameter.
    pub fn encode(&self) -> IdentityResult<String> {
        let json = serde_json::to_vec(&self.0)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    pub fn decode(param: &str) -> IdentityResult<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(param)
            .map_err(|_| IdentityError::InvalidState)?;
        let map: Map<String, Value> =
            serde_json::from_slice(&bytes).map_err(|_| IdentityError::InvalidState)?;
        Ok(Self(map))
    }
}
