//! Lenient string-keyed payloads: OAuth2 credentials and raw provider profiles.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Credentials key under which a provider stores the user's stable identifier.
pub const CREDENTIALS_KEY_ID: &str = "id";

/// Reads `key` as a string. Numbers and booleans are rendered, everything
/// else (including a missing key) becomes the empty string.
fn lenient_str(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Opaque bag of values produced by a completed OAuth2 exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Map<String, Value>);

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> String {
        lenient_str(&self.0, key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Credentials {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Untyped response of a provider's "who am I" endpoint.
///
/// Field access never fails: absent or non-scalar fields read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(Map<String, Value>);

impl RawProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> String {
        lenient_str(&self.0, key)
    }

    /// First non-empty value among `keys`, or `""`.
    pub fn first_str(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.get_str(key))
            .find(|value| !value.is_empty())
            .unwrap_or_default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for RawProfile {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
