//! Lookup of registered providers by name.

use crate::{IdentityError, IdentityResult, Provider, ProviderPublicData};
use std::collections::HashMap;
use std::sync::Arc;

/// Providers registered once at startup and shared across requests.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.add(Arc::new(provider));
        self
    }

    /// Registers `provider`, replacing any provider of the same name.
    pub fn add(&mut self, provider: Arc<dyn Provider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> IdentityResult<Arc<dyn Provider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| IdentityError::ProviderNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn public_data(&self) -> Vec<ProviderPublicData> {
        let mut data: Vec<_> = self.providers.values().map(|p| p.public_data()).collect();
        data.sort_by(|a, b| a.name.cmp(&b.name));
        data
    }
}
