//! Provider configuration
//!
//! The adapter treats provider configuration as opaque input supplied by an external
//! registry. Loaders for environment variables and YAML entries are provided for
//! callers without a registry of their own.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::{Error, ErrorContext, Result};

/// Base URL and credential for one provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "baseUrl", alias = "base_url")]
    pub base_url: String,
    #[serde(rename = "apiKey", alias = "api_key", default)]
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            name: None,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Load from `<ID>_BASE_URL` and `<ID>_API_KEY`.
    ///
    /// The id is upper-cased and `-` becomes `_` (`azure-openai` reads
    /// `AZURE_OPENAI_BASE_URL`). A missing key yields an empty credential.
    pub fn from_env(provider_id: &str) -> Result<Self> {
        let prefix = provider_id.to_uppercase().replace('-', "_");
        let url_var = format!("{}_BASE_URL", prefix);
        let base_url = env::var(&url_var).map_err(|_| {
            Error::configuration_with_context(
                format!("environment variable {} is not set", url_var),
                ErrorContext::new()
                    .with_field_path("provider.base_url")
                    .with_source("provider_config"),
            )
        })?;
        let api_key = env::var(format!("{}_API_KEY", prefix)).unwrap_or_default();

        Ok(Self {
            name: Some(provider_id.to_string()),
            base_url,
            api_key,
        })
    }

    /// Parse a single provider entry from YAML.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(source)?)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
