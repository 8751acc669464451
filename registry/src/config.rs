//! Registry runtime configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_LOOKUP_BASE_URL: &str = "https://openlibrary.org";
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "gift-registry/0.1";

/// Configuration values controlling book lookups.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GIFT_REGISTRY")]
pub struct RegistrySettings {
    /// Resolve books from the bundled catalogue instead of the network.
    #[ortho_config(default = false)]
    pub offline: bool,
    /// Base URL of the Open Library deployment to query.
    pub lookup_base_url: Option<String>,
    /// Per-request timeout for book lookups, in seconds.
    pub lookup_timeout_secs: Option<u64>,
    /// User-agent sent with lookup requests.
    pub user_agent: Option<String>,
}

impl RegistrySettings {
    /// Return the configured lookup base URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not an absolute URL.
    pub fn lookup_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(
            self.lookup_base_url
                .as_deref()
                .unwrap_or(DEFAULT_LOOKUP_BASE_URL),
        )
    }

    /// Return the configured lookup timeout, falling back to the default.
    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(
            self.lookup_timeout_secs
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECS)
                .max(1),
        )
    }

    /// Return the configured user-agent, falling back to the default.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
