//! Server configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration values for the HTTP server and its API-key gate.
///
/// Loaded from the environment (prefix `HR_`), CLI flags, or a config
/// file, in OrthoConfig's usual precedence order.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HR")]
pub struct ServerSettings {
    /// Socket address the server binds to.
    pub bind_addr: Option<String>,
    /// Shared secret expected in the `X-API-KEY` header. The server
    /// refuses to start without one.
    pub api_key: Option<String>,
}

impl ServerSettings {
    /// The configured bind address, falling back to the default.
    pub fn bind_addr(&self) -> &str {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// The configured API key, when one was provided.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_bind_address_falls_back_to_the_default() {
        let settings = ServerSettings {
            bind_addr: None,
            api_key: None,
        };
        assert_eq!(settings.bind_addr(), DEFAULT_BIND_ADDR);
        assert!(settings.api_key().is_none());
    }

    #[test]
    fn configured_values_win() {
        let settings = ServerSettings {
            bind_addr: Some("127.0.0.1:9090".into()),
            api_key: Some("secret".into()),
        };
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090");
        assert_eq!(settings.api_key(), Some("secret"));
    }
}
