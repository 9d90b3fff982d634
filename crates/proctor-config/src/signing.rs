//! QR payload signing configuration.
//!
//! The signing secret is loaded once at process start through the figment
//! chain and passed into `proctor-qr` by value — it is never read from
//! ambient global state afterwards, and never embedded in any ticket beyond
//! the signature it produces.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SigningConfig {
    /// Server-held HMAC secret for ticket QR payloads.
    #[serde(default)]
    pub secret: String,
}

impl SigningConfig {
    /// Check whether a signing secret has been provided.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        assert!(!SigningConfig::default().is_configured());
    }

    #[test]
    fn configured_when_secret_set() {
        let config = SigningConfig {
            secret: "server-held-secret".into(),
        };
        assert!(config.is_configured());
    }
}
