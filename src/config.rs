//! Runtime configuration sourced from the environment.
//!
//! All three knobs come from environment variables (the tool is meant to run
//! from a systemd timer unit), but they are parsed exactly once into an
//! explicit [`Config`] value that gets passed down, so nothing below main
//! reads the process environment.

use std::env;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::DroplanError;

/// Secure string type that zeroizes memory on drop.
/// Used for the API access token.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Runtime configuration for one reconciliation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// DigitalOcean API token (`DO_KEY`, required)
    pub access_token: SecureString,
    /// Restrict the peer inventory to droplets carrying this tag (`DO_TAG`)
    pub peer_tag: Option<String>,
    /// Also manage an allow-list chain on the public interface (`PUBLIC=true`)
    pub manage_public: bool,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, DroplanError> {
        Self::from_values(
            env::var("DO_KEY").ok(),
            env::var("DO_TAG").ok(),
            env::var("PUBLIC").ok(),
        )
    }

    fn from_values(
        token: Option<String>,
        tag: Option<String>,
        public: Option<String>,
    ) -> Result<Self, DroplanError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(DroplanError::MissingToken)?;

        Ok(Self {
            access_token: SecureString::new(token),
            peer_tag: tag.filter(|t| !t.is_empty()),
            manage_public: public.as_deref() == Some("true"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_is_fatal() {
        let err = Config::from_values(None, None, None).unwrap_err();
        assert!(matches!(err, DroplanError::MissingToken));
    }

    #[test]
    fn test_empty_token_is_fatal() {
        let err = Config::from_values(Some(String::new()), None, None).unwrap_err();
        assert!(matches!(err, DroplanError::MissingToken));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_values(Some("token".into()), None, None).unwrap();
        assert_eq!(config.access_token.as_str(), "token");
        assert!(config.peer_tag.is_none());
        assert!(!config.manage_public);
    }

    #[test]
    fn test_tag_and_public() {
        let config = Config::from_values(
            Some("token".into()),
            Some("cluster-a".into()),
            Some("true".into()),
        )
        .unwrap();
        assert_eq!(config.peer_tag.as_deref(), Some("cluster-a"));
        assert!(config.manage_public);
    }

    #[test]
    fn test_public_must_be_exactly_true() {
        let config =
            Config::from_values(Some("token".into()), None, Some("false".into())).unwrap();
        assert!(!config.manage_public);

        let config = Config::from_values(Some("token".into()), None, Some("1".into())).unwrap();
        assert!(!config.manage_public);
    }

    #[test]
    fn test_empty_tag_treated_as_unset() {
        let config =
            Config::from_values(Some("token".into()), Some(String::new()), None).unwrap();
        assert!(config.peer_tag.is_none());
    }

    #[test]
    fn test_secure_string_debug_redacted() {
        let s = SecureString::from("super-secret");
        assert_eq!(format!("{:?}", s), "[REDACTED]");
    }
}
