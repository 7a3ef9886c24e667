//! General application configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// URL that receives the final result as a JSON POST when a session completes.
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl GeneralConfig {
    /// The callback URL, if one is set and non-blank.
    #[must_use]
    pub fn callback(&self) -> Option<&str> {
        self.callback_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self.callback() {
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                Err(ConfigError::invalid(
                    "general.callback_url",
                    format!("'{url}' is not an http(s) URL"),
                ))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_callback_is_ignored() {
        let config = GeneralConfig {
            callback_url: Some("  ".into()),
        };
        assert_eq!(config.callback(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_http_callback_is_rejected() {
        let config = GeneralConfig {
            callback_url: Some("ftp://example.com/hook".into()),
        };
        assert!(config.validate().is_err());
    }
}
