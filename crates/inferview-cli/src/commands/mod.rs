//! CLI command implementations.

pub mod classify;
pub mod output;
pub mod render;
pub mod show;
pub mod upload;

use std::time::Duration;

use inferview::ClientConfig;

/// Client configuration from the environment plus any command-line overrides.
pub fn client_config(api_url: Option<&str>, timeout_secs: Option<u64>) -> ClientConfig {
    let mut config = ClientConfig::from_env();
    if let Some(url) = api_url {
        config = config.with_base_url(url);
    }
    if let Some(secs) = timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    config
}
