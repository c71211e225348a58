//! Bulk-upload client configuration
//!
//! Each setting resolves CLI argument → environment → TOML → default. The
//! API token has no default and must come from somewhere.

use f411_common::config::{load_toml_config, resolve_string, sources_defining};
use f411_common::Error;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:4000/api";
pub const DEFAULT_PAGE_SIZE: u32 = 25;

const ENV_API_URL: &str = "F411_API_URL";
const ENV_API_TOKEN: &str = "F411_API_TOKEN";
const ENV_PAGE_SIZE: &str = "F411_PAGE_SIZE";

/// Resolved configuration for the bulk-upload client
#[derive(Debug, Clone)]
pub struct BuConfig {
    pub api_base_url: String,
    pub api_token: String,
    pub page_size: u32,
    pub log_level: String,
}

impl BuConfig {
    /// Resolve all settings from CLI args, environment and the TOML file
    pub fn resolve(
        cli_url: Option<&str>,
        cli_token: Option<&str>,
        cli_page_size: Option<u32>,
    ) -> f411_common::Result<Self> {
        let toml = load_toml_config();

        let api_base_url = resolve_string(
            cli_url,
            ENV_API_URL,
            toml.api_base_url.as_deref(),
            Some(DEFAULT_API_URL),
        )
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let token_sources = sources_defining(cli_token, ENV_API_TOKEN, toml.api_token.as_deref());
        if token_sources.len() > 1 {
            warn!(
                "API token found in multiple sources: {}. Using {} (highest priority).",
                token_sources.join(", "),
                token_sources[0]
            );
        }

        let api_token = resolve_string(cli_token, ENV_API_TOKEN, toml.api_token.as_deref(), None)
            .ok_or_else(|| {
                Error::Config(
                    "API token not configured. Provide it using one of:\n\
                     1. Command line: --token <token>\n\
                     2. Environment: F411_API_TOKEN=<token>\n\
                     3. TOML config: ~/.config/f411/config.toml (api_token = \"<token>\")"
                        .to_string(),
                )
            })?;

        let page_size = cli_page_size
            .or_else(|| {
                std::env::var(ENV_PAGE_SIZE)
                    .ok()
                    .and_then(|v| v.parse().ok())
            })
            .or(toml.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(Self {
            api_base_url,
            api_token,
            page_size,
            log_level: toml.logging.level,
        })
    }

    /// Config with explicit values (tests, embedding)
    pub fn with_values(api_base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            api_token: api_token.into(),
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}
