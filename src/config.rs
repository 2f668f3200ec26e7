use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Search page; the query string is appended by [`crate::search::search_url`].
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Hosts `POST /tab` may fetch from. Empty allows any host.
    #[serde(default = "default_tab_hosts")]
    pub tab_hosts: Vec<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            tab_hosts: default_tab_hosts(),
            timeout_secs: None,
        }
    }
}

fn default_search_url() -> String {
    "https://www.ultimate-guitar.com/search.php".to_string()
}
fn default_tab_hosts() -> Vec<String> {
    vec![
        "www.ultimate-guitar.com".to_string(),
        "tabs.ultimate-guitar.com".to_string(),
    ]
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.server.bind.trim().is_empty() {
            anyhow::bail!("server.bind must not be empty");
        }

        let search_url = url::Url::parse(&self.upstream.search_url).with_context(|| {
            format!(
                "upstream.search_url is not a valid URL: {}",
                self.upstream.search_url
            )
        })?;
        match search_url.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!(
                "upstream.search_url must use http or https, got '{}'",
                other
            ),
        }

        if self.upstream.timeout_secs == Some(0) {
            anyhow::bail!("upstream.timeout_secs must be > 0");
        }

        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;

    Ok(config)
}
