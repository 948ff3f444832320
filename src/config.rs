use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, path::Path};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sink: SinkConfig,
    pub tls: TlsConfig,
    pub account: Account,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5000/endpoint".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsConfig {
    pub ca_certificate_paths: Vec<PathBuf>,
}

/// Account metadata attached to every image record sent to the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    pub environment: String,
    pub id: u64,
    pub name: String,
    pub owner: String,
    pub project: String,
    pub provider: String,
    pub team: String,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            environment: "dev".to_string(),
            id: 123,
            name: "hello".to_string(),
            owner: "world".to_string(),
            project: "some-project".to_string(),
            provider: "aws".to_string(),
            team: "some-team".to_string(),
        }
    }
}

/// Loads the config file if one is given, otherwise falls back to the built-in defaults.
pub fn load_optional_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            info!("No config file given, using defaults");
            Ok(Config::default())
        }
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    info!("Loading config from file {}", path.as_ref().display());
    let yaml_str = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

    let expanded = expand_env_vars(&yaml_str)?;

    let config = serde_yaml_ng::from_str(&expanded)
        .context("Failed to parse YAML config after environment variable expansion")?;

    Ok(config)
}

/// Replaces `${VAR}` placeholders with environment variables values.
/// Returns an error naming the first variable that is not set.
fn expand_env_vars(input: &str) -> Result<String> {
    let re =
        Regex::new(r"\$\{([^}]+)}").context("Invalid regex pattern for env var substitution")?;

    let mut values: HashMap<String, String> = HashMap::new();
    for caps in re.captures_iter(input) {
        let var_name = &caps[1];
        if !values.contains_key(var_name) {
            let value = env::var(var_name)
                .map_err(|_| anyhow::anyhow!("Missing environment variable: {}", var_name))?;
            values.insert(var_name.to_string(), value);
        }
    }

    let result = re.replace_all(input, |caps: &regex::Captures| values[&caps[1]].clone());

    Ok(result.into_owned())
}
