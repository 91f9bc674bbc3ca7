//! # pmosoap configuration
//!
//! Settings for the HTTP agents used to fetch WSDL documents and to send
//! SOAP requests.
//!
//! Values are resolved in this order, later sources winning:
//! 1. The embedded default configuration (`pmosoap.yaml`)
//! 2. An optional YAML file given to [`SoapConfig::load`]
//! 3. Environment variables `PMOSOAP_CONFIG__<SECTION>__<KEY>`
//!
//! ```no_run
//! use std::path::Path;
//! use pmosoap::SoapConfig;
//!
//! // PMOSOAP_CONFIG__HTTP__TIMEOUT_SECS=5 overrides http.timeout_secs
//! let config = SoapConfig::load(Some(Path::new("soap.yaml")))?;
//! println!("timeout: {}s", config.http.timeout_secs);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::{env, fs, path::Path};

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::info;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("pmosoap.yaml");

const ENV_PREFIX: &str = "PMOSOAP_CONFIG__";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SoapConfig {
    pub http: HttpConfig,
    pub wsdl: WsdlConfig,
}

/// Agent settings for SOAP calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Larger response bodies are rejected by the transport.
    pub max_response_bytes: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

/// Agent settings for WSDL retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WsdlConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for WsdlConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("pmosoap/{}", env!("CARGO_PKG_VERSION"))
}

impl SoapConfig {
    /// Loads the configuration, merging `path` (if any) over the embedded
    /// defaults and applying environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut value = lower_keys_value(serde_yaml::from_str(DEFAULT_CONFIG)?);

        if let Some(path) = path {
            let data = fs::read(path)
                .map_err(|e| anyhow!("Cannot read config file {}: {e}", path.display()))?;
            info!(config_file = %path.display(), "Loaded SOAP config file");
            let external: Value = serde_yaml::from_slice(&data)?;
            merge_yaml(&mut value, &lower_keys_value(external));
        }

        apply_env_overrides(&mut value, env::vars());

        Ok(serde_yaml::from_value(value)?)
    }
}

fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        // scalaires ou séquences : on remplace
        (d, e) => *d = e.clone(),
    }
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| {
                    let k = match k {
                        Value::String(s) => Value::String(s.to_lowercase()),
                        other => other,
                    };
                    (k, lower_keys_value(v))
                })
                .collect(),
        ),
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

fn apply_env_overrides(config: &mut Value, vars: impl IntoIterator<Item = (String, String)>) {
    for (key, value) in vars {
        let Some(path) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let path: Vec<&str> = path.split("__").collect();
        set_value(config, &path, convert_env_value(&value));
    }
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn set_value(data: &mut Value, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        *data = value;
        return;
    };
    if !data.is_mapping() {
        *data = Value::Mapping(Mapping::new());
    }
    if let Value::Mapping(map) = data {
        let entry = map
            .entry(Value::String(first.to_lowercase()))
            .or_insert(Value::Null);
        set_value(entry, rest, value);
    }
}
