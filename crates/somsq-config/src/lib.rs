use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use somsq_core::ExtractMode;
use thiserror::Error;

const APP_DIR: &str = "somsq";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_SLEEP_SECS: u64 = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PHONE_FIELD: &str = "valor_medio_contacto";
pub const DEFAULT_OUTPUT: &str = "output.csv";
pub const DEFAULT_LOG: &str = "log_requests.csv";
pub const DEFAULT_USER_AGENT: &str = "somsq";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub extract: ExtractMode,
    pub sleep_secs: u64,
    pub phone_field: String,
    pub output: PathBuf,
    pub log: PathBuf,
    pub dedupe: bool,
    pub lookup: LookupConfig,
}

#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub base_url: Option<String>,
    pub id_usuario: Option<String>,
    pub timeout_secs: u64,
    pub verify_tls: bool,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            extract: ExtractMode::default(),
            sleep_secs: DEFAULT_SLEEP_SECS,
            phone_field: DEFAULT_PHONE_FIELD.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            log: PathBuf::from(DEFAULT_LOG),
            dedupe: false,
            lookup: LookupConfig {
                base_url: None,
                id_usuario: None,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                verify_tls: false,
                user_agent: DEFAULT_USER_AGENT.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("invalid value for {field}: must not be empty")]
    EmptyField { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    extract: Option<ExtractMode>,
    sleep_secs: Option<u64>,
    phone_field: Option<String>,
    output: Option<PathBuf>,
    log: Option<PathBuf>,
    dedupe: Option<bool>,
    lookup: Option<LookupFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LookupFile {
    base_url: Option<String>,
    id_usuario: Option<String>,
    timeout_secs: Option<u64>,
    verify_tls: Option<bool>,
    user_agent: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(extract) = parsed.extract {
        config.extract = extract;
    }
    if let Some(sleep_secs) = parsed.sleep_secs {
        config.sleep_secs = sleep_secs;
    }
    if let Some(phone_field) = parsed.phone_field {
        config.phone_field = non_empty("phone_field", phone_field)?;
    }
    if let Some(output) = parsed.output {
        config.output = output;
    }
    if let Some(log) = parsed.log {
        config.log = log;
    }
    if let Some(dedupe) = parsed.dedupe {
        config.dedupe = dedupe;
    }

    if let Some(lookup) = parsed.lookup {
        if let Some(base_url) = lookup.base_url {
            config.lookup.base_url = Some(non_empty("lookup.base_url", base_url)?);
        }
        if let Some(id_usuario) = lookup.id_usuario {
            config.lookup.id_usuario = Some(non_empty("lookup.id_usuario", id_usuario)?);
        }
        if let Some(timeout) = lookup.timeout_secs {
            if timeout == 0 {
                return Err(ConfigError::InvalidTimeout(timeout));
            }
            config.lookup.timeout_secs = timeout;
        }
        if let Some(verify_tls) = lookup.verify_tls {
            config.lookup.verify_tls = verify_tls;
        }
        if let Some(user_agent) = lookup.user_agent {
            config.lookup.user_agent = non_empty("lookup.user_agent", user_agent)?;
        }
    }

    Ok(config)
}

fn non_empty(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}
