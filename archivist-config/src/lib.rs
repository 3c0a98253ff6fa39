//! Loader for archivist-search configuration with YAML + environment overlays.
//!
//! Sources are merged in the order they are added, then `ARCHIVIST__`-prefixed
//! environment variables win (`ARCHIVIST__VERSION=2`). String values may
//! reference the environment as `${VAR}`; references are expanded recursively
//! after merging, so secrets such as instance tokens can stay out of the file.
use archivist_common::observability::{LogConfig, LogFormat};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const APP_DIR: &str = "archivist-search";
const CONFIG_FILE: &str = "archivist.yaml";

#[derive(Debug, Deserialize)]
pub struct ArchivistConfig {
    pub version: Option<String>,
    #[serde(default)]
    pub logging: Option<LoggingSettings>,
    #[serde(default)]
    pub engines: Vec<EngineSpec>,
}

impl ArchivistConfig {
    pub fn enabled_engines(&self) -> impl Iterator<Item = &EngineSpec> {
        self.engines.iter().filter(|e| e.is_enabled())
    }

    /// Pick the enabled engine called `name`, or the first enabled one.
    pub fn select_engine(&self, name: Option<&str>) -> Option<&EngineSpec> {
        match name {
            Some(wanted) => self.enabled_engines().find(|e| e.name == wanted),
            None => self.enabled_engines().next(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub emit_stderr: bool,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl LoggingSettings {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.emit_stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

fn default_filter() -> String {
    "info".into()
}

/// Shared fields + the per-kind details.
#[derive(Debug, Deserialize)]
pub struct EngineSpec {
    pub name: String,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub retries: Option<usize>,
    #[serde(flatten)]
    pub details: EngineDetails,
}

impl EngineSpec {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

/// The tag is `kind`; the payload lives in `config`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
pub enum EngineDetails {
    #[serde(rename = "tubearchivist")]
    TubeArchivist { config: TubeArchivistSettings },
}

#[derive(Debug, Clone, Deserialize)]
pub struct TubeArchivistSettings {
    pub base_url: String,
    /// Unquoted numeric tokens (`token: 12345`) are accepted as their decimal
    /// text. Quote tokens with leading zeros; YAML drops them otherwise.
    #[serde(default, deserialize_with = "string_or_number")]
    pub token: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Unsigned(u64),
        Signed(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Unsigned(n) => n.to_string(),
        Raw::Signed(n) => n.to_string(),
    })
}

/// `<config dir>/archivist-search/archivist.yaml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (files + env overrides).
pub struct ArchivistConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ArchivistConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchivistConfigLoader {
    /// Start empty; the `ARCHIVIST__` environment overlay is applied last by [`Self::load`].
    ///
    /// ```
    /// use archivist_config::ArchivistConfigLoader;
    ///
    /// let config = ArchivistConfigLoader::new()
    ///     .with_yaml_str("version: '1'\nengines: []")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert!(config.engines.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent (env-only deployments).
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet (tests, CLI overrides).
    ///
    /// ```
    /// use archivist_config::{ArchivistConfigLoader, EngineDetails};
    ///
    /// let cfg = ArchivistConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "test"
    /// engines:
    ///   - name: "home"
    ///     kind: "tubearchivist"
    ///     config:
    ///       base_url: "http://ta.local:8000"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// let EngineDetails::TubeArchivist { config } = &cfg.engines[0].details;
    /// assert_eq!(config.base_url, "http://ta.local:8000");
    /// assert_eq!(config.token, "");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    pub fn load(self) -> Result<ArchivistConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("ARCHIVIST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
