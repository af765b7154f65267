//! Loader for `roost.yaml` with environment overlays.
//!
//! Sources are merged in this order, later wins:
//!
//! 1. built-in defaults (every field has one),
//! 2. the YAML/TOML/JSON file(s) attached to the loader,
//! 3. `ROOST__`-prefixed environment variables, `__` separating nested keys
//!    (`ROOST__SITE__BASE_URL=https://example.com`).
//!
//! String values may reference other environment variables as `${VAR}`;
//! those are expanded after merging. Relative paths are resolved against
//! `site.root` by [`RoostConfig::paths`].
use config::{Config, ConfigError, Environment, File};
use roost_common::LogFormat;
use roost_common::observability::LogConfig;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const CONFIG_FILE_NAME: &str = "roost.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RoostConfig {
    pub site: SiteConfig,
    pub bake: BakeConfig,
    pub logging: LoggingConfig,
}

/// Where the dataset lives and where generated artifacts go.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub data: PathBuf,
    pub tweet_dir: PathBuf,
    pub archive: PathBuf,
    pub sitemap: PathBuf,
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            data: PathBuf::from("data.json"),
            tweet_dir: PathBuf::from("tweet"),
            archive: PathBuf::from("archive").join("index.html"),
            sitemap: PathBuf::from("sitemap.xml"),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Append-only TSV recording one OK/FAIL line per record.
    pub log: PathBuf,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            log: PathBuf::from("logs").join("bake.log"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormat,
    pub filter: String,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            format: LogFormat::Text,
            filter: "info".into(),
            stderr: false,
        }
    }
}

impl LoggingConfig {
    /// Translate into the settings `roost_common::observability` expects.
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.filter.clone(),
            ..LogConfig::default()
        }
    }
}

/// Fully resolved artifact locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub data: PathBuf,
    pub tweet_dir: PathBuf,
    pub archive: PathBuf,
    pub sitemap: PathBuf,
    pub bake_log: PathBuf,
}

impl RoostConfig {
    /// Resolve every configured path against `site.root`.
    ///
    /// ```
    /// use roost_config::RoostConfig;
    /// use std::path::PathBuf;
    ///
    /// let mut cfg = RoostConfig::default();
    /// cfg.site.root = PathBuf::from("/srv/site");
    /// let paths = cfg.paths();
    /// assert_eq!(paths.data, PathBuf::from("/srv/site/data.json"));
    /// assert_eq!(paths.bake_log, PathBuf::from("/srv/site/logs/bake.log"));
    /// ```
    pub fn paths(&self) -> SitePaths {
        let root = expand_home(&self.site.root);
        let at_root = |p: &Path| {
            let p = expand_home(p);
            if p.is_absolute() { p } else { root.join(p) }
        };
        SitePaths {
            data: at_root(&self.site.data),
            tweet_dir: at_root(&self.site.tweet_dir),
            archive: at_root(&self.site.archive),
            sitemap: at_root(&self.site.sitemap),
            bake_log: at_root(&self.bake.log),
        }
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Config file locations tried when the user did not name one.
pub fn default_config_candidates() -> Vec<PathBuf> {
    let mut out = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        out.push(dir.join("roost").join(CONFIG_FILE_NAME));
    }
    out
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

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct RoostConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for RoostConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RoostConfigLoader {
    /// Start with no files; only built-in defaults and `ROOST__` env overrides.
    ///
    /// ```
    /// use roost_config::RoostConfigLoader;
    ///
    /// let cfg = RoostConfigLoader::new()
    ///     .with_yaml_str("site:\n  base_url: https://example.com")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(cfg.site.base_url.as_deref(), Some("https://example.com"));
    /// assert_eq!(cfg.logging.filter, "info");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use roost_config::RoostConfigLoader;
    ///
    /// unsafe { std::env::set_var("ROOST_DOC_SITE", "https://from-env.test"); }
    ///
    /// let cfg = RoostConfigLoader::new()
    ///     .with_yaml_str("site:\n  base_url: \"${ROOST_DOC_SITE}\"")
    ///     .load()
    ///     .expect("valid configuration");
    /// assert_eq!(cfg.site.base_url.as_deref(), Some("https://from-env.test"));
    ///
    /// unsafe { std::env::remove_var("ROOST_DOC_SITE"); }
    /// ```
    pub fn load(self) -> Result<RoostConfig, ConfigError> {
        // Environment goes in last so it overrides every file.
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("ROOST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
