use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use serde::{Deserialize, Serialize};

use crate::core::{KindRegistry, Origin};

pub const CONFIG_FILE_NAME: &str = ".catsyncrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// JSON dataset holding the canonical strings and official translations.
    #[serde(default = "default_source_file")]
    pub source_file: String,
    /// Directory of previously written catalogs (`<lang>/<topic>.po`).
    #[serde(default = "default_catalog_root")]
    pub catalog_root: String,
    /// Directory of override files (`<lang>.json`).
    #[serde(default = "default_overrides_root")]
    pub overrides_root: String,
    /// Where catalogs are written. Defaults to `catalogRoot`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_root: Option<String>,
    /// Stream priority, highest first.
    #[serde(default = "default_priority")]
    pub priority: Vec<Origin>,
    #[serde(default)]
    pub kinds: Vec<KindConfig>,
}

/// Extra knowledge about an entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KindConfig {
    pub name: String,
    /// Former or alternative names that resolve to this kind.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_topics: BTreeMap<String, String>,
}

fn default_source_file() -> String {
    "./strings.json".to_string()
}

fn default_catalog_root() -> String {
    "./catalogs".to_string()
}

fn default_overrides_root() -> String {
    "./overrides".to_string()
}

pub fn default_priority() -> Vec<Origin> {
    Origin::ALL.to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_file: default_source_file(),
            catalog_root: default_catalog_root(),
            overrides_root: default_overrides_root(),
            output_root: None,
            priority: default_priority(),
            kinds: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if the priority list is empty or repeats an origin,
    /// or if kind names and aliases collide.
    pub fn validate(&self) -> Result<()> {
        validate_priority(&self.priority)?;

        let mut names = HashSet::new();
        for kind in &self.kinds {
            if kind.name.trim().is_empty() {
                bail!("Invalid kind in 'kinds': name must not be empty");
            }
            if !names.insert(kind.name.as_str()) {
                bail!("Duplicate kind in 'kinds': \"{}\"", kind.name);
            }
        }

        KindRegistry::from_configs(&self.kinds, std::iter::empty())
            .context("Invalid alias in 'kinds'")?;

        Ok(())
    }

    pub fn output_root(&self) -> &str {
        self.output_root.as_deref().unwrap_or(&self.catalog_root)
    }
}

pub fn validate_priority(priority: &[Origin]) -> Result<()> {
    if priority.is_empty() {
        bail!("Invalid 'priority': at least one origin is required");
    }
    let mut seen = HashSet::new();
    for origin in priority {
        if !seen.insert(origin) {
            bail!("Invalid 'priority': \"{}\" is listed twice", origin);
        }
    }
    Ok(())
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        // Never look above the repository root.
        if current.join(".git").exists() || !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory paths in the config are relative to this.
    pub base_dir: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let base_dir = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                base_dir,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            base_dir: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
