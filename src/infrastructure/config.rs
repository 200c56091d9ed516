use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::ConfigError;
use serde::Deserialize;

use crate::{
    domain::{page::PageSize, reading::ListKind},
    utils,
};

const CONFIG: &str = include_str!("../../.config/config.json5");

const DEFAULT_PREFETCH_THRESHOLD: usize = 5;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// Per-list overrides
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ListConfig {
    #[serde(default)]
    pub page_size: Option<PageSize>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub page_size: PageSize,
    #[serde(default = "default_prefetch_threshold")]
    pub prefetch_threshold: usize,
    #[serde(default)]
    pub fixtures_dir: Option<PathBuf>,
    #[serde(default)]
    pub lists: HashMap<ListKind, ListConfig>,
}

fn default_prefetch_threshold() -> usize {
    DEFAULT_PREFETCH_THRESHOLD
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            page_size: PageSize::default(),
            prefetch_threshold: DEFAULT_PREFETCH_THRESHOLD,
            fixtures_dir: None,
            lists: HashMap::new(),
        }
    }
}

impl Config {
    /// Load from the project config directory
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(&utils::get_config_dir(), &utils::get_data_dir())
    }

    /// Layer user files in `config_dir` and `READROOM_*` environment
    /// variables over the embedded defaults.
    pub fn load(config_dir: &Path, data_dir: &Path) -> Result<Self, ConfigError> {
        let default_config: Config = json5::from_str(CONFIG)
            .map_err(|e| ConfigError::Message(format!("Failed to load default config: {e}")))?;

        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.display().to_string())?
            .set_default("_config_dir", config_dir.display().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5));

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            if path.exists() {
                log::info!("Loading configuration from {}", path.display());
                found_config = true;
            }
            builder = builder.add_source(config::File::from(path).format(*format).required(false));
        }
        if !found_config {
            log::info!("No configuration file found, using defaults");
        }

        builder = builder.add_source(
            config::Environment::with_prefix(&utils::paths::PROJECT_NAME)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        for (kind, list) in default_config.lists {
            cfg.lists.entry(kind).or_insert(list);
        }

        Ok(cfg)
    }

    /// Page size for `kind`, falling back to the global setting
    pub fn page_size_for(&self, kind: ListKind) -> PageSize {
        self.lists
            .get(&kind)
            .and_then(|list| list.page_size)
            .unwrap_or(self.page_size)
    }
}
