use crate::data::query::{MissingValuePolicy, QueryParams, SearchMode, DEFAULT_PAGE_SIZE};
use crate::utils::app_paths::AppPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Rows per page when a screen opens
    pub default_page_size: usize,

    /// How missing numbers sort: "treat_as_zero" or "sort_last"
    pub missing_values: MissingValuePolicy,

    /// Use fuzzy matching in search boxes instead of substring matching
    pub fuzzy_search: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show a leading "#" column with row numbers
    pub show_row_numbers: bool,

    /// Cell text longer than this is truncated with an ellipsis (0 = no limit)
    pub max_column_width: usize,

    /// Colored headers and footers
    pub use_color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; RUST_LOG overrides it
    pub level: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            missing_values: MissingValuePolicy::TreatAsZero,
            fuzzy_search: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_row_numbers: false,
            max_column_width: 40,
            use_color: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ViewConfig {
    /// Apply these defaults to a screen's initial query state
    pub fn apply_to(&self, params: QueryParams) -> QueryParams {
        let mode = if self.fuzzy_search {
            SearchMode::Fuzzy
        } else {
            SearchMode::Substring
        };

        params
            .with_missing_values(self.missing_values)
            .with_search_mode(mode)
    }
}

impl Config {
    /// Load config from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        debug!(target: "config", "loaded config from {:?}", path);
        Ok(config)
    }

    /// Save config to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        Ok(AppPaths::config_dir()?.join("config.toml"))
    }

    /// Default config file with comments, for --generate-config
    pub fn create_default_with_comments() -> String {
        r#"# fitdesk configuration file
# Location: ~/.config/fitdesk/config.toml (Linux)
#           ~/Library/Application Support/fitdesk/config.toml (macOS)
#           %APPDATA%\fitdesk\config.toml (Windows)

[view]
# Rows per page when a list screen opens
default_page_size = 10

# How records without a value sort on numeric columns:
#   "treat_as_zero" - missing counts as 0
#   "sort_last"     - missing rows go after all others in either direction
missing_values = "treat_as_zero"

# Fuzzy search box matching (skim style) instead of plain substring matching
fuzzy_search = false

[display]
# Show a leading row-number column
show_row_numbers = false

# Truncate cell text longer than this many characters (0 = no limit)
max_column_width = 40

# Colored headers and footers
use_color = true

[logging]
# Default log filter, e.g. "warn", "info", "collection_view=debug"
# The RUST_LOG environment variable takes precedence
level = "warn"
"#
        .to_string()
    }
}
