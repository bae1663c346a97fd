//! Analysis configuration loaded from `critpath.toml`.
//!
//! Lookup order: `critpath.toml` in the given directory, then
//! `<config_dir>/critpath/config.toml`, then built-in defaults. Every field
//! has a default, so partial files are fine.
//!
//! ```toml
//! [analysis]
//! source = "auto"      # or a condensation vertex id, e.g. 2
//! shortest = true
//! longest = true
//! critical_path = true
//! timing = false
//!
//! [output]
//! format = "json"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "critpath.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CritpathConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which stages [`crate::pipeline::analyze`] runs and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub source: SourceSelection,
    #[serde(default = "default_true")]
    pub shortest: bool,
    #[serde(default = "default_true")]
    pub longest: bool,
    #[serde(default = "default_true")]
    pub critical_path: bool,
    /// Record per-stage counters and wall-clock time.
    #[serde(default)]
    pub timing: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            source: SourceSelection::default(),
            shortest: default_true(),
            longest: default_true(),
            critical_path: default_true(),
            timing: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Preferred output format (`pretty`, `text` or `json`).
    #[serde(default)]
    pub format: Option<String>,
}

/// Source vertex of the path queries, as a condensation vertex id.
///
/// Written as `"auto"` or a non-negative integer in TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSource", into = "RawSource")]
pub enum SourceSelection {
    /// First vertex of the condensation's topological order.
    #[default]
    Auto,
    /// Explicit condensation vertex id.
    Component(usize),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Index(usize),
    Keyword(String),
}

impl TryFrom<RawSource> for SourceSelection {
    type Error = String;

    fn try_from(raw: RawSource) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawSource::Index(index) => Ok(Self::Component(index)),
            RawSource::Keyword(word) if word.eq_ignore_ascii_case("auto") => Ok(Self::Auto),
            RawSource::Keyword(word) => Err(format!(
                "invalid source '{word}': expected \"auto\" or a vertex id"
            )),
        }
    }
}

impl From<SourceSelection> for RawSource {
    fn from(source: SourceSelection) -> Self {
        match source {
            SourceSelection::Auto => Self::Keyword("auto".to_string()),
            SourceSelection::Component(index) => Self::Index(index),
        }
    }
}

/// Load configuration for a run started in `dir`.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn load_config(dir: &Path) -> Result<CritpathConfig> {
    let local = dir.join(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_file(&local);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(CritpathConfig::default());
    };

    let user = config_dir.join("critpath/config.toml");
    if !user.exists() {
        return Ok(CritpathConfig::default());
    }
    load_config_file(&user)
}

/// Load configuration from an explicit file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML for
/// [`CritpathConfig`].
pub fn load_config_file(path: &Path) -> Result<CritpathConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<CritpathConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Returns true when `CRITPATH_TIMING` enables timing collection.
///
/// Supported truthy values: `1`, `true`, `yes`, `on` (case-insensitive).
#[must_use]
pub fn timing_enabled_from_env() -> bool {
    std::env::var("CRITPATH_TIMING")
        .ok()
        .is_some_and(|value| is_truthy(value.as_str()))
}

fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("1")
        || value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("on")
}

const fn default_true() -> bool {
    true
}
