// PerfTrend - platform/config.rs
//
// Config directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for PerfTrend configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/perftrend/ or %APPDATA%\PerfTrend\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[plot]` section.
    pub plot: PlotSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
}

/// `[plot]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PlotSection {
    /// Chart width in pixels.
    pub width: Option<u32>,
    /// Chart height in pixels.
    pub height: Option<u32>,
    /// Bins of the objective distribution histogram.
    pub histogram_bins: Option<usize>,
    /// Instances shown in the execution time variation chart.
    pub top_variation_instances: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Discovery --
    pub max_depth: usize,
    pub include_patterns: Vec<String>,

    // -- Plot --
    pub plot_width: u32,
    pub plot_height: u32,
    pub histogram_bins: usize,
    pub top_variation_instances: usize,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            plot_width: constants::DEFAULT_PLOT_WIDTH,
            plot_height: constants::DEFAULT_PLOT_HEIGHT,
            histogram_bins: constants::DEFAULT_HISTOGRAM_BINS,
            top_variation_instances: constants::DEFAULT_TOP_VARIATION_INSTANCES,
            log_level: None,
        }
    }
}

/// Load and validate a config file.
///
/// `required` is true when the user named the file explicitly (`--config`).
/// A missing optional file yields defaults with no warnings. A missing,
/// unreadable, or unparseable required file is an error; an unparseable
/// optional file yields defaults plus a warning.
///
/// Out-of-range values never fail: they are reported in the returned
/// warnings and replaced by their defaults.
pub fn load_config(
    config_path: &Path,
    required: bool,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !required && !config_path.exists() {
        return Ok((AppConfig::default(), warnings));
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) if required => {
            return Err(ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            });
        }
        Err(e) => {
            warnings.push(format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            ));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let raw = match parse_config_toml(&content, config_path) {
        Ok(r) => r,
        Err(e) if required => return Err(e),
        Err(e) => {
            warnings.push(format!("{e}. Using defaults."));
            return Ok((AppConfig::default(), warnings));
        }
    };

    let config = validate(raw, &mut warnings);
    Ok((config, warnings))
}

/// Parse config.toml text without validating values.
pub fn parse_config_toml(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            warnings.push(format!(
                "[discovery] max_depth = {depth} is out of range (1-{}). Using default ({}).",
                constants::ABSOLUTE_MAX_DEPTH,
                constants::DEFAULT_MAX_DEPTH,
            ));
        }
    }

    // -- Discovery: include_patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        if patterns.is_empty() {
            warnings.push(
                "[discovery] include_patterns is empty. Using default ([\"*.txt\"]).".to_string(),
            );
        } else {
            config.include_patterns = patterns;
        }
    }

    // -- Plot: width / height --
    let dimension_range = constants::MIN_PLOT_DIMENSION..=constants::MAX_PLOT_DIMENSION;
    if let Some(width) = raw.plot.width {
        if dimension_range.contains(&width) {
            config.plot_width = width;
        } else {
            warnings.push(format!(
                "[plot] width = {width} is out of range ({}-{}). Using default ({}).",
                constants::MIN_PLOT_DIMENSION,
                constants::MAX_PLOT_DIMENSION,
                constants::DEFAULT_PLOT_WIDTH,
            ));
        }
    }
    if let Some(height) = raw.plot.height {
        if dimension_range.contains(&height) {
            config.plot_height = height;
        } else {
            warnings.push(format!(
                "[plot] height = {height} is out of range ({}-{}). Using default ({}).",
                constants::MIN_PLOT_DIMENSION,
                constants::MAX_PLOT_DIMENSION,
                constants::DEFAULT_PLOT_HEIGHT,
            ));
        }
    }

    // -- Plot: histogram_bins --
    if let Some(bins) = raw.plot.histogram_bins {
        if (constants::MIN_HISTOGRAM_BINS..=constants::MAX_HISTOGRAM_BINS).contains(&bins) {
            config.histogram_bins = bins;
        } else {
            warnings.push(format!(
                "[plot] histogram_bins = {bins} is out of range ({}-{}). Using default ({}).",
                constants::MIN_HISTOGRAM_BINS,
                constants::MAX_HISTOGRAM_BINS,
                constants::DEFAULT_HISTOGRAM_BINS,
            ));
        }
    }

    // -- Plot: top_variation_instances --
    if let Some(top) = raw.plot.top_variation_instances {
        if (constants::MIN_TOP_VARIATION_INSTANCES..=constants::MAX_TOP_VARIATION_INSTANCES)
            .contains(&top)
        {
            config.top_variation_instances = top;
        } else {
            warnings.push(format!(
                "[plot] top_variation_instances = {top} is out of range ({}-{}). Using default ({}).",
                constants::MIN_TOP_VARIATION_INSTANCES,
                constants::MAX_TOP_VARIATION_INSTANCES,
                constants::DEFAULT_TOP_VARIATION_INSTANCES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn validate_str(toml: &str) -> (AppConfig, Vec<String>) {
        let raw = parse_config_toml(toml, Path::new("config.toml")).unwrap();
        let mut warnings = Vec::new();
        let config = validate(raw, &mut warnings);
        (config, warnings)
    }

    #[test]
    fn test_full_config_is_applied() {
        let (config, warnings) = validate_str(
            r#"
[discovery]
max_depth = 3
include_patterns = ["*.txt", "*.out"]

[plot]
width = 1000
height = 500
histogram_bins = 30
top_variation_instances = 5

[logging]
level = "DEBUG"
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.include_patterns, vec!["*.txt", "*.out"]);
        assert_eq!(config.plot_width, 1000);
        assert_eq!(config.plot_height, 500);
        assert_eq!(config.histogram_bins, 30);
        assert_eq!(config.top_variation_instances, 5);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let (config, warnings) = validate_str(
            r#"
[discovery]
max_depth = 0
include_patterns = []

[plot]
width = 10
histogram_bins = 0
top_variation_instances = 1000

[logging]
level = "loud"
"#,
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 6, "got: {warnings:?}");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (config, warnings) = validate_str("[future]\nflag = true\n");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_optional_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"), false).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("absent.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_unparseable_optional_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[plot\nwidth = ").unwrap();

        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);

        let result = load_config(&path, true);
        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }
}
