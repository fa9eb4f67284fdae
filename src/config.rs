//! Converter configuration.
//!
//! Handles loading, validating, and merging `imgshift.toml`. Stock defaults are
//! serialized to a TOML table and the user file is merged over them key by
//! key, so a config file only needs the values it changes. CLI flags are
//! applied on top of the merged result by the binary.
//!
//! ## Config File Location
//!
//! `imgshift.toml` in the working directory, or any file passed with
//! `--config`. A missing default file means stock defaults; a missing
//! explicit file is an error.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [convert]
//! format = "jpg"                 # jpg | png | webp | pdf
//! quality = 90                   # 10-100, lossy formats only
//! maintain_aspect_ratio = true
//!
//! [batch]
//! format = "jpg"
//! quality = 85                   # baseline, adjusted by `compression`
//! resize_mode = "none"           # none | fit | fill
//! # max_width = 1920
//! # max_height = 1080
//! compression = "medium"         # low | medium | high
//! maintain_aspect_ratio = true
//! pause_ms = 100                 # pause between images
//! workers = 1                    # >1 converts in parallel (capped at CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::convert::{BatchConversionSettings, ConversionSettings};
use crate::imaging::{MIN_QUALITY, Quality};
use crate::types::{CompressionLevel, OutputFormat, ResizeMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "imgshift.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level `imgshift.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImgshiftConfig {
    /// Defaults for `imgshift convert`.
    pub convert: ConvertConfig,
    /// Defaults for `imgshift batch`.
    pub batch: BatchConfig,
}

impl ImgshiftConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_quality("convert.quality", self.convert.quality)?;
        check_quality("batch.quality", self.batch.quality)?;
        if self.batch.max_width == Some(0) || self.batch.max_height == Some(0) {
            return Err(ConfigError::Validation(
                "batch.max_width and batch.max_height must be non-zero".into(),
            ));
        }
        if self.batch.workers == 0 {
            return Err(ConfigError::Validation(
                "batch.workers must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn check_quality(key: &str, value: u32) -> Result<(), ConfigError> {
    if !(MIN_QUALITY..=100).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{key} must be {MIN_QUALITY}-100 (got {value})"
        )));
    }
    Ok(())
}

/// Single-image defaults. Width and height are always given per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub format: OutputFormat,
    pub quality: u32,
    pub maintain_aspect_ratio: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: 90,
            maintain_aspect_ratio: true,
        }
    }
}

impl ConvertConfig {
    pub fn to_settings(&self) -> ConversionSettings {
        ConversionSettings {
            format: self.format,
            quality: Quality::new(self.quality),
            width: None,
            height: None,
            maintain_aspect_ratio: self.maintain_aspect_ratio,
        }
    }
}

/// Batch defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub format: OutputFormat,
    /// Baseline quality before the compression level is applied.
    pub quality: u32,
    pub resize_mode: ResizeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<u32>,
    pub compression: CompressionLevel,
    pub maintain_aspect_ratio: bool,
    /// Milliseconds to wait between images.
    pub pause_ms: u64,
    /// Images converted at once. Values above the core count are clamped down.
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jpg,
            quality: 85,
            resize_mode: ResizeMode::None,
            max_width: None,
            max_height: None,
            compression: CompressionLevel::Medium,
            maintain_aspect_ratio: true,
            pause_ms: 100,
            workers: 1,
        }
    }
}

impl BatchConfig {
    pub fn to_settings(&self) -> BatchConversionSettings {
        BatchConversionSettings {
            format: self.format,
            quality: Quality::new(self.quality),
            resize_mode: self.resize_mode,
            max_width: self.max_width,
            max_height: self.max_height,
            compression: self.compression,
            maintain_aspect_ratio: self.maintain_aspect_ratio,
            pause: Duration::from_millis(self.pause_ms),
            workers: effective_workers(self.workers),
        }
    }
}

/// Resolve the worker count actually used.
///
/// The user can constrain down, not up: `min(requested, cores)`, at least 1.
pub fn effective_workers(requested: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    requested.min(cores).max(1)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ImgshiftConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(file: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !file.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(file)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ImgshiftConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ImgshiftConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `file`, falling back to stock defaults if it is absent.
pub fn load_config(file: &Path) -> Result<ImgshiftConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(file)?;
    resolve_config(base, overlay)
}

/// Load config from a path the user named explicitly; it must exist.
pub fn load_explicit_config(file: &Path) -> Result<ImgshiftConfig, ConfigError> {
    let content = fs::read_to_string(file)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value()?, Some(overlay))
}

/// Returns a fully-commented stock `imgshift.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgshift Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Single image (`imgshift convert`)
# ---------------------------------------------------------------------------
[convert]
# Output format: jpg, png, webp, or pdf.
format = "jpg"

# Encoding quality (10 = smallest, 100 = best). Used by jpg, webp, and the
# JPEG embedded in pdf; png ignores it.
quality = 90

# With only --width or --height given, derive the other from the original
# aspect ratio.
maintain_aspect_ratio = true

# ---------------------------------------------------------------------------
# Batch (`imgshift batch`)
# ---------------------------------------------------------------------------
[batch]
format = "jpg"

# Baseline quality, adjusted by the compression level:
#   low    -> at least 85
#   medium -> between 70 and 85
#   high   -> at most 70
quality = 85
compression = "medium"

# none: keep size
# fit:  shrink to fit inside max_width x max_height, never upscale
# fill: cover the bounds (aspect locked) or stretch to them (unlocked)
# Resizing needs both bounds; with either missing images keep their size.
resize_mode = "none"
# max_width = 1920
# max_height = 1080
maintain_aspect_ratio = true

# Pause between images, in milliseconds.
pause_ms = 100

# Images converted at once. 1 converts strictly in order; higher values use a
# worker pool (clamped to the number of CPU cores) and outputs may be written
# in any order.
workers = 1
"##
}
