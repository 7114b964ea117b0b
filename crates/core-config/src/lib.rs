//! Configuration loading and parsing.
//!
//! Parses `linemark.toml` (or an override path provided by the embedding
//! application) extracting the `[highlight]` table:
//!
//! ```toml
//! [highlight]
//! marker = "<mark>  </mark>"
//! mode = "overlay"
//! ```
//!
//! Both keys are optional. A missing file, an unreadable file or a parse
//! error all resolve to defaults so a broken config never prevents the
//! highlight view from coming up. Unknown fields are ignored (TOML
//! deserialization tolerance) to allow forward evolution without warnings.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{debug, info, warn};

/// File name probed in the working directory and the platform config dir.
pub const CONFIG_FILE_NAME: &str = "linemark.toml";

/// Number of blank columns between the default `<mark>` tags. Wide enough to
/// cover a full listing line in the overlay layer.
pub const DEFAULT_MARKER_WIDTH: usize = 130;

/// Default marker: an empty `<mark>` element padded to `DEFAULT_MARKER_WIDTH`.
pub fn default_marker() -> String {
    format!("<mark>{}</mark>", " ".repeat(DEFAULT_MARKER_WIDTH))
}

/// How processed lines are rendered into the target.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Processed lines carry their own text, marked lines are prefixed by the
    /// marker.
    #[default]
    Inline,
    /// Processed lines are bare placeholders; only the marker is drawn. Meant
    /// for a highlight layer stacked behind the real text.
    Overlay,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default)]
    pub mode: RenderMode,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            mode: RenderMode::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub highlight: HighlightConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

impl Config {
    /// Shortcut for the highlight table.
    pub fn highlight(&self) -> &HighlightConfig {
        &self.file.highlight
    }
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("linemark").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!(target: "config", path = %path.display(), ?e, "config_missing_using_defaults");
            return Ok(Config::default());
        }
    };
    match parse(&content) {
        Ok(file) => {
            info!(
                target: "config",
                path = %path.display(),
                marker_len = file.highlight.marker.len(),
                mode = ?file.highlight.mode,
                "config_loaded"
            );
            Ok(Config {
                raw: Some(content),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_error_using_defaults");
            Ok(Config::default())
        }
    }
}

/// Parse a config document without touching the filesystem.
pub fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str::<ConfigFile>(content)?)
}
