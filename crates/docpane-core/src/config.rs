//! Viewer configuration.
//!
//! Stored as TOML with every field defaulted, so an empty file (or no file
//! at all) yields a working configuration. Values that would break the
//! engine — a zero-width activation band, an inverted band, a zero poll
//! interval — fail validation with [`Error::Config`] instead of
//! misbehaving at runtime.
//!
//! ```toml
//! manifest_url = "https://docs.example.com/manifest.json"
//!
//! [search]
//! debounce_ms = 150
//!
//! [scroll]
//! header_offset_px = 64
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Where the startup manifest lives.
    pub manifest_url: String,
    /// Search behavior.
    pub search: SearchConfig,
    /// Renderer readiness bootstrap.
    pub render: RenderConfig,
    /// Scroll compensation and deep-link emphasis.
    pub scroll: ScrollConfig,
    /// Active-heading tracking band.
    pub toc: TocConfig,
}

/// Search tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Pause before scanning, so the "searching…" indicator can paint.
    pub debounce_ms: u64,
    /// Minimum normalized query length that triggers a scan.
    pub min_query_len: usize,
}

/// External renderer bootstrap tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// How long to wait for the renderer library before degrading.
    pub ready_timeout_secs: u64,
    /// Poll interval while waiting.
    pub ready_poll_ms: u64,
}

/// Scroll compensation for the fixed header overlay.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Height of the fixed header overlay.
    pub header_offset_px: u32,
    /// Extra breathing room under the header.
    pub margin_px: u32,
    /// How long the deep-link emphasis stays visible.
    pub flash_ms: u64,
}

/// Activation band for heading tracking, as container-height fractions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Top of the band (0.20 = top fifth of the container).
    pub band_top: f64,
    /// Bottom of the band (0.70 = leaves through the bottom 30%).
    pub band_bottom: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            manifest_url: "manifest.json".to_string(),
            search: SearchConfig::default(),
            render: RenderConfig::default(),
            scroll: ScrollConfig::default(),
            toc: TocConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            min_query_len: crate::search::MIN_QUERY_LEN,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ready_timeout_secs: 10,
            ready_poll_ms: 100,
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            header_offset_px: 64,
            margin_px: 8,
            flash_ms: 2000,
        }
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            band_top: crate::toc::BAND_TOP,
            band_bottom: crate::toc::BAND_BOTTOM,
        }
    }
}

impl ViewerConfig {
    /// Loads configuration from a TOML file, or defaults when the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.manifest_url.trim().is_empty() {
            return Err(Error::Config("manifest_url must not be empty".into()));
        }
        if self.render.ready_poll_ms == 0 {
            return Err(Error::Config("render.ready_poll_ms must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.toc.band_top)
            || !(0.0..=1.0).contains(&self.toc.band_bottom)
        {
            return Err(Error::Config(
                "toc band fractions must be within 0.0..=1.0".into(),
            ));
        }
        if self.toc.band_top >= self.toc.band_bottom {
            return Err(Error::Config(
                "toc.band_top must be below toc.band_bottom".into(),
            ));
        }
        Ok(())
    }
}
