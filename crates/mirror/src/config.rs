use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Env var naming a JSON config file for hosts.
pub const CONFIG_ENV_VAR: &str = "GLOBE_SYNC_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub max_attempts: u32,
    pub retry_interval_ms: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        // ~10 s of polling.
        Self {
            max_attempts: 200,
            retry_interval_ms: 50,
        }
    }
}

/// Tunables of the synchronization core.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Scale between globe camera range and map zoom.
    pub range_zoom_ratio: f64,
    /// Fly-to speed used when leaving the globe with a tilted or rotated camera.
    pub hide_fly_speed: f64,
    /// Meters per degree used to turn circle radii into ring offsets.
    pub circle_meters_per_degree: f64,
    /// Icon edge length (pixels) that renders at scale 1.
    pub icon_base_px: f64,
    pub default_icon_href: String,
    pub default_icon_hotspot: [f64; 2],
    /// Prefix for icon urls that start with `/`.
    pub origin: Option<String>,
    /// Map type id under which the globe is registered.
    pub map_type_name: String,
    pub bootstrap: BootstrapConfig,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            range_zoom_ratio: 0.6,
            hide_fly_speed: 4.5,
            circle_meters_per_degree: 100_000.0,
            icon_base_px: 32.0,
            default_icon_href: "http://maps.google.com/mapfiles/kml/paddle/red-circle.png"
                .to_string(),
            default_icon_hotspot: [32.0, 1.0],
            origin: None,
            map_type_name: "Earth".to_string(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl MirrorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MirrorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("range_zoom_ratio", self.range_zoom_ratio),
            ("hide_fly_speed", self.hide_fly_speed),
            ("circle_meters_per_degree", self.circle_meters_per_degree),
            ("icon_base_px", self.icon_base_px),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.bootstrap.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "bootstrap.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.map_type_name.is_empty() {
            return Err(ConfigError::Invalid("map_type_name is empty".to_string()));
        }
        Ok(())
    }

    /// Makes a root-relative icon url absolute against [`MirrorConfig::origin`].
    pub fn absolute_url(&self, url: &str) -> String {
        match &self.origin {
            Some(origin) if url.starts_with('/') => {
                format!("{}{url}", origin.trim_end_matches('/'))
            }
            _ => url.to_string(),
        }
    }
}
