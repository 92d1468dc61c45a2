use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::MonthLocale;

pub const CONFIG_FILE: &str = "heatmap.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapConfig {
    pub display: DisplayConfig,
    pub range: RangeConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub locale: MonthLocale,
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: MonthLocale::De,
            color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub default_days: u32,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self { default_days: 90 }
    }
}

pub fn load_config(cli_config_path: Option<&Path>, cwd: &Path) -> Result<HeatmapConfig> {
    if let Some(path) = cli_config_path {
        if !path.exists() {
            bail!(
                "config file not found at {} (passed with --config)",
                path.display()
            );
        }
        return read_config(path);
    }

    let local_path = cwd.join(CONFIG_FILE);
    if local_path.exists() {
        return read_config(&local_path);
    }

    debug!("no {} found, using defaults", CONFIG_FILE);
    Ok(HeatmapConfig::default())
}

pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "refusing to overwrite existing config file: {}",
            path.display()
        );
    }

    let content = toml::to_string_pretty(&HeatmapConfig::default())
        .context("failed to serialize default config")?;
    fs::write(path, content).with_context(|| format!("failed writing {}", path.display()))?;
    Ok(())
}

/// Writes `heatmap.toml` into `cwd` without reading any existing config.
pub fn init_config(cwd: &Path) -> Result<PathBuf> {
    let path = cwd.join(CONFIG_FILE);
    write_default_config(&path)?;
    Ok(path)
}

fn read_config(path: &Path) -> Result<HeatmapConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed reading config file {}", path.display()))?;
    let config = toml::from_str::<HeatmapConfig>(&content)
        .with_context(|| format!("failed parsing config file {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_local_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, HeatmapConfig::default());
        assert_eq!(config.range.default_days, 90);
        assert_eq!(config.display.locale, MonthLocale::De);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[display]\nlocale = \"en\"\n").unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config.display.locale, MonthLocale::En);
        assert!(config.display.color);
        assert_eq!(config.range.default_days, 90);
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), dir.path()).unwrap_err();
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn init_does_not_need_a_loadable_config() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("new.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());

        let path = init_config(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE));
        assert_eq!(load_config(None, dir.path()).unwrap(), HeatmapConfig::default());
    }

    #[test]
    fn default_config_round_trips_and_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        write_default_config(&path).unwrap();
        assert_eq!(load_config(Some(&path), dir.path()).unwrap(), HeatmapConfig::default());
        assert!(write_default_config(&path).is_err());
    }
}
