use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::layout_engine::{ContainerConfiguration, LayoutKind, PlacementMode, SplitAxis};

pub fn config_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("tile").join("config.toml"))
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Policy applied to containers built from the command line.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutSettings {
    /// Layout kind of new containers. Only `split` can be laid out.
    #[serde(default)]
    pub kind: LayoutKind,
    /// Split axis: `horizontal` places windows side by side, `vertical`
    /// stacks them top to bottom.
    #[serde(default)]
    pub axis: SplitAxis,
    /// Placement mode given to managed windows.
    #[serde(default)]
    pub mode: PlacementMode,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "info".to_string() }

impl Default for LoggingSettings {
    fn default() -> Self { Self { filter: default_log_filter() } }
}

impl LayoutSettings {
    pub fn container_configuration(&self) -> ContainerConfiguration {
        ContainerConfiguration::new(self.kind, self.axis)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !self.kind.is_implemented() {
            issues.push(format!(
                "layout.kind = \"{}\" is not implemented; only \"split\" containers can be laid out",
                self.kind
            ));
        }
        issues
    }
}

impl LoggingSettings {
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.filter.trim().is_empty() {
            issues.push("logging.filter must not be empty".to_string());
        } else if let Err(e) = EnvFilter::try_new(&self.filter) {
            issues.push(format!("logging.filter = \"{}\" is invalid: {e}", self.filter));
        }
        issues
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&buf)
    }

    /// The configuration bundled with the binary.
    pub fn bundled() -> anyhow::Result<Config> { Self::parse(include_str!("../../tile.default.toml")) }

    /// Loads `path` if given, otherwise the user's config file if it exists,
    /// otherwise the bundled defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        if let Some(path) = path {
            return Self::read(path);
        }
        match config_file() {
            Some(path) if path.exists() => Self::read(&path),
            _ => Self::bundled(),
        }
    }

    pub fn container_configuration(&self) -> ContainerConfiguration {
        self.layout.container_configuration()
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.layout.validate());
        issues.extend(self.logging.validate());
        issues
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        match toml::from_str::<Config>(buf) {
            Ok(config) => Ok(config),
            Err(e) => {
                let msg = e.to_string();
                bail!("{}", msg.trim_end())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_bundled_config_matches_defaults() {
        let bundled = Config::bundled().unwrap();
        assert_eq!(bundled, Config::default());
        assert!(bundled.validate().is_empty());
    }

    #[test]
    fn test_parse_layout_settings() {
        let cfg = Config::parse(
            r#"
            [layout]
            kind = "split"
            axis = "vertical"
            mode = "free"
        "#,
        )
        .unwrap();
        assert_eq!(
            cfg.container_configuration(),
            ContainerConfiguration::split(SplitAxis::Vertical)
        );
        assert_eq!(cfg.layout.mode, PlacementMode::Free);
        assert_eq!(cfg.logging.filter, "info");
    }

    #[test]
    fn test_unknown_layout_kind_is_rejected() {
        let err = Config::parse("[layout]\nkind = \"grid\"\n").unwrap_err();
        assert!(err.to_string().contains("grid"), "{err}");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(Config::parse("[layout]\ngaps = 4\n").is_err());
        assert!(Config::parse("[window_rules]\n").is_err());
    }

    #[test]
    fn test_unimplemented_layout_is_reported() {
        let cfg = Config::parse("[layout]\nkind = \"tabbed\"\n").unwrap();
        let issues = cfg.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("tabbed"));
    }

    #[test]
    fn test_log_filter_validation() {
        let mut cfg = Config::default();
        cfg.logging.filter = "  ".to_string();
        assert!(cfg.validate().iter().any(|i| i.contains("must not be empty")));

        cfg.logging.filter = "tile_wm=trace,info".to_string();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\naxis = \"vertical\"").unwrap();
        let cfg = Config::read(file.path()).unwrap();
        assert_eq!(cfg.layout.axis, SplitAxis::Vertical);
        assert_eq!(cfg.layout.kind, LayoutKind::Split);
    }

    #[test]
    fn test_load_prefers_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nfilter = \"debug\"").unwrap();
        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.logging.filter, "debug");
    }

    #[test]
    fn test_read_missing_file_mentions_path() {
        let err = Config::read(Path::new("/nonexistent/tile/config.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tile/config.toml"));
    }
}
