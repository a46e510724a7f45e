//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, the user file, an explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scan: Scan,
    #[serde(default)]
    pub output: Output,
}

/// Uninstall registry branches that can be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistryView {
    /// `HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall`
    Hklm,
    /// The 32-bit view under `WOW6432Node`.
    HklmWow64,
    /// Per-user installs under `HKEY_CURRENT_USER`.
    Hkcu,
}

/// Line terminator used in generated scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineEnding {
    Crlf,
    Lf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }
}

impl FromStr for LineEnding {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "crlf" | "windows" => Ok(LineEnding::Crlf),
            "lf" | "unix" => Ok(LineEnding::Lf),
            other => Err(anyhow::anyhow!("unknown line ending '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(default)]
    desktop: Option<bool>,
    #[serde(default)]
    registry: Option<bool>,
    #[serde(default)]
    placeholder_fallback: Option<bool>,
    #[serde(default)]
    registry_views: Option<Vec<RegistryView>>,
}

impl Scan {
    pub fn desktop(&self) -> bool {
        self.desktop.unwrap_or(true)
    }

    pub fn registry(&self) -> bool {
        self.registry.unwrap_or(true)
    }

    pub fn placeholder_fallback(&self) -> bool {
        self.placeholder_fallback.unwrap_or(true)
    }

    pub fn registry_views(&self) -> Vec<RegistryView> {
        self.registry_views
            .clone()
            .unwrap_or_else(|| vec![RegistryView::Hklm])
    }

    pub fn set_desktop(&mut self, enabled: bool) {
        self.desktop = Some(enabled);
    }

    pub fn set_registry(&mut self, enabled: bool) {
        self.registry = Some(enabled);
    }

    pub fn set_placeholder_fallback(&mut self, enabled: bool) {
        self.placeholder_fallback = Some(enabled);
    }
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            desktop: Some(true),
            registry: Some(true),
            placeholder_fallback: Some(true),
            registry_views: Some(vec![RegistryView::Hklm]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    directory: Option<PathBuf>,
    #[serde(default)]
    line_ending: Option<LineEnding>,
}

impl Output {
    fn default_file_name() -> &'static str {
        "launch.bat"
    }

    pub fn file_name(&self) -> String {
        self.file_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| Self::default_file_name().to_owned())
    }

    /// Configured output directory; `None` when unset or empty.
    pub fn directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .filter(|dir| !dir.as_os_str().is_empty())
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending.unwrap_or(LineEnding::Crlf)
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = Some(line_ending);
    }
}

impl Default for Output {
    fn default() -> Self {
        Self {
            file_name: Some(Self::default_file_name().to_owned()),
            directory: None,
            line_ending: Some(LineEnding::Crlf),
        }
    }
}

/// Environment overrides for output settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    output_dir: Option<String>,
    line_ending: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            output_dir: env::var("LAUNCHBAT_OUTPUT_DIR").ok(),
            line_ending: env::var("LAUNCHBAT_LINE_ENDING").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(output_dir: &str, line_ending: &str) -> Self {
        Self {
            output_dir: Some(output_dir.to_owned()),
            line_ending: Some(line_ending.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user config, an optional explicit file, and env
    /// overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(Self::from_file(&explicit_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        apply_env_overrides(merged, env_overrides)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            scan: merge_scan(self.scan, other.scan),
            output: merge_output(self.output, other.output),
        }
    }
}

fn merge_scan(mut base: Scan, overlay: Scan) -> Scan {
    if let Some(value) = overlay.desktop {
        base.desktop = Some(value);
    }
    if let Some(value) = overlay.registry {
        base.registry = Some(value);
    }
    if let Some(value) = overlay.placeholder_fallback {
        base.placeholder_fallback = Some(value);
    }
    if let Some(views) = overlay.registry_views {
        base.registry_views = Some(views);
    }
    base
}

fn merge_output(mut base: Output, overlay: Output) -> Output {
    if let Some(value) = overlay.file_name {
        base.file_name = Some(value);
    }
    if let Some(value) = overlay.directory {
        base.directory = Some(value);
    }
    if let Some(value) = overlay.line_ending {
        base.line_ending = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("launchbat/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(dir) = env.output_dir {
        config.output.directory = Some(PathBuf::from(dir));
    }
    if let Some(line_ending) = env.line_ending {
        let parsed = line_ending
            .parse::<LineEnding>()
            .context("invalid LAUNCHBAT_LINE_ENDING")?;
        config.output.line_ending = Some(parsed);
    }
    Ok(config)
}
