//! Configuration management utilities.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::ActivationState;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, user config, an explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub watcher: Watcher,
    #[serde(default)]
    pub display: Display,
    #[serde(default)]
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watcher {
    #[serde(default = "Watcher::default_recheck_delay_ms")]
    pub recheck_delay_ms: u64,
}

impl Watcher {
    fn default_recheck_delay_ms() -> u64 {
        20
    }

    pub fn recheck_delay(&self) -> Duration {
        Duration::from_millis(self.recheck_delay_ms)
    }
}

impl Default for Watcher {
    fn default() -> Self {
        Self {
            recheck_delay_ms: Self::default_recheck_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    #[serde(default = "Display::default_noun")]
    pub noun: String,
}

impl Display {
    fn default_noun() -> String {
        "word".into()
    }
}

impl Default for Display {
    fn default() -> Self {
        Self {
            noun: Self::default_noun(),
        }
    }
}

/// Toolbar appearance per activation state. Icons map pixel sizes to paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activation {
    #[serde(default = "Activation::default_active_title")]
    pub active_title: String,
    #[serde(default = "Activation::default_inactive_title")]
    pub inactive_title: String,
    #[serde(default = "Activation::default_active_icon")]
    pub active_icon: BTreeMap<String, String>,
    #[serde(default = "Activation::default_inactive_icon")]
    pub inactive_icon: BTreeMap<String, String>,
}

impl Activation {
    fn default_active_title() -> String {
        "Hide number of words selected".into()
    }

    fn default_inactive_title() -> String {
        "Show number of words selected".into()
    }

    fn default_active_icon() -> BTreeMap<String, String> {
        icon_set("active")
    }

    fn default_inactive_icon() -> BTreeMap<String, String> {
        icon_set("inactive")
    }

    pub fn title(&self, state: ActivationState) -> &str {
        match state {
            ActivationState::Active => &self.active_title,
            ActivationState::Inactive => &self.inactive_title,
        }
    }

    pub fn icon(&self, state: ActivationState) -> &BTreeMap<String, String> {
        match state {
            ActivationState::Active => &self.active_icon,
            ActivationState::Inactive => &self.inactive_icon,
        }
    }
}

impl Default for Activation {
    fn default() -> Self {
        Self {
            active_title: Self::default_active_title(),
            inactive_title: Self::default_inactive_title(),
            active_icon: Self::default_active_icon(),
            inactive_icon: Self::default_inactive_icon(),
        }
    }
}

fn icon_set(prefix: &str) -> BTreeMap<String, String> {
    ["19", "38"]
        .into_iter()
        .map(|size| (size.to_owned(), format!("icons/{prefix}-{size}.png")))
        .collect()
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    noun: Option<String>,
    recheck_delay_ms: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            noun: env::var("WORDCOUNT_NOUN").ok(),
            recheck_delay_ms: env::var("WORDCOUNT_RECHECK_DELAY_MS").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(noun: &str, recheck_delay_ms: &str) -> Self {
        Self {
            noun: Some(noun.to_owned()),
            recheck_delay_ms: Some(recheck_delay_ms.to_owned()),
        }
    }
}

/// One config file as written. Only the keys it sets override lower layers.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    watcher: WatcherLayer,
    display: DisplayLayer,
    activation: ActivationLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WatcherLayer {
    recheck_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DisplayLayer {
    noun: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ActivationLayer {
    active_title: Option<String>,
    inactive_title: Option<String>,
    active_icon: Option<BTreeMap<String, String>>,
    inactive_icon: Option<BTreeMap<String, String>>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let layer: ConfigLayer =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(layer)
    }

    fn apply(self, mut config: Config) -> Config {
        merge_watcher(&mut config.watcher, self.watcher);
        merge_display(&mut config.display, self.display);
        merge_activation(&mut config.activation, self.activation);
        config
    }
}

impl Config {
    /// Load configuration from defaults, the user config file, an optional
    /// `explicit` file layered above it, and env overrides.
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(global_config_path(), explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<ConfigLayer> = Vec::new();

        layers.push(ConfigLayer::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&global_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(ConfigLayer::from_file(&explicit_path)?);
        }

        let merged = layers
            .into_iter()
            .fold(Config::default(), |config, layer| layer.apply(config));
        apply_env_overrides(merged, env_overrides)
    }
}

fn merge_watcher(base: &mut Watcher, overlay: WatcherLayer) {
    if let Some(delay) = overlay.recheck_delay_ms {
        base.recheck_delay_ms = delay;
    }
}

fn merge_display(base: &mut Display, overlay: DisplayLayer) {
    if let Some(noun) = overlay.noun {
        base.noun = noun;
    }
}

fn merge_activation(base: &mut Activation, overlay: ActivationLayer) {
    choose(&mut base.active_title, overlay.active_title);
    choose(&mut base.inactive_title, overlay.inactive_title);
    choose(&mut base.active_icon, overlay.active_icon);
    choose(&mut base.inactive_icon, overlay.inactive_icon);
}

fn choose<T>(base: &mut T, overlay: Option<T>) {
    if let Some(value) = overlay {
        *base = value;
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("wordcount/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(noun) = env.noun {
        config.display.noun = noun;
    }
    if let Some(delay) = env.recheck_delay_ms {
        config.watcher.recheck_delay_ms = delay
            .trim()
            .parse()
            .with_context(|| format!("invalid WORDCOUNT_RECHECK_DELAY_MS '{delay}'"))?;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config, Config::default());
        assert_eq!(config.watcher.recheck_delay(), Duration::from_millis(20));
        assert_eq!(config.display.noun, "word");
    }

    #[test]
    fn merge_global_and_explicit() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[display]
noun = "token"
[watcher]
recheck_delay_ms = 50
"#,
        )?;

        let explicit = temp.path().join("page.toml");
        fs::write(
            &explicit,
            r#"
[activation]
active_title = "Stop counting"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.display.noun, "token");
        assert_eq!(config.watcher.recheck_delay_ms, 50);
        assert_eq!(config.activation.active_title, "Stop counting");
        assert_eq!(
            config.activation.inactive_title,
            "Show number of words selected"
        );

        Ok(())
    }

    #[test]
    fn explicit_layer_can_restore_default_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[display]
noun = "token"
[watcher]
recheck_delay_ms = 50
[activation.active_icon]
19 = "custom-19.png"
"#,
        )?;

        let explicit = temp.path().join("page.toml");
        fs::write(
            &explicit,
            r#"
[display]
noun = "word"
[watcher]
recheck_delay_ms = 20
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.display.noun, "word");
        assert_eq!(config.watcher.recheck_delay_ms, 20);
        assert_eq!(
            config.activation.active_icon.get("19").map(String::as_str),
            Some("custom-19.png")
        );
        assert_eq!(config.activation.active_icon.get("38"), None);

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("glyph", " 75 ");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.display.noun, "glyph");
        assert_eq!(config.watcher.recheck_delay(), Duration::from_millis(75));
        Ok(())
    }

    #[test]
    fn invalid_env_delay_is_an_error() {
        let overrides = EnvOverrides::for_tests("word", "soon");
        assert!(Config::load_with_layers(None, None, overrides).is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        assert!(ConfigLayer::from_file(&file).is_err());
        let missing = Some(temp.path().join("missing.toml"));
        assert!(Config::load_with_layers(None, missing, EnvOverrides::default()).is_err());
        Ok(())
    }

    #[test]
    fn activation_appearance_follows_state() {
        let activation = Activation::default();
        assert_eq!(
            activation.title(ActivationState::Inactive),
            "Show number of words selected"
        );
        assert_eq!(
            activation.icon(ActivationState::Inactive).get("38").map(String::as_str),
            Some("icons/inactive-38.png")
        );
    }
}
