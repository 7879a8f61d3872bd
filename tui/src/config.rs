use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use swipedex_core::api::{ApiEndpoints, DEFAULT_ARTWORK_BASE, DEFAULT_BASE_URL};
use swipedex_core::fetch::{FetchPolicy, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_ID};
use swipedex_core::swipe::{SpringParams, SwipeConfig};

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Keymap {
    pub quit: String,
    pub start: String,
    pub like: String,
    pub dislike: String,
    pub gallery: String,
    pub back: String,
    pub toggle_theme: String,
    pub retry: String,
    pub help: String,
    pub scroll_up: String,
    pub scroll_down: String,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),
            start: "enter".to_string(),
            like: "right".to_string(),
            dislike: "left".to_string(),
            gallery: "g".to_string(),
            back: "esc".to_string(),
            toggle_theme: "t".to_string(),
            retry: "r".to_string(),
            help: "h".to_string(),
            scroll_up: "up".to_string(),
            scroll_down: "down".to_string(),
        }
    }
}

impl Keymap {
    /// Whether `key` triggers `binding`, written like `ctrl-g`, `left`, `q`
    pub fn matches(binding: &str, key: &KeyEvent) -> bool {
        let binding = binding.trim().to_lowercase();
        let mut modifiers = KeyModifiers::NONE;
        let mut name = binding.as_str();
        loop {
            if let Some(rest) = name.strip_prefix("ctrl-") {
                modifiers |= KeyModifiers::CONTROL;
                name = rest;
            } else if let Some(rest) = name.strip_prefix("alt-") {
                modifiers |= KeyModifiers::ALT;
                name = rest;
            } else {
                break;
            }
        }

        let code = match name {
            "enter" => KeyCode::Enter,
            "esc" => KeyCode::Esc,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "space" => KeyCode::Char(' '),
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return false,
                }
            }
        };

        let key_code = match key.code {
            KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
            other => other,
        };
        let relevant = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
        key_code == code && relevant == modifiers
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SwipeSettings {
    pub threshold_ratio: f32,
    pub exit_duration_ms: u64,
    pub max_rotation_deg: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        let defaults = SwipeConfig::default();
        Self {
            threshold_ratio: defaults.threshold_ratio,
            exit_duration_ms: defaults.exit_duration.as_millis() as u64,
            max_rotation_deg: defaults.max_rotation_deg,
            spring_stiffness: defaults.spring.stiffness,
            spring_damping: defaults.spring.damping,
        }
    }
}

impl SwipeSettings {
    pub fn to_swipe_config(&self, width: f32) -> SwipeConfig {
        SwipeConfig {
            width,
            threshold_ratio: self.threshold_ratio,
            exit_duration: Duration::from_millis(self.exit_duration_ms),
            max_rotation_deg: self.max_rotation_deg,
            spring: SpringParams {
                stiffness: self.spring_stiffness,
                damping: self.spring_damping,
                ..SpringParams::default()
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub artwork_base: String,
    pub max_id: u32,
    pub max_attempts: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            artwork_base: DEFAULT_ARTWORK_BASE.to_string(),
            max_id: DEFAULT_MAX_ID,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ApiSettings {
    pub fn endpoints(&self) -> ApiEndpoints {
        ApiEndpoints {
            base_url: self.base_url.clone(),
            artwork_base: self.artwork_base.clone(),
        }
    }

    pub fn policy(&self) -> FetchPolicy {
        FetchPolicy {
            max_id: self.max_id,
            max_attempts: self.max_attempts,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub keymap: Keymap,
    pub swipe: SwipeSettings,
    pub api: ApiSettings,
}

/// Read the config file, writing the defaults first if it does not exist
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        let config = Config::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let toml = toml::to_string(&config).context("Failed to serialize default config")?;
        fs::write(path, toml)
            .with_context(|| format!("Failed to write default config to {}", path.display()))?;
        return Ok(config);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.api.policy().validate()?;
    config
        .swipe
        .to_swipe_config(0.0)
        .validate()
        .with_context(|| format!("Invalid [swipe] settings in {}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_keymap_matches() {
        assert!(Keymap::matches("q", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(Keymap::matches("q", &key(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(!Keymap::matches("q", &key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(Keymap::matches("ctrl-g", &key(KeyCode::Char('g'), KeyModifiers::CONTROL)));
        assert!(Keymap::matches("left", &key(KeyCode::Left, KeyModifiers::NONE)));
        assert!(Keymap::matches("enter", &key(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!Keymap::matches("left", &key(KeyCode::Right, KeyModifiers::NONE)));
        assert!(!Keymap::matches("nonsense", &key(KeyCode::Char('n'), KeyModifiers::NONE)));
    }

    #[test]
    fn test_missing_config_is_written_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = load_config(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.max_attempts, 10);
        assert_eq!(config.keymap.like, "right");

        let reloaded = load_config(&path).unwrap();
        assert_eq!(reloaded.api.base_url, config.api.base_url);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[swipe]\nthreshold_ratio = 0.4\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.swipe.threshold_ratio, 0.4);
        assert_eq!(config.swipe.exit_duration_ms, 250);
        assert_eq!(config.keymap.quit, "q");

        let swipe = config.swipe.to_swipe_config(100.0);
        assert_eq!(swipe.threshold(), 40.0);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nmax_attempts = 0\n").unwrap();
        assert!(load_config(&path).is_err());

        fs::write(&path, "not = [valid").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_unusable_swipe_settings_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        for swipe in [
            "spring_damping = -22.0",
            "spring_stiffness = -1.0",
            "threshold_ratio = nan",
            "threshold_ratio = 1.5",
        ] {
            fs::write(&path, format!("[swipe]\n{}\n", swipe)).unwrap();
            let err = load_config(&path).unwrap_err();
            assert!(err.to_string().contains("[swipe]"), "{}: {:#}", swipe, err);
        }
    }
}
