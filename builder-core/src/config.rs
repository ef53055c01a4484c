use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared_types::SAVE_PAGE_PERMISSION;

/// Target resolution of preview screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenshotSize {
    pub const FULL_HD: Self = Self {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenshotSize {
    fn default() -> Self {
        Self::FULL_HD
    }
}

/// Tuning for the save orchestrator.
///
/// Deserializes from JSON with every field optional so a browser host can
/// pass a partial object; natively it can be read from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveConfig {
    /// Window during which repeated `save` calls collapse into one
    #[serde(with = "millis")]
    pub throttle_window: Duration,
    /// Delay between the host acknowledging a save and the state flipping to SAVED
    #[serde(with = "millis")]
    pub settle_delay: Duration,
    pub screenshot_size: ScreenshotSize,
    /// Capability required by `save_async`
    pub save_permission: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_millis(3000),
            settle_delay: Duration::from_millis(100),
            screenshot_size: ScreenshotSize::FULL_HD,
            save_permission: SAVE_PAGE_PERMISSION.to_string(),
        }
    }
}

impl SaveConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            throttle_window: Duration::from_millis(env_parse(
                "PAGE_BUILDER_SAVE_THROTTLE_MS",
                defaults.throttle_window.as_millis() as u64,
            )?),
            settle_delay: Duration::from_millis(env_parse(
                "PAGE_BUILDER_SAVE_SETTLE_MS",
                defaults.settle_delay.as_millis() as u64,
            )?),
            screenshot_size: ScreenshotSize {
                width: env_parse(
                    "PAGE_BUILDER_SCREENSHOT_WIDTH",
                    defaults.screenshot_size.width,
                )?,
                height: env_parse(
                    "PAGE_BUILDER_SCREENSHOT_HEIGHT",
                    defaults.screenshot_size.height,
                )?,
            },
            save_permission: env_str("PAGE_BUILDER_SAVE_PERMISSION", &defaults.save_permission),
        })
    }
}

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_match_builder_behaviour() {
        let config = SaveConfig::default();
        assert_eq!(config.throttle_window, Duration::from_millis(3000));
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(config.screenshot_size, ScreenshotSize::new(1920, 1080));
        assert_eq!(config.save_permission, "save_page");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SaveConfig =
            serde_json::from_value(json!({"throttleWindow": 500, "savePermission": "edit"}))
                .unwrap();
        assert_eq!(config.throttle_window, Duration::from_millis(500));
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(config.save_permission, "edit");
    }

    #[test]
    fn test_env_parse_reports_bad_values() {
        std::env::set_var("PAGE_BUILDER_TEST_BAD_NUMBER", "soon");
        let err = env_parse::<u64>("PAGE_BUILDER_TEST_BAD_NUMBER", 1).unwrap_err();
        assert!(err.to_string().contains("PAGE_BUILDER_TEST_BAD_NUMBER=soon"));
        std::env::remove_var("PAGE_BUILDER_TEST_BAD_NUMBER");

        assert_eq!(env_parse::<u64>("PAGE_BUILDER_TEST_UNSET", 7).unwrap(), 7);
    }

    #[test]
    fn test_from_env_reads_overrides() {
        let vars = [
            ("PAGE_BUILDER_SAVE_THROTTLE_MS", "1500"),
            ("PAGE_BUILDER_SAVE_SETTLE_MS", "0"),
            ("PAGE_BUILDER_SCREENSHOT_WIDTH", "1280"),
            ("PAGE_BUILDER_SCREENSHOT_HEIGHT", "720"),
            ("PAGE_BUILDER_SAVE_PERMISSION", "publish"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let config = SaveConfig::from_env().unwrap();
        assert_eq!(config.throttle_window, Duration::from_millis(1500));
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.screenshot_size, ScreenshotSize::new(1280, 720));
        assert_eq!(config.save_permission, "publish");

        std::env::set_var("PAGE_BUILDER_SCREENSHOT_WIDTH", "wide");
        let err = SaveConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("PAGE_BUILDER_SCREENSHOT_WIDTH=wide"));

        for (key, _) in vars {
            std::env::remove_var(key);
        }
        assert_eq!(SaveConfig::from_env().unwrap(), SaveConfig::default());
    }
}
