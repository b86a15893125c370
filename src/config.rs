use std::env;

use once_cell::sync::Lazy;
use tracing::warn;

/// Process-environment configuration, loaded once. The API key is allowed to
/// be absent here; the dispatcher turns that into a user-visible
/// configuration error instead of a startup crash.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub gemini_api_key: String,
    pub gemini_image_model: String,
    pub gemini_safety_settings: String,
    pub gemini_request_timeout_seconds: u64,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_safety_settings(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return "permissive".to_string();
    }

    match trimmed.to_lowercase().as_str() {
        "permissive" | "off" | "none" => "permissive".to_string(),
        "standard" => "standard".to_string(),
        _ => {
            warn!(
                "Unknown GEMINI_SAFETY_SETTINGS value '{}'; defaulting to permissive.",
                value
            );
            "permissive".to_string()
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Config {
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
            gemini_api_key: env_string("GEMINI_API_KEY", ""),
            gemini_image_model: env_string("GEMINI_IMAGE_MODEL", "gemini-2.5-flash-image"),
            gemini_safety_settings: normalize_safety_settings(env_string(
                "GEMINI_SAFETY_SETTINGS",
                "permissive",
            )),
            gemini_request_timeout_seconds: env_u64("GEMINI_REQUEST_TIMEOUT_SECONDS", 90),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_settings_normalize_to_known_profiles() {
        assert_eq!(normalize_safety_settings("OFF".to_string()), "permissive");
        assert_eq!(normalize_safety_settings("none".to_string()), "permissive");
        assert_eq!(normalize_safety_settings("Standard".to_string()), "standard");
        assert_eq!(normalize_safety_settings("".to_string()), "permissive");
        assert_eq!(normalize_safety_settings("strict".to_string()), "permissive");
    }
}
