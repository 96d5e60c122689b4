use std::env;

use tracing::Level;

#[derive(Debug, Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Level used when `RUST_LOG` is unset or unparsable.
    pub(crate) default_level: Level,
    pub(crate) with_ansi: bool,
    /// Warnings captured during config parsing so they can be logged after tracing is initialized.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = env_string("SERVICE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = env_string("STAGE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let default_level = match env_string("LOG_DEFAULT_LEVEL") {
            Some(raw) if !raw.trim().is_empty() => parse_level(&raw).unwrap_or_else(|| {
                warnings.push(format!(
                    "LOG_DEFAULT_LEVEL is invalid (value: {raw}); defaulting to INFO"
                ));
                Level::INFO
            }),
            _ => Level::INFO,
        };

        let with_ansi = match env_string("LOG_ANSI") {
            Some(raw) => env_bool(&raw).unwrap_or_else(|| {
                warnings.push(format!("LOG_ANSI is invalid (value: {raw}); defaulting to true"));
                true
            }),
            None => true,
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            default_level,
            with_ansi,
            warnings,
        }
    }
}

pub(crate) fn parse_level(input: &str) -> Option<Level> {
    match input.trim().to_ascii_lowercase().as_str() {
        "error" => Some(Level::ERROR),
        "warn" | "warning" => Some(Level::WARN),
        "info" => Some(Level::INFO),
        "debug" => Some(Level::DEBUG),
        "trace" => Some(Level::TRACE),
        _ => None,
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_levels_loosely() {
        assert_eq!(parse_level(" Warning "), Some(Level::WARN));
        assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_level("loud"), None);
    }

    #[test]
    fn parses_booleans_loosely() {
        assert_eq!(env_bool("Yes"), Some(true));
        assert_eq!(env_bool("off"), Some(false));
        assert_eq!(env_bool("maybe"), None);
    }
}
