use std::{env, path::PathBuf};
use tracing::Level;
use url::Url;

#[derive(Clone)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone)]
pub(crate) struct LokiConfig {
    pub(crate) host: Url,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) min_level: Level,
}

#[derive(Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) loki: Option<LokiConfig>,
    pub(crate) log_dir: Option<PathBuf>,
    /// Collected while parsing and logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        let component = component.trim().to_string();

        let service_name = env_string("SERVICE_NAME").unwrap_or_else(|| component.clone());
        let environment = env_string("STAGE").unwrap_or_else(|| "development".to_string());

        let (loki, warnings) = loki_from_env();

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            loki,
            log_dir: env_string("LOG_DIR").map(PathBuf::from),
            warnings,
        }
    }
}

fn loki_from_env() -> (Option<LokiConfig>, Vec<String>) {
    let mut warnings = Vec::new();

    let host = env_string("LOKI_HOST");
    let username = env_string("LOKI_USERNAME");
    let password = env_string("LOKI_PASSWORD");

    let (host, username, password) = match (host, username, password) {
        (Some(host), Some(username), Some(password)) => (host, username, password),
        (None, None, None) => {
            warnings.push("Loki transport disabled (LOKI_HOST/LOKI_USERNAME/LOKI_PASSWORD not set)".to_string());
            return (None, warnings);
        }
        _ => {
            warnings.push(
                "Loki transport disabled (LOKI_HOST, LOKI_USERNAME and LOKI_PASSWORD must all be set)"
                    .to_string(),
            );
            return (None, warnings);
        }
    };

    let host = match Url::parse(&host) {
        Ok(url) => url,
        Err(err) => {
            // Never echo the raw value, it may embed credentials.
            warnings.push(format!(
                "LOKI_HOST is set but invalid; Loki transport disabled (parse error: {err})"
            ));
            return (None, warnings);
        }
    };

    let min_level = match env_string("LOKI_LEVEL") {
        Some(raw) => parse_level(&raw).unwrap_or_else(|| {
            warnings.push(format!("LOKI_LEVEL is invalid (value: {raw}); defaulting to INFO"));
            Level::INFO
        }),
        None => Level::INFO,
    };

    (
        Some(LokiConfig {
            host,
            username,
            password,
            min_level,
        }),
        warnings,
    )
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
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
