use std::str::FromStr;

use anyhow::{Context, Result};
use crates::payments::mayar_client::DEFAULT_MAYAR_BASE_URL;

use super::{
    config_model::{Auth, BackendServer, Database, DotEnvyConfig, Mayar, PublicUrls},
    stage::Stage,
};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_BODY_LIMIT_MIB: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60;
const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    load_from(|key| std::env::var(key).ok())
}

/// Builds the config from any key lookup; `load` feeds it the process env.
pub fn load_from<F>(lookup: F) -> Result<DotEnvyConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let required = |key: &str| var(key).with_context(|| format!("{key} is not set"));

    fn parsed<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        match raw {
            Some(raw) => raw.parse().with_context(|| format!("{key} is invalid")),
            None => Ok(default),
        }
    }

    let stage = match var("STAGE") {
        Some(raw) => Stage::try_from(&raw)?,
        None => Stage::default(),
    };

    let backend_server = BackendServer {
        port: parsed("SERVER_PORT", var("SERVER_PORT"), DEFAULT_PORT)?,
        body_limit: parsed(
            "SERVER_BODY_LIMIT",
            var("SERVER_BODY_LIMIT"),
            DEFAULT_BODY_LIMIT_MIB,
        )?,
        timeout: parsed("SERVER_TIMEOUT", var("SERVER_TIMEOUT"), DEFAULT_TIMEOUT_SECS)?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
    };

    let auth = Auth {
        jwt_secret: required("JWT_SECRET")?,
        token_ttl_seconds: parsed(
            "JWT_TTL_SECONDS",
            var("JWT_TTL_SECONDS"),
            DEFAULT_TOKEN_TTL_SECS,
        )?,
    };

    let mayar = Mayar {
        api_key: required("MAYAR_API_KEY")?,
        base_url: var("MAYAR_BASE_URL").unwrap_or_else(|| DEFAULT_MAYAR_BASE_URL.to_string()),
    };

    let urls = PublicUrls {
        frontend_url: var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string()),
        backend_url: var("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
    };

    Ok(DotEnvyConfig {
        stage,
        backend_server,
        database,
        auth,
        mayar,
        urls,
    })
}
