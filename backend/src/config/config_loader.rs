use anyhow::{Context, Result};

use super::{
    config_model::{Auth, BackendServer, Database, DotEnvyConfig},
    stage::Stage,
};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} is invalid"))
}

fn required_parsed<T>(key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    required(key)?
        .trim()
        .parse()
        .with_context(|| format!("{key} could not be parsed"))
}

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: required_parsed("SERVER_PORT_BACKEND")?,
        body_limit: required_parsed("SERVER_BODY_LIMIT")?,
        timeout: required_parsed("SERVER_TIMEOUT")?,
    };

    let database = Database {
        url: required("DATABASE_URL")?,
        max_connections: match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS could not be parsed")?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        },
    };

    let auth = Auth {
        jwt_secret: required("JWT_SECRET")?,
    };

    Ok(DotEnvyConfig {
        stage: get_stage(),
        backend_server,
        database,
        auth,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}
