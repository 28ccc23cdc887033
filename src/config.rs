use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub seed_demo: bool,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_path: try_load("DATABASE_PATH", "openscore.db".to_string()),
            host: try_load("HOST", "0.0.0.0".to_string()),
            port: try_load("PORT", 3001),
            seed_demo: try_load("SEED_DEMO", false),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads `key` from the environment. Missing or unparsable values fall back
/// to `default`.
fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => parse_or_default(key, &raw, default),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_or_default<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw.trim().parse() {
        Ok(value) => value,
        Err(e) => {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }
    }
}
