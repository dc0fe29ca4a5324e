use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: resolve_port(env::var("PORT").ok()),
            data_path: resolve_data_path(env::var("APP_DATA_PATH").ok()),
        }
    }
}

fn resolve_port(value: Option<String>) -> u16 {
    value
        .and_then(|value| value.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

fn resolve_data_path(value: Option<String>) -> PathBuf {
    match value {
        Some(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_DATA_PATH),
    }
}
