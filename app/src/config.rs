use crate::error::ConfigError;
use aag_core::SourceZone;
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_METRICS_ADDR: &str = "0.0.0.0:9100";

#[derive(Debug, Clone)]
pub struct Config {
    aag_directory: PathBuf,
    server_addr: SocketAddr,
    metrics_addr: SocketAddr,
    source_zone: SourceZone,
    cache_readings: bool,
}

impl Config {
    /// Reads the process environment, a `.env` file is loaded first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let aag_directory = PathBuf::from(
            lookup("AAG_DIRECTORY").ok_or(ConfigError::Missing("AAG_DIRECTORY"))?,
        );
        if !aag_directory.is_dir() {
            return Err(ConfigError::DirectoryNotFound(aag_directory));
        }

        let server_addr = parse_addr(
            "SERVER_ADDR",
            lookup("SERVER_ADDR").as_deref().unwrap_or(DEFAULT_SERVER_ADDR),
        )?;
        let metrics_addr = parse_addr(
            "METRICS_ADDR",
            lookup("METRICS_ADDR").as_deref().unwrap_or(DEFAULT_METRICS_ADDR),
        )?;
        let source_zone = match lookup("AAG_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<SourceZone>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "AAG_TIMEZONE",
                    reason,
                })?,
            None => SourceZone::Local,
        };
        let cache_readings = match lookup("AAG_CACHE_READINGS") {
            Some(flag) => parse_flag("AAG_CACHE_READINGS", &flag)?,
            None => false,
        };

        Ok(Config {
            aag_directory,
            server_addr,
            metrics_addr,
            source_zone,
            cache_readings,
        })
    }

    pub fn aag_directory(&self) -> &Path {
        &self.aag_directory
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    pub fn metrics_addr(&self) -> SocketAddr {
        self.metrics_addr
    }

    pub fn source_zone(&self) -> SourceZone {
        self.source_zone
    }

    pub fn cache_readings(&self) -> bool {
        self.cache_readings
    }
}

fn parse_addr(key: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.trim().parse().map_err(|err| ConfigError::Invalid {
        key,
        reason: format!("{}", err),
    })
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::Invalid {
            key,
            reason: format!("expected a boolean, got {:?}", other),
        }),
    }
}
