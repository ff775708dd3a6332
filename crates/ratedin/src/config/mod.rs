use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::reputation::DEFAULT_LEADERBOARD_LIMIT;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AppEnvironment {
    #[default]
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process configuration assembled from `.env` and the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reputation: ReputationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or_default();

        let port = match env::var("APP_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort)?,
            Err(_) => DEFAULT_PORT,
        };

        let leaderboard_limit = match env::var("RATEDIN_LEADERBOARD_LIMIT") {
            Ok(raw) => parse_leaderboard_limit(&raw)?,
            Err(_) => DEFAULT_LEADERBOARD_LIMIT,
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host: var_or("APP_HOST", DEFAULT_HOST),
                port,
            },
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
            },
            reputation: ReputationConfig { leaderboard_limit },
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_leaderboard_limit(raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|limit| *limit > 0)
        .ok_or(ConfigError::InvalidLeaderboardLimit)
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// `localhost` maps to the IPv4 loopback; anything else must be a literal address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Read-side tuning for the reputation endpoints.
#[derive(Debug, Clone)]
pub struct ReputationConfig {
    pub leaderboard_limit: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLeaderboardLimit,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must be localhost or an IPv4/IPv6 address")
            }
            ConfigError::InvalidLeaderboardLimit => {
                write!(f, "RATEDIN_LEADERBOARD_LIMIT must be a positive integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort | ConfigError::InvalidLeaderboardLimit => None,
        }
    }
}
