use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub session: SessionConfig,
    pub billing: BillingConfig,
    pub assist: AssistConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let session_secret = match env::var("SESSION_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingSessionSecret);
            }
            _ => "legatepro-insecure-dev-secret".to_string(),
        };
        let session_ttl_hours = env::var("SESSION_TTL_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidSessionTtl)?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::InvalidSessionTtl);
        }

        let billing = BillingConfig {
            secret_key: non_empty(env::var("STRIPE_SECRET_KEY").ok()),
            price_id: non_empty(env::var("STRIPE_PRICE_ID").ok()),
            return_url: env::var("BILLING_RETURN_URL")
                .unwrap_or_else(|_| "http://localhost:3000/account".to_string()),
            rate_limit_per_minute: env::var("BILLING_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "10".to_string())
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidRateLimit)?,
        };

        let assist = AssistConfig {
            endpoint: non_empty(env::var("PLAN_ASSIST_URL").ok()),
            api_key: non_empty(env::var("PLAN_ASSIST_API_KEY").ok()),
            model: env::var("PLAN_ASSIST_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            session: SessionConfig {
                secret: session_secret,
                ttl_hours: session_ttl_hours,
            },
            billing,
            assist,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Session-token signing controls.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
}

/// Payment-provider wiring. Absent keys leave billing unconfigured rather
/// than failing startup, so the rest of the service stays usable.
#[derive(Debug, Clone)]
pub struct BillingConfig {
    pub secret_key: Option<String>,
    pub price_id: Option<String>,
    pub return_url: String,
    pub rate_limit_per_minute: u32,
}

/// Optional chat-completion endpoint used to refine readiness plans.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSessionTtl,
    InvalidRateLimit,
    MissingSessionSecret,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSessionTtl => {
                write!(f, "SESSION_TTL_HOURS must be a positive integer")
            }
            ConfigError::InvalidRateLimit => {
                write!(f, "BILLING_RATE_LIMIT_PER_MINUTE must be a u32")
            }
            ConfigError::MissingSessionSecret => {
                write!(f, "SESSION_SECRET is required in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
