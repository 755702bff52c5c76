use std::env;
use std::time::Duration;

/// Startup configuration failures. These abort the process before the server binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Deployment mode. Development exposes internal error details in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::Invalid {
                key: "APP_ENV",
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_expires_in: Duration,
    pub bcrypt_cost: u32,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }

        let server_port = match env::var("SERVER_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                key: "SERVER_PORT",
                value: raw,
            })?,
            Err(_) => 4000,
        };

        let jwt_expires_in = match env::var("JWT_EXPIRES_IN") {
            Ok(raw) => parse_duration(&raw).ok_or(ConfigError::Invalid {
                key: "JWT_EXPIRES_IN",
                value: raw,
            })?,
            Err(_) => Duration::from_secs(15 * 60),
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "BCRYPT_COST",
                        value: raw,
                    })
                }
            },
            Err(_) => 12,
        };

        let environment = match env::var("APP_ENV") {
            Ok(raw) => Environment::parse(&raw)?,
            Err(_) => Environment::Production,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            server_port,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_expires_in,
            bcrypt_cost,
            environment,
            cors_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Parses lifetimes such as `900`, `45s`, `15m`, `2h` or `7d`.
fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let amount: u64 = digits.parse().ok()?;
    let multiplier = match unit {
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        _ => return None,
    };
    match amount.checked_mul(multiplier)? {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_duration("900"), Some(Duration::from_secs(900)));
        assert_eq!(parse_duration("2h"), Some(Duration::from_secs(7200)));
        assert_eq!(parse_duration("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_duration("0m"), None);
        assert_eq!(parse_duration("10w"), None);
        assert_eq!(parse_duration("m"), None);
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            Environment::parse("Development").unwrap(),
            Environment::Development
        );
        assert_eq!(Environment::parse("prod").unwrap(), Environment::Production);
        assert!(Environment::parse("staging").is_err());
    }

    const CONFIG_KEYS: [&str; 8] = [
        "DATABASE_URL",
        "SERVER_HOST",
        "SERVER_PORT",
        "JWT_SECRET",
        "JWT_EXPIRES_IN",
        "BCRYPT_COST",
        "APP_ENV",
        "CORS_ORIGINS",
    ];

    fn clear_config_env() {
        for key in CONFIG_KEYS {
            env::remove_var(key);
        }
    }

    // The only test in the crate touching process environment.
    #[test]
    fn test_config_from_env() {
        clear_config_env();
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("JWT_SECRET"))
        ));

        env::set_var("JWT_SECRET", "test-secret");
        let config = Config::from_env().unwrap();
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_expires_in, Duration::from_secs(900));
        assert_eq!(config.bcrypt_cost, 12);
        assert_eq!(config.environment, Environment::Production);
        assert!(config.database_url.is_none());
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);

        env::set_var("SERVER_PORT", "3000");
        env::set_var("JWT_EXPIRES_IN", "1h");
        env::set_var("APP_ENV", "development");
        let config = Config::from_env().unwrap();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.jwt_expires_in, Duration::from_secs(3600));
        assert!(config.is_development());

        env::set_var("SERVER_PORT", "not-a-port");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid {
                key: "SERVER_PORT",
                ..
            })
        ));

        clear_config_env();
    }
}
