use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
    #[error("PORT must be a port number, got {value:?}")]
    InvalidPort { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config { port: DEFAULT_PORT }
    }
}

impl Config {
    /// Loads `.env` from the working directory (if any) into the environment, then
    /// reads the config. Variables already set in the environment win.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_port_var(std::env::var("PORT").ok())
    }

    fn from_port_var(value: Option<String>) -> Result<Self, ConfigError> {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Ok(Config::default());
        };

        let port = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort { value })?;
        Ok(Config { port })
    }

    /// Listens on every interface.
    pub fn bind_addr(&self) -> SocketAddr {
        (Ipv4Addr::UNSPECIFIED, self.port).into()
    }
}
