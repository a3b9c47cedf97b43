//! Server configuration.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised while reading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for the docrelay server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Argon2 memory cost in KiB, shared by the hash utility and login.
    pub hash_memory_kib: u32,
    /// Argon2 iteration count.
    pub hash_iterations: u32,
    /// Whether to ensure the seed admin user exists on startup.
    pub seed_admin: bool,
    /// Password hashed into the seed admin user when it is created.
    pub admin_password: String,
    /// Capacity of the peer broadcast channel; peers that lag beyond it
    /// simply miss refresh frames (fire-and-forget).
    pub broadcast_capacity: usize,
}

impl ServerConfig {
    /// Creates a configuration with defaults for everything but the bind
    /// address.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            hash_memory_kib: 19_456,
            hash_iterations: 2,
            seed_admin: true,
            admin_password: "admin".to_string(),
            broadcast_capacity: 128,
        }
    }

    /// Sets the Argon2 cost parameters.
    pub fn with_hash_cost(mut self, memory_kib: u32, iterations: u32) -> Self {
        self.hash_memory_kib = memory_kib;
        self.hash_iterations = iterations;
        self
    }

    /// Enables or disables seed admin creation.
    pub fn with_seed_admin(mut self, seed: bool) -> Self {
        self.seed_admin = seed;
        self
    }

    /// Sets the seed admin password.
    pub fn with_admin_password(mut self, password: impl Into<String>) -> Self {
        self.admin_password = password.into();
        self
    }

    /// Sets the broadcast channel capacity.
    pub fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }

    /// Builds a configuration from `DOCRELAY_*` environment variables,
    /// falling back to defaults for anything unset.
    ///
    /// Recognized variables: `DOCRELAY_BIND`, `DOCRELAY_ADMIN_PASSWORD`,
    /// `DOCRELAY_SEED_ADMIN`, `DOCRELAY_HASH_MEMORY_KIB`,
    /// `DOCRELAY_HASH_ITERATIONS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(bind) = env::var("DOCRELAY_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("DOCRELAY_BIND: {bind}")))?;
        }
        if let Ok(password) = env::var("DOCRELAY_ADMIN_PASSWORD") {
            config.admin_password = password;
        }
        if let Ok(seed) = env::var("DOCRELAY_SEED_ADMIN") {
            config.seed_admin = parse_bool(&seed)
                .ok_or_else(|| ConfigError::Invalid(format!("DOCRELAY_SEED_ADMIN: {seed}")))?;
        }
        if let Ok(memory) = env::var("DOCRELAY_HASH_MEMORY_KIB") {
            config.hash_memory_kib = memory
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("DOCRELAY_HASH_MEMORY_KIB: {memory}")))?;
        }
        if let Ok(iterations) = env::var("DOCRELAY_HASH_ITERATIONS") {
            config.hash_iterations = iterations.parse().map_err(|_| {
                ConfigError::Invalid(format!("DOCRELAY_HASH_ITERATIONS: {iterations}"))
            })?;
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 8080)))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(config.seed_admin);
        assert_eq!(config.hash_iterations, 2);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("0.0.0.0:9000".parse().unwrap())
            .with_hash_cost(64, 1)
            .with_seed_admin(false)
            .with_admin_password("s3cret")
            .with_broadcast_capacity(16);

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.hash_memory_kib, 64);
        assert!(!config.seed_admin);
        assert_eq!(config.admin_password, "s3cret");
        assert_eq!(config.broadcast_capacity, 16);
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
