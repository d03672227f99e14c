//! Network configuration types for the `Clearword` server.

/// Top-level network configuration for the server.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Bind address for the server.
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    pub port: u16,
    /// Allowed CORS origins. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body size in bytes.
    pub body_limit: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            body_limit: 1024 * 1024, // 1 MiB
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_config_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5000);
        assert_eq!(config.cors_origins, vec!["*"]);
        assert_eq!(config.body_limit, 1_048_576);
    }
}
