use std::path::PathBuf;

use axum::http::HeaderValue;
use grokgen_core::storage::DEFAULT_OUTPUT_DIR;

/// Errors loading [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults matching the container layout: port `8081` and
/// images under `generated_images` in the working directory.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8081`).
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds. Generation of ten images can take
    /// minutes, so the default is generous.
    pub request_timeout_secs: u64,
    /// Directory generated images are written to and served from.
    pub output_dir: PathBuf,
    /// Base URL saved images are advertised under, without trailing slash.
    pub public_base_url: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                      |
    /// |------------------------|------------------------------|
    /// | `HOST`                 | `0.0.0.0`                    |
    /// | `PORT`                 | `8081`                       |
    /// | `CORS_ORIGINS`         | `*`                          |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                        |
    /// | `OUTPUT_DIR`           | `generated_images`           |
    /// | `PUBLIC_BASE_URL`      | `http://localhost:{PORT}`    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from any variable source; `from_env` passes
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = parse_var(&lookup, "PORT", 8081)?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            if origin != "*" && origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let request_timeout_secs: u64 = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", 300)?;

        let output_dir = lookup("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            output_dir,
            public_base_url,
        })
    }

    /// Whether CORS should allow any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_match_container_layout() {
        let config = load(&[]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.output_dir, PathBuf::from("generated_images"));
        assert_eq!(config.public_base_url, "http://localhost:8081");
        assert!(config.allows_any_origin());
    }

    #[test]
    fn public_base_url_follows_port_and_drops_trailing_slash() {
        let config = load(&[("PORT", "9000")]).unwrap();
        assert_eq!(config.public_base_url, "http://localhost:9000");

        let config = load(&[("PUBLIC_BASE_URL", "https://img.example.com/")]).unwrap();
        assert_eq!(config.public_base_url, "https://img.example.com");
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("REQUEST_TIMEOUT_SECS", " 60 "),
            ("OUTPUT_DIR", "/data/out"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
        ])
        .unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.output_dir, PathBuf::from("/data/out"));
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert_matches!(
            load(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { var: "PORT", value }) if value == "eighty"
        );
        assert_matches!(
            load(&[("PORT", "70000")]),
            Err(ConfigError::Invalid { var: "PORT", .. })
        );
        assert_matches!(
            load(&[("REQUEST_TIMEOUT_SECS", "-1")]),
            Err(ConfigError::Invalid { var: "REQUEST_TIMEOUT_SECS", .. })
        );
    }

    #[test]
    fn bad_cors_origin_is_rejected() {
        assert_matches!(
            load(&[("CORS_ORIGINS", "http://ok.test,bad\norigin")]),
            Err(ConfigError::Invalid { var: "CORS_ORIGINS", value }) if value == "bad\norigin"
        );
    }
}
