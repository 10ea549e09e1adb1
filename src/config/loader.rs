//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AuthScheme, Credentials, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the upstream API token.
pub const UPSTREAM_TOKEN_VAR: &str = "GITHUB_TOKEN";
/// Environment variable holding the token inbound callers must present.
pub const BEARER_TOKEN_VAR: &str = "BEARER_TOKEN";
/// When `true`, the upstream token is sent with the `Bearer` scheme.
pub const USE_BEARER_VAR: &str = "USE_BEARER_TOKEN";

/// Error type for configuration loading. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required environment variable {0}")]
    MissingSecret(&'static str),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values given on the command line; they win over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
}

/// Load configuration from an optional TOML file plus the process environment.
pub fn load_config(path: Option<&Path>, overrides: Overrides) -> Result<ProxyConfig, ConfigError> {
    load_config_with(path, overrides, |name| env::var(name).ok())
}

/// Same as [`load_config`], reading variables through `lookup`.
pub fn load_config_with<F>(
    path: Option<&Path>,
    overrides: Overrides,
    lookup: F,
) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ProxyConfig = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    if let Some(bind) = overrides.bind_address {
        config.listener.bind_address = bind;
    }

    config.credentials = credentials_from(&lookup)?;

    if let Some(flag) = lookup(USE_BEARER_VAR) {
        config.upstream.auth_scheme = if flag.eq_ignore_ascii_case("true") {
            AuthScheme::Bearer
        } else {
            AuthScheme::Token
        };
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn credentials_from<F>(lookup: &F) -> Result<Credentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secret = |name: &'static str| {
        lookup(name)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingSecret(name))
    };
    Ok(Credentials::new(secret(UPSTREAM_TOKEN_VAR)?, secret(BEARER_TOKEN_VAR)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_loads_secrets_from_environment() {
        let config = load_config_with(
            None,
            Overrides::default(),
            env_of(&[(UPSTREAM_TOKEN_VAR, "ghp_x"), (BEARER_TOKEN_VAR, "local")]),
        )
        .unwrap();
        assert_eq!(config.credentials, Credentials::new("ghp_x", "local"));
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Token);
    }

    #[test]
    fn test_missing_upstream_token_is_fatal() {
        let err = load_config_with(
            None,
            Overrides::default(),
            env_of(&[(BEARER_TOKEN_VAR, "local")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(UPSTREAM_TOKEN_VAR)));
    }

    #[test]
    fn test_empty_bearer_token_is_fatal() {
        let err = load_config_with(
            None,
            Overrides::default(),
            env_of(&[(UPSTREAM_TOKEN_VAR, "ghp_x"), (BEARER_TOKEN_VAR, "")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(BEARER_TOKEN_VAR)));
    }

    #[test]
    fn test_use_bearer_flag_selects_scheme() {
        let config = load_config_with(
            None,
            Overrides::default(),
            env_of(&[
                (UPSTREAM_TOKEN_VAR, "ghp_x"),
                (BEARER_TOKEN_VAR, "local"),
                (USE_BEARER_VAR, "TRUE"),
            ]),
        )
        .unwrap();
        assert_eq!(config.upstream.auth_scheme, AuthScheme::Bearer);
    }

    #[test]
    fn test_file_values_are_validated() {
        let path = std::env::temp_dir().join(format!("search-proxy-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[upstream]\nchar_limit = 0").unwrap();

        let err = load_config_with(
            Some(&path),
            Overrides::default(),
            env_of(&[(UPSTREAM_TOKEN_VAR, "ghp_x"), (BEARER_TOKEN_VAR, "local")]),
        )
        .unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(err.to_string().contains("upstream.char_limit"));
    }

    #[test]
    fn test_bind_override_is_validated() {
        let secrets = [(UPSTREAM_TOKEN_VAR, "ghp_x"), (BEARER_TOKEN_VAR, "local")];
        let overrides = Overrides {
            bind_address: Some("127.0.0.1:9100".into()),
        };
        let config = load_config_with(None, overrides, env_of(&secrets)).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9100");

        let overrides = Overrides {
            bind_address: Some("localhost-ish".into()),
        };
        let err = load_config_with(None, overrides, env_of(&secrets)).unwrap_err();
        assert!(err.to_string().contains("listener.bind_address"), "{}", err);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config_with(
            Some(Path::new("/definitely/not/here.toml")),
            Overrides::default(),
            env_of(&[(UPSTREAM_TOKEN_VAR, "ghp_x"), (BEARER_TOKEN_VAR, "local")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
