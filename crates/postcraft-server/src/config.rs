use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "secret",
];

/// Server settings, read from `POSTCRAFT_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub upload_dir: PathBuf,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub max_upload_bytes: usize,
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = get("POSTCRAFT_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("POSTCRAFT_JWT_SECRET is unset or still a placeholder; set it in .env and restart");
        }

        let port = parse_or(&get, "POSTCRAFT_PORT", 5000u16)?;
        let token_ttl_secs = parse_or(&get, "POSTCRAFT_TOKEN_TTL_SECS", 3600i64)?;
        if token_ttl_secs <= 0 {
            bail!("POSTCRAFT_TOKEN_TTL_SECS must be positive");
        }
        let max_upload_bytes = parse_or(&get, "POSTCRAFT_MAX_UPLOAD_BYTES", 10 * 1024 * 1024usize)?;

        let cors_origins = get("POSTCRAFT_CORS_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            host: get("POSTCRAFT_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: get("POSTCRAFT_DB_PATH").unwrap_or_else(|| "postcraft.db".into()).into(),
            upload_dir: get("POSTCRAFT_UPLOAD_DIR").unwrap_or_else(|| "./uploads".into()).into(),
            jwt_secret,
            token_ttl: chrono::Duration::seconds(token_ttl_secs),
            max_upload_bytes,
            cors_origins: cors_origins.filter(|origins| !origins.is_empty()),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw.trim().parse().with_context(|| format!("Invalid {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[("POSTCRAFT_JWT_SECRET", "s3cr3t-value")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("postcraft.db"));
        assert_eq!(config.token_ttl, chrono::Duration::hours(1));
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.cors_origins.is_none());
    }

    #[test]
    fn secret_is_required() {
        assert!(load(&[]).is_err());
        assert!(load(&[("POSTCRAFT_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("POSTCRAFT_JWT_SECRET", "s3cr3t-value"),
            ("POSTCRAFT_PORT", "8080"),
            ("POSTCRAFT_TOKEN_TTL_SECS", "600"),
            ("POSTCRAFT_CORS_ORIGINS", "https://a.example, https://b.example,"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.token_ttl, chrono::Duration::minutes(10));
        assert_eq!(
            config.cors_origins,
            Some(vec!["https://a.example".to_string(), "https://b.example".to_string()])
        );
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(load(&[("POSTCRAFT_JWT_SECRET", "s3cr3t-value"), ("POSTCRAFT_PORT", "http")]).is_err());
        assert!(load(&[("POSTCRAFT_JWT_SECRET", "s3cr3t-value"), ("POSTCRAFT_TOKEN_TTL_SECS", "0")]).is_err());
    }
}
