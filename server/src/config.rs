use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub principals_path: PathBuf,
    pub cookie_key: Key,
    pub cors_allowed_origins: Vec<String>,
    pub dev_login: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let principals_path = lookup("PRINCIPALS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("principals.json"));

        let cookie_secret = lookup("COOKIE_SECRET_BASE64").context("COOKIE_SECRET_BASE64 missing")?;
        let secret_bytes = STANDARD
            .decode(cookie_secret.trim())
            .context("invalid COOKIE_SECRET_BASE64")?;
        if secret_bytes.len() < 64 {
            return Err(anyhow!(
                "COOKIE_SECRET_BASE64 must decode to at least 64 bytes"
            ));
        }
        let cookie_key = Key::try_from(&secret_bytes[..64])
            .map_err(|err| anyhow!("invalid COOKIE_SECRET_BASE64: {err}"))?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        let dev_login = lookup("DEV_LOGIN")
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            principals_path,
            cookie_key,
            cors_allowed_origins,
            dev_login,
        })
    }
}
