use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use reqwest::Url;
use crate::error::{AppError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_MAX_UPLOAD_MB: usize = 64;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub vision_backend: Url,
    pub scraper_backend: Url,
    pub backend_timeout: Duration,
    /// Largest accepted image upload, in bytes.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, applying defaults
    /// for every missing key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::Config(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::Config(format!("Invalid host address: {}", e)))?;

        let vision_backend = parse_origin(
            "VISION_BACKEND_URL",
            lookup("VISION_BACKEND_URL").as_deref().unwrap_or(DEFAULT_BACKEND_URL),
        )?;
        let scraper_backend = parse_origin(
            "SCRAPER_BACKEND_URL",
            lookup("SCRAPER_BACKEND_URL").as_deref().unwrap_or(DEFAULT_BACKEND_URL),
        )?;

        let timeout_secs = match lookup("BACKEND_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid backend timeout: {}", e)))?,
            None => 120,
        };

        let max_upload_mb = match lookup("MAX_UPLOAD_MB") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("Invalid upload limit: {}", e)))?,
            None => DEFAULT_MAX_UPLOAD_MB,
        };

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            vision_backend,
            scraper_backend,
            backend_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

fn parse_origin(key: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| AppError::Config(format!("Invalid {}: {}", key, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!("Invalid {}: unsupported scheme {}", key, other))),
    }
}
