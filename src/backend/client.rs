use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder, Url};
use serde_json::Value;
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::backend::payload::ImageUpload;
use crate::config::Config;
use crate::error::{AppError, Result};

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Which backend service an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Vision,
    Scraper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Classify,
    PredictStock,
    Scrape,
    SearchScrape,
    BatchScrape,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Classify => "/classify",
            Endpoint::PredictStock => "/predict_stock",
            Endpoint::Scrape => "/api/scrape",
            Endpoint::SearchScrape => "/api/search-scrape",
            Endpoint::BatchScrape => "/api/batch-scrape",
        }
    }

    pub fn backend(self) -> Backend {
        match self {
            Endpoint::Classify | Endpoint::PredictStock => Backend::Vision,
            Endpoint::Scrape | Endpoint::SearchScrape | Endpoint::BatchScrape => Backend::Scraper,
        }
    }
}

/// Body of a backend POST.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(ImageUpload),
}

impl RequestBody {
    pub fn json<T: serde::Serialize>(payload: &T) -> Result<Self> {
        Ok(RequestBody::Json(serde_json::to_value(payload)?))
    }
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    vision: Url,
    scraper: Url,
    timeout: Duration,
}

impl BackendClient {
    pub fn new(vision: Url, scraper: Url, timeout: Duration) -> Self {
        Self {
            vision: with_trailing_slash(vision),
            scraper: with_trailing_slash(scraper),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.vision_backend.clone(),
            config.scraper_backend.clone(),
            config.backend_timeout,
        )
    }

    /// Absolute URL of an endpoint, keeping any path prefix of the origin.
    pub fn url_for(&self, endpoint: Endpoint) -> Result<Url> {
        let base = match endpoint.backend() {
            Backend::Vision => &self.vision,
            Backend::Scraper => &self.scraper,
        };
        base.join(endpoint.path().trim_start_matches('/'))
            .map_err(|e| AppError::Config(format!("Invalid endpoint URL: {}", e)))
    }

    /// Performs one POST and returns the JSON-decoded body.
    ///
    /// Non-2xx replies are still decoded when their body is JSON, since the
    /// backends report application errors that way; otherwise the status
    /// becomes a transport error.
    pub async fn post(&self, endpoint: Endpoint, body: RequestBody) -> Result<Value> {
        let url = self.url_for(endpoint)?;
        let request = CLIENT.post(url).timeout(self.timeout);

        let request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(upload) => request.multipart(upload_form(upload)?),
        };

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(AppError::Transport(format!("HTTP {}", status))),
            Err(e) => Err(AppError::Decode(e.to_string())),
        }
    }
}

fn upload_form(upload: ImageUpload) -> Result<Form> {
    let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
    if let Some(content_type) = upload.content_type.as_deref() {
        part = part.mime_str(content_type)?;
    }
    Ok(Form::new().part("file", part))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
