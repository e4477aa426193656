//! Request dispatcher.
//!
//! Every user action becomes one POST to a backend. The page is marked as
//! loading before the call, the reply (or the transport failure) is rendered
//! after it, and replies to requests that have since been superseded for the
//! same UI region are dropped.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::backend::payload::{ImageUpload, TickerRequest};
use crate::backend::response::{Classification, ScrapeOutcome, StockPrediction};
use crate::backend::{BackendClient, Decode, Endpoint, RequestBody};
use crate::error::Result;
use crate::render::{self, scrape, PredictionRender};
use crate::view::{ScraperPage, VisionPage};

/// Identifies one issued request within its UI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Monotonic request generations for one UI region.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: u64,
}

impl GenerationCounter {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// How a dispatched action ended up on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The backend replied and the reply was rendered, including replies
    /// that report an application error.
    Rendered,
    /// The request failed in transport or decoding; a connection error was
    /// shown instead.
    ConnectionError(String),
    /// A newer request for the same region was issued meanwhile.
    Superseded,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Debug)]
pub struct Dispatcher {
    client: BackendClient,
}

impl Dispatcher {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// One round trip, decoded into the endpoint's result type. Every
    /// endpoint takes a body, so there is no bodiless variant.
    pub async fn dispatch<T: Decode>(&self, endpoint: Endpoint, body: RequestBody) -> Result<T> {
        let start = Instant::now();
        info!(endpoint = endpoint.path(), "Dispatching request");

        let result = match self.client.post(endpoint, body).await {
            Ok(value) => T::decode(value),
            Err(err) => Err(err),
        };

        match &result {
            Ok(_) => info!(endpoint = endpoint.path(), elapsed = ?start.elapsed(), "Request completed"),
            Err(err) => warn!(endpoint = endpoint.path(), elapsed = ?start.elapsed(), error = %err, "Request failed"),
        }
        result
    }

    /// Scrape, search and batch actions: render into the results region.
    pub async fn scrape(&self, page: &Mutex<ScraperPage>, endpoint: Endpoint, body: RequestBody) -> RenderOutcome {
        let ticket = lock(page).begin_request();

        let (html, outcome) = match self.dispatch::<ScrapeOutcome>(endpoint, body).await {
            Ok(reply) => (render::render_outcome(&reply), RenderOutcome::Rendered),
            Err(err) => {
                let description = err.to_string();
                (scrape::connection_error(&description), RenderOutcome::ConnectionError(description))
            }
        };

        if lock(page).finish_request(ticket, html) {
            outcome
        } else {
            debug!(endpoint = endpoint.path(), "Dropping superseded response");
            RenderOutcome::Superseded
        }
    }

    pub async fn classify(&self, page: &Mutex<VisionPage>, upload: ImageUpload) -> RenderOutcome {
        let ticket = lock(page).begin_classification(&upload.file_name);

        let result = self
            .dispatch::<Classification>(Endpoint::Classify, RequestBody::Multipart(upload))
            .await;

        let mut page = lock(page);
        if !page.is_latest_classification(ticket) {
            debug!("Dropping superseded classification");
            return RenderOutcome::Superseded;
        }
        match result {
            Ok(reply) => {
                page.alert = render::render_classification(&reply, &mut page.classification);
                RenderOutcome::Rendered
            }
            Err(err) => {
                let preview = page.classification.preview.take();
                page.classification_failed(preview.as_deref());
                RenderOutcome::ConnectionError(err.to_string())
            }
        }
    }

    pub async fn predict(&self, page: &Mutex<VisionPage>, request: TickerRequest) -> RenderOutcome {
        let ticket = lock(page).begin_prediction();

        let result = match RequestBody::json(&request) {
            Ok(body) => self.dispatch::<StockPrediction>(Endpoint::PredictStock, body).await,
            Err(err) => Err(err),
        };

        let mut page = lock(page);
        if !page.is_latest_prediction(ticket) {
            debug!(ticker = %request.ticker, "Dropping superseded prediction");
            return RenderOutcome::Superseded;
        }
        page.finish_prediction();
        match result {
            Ok(reply) => {
                if let PredictionRender::Failed(message) = render::render_prediction(&reply, &mut page.chart) {
                    page.alert = Some(message);
                }
                RenderOutcome::Rendered
            }
            Err(err) => {
                page.alert = Some("Failed to fetch prediction.".to_string());
                RenderOutcome::ConnectionError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;
    use std::time::Duration;

    fn unreachable_dispatcher() -> Dispatcher {
        let origin = Url::parse("http://127.0.0.1:9").unwrap();
        Dispatcher::new(BackendClient::new(origin.clone(), origin, Duration::from_secs(2)))
    }

    #[test]
    fn tickets_are_monotonic() {
        let mut counter = GenerationCounter::default();
        let a = counter.issue();
        let b = counter.issue();
        assert_ne!(a, b);
        assert!(!counter.is_latest(a));
        assert!(counter.is_latest(b));
    }

    #[tokio::test]
    async fn unreachable_backend_renders_connection_error() {
        let dispatcher = unreachable_dispatcher();
        let page = Mutex::new(ScraperPage::default());
        let body = RequestBody::json(&serde_json::json!({ "url": "https://example.com" })).unwrap();

        let outcome = dispatcher.scrape(&page, Endpoint::Scrape, body).await;

        assert!(matches!(outcome, RenderOutcome::ConnectionError(_)));
        let page = lock(&page);
        assert!(!page.loading);
        assert!(!page.results.hidden);
        assert!(page.results.html.starts_with(r#"<div class="error-msg">Connection Error: "#));
    }

    #[tokio::test]
    async fn unreachable_backend_restores_predict_button() {
        let dispatcher = unreachable_dispatcher();
        let page = Mutex::new(VisionPage::default());
        let request = TickerRequest::from_input("AAPL").unwrap();

        let outcome = dispatcher.predict(&page, request).await;

        assert!(matches!(outcome, RenderOutcome::ConnectionError(_)));
        let page = lock(&page);
        assert!(!page.predict_button.disabled);
        assert_eq!(page.alert.as_deref(), Some("Failed to fetch prediction."));
        assert_eq!(page.chart.live_instances(), 0);
    }
}
