use axum::{
    routing::{get, post},
    Router,
    extract::{multipart::MultipartError, DefaultBodyLimit, Form, Multipart, Path, State},
    http::StatusCode,
    response::{Redirect, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::{AppError, Result};
use crate::api::models::{BatchForm, TickerForm, TopicForm, UrlForm};
use crate::api::response;
use crate::backend::payload::{BatchRequest, ImageUpload, ScrapeRequest, SearchRequest, TickerRequest};
use crate::backend::{Endpoint, RequestBody};
use crate::dispatch::{lock, RenderOutcome};
use crate::render::page::{scraper_page, vision_page};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/", get(|| async { Redirect::to("/scraper") }))
        .route("/healthz", get(|| async { "ok" }))
        .route("/scraper", get(scraper_view))
        .route("/scraper/tabs/:id", post(scraper_tab))
        .route("/scraper/scrape", post(scrape_handler))
        .route("/scraper/search", post(search_handler))
        .route("/scraper/batch", post(batch_handler))
        .route("/vision", get(vision_view))
        .route("/vision/tabs/:id", post(vision_tab))
        .route(
            "/vision/classify",
            post(classify_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/vision/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

// ---------------------------------------------------------------------------
// Scraper dashboard
// ---------------------------------------------------------------------------

async fn scraper_view(State(state): State<AppState>) -> Response {
    response::page(scraper_page(&lock(&state.scraper)))
}

async fn scraper_tab(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut page = lock(&state.scraper);
    match page.activate_tab(&id) {
        Ok(()) => response::page(scraper_page(&page)),
        Err(err) => {
            page.alert = Some(err.to_string());
            response::rejected(scraper_page(&page))
        }
    }
}

async fn scrape_handler(State(state): State<AppState>, Form(form): Form<UrlForm>) -> Response {
    let body = ScrapeRequest::from_input(&form.url).and_then(|req| RequestBody::json(&req));
    run_scrape(&state, Endpoint::Scrape, body).await
}

async fn search_handler(State(state): State<AppState>, Form(form): Form<TopicForm>) -> Response {
    let body = SearchRequest::from_input(&form.topic).and_then(|req| RequestBody::json(&req));
    run_scrape(&state, Endpoint::SearchScrape, body).await
}

async fn batch_handler(State(state): State<AppState>, Form(form): Form<BatchForm>) -> Response {
    let body = BatchRequest::from_input(&form.urls).and_then(|req| RequestBody::json(&req));
    run_scrape(&state, Endpoint::BatchScrape, body).await
}

async fn run_scrape(state: &AppState, endpoint: Endpoint, body: Result<RequestBody>) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(err) => return reject_scraper(state, err),
    };

    let outcome = state.dispatcher.scrape(&state.scraper, endpoint, body).await;
    log_outcome(endpoint, &outcome);

    response::page(scraper_page(&lock(&state.scraper)))
}

fn reject_scraper(state: &AppState, err: AppError) -> Response {
    info!(error = %err, "Rejected scraper input");
    let mut page = lock(&state.scraper);
    page.alert = Some(err.to_string());
    response::rejected(scraper_page(&page))
}

// ---------------------------------------------------------------------------
// Vision dashboard
// ---------------------------------------------------------------------------

async fn vision_view(State(state): State<AppState>) -> Response {
    response::page(vision_page(&lock(&state.vision)))
}

async fn vision_tab(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut page = lock(&state.vision);
    match page.activate_tab(&id) {
        Ok(()) => response::page(vision_page(&page)),
        Err(err) => {
            page.alert = Some(err.to_string());
            response::rejected(vision_page(&page))
        }
    }
}

async fn classify_handler(State(state): State<AppState>, multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(err) if err.is_connection_error() => return upload_failed(&state, err),
        Err(err) => return reject_vision(&state, err),
    };

    let outcome = state.dispatcher.classify(&state.vision, upload).await;
    log_outcome(Endpoint::Classify, &outcome);

    response::page(vision_page(&lock(&state.vision)))
}

async fn predict_handler(State(state): State<AppState>, Form(form): Form<TickerForm>) -> Response {
    let request = match TickerRequest::from_input(&form.ticker) {
        Ok(request) => request,
        Err(err) => return reject_vision(&state, err),
    };

    let outcome = state.dispatcher.predict(&state.vision, request).await;
    log_outcome(Endpoint::PredictStock, &outcome);

    response::page(vision_page(&lock(&state.vision)))
}

/// Pulls the `file` field out of the upload form. A body that cannot be read
/// to the end is a transport failure unless it ran past the upload limit.
async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(upload_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(upload_error)?;
        return ImageUpload::new(file_name, content_type, bytes.to_vec());
    }
    ImageUpload::new(None, None, Vec::new())
}

fn upload_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("Image is too large to upload")
    } else {
        AppError::Transport(format!("Upload interrupted: {}", err))
    }
}

fn upload_failed(state: &AppState, err: AppError) -> Response {
    warn!(error = %err, "Could not read image upload");
    let mut page = lock(&state.vision);
    page.alert = None;
    page.classification_failed(None);
    response::page(vision_page(&page))
}

fn reject_vision(state: &AppState, err: AppError) -> Response {
    info!(error = %err, "Rejected vision input");
    let mut page = lock(&state.vision);
    page.alert = Some(err.to_string());
    response::rejected(vision_page(&page))
}

fn log_outcome(endpoint: Endpoint, outcome: &RenderOutcome) {
    match outcome {
        RenderOutcome::Rendered => info!(endpoint = endpoint.path(), "Rendered backend reply"),
        RenderOutcome::ConnectionError(description) => {
            warn!(endpoint = endpoint.path(), error = %description, "Rendered connection error")
        }
        RenderOutcome::Superseded => info!(endpoint = endpoint.path(), "Reply superseded by a newer request"),
    }
}
