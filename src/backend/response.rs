//! Backend response shapes.
//!
//! The backends answer with loosely-typed JSON whose fields come and go
//! depending on the endpoint and on success. Each endpoint family is decoded
//! here, once, into a closed enum; the renderer only ever matches on those.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use crate::error::{AppError, Result};

/// Decoding of a parsed JSON body into an endpoint family's result type.
pub trait Decode: Sized {
    fn decode(value: Value) -> Result<Self>;
}

const UNKNOWN_ERROR: &str = "Unknown error";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Labeled { label: String, confidence: String },
    Failed(String),
}

#[derive(Deserialize)]
struct ClassificationWire {
    label: Option<String>,
    confidence: Option<Value>,
    error: Option<String>,
}

impl Decode for Classification {
    fn decode(value: Value) -> Result<Self> {
        let wire: ClassificationWire = serde_json::from_value(value)?;
        if let Some(error) = wire.error {
            return Ok(Classification::Failed(error));
        }
        let label = wire
            .label
            .ok_or_else(|| AppError::Decode("missing field `label`".to_string()))?;
        // Shown verbatim; the backend already formats it.
        let confidence = match wire.confidence {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Ok(Classification::Labeled { label, confidence })
    }
}

// ---------------------------------------------------------------------------
// Stock prediction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StockPrediction {
    Series(PriceSeries),
    Failed(String),
}

/// Three price series sharing one date axis. Predictions are padded with
/// `None` where a model produced no value for that date. Dates are kept as
/// the backend formatted them; they only ever label the axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub dates: Vec<String>,
    pub actual: Vec<Option<f64>>,
    pub linear_preds: Vec<Option<f64>>,
    pub lstm_preds: Vec<Option<f64>>,
}

#[derive(Deserialize)]
struct StockWire {
    dates: Option<Vec<String>>,
    actual: Option<Vec<Option<f64>>>,
    linear_preds: Option<Vec<Option<f64>>>,
    lstm_preds: Option<Vec<Option<f64>>>,
    error: Option<String>,
}

impl Decode for StockPrediction {
    fn decode(value: Value) -> Result<Self> {
        let wire: StockWire = serde_json::from_value(value)?;
        if let Some(error) = wire.error {
            return Ok(StockPrediction::Failed(error));
        }
        Ok(StockPrediction::Series(PriceSeries {
            dates: wire.dates.ok_or_else(|| missing("dates"))?,
            actual: wire.actual.ok_or_else(|| missing("actual"))?,
            linear_preds: wire.linear_preds.ok_or_else(|| missing("linear_preds"))?,
            lstm_preds: wire.lstm_preds.ok_or_else(|| missing("lstm_preds"))?,
        }))
    }
}

fn missing(field: &str) -> AppError {
    AppError::Decode(format!("missing field `{}`", field))
}

// ---------------------------------------------------------------------------
// Scrape / search / batch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    Failed(String),
    /// A single scraped page.
    Page(ScrapedPage),
    /// A search hit list, optionally with the first hit already scraped.
    Search { hits: Vec<SearchHit>, top: Option<ScrapedPage> },
    Batch(BatchComparison),
    /// Successful reply carrying none of the known result parts.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchHit {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageRef {
    pub url: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedPage {
    pub page: PageRef,
    pub summary: Option<Summary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub stats: Option<SummaryStats>,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryStats {
    pub words: Option<u64>,
    pub read_time_min: Option<u64>,
}

impl Summary {
    /// Word count for display, 0 when unknown.
    pub fn words(&self) -> u64 {
        self.stats.as_ref().and_then(|s| s.words).unwrap_or(0)
    }

    /// Read time for display; unknown or zero shows as one minute.
    pub fn read_time_min(&self) -> u64 {
        self.stats
            .as_ref()
            .and_then(|s| s.read_time_min)
            .filter(|&minutes| minutes > 0)
            .unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchComparison {
    pub total_processed: u64,
    pub items: Vec<BatchItem>,
}

impl BatchComparison {
    pub fn succeeded(&self) -> impl Iterator<Item = &ScrapedPage> {
        self.items.iter().filter_map(|item| match item {
            BatchItem::Succeeded(page) => Some(page),
            BatchItem::Failed { .. } => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchItem {
    Succeeded(ScrapedPage),
    Failed { error: String },
}

#[derive(Deserialize)]
struct ScrapeWire {
    #[serde(default)]
    success: bool,
    error: Option<String>,
    results: Option<Vec<Value>>,
    scraped_data: Option<PageRef>,
    data: Option<PageRef>,
    summary: Option<Summary>,
    comparison: Option<ComparisonWire>,
}

#[derive(Deserialize)]
struct ComparisonWire {
    #[serde(default)]
    total_processed: u64,
}

#[derive(Deserialize)]
struct BatchItemWire {
    #[serde(default)]
    success: bool,
    data: Option<PageRef>,
    summary: Option<Summary>,
    error: Option<String>,
}

impl Decode for ScrapeOutcome {
    fn decode(value: Value) -> Result<Self> {
        let wire: ScrapeWire = serde_json::from_value(value)?;
        if !wire.success {
            return Ok(ScrapeOutcome::Failed(
                wire.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ));
        }

        let results = wire.results.unwrap_or_default();

        if let Some(comparison) = wire.comparison {
            let items = results
                .into_iter()
                .map(decode_batch_item)
                .collect::<Result<Vec<_>>>()?;
            return Ok(ScrapeOutcome::Batch(BatchComparison {
                total_processed: comparison.total_processed,
                items,
            }));
        }

        let item = wire.scraped_data.or(wire.data).map(|page| ScrapedPage {
            page,
            summary: wire.summary,
        });

        if results.is_empty() {
            return Ok(match item {
                Some(page) => ScrapeOutcome::Page(page),
                None => ScrapeOutcome::Empty,
            });
        }

        let hits = results
            .into_iter()
            .map(serde_json::from_value::<SearchHit>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ScrapeOutcome::Search { hits, top: item })
    }
}

fn decode_batch_item(value: Value) -> Result<BatchItem> {
    let wire: BatchItemWire = serde_json::from_value(value)?;
    match (wire.success, wire.data) {
        (true, Some(page)) => Ok(BatchItem::Succeeded(ScrapedPage {
            page,
            summary: wire.summary,
        })),
        (true, None) => {
            debug!("Batch item reported success without page data");
            Ok(BatchItem::Failed {
                error: "missing page data".to_string(),
            })
        }
        (false, _) => Ok(BatchItem::Failed {
            error: wire.error.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        }),
    }
}
