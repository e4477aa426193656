//! Line chart for the stock prediction view.
//!
//! A chart is a live resource in the browser. [`ChartSlot`] owns the only
//! instance and replaces it by destroying the old one before creating the
//! next, so at most one chart is alive at any time.

use serde_json::{json, Value};
use tracing::debug;
use crate::backend::response::{PriceSeries, StockPrediction};

pub const CHART_TITLE: &str = "Linear Regression vs LSTM Accuracy";

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<Option<f64>>,
    pub border_color: &'static str,
    pub border_dash: Option<[u8; 2]>,
    pub tension: Option<f64>,
    pub fill: Option<bool>,
}

/// What to draw: shared x-axis labels and the series plotted against them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub title: &'static str,
}

impl ChartSpec {
    pub fn stock_comparison(series: &PriceSeries) -> Self {
        ChartSpec {
            labels: series.dates.clone(),
            datasets: vec![
                Dataset {
                    label: "Actual Price",
                    data: series.actual.clone(),
                    border_color: "#333",
                    border_dash: None,
                    tension: Some(0.1),
                    fill: None,
                },
                Dataset {
                    label: "Linear Regression",
                    data: series.linear_preds.clone(),
                    border_color: "#dc3545",
                    border_dash: Some([5, 5]),
                    tension: None,
                    fill: Some(false),
                },
                Dataset {
                    label: "LSTM Prediction",
                    data: series.lstm_preds.clone(),
                    border_color: "#28a745",
                    border_dash: None,
                    tension: None,
                    fill: Some(false),
                },
            ],
            title: CHART_TITLE,
        }
    }

    /// Chart.js configuration object.
    pub fn config(&self) -> Value {
        let datasets: Vec<Value> = self
            .datasets
            .iter()
            .map(|ds| {
                let mut obj = json!({
                    "label": ds.label,
                    "data": ds.data,
                    "borderColor": ds.border_color,
                    "borderWidth": 2,
                    "pointRadius": 0,
                });
                if let Some(dash) = ds.border_dash {
                    obj["borderDash"] = json!(dash);
                }
                if let Some(tension) = ds.tension {
                    obj["tension"] = json!(tension);
                }
                if let Some(fill) = ds.fill {
                    obj["fill"] = json!(fill);
                }
                obj
            })
            .collect();

        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": datasets,
            },
            "options": {
                "responsive": true,
                "interaction": { "mode": "index", "intersect": false },
                "plugins": {
                    "title": { "display": true, "text": self.title }
                }
            }
        })
    }
}

/// A created chart. Dropping it through [`LineChart::destroy`] is the only
/// way it leaves the slot.
#[derive(Debug, PartialEq)]
pub struct LineChart {
    id: u64,
    spec: ChartSpec,
}

impl LineChart {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    fn destroy(self) {
        debug!(chart = self.id, "Destroying chart instance");
    }
}

#[derive(Debug, Default)]
pub struct ChartSlot {
    current: Option<LineChart>,
    created: u64,
    destroyed: u64,
}

impl ChartSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroys the live chart, if any, then creates one from `spec`.
    pub fn mount(&mut self, spec: ChartSpec) -> &LineChart {
        if let Some(old) = self.current.take() {
            old.destroy();
            self.destroyed += 1;
        }
        self.created += 1;
        debug!(chart = self.created, points = spec.labels.len(), "Creating chart instance");
        self.current.insert(LineChart {
            id: self.created,
            spec,
        })
    }

    pub fn current(&self) -> Option<&LineChart> {
        self.current.as_ref()
    }

    pub fn live_instances(&self) -> u64 {
        self.created - self.destroyed
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }
}

/// Result of rendering a prediction reply into the slot.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionRender {
    Charted { chart: u64 },
    Failed(String),
}

/// Draws a successful prediction; an error reply leaves the slot untouched.
pub fn render_prediction(prediction: &StockPrediction, slot: &mut ChartSlot) -> PredictionRender {
    match prediction {
        StockPrediction::Series(series) => {
            let chart = slot.mount(ChartSpec::stock_comparison(series));
            PredictionRender::Charted { chart: chart.id() }
        }
        StockPrediction::Failed(message) => PredictionRender::Failed(message.clone()),
    }
}

/// `<canvas>` plus the script creating the live chart, or an empty canvas.
pub fn chart_markup(slot: &ChartSlot) -> String {
    match slot.current() {
        Some(chart) => {
            // Keep "</script>" from closing the script element early.
            let config = chart.spec().config().to_string().replace("</", "<\\/");
            format!(
                r#"<canvas id="stockChart" data-chart-instance="{id}"></canvas>
<script>
  window.stockChart = new Chart(document.getElementById('stockChart').getContext('2d'), {config});
</script>"#,
                id = chart.id(),
                config = config,
            )
        }
        None => r#"<canvas id="stockChart"></canvas>"#.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(days: u32) -> PriceSeries {
        PriceSeries {
            dates: (1..=days)
                .map(|d| format!("2024-03-{:02}", d))
                .collect(),
            actual: (1..=days).map(|d| Some(100.0 + d as f64)).collect(),
            linear_preds: (1..=days).map(|d| if d > 1 { Some(100.5 + d as f64) } else { None }).collect(),
            lstm_preds: vec![None; days as usize],
        }
    }

    #[test]
    fn rendering_twice_keeps_one_live_chart() {
        let mut slot = ChartSlot::new();
        let prediction = StockPrediction::Series(series(3));

        assert_eq!(render_prediction(&prediction, &mut slot), PredictionRender::Charted { chart: 1 });
        assert_eq!(slot.live_instances(), 1);

        assert_eq!(render_prediction(&prediction, &mut slot), PredictionRender::Charted { chart: 2 });
        assert_eq!(slot.live_instances(), 1);
        assert_eq!(slot.destroyed(), 1);
        assert_eq!(slot.current().map(LineChart::id), Some(2));
    }

    #[test]
    fn error_reply_keeps_existing_chart() {
        let mut slot = ChartSlot::new();
        render_prediction(&StockPrediction::Series(series(2)), &mut slot);
        let outcome = render_prediction(&StockPrediction::Failed("Invalid Ticker".into()), &mut slot);
        assert_eq!(outcome, PredictionRender::Failed("Invalid Ticker".into()));
        assert_eq!(slot.created(), 1);
        assert_eq!(slot.current().map(LineChart::id), Some(1));
    }

    #[test]
    fn config_plots_three_series_on_shared_axis() {
        let config = ChartSpec::stock_comparison(&series(2)).config();
        assert_eq!(config["type"], "line");
        assert_eq!(config["data"]["labels"], json!(["2024-03-01", "2024-03-02"]));
        let datasets = config["data"]["datasets"].as_array().unwrap();
        let labels: Vec<_> = datasets.iter().map(|d| d["label"].as_str().unwrap()).collect();
        assert_eq!(labels, vec!["Actual Price", "Linear Regression", "LSTM Prediction"]);
        assert_eq!(datasets[1]["borderDash"], json!([5, 5]));
        assert_eq!(datasets[1]["data"][0], Value::Null);
        assert_eq!(config["options"]["plugins"]["title"]["text"], CHART_TITLE);
    }

    #[test]
    fn markup_references_live_instance() {
        let mut slot = ChartSlot::new();
        assert_eq!(chart_markup(&slot), r#"<canvas id="stockChart"></canvas>"#);
        render_prediction(&StockPrediction::Series(series(1)), &mut slot);
        let html = chart_markup(&slot);
        assert!(html.contains(r#"data-chart-instance="1""#));
        assert!(html.contains("new Chart("));
    }
}
