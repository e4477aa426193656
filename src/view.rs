//! Per-dashboard view state.
//!
//! This is what the browser's DOM held in the script-driven version: which
//! panel is visible, whether the loading indicator shows, the results
//! region, and the handful of text fields and buttons the actions touch.
//! Pages are rendered from it on every request.

use crate::dispatch::{GenerationCounter, Ticket};
use crate::render::ChartSlot;
use crate::tabs::TabSet;
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsRegion {
    pub html: String,
    pub hidden: bool,
}

impl ResultsRegion {
    pub fn clear(&mut self) {
        self.html.clear();
        self.hidden = true;
    }

    pub fn reveal(&mut self, html: String) {
        self.html = html;
        self.hidden = false;
    }
}

#[derive(Debug)]
pub struct ScraperPage {
    pub tabs: TabSet,
    pub loading: bool,
    pub results: ResultsRegion,
    pub alert: Option<String>,
    requests: GenerationCounter,
}

impl Default for ScraperPage {
    fn default() -> Self {
        Self {
            tabs: TabSet::scraper(),
            loading: false,
            results: ResultsRegion { html: String::new(), hidden: true },
            alert: None,
            requests: GenerationCounter::default(),
        }
    }
}

impl ScraperPage {
    pub fn activate_tab(&mut self, tab_id: &str) -> Result<()> {
        self.tabs.activate(tab_id)?;
        self.results.clear();
        self.alert = None;
        Ok(())
    }

    /// Shows the loading indicator, hides and empties the results region.
    pub fn begin_request(&mut self) -> Ticket {
        self.alert = None;
        self.loading = true;
        self.results.clear();
        self.requests.issue()
    }

    /// Applies a finished request's markup unless a newer request was issued
    /// since. Returns whether the markup was applied.
    pub fn finish_request(&mut self, ticket: Ticket, html: String) -> bool {
        if !self.requests.is_latest(ticket) {
            return false;
        }
        self.loading = false;
        self.results.reveal(html);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub disabled: bool,
}

pub const PREDICT_LABEL: &str = "Predict";
pub const TRAINING_LABEL: &str = "Training Models...";
pub const CONNECTION_ERROR_TEXT: &str = "Error connecting to backend.";

impl Button {
    pub fn enabled(label: &str) -> Self {
        Self {
            label: label.to_string(),
            disabled: false,
        }
    }
}

/// Image preview plus the prediction and confidence fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationPanel {
    pub visible: bool,
    pub preview: Option<String>,
    pub prediction_text: String,
    pub confidence_text: String,
}

#[derive(Debug)]
pub struct VisionPage {
    pub tabs: TabSet,
    pub classification: ClassificationPanel,
    pub predict_button: Button,
    pub chart: ChartSlot,
    pub alert: Option<String>,
    classify_requests: GenerationCounter,
    predict_requests: GenerationCounter,
}

impl Default for VisionPage {
    fn default() -> Self {
        Self {
            tabs: TabSet::vision(),
            classification: ClassificationPanel::default(),
            predict_button: Button::enabled(PREDICT_LABEL),
            chart: ChartSlot::new(),
            alert: None,
            classify_requests: GenerationCounter::default(),
            predict_requests: GenerationCounter::default(),
        }
    }
}

impl VisionPage {
    pub fn activate_tab(&mut self, tab_id: &str) -> Result<()> {
        self.tabs.activate(tab_id)?;
        self.classification = ClassificationPanel::default();
        self.alert = None;
        Ok(())
    }

    pub fn begin_classification(&mut self, file_name: &str) -> Ticket {
        self.alert = None;
        self.classification = ClassificationPanel {
            visible: true,
            preview: Some(file_name.to_string()),
            prediction_text: "Analyzing...".to_string(),
            confidence_text: String::new(),
        };
        self.classify_requests.issue()
    }

    /// Shows the connection error in the prediction field.
    pub fn classification_failed(&mut self, file_name: Option<&str>) {
        self.classification = ClassificationPanel {
            visible: true,
            preview: file_name.map(str::to_string),
            prediction_text: CONNECTION_ERROR_TEXT.to_string(),
            confidence_text: String::new(),
        };
    }

    pub fn is_latest_classification(&self, ticket: Ticket) -> bool {
        self.classify_requests.is_latest(ticket)
    }

    pub fn begin_prediction(&mut self) -> Ticket {
        self.alert = None;
        self.predict_button = Button {
            label: TRAINING_LABEL.to_string(),
            disabled: true,
        };
        self.predict_requests.issue()
    }

    pub fn is_latest_prediction(&self, ticket: Ticket) -> bool {
        self.predict_requests.is_latest(ticket)
    }

    pub fn finish_prediction(&mut self) {
        self.predict_button = Button::enabled(PREDICT_LABEL);
    }
}
