//! Result renderer: turns decoded backend replies into what the pages show.

pub mod chart;
pub mod page;
pub mod scrape;

use crate::backend::response::Classification;
use crate::view::ClassificationPanel;

pub use chart::{render_prediction, ChartSlot, PredictionRender};
pub use scrape::render_outcome;

/// Writes a classification reply into the two result fields.
///
/// Returns the backend's message when it reported an error instead; the
/// fields are then cleared.
pub fn render_classification(result: &Classification, panel: &mut ClassificationPanel) -> Option<String> {
    match result {
        Classification::Labeled { label, confidence } => {
            panel.prediction_text = label.clone();
            panel.confidence_text = confidence.clone();
            None
        }
        Classification::Failed(message) => {
            panel.prediction_text.clear();
            panel.confidence_text.clear();
            Some(message.clone())
        }
    }
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_fields_read_verbatim() {
        let mut panel = ClassificationPanel::default();
        let result = Classification::Labeled {
            label: "cat".into(),
            confidence: "0.93".into(),
        };
        assert_eq!(render_classification(&result, &mut panel), None);
        assert_eq!(panel.prediction_text, "cat");
        assert_eq!(panel.confidence_text, "0.93");
    }

    #[test]
    fn classification_error_clears_fields() {
        let mut panel = ClassificationPanel {
            prediction_text: "Analyzing...".into(),
            ..Default::default()
        };
        let message = render_classification(&Classification::Failed("No file".into()), &mut panel);
        assert_eq!(message.as_deref(), Some("No file"));
        assert!(panel.prediction_text.is_empty());
    }

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }
}
