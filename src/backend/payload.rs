//! Request payloads sent to the backends.
//!
//! Each payload is built from raw form input through a constructor that
//! performs the presence check, so an empty payload can never be dispatched.

use serde::Serialize;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn from_input(raw: &str) -> Result<Self> {
        let url = required(raw, "Please enter a URL")?;
        Ok(Self { url })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub topic: String,
}

impl SearchRequest {
    pub fn from_input(raw: &str) -> Result<Self> {
        let topic = required(raw, "Please enter a topic")?;
        Ok(Self { topic })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRequest {
    pub urls: Vec<String>,
}

impl BatchRequest {
    /// One URL per line; lines are trimmed and blanks dropped, order kept.
    pub fn from_input(raw: &str) -> Result<Self> {
        let urls: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if urls.is_empty() {
            return Err(AppError::validation("Please enter URLs"));
        }
        Ok(Self { urls })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerRequest {
    pub ticker: String,
}

impl TickerRequest {
    pub fn from_input(raw: &str) -> Result<Self> {
        let ticker = required(raw, "Please enter a ticker!")?;
        Ok(Self { ticker })
    }
}

/// An image file forwarded to the classifier as a multipart `file` field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(AppError::validation("Please select an image first!"));
        }
        Ok(Self {
            file_name: file_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "upload".to_string()),
            content_type,
            bytes,
        })
    }
}

fn required(raw: &str, message: &str) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AppError::validation(message));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn blank_inputs_are_rejected_before_dispatch() {
        assert!(matches!(ScrapeRequest::from_input("   "), Err(AppError::Validation(m)) if m == "Please enter a URL"));
        assert!(matches!(SearchRequest::from_input(""), Err(AppError::Validation(m)) if m == "Please enter a topic"));
        assert!(matches!(TickerRequest::from_input("\t"), Err(AppError::Validation(_))));
        assert!(matches!(BatchRequest::from_input("\n \n"), Err(AppError::Validation(m)) if m == "Please enter URLs"));
    }

    #[test]
    fn inputs_are_trimmed() {
        let req = ScrapeRequest::from_input("  https://example.com \n").unwrap();
        assert_eq!(req.url, "https://example.com");
        let req = TickerRequest::from_input(" AAPL ").unwrap();
        assert_eq!(req.ticker, "AAPL");
    }

    #[test]
    fn batch_lines_keep_order_and_skip_blanks() {
        let req = BatchRequest::from_input("https://a\n\n  https://b  \r\nhttps://c\n").unwrap();
        assert_eq!(req.urls, vec!["https://a", "https://b", "https://c"]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({ "urls": ["https://a", "https://b", "https://c"] })
        );
    }

    #[test]
    fn upload_without_file_is_rejected() {
        let err = ImageUpload::new(None, None, Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Please select an image first!");

        let upload = ImageUpload::new(Some("cat.png".into()), Some("image/png".into()), vec![1, 2, 3]).unwrap();
        assert_eq!(upload.file_name, "cat.png");
    }
}
