use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UrlForm {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TopicForm {
    #[serde(default)]
    pub topic: String,
}

/// Newline-separated URLs from the batch textarea.
#[derive(Debug, Deserialize)]
pub struct BatchForm {
    #[serde(default)]
    pub urls: String,
}

#[derive(Debug, Deserialize)]
pub struct TickerForm {
    #[serde(default)]
    pub ticker: String,
}
