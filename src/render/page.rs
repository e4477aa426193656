//! Full page documents for both dashboards.

use crate::tabs::TabSet;
use crate::view::{ScraperPage, VisionPage};
use super::chart::chart_markup;
use super::escape_html;

const STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 0; background: #F3F4F4; color: #061E29; }
    nav { display: flex; gap: .5rem; padding: 1rem; background: #061E29; }
    nav form { margin: 0; }
    .nav-item, .tab-btn { background: none; border: 1px solid #5F9598; color: #F3F4F4; padding: .5rem 1rem; cursor: pointer; }
    .nav-item.active, .tab-btn.active { background: #1D546D; }
    main { max-width: 60rem; margin: 0 auto; padding: 1rem; }
    .view-section, .content-section { display: none; }
    .view-section.active, .content-section.active { display: block; }
    .hidden { display: none; }
    .alert { background: #fff3cd; border: 1px solid #ffe69c; padding: .75rem; margin-bottom: 1rem; }
    .error-msg { background: #f8d7da; border: 1px solid #f1aeb5; padding: .75rem; }
    .result-card { background: #fff; border-radius: .5rem; padding: 1rem; margin: .75rem 0; }
    .result-title { font-weight: 600; color: #1D546D; }
    .meta-tags span { margin-right: 1rem; font-size: .875rem; color: #5F9598; }
"#;

fn document(title: &str, body: &str, head_extra: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
    {head_extra}
</head>
<body>
{body}
</body>
</html>"#,
        title = escape_html(title),
    )
}

fn nav(tabs: &TabSet, base: &str, class: &str) -> String {
    let mut html = String::from("<nav>");
    for (tab, active) in tabs.iter() {
        html.push_str(&format!(
            r#"<form method="post" action="{base}/tabs/{id}"><button type="submit" class="{class}{active}" data-tab="{id}">{label}</button></form>"#,
            id = tab.id,
            label = tab.label,
            active = if active { " active" } else { "" },
        ));
    }
    html.push_str("</nav>");
    html
}

fn alert(message: Option<&str>) -> String {
    message
        .map(|m| format!(r#"<div class="alert" role="alert">{}</div>"#, escape_html(m)))
        .unwrap_or_default()
}

fn section(class: &str, id: &str, active: bool, inner: &str) -> String {
    format!(
        r#"<section id="{id}" class="{class}{active}">{inner}</section>"#,
        active = if active { " active" } else { "" },
    )
}

pub fn scraper_page(page: &ScraperPage) -> String {
    let tabs = &page.tabs;
    let panels = [
        section(
            "view-section",
            "url-scrape",
            tabs.is_active("url-scrape"),
            r#"<h2>Scrape a URL</h2>
<form method="post" action="/scraper/scrape">
    <input id="url-input" name="url" type="url" placeholder="https://example.com">
    <button type="submit">Scrape</button>
</form>"#,
        ),
        section(
            "view-section",
            "topic-search",
            tabs.is_active("topic-search"),
            r#"<h2>Search a topic</h2>
<form method="post" action="/scraper/search">
    <input id="topic-input" name="topic" type="text" placeholder="Rust programming">
    <button type="submit">Search &amp; Scrape</button>
</form>"#,
        ),
        section(
            "view-section",
            "batch-scrape",
            tabs.is_active("batch-scrape"),
            r#"<h2>Batch scrape</h2>
<form method="post" action="/scraper/batch">
    <textarea id="batch-urls" name="urls" rows="6" placeholder="One URL per line"></textarea>
    <button type="submit">Scrape All</button>
</form>"#,
        ),
    ];

    let body = format!(
        r#"{nav}
<main>
{alert}
{panels}
<div id="loading" class="{loading_class}">Scraping and summarizing...</div>
<div id="results" class="{results_class}">{results}</div>
</main>"#,
        nav = nav(tabs, "/scraper", "nav-item"),
        alert = alert(page.alert.as_deref()),
        panels = panels.join("\n"),
        loading_class = if page.loading { "" } else { "hidden" },
        results_class = if page.results.hidden { "hidden" } else { "" },
        results = page.results.html,
    );

    document("Web Scraper & Summarizer", &body, "")
}

pub fn vision_page(page: &VisionPage) -> String {
    let tabs = &page.tabs;
    let panel = &page.classification;

    let preview = panel
        .preview
        .as_deref()
        .map(|name| format!(r#"<p id="preview">{}</p>"#, escape_html(name)))
        .unwrap_or_default();

    let classification = section(
        "content-section",
        "classification",
        tabs.is_active("classification"),
        &format!(
            r#"<h2>Image Classification</h2>
<form method="post" action="/vision/classify" enctype="multipart/form-data">
    <input id="imageInput" name="file" type="file" accept="image/*">
    <button type="submit">Classify</button>
</form>
<div id="result-container" class="{visible}">
    {preview}
    <h3 id="prediction-text">{prediction}</h3>
    <p id="confidence-text">{confidence}</p>
</div>"#,
            visible = if panel.visible { "" } else { "hidden" },
            prediction = escape_html(&panel.prediction_text),
            confidence = escape_html(&panel.confidence_text),
        ),
    );

    let regression = section(
        "content-section",
        "regression",
        tabs.is_active("regression"),
        &format!(
            r#"<h2>Stock Prediction</h2>
<form method="post" action="/vision/predict" class="input-group">
    <input id="tickerInput" name="ticker" type="text" placeholder="AAPL">
    <button type="submit"{disabled}>{label}</button>
</form>
{chart}"#,
            disabled = if page.predict_button.disabled { " disabled" } else { "" },
            label = escape_html(&page.predict_button.label),
            chart = chart_markup(&page.chart),
        ),
    );

    let body = format!(
        r#"{nav}
<main>
{alert}
{classification}
{regression}
</main>"#,
        nav = nav(tabs, "/vision", "tab-btn"),
        alert = alert(page.alert.as_deref()),
    );

    document(
        "Classification & Regression",
        &body,
        r#"<script src="https://cdn.jsdelivr.net/npm/chart.js"></script>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn count(html: &str, selector: &str) -> usize {
        let doc = Html::parse_document(html);
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector).count()
    }

    #[test]
    fn one_panel_and_one_nav_item_active() {
        let mut page = ScraperPage::default();
        page.activate_tab("batch-scrape").unwrap();
        let html = scraper_page(&page);
        assert_eq!(count(&html, ".view-section.active"), 1);
        assert_eq!(count(&html, "#batch-scrape.active"), 1);
        assert_eq!(count(&html, ".nav-item.active"), 1);
        assert_eq!(count(&html, r#".nav-item.active[data-tab="batch-scrape"]"#), 1);
        assert_eq!(count(&html, "#results.hidden"), 1);
        assert_eq!(count(&html, "#loading.hidden"), 1);
    }

    #[test]
    fn loading_indicator_shows_while_in_flight() {
        let mut page = ScraperPage::default();
        page.begin_request();
        let html = scraper_page(&page);
        assert_eq!(count(&html, "#loading.hidden"), 0);
        assert_eq!(count(&html, "#results.hidden"), 1);
    }

    #[test]
    fn vision_page_shows_disabled_button_while_training() {
        let mut page = VisionPage::default();
        page.tabs.activate("regression").unwrap();
        page.begin_prediction();
        let html = vision_page(&page);
        assert_eq!(count(&html, ".content-section.active"), 1);
        assert_eq!(count(&html, ".tab-btn.active"), 1);
        assert_eq!(count(&html, ".input-group button[disabled]"), 1);
        assert!(html.contains("Training Models..."));
    }

    #[test]
    fn alert_is_escaped() {
        let mut page = VisionPage::default();
        page.alert = Some("<b>Invalid Ticker</b>".into());
        let html = vision_page(&page);
        assert!(html.contains("&lt;b&gt;Invalid Ticker&lt;/b&gt;"));
    }
}
