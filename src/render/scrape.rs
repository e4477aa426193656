//! Markup for scrape, search and batch replies.

use crate::backend::response::{BatchComparison, ScrapeOutcome, ScrapedPage, SearchHit};
use super::escape_html;

/// Display cut-off for a single key point.
pub const KEY_POINT_CHARS: usize = 150;

pub fn render_outcome(outcome: &ScrapeOutcome) -> String {
    match outcome {
        ScrapeOutcome::Failed(message) => error_block(message),
        ScrapeOutcome::Page(page) => page_card(page),
        // A scraped top hit replaces the hit list.
        ScrapeOutcome::Search { top: Some(page), .. } => page_card(page),
        ScrapeOutcome::Search { hits, top: None } => search_list(hits),
        ScrapeOutcome::Batch(batch) => batch_summary(batch),
        ScrapeOutcome::Empty => String::new(),
    }
}

pub fn error_block(message: &str) -> String {
    format!(r#"<div class="error-msg">Error: {}</div>"#, escape_html(message))
}

pub fn connection_error(description: &str) -> String {
    format!(
        r#"<div class="error-msg">Connection Error: {}</div>"#,
        escape_html(description)
    )
}

/// First [`KEY_POINT_CHARS`] characters, always followed by an ellipsis.
pub fn truncate_point(point: &str) -> String {
    let mut out: String = point.chars().take(KEY_POINT_CHARS).collect();
    out.push_str("...");
    out
}

fn search_list(hits: &[SearchHit]) -> String {
    let mut html = String::from("<h3>Search Results</h3>");
    for hit in hits {
        html.push_str(&format!(
            r#"
<div class="result-card">
    <a href="{url}" target="_blank" class="result-title">{title}</a>
    <p class="summary-text">{url}</p>
</div>"#,
            url = escape_html(&hit.url),
            title = escape_html(&hit.title),
        ));
    }
    html
}

fn page_card(item: &ScrapedPage) -> String {
    let summary = item.summary.as_ref();
    let words = summary.map_or(0, |s| s.words());
    let read_time = summary.map_or(1, |s| s.read_time_min());

    let mut html = format!(
        r#"
<div class="result-card">
    <a href="{url}" target="_blank" class="result-title">{title}</a>
    <div class="meta-tags">
        <span>{words} words</span>
        <span>~{read_time} min read</span>
    </div>"#,
        url = escape_html(&item.page.url),
        title = escape_html(&item.page.title),
    );

    if let Some(summary) = summary {
        html.push_str(&format!(
            r#"
    <div class="summary-box">
        <p class="summary-text">{}</p>
    </div>
    <div class="key-points">
        <h4>Key Takeaways</h4>
        <ul>"#,
            escape_html(&summary.summary_text)
        ));
        for point in &summary.key_points {
            html.push_str(&format!("<li>{}</li>", escape_html(&truncate_point(point))));
        }
        html.push_str("</ul>\n    </div>");
    }

    html.push_str("\n</div>");
    html
}

fn batch_summary(batch: &BatchComparison) -> String {
    let mut html = format!(
        r#"<div class="result-card batch-header"><h3>Batch Summary</h3><p>Processed {} pages.</p></div>"#,
        batch.total_processed
    );
    // Failed per-URL results are not shown.
    for item in batch.succeeded() {
        html.push_str(&format!(
            r#"
<div class="result-card">
    <a href="{url}" class="result-title" target="_blank">{title}</a>"#,
            url = escape_html(&item.page.url),
            title = escape_html(&item.page.title),
        ));
        if let Some(summary) = &item.summary {
            html.push_str(&format!(
                r#"
    <p class="summary-text">{}</p>"#,
                escape_html(&summary.summary_text)
            ));
        }
        html.push_str("\n</div>");
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::response::{BatchItem, PageRef, Summary, SummaryStats};
    use pretty_assertions::assert_eq;
    use scraper::{Html, Selector};

    fn select_text(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }

    fn page(url: &str, title: &str, summary: Option<Summary>) -> ScrapedPage {
        ScrapedPage {
            page: PageRef {
                url: url.into(),
                title: title.into(),
            },
            summary,
        }
    }

    fn summary(text: &str, points: &[&str]) -> Summary {
        Summary {
            stats: Some(SummaryStats {
                words: Some(1200),
                read_time_min: Some(6),
            }),
            summary_text: text.into(),
            key_points: points.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn failure_renders_only_the_error_block() {
        let html = render_outcome(&ScrapeOutcome::Failed("URL required".into()));
        assert_eq!(html, r#"<div class="error-msg">Error: URL required</div>"#);
        assert!(select_text(&html, ".result-card").is_empty());
    }

    #[test]
    fn search_hits_render_in_order_without_summary() {
        let html = render_outcome(&ScrapeOutcome::Search {
            hits: vec![
                SearchHit { url: "https://a".into(), title: "A".into() },
                SearchHit { url: "https://b".into(), title: "B".into() },
            ],
            top: None,
        });
        assert_eq!(select_text(&html, ".result-card .result-title"), vec!["A", "B"]);
        assert_eq!(select_text(&html, ".result-card .summary-text"), vec!["https://a", "https://b"]);
        assert!(select_text(&html, ".summary-box").is_empty());
    }

    #[test]
    fn scraped_top_hit_suppresses_the_list() {
        let html = render_outcome(&ScrapeOutcome::Search {
            hits: vec![SearchHit { url: "https://a".into(), title: "A".into() }],
            top: Some(page("https://a", "Page A", None)),
        });
        assert_eq!(select_text(&html, ".result-title"), vec!["Page A"]);
        assert!(!html.contains("Search Results"));
    }

    #[test]
    fn page_card_shows_stats_summary_and_points() {
        let long_point = "x".repeat(200);
        let html = render_outcome(&ScrapeOutcome::Page(page(
            "https://example.com",
            "Example",
            Some(summary("An example page.", &["short", long_point.as_str()])),
        )));
        assert_eq!(select_text(&html, ".meta-tags span"), vec!["1200 words", "~6 min read"]);
        assert_eq!(select_text(&html, ".summary-box .summary-text"), vec!["An example page."]);
        let points = select_text(&html, ".key-points li");
        assert_eq!(points[0], "short...");
        assert_eq!(points[1], format!("{}...", "x".repeat(150)));
    }

    #[test]
    fn page_card_without_summary_uses_display_defaults() {
        let html = render_outcome(&ScrapeOutcome::Page(page("https://example.com", "Example", None)));
        assert_eq!(select_text(&html, ".meta-tags span"), vec!["0 words", "~1 min read"]);
        assert!(select_text(&html, ".key-points").is_empty());
    }

    #[test]
    fn batch_renders_header_and_only_successful_cards() {
        let batch = BatchComparison {
            total_processed: 3,
            items: vec![
                BatchItem::Succeeded(page("https://a", "A", Some(summary("about a", &[])))),
                BatchItem::Failed { error: "404".into() },
                BatchItem::Succeeded(page("https://c", "C", Some(summary("about c", &[])))),
            ],
        };
        let html = render_outcome(&ScrapeOutcome::Batch(batch));
        assert_eq!(select_text(&html, ".batch-header p"), vec!["Processed 3 pages."]);
        assert_eq!(select_text(&html, ".result-card .result-title"), vec!["A", "C"]);
        assert_eq!(select_text(&html, ".result-card").len(), 3);
    }

    #[test]
    fn server_strings_are_escaped() {
        let html = render_outcome(&ScrapeOutcome::Failed("<script>alert(1)</script>".into()));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let point = "é".repeat(151);
        assert_eq!(truncate_point(&point).chars().count(), 153);
    }
}
