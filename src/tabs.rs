//! Tab controller: mutually exclusive content panels with a matching
//! navigation highlight.

use tracing::debug;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub id: &'static str,
    pub label: &'static str,
}

pub const SCRAPER_TABS: &[Tab] = &[
    Tab { id: "url-scrape", label: "URL Scrape" },
    Tab { id: "topic-search", label: "Topic Search" },
    Tab { id: "batch-scrape", label: "Batch Scrape" },
];

pub const VISION_TABS: &[Tab] = &[
    Tab { id: "classification", label: "Image Classification" },
    Tab { id: "regression", label: "Stock Prediction" },
];

/// Which panel is visible. Panel `i` and nav item `i` always share the
/// active flag, so exactly one of each is highlighted.
#[derive(Debug, Clone)]
pub struct TabSet {
    tabs: &'static [Tab],
    active: usize,
}

impl TabSet {
    /// Only built from the non-empty dashboard tables, so `active` always
    /// indexes a real tab.
    fn new(tabs: &'static [Tab]) -> Self {
        Self { tabs, active: 0 }
    }

    pub fn scraper() -> Self {
        Self::new(SCRAPER_TABS)
    }

    pub fn vision() -> Self {
        Self::new(VISION_TABS)
    }

    /// Position of a tab in the fixed nav order.
    pub fn index_of(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == tab_id)
    }

    pub fn activate(&mut self, tab_id: &str) -> Result<()> {
        let index = self
            .index_of(tab_id)
            .ok_or_else(|| AppError::validation(format!("Unknown tab: {}", tab_id)))?;
        debug!(tab = tab_id, index, "Activating tab");
        self.active = index;
        Ok(())
    }

    pub fn active(&self) -> Tab {
        self.tabs[self.active]
    }

    pub fn is_active(&self, tab_id: &str) -> bool {
        self.active().id == tab_id
    }

    /// Every tab with its active flag, in nav order.
    pub fn iter(&self) -> impl Iterator<Item = (Tab, bool)> + '_ {
        self.tabs
            .iter()
            .enumerate()
            .map(move |(i, tab)| (*tab, i == self.active))
    }
}
