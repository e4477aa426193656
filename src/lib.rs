pub mod api;
pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod tabs;
pub mod view;

use std::sync::{Arc, Mutex};
use backend::BackendClient;
use config::Config;
use dispatch::Dispatcher;
use view::{ScraperPage, VisionPage};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
    pub scraper: Arc<Mutex<ScraperPage>>,
    pub vision: Arc<Mutex<VisionPage>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let dispatcher = Dispatcher::new(BackendClient::from_config(&config));
        Self {
            config: Arc::new(config),
            dispatcher,
            scraper: Arc::new(Mutex::new(ScraperPage::default())),
            vision: Arc::new(Mutex::new(VisionPage::default())),
        }
    }
}
