pub mod api;

use std::sync::Arc;

use crate::scrapers::JobScraper;
use crate::store::JobStore;

/// Shared handler state: the job store and the scraper it feeds from.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn JobStore>,
    pub scraper: Arc<dyn JobScraper>,
}
