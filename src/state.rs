use crate::db::ItemStore;
use crate::routes::urls::UrlTable;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ItemStore>,
    pub urls: Arc<UrlTable>,
}

impl AppState {
    pub fn new(store: Arc<dyn ItemStore>, urls: UrlTable) -> Self {
        Self {
            store,
            urls: Arc::new(urls),
        }
    }
}
