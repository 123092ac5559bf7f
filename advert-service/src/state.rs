//! Shared application state handed to every handler

use std::sync::Arc;

use crate::{catalog::AdvertCatalog, config::Config};

/// Cheap-to-clone handles shared by all requests
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    catalog: Arc<dyn AdvertCatalog>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<dyn AdvertCatalog>) -> Self {
        Self {
            config: Arc::new(config),
            catalog,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &dyn AdvertCatalog {
        self.catalog.as_ref()
    }
}
