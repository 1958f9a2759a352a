//! Business logic services

pub mod catalog;
pub mod relations;

use std::sync::Arc;

use crate::store::RecordStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub relations: relations::RelationsService,
}

impl Services {
    /// Create all services on top of the given record store
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store.clone()),
            relations: relations::RelationsService::new(store),
        }
    }
}
