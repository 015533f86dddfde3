use crate::{
    config::AppConfig,
    content::{Exhibit, Workshop, repo::Repository},
    store::StoreClient,
};

/// Application-scoped state handed to every handler. The store client lives
/// here for the lifetime of the process; request handlers borrow repositories
/// from it instead of holding their own connections.
#[derive(Clone)]
pub struct AppState {
    store: StoreClient,
    bucket: String,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            store: StoreClient::new(config.store),
            bucket: config.storage_bucket,
        }
    }

    pub fn store(&self) -> &StoreClient {
        &self.store
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn exhibits(&self) -> Repository<'_, Exhibit> {
        Repository::new(&self.store, &self.bucket)
    }

    pub fn workshops(&self) -> Repository<'_, Workshop> {
        Repository::new(&self.store, &self.bucket)
    }
}
