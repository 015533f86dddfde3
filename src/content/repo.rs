use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;
use uuid::Uuid;

use crate::store::{StoreClient, StoreError, storage};

use super::{Exhibit, Workshop};

/// A persisted record kind the generic repository knows how to manage.
pub trait Record: DeserializeOwned + Send {
    const TABLE: &'static str;
    /// Default listing order as `(column, ascending)`.
    const DEFAULT_ORDER: (&'static str, bool);

    fn id(&self) -> Uuid;
    fn image_url(&self) -> Option<&str>;
}

impl Record for Exhibit {
    const TABLE: &'static str = "exhibits";
    const DEFAULT_ORDER: (&'static str, bool) = ("created_at", false);

    fn id(&self) -> Uuid {
        self.id
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

impl Record for Workshop {
    const TABLE: &'static str = "workshops";
    const DEFAULT_ORDER: (&'static str, bool) = ("order", true);

    fn id(&self) -> Uuid {
        self.id
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Store-backed CRUD shared by both record kinds. Each call is one round
/// trip; there is no transaction spanning the image and row operations.
pub struct Repository<'a, T> {
    store: &'a StoreClient,
    bucket: &'a str,
    _kind: PhantomData<T>,
}

impl<'a, T: Record> Repository<'a, T> {
    pub fn new(store: &'a StoreClient, bucket: &'a str) -> Self {
        Self {
            store,
            bucket,
            _kind: PhantomData,
        }
    }

    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        let (column, ascending) = T::DEFAULT_ORDER;
        self.store
            .rows(T::TABLE)
            .order(column, ascending)
            .fetch_all()
            .await
    }

    pub async fn list_published(&self) -> Result<Vec<T>, StoreError> {
        let (column, ascending) = T::DEFAULT_ORDER;
        self.store
            .rows(T::TABLE)
            .eq("published", "true")
            .order(column, ascending)
            .fetch_all()
            .await
    }

    pub async fn fetch(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        self.store
            .rows(T::TABLE)
            .eq("id", &id.to_string())
            .fetch_optional()
            .await
    }

    pub async fn insert<P>(&self, payload: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
    {
        self.store.insert_row(T::TABLE, payload).await
    }

    pub async fn update<P>(&self, id: Uuid, patch: &P) -> Result<T, StoreError>
    where
        P: Serialize + ?Sized,
    {
        self.store.update_row(T::TABLE, id, patch).await
    }

    /// Delete a record, cleaning up its stored image first. Image cleanup is
    /// best-effort: failures are logged and never block the record delete.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        match self.fetch(id).await {
            Ok(Some(record)) => {
                if let Some(path) = record
                    .image_url()
                    .and_then(|url| storage::object_path(url, self.bucket))
                {
                    if let Err(err) = self.store.delete_object(self.bucket, path).await {
                        warn!(?err, %id, "failed to delete stored image, removing record anyway");
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(?err, %id, "failed to look up record before delete, skipping image cleanup");
            }
        }

        self.store.delete_row(T::TABLE, id).await
    }

    /// Best-effort removal of an image object that a new upload superseded.
    /// The record already points at the new image when this runs.
    pub async fn discard_replaced_image(&self, previous_url: Option<&str>) {
        if let Some(path) = previous_url.and_then(|url| storage::object_path(url, self.bucket)) {
            if let Err(err) = self.store.delete_object(self.bucket, path).await {
                warn!(?err, path, "failed to delete replaced image object");
            }
        }
    }
}
