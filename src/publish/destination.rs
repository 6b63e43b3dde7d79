//! Object storage destinations

use crate::error::{Error, Result};
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::path::Path;
use std::sync::Arc;

/// A bucket-like store plus the URI scheme used to report object locations
#[derive(Debug, Clone)]
pub struct ObjectDestination {
    store: Arc<dyn ObjectStore>,
    scheme: &'static str,
    bucket: String,
}

impl ObjectDestination {
    /// Google Cloud Storage bucket
    ///
    /// Credentials come from `credentials` when given, otherwise from the
    /// ambient `GOOGLE_*` environment read by the builder.
    pub fn gcs(bucket: &str, credentials: Option<&Path>) -> Result<Self> {
        if bucket.trim().is_empty() {
            return Err(Error::config("GCS bucket name is empty"));
        }

        let mut builder = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket);
        if let Some(path) = credentials {
            builder = builder.with_service_account_path(path.to_string_lossy());
        }
        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            scheme: "gs",
            bucket: bucket.to_string(),
        })
    }

    /// Local directory standing in for a bucket
    pub fn local(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::config(format!("Failed to create directory {}: {e}", dir.display()))
        })?;
        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            scheme: "file",
            bucket: dir.display().to_string(),
        })
    }

    /// In-process store
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()), "memory", "memory")
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<dyn ObjectStore>, scheme: &'static str, bucket: impl Into<String>) -> Self {
        Self {
            store,
            scheme,
            bucket: bucket.into(),
        }
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// URI scheme (`gs`, `file`, `memory`)
    pub fn scheme(&self) -> &str {
        self.scheme
    }

    /// Full URI of an object key
    pub fn uri(&self, key: &str) -> String {
        format!(
            "{}://{}/{}",
            self.scheme,
            self.bucket.trim_end_matches('/'),
            key.trim_start_matches('/')
        )
    }
}
