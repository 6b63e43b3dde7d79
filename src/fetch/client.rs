//! Dataset hub client

use super::archive::extract_archive;
use super::dataset::DatasetRef;
use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Files produced by a fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutput {
    /// Directory the archive was unpacked into
    pub dir: PathBuf,
    /// Unpacked files, in archive order
    pub files: Vec<PathBuf>,
}

/// Client for the Kaggle dataset download API
#[derive(Debug)]
pub struct KaggleClient {
    http: HttpClient,
}

impl KaggleClient {
    /// Create a client authenticating with `username:key`
    pub fn new(
        api_base: impl Into<String>,
        username: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let config = HttpClientConfig::builder().base_url(api_base).build();
        let auth = AuthConfig::Basic {
            username: username.into(),
            password: key.into(),
        };
        Ok(Self {
            http: HttpClient::with_auth(config, auth)?,
        })
    }

    /// Stream the dataset archive to `<dest>/<name>.zip`
    pub async fn download(&self, dataset: &DatasetRef, dest: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dest).await?;
        let archive = dest.join(dataset.archive_name());

        info!(dataset = %dataset, path = %archive.display(), "Downloading dataset");
        let mut response = self.http.get(&dataset.download_path()).await?;

        let mut file = tokio::fs::File::create(&archive).await?;
        let mut bytes = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes, "Download complete");
        Ok(archive)
    }

    /// Download, unpack in place and delete the archive
    pub async fn fetch(&self, dataset: &DatasetRef, dest: &Path) -> Result<FetchOutput> {
        let archive = self.download(dataset, dest).await?;

        let dir = dest.to_path_buf();
        let zip_path = archive.clone();
        let files = tokio::task::spawn_blocking(move || extract_archive(&zip_path, &dir))
            .await
            .map_err(|e| Error::archive(format!("Extraction task failed: {e}")))??;

        tokio::fs::remove_file(&archive).await?;
        info!(files = files.len(), dir = %dest.display(), "Dataset unpacked");

        Ok(FetchOutput {
            dir: dest.to_path_buf(),
            files,
        })
    }
}
