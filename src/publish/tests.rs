//! Tests for publish module

use super::*;
use crate::error::Error;
use async_trait::async_trait;
use futures::stream::BoxStream;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::{
    GetOptions, GetResult, ListResult, MultipartUpload, ObjectMeta, ObjectStore,
    PutMultipartOpts, PutOptions, PutPayload, PutResult, UploadPart,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

const MIB: usize = 1024 * 1024;

fn write_file(dir: &Path, name: &str, size: usize) -> std::path::PathBuf {
    let path = dir.join(name);
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, data).unwrap();
    path
}

async fn stored_bytes(destination: &ObjectDestination, key: &str) -> Vec<u8> {
    destination
        .store()
        .get(&ObjectPath::from(key))
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap()
        .to_vec()
}

/// In-memory store that records the write requests it receives
#[derive(Debug, Default)]
struct RecordingStore {
    inner: InMemory,
    puts: Arc<Mutex<Vec<usize>>>,
    parts: Arc<Mutex<Vec<usize>>>,
    completed: Arc<Mutex<usize>>,
}

impl RecordingStore {
    fn puts(&self) -> Vec<usize> {
        self.puts.lock().unwrap().clone()
    }

    fn parts(&self) -> Vec<usize> {
        self.parts.lock().unwrap().clone()
    }

    fn completed(&self) -> usize {
        *self.completed.lock().unwrap()
    }
}

impl std::fmt::Display for RecordingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RecordingStore")
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_opts(
        &self,
        location: &ObjectPath,
        payload: PutPayload,
        opts: PutOptions,
    ) -> object_store::Result<PutResult> {
        self.puts.lock().unwrap().push(payload.content_length());
        self.inner.put_opts(location, payload, opts).await
    }

    async fn put_multipart_opts(
        &self,
        location: &ObjectPath,
        opts: PutMultipartOpts,
    ) -> object_store::Result<Box<dyn MultipartUpload>> {
        let upload = self.inner.put_multipart_opts(location, opts).await?;
        Ok(Box::new(RecordingUpload {
            inner: upload,
            parts: Arc::clone(&self.parts),
            completed: Arc::clone(&self.completed),
        }))
    }

    async fn get_opts(
        &self,
        location: &ObjectPath,
        options: GetOptions,
    ) -> object_store::Result<GetResult> {
        self.inner.get_opts(location, options).await
    }

    async fn delete(&self, location: &ObjectPath) -> object_store::Result<()> {
        self.inner.delete(location).await
    }

    fn list(&self, prefix: Option<&ObjectPath>) -> BoxStream<'_, object_store::Result<ObjectMeta>> {
        self.inner.list(prefix)
    }

    async fn list_with_delimiter(
        &self,
        prefix: Option<&ObjectPath>,
    ) -> object_store::Result<ListResult> {
        self.inner.list_with_delimiter(prefix).await
    }

    async fn copy(&self, from: &ObjectPath, to: &ObjectPath) -> object_store::Result<()> {
        self.inner.copy(from, to).await
    }

    async fn copy_if_not_exists(
        &self,
        from: &ObjectPath,
        to: &ObjectPath,
    ) -> object_store::Result<()> {
        self.inner.copy_if_not_exists(from, to).await
    }
}

#[derive(Debug)]
struct RecordingUpload {
    inner: Box<dyn MultipartUpload>,
    parts: Arc<Mutex<Vec<usize>>>,
    completed: Arc<Mutex<usize>>,
}

#[async_trait]
impl MultipartUpload for RecordingUpload {
    fn put_part(&mut self, data: PutPayload) -> UploadPart {
        self.parts.lock().unwrap().push(data.content_length());
        self.inner.put_part(data)
    }

    async fn complete(&mut self) -> object_store::Result<PutResult> {
        *self.completed.lock().unwrap() += 1;
        self.inner.complete().await
    }

    async fn abort(&mut self) -> object_store::Result<()> {
        self.inner.abort().await
    }
}

fn recording_destination() -> (ObjectDestination, Arc<RecordingStore>) {
    let store = Arc::new(RecordingStore::default());
    let destination = ObjectDestination::from_store(store.clone(), "memory", "memory");
    (destination, store)
}

#[test]
fn test_default_options_are_five_mib() {
    let options = UploadOptions::default();
    assert_eq!(options.chunk_size, 5 * MIB);
    assert_eq!(options.multipart_threshold, 5 * MIB);
}

#[tokio::test]
async fn test_small_file_single_put() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "All_YT_Data.parquet", 1024);

    let destination = ObjectDestination::in_memory();
    let uploader = Uploader::new(destination.clone());
    let report = uploader
        .upload_file(&file, "YT_Data/All_YT_Data.parquet")
        .await
        .unwrap();

    assert_eq!(
        report,
        UploadReport {
            uri: "memory://memory/YT_Data/All_YT_Data.parquet".to_string(),
            bytes: 1024,
            parts: 1,
        }
    );
    assert_eq!(
        stored_bytes(&destination, "YT_Data/All_YT_Data.parquet").await,
        std::fs::read(&file).unwrap()
    );
}

#[tokio::test]
async fn test_exact_threshold_is_single_put() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "edge.parquet", 5 * MIB);

    let (destination, store) = recording_destination();
    let report = Uploader::new(destination)
        .upload_file(&file, "YT_Data/edge.parquet")
        .await
        .unwrap();
    assert_eq!(report.parts, 1);
    assert_eq!(store.puts(), vec![5 * MIB]);
    assert!(store.parts().is_empty());
}

#[tokio::test]
async fn test_twelve_mib_goes_up_in_three_parts() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "All_YT_Data.parquet", 12 * MIB);

    let (destination, store) = recording_destination();
    let report = Uploader::new(destination.clone())
        .upload_file(&file, "YT_Data/All_YT_Data.parquet")
        .await
        .unwrap();

    assert_eq!(report.parts, 3);
    assert_eq!(report.bytes, (12 * MIB) as u64);
    assert_eq!(store.parts(), vec![5 * MIB, 5 * MIB, 2 * MIB]);
    assert_eq!(store.completed(), 1);
    assert!(store.puts().is_empty());

    let stored = stored_bytes(&destination, "YT_Data/All_YT_Data.parquet").await;
    assert_eq!(stored.len(), 12 * MIB);
    assert!(stored == std::fs::read(&file).unwrap());
}

#[tokio::test]
async fn test_custom_chunk_size() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "small.bin", 10_000);

    let options = UploadOptions {
        chunk_size: 4_000,
        multipart_threshold: 4_000,
    };
    let report = Uploader::with_options(ObjectDestination::in_memory(), options)
        .upload_file(&file, "chunks/small.bin")
        .await
        .unwrap();
    assert_eq!(report.parts, 3);
}

#[tokio::test]
async fn test_existing_object_is_replaced() {
    let dir = tempdir().unwrap();
    let first = write_file(dir.path(), "a.parquet", 10);
    let second = write_file(dir.path(), "b.parquet", 20);

    let destination = ObjectDestination::in_memory();
    let uploader = Uploader::new(destination.clone());
    uploader.upload_file(&first, "YT_Data/x.parquet").await.unwrap();
    uploader.upload_file(&second, "YT_Data/x.parquet").await.unwrap();

    assert_eq!(stored_bytes(&destination, "YT_Data/x.parquet").await.len(), 20);
}

#[tokio::test]
async fn test_missing_local_file() {
    let dir = tempdir().unwrap();
    let err = Uploader::new(ObjectDestination::in_memory())
        .upload_file(&dir.path().join("absent.parquet"), "YT_Data/absent.parquet")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn test_local_destination() {
    let dir = tempdir().unwrap();
    let file = write_file(dir.path(), "All_YT_Data.parquet", 64);
    let bucket = dir.path().join("bucket");

    let destination = ObjectDestination::local(&bucket).unwrap();
    assert_eq!(destination.scheme(), "file");

    let report = Uploader::new(destination)
        .upload_file(&file, "YT_Data/All_YT_Data.parquet")
        .await
        .unwrap();
    assert!(report.uri.starts_with("file://"));
    assert!(bucket.join("YT_Data").join("All_YT_Data.parquet").exists());
}

#[test]
fn test_empty_bucket_rejected() {
    let err = ObjectDestination::gcs("", None).unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_destination_uri() {
    let destination = ObjectDestination::in_memory();
    assert_eq!(destination.scheme(), "memory");
    assert_eq!(destination.uri("/a/b"), "memory://memory/a/b");
}
