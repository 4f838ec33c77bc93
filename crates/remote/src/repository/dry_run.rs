//! Dry-run photo repository.
//!
//! This module provides a repository implementation that wraps other
//! implementations and prevents write operations from reaching the remote
//! service, while still indicating success on return.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{PhotoRepository, RemoteAlbum, RemotePhoto, RepositoryHandle, error::Result};

/// Dry-run photo repository.
///
/// Wraps another repository; reads are forwarded, writes are dropped after
/// logging an [`info event`](tracing::Event). Uploads and album creations
/// answer with synthetic identifiers so that the caller's bookkeeping keeps
/// working as if the writes had happened.
pub struct DryRunRepository {
    inner: RepositoryHandle,
    counter: AtomicU64,
}
impl DryRunRepository {
    pub fn new(inner: RepositoryHandle) -> Self {
        Self { inner, counter: AtomicU64::new(0) }
    }

    fn synthetic_id(&self, kind: &str) -> String {
        format!("dry-run-{kind}-{}", self.counter.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl PhotoRepository for DryRunRepository {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>> {
        self.inner.list_albums().await
    }

    async fn list_album_photos(&self, album_id: &str, page: u32) -> Result<Vec<RemotePhoto>> {
        self.inner.list_album_photos(album_id, page).await
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<()> {
        tracing::info!(photo.id = photo_id, "Skipping delete during dry-run mode");
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let id = self.synthetic_id("photo");
        tracing::info!(path = %path.display(), photo.id = %id, "Skipping upload during dry-run mode");
        Ok(id)
    }

    async fn create_album(&self, title: &str, primary_photo_id: &str) -> Result<String> {
        let id = self.synthetic_id("album");
        tracing::info!(album.name = title, album.id = %id, photo.id = primary_photo_id, "Skipping album creation during dry-run mode");
        Ok(id)
    }

    async fn append_photo(&self, album_id: &str, photo_id: &str) -> Result<()> {
        tracing::info!(album.id = album_id, photo.id = photo_id, "Skipping album append during dry-run mode");
        Ok(())
    }
}
