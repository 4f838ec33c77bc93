//! Upload with retry and album placement.

use crate::error::{ErrorKind, Result};
use crate::retry::RetryPolicy;
use crate::scan::LocalPhoto;
use albumsync_remote::PhotoRepository;
use exn::ResultExt;

/// Where an uploaded photo goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Create an album with this title, seeded with the photo.
    NewAlbum(String),
    /// Append to the album with this identifier.
    Existing(String),
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub album_id: String,
    pub photo_id: String,
    pub created_album: bool,
}

/// Upload `photo` and place it in `destination`.
///
/// Upload and placement form a single attempt; if either fails, the whole
/// attempt is repeated, up to `policy.attempts` more times. A retry after a
/// successful upload but failed placement uploads the file again.
pub async fn upload(
    repository: &dyn PhotoRepository,
    policy: &RetryPolicy,
    photo: &LocalPhoto,
    destination: Destination,
) -> Result<Transfer> {
    let mut attempt = 0;
    loop {
        match attempt_once(repository, photo, &destination).await {
            Ok(transfer) => return Ok(transfer),
            Err(err) if attempt < policy.attempts => {
                attempt += 1;
                tracing::warn!(
                    photo.name = %photo.title,
                    album.name = %photo.album,
                    attempt,
                    interval = ?policy.interval,
                    retryable = err.is_retryable(),
                    error = ?err,
                    "[WARNING] Upload attempt failed. Waiting before retry"
                );
                policy.pause().await;
            },
            Err(err) => {
                return Err(err).or_raise(|| ErrorKind::Transfer(photo.path.clone(), attempt + 1));
            },
        }
    }
}

async fn attempt_once(
    repository: &dyn PhotoRepository,
    photo: &LocalPhoto,
    destination: &Destination,
) -> albumsync_remote::error::Result<Transfer> {
    let photo_id = repository.upload_file(&photo.path).await?;
    match destination {
        Destination::NewAlbum(title) => {
            let album_id = repository.create_album(title, &photo_id).await?;
            tracing::info!(album.name = %title, album.id = %album_id, "[OK] Album created");
            Ok(Transfer { album_id, photo_id, created_album: true })
        },
        Destination::Existing(album_id) => {
            repository.append_photo(album_id, &photo_id).await?;
            Ok(Transfer {
                album_id: album_id.clone(),
                photo_id,
                created_album: false,
            })
        },
    }
}
