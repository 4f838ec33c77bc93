//! Remote inventory reader.
//!
//! Builds a [`Snapshot`] of every remote album and its photos. Pages are
//! requested one at a time; an empty page is ambiguous (end of album, or a
//! throttled answer), so it is asked for again a few times before the album
//! is considered complete.

use crate::error::{ErrorKind, Result};
use crate::retry::RetryPolicy;
use crate::snapshot::{Album, Photo, Snapshot};
use albumsync_remote::{PhotoRepository, RemotePhoto};
use exn::ResultExt;

/// Fetch one page of an album, asking again while the answer is empty.
///
/// Returns an empty list once `policy.attempts` retries have also come back
/// empty. Repository errors are returned straight away.
pub async fn fetch_page(
    repository: &dyn PhotoRepository,
    album_id: &str,
    page: u32,
    policy: &RetryPolicy,
) -> albumsync_remote::error::Result<Vec<RemotePhoto>> {
    let mut photos = repository.list_album_photos(album_id, page).await?;
    let mut attempt = 0;
    while photos.is_empty() && attempt < policy.attempts {
        attempt += 1;
        tracing::debug!(
            album.id = album_id,
            page,
            attempt,
            interval = ?policy.interval,
            "No photos retrieved, waiting before asking again"
        );
        policy.pause().await;
        photos = repository.list_album_photos(album_id, page).await?;
    }
    Ok(photos)
}

/// Read every album and all of its photos.
///
/// Failing to list the albums is fatal. An error while paging through one
/// album ends that album early; the photos already gathered are kept.
pub async fn fetch(repository: &dyn PhotoRepository, policy: &RetryPolicy) -> Result<Snapshot> {
    tracing::info!(repository = repository.name(), "Retrieving albums");
    let albums = repository.list_albums().await.or_raise(|| ErrorKind::Inventory)?;

    let mut snapshot = Snapshot::new();
    for album in albums {
        let mut photos: Vec<Photo> = Vec::new();
        let mut page = 1;
        loop {
            let content = match fetch_page(repository, &album.id, page, policy).await {
                Ok(content) => content,
                Err(err) => {
                    tracing::error!(album.name = %album.title, album.id = %album.id, page, error = ?err, "Could not retrieve album page");
                    break;
                },
            };
            if content.is_empty() {
                break;
            }
            photos.extend(content.into_iter().map(Photo::from));
            tracing::debug!(album.name = %album.title, page, total = photos.len(), "Album expanded");
            page += 1;
        }
        let album_photos = Album::new(album.id, photos);
        tracing::info!(album.name = %album.title, total = album_photos.len(), "[OK] Album loaded");
        snapshot.insert(album.title, album_photos);
    }
    tracing::info!(albums = snapshot.len(), photos = snapshot.photo_count(), "[OK] Albums have been loaded");
    Ok(snapshot)
}
