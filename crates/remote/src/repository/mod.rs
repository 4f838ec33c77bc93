//! Photo repository trait and implementations.
//!
//! This module defines the `PhotoRepository` trait, which provides a unified
//! interface over a remote photo-hosting service (Flickr, an in-memory mock,
//! or a dry-run decorator around either).
//!

mod dry_run;
#[cfg(feature = "flickr")]
mod flickr;
#[cfg(feature = "mock")]
mod mock;

pub use self::dry_run::DryRunRepository;
#[cfg(feature = "flickr")]
pub use self::flickr::{Credentials, FlickrRepository};
#[cfg(feature = "mock")]
pub use self::mock::MockRepository;
use crate::error::Result;
use crate::models::{RemoteAlbum, RemotePhoto};
use async_trait::async_trait;
use std::path::Path;

/// Unified interface for remote photo services.
///
/// Every operation is a single remote call; none of them retry on their own.
/// Retry policy belongs to the caller, which knows whether an empty answer or
/// an error is worth another attempt.
///
/// # Examples
///
/// ```
/// use albumsync_remote::{PhotoRepository, error::Result};
///
/// async fn count_photos_on_first_page(repository: &dyn PhotoRepository) -> Result<usize> {
///     let mut total = 0;
///     for album in repository.list_albums().await? {
///         total += repository.list_album_photos(&album.id, 1).await?.len();
///     }
///     Ok(total)
/// }
/// ```
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Name of the repository, used for logging only.
    fn name(&self) -> &str;

    /// List every album owned by the authenticated account, in the order
    /// the service returns them.
    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>>;

    /// List one page of photos inside an album. Pages are numbered from 1.
    ///
    /// # Notes
    /// - An empty page is ambiguous: it can mean "past the last page" or a
    ///   throttled answer. Implementations must not try to tell them apart.
    async fn list_album_photos(&self, album_id: &str, page: u32) -> Result<Vec<RemotePhoto>>;

    /// Delete a photo (from every album it belongs to).
    async fn delete_photo(&self, photo_id: &str) -> Result<()>;

    /// Upload the file at `path` and return the new photo's identifier.
    ///
    /// The photo title is assigned by the service from the file name.
    async fn upload_file(&self, path: &Path) -> Result<String>;

    /// Create an album titled `title` whose primary photo is
    /// `primary_photo_id`, returning the new album's identifier.
    async fn create_album(&self, title: &str, primary_photo_id: &str) -> Result<String>;

    /// Add an already-uploaded photo to an existing album.
    async fn append_photo(&self, album_id: &str, photo_id: &str) -> Result<()>;
}
