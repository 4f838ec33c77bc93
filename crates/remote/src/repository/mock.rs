//! In-memory photo repository for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{RemoteAlbum, RemotePhoto, title_from_path};
use crate::PhotoRepository;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

const DEFAULT_PAGE_SIZE: usize = 500;

struct MockAlbum {
    id: String,
    title: String,
    photos: Vec<RemotePhoto>,
}

#[derive(Default)]
struct State {
    albums: Vec<MockAlbum>,
    /// Every photo known to the service, including ones in no album yet.
    photos: HashMap<String, RemotePhoto>,
    next_id: u64,
    failing_listing: bool,
    failing_uploads: u32,
    failing_placements: u32,
    /// Remaining empty answers to give per album id.
    stalls: HashMap<String, u32>,
    /// `(album id, page)` requests that fail.
    failing_pages: HashSet<(String, u32)>,
    upload_attempts: u32,
    page_requests: u32,
    deleted: Vec<String>,
    created_albums: Vec<String>,
}
impl State {
    fn allocate(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}-{}", self.next_id)
    }

    fn album_mut(&mut self, album_id: &str) -> Result<&mut MockAlbum> {
        self.albums
            .iter_mut()
            .find(|a| a.id == album_id)
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(format!("album {album_id}"))))
    }

    fn take_placement_failure(&mut self) -> Result<()> {
        if self.failing_placements > 0 {
            self.failing_placements -= 1;
            exn::bail!(ErrorKind::Api { code: 105, message: "Service currently unavailable".to_string() });
        }
        Ok(())
    }
}

/// In-memory photo repository for testing.
///
/// Albums and photos live behind a [`RwLock`], so all trait methods operate
/// on `&self`. Failures and throttling can be scripted ahead of time, and
/// every mutating call is recorded so tests can assert on what the engine
/// asked for.
///
/// # Examples
///
/// ```
/// use albumsync_remote::PhotoRepository;
/// use albumsync_remote::repository::MockRepository;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let repository = MockRepository::default().with_album("72157", "Trip", [("1", "img1"), ("2", "img2")]);
/// let albums = repository.list_albums().await?;
/// assert_eq!(albums[0].title, "Trip");
/// assert_eq!(repository.list_album_photos("72157", 1).await?.len(), 2);
/// # Ok(())
/// # }
/// ```
pub struct MockRepository {
    name: String,
    page_size: usize,
    state: RwLock<State>,
}

impl MockRepository {
    /// Add an album pre-populated with `(id, title)` photos.
    pub fn with_album<'a>(
        mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        photos: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let state = self.state.get_mut();
        let photos: Vec<RemotePhoto> = photos.into_iter().map(|(id, title)| RemotePhoto::new(id, title)).collect();
        for photo in &photos {
            state.photos.insert(photo.id.clone(), photo.clone());
        }
        state.albums.push(MockAlbum {
            id: id.into(),
            title: title.into(),
            photos,
        });
        self
    }

    /// Change how many photos are returned per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Change the name of the mock repository.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Make every `list_albums` call fail.
    pub fn with_failing_listing(mut self) -> Self {
        self.state.get_mut().failing_listing = true;
        self
    }

    /// The next `count` calls to `upload_file` fail.
    pub async fn fail_next_uploads(&self, count: u32) {
        self.state.write().await.failing_uploads = count;
    }

    /// The next `count` calls to `create_album` or `append_photo` fail.
    pub async fn fail_next_placements(&self, count: u32) {
        self.state.write().await.failing_placements = count;
    }

    /// The next `count` page requests for `album_id` come back empty,
    /// whatever the page number.
    pub async fn stall_album(&self, album_id: impl Into<String>, count: u32) {
        self.state.write().await.stalls.insert(album_id.into(), count);
    }

    /// Every request for `page` of `album_id` fails.
    pub async fn fail_page(&self, album_id: impl Into<String>, page: u32) {
        self.state.write().await.failing_pages.insert((album_id.into(), page));
    }

    /// Number of `upload_file` calls received, failed ones included.
    pub async fn upload_attempts(&self) -> u32 {
        self.state.read().await.upload_attempts
    }

    /// Number of `list_album_photos` calls received.
    pub async fn page_requests(&self) -> u32 {
        self.state.read().await.page_requests
    }

    /// Identifiers passed to successful `delete_photo` calls, in call order.
    pub async fn deleted(&self) -> Vec<String> {
        self.state.read().await.deleted.clone()
    }

    /// Titles of albums created through `create_album`, in call order.
    pub async fn created_albums(&self) -> Vec<String> {
        self.state.read().await.created_albums.clone()
    }

    /// Current photos of an album, in insertion order.
    pub async fn album_photos(&self, album_id: &str) -> Vec<RemotePhoto> {
        let guard = self.state.read().await;
        guard.albums.iter().find(|a| a.id == album_id).map(|a| a.photos.clone()).unwrap_or_default()
    }
}
impl Default for MockRepository {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            state: RwLock::new(State::default()),
        }
    }
}

#[async_trait]
impl PhotoRepository for MockRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>> {
        let guard = self.state.read().await;
        if guard.failing_listing {
            exn::bail!(ErrorKind::Network("connection reset by peer".to_string()));
        }
        Ok(guard.albums.iter().map(|a| RemoteAlbum::new(&a.id, &a.title)).collect())
    }

    async fn list_album_photos(&self, album_id: &str, page: u32) -> Result<Vec<RemotePhoto>> {
        let mut guard = self.state.write().await;
        guard.page_requests += 1;
        if guard.failing_pages.contains(&(album_id.to_string(), page)) {
            exn::bail!(ErrorKind::Network(format!("page {page} of album {album_id} timed out")));
        }
        if let Some(remaining) = guard.stalls.get_mut(album_id)
            && *remaining > 0
        {
            *remaining -= 1;
            return Ok(Vec::new());
        }
        let album = guard.album_mut(album_id)?;
        let start = (page.max(1) as usize - 1).saturating_mul(self.page_size);
        Ok(album.photos.iter().skip(start).take(self.page_size).cloned().collect())
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<()> {
        let mut guard = self.state.write().await;
        if guard.photos.remove(photo_id).is_none() {
            exn::bail!(ErrorKind::NotFound(format!("photo {photo_id}")));
        }
        for album in guard.albums.iter_mut() {
            album.photos.retain(|p| p.id != photo_id);
        }
        guard.deleted.push(photo_id.to_string());
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let mut guard = self.state.write().await;
        guard.upload_attempts += 1;
        if guard.failing_uploads > 0 {
            guard.failing_uploads -= 1;
            exn::bail!(ErrorKind::Network(format!("upload of {} timed out", path.display())));
        }
        let id = guard.allocate("photo");
        guard.photos.insert(id.clone(), RemotePhoto::new(&id, title_from_path(path)));
        Ok(id)
    }

    async fn create_album(&self, title: &str, primary_photo_id: &str) -> Result<String> {
        let mut guard = self.state.write().await;
        guard.take_placement_failure()?;
        let photo = guard
            .photos
            .get(primary_photo_id)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(format!("photo {primary_photo_id}"))))?;
        let id = guard.allocate("album");
        guard.albums.push(MockAlbum {
            id: id.clone(),
            title: title.to_string(),
            photos: vec![photo],
        });
        guard.created_albums.push(title.to_string());
        Ok(id)
    }

    async fn append_photo(&self, album_id: &str, photo_id: &str) -> Result<()> {
        let mut guard = self.state.write().await;
        guard.take_placement_failure()?;
        let photo = guard
            .photos
            .get(photo_id)
            .cloned()
            .ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(format!("photo {photo_id}"))))?;
        guard.album_mut(album_id)?.photos.push(photo);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_PHOTOS: [(&str, &str); 0] = [];

    #[tokio::test]
    async fn test_pagination() {
        let repository = MockRepository::default()
            .with_page_size(2)
            .with_album("a1", "Trip", [("1", "c"), ("2", "a"), ("3", "b")]);
        assert_eq!(repository.list_album_photos("a1", 1).await.unwrap().len(), 2);
        assert_eq!(repository.list_album_photos("a1", 2).await.unwrap(), vec![RemotePhoto::new("3", "b")]);
        assert!(repository.list_album_photos("a1", 3).await.unwrap().is_empty());
        assert_eq!(repository.page_requests().await, 3);
    }

    #[tokio::test]
    async fn test_failing_page() {
        let repository = MockRepository::default().with_page_size(1).with_album("a1", "Trip", [("1", "a"), ("2", "b")]);
        repository.fail_page("a1", 2).await;
        assert_eq!(repository.list_album_photos("a1", 1).await.unwrap().len(), 1);
        let err = repository.list_album_photos("a1", 2).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[tokio::test]
    async fn test_unknown_album() {
        let repository = MockRepository::default();
        let err = repository.list_album_photos("nope", 1).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_stall_then_recover() {
        let repository = MockRepository::default().with_album("a1", "Trip", [("1", "img1")]);
        repository.stall_album("a1", 2).await;
        assert!(repository.list_album_photos("a1", 1).await.unwrap().is_empty());
        assert!(repository.list_album_photos("a1", 1).await.unwrap().is_empty());
        assert_eq!(repository.list_album_photos("a1", 1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_and_create_album() {
        let repository = MockRepository::default();
        let photo_id = repository.upload_file(Path::new("/library/Trip/img1.jpg")).await.unwrap();
        let album_id = repository.create_album("Trip", &photo_id).await.unwrap();
        assert_eq!(repository.album_photos(&album_id).await, vec![RemotePhoto::new(&photo_id, "img1")]);
        assert_eq!(repository.created_albums().await, vec!["Trip".to_string()]);
    }

    #[tokio::test]
    async fn test_append_requires_known_photo() {
        let repository = MockRepository::default().with_album("a1", "Trip", NO_PHOTOS);
        let err = repository.append_photo("a1", "ghost").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let repository = MockRepository::default();
        repository.fail_next_uploads(1).await;
        assert!(repository.upload_file(Path::new("/a/b.png")).await.is_err());
        let photo_id = repository.upload_file(Path::new("/a/b.png")).await.unwrap();
        repository.fail_next_placements(1).await;
        assert!(repository.create_album("a", &photo_id).await.is_err());
        assert!(repository.create_album("a", &photo_id).await.is_ok());
        assert_eq!(repository.upload_attempts().await, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let repository = MockRepository::default().with_album("a1", "Trip", [("1", "img1"), ("2", "img1")]);
        repository.delete_photo("2").await.unwrap();
        assert_eq!(repository.album_photos("a1").await, vec![RemotePhoto::new("1", "img1")]);
        assert_eq!(repository.deleted().await, vec!["2".to_string()]);
        let err = repository.delete_photo("2").await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failing_listing() {
        let repository = MockRepository::default().with_failing_listing();
        assert!(repository.list_albums().await.is_err());
    }
}
