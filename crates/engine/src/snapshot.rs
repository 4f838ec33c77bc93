//! In-memory view of the remote inventory.
//!
//! A [`Snapshot`] is built once per run by the inventory reader and then
//! updated in place by the reconciler as uploads succeed. Photos are only
//! ever identified by title.

use albumsync_remote::RemotePhoto;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: String,
    pub title: String,
}
impl Photo {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}
impl From<RemotePhoto> for Photo {
    fn from(photo: RemotePhoto) -> Self {
        Self { id: photo.id, title: photo.title }
    }
}

/// A remote album whose photos are always sorted ascending by title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    photos: Vec<Photo>,
}

impl Album {
    /// Build an album from photos in any order. The sort is stable, so
    /// photos sharing a title keep their listing order.
    pub fn new(id: impl Into<String>, photos: impl IntoIterator<Item = Photo>) -> Self {
        let mut photos: Vec<Photo> = photos.into_iter().collect();
        photos.sort_by(|a, b| a.title.cmp(&b.title));
        Self { id: id.into(), photos }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Index of the first photo whose title is not less than `title`.
    fn lower_bound(&self, title: &str) -> usize {
        self.photos.partition_point(|p| p.title.as_str() < title)
    }

    /// Find a photo by exact title.
    pub fn find(&self, title: &str) -> Option<&Photo> {
        self.photos.get(self.lower_bound(title)).filter(|p| p.title == title)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.find(title).is_some()
    }

    /// Insert at the lower-bound position, keeping the album sorted.
    pub fn insert(&mut self, photo: Photo) {
        let index = self.lower_bound(&photo.title);
        self.photos.insert(index, photo);
    }
}

/// Remote albums keyed by title.
///
/// Titles are unique here: if the service lists two albums with the same
/// title, the later one wins, but the listing position of the first is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    albums: HashMap<String, Album>,
    order: Vec<String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the album titled `title`.
    pub fn insert(&mut self, title: impl Into<String>, album: Album) {
        let title = title.into();
        if !self.albums.contains_key(&title) {
            self.order.push(title.clone());
        }
        self.albums.insert(title, album);
    }

    pub fn get(&self, title: &str) -> Option<&Album> {
        self.albums.get(title)
    }

    pub fn get_mut(&mut self, title: &str) -> Option<&mut Album> {
        self.albums.get_mut(title)
    }

    /// Albums in the order they were listed (or created).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Album)> {
        self.order.iter().filter_map(|title| self.albums.get(title).map(|album| (title.as_str(), album)))
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Total number of photos across all albums.
    pub fn photo_count(&self) -> usize {
        self.albums.values().map(Album::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn album(titles: &[&str]) -> Album {
        Album::new("a1", titles.iter().enumerate().map(|(i, t)| Photo::new(format!("id{i}"), *t)))
    }

    #[test]
    fn test_new_sorts_stably() {
        let album = Album::new(
            "a1",
            [Photo::new("1", "c"), Photo::new("2", "a"), Photo::new("3", "b"), Photo::new("4", "a")],
        );
        let ids: Vec<&str> = album.photos().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "3", "1"]);
    }

    #[rstest]
    #[case(&["img1", "img3"], "img1", true)]
    #[case(&["img1", "img3"], "img3", true)]
    #[case(&["img1", "img3"], "img2", false)]
    #[case(&["img1", "img3"], "img4", false)]
    #[case(&["img1", "img3"], "img", false)]
    #[case(&[], "img1", false)]
    fn test_exact_lookup(#[case] titles: &[&str], #[case] title: &str, #[case] expected: bool) {
        assert_eq!(album(titles).contains(title), expected);
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut album = album(&["b", "d"]);
        album.insert(Photo::new("x", "c"));
        album.insert(Photo::new("y", "a"));
        album.insert(Photo::new("z", "e"));
        let titles: Vec<&str> = album.photos().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(album.find("c").map(|p| p.id.as_str()), Some("x"));
    }

    #[test]
    fn test_snapshot_listing_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert("Zoo", album(&["a"]));
        snapshot.insert("Airport", album(&["b", "c"]));
        snapshot.insert("Zoo", album(&["d"]));
        let titles: Vec<&str> = snapshot.iter().map(|(title, _)| title).collect();
        assert_eq!(titles, vec!["Zoo", "Airport"]);
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.photo_count(), 3);
        assert!(snapshot.get("Zoo").unwrap().contains("d"));
    }
}
