//! Remote models.
//!
//! Plain projections of what the photo service reports. Identifiers are
//! opaque strings assigned by the service.

/// An album (photoset) as listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAlbum {
    pub id: String,
    pub title: String,
}
impl RemoteAlbum {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

/// A photo as listed inside a remote album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePhoto {
    pub id: String,
    pub title: String,
}
impl RemotePhoto {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into() }
    }
}

/// Title a remote service assigns to an uploaded file: its name up to the
/// first `.`.
///
/// ```
/// use albumsync_remote::title_from_path;
///
/// assert_eq!(title_from_path("Holiday/img1.jpg"), "img1");
/// assert_eq!(title_from_path("Holiday/img1.edited.JPG"), "img1");
/// ```
pub fn title_from_path(path: impl AsRef<std::path::Path>) -> String {
    let name = path.as_ref().file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    name.split('.').next().unwrap_or_default().to_string()
}
