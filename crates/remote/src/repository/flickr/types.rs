//! Flickr API response types
//!
//! Data structures for deserializing Flickr REST (`format=json`) responses.

use serde::{Deserialize, Deserializer};

/// Error envelope returned with `"stat": "fail"`.
#[derive(Debug, Deserialize)]
pub struct Failure {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// `{"_content": "..."}` wrapper used for some text fields.
#[derive(Debug, Deserialize)]
pub struct Content {
    #[serde(rename = "_content")]
    pub content: String,
}

/// flickr.photosets.getList
#[derive(Debug, Deserialize)]
pub struct PhotosetList {
    pub photosets: Photosets,
}

#[derive(Debug, Deserialize)]
pub struct Photosets {
    #[serde(default)]
    pub photoset: Vec<PhotosetSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetSummary {
    pub id: String,
    pub title: Content,
}

/// flickr.photosets.getPhotos
#[derive(Debug, Deserialize)]
pub struct PhotosetPhotos {
    pub photoset: PhotosetPage,
}

#[derive(Debug, Deserialize)]
pub struct PhotosetPage {
    #[serde(default)]
    pub photo: Vec<PhotoSummary>,
    /// Total number of pages; the API sends it as a number or a string.
    #[serde(default, deserialize_with = "number_or_string")]
    pub pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PhotoSummary {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// flickr.photosets.create
#[derive(Debug, Deserialize)]
pub struct CreatedPhotoset {
    pub photoset: CreatedId,
}

#[derive(Debug, Deserialize)]
pub struct CreatedId {
    pub id: String,
}

fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }
    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.parse().ok(),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photoset_list() {
        let json = r#"{"photosets":{"page":1,"pages":1,"perpage":2,"total":2,"photoset":[
            {"id":"72157","title":{"_content":"Trip"},"photos":3},
            {"id":"72158","title":{"_content":"Home"},"photos":0}]},"stat":"ok"}"#;
        let list: PhotosetList = serde_json::from_str(json).unwrap();
        assert_eq!(list.photosets.photoset.len(), 2);
        assert_eq!(list.photosets.photoset[0].title.content, "Trip");
    }

    #[test]
    fn test_photoset_page_pages_as_string() {
        let json = r#"{"photoset":{"id":"72157","photo":[{"id":"1","title":"img1","isprimary":"1"}],
            "page":"1","pages":"3","total":"1001"},"stat":"ok"}"#;
        let page: PhotosetPhotos = serde_json::from_str(json).unwrap();
        assert_eq!(page.photoset.pages, Some(3));
        assert_eq!(page.photoset.photo[0].title, "img1");
    }

    #[test]
    fn test_photoset_page_pages_as_number() {
        let json = r#"{"photoset":{"id":"72157","photo":[],"page":2,"pages":1},"stat":"ok"}"#;
        let page: PhotosetPhotos = serde_json::from_str(json).unwrap();
        assert_eq!(page.photoset.pages, Some(1));
        assert!(page.photoset.photo.is_empty());
    }
}
