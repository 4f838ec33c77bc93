//! Flickr photo repository.
//!
//! Talks to the Flickr REST API (`format=json`) and the upload endpoint.
//! Every request is signed with OAuth 1.0a using tokens issued beforehand;
//! obtaining those tokens interactively is not handled here.

mod oauth;
mod types;

use self::oauth::Params;
use self::types::{CreatedPhotoset, Failure, PhotosetList, PhotosetPhotos};
use crate::error::{ErrorKind, Result};
use crate::models::{RemoteAlbum, RemotePhoto, title_from_path};
use crate::PhotoRepository;
use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use regex::Regex;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::LazyLock;
use time::OffsetDateTime;

const REST_ENDPOINT: &str = "https://api.flickr.com/services/rest";
const UPLOAD_ENDPOINT: &str = "https://up.flickr.com/services/upload/";
/// Largest page size `flickr.photosets.getPhotos` accepts.
const PAGE_SIZE: u32 = 500;

static UPLOAD_PHOTO_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<photoid[^>]*>\s*(\d+)\s*</photoid>").unwrap());
static UPLOAD_ERROR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<err\s+code="(\d+)"\s+msg="([^"]*)""#).unwrap());

/// Application key and pre-issued OAuth access token.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub oauth_token: String,
    pub oauth_token_secret: String,
}
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("api_key", &self.api_key).finish_non_exhaustive()
    }
}

/// Flickr photo repository.
///
/// # Examples
///
/// ```no_run
/// use albumsync_remote::repository::{Credentials, FlickrRepository};
///
/// let repository = FlickrRepository::new("flickr", Credentials {
///     api_key: "key".into(),
///     api_secret: "secret".into(),
///     oauth_token: "token".into(),
///     oauth_token_secret: "token-secret".into(),
/// });
/// ```
#[derive(Debug, Clone)]
pub struct FlickrRepository {
    name: String,
    credentials: Credentials,
    client: reqwest::Client,
}

impl FlickrRepository {
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            credentials,
            client: reqwest::Client::new(),
        }
    }

    fn signed(&self, http_method: &str, url: &str, mut params: Params) -> Result<Params> {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let timestamp = OffsetDateTime::now_utc().unix_timestamp();
        oauth::sign(&self.credentials, http_method, url, &mut params, &nonce, timestamp)?;
        Ok(params)
    }

    fn rest_params(method: &str, args: &[(&str, &str)]) -> Params {
        let mut params = Params::new();
        params.insert("method".into(), method.into());
        params.insert("format".into(), "json".into());
        params.insert("nojsoncallback".into(), "1".into());
        for (k, v) in args {
            params.insert(k.to_string(), v.to_string());
        }
        params
    }

    /// Read-only calls go out as signed GETs.
    async fn get<T: DeserializeOwned>(&self, params: Params) -> Result<T> {
        let params = self.signed("GET", REST_ENDPOINT, params)?;
        let response = self.client.get(REST_ENDPOINT).query(&params).send().await.map_err(network_error)?;
        Self::decode(response).await
    }

    /// Writes go out as signed, form-encoded POSTs.
    async fn post<T: DeserializeOwned>(&self, params: Params) -> Result<T> {
        let params = self.signed("POST", REST_ENDPOINT, params)?;
        let response = self.client.post(REST_ENDPOINT).form(&params).send().await.map_err(network_error)?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await.map_err(network_error)?;
        if status.is_server_error() || status.as_u16() == 429 {
            exn::bail!(ErrorKind::Network(format!("HTTP {status}")));
        }
        let value: serde_json::Value =
            serde_json::from_slice(&body).or_raise(|| ErrorKind::InvalidResponse(format!("HTTP {status}: not JSON")))?;
        if value.get("stat").and_then(|s| s.as_str()) != Some("ok") {
            let failure: Failure = serde_json::from_value(value).unwrap_or(Failure {
                code: 0,
                message: "unknown failure".to_string(),
            });
            // 98: invalid auth token, 99: insufficient permissions, 100: invalid API key.
            if matches!(failure.code, 98 | 99 | 100) {
                exn::bail!(ErrorKind::Credentials);
            }
            exn::bail!(ErrorKind::Api { code: failure.code, message: failure.message });
        }
        serde_json::from_value(value).or_raise(|| ErrorKind::InvalidResponse("unexpected response shape".to_string()))
    }
}

fn network_error(err: reqwest::Error) -> exn::Exn<ErrorKind> {
    exn::Exn::from(ErrorKind::Network(err.to_string()))
}

#[async_trait]
impl PhotoRepository for FlickrRepository {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>> {
        let list: PhotosetList = self.get(Self::rest_params("flickr.photosets.getList", &[])).await?;
        Ok(list.photosets.photoset.into_iter().map(|set| RemoteAlbum::new(set.id, set.title.content)).collect())
    }

    async fn list_album_photos(&self, album_id: &str, page: u32) -> Result<Vec<RemotePhoto>> {
        let page_arg = page.to_string();
        let per_page = PAGE_SIZE.to_string();
        let params = Self::rest_params(
            "flickr.photosets.getPhotos",
            &[("photoset_id", album_id), ("page", page_arg.as_str()), ("per_page", per_page.as_str())],
        );
        let photos: PhotosetPhotos = self.get(params).await?;
        // Flickr repeats the last page for out-of-range page numbers.
        if let Some(pages) = photos.photoset.pages
            && page > pages
        {
            return Ok(Vec::new());
        }
        Ok(photos.photoset.photo.into_iter().map(|p| RemotePhoto::new(p.id, p.title)).collect())
    }

    async fn delete_photo(&self, photo_id: &str) -> Result<()> {
        let _: serde_json::Value =
            self.post(Self::rest_params("flickr.photos.delete", &[("photo_id", photo_id)])).await?;
        Ok(())
    }

    async fn upload_file(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(ErrorKind::Io)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_raise(|| ErrorKind::Io(std::io::Error::other(format!("not a file: {}", path.display()))))?;
        let mut params = Params::new();
        params.insert("title".into(), title_from_path(path));
        // The photo itself is never part of the signature base string.
        let params = self.signed("POST", UPLOAD_ENDPOINT, params)?;
        let form = params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .part("photo", Part::bytes(bytes).file_name(file_name));
        let response = self.client.post(UPLOAD_ENDPOINT).multipart(form).send().await.map_err(network_error)?;
        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        parse_upload_response(status.as_u16(), &body)
    }

    async fn create_album(&self, title: &str, primary_photo_id: &str) -> Result<String> {
        let params = Self::rest_params("flickr.photosets.create", &[("title", title), ("primary_photo_id", primary_photo_id)]);
        let created: CreatedPhotoset = self.post(params).await?;
        tracing::debug!(album.name = title, album.id = %created.photoset.id, "Photoset created");
        Ok(created.photoset.id)
    }

    async fn append_photo(&self, album_id: &str, photo_id: &str) -> Result<()> {
        let params = Self::rest_params("flickr.photosets.addPhoto", &[("photoset_id", album_id), ("photo_id", photo_id)]);
        let _: serde_json::Value = self.post(params).await?;
        Ok(())
    }
}

/// The upload endpoint answers in XML regardless of `format`.
fn parse_upload_response(status: u16, body: &str) -> Result<String> {
    if let Some(captures) = UPLOAD_PHOTO_ID.captures(body) {
        return Ok(captures[1].to_string());
    }
    if let Some(captures) = UPLOAD_ERROR.captures(body) {
        let code = captures[1].parse().unwrap_or(0);
        exn::bail!(ErrorKind::Api { code, message: captures[2].to_string() });
    }
    if status >= 500 || status == 429 {
        exn::bail!(ErrorKind::Network(format!("HTTP {status}")));
    }
    exn::bail!(ErrorKind::InvalidResponse(format!("HTTP {status}: no photo id in upload response")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upload_success() {
        let body = "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<rsp stat=\"ok\">\n<photoid>53012345678</photoid>\n</rsp>";
        assert_eq!(parse_upload_response(200, body).unwrap(), "53012345678");
    }

    #[test]
    fn test_parse_upload_failure() {
        let body = "<rsp stat=\"fail\">\n\t<err code=\"5\" msg=\"Filetype was not recognised\" />\n</rsp>";
        let err = parse_upload_response(200, body).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Api { code: 5, .. }));
    }

    #[test]
    fn test_parse_upload_gateway_error() {
        let err = parse_upload_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }

    #[test]
    fn test_rest_params() {
        let params = FlickrRepository::rest_params("flickr.photosets.getPhotos", &[("photoset_id", "72157")]);
        assert_eq!(params["method"], "flickr.photosets.getPhotos");
        assert_eq!(params["format"], "json");
        assert_eq!(params["nojsoncallback"], "1");
        assert_eq!(params["photoset_id"], "72157");
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let credentials = Credentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
            oauth_token: "token".into(),
            oauth_token_secret: "token-secret".into(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("key"));
        assert!(!debug.contains("secret"));
    }
}
