// filepath: photo-board/src/photo.rs
//! Photo lookup service client
//!
//! Looks a photo up by id and downloads the image behind its `regular`
//! URL. Requests block, so callers run them off the event loop.

use image::RgbaImage;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const CONNECT_TIMEOUT_SECS: u64 = 8;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors from looking up or downloading a photo
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("photo service returned status {status}")]
    Status { status: u16 },

    #[error("malformed photo payload: {0}")]
    Payload(String),

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("no access key configured for the photo service")]
    MissingCredential,

    #[error("worker thread failed to start: {0}")]
    Worker(#[from] std::io::Error),
}

/// Lookup response; only the URLs are used
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: Option<String>,
    pub urls: PhotoUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

/// Parse a lookup response body
pub fn parse_photo(body: &str) -> Result<Photo, LoadError> {
    let photo: Photo = serde_json::from_str(body).map_err(|e| LoadError::Payload(e.to_string()))?;
    if photo.urls.regular.trim().is_empty() {
        return Err(LoadError::Payload("empty urls.regular".to_string()));
    }
    Ok(photo)
}

/// The remote image service
pub trait PhotoService: Send + Sync {
    /// Look a photo up by id. No retry.
    fn download(&self, id: &str) -> Result<Photo, LoadError>;

    /// Fetch and decode the image at `url`
    fn fetch_image(&self, url: &str) -> Result<RgbaImage, LoadError>;
}

/// HTTP client for an Unsplash-style API
#[derive(Clone)]
pub struct PhotoClient {
    base_url: String,
    access_key: Option<String>,
    http: Client,
}

impl PhotoClient {
    pub fn new(base_url: impl Into<String>, access_key: Option<String>) -> Result<Self, LoadError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            access_key,
            http,
        })
    }

    fn photo_url(&self, id: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/photos/{id}")
    }

    fn auth_header(&self) -> Result<HeaderValue, LoadError> {
        let key = self
            .access_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LoadError::MissingCredential)?;
        HeaderValue::from_str(&format!("Client-ID {key}")).map_err(|_| LoadError::MissingCredential)
    }
}

impl PhotoService for PhotoClient {
    fn download(&self, id: &str) -> Result<Photo, LoadError> {
        let url = self.photo_url(id);
        debug!("GET {}", url);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth_header()?)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }
        parse_photo(&response.text()?)
    }

    fn fetch_image(&self, url: &str) -> Result<RgbaImage, LoadError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes()?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_regular_url() {
        let photo = parse_photo(
            r#"{"id": "Nr88sR3i4Tg", "width": 10, "urls": {"raw": "r", "regular": "https://img/regular"}}"#,
        )
        .unwrap();
        assert_eq!(photo.id.as_deref(), Some("Nr88sR3i4Tg"));
        assert_eq!(photo.urls.regular, "https://img/regular");
    }

    #[test]
    fn rejects_payload_without_urls() {
        assert!(matches!(
            parse_photo(r#"{"errors": ["Couldn't find Photo"]}"#),
            Err(LoadError::Payload(_))
        ));
        assert!(matches!(
            parse_photo(r#"{"urls": {"regular": ""}}"#),
            Err(LoadError::Payload(_))
        ));
        assert!(matches!(parse_photo("<html>"), Err(LoadError::Payload(_))));
    }

    #[test]
    fn lookup_url_and_credential() {
        let client = PhotoClient::new("https://api.example.com/", Some("key".into())).unwrap();
        assert_eq!(client.photo_url("abc"), "https://api.example.com/photos/abc");
        assert_eq!(client.auth_header().unwrap(), "Client-ID key");

        let anonymous = PhotoClient::new("https://api.example.com", None).unwrap();
        assert!(matches!(anonymous.auth_header(), Err(LoadError::MissingCredential)));
    }
}
