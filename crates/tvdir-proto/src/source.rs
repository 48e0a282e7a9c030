//! Resource sources: where `channels.json` and `texts.json` come from.
//!
//! The directory is served either over HTTP (a base URL, like a page origin)
//! or straight from a local directory.

use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use reqwest::{StatusCode, Url};

use crate::loader::LoadError;

/// Fetches the raw bytes of a named resource relative to some base.
pub trait ResourceSource: Send + Sync {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Plain HTTP GET with default headers, no query string and no timeout.
pub struct HttpSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        // Url::join drops the last path segment unless it ends with '/'
        let mut base = base.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)?;
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn url_for(&self, name: &str) -> Result<Url, LoadError> {
        self.base.join(name).map_err(|e| LoadError::Transport {
            resource: name.to_string(),
            detail: e.to_string(),
        })
    }
}

impl ResourceSource for HttpSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>> {
        Box::pin(async move {
            let url = self.url_for(name)?;
            tracing::debug!("GET {}", url);
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| LoadError::Transport {
                    resource: name.to_string(),
                    detail: e.to_string(),
                })?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(LoadError::NotFound {
                    resource: name.to_string(),
                });
            }
            if !status.is_success() {
                return Err(LoadError::Http {
                    resource: name.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| LoadError::Transport {
                resource: name.to_string(),
                detail: e.to_string(),
            })?;
            Ok(body.to_vec())
        })
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Reads resources from a local directory; a missing file is a not-found.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceSource for DirSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>, LoadError>> {
        Box::pin(async move {
            let path = self.root.join(name);
            tracing::debug!("read {}", path.display());
            tokio::fs::read(&path).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LoadError::NotFound {
                        resource: name.to_string(),
                    }
                } else {
                    LoadError::Transport {
                        resource: name.to_string(),
                        detail: e.to_string(),
                    }
                }
            })
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick a source for a configured base: `http://` / `https://` → HTTP,
/// anything else is treated as a directory path.
pub fn source_from_base(base: &str) -> anyhow::Result<Arc<dyn ResourceSource>> {
    let trimmed = base.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(trimmed)?))
    } else {
        Ok(Arc::new(DirSource::new(trimmed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_base_without_trailing_slash_keeps_last_segment() {
        let source = HttpSource::new("https://example.com/tv").unwrap();
        let url = source.url_for("channels.json").unwrap();
        assert_eq!(url.as_str(), "https://example.com/tv/channels.json");
    }

    #[test]
    fn base_picks_source_kind() {
        let http = source_from_base("http://127.0.0.1:8080/").unwrap();
        assert!(http.describe().starts_with("http://127.0.0.1:8080"));
        let dir = source_from_base("/srv/tv").unwrap();
        assert_eq!(dir.describe(), "/srv/tv");
    }

    #[tokio::test]
    async fn dir_source_missing_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let source = DirSource::new(tmp.path());
        let err = source.fetch("channels.json").await.unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));

        std::fs::write(tmp.path().join("channels.json"), b"[]").unwrap();
        let bytes = source.fetch("channels.json").await.unwrap();
        assert_eq!(bytes, b"[]");
    }
}
