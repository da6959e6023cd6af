//! Backend selection: in-process studio or a remote service.

use super::backend::{Backend, BackendError, BackendRequest};
use super::http::HttpBackend;
use super::local::LocalStudio;

/// The studio the application talks to.
#[derive(Debug)]
pub enum Studio {
    /// In-process rendering and in-memory storage.
    Local(LocalStudio),
    /// A studio service reached over HTTP.
    Remote(HttpBackend),
}

impl Studio {
    /// Remote studio at `url` when given, local studio otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn from_url(url: Option<&str>) -> Result<Self, BackendError> {
        match url {
            Some(url) => Ok(Studio::Remote(HttpBackend::new(url)?)),
            None => Ok(Studio::Local(LocalStudio::new())),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Studio::Remote(_))
    }
}

impl Default for Studio {
    fn default() -> Self {
        Studio::Local(LocalStudio::new())
    }
}

impl Backend for Studio {
    async fn call(&self, request: &BackendRequest) -> Result<String, BackendError> {
        match self {
            Studio::Local(studio) => studio.call(request).await,
            Studio::Remote(http) => http.call(request).await,
        }
    }
}
