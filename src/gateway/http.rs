//! HTTP transport to a remote studio service.

use super::backend::{Backend, BackendError, BackendRequest, Method};

/// Backend that forwards requests to a studio service over HTTP.
///
/// Reply bodies are returned whatever the HTTP status, since the service
/// reports application failures as JSON with `success: false`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Creates a backend rooted at `base_url`, e.g. `http://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Backend for HttpBackend {
    async fn call(&self, request: &BackendRequest) -> Result<String, BackendError> {
        let url = self.endpoint(&request.path);
        tracing::debug!(method = %request.method, url = %url, "http request");

        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let mut builder = builder.query(&request.query);
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound {
                method: request.method,
                path: request.path.clone(),
            });
        }
        if !status.is_success() {
            tracing::warn!(%status, url = %url, "studio replied with an error status");
        }

        response
            .text()
            .await
            .map_err(|e| BackendError::Unreachable(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{HEALTH_PATH, LOAD_PATH};
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves one HTTP exchange with `reply` and hands back the raw request.
    fn serve_once(status_line: &'static str, reply: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                reply.len(),
                reply
            );
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&buf[..n]).into_owned()
        });
        (url, handle)
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = HttpBackend::new("http://localhost:5000/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
        assert_eq!(
            backend.endpoint(HEALTH_PATH),
            "http://localhost:5000/health"
        );
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "composition": "C4", "tempo": 120}"#,
        );
        let backend = HttpBackend::new(url).unwrap();

        let body = backend
            .call(&BackendRequest::get(LOAD_PATH).with_query("id", "sample"))
            .await
            .unwrap();

        assert!(body.contains("\"composition\": \"C4\""));
        let raw = server.join().unwrap();
        assert!(raw.starts_with("GET /api/load-composition?id=sample HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_status_body_is_returned() {
        let (url, server) = serve_once("500 INTERNAL SERVER ERROR", r#"{"success": false, "error": "boom"}"#);
        let backend = HttpBackend::new(url).unwrap();

        let body = backend.call(&BackendRequest::get(HEALTH_PATH)).await.unwrap();

        assert_eq!(body, r#"{"success": false, "error": "boom"}"#);
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let backend = HttpBackend::new(format!("http://127.0.0.1:{}", port)).unwrap();

        let err = backend
            .call(&BackendRequest::get(HEALTH_PATH))
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Unreachable(_)));
    }
}
