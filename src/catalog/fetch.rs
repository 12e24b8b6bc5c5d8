//! Remote fetchers
//!
//! A fetcher turns an absolute API path into raw response bytes. It must be
//! idempotent: fetching the same path twice yields the same bytes unless the
//! remote data changed in between.

use crate::error::{PkgcatError, PkgcatResult};
use std::time::Duration;
use tracing::debug;
use ureq::Agent;

/// Largest response body accepted from the server (full catalog listings
/// run to tens of megabytes)
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Source of raw API responses
pub trait Fetcher {
    /// GET `path` and return the body.
    ///
    /// Returns `ResourceNotFound` when the server reports the path as absent.
    fn fetch(&self, path: &str) -> PkgcatResult<Vec<u8>>;
}

/// Fetcher that talks HTTP(S) to an API server
pub struct HttpFetcher {
    agent: Agent,
    server_url: String,
    token: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher for `server_url` with a global per-request timeout
    pub fn new(server_url: impl Into<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            server_url: server_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.server_url, path.trim_start_matches('/'))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str) -> PkgcatResult<Vec<u8>> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let mut response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => {
                return Err(PkgcatError::ResourceNotFound {
                    path: path.to_string(),
                })
            }
            Err(ureq::Error::StatusCode(code)) => {
                return Err(PkgcatError::fetch(
                    path,
                    format!("server returned HTTP {}", code),
                ))
            }
            Err(e) => return Err(PkgcatError::fetch(path, e.to_string())),
        };

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| PkgcatError::fetch(path, format!("reading body: {}", e)))?;

        debug!("Fetched {} bytes from {}", body.len(), path);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve one canned HTTP response and hand back the request head
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }

            let mut stream = stream;
            write!(
                stream,
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
            stream.flush().unwrap();
            tx.send(head).unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    #[test]
    fn url_join_handles_slashes() {
        let fetcher = HttpFetcher::new("http://127.0.0.1:8001/", Duration::from_secs(1));
        assert_eq!(fetcher.server_url(), "http://127.0.0.1:8001");
        assert_eq!(fetcher.url_for("/apis/x"), "http://127.0.0.1:8001/apis/x");
        assert_eq!(fetcher.url_for("apis/x"), "http://127.0.0.1:8001/apis/x");
    }

    #[test]
    fn blank_token_is_dropped() {
        let fetcher = HttpFetcher::new("http://h", Duration::from_secs(1))
            .with_token(Some("  ".to_string()));
        assert!(fetcher.token.is_none());
    }

    #[test]
    fn fetch_returns_body_and_sends_token() {
        let (url, head) = serve_once("HTTP/1.1 200 OK", r#"{"items":[]}"#);
        let fetcher =
            HttpFetcher::new(url, Duration::from_secs(5)).with_token(Some("s3cret".to_string()));

        let body = fetcher.fetch("/apis/test").unwrap();
        assert_eq!(body, br#"{"items":[]}"#);

        let head = head.recv().unwrap();
        assert!(head.starts_with("GET /apis/test "));
        assert!(head.to_lowercase().contains("authorization: bearer s3cret"));
    }

    #[test]
    fn http_404_is_resource_not_found() {
        let (url, _head) = serve_once("HTTP/1.1 404 Not Found", "{}");
        let fetcher = HttpFetcher::new(url, Duration::from_secs(5));

        let err = fetcher.fetch("/apis/missing").unwrap_err();
        assert!(matches!(err, PkgcatError::ResourceNotFound { ref path } if path == "/apis/missing"));
    }

    #[test]
    fn other_statuses_are_fetch_errors() {
        let (url, _head) = serve_once("HTTP/1.1 503 Service Unavailable", "{}");
        let fetcher = HttpFetcher::new(url, Duration::from_secs(5));

        let err = fetcher.fetch("/apis/x").unwrap_err();
        assert!(matches!(err, PkgcatError::Fetch { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn unreachable_server_is_fetch_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(format!("http://{}", addr), Duration::from_secs(2));
        let err = fetcher.fetch("/apis/x").unwrap_err();
        assert!(matches!(err, PkgcatError::Fetch { .. }));
    }
}
