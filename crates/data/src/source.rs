use std::fs;
use std::path::Path;
use std::path::PathBuf;

use reqwest::blocking::Client;
use tracing::debug;

use crate::dataset::RawDataset;
use crate::error::FetchError;
use crate::error::FetchResult;

/// Retrieves raw documents by location.
///
/// Failures are surfaced immediately, there is no retry.
pub trait DataSource: Send + Sync {
    /// Fetches the document at `location` as text.
    fn fetch_text(&self, location: &str) -> FetchResult<String>;

    /// Fetches and parses the JSON document at `location`.
    fn fetch(&self, location: &str) -> FetchResult<RawDataset> {
        let text = self.fetch_text(location)?;
        let document = serde_json::from_str(&text)?;

        Ok(RawDataset::new(document))
    }
}

/// Fetches documents over HTTP.
pub struct HttpSource {
    client: Client,
    base_url: Option<String>,
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    /// Relative locations are resolved against `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    fn url(&self, location: &str) -> String {
        match self.base_url {
            Some(ref base) if !is_url(location) => format!(
                "{base}/{location}",
                base = base.trim_end_matches('/'),
                location = location.trim_start_matches("./").trim_start_matches('/')
            ),
            _ => location.to_owned(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DataSource for HttpSource {
    fn fetch_text(&self, location: &str) -> FetchResult<String> {
        let url = self.url(location);
        debug!(%url, "fetching document");

        let response = self.client.get(&url).send()?;

        match response.status() {
            status if status.is_success() => Ok(response.text()?),
            status => {
                let message = response.text().unwrap_or_default();
                Err(FetchError::Http { status, message })
            }
        }
    }
}

/// Reads documents from the local file system.
pub struct FileSource {
    base_dir: PathBuf,
}

impl FileSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl DataSource for FileSource {
    fn fetch_text(&self, location: &str) -> FetchResult<String> {
        let path = self.base_dir.join(location);
        debug!(path = %path.display(), "reading document");

        fs::read_to_string(&path).map_err(|source| FetchError::Io {
            location: path.display().to_string(),
            source,
        })
    }
}

/// A source chosen by the shape of the location: HTTP(S) URLs go over the
/// network, everything else is read from disk.
pub struct Source {
    http: HttpSource,
    file: FileSource,
}

impl Source {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            http: HttpSource::new(),
            file: FileSource::new(base_dir),
        }
    }
}

impl DataSource for Source {
    fn fetch_text(&self, location: &str) -> FetchResult<String> {
        if is_url(location) {
            self.http.fetch_text(location)
        } else {
            self.file.fetch_text(location)
        }
    }
}

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Read;
    use std::io::Write;
    use std::net::TcpListener;
    use std::thread;

    use reqwest::StatusCode;
    use serde_json::json;

    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buffer = [0u8; 1024];
            let _ = stream.read(&mut buffer);

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
                len = body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{address}")
    }

    #[test]
    fn fetch_json_over_http() {
        let base = serve_once("200 OK", r#"[{"jahr":1990,"emission":10}]"#);
        let source = HttpSource::with_base_url(base);

        let dataset = source.fetch("./data.json").unwrap();

        assert_eq!(dataset.document(), &json!([{ "jahr": 1990, "emission": 10 }]));
    }

    #[test]
    fn non_success_status_is_an_http_error() {
        let base = serve_once("404 Not Found", "");
        let source = HttpSource::new();

        let error = source.fetch(&format!("{base}/missing.json")).unwrap_err();

        assert!(matches!(error, FetchError::Http { .. }));
        assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
        assert!(error.to_string().contains("404"));
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = HttpSource::new()
            .fetch(&format!("http://{address}/data.json"))
            .unwrap_err();

        assert!(matches!(error, FetchError::Network(_)));
    }

    #[test]
    fn read_local_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("food.json"), r#"{"beef": [{"a": 1}]}"#).unwrap();

        let dataset = Source::new(dir.path()).fetch("food.json").unwrap();

        assert_eq!(dataset.document(), &json!({ "beef": [{ "a": 1 }] }));
    }

    #[test]
    fn missing_local_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        let error = FileSource::new(dir.path()).fetch("nope.json").unwrap_err();

        assert!(matches!(error, FetchError::Io { .. }));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();

        let error = FileSource::new(dir.path()).fetch("broken.json").unwrap_err();

        assert!(matches!(error, FetchError::Json(_)));
    }

    #[test]
    fn resolve_relative_urls() {
        let source = HttpSource::with_base_url("http://localhost:8080/");

        assert_eq!(source.url("./data.json"), "http://localhost:8080/data.json");
        assert_eq!(source.url("https://example.org/x.json"), "https://example.org/x.json");
    }
}
