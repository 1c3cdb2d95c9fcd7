use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{
    download_endpoint, file_name, DeviceApi, FileListing, FileRecord, FsUsage, FILES_LIST,
    SYSTEM_INFO,
};
use crate::error::{AppError, Result};

/// Blocking HTTP client for a device reachable at `base_url`.
pub struct HttpDevice {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpDevice {
    /// Create a client. The base URL must be `http://` or `https://`; a
    /// trailing slash is dropped.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let has_host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .is_some_and(|host| !host.is_empty());
        if !has_host {
            return Err(AppError::InvalidUrl(base_url.to_string()));
        }

        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Ok(Self {
            base_url: trimmed.to_string(),
            agent,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        debug!(%url, "GET");
        let response = self
            .agent
            .get(&url)
            .set("Cache-Control", "no-cache")
            .call()?;
        let body = response.into_string()?;
        serde_json::from_str(&body).map_err(|e| AppError::Decode(format!("{}: {}", endpoint, e)))
    }
}

impl DeviceApi for HttpDevice {
    fn list_files(&self) -> Result<Vec<FileRecord>> {
        let listing: FileListing = self.get_json(FILES_LIST)?;
        Ok(listing.into_records())
    }

    fn system_info(&self) -> Result<FsUsage> {
        self.get_json(SYSTEM_INFO)
    }

    fn download(&self, path: &str, dest_dir: &Path) -> Result<PathBuf> {
        let name = file_name(path);
        if name.is_empty() || name == "." || name == ".." {
            return Err(AppError::InvalidPath(path.to_string()));
        }

        let url = self.url(&download_endpoint(path));
        debug!(%url, "GET");
        let response = self.agent.get(&url).call()?;

        fs::create_dir_all(dest_dir)?;
        // Stream into a temp file next to the target so a dropped
        // connection never leaves a truncated file behind.
        let mut partial = NamedTempFile::new_in(dest_dir)?;
        let bytes = io::copy(&mut response.into_reader(), partial.as_file_mut())?;

        let target = free_target(dest_dir, name);
        partial
            .persist_noclobber(&target)
            .map_err(|e| AppError::Io(e.error))?;
        info!(path, target = %target.display(), bytes, "download complete");
        Ok(target)
    }
}

/// `dest_dir/name`, or `name (1)`, `name (2)`, ... when that is taken.
fn free_target(dest_dir: &Path, name: &str) -> PathBuf {
    let candidate = dest_dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (1..)
        .map(|n| match ext {
            Some(ext) => dest_dir.join(format!("{} ({}).{}", stem, n, ext)),
            None => dest_dir.join(format!("{} ({})", stem, n)),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve exactly one HTTP response on a local port; the request line is
    /// sent back through the returned channel.
    fn serve_once(status: &str, body: &'static str) -> (String, mpsc::Receiver<String>) {
        serve_raw(format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        ))
    }

    /// Like `serve_once`, but writes `response` verbatim.
    fn serve_raw(response: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            tx.send(request_line.trim_end().to_string()).unwrap();

            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });

        (format!("http://{}", addr), rx)
    }

    fn device(base: &str) -> HttpDevice {
        HttpDevice::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_non_http_base_url() {
        assert!(matches!(
            HttpDevice::new("device.local", Duration::from_secs(1)),
            Err(AppError::InvalidUrl(_))
        ));
        assert!(matches!(
            HttpDevice::new("http://", Duration::from_secs(1)),
            Err(AppError::InvalidUrl(_))
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let dev = device("http://192.168.4.1/");
        assert_eq!(dev.base_url(), "http://192.168.4.1");
        assert_eq!(dev.url(FILES_LIST), "http://192.168.4.1/api/files/list");
    }

    #[test]
    fn list_files_decodes_listing() {
        let (base, requests) = serve_once(
            "200 OK",
            r#"{"files":[{"path":"/a","isDirectory":true,"size":0},{"path":"/a/b.txt","isDirectory":false,"size":100}]}"#,
        );
        let files = device(&base).list_files().unwrap();
        assert_eq!(
            files,
            vec![FileRecord::dir("/a"), FileRecord::file("/a/b.txt", 100)]
        );
        assert_eq!(requests.recv().unwrap(), "GET /api/files/list HTTP/1.1");
    }

    #[test]
    fn system_info_decodes_usage() {
        let (base, _requests) = serve_once("200 OK", r#"{"fsTotal":2048,"fsUsed":1024,"chip":"esp32"}"#);
        let usage = device(&base).system_info().unwrap();
        assert_eq!(
            usage,
            FsUsage {
                fs_total: 2048,
                fs_used: 1024
            }
        );
    }

    #[test]
    fn non_success_status_is_http_error() {
        let (base, _requests) = serve_once("503 Service Unavailable", "{}");
        let err = device(&base).list_files().unwrap_err();
        assert!(matches!(err, AppError::Http { status: 503, .. }));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let (base, _requests) = serve_once("200 OK", "not json");
        let err = device(&base).system_info().unwrap_err();
        assert!(matches!(err, AppError::Decode(_)));
    }

    #[test]
    fn download_writes_file_and_encodes_path() {
        let (base, requests) = serve_once("200 OK", "hello device");
        let dir = tempfile::tempdir().unwrap();
        let target = device(&base)
            .download("/logs/boot log.txt", dir.path())
            .unwrap();
        assert_eq!(target, dir.path().join("boot log.txt"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello device");
        assert_eq!(
            requests.recv().unwrap(),
            "GET /api/files/download?path=%2Flogs%2Fboot%20log.txt HTTP/1.1"
        );
    }

    #[test]
    fn truncated_download_leaves_no_file() {
        let (base, _requests) = serve_raw(
            "HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\npartial"
                .to_string(),
        );
        let dir = tempfile::tempdir().unwrap();
        let result = device(&base).download("/logs/boot.log", dir.path());
        assert!(result.is_err());
        assert!(!dir.path().join("boot.log").exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn download_keeps_existing_local_file() {
        let (base, _requests) = serve_once("200 OK", "new contents");
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("boot.log"), "old contents").unwrap();

        let target = device(&base).download("/logs/boot.log", dir.path()).unwrap();
        assert_eq!(target, dir.path().join("boot (1).log"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "new contents");
        assert_eq!(
            fs::read_to_string(dir.path().join("boot.log")).unwrap(),
            "old contents"
        );
    }

    #[test]
    fn free_target_numbers_collisions() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(free_target(dir.path(), "README"), dir.path().join("README"));
        fs::write(dir.path().join("README"), "").unwrap();
        fs::write(dir.path().join("README (1)"), "").unwrap();
        assert_eq!(
            free_target(dir.path(), "README"),
            dir.path().join("README (2)")
        );
        fs::write(dir.path().join(".env"), "").unwrap();
        assert_eq!(free_target(dir.path(), ".env"), dir.path().join(".env (1)"));
    }

    #[test]
    fn download_rejects_directory_like_paths() {
        let dir = tempfile::tempdir().unwrap();
        let dev = device("http://127.0.0.1:9");
        assert!(matches!(
            dev.download("/logs/", dir.path()),
            Err(AppError::InvalidPath(_))
        ));
        assert!(matches!(
            dev.download("/logs/..", dir.path()),
            Err(AppError::InvalidPath(_))
        ));
    }
}
