//! Device API: wire types for the device's HTTP endpoints and the
//! `DeviceApi` seam the explorer loads through.

pub mod http;

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, warn};

use crate::error::Result;

/// Flat listing of every file and directory on the device.
pub const FILES_LIST: &str = "/api/files/list";
/// Filesystem usage summary (`fsTotal`, `fsUsed`, ...).
pub const SYSTEM_INFO: &str = "/api/system/info";
/// File download endpoint, parameterized by `?path=`.
pub const FILES_DOWNLOAD: &str = "/api/files/download";

/// One entry of the device-reported flat file list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Absolute, `/`-separated path.
    pub path: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default)]
    pub size: u64,
}

#[cfg(test)]
impl FileRecord {
    pub fn file(path: &str, size: u64) -> Self {
        Self {
            path: path.to_string(),
            is_directory: false,
            size,
        }
    }

    pub fn dir(path: &str) -> Self {
        Self {
            path: path.to_string(),
            is_directory: true,
            size: 0,
        }
    }
}

/// Body of `GET /api/files/list`. A missing or `null` `files` key is an
/// empty listing, not an error.
#[derive(Debug, Default, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    files: Option<Vec<FileRecord>>,
}

impl FileListing {
    pub fn into_records(self) -> Vec<FileRecord> {
        self.files.unwrap_or_default()
    }
}

/// Filesystem usage from `GET /api/system/info`. Other keys in the
/// response are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsUsage {
    pub fs_total: u64,
    pub fs_used: u64,
}

impl FsUsage {
    pub fn free(&self) -> u64 {
        self.fs_total.saturating_sub(self.fs_used)
    }

    /// Used share of the filesystem in percent; 0 for a zero-sized filesystem.
    pub fn used_percent(&self) -> f64 {
        if self.fs_total == 0 {
            return 0.0;
        }
        self.fs_used as f64 / self.fs_total as f64 * 100.0
    }
}

/// Everything a load or refresh fetched from the device.
///
/// The usage summary is independent of the listing: a failed usage fetch
/// yields `None` and never fails the load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    pub files: std::result::Result<Vec<FileRecord>, String>,
    pub usage: Option<FsUsage>,
}

/// Result of a background download: the local file written, or a message.
pub type DownloadResult = std::result::Result<PathBuf, String>;

/// Request/response boundary to the device.
pub trait DeviceApi: Send + Sync {
    /// Fetch the flat file listing.
    fn list_files(&self) -> Result<Vec<FileRecord>>;

    /// Fetch the filesystem usage summary.
    fn system_info(&self) -> Result<FsUsage>;

    /// Download the device file at `path` into `dest_dir`, returning the
    /// local path written.
    fn download(&self, path: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// Fetch usage then listing, the way every load and refresh does.
pub fn fetch_snapshot(api: &dyn DeviceApi) -> LoadOutcome {
    let usage = match api.system_info() {
        Ok(usage) => Some(usage),
        Err(e) => {
            warn!(error = %e, "failed to load filesystem usage");
            None
        }
    };

    let files = api.list_files().map_err(|e| {
        error!(error = %e, "failed to load file list");
        e.to_string()
    });

    LoadOutcome { files, usage }
}

/// Relative download URL for a device path, with the path percent-encoded
/// as a single query component.
pub fn download_endpoint(path: &str) -> String {
    format!("{}?path={}", FILES_DOWNLOAD, urlencoding::encode(path))
}

/// Last segment of a device path, used as the local file name.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory device used across the explorer and app tests.
    pub(crate) struct FakeDevice {
        pub files: Mutex<Option<Vec<FileRecord>>>,
        pub usage: Option<FsUsage>,
    }

    impl FakeDevice {
        pub(crate) fn new(files: Vec<FileRecord>, usage: Option<FsUsage>) -> Self {
            Self {
                files: Mutex::new(Some(files)),
                usage,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                files: Mutex::new(None),
                usage: None,
            }
        }
    }

    impl DeviceApi for FakeDevice {
        fn list_files(&self) -> Result<Vec<FileRecord>> {
            self.files
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| AppError::Http {
                    status: 500,
                    url: FILES_LIST.to_string(),
                })
        }

        fn system_info(&self) -> Result<FsUsage> {
            self.usage
                .ok_or_else(|| AppError::Transport("connection refused".into()))
        }

        fn download(&self, path: &str, dest_dir: &Path) -> Result<PathBuf> {
            let target = dest_dir.join(file_name(path));
            std::fs::write(&target, path.as_bytes())?;
            Ok(target)
        }
    }

    #[test]
    fn file_record_decodes_camel_case() {
        let json = r#"{"path":"/www/index.html","isDirectory":false,"size":512}"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, FileRecord::file("/www/index.html", 512));
    }

    #[test]
    fn file_record_missing_size_defaults_to_zero() {
        let json = r#"{"path":"/www","isDirectory":true}"#;
        let record: FileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, FileRecord::dir("/www"));
    }

    #[test]
    fn listing_without_files_is_empty() {
        let listing: FileListing = serde_json::from_str("{}").unwrap();
        assert!(listing.into_records().is_empty());
        let listing: FileListing = serde_json::from_str(r#"{"files":null}"#).unwrap();
        assert!(listing.into_records().is_empty());
    }

    #[test]
    fn usage_ignores_extra_keys() {
        let json = r#"{"fsTotal":1048576,"fsUsed":262144,"heapFree":12000,"uptime":99}"#;
        let usage: FsUsage = serde_json::from_str(json).unwrap();
        assert_eq!(usage.free(), 786432);
        assert!((usage.used_percent() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn usage_percent_of_empty_filesystem_is_zero() {
        let usage = FsUsage {
            fs_total: 0,
            fs_used: 0,
        };
        assert_eq!(usage.used_percent(), 0.0);
        assert_eq!(usage.free(), 0);
    }

    #[test]
    fn download_endpoint_encodes_path() {
        assert_eq!(
            download_endpoint("/logs/boot log.txt"),
            "/api/files/download?path=%2Flogs%2Fboot%20log.txt"
        );
        assert_eq!(
            download_endpoint("/a-b_c.~(1)&x=é"),
            "/api/files/download?path=%2Fa-b_c.~%281%29%26x%3D%C3%A9"
        );
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(file_name("/www/css/site.css"), "site.css");
        assert_eq!(file_name("top.txt"), "top.txt");
    }

    #[test]
    fn snapshot_survives_usage_failure() {
        let device = FakeDevice::new(vec![FileRecord::file("/a.txt", 3)], None);
        let outcome = fetch_snapshot(&device);
        assert_eq!(outcome.usage, None);
        assert_eq!(outcome.files.unwrap().len(), 1);
    }

    #[test]
    fn snapshot_reports_listing_failure() {
        let device = FakeDevice::failing();
        let outcome = fetch_snapshot(&device);
        assert!(outcome.files.unwrap_err().contains("HTTP 500"));
    }
}
