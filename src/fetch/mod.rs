//! Download-once cache for the remote dataset.
//!
//! The cache has no TTL: once the file exists it is reused until someone
//! deletes it or runs `fetch --force`.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of [`ensure_cached`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// The file was already on disk, nothing was fetched.
    Hit,
    /// The file was downloaded and written.
    Downloaded { bytes: usize },
}

/// Downloads `url` into `path` unless `path` already exists.
#[tracing::instrument(skip(client, path), fields(path = %path.display()))]
pub fn ensure_cached<C: HttpClient>(client: &C, url: &str, path: &Path) -> Result<CacheStatus> {
    if path.exists() {
        debug!("Cache file present, skipping download");
        return Ok(CacheStatus::Hit);
    }
    refresh(client, url, path)
}

/// Downloads `url` into `path` unconditionally, replacing any previous copy.
pub fn refresh<C: HttpClient>(client: &C, url: &str, path: &Path) -> Result<CacheStatus> {
    info!(url, "Downloading dataset");
    let bytes = client
        .fetch(url)
        .with_context(|| format!("failed to download {url}"))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    // Write next to the target then rename, so a crash never leaves a
    // truncated file that later runs would treat as a valid cache.
    let partial = path.with_extension("part");
    fs::write(&partial, &bytes)
        .with_context(|| format!("failed to write {}", partial.display()))?;
    fs::rename(&partial, path)
        .with_context(|| format!("failed to move {} into place", partial.display()))?;

    info!(bytes = bytes.len(), path = %path.display(), "Dataset cached");
    Ok(CacheStatus::Downloaded { bytes: bytes.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tempfile::tempdir;

    struct CountingClient {
        calls: Cell<usize>,
        body: &'static [u8],
    }

    impl CountingClient {
        fn new(body: &'static [u8]) -> Self {
            Self {
                calls: Cell::new(0),
                body,
            }
        }
    }

    impl HttpClient for CountingClient {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.body.to_vec())
        }
    }

    struct FailingClient;

    impl HttpClient for FailingClient {
        fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            anyhow::bail!("connection refused: {url}")
        }
    }

    #[test]
    fn test_missing_file_is_downloaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let client = CountingClient::new(b"a;b\n1;2\n");

        let status = ensure_cached(&client, "http://example.test/data", &path).unwrap();

        assert_eq!(status, CacheStatus::Downloaded { bytes: 8 });
        assert_eq!(client.calls.get(), 1);
        assert_eq!(fs::read(&path).unwrap(), b"a;b\n1;2\n");
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_present_file_is_not_fetched_again() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let client = CountingClient::new(b"fresh");

        ensure_cached(&client, "http://example.test/data", &path).unwrap();
        let second = ensure_cached(&client, "http://example.test/data", &path).unwrap();

        assert_eq!(second, CacheStatus::Hit);
        assert_eq!(client.calls.get(), 1);
    }

    #[test]
    fn test_existing_file_is_kept_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "stale").unwrap();
        let client = CountingClient::new(b"fresh");

        ensure_cached(&client, "http://example.test/data", &path).unwrap();

        assert_eq!(client.calls.get(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "stale");
    }

    #[test]
    fn test_refresh_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "stale").unwrap();
        let client = CountingClient::new(b"fresh");

        refresh(&client, "http://example.test/data", &path).unwrap();

        assert_eq!(client.calls.get(), 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache/nested/data.csv");
        let client = CountingClient::new(b"x");

        ensure_cached(&client, "http://example.test/data", &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_fetch_error_leaves_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let result = ensure_cached(&FailingClient, "http://example.test/data", &path);

        assert!(result.is_err());
        assert!(!path.exists());
    }
}
