//! On-disk cache for HTTP response bodies, keyed by the sha256 of the URL.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::debug;
use sha2::{Digest, Sha256};
use tokio::fs;

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpCache {
    root: PathBuf,
    ttl: Duration,
}

impl HttpCache {
    pub fn new(root: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            root: root.into(),
            ttl,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.root.join("http").join(digest)
    }

    /// Cached body for `url`, unless missing or older than the TTL.
    pub async fn read(&self, url: &str) -> Option<Vec<u8>> {
        let path = self.path_for(url);
        let metadata = fs::metadata(&path).await.ok()?;
        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| SystemTime::now().duration_since(modified).ok())
            .unwrap_or(Duration::ZERO);
        if age > self.ttl {
            debug!("cache entry for {url} expired ({}s old)", age.as_secs());
            return None;
        }
        fs::read(&path).await.ok()
    }

    pub async fn write(&self, url: &str, bytes: &[u8]) {
        let path = self.path_for(url);
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent).await;
        }
        if let Err(err) = fs::write(&path, bytes).await {
            debug!("cache write for {url} failed: {err}");
        }
    }

    pub async fn evict(&self, url: &str) {
        let _ = fs::remove_file(self.path_for(url)).await;
    }
}
