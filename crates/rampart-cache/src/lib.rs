//! Result cache
//!
//! A keyed blob store with time-based expiry. Keys are SHA-256 digests
//! of the raw manifest text; values are serialised analysis responses.
//! Every failure is swallowed: the cache is never allowed to break an
//! analysis, it can only make one cheaper.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

/// SHA-256 hex digest of a manifest, the cache key format.
pub fn manifest_hash(manifest: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(manifest.as_bytes());
    hex::encode(hasher.finalize())
}

/// Stored cache record: the serialised result plus its expiry time.
#[derive(Debug, Serialize, Deserialize)]
struct CacheRecord {
    result: String,
    #[serde(rename = "expiresAt")]
    expires_at: i64,
}

/// Keyed blob store with expiry. Entries at or past their expiry time
/// are treated as absent.
pub trait ResultCache {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str, ttl_seconds: i64);
}

/// Disk-backed cache, one JSON record per key.
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: PathBuf) -> Self {
        let _ = fs::create_dir_all(&dir);
        Self { dir }
    }

    /// Default store location: `$RAMPART_CACHE_DIR`, or the platform
    /// cache directory under `rampart/results`.
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("RAMPART_CACHE_DIR") {
            return PathBuf::from(dir);
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rampart")
            .join("results")
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are hex digests; sanitise anyway so arbitrary keys can
        // not escape the store directory.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl ResultCache for DiskCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        let contents = fs::read_to_string(&path).ok()?;
        let record: CacheRecord = serde_json::from_str(&contents).ok()?;
        if record.expires_at <= unix_now() {
            debug!(key, "cache entry expired");
            let _ = fs::remove_file(&path);
            return None;
        }
        Some(record.result)
    }

    fn put(&self, key: &str, value: &str, ttl_seconds: i64) {
        let record = CacheRecord {
            result: value.to_string(),
            expires_at: unix_now() + ttl_seconds,
        };
        let Ok(serialised) = serde_json::to_string(&record) else {
            return;
        };
        if let Err(err) = fs::write(self.entry_path(key), serialised) {
            debug!(key, %err, "cache write failed");
        }
    }
}

/// No-op cache for callers that want every analysis fresh.
pub struct NoCache;

impl ResultCache for NoCache {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn put(&self, _key: &str, _value: &str, _ttl_seconds: i64) {}
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
