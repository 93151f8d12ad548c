use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use reqwest::Client;
use sha2::{Digest, Sha256};
use walkdir::{DirEntry, WalkDir};

use crate::error::{RedpaperError, Result};

const TEMP_SUFFIX: &str = ".part";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Downloaded,
}

#[derive(Debug)]
pub struct Resolved {
    pub path: PathBuf,
    pub outcome: CacheOutcome,
}

/// Write-once cache keyed by a hash of the link. Entries are never
/// invalidated or refreshed, even if the remote content changes.
pub struct WallpaperCache {
    dir: PathBuf,
}

impl WallpaperCache {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| RedpaperError::CacheDir {
            path: dir.clone(),
            source,
        })?;
        Ok(WallpaperCache { dir })
    }

    pub fn entry_path(&self, link: &str) -> PathBuf {
        self.dir.join(cache_key(link))
    }

    /// Local path for the link, downloading on a miss. A hit touches no
    /// network at all.
    pub async fn resolve(&self, client: &Client, link: &str) -> Result<Resolved> {
        let path = self.entry_path(link);
        if path.exists() {
            return Ok(Resolved {
                path,
                outcome: CacheOutcome::Hit,
            });
        }
        download_to(client, link, &path).await?;
        Ok(Resolved {
            path,
            outcome: CacheOutcome::Downloaded,
        })
    }

    pub fn count(&self) -> usize {
        WalkDir::new(&self.dir)
            .follow_links(false)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_entry(|entry| !is_hidden(entry))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .count()
    }
}

/// Cache key for a link: hex digest of the link string plus the jpg
/// extension. Pure in the link value, independent of the content behind it.
pub fn cache_key(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    format!("{}.jpg", hex::encode(hasher.finalize()))
}

// Downloads into a sibling temp file and renames into place, so a failed
// download never occupies the cache key's path.
async fn download_to(client: &Client, link: &str, path: &Path) -> Result<()> {
    let download_err = |message: String| RedpaperError::Download {
        url: link.to_string(),
        message,
    };

    let response = client
        .get(link)
        .send()
        .await
        .map_err(|err| download_err(err.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(download_err(format!("server answered {}", status)));
    }
    let data = response
        .bytes()
        .await
        .map_err(|err| download_err(err.to_string()))?;

    let temp_path = PathBuf::from(format!("{}{}", path.display(), TEMP_SUFFIX));
    if let Err(err) = write_file(&temp_path, &data) {
        let _ = fs::remove_file(&temp_path);
        return Err(download_err(err.to_string()));
    }
    fs::rename(&temp_path, path).map_err(|err| {
        let _ = fs::remove_file(&temp_path);
        download_err(err.to_string())
    })
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.flush()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_is_deterministic_and_link_pure() {
        let link = "http://x/img.jpg";
        assert_eq!(cache_key(link), cache_key(link));
        assert_ne!(cache_key(link), cache_key("http://x/other.jpg"));
        assert!(cache_key(link).ends_with(".jpg"));
        // 32-byte digest as hex plus the extension
        assert_eq!(cache_key(link).len(), 64 + 4);
    }

    #[test]
    fn open_creates_the_directory() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("wallpapers");
        WallpaperCache::open(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn count_skips_hidden_entries() {
        let root = tempfile::tempdir().unwrap();
        let cache = WallpaperCache::open(root.path()).unwrap();
        fs::write(root.path().join(".DS_Store"), b"x").unwrap();
        assert_eq!(cache.count(), 0);
        fs::write(root.path().join(cache_key("http://x/a.jpg")), b"jpg").unwrap();
        assert_eq!(cache.count(), 1);
    }

    #[tokio::test]
    async fn resolve_returns_existing_entries_without_network() {
        let root = tempfile::tempdir().unwrap();
        let cache = WallpaperCache::open(root.path()).unwrap();
        let link = "http://nonexistent.invalid/img.jpg";
        fs::write(cache.entry_path(link), b"jpg bytes").unwrap();

        // The host is unresolvable, so any network access would error out.
        let client = Client::new();
        let resolved = cache.resolve(&client, link).await.unwrap();
        assert_eq!(resolved.outcome, CacheOutcome::Hit);
        assert_eq!(resolved.path, cache.entry_path(link));

        let again = cache.resolve(&client, link).await.unwrap();
        assert_eq!(again.path, resolved.path);
        assert_eq!(cache.count(), 1);
    }

    #[tokio::test]
    async fn failed_download_leaves_no_file_behind() {
        let root = tempfile::tempdir().unwrap();
        let cache = WallpaperCache::open(root.path()).unwrap();
        let link = "http://nonexistent.invalid/img.jpg";

        let client = Client::new();
        let result = cache.resolve(&client, link).await;
        assert!(matches!(result, Err(RedpaperError::Download { .. })));
        assert!(!cache.entry_path(link).exists());
        assert_eq!(cache.count(), 0);
    }
}
