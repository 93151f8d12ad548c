use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedpaperError>;

#[derive(Debug, Error)]
pub enum RedpaperError {
    /// The listing endpoint was unreachable or answered with something that
    /// is not a listing. Recovered by the run loop's fixed-delay retry.
    #[error("failed to fetch listing from {url}: {message}")]
    Fetch { url: String, message: String },

    /// An image could not be downloaded or written into the cache.
    #[error("failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// The external wallpaper command could not be spawned at all. The
    /// command's own exit status is never inspected.
    #[error("wallpaper command `{command}` could not be run: {source}")]
    Apply {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cache directory {} is unusable: {source}", .path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
