use anyhow::{anyhow, Context, Result};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::sleep;

mod config;
mod fetch;
mod helper;

pub use config::Config;

/// Pause between failed download attempts
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Main Wallgrab struct owning the settings and the on-disk locations
pub struct Wallgrab {
    config: Config,
    config_location: PathBuf,
    save_location: PathBuf,
}

impl Wallgrab {
    /// Create a new Wallgrab instance with loaded configuration
    pub async fn new() -> Result<Self> {
        let config_location = helper::config_file_location();
        let config = Config::load(&config_location)
            .await
            .context("Failed to load configuration")?;

        Ok(Self {
            config,
            config_location,
            save_location: helper::wallpaper_dir_location(),
        })
    }

    /// Full run: merge the query into the settings, write them back,
    /// download the wallpaper, store it and hand it to the setter.
    pub async fn run(&mut self, query: Option<String>, max_attempts: Option<u32>) -> Result<()> {
        self.config.merge_query(query);
        self.config.save(&self.config_location).await?;

        let url = fetch::resolve_url(&self.config.url, &self.config.query);
        let wallpaper = fetch_with_retry(|| fetch::fetch(&url), max_attempts).await?;

        let saved = persist_wallpaper(&self.save_location, &wallpaper).await?;
        println!("  Saved {}", saved.display());

        self.apply().await
    }

    /// Point the background setter at the newest file in the save directory.
    async fn apply(&self) -> Result<()> {
        let Some(newest) = helper::latest_wallpaper(&self.save_location).await? else {
            return Ok(());
        };

        // feh failures (including a missing binary) are deliberately
        // ignored; on hosts without it the download still happened.
        let _ = Command::new("feh")
            .arg("--bg-fill")
            .arg("--no-xinerama")
            .arg(&newest)
            .status()
            .await;

        readback(&newest).await;
        Ok(())
    }
}

/// Keep calling `attempt` until it yields bytes, pausing between failures.
/// Without an attempt cap this loops forever, matching the upstream
/// keep-trying behavior; a cap turns exhaustion into an error.
pub async fn fetch_with_retry<F, Fut>(mut attempt: F, max_attempts: Option<u32>) -> Result<Vec<u8>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<Vec<u8>>>,
{
    let mut failed = 0u32;
    loop {
        if let Some(bytes) = attempt().await {
            return Ok(bytes);
        }

        failed += 1;
        if let Some(max) = max_attempts {
            if failed >= max {
                return Err(anyhow!("Giving up after {} failed download attempts", max));
            }
        }

        sleep(RETRY_DELAY).await;
    }
}

/// Write the downloaded bytes to a timestamp-named file under `dir`,
/// creating the directory first if needed. Returns the file path.
pub async fn persist_wallpaper(dir: impl AsRef<Path>, bytes: &[u8]) -> Result<PathBuf> {
    let dir = dir.as_ref();
    if tokio::fs::metadata(dir).await.is_err() {
        // Non-recursive: a missing parent means a broken home layout.
        tokio::fs::create_dir(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let path = dir.join(helper::timestamp_filename());
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Decode check on the applied image. The result goes unused and a
/// failure never changes the outcome of the run.
async fn readback(path: &Path) {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            if let Err(e) = image::load_from_memory(&bytes) {
                eprintln!(
                    "  Warning: {} does not decode as an image: {}",
                    path.display(),
                    e
                );
            }
        }
        Err(e) => eprintln!("  Warning: could not read back {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn retry_loop_stops_on_first_success() {
        let calls = Cell::new(0u32);
        let start = Instant::now();

        let bytes = fetch_with_retry(
            || {
                calls.set(calls.get() + 1);
                let n = calls.get();
                async move {
                    if n < 3 {
                        None
                    } else {
                        Some(b"jpegbytes".to_vec())
                    }
                }
            },
            None,
        )
        .await
        .unwrap();

        assert_eq!(bytes, b"jpegbytes");
        assert_eq!(calls.get(), 3);
        // two failed attempts, one second pause after each
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_loop_gives_up_at_the_cap() {
        let calls = Cell::new(0u32);

        let result = fetch_with_retry(
            || {
                calls.set(calls.get() + 1);
                async { None }
            },
            Some(3),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test]
    async fn persist_creates_dir_and_distinct_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("wallpapers");

        let first = persist_wallpaper(&dir, b"one").await.unwrap();
        let second = persist_wallpaper(&dir, b"two").await.unwrap();
        assert_ne!(first, second);

        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name());
        }
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn persist_fails_when_parent_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("missing").join("wallpapers");
        assert!(persist_wallpaper(&dir, b"img").await.is_err());
    }
}
