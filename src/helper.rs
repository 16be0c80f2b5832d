use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

/// Get the home directory path
pub fn get_home_location() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
}

/// Fixed location of the settings file
pub fn config_file_location() -> PathBuf {
    get_home_location().join(".config").join("wallpaper.json")
}

/// Fixed directory where downloaded wallpapers accumulate
pub fn wallpaper_dir_location() -> PathBuf {
    get_home_location().join(".wallpaper")
}

/// File name for a freshly downloaded wallpaper: the current local time at
/// microsecond precision. Fixed-width and zero-padded, so lexicographic
/// order of file names equals chronological order.
pub fn timestamp_filename() -> String {
    format!("{}.jpg", Local::now().format("%Y-%m-%dT%H:%M:%S%.6f"))
}

/// Newest file in `dir` going by name, or `None` for an empty directory.
pub async fn latest_wallpaper(dir: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to list {}", dir.display()))?;

    let mut names: Vec<String> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    names.sort_unstable();
    Ok(names.pop().map(|name| dir.join(name)))
}
