//! Where the app keeps its files: preferences next to the executable,
//! exports in the user's pictures folder.

use std::path::PathBuf;

/// Directory containing the running executable. Falls back to current directory if unavailable.
pub fn exe_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Default directory for exported images: `<Pictures>/MandelZoom`, or
/// `images/` next to the executable when the platform has no pictures folder.
pub fn default_export_directory() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|d| d.picture_dir().map(|p| p.join("MandelZoom")))
        .unwrap_or_else(|| exe_directory().join("images"))
}

/// Export directory honouring a user override (empty means default).
pub fn export_directory(custom: &str) -> PathBuf {
    let custom = custom.trim();
    if custom.is_empty() {
        default_export_directory()
    } else {
        PathBuf::from(custom)
    }
}
