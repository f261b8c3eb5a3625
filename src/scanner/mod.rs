use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::tags::Container;

/// Collect the audio files a command should work on.
///
/// A file path is returned as-is when its extension names a supported
/// container (mp3, flac, m4a, mp4; case-insensitive). A directory yields its
/// supported files, descending into subdirectories only when `recursive`.
/// Results are sorted so batch reports are stable.
pub fn collect_audio_files(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return if is_supported(root) {
            Ok(vec![root.to_path_buf()])
        } else {
            Err(Error::unsupported(root))
        };
    }
    if !root.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", root.display()),
        )));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    tracing::debug!("Collected {} audio files under {:?}", files.len(), root);
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    Container::from_extension(path).is_some()
}
