use anyhow::{Context, Result};
use eframe::egui::DroppedFile;
use posture_review_common::{SelectedFile, VIDEO_EXTENSIONS};
use std::path::{Path, PathBuf};

pub fn pick_video() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("Video", VIDEO_EXTENSIONS)
        .pick_file()
}

pub fn load_video(path: &Path) -> Result<SelectedFile> {
    SelectedFile::from_path(path).with_context(|| format!("read {}", path.display()))
}

/// Dropped files carry bytes on the web and only a path on native.
pub fn load_dropped(file: &DroppedFile) -> Result<SelectedFile> {
    if let Some(bytes) = &file.bytes {
        let name = if file.name.is_empty() { "dropped-video" } else { file.name.as_str() };
        return Ok(SelectedFile::new(name, bytes.to_vec()).with_mime(file.mime.clone()));
    }
    let path = file
        .path
        .as_deref()
        .context("dropped file has neither bytes nor a path")?;
    load_video(path)
}
