//! Folder playlist for stepping through images.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::{Result, ViewerError};

#[derive(Debug, Default)]
pub struct Gallery {
    images: Vec<PathBuf>,
    current: Option<usize>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// List the images directly inside `dir` (no recursion), sorted by path,
    /// and select the first one.
    pub fn open_folder(&mut self, dir: &Path) -> Result<Option<&Path>> {
        if !dir.is_dir() {
            return Err(ViewerError::NotADirectory(dir.to_path_buf()));
        }

        let mut images: Vec<PathBuf> = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_image_path(path))
            .collect();
        images.sort();

        log::info!("opened {} with {} images", dir.display(), images.len());
        self.current = if images.is_empty() { None } else { Some(0) };
        self.images = images;
        Ok(self.current())
    }

    /// A single file was opened on its own; forget the playlist.
    pub fn open_single(&mut self) {
        self.images.clear();
        self.current = None;
    }

    pub fn next(&mut self) -> Option<&Path> {
        self.step(1)
    }

    pub fn prev(&mut self) -> Option<&Path> {
        self.step(-1)
    }

    pub fn current(&self) -> Option<&Path> {
        self.current.map(|i| self.images[i].as_path())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// 1-based position and total, for display.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current.map(|i| (i + 1, self.images.len()))
    }

    fn step(&mut self, delta: isize) -> Option<&Path> {
        if self.images.is_empty() {
            return None;
        }
        let len = self.images.len() as isize;
        let index = self.current.map_or(0, |i| i as isize);
        self.current = Some((index + delta).rem_euclid(len) as usize);
        self.current()
    }
}

pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"").unwrap();
        path
    }

    #[test]
    fn test_lists_sorted_images_only() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.PNG");
        touch(dir.path(), "a.jpg");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "c.webp");
        std::fs::create_dir(dir.path().join("sub.png")).unwrap();
        touch(&dir.path().join("sub.png"), "nested.png");

        let mut gallery = Gallery::new();
        let first = gallery.open_folder(dir.path()).unwrap().map(Path::to_path_buf);
        assert_eq!(first, Some(dir.path().join("a.jpg")));
        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery.position(), Some((1, 3)));
    }

    #[test]
    fn test_next_and_prev_wrap() {
        let dir = tempfile::tempdir().unwrap();
        let a = touch(dir.path(), "a.png");
        let b = touch(dir.path(), "b.png");
        let c = touch(dir.path(), "c.png");

        let mut gallery = Gallery::new();
        gallery.open_folder(dir.path()).unwrap();
        assert_eq!(gallery.prev(), Some(c.as_path()));
        assert_eq!(gallery.next(), Some(a.as_path()));
        assert_eq!(gallery.next(), Some(b.as_path()));
        assert_eq!(gallery.position(), Some((2, 3)));
    }

    #[test]
    fn test_empty_folder() {
        let dir = tempfile::tempdir().unwrap();
        let mut gallery = Gallery::new();
        assert_eq!(gallery.open_folder(dir.path()).unwrap(), None);
        assert_eq!(gallery.next(), None);
        assert_eq!(gallery.prev(), None);
        assert_eq!(gallery.position(), None);
    }

    #[test]
    fn test_single_open_clears_playlist() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.png");
        let mut gallery = Gallery::new();
        gallery.open_folder(dir.path()).unwrap();
        gallery.open_single();
        assert!(gallery.is_empty());
        assert_eq!(gallery.next(), None);
    }

    #[test]
    fn test_not_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = touch(dir.path(), "a.png");
        let mut gallery = Gallery::new();
        assert!(matches!(
            gallery.open_folder(&file),
            Err(ViewerError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_extension_filter() {
        assert!(is_image_path(Path::new("x/y.TIFF")));
        assert!(is_image_path(Path::new("y.bmp")));
        assert!(!is_image_path(Path::new("y.raw")));
        assert!(!is_image_path(Path::new("png")));
    }
}
