//! Desktop file selection
//!
//! Files come from the command line, from drag and drop onto the window, or
//! from rescanning an import directory when the user asks for an import.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::core::Result;
use crate::host::FilePicker;

const SKELETON_EXTENSIONS: &[&str] = &["skel", "json"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

/// What a file on disk can be used as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileKind {
    Skeleton,
    Atlas,
    Image,
}

impl FileKind {
    /// Classify by extension, ignoring case
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        if SKELETON_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Skeleton)
        } else if ext == "atlas" {
            Some(FileKind::Atlas)
        } else if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileKind::Image)
        } else {
            None
        }
    }
}

/// File picker for desktop platforms
#[derive(Debug, Default)]
pub struct DesktopFilePicker {
    file: Option<PathBuf>,
    background: Option<PathBuf>,
    import_dir: Option<PathBuf>,
}

impl DesktopFilePicker {
    pub fn new(file: Option<PathBuf>, background: Option<PathBuf>, import_dir: Option<PathBuf>) -> Self {
        Self { file, background, import_dir }
    }

    /// Take a file dropped onto the window
    ///
    /// An atlas selects the skeleton next to it. Returns what the file was
    /// used as, or `None` if it was ignored.
    pub fn accept_dropped(&mut self, path: &Path) -> Option<FileKind> {
        let kind = FileKind::of(path)?;
        match kind {
            FileKind::Skeleton => self.file = Some(path.to_path_buf()),
            FileKind::Image => self.background = Some(path.to_path_buf()),
            FileKind::Atlas => {
                let skeleton = SKELETON_EXTENSIONS
                    .iter()
                    .map(|ext| path.with_extension(ext))
                    .find(|candidate| candidate.is_file());
                match skeleton {
                    Some(skeleton) => self.file = Some(skeleton),
                    None => {
                        log::warn!("No skeleton next to {}", path.display());
                        return None;
                    }
                }
            }
        }
        log::info!("Accepted dropped {:?}: {}", kind, path.display());
        Some(kind)
    }

    /// Select the newest skeleton with an atlas and the newest image in `dir`
    ///
    /// Selections are only replaced when a candidate is found. Returns
    /// whether anything changed.
    pub fn scan(&mut self, dir: &Path) -> Result<bool> {
        let mut newest_skeleton: Option<(SystemTime, PathBuf)> = None;
        let mut newest_image: Option<(SystemTime, PathBuf)> = None;

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let slot = match FileKind::of(&path) {
                Some(FileKind::Skeleton) if path.with_extension("atlas").is_file() => &mut newest_skeleton,
                Some(FileKind::Image) => &mut newest_image,
                _ => continue,
            };
            let modified = entry.metadata()?.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            if slot.as_ref().is_none_or(|(time, _)| modified > *time) {
                *slot = Some((modified, path));
            }
        }

        let mut changed = false;
        if let Some((_, path)) = newest_skeleton {
            changed |= self.file.as_ref() != Some(&path);
            self.file = Some(path);
        }
        if let Some((_, path)) = newest_image {
            changed |= self.background.as_ref() != Some(&path);
            self.background = Some(path);
        }
        Ok(changed)
    }
}

impl FilePicker for DesktopFilePicker {
    fn current_file(&self) -> Option<PathBuf> {
        self.file.clone()
    }

    fn current_background(&self) -> Option<PathBuf> {
        self.background.clone()
    }

    fn import_files(&mut self) {
        let Some(dir) = self.import_dir.clone() else {
            log::info!("Drop a .skel/.json skeleton or an image onto the window to import it");
            return;
        };
        match self.scan(&dir) {
            Ok(true) => log::info!("Imported from {}", dir.display()),
            Ok(false) => log::info!("Nothing new in {}", dir.display()),
            Err(e) => log::error!("Failed to scan {}: {}", dir.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;
    use tempfile::TempDir;

    fn touch(path: &Path, age_secs: u64) {
        let file = File::create(path).expect("create failed");
        let time = SystemTime::now() - Duration::from_secs(age_secs);
        file.set_modified(time).expect("set_modified failed");
    }

    #[test]
    fn test_classify() {
        assert_eq!(FileKind::of(Path::new("a.SKEL")), Some(FileKind::Skeleton));
        assert_eq!(FileKind::of(Path::new("a.json")), Some(FileKind::Skeleton));
        assert_eq!(FileKind::of(Path::new("a.atlas")), Some(FileKind::Atlas));
        assert_eq!(FileKind::of(Path::new("a.Jpeg")), Some(FileKind::Image));
        assert_eq!(FileKind::of(Path::new("a.txt")), None);
        assert_eq!(FileKind::of(Path::new("noext")), None);
    }

    #[test]
    fn test_drop_selects_by_kind() {
        let mut picker = DesktopFilePicker::default();
        assert_eq!(picker.accept_dropped(Path::new("/x/hero.skel")), Some(FileKind::Skeleton));
        assert_eq!(picker.accept_dropped(Path::new("/x/sky.png")), Some(FileKind::Image));
        assert_eq!(picker.accept_dropped(Path::new("/x/notes.txt")), None);

        assert_eq!(picker.current_file(), Some(PathBuf::from("/x/hero.skel")));
        assert_eq!(picker.current_background(), Some(PathBuf::from("/x/sky.png")));
    }

    #[test]
    fn test_drop_atlas_selects_sibling_skeleton() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let atlas = temp_dir.path().join("hero.atlas");
        touch(&atlas, 0);
        touch(&temp_dir.path().join("hero.json"), 0);

        let mut picker = DesktopFilePicker::default();
        assert_eq!(picker.accept_dropped(&atlas), Some(FileKind::Atlas));
        assert_eq!(picker.current_file(), Some(temp_dir.path().join("hero.json")));

        let lonely = temp_dir.path().join("lonely.atlas");
        touch(&lonely, 0);
        assert_eq!(picker.accept_dropped(&lonely), None);
        assert_eq!(picker.current_file(), Some(temp_dir.path().join("hero.json")));
    }

    #[test]
    fn test_import_picks_newest_complete_skeleton() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let dir = temp_dir.path();
        touch(&dir.join("old.skel"), 100);
        touch(&dir.join("old.atlas"), 100);
        touch(&dir.join("new.skel"), 10);
        touch(&dir.join("new.atlas"), 10);
        // Newest, but has no atlas
        touch(&dir.join("orphan.json"), 0);
        touch(&dir.join("a.png"), 50);
        touch(&dir.join("b.jpg"), 5);

        let mut picker = DesktopFilePicker::new(None, None, Some(dir.to_path_buf()));
        picker.import_files();

        assert_eq!(picker.current_file(), Some(dir.join("new.skel")));
        assert_eq!(picker.current_background(), Some(dir.join("b.jpg")));
        assert!(!picker.scan(dir).expect("scan failed"));
    }

    #[test]
    fn test_import_keeps_selection_when_nothing_found() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let mut picker = DesktopFilePicker::new(
            Some(PathBuf::from("/cli/hero.skel")),
            None,
            Some(temp_dir.path().to_path_buf()),
        );
        picker.import_files();
        assert_eq!(picker.current_file(), Some(PathBuf::from("/cli/hero.skel")));
        assert_eq!(picker.current_background(), None);
    }

    #[test]
    fn test_scan_missing_dir_is_error() {
        let mut picker = DesktopFilePicker::default();
        assert!(picker.scan(Path::new("/definitely/not/here")).is_err());
        // import_files only logs
        picker.import_files();
    }
}
