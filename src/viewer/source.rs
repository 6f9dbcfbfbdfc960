//! Skeleton file resolution

use std::path::{Path, PathBuf};

/// Encoding of a skeleton definition file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkeletonFormat {
    /// `.skel` binary export
    Binary,
    /// Textual (JSON) export
    Json,
}

/// A skeleton definition together with its texture atlas
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkeletonSource {
    pub skeleton: PathBuf,
    pub atlas: PathBuf,
    pub format: SkeletonFormat,
}

impl SkeletonSource {
    /// Resolve the atlas and format for a skeleton file
    ///
    /// A `skel` extension (any case) selects the binary format; anything else
    /// is read as text. The atlas shares the skeleton's base name.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let skeleton = path.as_ref().to_path_buf();
        let format = match skeleton.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("skel") => SkeletonFormat::Binary,
            _ => SkeletonFormat::Json,
        };
        let atlas = skeleton.with_extension("atlas");
        Self { skeleton, atlas, format }
    }

    /// The first of the skeleton and atlas files that is not on disk
    pub fn missing_file(&self) -> Option<&Path> {
        [&self.skeleton, &self.atlas]
            .into_iter()
            .find(|path| !path.is_file())
            .map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_source() {
        let source = SkeletonSource::from_path("/data/spineboy-pro.skel");
        assert_eq!(source.format, SkeletonFormat::Binary);
        assert_eq!(source.atlas, PathBuf::from("/data/spineboy-pro.atlas"));
    }

    #[test]
    fn test_json_source() {
        let source = SkeletonSource::from_path("raptor.json");
        assert_eq!(source.format, SkeletonFormat::Json);
        assert_eq!(source.atlas, PathBuf::from("raptor.atlas"));
    }

    #[test]
    fn test_uppercase_extension_is_binary() {
        assert_eq!(SkeletonSource::from_path("HERO.SKEL").format, SkeletonFormat::Binary);
    }

    #[test]
    fn test_dotted_base_name_keeps_prefix() {
        let source = SkeletonSource::from_path("chars/goblin.v2.json");
        assert_eq!(source.atlas, PathBuf::from("chars/goblin.v2.atlas"));
    }

    #[test]
    fn test_missing_file_reports_atlas() {
        let dir = tempfile::TempDir::new().expect("failed to create temp dir");
        let skel = dir.path().join("owl.skel");
        let source = SkeletonSource::from_path(&skel);
        assert_eq!(source.missing_file(), Some(skel.as_path()));

        std::fs::write(&skel, b"skel").expect("write failed");
        assert_eq!(source.missing_file(), Some(dir.path().join("owl.atlas").as_path()));

        std::fs::write(dir.path().join("owl.atlas"), b"atlas").expect("write failed");
        assert_eq!(source.missing_file(), None);
    }
}
