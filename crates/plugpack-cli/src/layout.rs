//! Fixed on-disk layout of a project being packaged.

use std::path::{Path, PathBuf};

/// Directory, relative to the project root, where the final archive and
/// the staging tree live
pub const BUILD_DIR: &str = "build";

/// Staging directory, relative to the project root: the working tree
/// assembled during the pipeline and ultimately compressed into the
/// distributable
pub const STAGING_DIR: &str = "build/plugin";

/// File extension of the final distributable archive
pub const DIST_EXTENSION: &str = "ppk";

/// Application-entry source roots scanned for registration call sites
pub const APP_SOURCE_ROOTS: &[&str] = &["android/app/src/main/java", "android/app/src/main/kotlin"];

/// Where the native toolchain deposits produced binaries
pub const GRADLE_OUTPUTS_DIR: &str = "android/app/build/outputs";

/// Resolved paths for one project
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: &Path) -> Self {
        ProjectLayout {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    pub fn node_modules(&self) -> PathBuf {
        self.root.join("node_modules")
    }

    pub fn android_dir(&self) -> PathBuf {
        self.root.join("android")
    }

    pub fn app_source_roots(&self) -> Vec<PathBuf> {
        APP_SOURCE_ROOTS.iter().map(|rel| self.root.join(rel)).collect()
    }

    pub fn gradle_outputs_dir(&self) -> PathBuf {
        self.root.join(GRADLE_OUTPUTS_DIR)
    }

    /// Intermediate archive path produced by compression
    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.build_dir().join(format!("{}.tar.gz", name))
    }

    /// Final distributable path the archive is renamed to
    pub fn dist_path(&self, name: &str) -> PathBuf {
        self.build_dir().join(format!("{}.{}", name, DIST_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_paths() {
        let layout = ProjectLayout::new(Path::new("/proj"));
        assert_eq!(layout.staging_dir(), PathBuf::from("/proj/build/plugin"));
        assert_eq!(
            layout.dist_path("my-plugin"),
            PathBuf::from("/proj/build/my-plugin.ppk")
        );
        assert_eq!(layout.app_source_roots().len(), 2);
    }
}
