//! Build cache layout on the server side
//!
//! One directory under the repository's hook data area holds everything this
//! hook writes: a private extraction directory per commit, plus one shared
//! `build/` subdirectory that test runs use as their build-output location so
//! dependency artifacts survive from one commit's test run to the next.
//!
//! The root is created with mode 775. The directory owner is whichever user
//! pushed first; later pushes may run as different users and still need to
//! write here, so the group must have full rights.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BUILD_SUBDIR: &str = "build";

/// Process-wide cache root shared by all commits of a push.
pub struct BuildCache {
    root: PathBuf,
    build_dir: PathBuf,
}

impl BuildCache {
    /// Create (or reuse) the cache root and its shared build subdirectory.
    pub fn create(root: &Path) -> Result<Self> {
        fs::create_dir_all(root)
            .with_context(|| format!("failed to create cache directory {}", root.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o775);
            fs::set_permissions(root, perms)
                .with_context(|| format!("failed to set permissions on {}", root.display()))?;
        }

        let build_dir = root.join(BUILD_SUBDIR);
        fs::create_dir_all(&build_dir).with_context(|| {
            format!("failed to create build directory {}", build_dir.display())
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            build_dir,
        })
    }

    /// Allocate a fresh private extraction directory for one commit,
    /// prefixed by its hash for operator-friendly inspection. The directory
    /// is removed when the returned handle drops, i.e. at process end once
    /// the owning commit goes away.
    pub fn extraction_dir(&self, hash: &str) -> Result<TempDir> {
        tempfile::Builder::new()
            .prefix(hash)
            .tempdir_in(&self.root)
            .with_context(|| {
                format!(
                    "failed to create extraction directory for {} under {}",
                    hash,
                    self.root.display()
                )
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared build-artifact directory, reused across all test runs of a push.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }
}
