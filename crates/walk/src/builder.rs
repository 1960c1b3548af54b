use crate::error::WalkError;
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a traversal rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    root: PathBuf,
    follow_symlinks: bool,
    include_root: bool,
}

impl WalkBuilder {
    /// Creates a new builder that will traverse the provided root path.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            include_root: true,
        }
    }

    /// Configures whether symlinks are resolved.
    ///
    /// When enabled, links to files report the target's size and kind, and
    /// links to directories are descended into under the link's own relative
    /// path. Canonical directory paths are tracked so a link back to an
    /// ancestor is visited once.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Controls whether the root entry should be included in the output.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Builds a [`Walker`] using the configured options.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self.root, self.follow_symlinks, self.include_root)
    }
}
