use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved kind of a traversed entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// A regular file, or a followed link to one.
    File,
    /// A directory, or a followed link to one.
    Directory,
    /// Anything else: unfollowed or dangling links, sockets, devices.
    Other,
}

/// Result of a traversal step.
#[derive(Debug)]
pub struct WalkEntry {
    pub(crate) full_path: PathBuf,
    pub(crate) relative_path: PathBuf,
    pub(crate) metadata: fs::Metadata,
    pub(crate) target: Option<fs::Metadata>,
    pub(crate) depth: usize,
    pub(crate) is_root: bool,
}

impl WalkEntry {
    /// Returns the absolute path to the entry.
    #[must_use]
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// Returns the path relative to the traversal root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Provides the metadata of the entry itself, without following links.
    #[must_use]
    pub const fn metadata(&self) -> &fs::Metadata {
        &self.metadata
    }

    /// Returns the metadata that decides [`kind`](Self::kind): the link
    /// target when one was resolved, the entry's own metadata otherwise.
    #[must_use]
    pub fn resolved_metadata(&self) -> &fs::Metadata {
        self.target.as_ref().unwrap_or(&self.metadata)
    }

    /// Reports whether the entry is a symlink.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.metadata.file_type().is_symlink()
    }

    /// Classifies the entry, looking through followed symlinks.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        let file_type = self.resolved_metadata().file_type();
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }

    /// Returns the byte length of the entry, looking through followed symlinks.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.resolved_metadata().len()
    }

    /// Reports whether [`len`](Self::len) is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the final component of the relative path.
    ///
    /// The root entry yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    /// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
    /// let temp = tempfile::tempdir()?;
    /// let root = temp.path().join("root");
    /// std::fs::create_dir(&root)?;
    /// let mut walker = WalkBuilder::new(&root).build()?;
    /// let entry = walker.next().unwrap()?;
    /// assert!(entry.metadata().is_dir());
    /// assert!(entry.file_name().is_none());
    /// # Ok(())
    /// # }
    /// # demo().unwrap();
    /// ```
    #[must_use]
    pub fn file_name(&self) -> Option<&OsStr> {
        if self.is_root {
            None
        } else {
            self.relative_path.file_name()
        }
    }

    /// Reports the depth of the entry relative to the root (root depth is `0`).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Indicates whether this entry corresponds to the traversal root.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.is_root
    }
}
