use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem operation that was in progress when traversal failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WalkAction {
    /// Querying metadata for the traversal root.
    InspectRoot,
    /// Opening a directory for reading.
    ReadDir,
    /// Reading the next entry of an open directory.
    ReadEntry,
    /// Querying metadata for an entry.
    InspectEntry,
    /// Resolving a directory to its canonical path.
    Canonicalize,
}

impl WalkAction {
    /// Returns the verb phrase used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InspectRoot => "inspect traversal root",
            Self::ReadDir => "read directory",
            Self::ReadEntry => "read entry in",
            Self::InspectEntry => "inspect metadata for",
            Self::Canonicalize => "canonicalize",
        }
    }
}

impl fmt::Display for WalkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when traversal fails.
#[derive(Debug)]
pub struct WalkError {
    action: WalkAction,
    path: PathBuf,
    source: io::Error,
}

impl WalkError {
    pub(crate) const fn new(action: WalkAction, path: PathBuf, source: io::Error) -> Self {
        Self {
            action,
            path,
            source,
        }
    }

    /// Returns the operation that failed.
    #[must_use]
    pub const fn action(&self) -> WalkAction {
        self.action
    }

    /// Returns the filesystem path associated with the error.
    ///
    /// # Examples
    ///
    /// ```
    /// use walk::WalkBuilder;
    ///
    /// let error = match WalkBuilder::new("./definitely_missing_root").build() {
    ///     Ok(_) => panic!("missing root yields error"),
    ///     Err(error) => error,
    /// };
    /// assert!(error.path().ends_with("definitely_missing_root"));
    /// ```
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the underlying I/O error kind.
    #[must_use]
    pub fn io_kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Consumes the error and returns the underlying I/O error.
    #[must_use]
    pub fn into_io(self) -> io::Error {
        self.source
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.action,
            self.path.display(),
            self.source
        )
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}
