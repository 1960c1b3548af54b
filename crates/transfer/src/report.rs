//! Summary of a completed top-level transfer.

use std::fmt;

/// Which way the bytes moved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Remote to local.
    Download,
    /// Local to remote.
    Upload,
}

impl Direction {
    /// Lowercase name used in log fields and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the source was a single file or a folder tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferKind {
    /// A single regular file.
    File,
    /// A directory and everything beneath it.
    Folder,
}

impl TransferKind {
    /// Lowercase name used in log fields and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

/// Outcome of a successful [`download`](crate::download) or
/// [`upload`](crate::upload).
///
/// `transferred_bytes` normally equals `expected_bytes`. They differ only when
/// the server misreports sizes, which is not treated as an error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferReport {
    direction: Direction,
    kind: TransferKind,
    expected_bytes: u64,
    transferred_bytes: u64,
    files: usize,
    directories: usize,
}

impl TransferReport {
    pub(crate) const fn new(direction: Direction, kind: TransferKind, expected_bytes: u64) -> Self {
        Self {
            direction,
            kind,
            expected_bytes,
            transferred_bytes: 0,
            files: 0,
            directories: 0,
        }
    }

    pub(crate) const fn record_file(&mut self) {
        self.files += 1;
    }

    pub(crate) const fn record_directory(&mut self) {
        self.directories += 1;
    }

    pub(crate) const fn finish(mut self, transferred_bytes: u64) -> Self {
        self.transferred_bytes = transferred_bytes;
        self
    }

    /// Direction of the transfer.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether a file or a folder was copied.
    #[must_use]
    pub const fn kind(&self) -> TransferKind {
        self.kind
    }

    /// Total computed during the sizing phase.
    #[must_use]
    pub const fn expected_bytes(&self) -> u64 {
        self.expected_bytes
    }

    /// Bytes that actually moved.
    #[must_use]
    pub const fn transferred_bytes(&self) -> u64 {
        self.transferred_bytes
    }

    /// Number of files copied.
    #[must_use]
    pub const fn files(&self) -> usize {
        self.files
    }

    /// Number of directories created on the destination side, including the
    /// top-level folder.
    #[must_use]
    pub const fn directories(&self) -> usize {
        self.directories
    }
}
