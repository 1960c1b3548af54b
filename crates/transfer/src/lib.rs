#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]
//! Recursive FTP folder transfers with byte-counted progress.
//!
//! [`FolderTransfer`] mirrors a remote folder into a local directory or a
//! local folder onto the server. Each top-level call has two phases:
//!
//! 1. **Sizing.** The source is classified as file or folder and its total
//!    byte count is computed (remote listings for downloads, a local walk for
//!    uploads). A total of zero is reported as [`TransferError::NotFound`].
//! 2. **Transfer.** Entries are copied one at a time, depth first, in listing
//!    order. Every chunk advances a [`ProgressTracker`] that reports to the
//!    caller's [`ProgressHandler`].
//!
//! The remote side is any [`RemoteSession`]. [`client::FtpClient`]
//! implements it; with the `test-support` feature, `MemorySession` provides
//! an in-memory server for tests.
//!
//! # Listing capability
//!
//! The first listing probes `MLSD`. When the server refuses it, the
//! orchestrator switches to `NLST` plus per-entry `SIZE` queries and a
//! working directory probe for classification, and keeps that choice for
//! the rest of its life.
//!
//! # Failure model
//!
//! There are no retries and no cleanup. A failed download may leave partial
//! local files and a failed upload may leave a partial remote tree; re-running
//! the same call overwrites file by file. Errors are logged at `error` level
//! under the `ftpmirror::transfer` target before being returned.
//!
//! # Examples
//!
//! ```
//! # #[cfg(feature = "test-support")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use transfer::{FolderTransfer, MemorySession, ProgressUpdate};
//!
//! let mut session = MemorySession::new();
//! session.add_file("/pub/root/a.txt", b"hello");
//! session.add_file("/pub/root/sub/b.txt", b"abc");
//!
//! let local = tempfile::tempdir()?;
//! let mut last = 0;
//! let mut on_progress = |update: &ProgressUpdate| last = update.current();
//!
//! let report = FolderTransfer::new(&mut session).download(
//!     "/pub/root",
//!     local.path(),
//!     Some(&mut on_progress),
//! )?;
//! assert_eq!(report.expected_bytes(), 8);
//! assert_eq!(last, 8);
//! assert_eq!(std::fs::read(local.path().join("root/sub/b.txt"))?, b"abc");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "test-support"))]
//! # fn main() {}
//! ```

use std::path::Path;

mod classify;
mod download;
mod error;
mod ftp;
mod orchestrator;
mod progress;
mod remote_path;
mod report;
mod session;
mod size;
mod upload;

#[cfg(any(test, feature = "test-support"))]
mod test_support;

pub use error::TransferError;
pub use orchestrator::{FolderTransfer, ListingMode};
pub use progress::{
    FileLabel, ProgressHandler, ProgressReader, ProgressTracker, ProgressUpdate, ProgressWriter,
};
pub use report::{Direction, TransferKind, TransferReport};
pub use session::{RemoteSession, SessionError};
pub use size::local_folder_size;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub use test_support::MemorySession;

/// Downloads `remote` into `local_base` with a fresh [`FolderTransfer`].
///
/// Probes the listing capability again; keep a [`FolderTransfer`] around
/// when making several calls on one session.
pub fn download<S: RemoteSession + ?Sized>(
    session: &mut S,
    remote: &str,
    local_base: &Path,
    progress: Option<&mut dyn ProgressHandler>,
) -> Result<TransferReport, TransferError> {
    FolderTransfer::new(session).download(remote, local_base, progress)
}

/// Uploads `local` into `remote_base` with a fresh [`FolderTransfer`].
pub fn upload<S: RemoteSession + ?Sized>(
    session: &mut S,
    local: &Path,
    remote_base: &str,
    progress: Option<&mut dyn ProgressHandler>,
) -> Result<TransferReport, TransferError> {
    FolderTransfer::new(session).upload(local, remote_base, progress)
}
