#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! Recursive FTP folder download and upload with byte-counted progress.
//!
//! `ftpmirror` ties the workspace crates together:
//!
//! - [`client`] speaks FTP over blocking sockets ([`FtpClient`]).
//! - [`transfer`] classifies, sizes, and copies folder trees through any
//!   [`RemoteSession`], reporting progress to a [`ProgressHandler`].
//! - [`walk`] enumerates local trees for uploads.
//! - [`protocol`] parses replies and listings.
//! - [`logging`] installs the `tracing` subscriber.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use ftpmirror::{FolderTransfer, FtpClient, FtpConfig, LogConfig, ProgressUpdate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! ftpmirror::init_tracing(&LogConfig::from_verbose_level(1))?;
//!
//! let config = FtpConfig::builder("ftp.example.org")
//!     .credentials("anonymous", "guest@example.org")
//!     .build();
//! let mut client = FtpClient::connect(&config)?;
//!
//! let mut report = |update: &ProgressUpdate| {
//!     eprintln!("{}/{} {}", update.current(), update.total(), update.message());
//! };
//! let mut transfer = FolderTransfer::new(&mut client);
//! transfer.download("/pub/dataset", Path::new("mirror"), Some(&mut report))?;
//! transfer.upload(Path::new("results"), "/incoming", Some(&mut report))?;
//! drop(transfer);
//!
//! client.quit()?;
//! # Ok(())
//! # }
//! ```

pub use client::{self, ClientError, FtpClient, FtpConfig, FtpConfigBuilder, PassiveMode};
pub use logging::{self, LogConfig, init_tracing};
pub use protocol;
pub use transfer::{
    self, Direction, FolderTransfer, ListingMode, ProgressHandler, ProgressUpdate, RemoteSession,
    SessionError, TransferError, TransferKind, TransferReport, download, upload,
};
pub use walk;
