#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `client` is a small blocking FTP client built on [`std::net`] and
//! [`socket2`]. It covers exactly what folder transfers need: login, binary
//! mode, directory navigation, `MKD`, `SIZE`, `NLST`, `MLSD`, `RETR`, and
//! `STOR`.
//!
//! # Design
//!
//! - [`FtpConfig`] carries the endpoint, credentials, timeouts, passive-mode
//!   strategy and optional local bind address.
//! - [`FtpClient::connect`] opens the control connection, checks the `220`
//!   greeting, logs in with `USER`/`PASS` and selects `TYPE I`.
//! - Data transfers always use passive mode. With
//!   [`PassiveMode::Extended`] the client asks for `EPSV` and, when the
//!   server rejects it with a `5xx` code, switches to `PASV` for the rest of
//!   the session.
//! - Failures are reported as [`ClientError`]; a rejected command keeps the
//!   full [`protocol::Reply`] so callers can tell `4xx` from `5xx`.
//!
//! # Examples
//!
//! ```no_run
//! use client::{FtpClient, FtpConfig};
//!
//! # fn demo() -> Result<(), client::ClientError> {
//! let config = FtpConfig::builder("ftp.example.org")
//!     .credentials("user", "secret")
//!     .build();
//! let mut ftp = FtpClient::connect(&config)?;
//! let mut contents = Vec::new();
//! ftp.retr("/pub/readme.txt", &mut contents)?;
//! ftp.quit()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connect;
mod control;
mod error;

pub use crate::client::{CHUNK_SIZE, FtpClient};
pub use crate::config::{
    ANONYMOUS_USER, DEFAULT_IO_TIMEOUT, DEFAULT_PORT, FtpConfig, FtpConfigBuilder, PassiveMode,
};
pub use crate::error::{ClientError, ClientErrorKind};
