#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! FTP control-channel parsing helpers for `ftpmirror`.
//!
//! The crate holds the pieces of RFC 959, RFC 2428, and RFC 3659 that the
//! client needs to talk to a server, kept free of any I/O so they can be
//! tested in isolation:
//!
//! - [`ReplyParser`] assembles single- and multi-line [`Reply`] values.
//! - [`Command`] renders control commands and refuses arguments that would
//!   inject extra lines.
//! - [`parse_mlsd_line`] turns structured listing lines into [`MlsdEntry`]
//!   values carrying typed [`Facts`].
//! - [`parse_pasv_reply`] and [`parse_epsv_reply`] extract passive-mode
//!   data-connection endpoints.
//! - [`parse_quoted_pathname`] reads the pathname out of `257` replies.
//!
//! # Invariants
//!
//! Parsers never panic on arbitrary input; malformed text surfaces as a
//! [`ParseError`] that retains the offending input.
//!
//! # Examples
//!
//! ```
//! use protocol::{Command, ReplyCode, ReplyParser};
//!
//! let mut parser = ReplyParser::new();
//! let reply = parser.push_line("230 Login successful.\r\n").unwrap().unwrap();
//! assert_eq!(reply.code(), ReplyCode::LOGGED_IN);
//! assert_eq!(Command::Cwd("/pub").to_wire().unwrap(), "CWD /pub\r\n");
//! ```

mod command;
mod error;
mod facts;
mod passive;
mod pathname;
mod reply;

pub use command::{Command, TransferType};
pub use error::ParseError;
pub use facts::{EntryType, Facts, MlsdEntry, parse_mlsd_line};
pub use passive::{parse_epsv_reply, parse_pasv_reply};
pub use pathname::parse_quoted_pathname;
pub use reply::{Reply, ReplyClass, ReplyCode, ReplyParser, parse_size_reply};
