#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` wires the workspace into the [`tracing`] ecosystem. Every crate
//! emits events under one of four targets ([`TRANSFER_TARGET`],
//! [`FTP_TARGET`], [`SIZE_TARGET`], [`WALK_TARGET`]) through the
//! [`trace_xfer!`], [`trace_ftp!`], [`trace_size!`] and [`trace_walk!`]
//! macros. [`LogConfig`] holds one verbosity level per subsystem and renders
//! it into an `EnvFilter`, and [`init_tracing`] installs a stderr subscriber.
//!
//! # Examples
//!
//! ```
//! use logging::LogConfig;
//!
//! let mut config = LogConfig::from_verbose_level(1);
//! config.apply_directive("ftp2").unwrap();
//! assert_eq!(
//!     config.directives(),
//!     "warn,ftpmirror::transfer=info,ftpmirror::ftp=debug,\
//!      ftpmirror::size=warn,ftpmirror::walk=warn"
//! );
//! ```

mod config;
mod subscriber;
mod tracing_macros;

pub use config::{
    FTP_TARGET, LogConfig, SIZE_TARGET, Subsystem, TRANSFER_TARGET, WALK_TARGET, level_filter,
};
pub use subscriber::{LOG_ENV, init_tracing};
