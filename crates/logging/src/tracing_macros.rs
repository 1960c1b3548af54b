//! crates/logging/src/tracing_macros.rs
//! Convenience macros that emit events under the ftpmirror subsystem targets.
//!
//! Each macro forwards to the matching `tracing` macro with a fixed target so
//! [`LogConfig`](crate::LogConfig) directives can enable them independently.

/// Emit a transfer progress event at info level.
///
/// # Example
/// ```ignore
/// trace_xfer!(remote = %path, "starting folder download");
/// ```
#[macro_export]
macro_rules! trace_xfer {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "ftpmirror::transfer", $($arg)*);
    };
}

/// Emit a control-channel event at debug level.
///
/// # Example
/// ```ignore
/// trace_ftp!(command = %command, code = reply.code().get(), "reply received");
/// ```
#[macro_export]
macro_rules! trace_ftp {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ftpmirror::ftp", $($arg)*);
    };
}

/// Emit a sizing event at debug level.
///
/// # Example
/// ```ignore
/// trace_size!(path = %remote, bytes = total, "folder sized");
/// ```
#[macro_export]
macro_rules! trace_size {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "ftpmirror::size", $($arg)*);
    };
}

/// Emit a local traversal event at trace level.
///
/// # Example
/// ```ignore
/// trace_walk!(path = %entry.full_path().display(), "visiting");
/// ```
#[macro_export]
macro_rules! trace_walk {
    ($($arg:tt)*) => {
        ::tracing::trace!(target: "ftpmirror::walk", $($arg)*);
    };
}
