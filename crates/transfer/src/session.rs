//! The remote-side collaborator of a folder transfer.

use std::io::{self, Read, Write};

use protocol::MlsdEntry;
use thiserror::Error;

/// Failure reported by a [`RemoteSession`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server refused the command with a `5xx` reply.
    #[error("permanent failure ({code}): {message}")]
    Permanent {
        /// Reply code.
        code: u16,
        /// Reply text.
        message: String,
    },

    /// The server refused the command with a `4xx` reply.
    #[error("temporary failure ({code}): {message}")]
    Transient {
        /// Reply code.
        code: u16,
        /// Reply text.
        message: String,
    },

    /// A socket or local stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server sent something the client could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    /// Reports whether the server refused the command with a `4xx` or `5xx`
    /// reply.
    ///
    /// Only these errors are treated as "feature unsupported" or "not a
    /// directory" while classifying and sizing.
    #[must_use]
    pub const fn is_negative_reply(&self) -> bool {
        matches!(self, Self::Permanent { .. } | Self::Transient { .. })
    }

    /// Reports whether the server refused the command with a `5xx` reply.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(self, Self::Permanent { .. })
    }

    /// Returns the reply code for refused commands.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::Permanent { code, .. } | Self::Transient { code, .. } => Some(*code),
            Self::Io(_) | Self::Protocol(_) => None,
        }
    }
}

/// A connected, logged-in session bound to one remote endpoint.
///
/// Paths are `/`-separated; an empty path names the current working
/// directory. Implementations keep the working directory as session state,
/// so a session must not be shared between concurrent transfers.
pub trait RemoteSession {
    /// Returns a printable `host:port` for diagnostics.
    fn endpoint(&self) -> String;

    /// Returns the current working directory.
    fn pwd(&mut self) -> Result<String, SessionError>;

    /// Changes the current working directory.
    fn cwd(&mut self, path: &str) -> Result<(), SessionError>;

    /// Creates a directory. Servers refuse existing directories with a
    /// [`SessionError::Permanent`] error.
    fn mkd(&mut self, path: &str) -> Result<(), SessionError>;

    /// Returns the size of a file, or `None` when the server cannot tell.
    fn size(&mut self, path: &str) -> Result<Option<u64>, SessionError>;

    /// Lists names with a plain listing.
    fn nlst(&mut self, path: &str) -> Result<Vec<String>, SessionError>;

    /// Lists a directory with per-entry facts.
    fn mlsd(&mut self, path: &str) -> Result<Vec<MlsdEntry>, SessionError>;

    /// Streams the file at `path` into `sink` and returns the byte count.
    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, SessionError>;

    /// Streams `source` into a new file at `path` and returns the byte count.
    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, SessionError>;
}

impl<S: RemoteSession + ?Sized> RemoteSession for &mut S {
    fn endpoint(&self) -> String {
        (**self).endpoint()
    }

    fn pwd(&mut self) -> Result<String, SessionError> {
        (**self).pwd()
    }

    fn cwd(&mut self, path: &str) -> Result<(), SessionError> {
        (**self).cwd(path)
    }

    fn mkd(&mut self, path: &str) -> Result<(), SessionError> {
        (**self).mkd(path)
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>, SessionError> {
        (**self).size(path)
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>, SessionError> {
        (**self).nlst(path)
    }

    fn mlsd(&mut self, path: &str) -> Result<Vec<MlsdEntry>, SessionError> {
        (**self).mlsd(path)
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, SessionError> {
        (**self).retrieve(path, sink)
    }

    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, SessionError> {
        (**self).store(path, source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_replies_are_distinguished_from_transport_failures() {
        let permanent = SessionError::Permanent {
            code: 550,
            message: "No such file".into(),
        };
        let transient = SessionError::Transient {
            code: 450,
            message: "Busy".into(),
        };
        let io = SessionError::from(io::Error::other("reset"));
        let protocol = SessionError::Protocol("garbled".into());

        assert!(permanent.is_negative_reply() && permanent.is_permanent());
        assert!(transient.is_negative_reply() && !transient.is_permanent());
        assert!(!io.is_negative_reply());
        assert!(!protocol.is_negative_reply());
        assert_eq!(permanent.code(), Some(550));
        assert_eq!(io.code(), None);
    }

    #[test]
    fn display_includes_code_and_text() {
        let error = SessionError::Transient {
            code: 421,
            message: "Too many users".into(),
        };
        assert_eq!(error.to_string(), "temporary failure (421): Too many users");
    }
}
