//! Errors surfaced by the transfer entry points.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use walk::WalkError;

use crate::session::SessionError;

/// Failure of a top-level download or upload.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source is empty or does not exist.
    ///
    /// Raised when the sizing phase resolves a total of zero bytes, so an
    /// empty folder is reported the same way as a missing one.
    #[error("not found or empty: {path}")]
    NotFound {
        /// Source path as given by the caller.
        path: String,
    },

    /// A command against the remote session failed.
    #[error("failed to {action} '{path}': {source}")]
    Session {
        /// Short description of the step, e.g. `"retrieve"`.
        action: &'static str,
        /// Remote path involved.
        path: String,
        /// The session error.
        #[source]
        source: SessionError,
    },

    /// A local filesystem operation failed.
    #[error("failed to {action} {}: {source}", path.display())]
    Local {
        /// Short description of the step, e.g. `"create file"`.
        action: &'static str,
        /// Local path involved.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: io::Error,
    },

    /// Walking the local source tree failed.
    #[error(transparent)]
    Walk(#[from] WalkError),
}

impl TransferError {
    pub(crate) fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn session(action: &'static str, path: &str, source: SessionError) -> Self {
        Self::Session {
            action,
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn local(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Local {
            action,
            path: path.into(),
            source,
        }
    }

    /// Reports whether the source was empty or missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns the underlying session error for remote failures.
    #[must_use]
    pub const fn session_error(&self) -> Option<&SessionError> {
        match self {
            Self::Session { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path_and_step() {
        assert_eq!(
            TransferError::not_found("/pub/empty").to_string(),
            "not found or empty: /pub/empty"
        );

        let remote = TransferError::session(
            "retrieve",
            "/pub/a.txt",
            SessionError::Permanent {
                code: 550,
                message: "Permission denied".into(),
            },
        );
        assert_eq!(
            remote.to_string(),
            "failed to retrieve '/pub/a.txt': permanent failure (550): Permission denied"
        );
        assert_eq!(remote.session_error().and_then(SessionError::code), Some(550));

        let local = TransferError::local("create file", "out/a.txt", io::Error::other("disk full"));
        assert_eq!(local.to_string(), "failed to create file out/a.txt: disk full");
        assert!(!local.is_not_found());
    }
}
