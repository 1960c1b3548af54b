use std::error::Error;
use std::fmt;
use std::io;

use protocol::{ParseError, Reply};

/// Error returned by [`FtpClient`](crate::FtpClient) operations.
#[derive(Debug)]
pub struct ClientError {
    kind: ClientErrorKind,
}

/// Classification of client failures.
#[derive(Debug)]
pub enum ClientErrorKind {
    /// The host name did not resolve to a usable address.
    Resolve {
        /// `host:port` that was looked up.
        endpoint: String,
        /// Resolver error.
        source: io::Error,
    },
    /// No resolved address accepted a TCP connection.
    Connect {
        /// Address of the last attempt.
        endpoint: String,
        /// Error from the last attempt.
        source: io::Error,
    },
    /// Reading from or writing to a control, data, or caller stream failed.
    Io {
        /// Short description of the failed step.
        action: &'static str,
        /// Underlying error.
        source: io::Error,
    },
    /// The server answered with a code the operation does not accept.
    UnexpectedReply {
        /// Redacted rendering of the command that was sent.
        command: String,
        /// The reply received.
        reply: Reply,
    },
    /// The server sent text that could not be parsed.
    Parse(ParseError),
}

impl ClientError {
    pub(crate) const fn new(kind: ClientErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn io(action: &'static str, source: io::Error) -> Self {
        Self::new(ClientErrorKind::Io { action, source })
    }

    pub(crate) fn unexpected(command: impl fmt::Display, reply: Reply) -> Self {
        Self::new(ClientErrorKind::UnexpectedReply {
            command: command.to_string(),
            reply,
        })
    }

    /// Returns the specific failure.
    #[must_use]
    pub const fn kind(&self) -> &ClientErrorKind {
        &self.kind
    }

    /// Consumes the error and returns its kind.
    #[must_use]
    pub fn into_kind(self) -> ClientErrorKind {
        self.kind
    }

    /// Returns the server reply when the failure is a rejected command.
    #[must_use]
    pub const fn reply(&self) -> Option<&Reply> {
        match &self.kind {
            ClientErrorKind::UnexpectedReply { reply, .. } => Some(reply),
            _ => None,
        }
    }

    /// Reports whether the server rejected the command with a `4xx` code.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.reply()
            .is_some_and(|reply| reply.code().is_transient_negative())
    }

    /// Reports whether the server rejected the command with a `5xx` code.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.reply()
            .is_some_and(|reply| reply.code().is_permanent_negative())
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ClientErrorKind::Resolve { endpoint, source } => {
                write!(f, "failed to resolve '{endpoint}': {source}")
            }
            ClientErrorKind::Connect { endpoint, source } => {
                write!(f, "failed to connect to {endpoint}: {source}")
            }
            ClientErrorKind::Io { action, source } => write!(f, "failed to {action}: {source}"),
            ClientErrorKind::UnexpectedReply { command, reply } => {
                write!(f, "server rejected '{command}': {reply}")
            }
            ClientErrorKind::Parse(error) => write!(f, "malformed server reply: {error}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ClientErrorKind::Resolve { source, .. }
            | ClientErrorKind::Connect { source, .. }
            | ClientErrorKind::Io { source, .. } => Some(source),
            ClientErrorKind::Parse(error) => Some(error),
            ClientErrorKind::UnexpectedReply { .. } => None,
        }
    }
}

impl From<ParseError> for ClientError {
    fn from(error: ParseError) -> Self {
        Self::new(ClientErrorKind::Parse(error))
    }
}
