//! [`RemoteSession`] over a live [`FtpClient`].

use std::io::{Read, Write};

use client::{ClientError, ClientErrorKind, FtpClient};
use protocol::MlsdEntry;

use crate::session::{RemoteSession, SessionError};

impl From<ClientError> for SessionError {
    fn from(error: ClientError) -> Self {
        match error.into_kind() {
            ClientErrorKind::UnexpectedReply { command, reply } => {
                let code = reply.code();
                let message = reply.text();
                if code.is_transient_negative() {
                    Self::Transient {
                        code: code.get(),
                        message,
                    }
                } else if code.is_permanent_negative() {
                    Self::Permanent {
                        code: code.get(),
                        message,
                    }
                } else {
                    Self::Protocol(format!("unexpected reply to '{command}': {reply}"))
                }
            }
            ClientErrorKind::Resolve { source, .. }
            | ClientErrorKind::Connect { source, .. }
            | ClientErrorKind::Io { source, .. } => Self::Io(source),
            ClientErrorKind::Parse(error) => Self::Protocol(error.to_string()),
        }
    }
}

fn optional(path: &str) -> Option<&str> {
    (!path.is_empty()).then_some(path)
}

impl RemoteSession for FtpClient {
    fn endpoint(&self) -> String {
        Self::endpoint(self)
    }

    fn pwd(&mut self) -> Result<String, SessionError> {
        Ok(Self::pwd(self)?)
    }

    fn cwd(&mut self, path: &str) -> Result<(), SessionError> {
        Ok(Self::cwd(self, path)?)
    }

    fn mkd(&mut self, path: &str) -> Result<(), SessionError> {
        Self::mkd(self, path)?;
        Ok(())
    }

    fn size(&mut self, path: &str) -> Result<Option<u64>, SessionError> {
        match Self::size(self, path) {
            Ok(size) => Ok(Some(size)),
            Err(error) if error.is_permanent() || error.is_transient() => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn nlst(&mut self, path: &str) -> Result<Vec<String>, SessionError> {
        Ok(Self::nlst(self, optional(path))?)
    }

    fn mlsd(&mut self, path: &str) -> Result<Vec<MlsdEntry>, SessionError> {
        Ok(Self::mlsd(self, optional(path))?)
    }

    fn retrieve(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, SessionError> {
        Ok(self.retr(path, sink)?)
    }

    fn store(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, SessionError> {
        Ok(self.stor(path, source)?)
    }
}
