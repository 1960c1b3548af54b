use std::io::{self, BufRead, BufReader, Read};
use std::net::{SocketAddr, TcpStream};

use logging::trace_ftp;
use protocol::{Command, Reply, ReplyParser};

use crate::error::ClientError;

/// Upper bound on a single reply line; longer lines are a protocol violation.
const MAX_LINE_BYTES: u64 = 64 * 1024;

/// Line-oriented view of the control connection.
pub(crate) struct ControlChannel {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    parser: ReplyParser,
    peer: SocketAddr,
}

impl ControlChannel {
    pub(crate) fn new(stream: TcpStream) -> Result<Self, ClientError> {
        let peer = stream
            .peer_addr()
            .map_err(|error| ClientError::io("query control peer address", error))?;
        let writer = stream
            .try_clone()
            .map_err(|error| ClientError::io("clone control socket", error))?;
        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            parser: ReplyParser::new(),
            peer,
        })
    }

    /// Returns the address of the server end of the control connection.
    pub(crate) const fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Writes `command` without waiting for a reply.
    pub(crate) fn send(&mut self, command: &Command<'_>) -> Result<(), ClientError> {
        trace_ftp!(command = %command, "sending command");
        command
            .write_to(&mut self.writer)
            .map_err(|error| ClientError::io("send command", error))
    }

    /// Reads the next complete reply, joining multi-line replies.
    pub(crate) fn read_reply(&mut self) -> Result<Reply, ClientError> {
        let mut buffer = Vec::new();
        loop {
            buffer.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_BYTES)
                .read_until(b'\n', &mut buffer)
                .map_err(|error| ClientError::io("read reply", error))?;
            if read == 0 {
                return Err(ClientError::io(
                    "read reply",
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "server closed the control connection",
                    ),
                ));
            }

            let line = String::from_utf8_lossy(&buffer);
            if let Some(reply) = self.parser.push_line(&line)? {
                trace_ftp!(code = reply.code().get(), text = %reply.first_line(), "reply received");
                return Ok(reply);
            }
        }
    }

    /// Sends `command` and returns its reply, whatever the code.
    pub(crate) fn execute(&mut self, command: &Command<'_>) -> Result<Reply, ClientError> {
        self.send(command)?;
        self.read_reply()
    }

    /// Sends `command` and requires a `2xx` reply.
    pub(crate) fn expect_completion(&mut self, command: &Command<'_>) -> Result<Reply, ClientError> {
        let reply = self.execute(command)?;
        if reply.code().is_completion() {
            Ok(reply)
        } else {
            Err(ClientError::unexpected(command, reply))
        }
    }
}
