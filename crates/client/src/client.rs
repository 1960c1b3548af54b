use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpStream};

use logging::trace_ftp;
use protocol::{
    Command, MlsdEntry, ReplyCode, TransferType, parse_epsv_reply, parse_mlsd_line,
    parse_pasv_reply, parse_quoted_pathname, parse_size_reply,
};

use crate::config::{FtpConfig, PassiveMode};
use crate::connect::{connect_control, connect_data};
use crate::control::ControlChannel;
use crate::error::ClientError;

/// Size of the buffer used to move file bytes over a data connection.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// A logged-in FTP session in binary mode.
///
/// Every method is blocking and issues exactly the commands it names plus
/// whatever passive-mode negotiation a data transfer needs.
pub struct FtpClient {
    config: FtpConfig,
    control: ControlChannel,
    epsv_rejected: bool,
}

impl FtpClient {
    /// Connects, reads the greeting, logs in, and selects `TYPE I`.
    pub fn connect(config: &FtpConfig) -> Result<Self, ClientError> {
        let stream = connect_control(config)?;
        let mut control = ControlChannel::new(stream)?;

        let greeting = control.read_reply()?;
        if greeting.code() != ReplyCode::SERVICE_READY {
            return Err(ClientError::unexpected("connect", greeting));
        }
        trace_ftp!(endpoint = %config.endpoint(), "connected");

        let user = Command::User(config.username());
        let reply = control.execute(&user)?;
        if reply.code() == ReplyCode::NEED_PASSWORD {
            control.expect_completion(&Command::Pass(config.password()))?;
        } else if !reply.code().is_completion() {
            return Err(ClientError::unexpected(user, reply));
        }

        control.expect_completion(&Command::Type(TransferType::Image))?;

        Ok(Self {
            config: config.clone(),
            control,
            epsv_rejected: false,
        })
    }

    /// Returns the configuration the session was opened with.
    #[must_use]
    pub const fn config(&self) -> &FtpConfig {
        &self.config
    }

    /// Returns `host:port` of the server.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Returns the server's current working directory.
    pub fn pwd(&mut self) -> Result<String, ClientError> {
        let reply = self.control.expect_completion(&Command::Pwd)?;
        Ok(parse_quoted_pathname(reply.first_line())?)
    }

    /// Changes the server's current working directory.
    pub fn cwd(&mut self, path: &str) -> Result<(), ClientError> {
        self.control.expect_completion(&Command::Cwd(path))?;
        Ok(())
    }

    /// Creates a directory and returns the pathname the server reports.
    ///
    /// Servers that omit the quoted pathname yield `path` unchanged.
    pub fn mkd(&mut self, path: &str) -> Result<String, ClientError> {
        let reply = self.control.expect_completion(&Command::Mkd(path))?;
        Ok(parse_quoted_pathname(reply.first_line()).unwrap_or_else(|_| path.to_owned()))
    }

    /// Returns the size of a remote file in bytes (RFC 3659 `SIZE`).
    pub fn size(&mut self, path: &str) -> Result<u64, ClientError> {
        let reply = self.control.expect_completion(&Command::Size(path))?;
        Ok(parse_size_reply(reply.first_line())?)
    }

    /// Lists names with `NLST`. `None` lists the working directory.
    pub fn nlst(&mut self, path: Option<&str>) -> Result<Vec<String>, ClientError> {
        self.transfer(Command::Nlst(path), read_lines)
    }

    /// Lists a directory with `MLSD`. `None` lists the working directory.
    ///
    /// Lines that cannot be parsed are skipped.
    pub fn mlsd(&mut self, path: Option<&str>) -> Result<Vec<MlsdEntry>, ClientError> {
        let lines = self.transfer(Command::Mlsd(path), read_lines)?;
        Ok(lines
            .iter()
            .filter_map(|line| match parse_mlsd_line(line) {
                Ok(entry) => Some(entry),
                Err(error) => {
                    trace_ftp!(%error, "skipping listing line");
                    None
                }
            })
            .collect())
    }

    /// Downloads `path` into `sink` in [`CHUNK_SIZE`] pieces and returns the
    /// number of bytes received.
    pub fn retr(&mut self, path: &str, sink: &mut dyn Write) -> Result<u64, ClientError> {
        self.transfer(Command::Retr(path), |mut data| {
            let mut buffer = [0u8; CHUNK_SIZE];
            let mut total = 0u64;
            loop {
                let read = match data.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                    Err(error) => return Err(ClientError::io("read data connection", error)),
                };
                sink.write_all(&buffer[..read])
                    .map_err(|error| ClientError::io("write retrieved data", error))?;
                total += read as u64;
            }
            sink.flush()
                .map_err(|error| ClientError::io("write retrieved data", error))?;
            Ok(total)
        })
    }

    /// Uploads everything `source` yields to `path` in [`CHUNK_SIZE`] pieces
    /// and returns the number of bytes sent.
    pub fn stor(&mut self, path: &str, source: &mut dyn Read) -> Result<u64, ClientError> {
        self.transfer(Command::Stor(path), |mut data| {
            let mut buffer = [0u8; CHUNK_SIZE];
            let mut total = 0u64;
            loop {
                let read = match source.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
                    Err(error) => return Err(ClientError::io("read upload source", error)),
                };
                data.write_all(&buffer[..read])
                    .map_err(|error| ClientError::io("write data connection", error))?;
                total += read as u64;
            }
            data.flush()
                .map_err(|error| ClientError::io("write data connection", error))?;
            Ok(total)
        })
    }

    /// Sends `QUIT` and closes the session.
    pub fn quit(mut self) -> Result<(), ClientError> {
        self.control.expect_completion(&Command::Quit)?;
        Ok(())
    }

    /// Runs a command that uses a data connection.
    ///
    /// The data connection is opened before the command is sent, handed to
    /// `body`, and closed before the final reply is read. When `body` fails
    /// the final reply is still drained so the control channel stays in step.
    fn transfer<T>(
        &mut self,
        command: Command<'_>,
        body: impl FnOnce(TcpStream) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let target = self.passive_target()?;
        let data = connect_data(target, &self.config)?;

        let reply = self.control.execute(&command)?;
        if !reply.code().is_preliminary() {
            return Err(ClientError::unexpected(command, reply));
        }

        let outcome = body(data);
        let reply = self.control.read_reply();
        let value = outcome?;
        let reply = reply?;
        if reply.code().is_completion() {
            Ok(value)
        } else {
            Err(ClientError::unexpected(command, reply))
        }
    }

    fn passive_target(&mut self) -> Result<SocketAddr, ClientError> {
        let peer = self.control.peer();

        if self.config.passive_mode() == PassiveMode::Extended && !self.epsv_rejected {
            let reply = self.control.execute(&Command::Epsv)?;
            if reply.code() == ReplyCode::ENTERING_EXTENDED_PASSIVE_MODE {
                let port = parse_epsv_reply(reply.first_line())?;
                return Ok(SocketAddr::new(peer.ip(), port));
            }
            if !reply.code().is_permanent_negative() {
                return Err(ClientError::unexpected(Command::Epsv, reply));
            }
            trace_ftp!(code = reply.code().get(), "EPSV rejected, using PASV");
            self.epsv_rejected = true;
        }

        let reply = self.control.expect_completion(&Command::Pasv)?;
        let advertised = parse_pasv_reply(reply.first_line())?;
        let ip = if advertised.ip().is_unspecified() {
            peer.ip()
        } else {
            IpAddr::V4(*advertised.ip())
        };
        Ok(SocketAddr::new(ip, advertised.port()))
    }
}

fn read_lines(data: TcpStream) -> Result<Vec<String>, ClientError> {
    let mut reader = BufReader::new(data);
    let mut lines = Vec::new();
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|error| ClientError::io("read listing", error))?;
        if read == 0 {
            return Ok(lines);
        }
        let line = String::from_utf8_lossy(&buffer);
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            lines.push(line.to_owned());
        }
    }
}
