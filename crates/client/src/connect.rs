use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::config::FtpConfig;
use crate::error::{ClientError, ClientErrorKind};

/// Opens the control connection described by `config`.
///
/// Every resolved address is tried in order and the first that accepts is
/// used. The configured I/O timeout is applied to the returned stream.
pub(crate) fn connect_control(config: &FtpConfig) -> Result<TcpStream, ClientError> {
    let endpoint = config.endpoint();
    let addresses: Vec<SocketAddr> = (config.host(), config.port())
        .to_socket_addrs()
        .map_err(|source| {
            ClientError::new(ClientErrorKind::Resolve {
                endpoint: endpoint.clone(),
                source,
            })
        })?
        .collect();

    let mut last_error = None;
    for candidate in addresses {
        match connect_with_optional_bind(candidate, config.bind_address(), config.connect_timeout())
        {
            Ok(stream) => {
                apply_io_timeout(&stream, config.io_timeout())
                    .map_err(|error| ClientError::io("set control socket timeout", error))?;
                return Ok(stream);
            }
            Err(error) => last_error = Some((candidate, error)),
        }
    }

    Err(match last_error {
        Some((candidate, source)) => ClientError::new(ClientErrorKind::Connect {
            endpoint: candidate.to_string(),
            source,
        }),
        None => ClientError::new(ClientErrorKind::Resolve {
            endpoint,
            source: io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses"),
        }),
    })
}

/// Opens a data connection to `target` with the same socket settings as the
/// control connection.
pub(crate) fn connect_data(
    target: SocketAddr,
    config: &FtpConfig,
) -> Result<TcpStream, ClientError> {
    let stream = connect_with_optional_bind(target, config.bind_address(), config.connect_timeout())
        .map_err(|source| {
            ClientError::new(ClientErrorKind::Connect {
                endpoint: target.to_string(),
                source,
            })
        })?;
    apply_io_timeout(&stream, config.io_timeout())
        .map_err(|error| ClientError::io("set data socket timeout", error))?;
    Ok(stream)
}

fn apply_io_timeout(stream: &TcpStream, timeout: Option<Duration>) -> io::Result<()> {
    stream.set_read_timeout(timeout)?;
    stream.set_write_timeout(timeout)
}

/// Opens a TCP connection to `target`, optionally binding to a local address first.
///
/// When `bind_address` is provided its port is forced to `0` so the OS picks
/// an ephemeral port.
fn connect_with_optional_bind(
    target: SocketAddr,
    bind_address: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let Some(bind) = bind_address else {
        return match timeout {
            Some(duration) => TcpStream::connect_timeout(&target, duration),
            None => TcpStream::connect(target),
        };
    };

    if target.is_ipv4() != bind.is_ipv4() {
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "bind address family does not match target",
        ));
    }

    let domain = if target.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    let mut bind_addr = bind;
    bind_addr.set_port(0);
    socket.bind(&SockAddr::from(bind_addr))?;

    let target_addr = SockAddr::from(target);
    match timeout {
        Some(duration) => socket.connect_timeout(&target_addr, duration)?,
        None => socket.connect(&target_addr)?,
    }
    Ok(socket.into())
}
