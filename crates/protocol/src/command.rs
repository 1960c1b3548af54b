use ::core::fmt;
use std::io::{self, Write};

/// Representation type selected with `TYPE`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferType {
    /// `TYPE A`: network ASCII with CRLF line endings.
    Ascii,
    /// `TYPE I`: raw bytes, used for every file transfer.
    Image,
}

/// Control-channel command issued by the client.
///
/// Arguments are borrowed so commands can be built from caller paths without
/// cloning. Rendering refuses arguments that contain line breaks, which would
/// otherwise allow a path to smuggle a second command onto the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command<'a> {
    /// `USER name`
    User(&'a str),
    /// `PASS secret`
    Pass(&'a str),
    /// `TYPE A` or `TYPE I`
    Type(TransferType),
    /// `PWD`
    Pwd,
    /// `CWD path`
    Cwd(&'a str),
    /// `MKD path`
    Mkd(&'a str),
    /// `SIZE path`
    Size(&'a str),
    /// `EPSV`
    Epsv,
    /// `PASV`
    Pasv,
    /// `MLSD [path]`
    Mlsd(Option<&'a str>),
    /// `NLST [path]`
    Nlst(Option<&'a str>),
    /// `RETR path`
    Retr(&'a str),
    /// `STOR path`
    Stor(&'a str),
    /// `QUIT`
    Quit,
}

impl<'a> Command<'a> {
    /// Returns the command verb.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Self::User(_) => "USER",
            Self::Pass(_) => "PASS",
            Self::Type(_) => "TYPE",
            Self::Pwd => "PWD",
            Self::Cwd(_) => "CWD",
            Self::Mkd(_) => "MKD",
            Self::Size(_) => "SIZE",
            Self::Epsv => "EPSV",
            Self::Pasv => "PASV",
            Self::Mlsd(_) => "MLSD",
            Self::Nlst(_) => "NLST",
            Self::Retr(_) => "RETR",
            Self::Stor(_) => "STOR",
            Self::Quit => "QUIT",
        }
    }

    /// Returns the argument sent after the verb, if any.
    #[must_use]
    pub const fn argument(&self) -> Option<&'a str> {
        match *self {
            Self::User(arg)
            | Self::Pass(arg)
            | Self::Cwd(arg)
            | Self::Mkd(arg)
            | Self::Size(arg)
            | Self::Retr(arg)
            | Self::Stor(arg) => Some(arg),
            Self::Type(TransferType::Ascii) => Some("A"),
            Self::Type(TransferType::Image) => Some("I"),
            Self::Mlsd(arg) | Self::Nlst(arg) => arg,
            Self::Pwd | Self::Epsv | Self::Pasv | Self::Quit => None,
        }
    }

    /// Renders the command as it travels on the wire, including `\r\n`.
    pub fn to_wire(&self) -> io::Result<String> {
        match self.argument() {
            Some(arg) if arg.contains(['\r', '\n']) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} argument contains a line break", self.verb()),
            )),
            Some(arg) if !arg.is_empty() => Ok(format!("{} {arg}\r\n", self.verb())),
            _ => Ok(format!("{}\r\n", self.verb())),
        }
    }

    /// Writes the rendered command to `writer` and flushes it.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        let line = self.to_wire()?;
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(_) => f.write_str("PASS ****"),
            _ => match self.argument() {
                Some(arg) if !arg.is_empty() => write!(f, "{} {arg}", self.verb()),
                _ => f.write_str(self.verb()),
            },
        }
    }
}
