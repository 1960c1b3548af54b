use ::core::fmt;

use crate::error::ParseError;

/// Three-digit FTP reply code as defined by RFC 959 section 4.2.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplyCode(u16);

/// First-digit classification of a [`ReplyCode`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplyClass {
    /// `1yz`: the action is starting; expect another reply.
    Preliminary,
    /// `2yz`: the action completed successfully.
    Completion,
    /// `3yz`: the command was accepted but more information is needed.
    Intermediate,
    /// `4yz`: the command failed, but the condition is temporary.
    TransientNegative,
    /// `5yz`: the command failed and should not be repeated as-is.
    PermanentNegative,
}

impl ReplyCode {
    /// `125 Data connection already open; transfer starting.`
    pub const DATA_CONNECTION_OPEN: Self = Self(125);
    /// `150 File status okay; about to open data connection.`
    pub const OPENING_DATA_CONNECTION: Self = Self(150);
    /// `200 Command okay.`
    pub const COMMAND_OK: Self = Self(200);
    /// `213 File status.`
    pub const FILE_STATUS: Self = Self(213);
    /// `220 Service ready for new user.`
    pub const SERVICE_READY: Self = Self(220);
    /// `221 Service closing control connection.`
    pub const CLOSING_CONTROL: Self = Self(221);
    /// `226 Closing data connection.`
    pub const CLOSING_DATA_CONNECTION: Self = Self(226);
    /// `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2).`
    pub const ENTERING_PASSIVE_MODE: Self = Self(227);
    /// `229 Entering Extended Passive Mode (|||port|).`
    pub const ENTERING_EXTENDED_PASSIVE_MODE: Self = Self(229);
    /// `230 User logged in, proceed.`
    pub const LOGGED_IN: Self = Self(230);
    /// `250 Requested file action okay, completed.`
    pub const FILE_ACTION_OK: Self = Self(250);
    /// `257 "PATHNAME" created.`
    pub const PATHNAME_CREATED: Self = Self(257);
    /// `331 User name okay, need password.`
    pub const NEED_PASSWORD: Self = Self(331);
    /// `500 Syntax error, command unrecognized.`
    pub const COMMAND_UNRECOGNIZED: Self = Self(500);
    /// `502 Command not implemented.`
    pub const COMMAND_NOT_IMPLEMENTED: Self = Self(502);
    /// `550 Requested action not taken. File unavailable.`
    pub const FILE_UNAVAILABLE: Self = Self(550);

    /// Creates a reply code, rejecting values outside `100..=599`.
    #[must_use]
    pub const fn new(code: u16) -> Option<Self> {
        if code >= 100 && code <= 599 {
            Some(Self(code))
        } else {
            None
        }
    }

    /// Returns the numeric value of the code.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Classifies the code by its first digit.
    #[must_use]
    pub const fn class(self) -> ReplyClass {
        match self.0 / 100 {
            1 => ReplyClass::Preliminary,
            2 => ReplyClass::Completion,
            3 => ReplyClass::Intermediate,
            4 => ReplyClass::TransientNegative,
            _ => ReplyClass::PermanentNegative,
        }
    }

    /// Reports whether the code is a `1yz` preliminary reply.
    #[must_use]
    pub const fn is_preliminary(self) -> bool {
        matches!(self.class(), ReplyClass::Preliminary)
    }

    /// Reports whether the code is a `2yz` completion reply.
    #[must_use]
    pub const fn is_completion(self) -> bool {
        matches!(self.class(), ReplyClass::Completion)
    }

    /// Reports whether the code is a `3yz` intermediate reply.
    #[must_use]
    pub const fn is_intermediate(self) -> bool {
        matches!(self.class(), ReplyClass::Intermediate)
    }

    /// Reports whether the code is a `4yz` transient failure.
    #[must_use]
    pub const fn is_transient_negative(self) -> bool {
        matches!(self.class(), ReplyClass::TransientNegative)
    }

    /// Reports whether the code is a `5yz` permanent failure.
    #[must_use]
    pub const fn is_permanent_negative(self) -> bool {
        matches!(self.class(), ReplyClass::PermanentNegative)
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A complete server reply, possibly assembled from several lines.
///
/// `lines` holds the text following the status code on each line. For a
/// single-line reply there is exactly one element; multi-line replies keep
/// the opening line, every continuation line, and the closing line in order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reply {
    code: ReplyCode,
    lines: Vec<String>,
}

impl Reply {
    /// Creates a reply from a code and its text lines.
    #[must_use]
    pub fn new(code: ReplyCode, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// Returns the reply code.
    #[must_use]
    pub const fn code(&self) -> ReplyCode {
        self.code
    }

    /// Returns every text line carried by the reply.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the text of the first line, which carries the payload of
    /// single-line replies such as `227`, `229`, `213`, and `257`.
    #[must_use]
    pub fn first_line(&self) -> &str {
        self.lines.first().map_or("", String::as_str)
    }

    /// Joins all text lines with `\n`.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.first_line())
    }
}

/// Incremental parser that assembles [`Reply`] values from control-channel lines.
///
/// Feed each received line (with or without its `\r\n` terminator) to
/// [`push_line`](Self::push_line). The parser returns `Ok(None)` while a
/// multi-line reply is still open and `Ok(Some(reply))` once the reply is
/// complete.
///
/// # Examples
///
/// ```
/// use protocol::ReplyParser;
///
/// let mut parser = ReplyParser::new();
/// assert!(parser.push_line("211-Features:\r\n").unwrap().is_none());
/// assert!(parser.push_line(" MLST type*;size*;\r\n").unwrap().is_none());
/// let reply = parser.push_line("211 End\r\n").unwrap().unwrap();
/// assert_eq!(reply.code().get(), 211);
/// assert_eq!(reply.lines().len(), 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReplyParser {
    pending: Option<(ReplyCode, Vec<String>)>,
}

impl ReplyParser {
    /// Creates an idle parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Reports whether a multi-line reply has been opened but not closed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes one line of server output.
    pub fn push_line(&mut self, line: &str) -> Result<Option<Reply>, ParseError> {
        let line = strip_terminator(line);

        if let Some((code, mut lines)) = self.pending.take() {
            match split_status_line(line) {
                Some((found, Separator::Final, text)) if found == code => {
                    lines.push(text.to_owned());
                    return Ok(Some(Reply::new(code, lines)));
                }
                Some((found, Separator::Continuation, text)) if found == code => {
                    lines.push(text.to_owned());
                }
                _ => lines.push(line.to_owned()),
            }
            self.pending = Some((code, lines));
            return Ok(None);
        }

        match split_status_line(line) {
            Some((code, Separator::Final, text)) => {
                Ok(Some(Reply::new(code, vec![text.to_owned()])))
            }
            Some((code, Separator::Continuation, text)) => {
                self.pending = Some((code, vec![text.to_owned()]));
                Ok(None)
            }
            None => Err(ParseError::MalformedReplyLine {
                input: line.to_owned(),
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Separator {
    Final,
    Continuation,
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn split_status_line(line: &str) -> Option<(ReplyCode, Separator, &str)> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let value = u16::from(bytes[0] - b'0') * 100
        + u16::from(bytes[1] - b'0') * 10
        + u16::from(bytes[2] - b'0');
    let code = ReplyCode::new(value)?;

    match bytes.get(3) {
        None => Some((code, Separator::Final, "")),
        Some(b' ') => Some((code, Separator::Final, &line[4..])),
        Some(b'-') => Some((code, Separator::Continuation, &line[4..])),
        Some(_) => None,
    }
}

/// Parses the byte count carried by a `213` reply to `SIZE`.
pub fn parse_size_reply(text: &str) -> Result<u64, ParseError> {
    text.trim()
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidSize {
            input: text.to_owned(),
        })
}
