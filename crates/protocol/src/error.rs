use ::core::fmt;

/// Errors produced while parsing FTP control-channel text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// A reply line did not begin with a three-digit status code followed by a
    /// space, a hyphen, or the end of the line.
    MalformedReplyLine {
        /// The offending line without its terminator.
        input: String,
    },
    /// A `227` or `229` reply did not carry a usable data-connection address.
    MalformedPassiveReply {
        /// Reply text following the status code.
        input: String,
    },
    /// A `257` reply did not contain a double-quoted pathname.
    MalformedPathReply {
        /// Reply text following the status code.
        input: String,
    },
    /// A structured listing line lacked the space separating facts from the name.
    MalformedFactsLine {
        /// The offending listing line.
        input: String,
    },
    /// A `213` reply did not contain a decimal byte count.
    InvalidSize {
        /// Reply text following the status code.
        input: String,
    },
}

impl ParseError {
    /// Returns the text that failed to parse.
    ///
    /// Every variant retains the raw input so that callers can surface it in
    /// diagnostics without pattern matching on the variant.
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::MalformedReplyLine { input }
            | Self::MalformedPassiveReply { input }
            | Self::MalformedPathReply { input }
            | Self::MalformedFactsLine { input }
            | Self::InvalidSize { input } => input,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedReplyLine { input } => {
                write!(f, "malformed FTP reply line: {input:?}")
            }
            Self::MalformedPassiveReply { input } => {
                write!(f, "malformed passive-mode reply: {input:?}")
            }
            Self::MalformedPathReply { input } => {
                write!(f, "reply does not contain a quoted pathname: {input:?}")
            }
            Self::MalformedFactsLine { input } => {
                write!(f, "malformed MLSD entry: {input:?}")
            }
            Self::InvalidSize { input } => {
                write!(f, "invalid SIZE reply: {input:?}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_accessor_covers_every_variant() {
        let errors = [
            ParseError::MalformedReplyLine { input: "a".into() },
            ParseError::MalformedPassiveReply { input: "b".into() },
            ParseError::MalformedPathReply { input: "c".into() },
            ParseError::MalformedFactsLine { input: "d".into() },
            ParseError::InvalidSize { input: "e".into() },
        ];
        let inputs: Vec<&str> = errors.iter().map(ParseError::input).collect();
        assert_eq!(inputs, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn display_quotes_the_offending_input() {
        let error = ParseError::InvalidSize {
            input: "lots".into(),
        };
        assert_eq!(error.to_string(), "invalid SIZE reply: \"lots\"");
    }
}
