use crate::error::ParseError;

/// Extracts the pathname from a `257` reply to `PWD` or `MKD`.
///
/// RFC 959 appendix II quotes the pathname with `"` and doubles any embedded
/// quote character. Text following the closing quote is commentary and is
/// discarded.
///
/// # Examples
///
/// ```
/// use protocol::parse_quoted_pathname;
///
/// assert_eq!(
///     parse_quoted_pathname("\"/home/say \"\"hi\"\"\" is current directory").unwrap(),
///     "/home/say \"hi\""
/// );
/// ```
pub fn parse_quoted_pathname(text: &str) -> Result<String, ParseError> {
    let malformed = || ParseError::MalformedPathReply {
        input: text.to_owned(),
    };

    let mut chars = text.trim_start().chars().peekable();
    if chars.next() != Some('"') {
        return Err(malformed());
    }

    let mut path = String::new();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                path.push('"');
            } else {
                return Ok(path);
            }
        } else {
            path.push(c);
        }
    }

    Err(malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_path_is_extracted() {
        assert_eq!(
            parse_quoted_pathname("\"/pub/data\" is the current directory").unwrap(),
            "/pub/data"
        );
    }

    #[test]
    fn root_path_is_extracted() {
        assert_eq!(parse_quoted_pathname("\"/\"").unwrap(), "/");
    }

    #[test]
    fn unterminated_quote_is_rejected() {
        assert!(parse_quoted_pathname("\"/pub").is_err());
    }

    #[test]
    fn unquoted_reply_is_rejected() {
        let error = parse_quoted_pathname("/pub is current").unwrap_err();
        assert_eq!(error.input(), "/pub is current");
    }
}
