use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::ParseError;

/// Extracts the data-connection address from a `227` reply.
///
/// Servers disagree on punctuation, so the parser looks for the first run of
/// digits and commas rather than requiring parentheses:
/// `Entering Passive Mode (192,168,1,2,19,137).` and `=192,168,1,2,19,137`
/// are both accepted.
///
/// # Examples
///
/// ```
/// use protocol::parse_pasv_reply;
/// use std::net::{Ipv4Addr, SocketAddrV4};
///
/// let addr = parse_pasv_reply("Entering Passive Mode (127,0,0,1,4,1).").unwrap();
/// assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, 1025));
/// ```
pub fn parse_pasv_reply(text: &str) -> Result<SocketAddrV4, ParseError> {
    let malformed = || ParseError::MalformedPassiveReply {
        input: text.to_owned(),
    };

    let start = text.find(|c: char| c.is_ascii_digit()).ok_or_else(malformed)?;
    let tail = &text[start..];
    let end = tail
        .find(|c: char| !(c.is_ascii_digit() || c == ','))
        .unwrap_or(tail.len());

    let mut octets = [0u8; 6];
    let mut count = 0;
    for field in tail[..end].split(',') {
        if count == octets.len() {
            return Err(malformed());
        }
        octets[count] = field.parse().map_err(|_| malformed())?;
        count += 1;
    }
    if count != octets.len() {
        return Err(malformed());
    }

    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    let port = (u16::from(octets[4]) << 8) | u16::from(octets[5]);
    Ok(SocketAddrV4::new(ip, port))
}

/// Extracts the data-connection port from a `229` reply (RFC 2428).
///
/// The payload is `(<d><d><d><port><d>)` where `<d>` is a delimiter chosen by
/// the server, normally `|`.
pub fn parse_epsv_reply(text: &str) -> Result<u16, ParseError> {
    let malformed = || ParseError::MalformedPassiveReply {
        input: text.to_owned(),
    };

    let open = text.find('(').ok_or_else(malformed)?;
    let close = text[open..].find(')').ok_or_else(malformed)? + open;
    let inner = &text[open + 1..close];

    let delimiter = inner.chars().next().ok_or_else(malformed)?;
    let fields: Vec<&str> = inner.split(delimiter).collect();
    match fields.as_slice() {
        ["", "", "", port, ""] => port.parse().map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pasv_without_parentheses_is_accepted() {
        let addr = parse_pasv_reply("=10,0,0,7,195,80").unwrap();
        assert_eq!(addr.ip(), &Ipv4Addr::new(10, 0, 0, 7));
        assert_eq!(addr.port(), 195 * 256 + 80);
    }

    #[test]
    fn pasv_with_too_few_fields_is_rejected() {
        assert!(parse_pasv_reply("Entering Passive Mode (127,0,0,1,4)").is_err());
        assert!(parse_pasv_reply("Entering Passive Mode (127,0,0,1,4,1,9)").is_err());
        assert!(parse_pasv_reply("no address here").is_err());
    }

    #[test]
    fn pasv_with_out_of_range_octet_is_rejected() {
        let error = parse_pasv_reply("(300,0,0,1,4,1)").unwrap_err();
        assert!(matches!(error, ParseError::MalformedPassiveReply { .. }));
    }

    #[test]
    fn epsv_port_is_extracted() {
        assert_eq!(
            parse_epsv_reply("Entering Extended Passive Mode (|||6446|)"),
            Ok(6446)
        );
        assert_eq!(parse_epsv_reply("ok (!!!21!)"), Ok(21));
    }

    #[test]
    fn epsv_with_address_fields_is_rejected() {
        assert!(parse_epsv_reply("(|1|10.0.0.1|6446|)").is_err());
        assert!(parse_epsv_reply("(|||port|)").is_err());
        assert!(parse_epsv_reply("Entering Extended Passive Mode").is_err());
        assert!(parse_epsv_reply("()").is_err());
    }
}
