//! Property tests for the control-channel parsers.
//!
//! Servers in the wild send all manner of text; the parsers must reject what
//! they cannot understand without panicking.

use proptest::prelude::*;
use protocol::{
    ReplyParser, parse_epsv_reply, parse_mlsd_line, parse_pasv_reply, parse_quoted_pathname,
    parse_size_reply,
};
use std::net::{Ipv4Addr, SocketAddrV4};

proptest! {
    #[test]
    fn reply_parser_never_panics(lines in proptest::collection::vec(".*", 0..8)) {
        let mut parser = ReplyParser::new();
        for line in &lines {
            let _ = parser.push_line(line);
        }
    }

    #[test]
    fn listing_parser_never_panics(line in ".*") {
        if let Ok(entry) = parse_mlsd_line(&line) {
            prop_assert!(!entry.name().is_empty());
        }
    }

    #[test]
    fn passive_parsers_never_panic(text in ".*") {
        let _ = parse_pasv_reply(&text);
        let _ = parse_epsv_reply(&text);
        let _ = parse_size_reply(&text);
    }

    #[test]
    fn pasv_reply_recovers_advertised_endpoint(ip in any::<u32>(), port in any::<u16>()) {
        let ip = Ipv4Addr::from(ip);
        let [a, b, c, d] = ip.octets();
        let text = format!(
            "Entering Passive Mode ({a},{b},{c},{d},{},{}).",
            port >> 8,
            port & 0xff
        );
        prop_assert_eq!(parse_pasv_reply(&text).unwrap(), SocketAddrV4::new(ip, port));
    }

    #[test]
    fn quoted_pathname_survives_embedded_quotes(path in "[^\r\n]*") {
        let text = format!("\"{}\" created", path.replace('"', "\"\""));
        prop_assert_eq!(parse_quoted_pathname(&text).unwrap(), path);
    }
}

#[test]
fn multi_line_greeting_followed_by_single_line_reply() {
    let mut parser = ReplyParser::new();
    let mut replies = Vec::new();
    for line in [
        "220-ProFTPD Server\r\n",
        "220-Unauthorised access prohibited\r\n",
        "220 Ready\r\n",
        "331 Password required\r\n",
    ] {
        if let Some(reply) = parser.push_line(line).expect("valid line") {
            replies.push(reply);
        }
    }

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0].code().get(), 220);
    assert_eq!(replies[0].lines().len(), 3);
    assert_eq!(replies[1].code().get(), 331);
}
