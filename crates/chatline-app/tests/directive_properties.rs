//! Property-based tests for directive parsing.
//!
//! Parsing must be total: any line classifies as a directive, a payload or a
//! parse error, and only marker-prefixed lines are ever interpreted.

use chatline_app::{Directive, Input, ParseError, directive};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_unmarked_lines_are_payloads(line in "[^#].*") {
        prop_assert_eq!(directive::parse(&line), Ok(Input::Payload(line.as_str())));
    }

    #[test]
    fn prop_marked_lines_never_become_payloads(rest in ".*") {
        let line = format!("#{rest}");
        prop_assert!(!matches!(directive::parse(&line), Ok(Input::Payload(_))));
    }

    #[test]
    fn prop_every_port_parses(port in any::<u16>(), extra in "( [a-z0-9]+){0,3}") {
        let line = format!("#setport {port}{extra}");
        prop_assert_eq!(
            directive::parse(&line),
            Ok(Input::Directive(Directive::SetPort { port }))
        );
    }

    #[test]
    fn prop_out_of_range_ports_rejected(port in 65_536u32..10_000_000) {
        let line = format!("#setport {port}");
        let is_invalid_port = matches!(directive::parse(&line), Err(ParseError::InvalidPort { .. }));
        prop_assert!(is_invalid_port);
    }

    #[test]
    fn prop_sethost_takes_first_token(host in "[a-z][a-z0-9.-]{0,20}", rest in "( [a-z]+){0,3}") {
        let line = format!("#sethost {host}{rest}");
        prop_assert_eq!(
            directive::parse(&line),
            Ok(Input::Directive(Directive::SetHost { host: host.clone() }))
        );
    }
}
