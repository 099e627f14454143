//! Single mailbox address syntax check.
//!
//! Accepts the forms a mail header parser accepts for one address:
//!
//! - bare `local@domain`
//! - `Display Name <local@domain>` (display name may be quoted)
//!
//! The local part is a dot-atom or a quoted string; the domain is a dot-atom
//! or a bracketed literal. Surrounding whitespace is ignored.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("no angle-addr")]
    MissingAngleAddr,

    #[error("unclosed angle-addr")]
    UnclosedAngleAddr,

    #[error("unexpected text after address: {0:?}")]
    TrailingText(String),

    #[error("missing @ in addr-spec")]
    MissingAt,

    #[error("invalid local part: {0:?}")]
    InvalidLocalPart(String),

    #[error("invalid domain: {0:?}")]
    InvalidDomain(String),
}

/// Parse a single address and return its `local@domain` part.
pub fn parse_address(input: &str) -> Result<&str, EmailError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EmailError::MissingAt);
    }

    // A quoted display name may itself contain '<'.
    let name_end = if trimmed.starts_with('"') {
        quoted_len(trimmed).unwrap_or(0)
    } else {
        0
    };
    let angle = trimmed[name_end..].find('<').map(|i| i + name_end);

    let addr_spec = match angle {
        Some(open) => {
            let display_name = trimmed[..open].trim();
            if !display_name.is_empty() && !is_display_name(display_name) {
                return Err(EmailError::MissingAngleAddr);
            }
            let rest = &trimmed[open + 1..];
            let close = rest.find('>').ok_or(EmailError::UnclosedAngleAddr)?;
            let trailing = rest[close + 1..].trim();
            if !trailing.is_empty() {
                return Err(EmailError::TrailingText(trailing.to_string()));
            }
            &rest[..close]
        }
        None => trimmed,
    };

    check_addr_spec(addr_spec)?;
    Ok(addr_spec)
}

fn check_addr_spec(addr: &str) -> Result<(), EmailError> {
    let at = addr.rfind('@').ok_or(EmailError::MissingAt)?;
    let (local, domain) = (&addr[..at], &addr[at + 1..]);

    let local_ok = if local.starts_with('"') {
        is_quoted_string(local)
    } else {
        is_dot_atom(local)
    };
    if !local_ok {
        return Err(EmailError::InvalidLocalPart(local.to_string()));
    }

    let domain_ok = if domain.starts_with('[') {
        is_domain_literal(domain)
    } else {
        is_dot_atom(domain)
    };
    if !domain_ok {
        return Err(EmailError::InvalidDomain(domain.to_string()));
    }

    Ok(())
}

/// RFC 5322 `atext`.
fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~".contains(c) || !c.is_ascii()
}

/// One or more atoms joined by single dots, no leading or trailing dot.
fn is_dot_atom(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(|atom| !atom.is_empty() && atom.chars().all(is_atext))
}

fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if chars.next().is_none() {
                    return false;
                }
            }
            '"' => return false,
            c if c.is_control() => return false,
            _ => {}
        }
    }
    true
}

/// Byte length of the quoted string at the start of `s`, closing quote included.
fn quoted_len(s: &str) -> Option<usize> {
    let mut chars = s.char_indices().skip(1);
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next()?;
            }
            '"' => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn is_domain_literal(s: &str) -> bool {
    match s.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        Some(inner) => inner
            .chars()
            .all(|c| c.is_ascii_graphic() && c != '[' && c != ']' && c != '\\'),
        None => false,
    }
}

/// A phrase of words (atoms, quoted strings) separated by whitespace.
fn is_display_name(s: &str) -> bool {
    if s.starts_with('"') {
        return is_quoted_string(s);
    }
    s.split_whitespace()
        .all(|word| word.chars().all(|c| is_atext(c) || c == '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        for ok in [
            "a@x.com",
            "test1@example.com",
            "first.last+tag@sub.example.co.uk",
            "user@localhost",
            "  padded@example.com  ",
            "\"quoted local\"@example.com",
            "ops@[192.168.0.1]",
        ] {
            assert!(parse_address(ok).is_ok(), "{ok:?} should be accepted");
        }
    }

    #[test]
    fn accepts_display_name_form_and_returns_addr_spec() {
        assert_eq!(parse_address("Alice <alice@example.com>"), Ok("alice@example.com"));
        assert_eq!(
            parse_address("\"Smith, Bob\" <bob@example.com>"),
            Ok("bob@example.com")
        );
        assert_eq!(parse_address("<carol@example.com>"), Ok("carol@example.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert_eq!(parse_address("invalid-email"), Err(EmailError::MissingAt));
        assert_eq!(parse_address(""), Err(EmailError::MissingAt));
        assert!(matches!(parse_address("@example.com"), Err(EmailError::InvalidLocalPart(_))));
        assert!(matches!(parse_address("a..b@example.com"), Err(EmailError::InvalidLocalPart(_))));
        assert!(matches!(parse_address(".a@example.com"), Err(EmailError::InvalidLocalPart(_))));
        assert!(matches!(parse_address("a b@example.com"), Err(EmailError::InvalidLocalPart(_))));
        assert!(matches!(parse_address("a@"), Err(EmailError::InvalidDomain(_))));
        assert!(matches!(parse_address("a@example..com"), Err(EmailError::InvalidDomain(_))));
        assert!(matches!(parse_address("a@exa mple.com"), Err(EmailError::InvalidDomain(_))));
    }

    #[test]
    fn quoted_display_name_may_contain_angle_bracket() {
        assert_eq!(parse_address("\"a<b\" <x@y.com>"), Ok("x@y.com"));
        assert_eq!(
            parse_address("\"say \\\"hi\\\" <\" <x@y.com>"),
            Ok("x@y.com")
        );
        assert_eq!(parse_address("\"a<b\"@y.com"), Ok("\"a<b\"@y.com"));
    }

    #[test]
    fn rejects_broken_angle_addr() {
        assert_eq!(
            parse_address("Alice <alice@example.com"),
            Err(EmailError::UnclosedAngleAddr)
        );
        assert!(matches!(
            parse_address("Alice <alice@example.com> extra"),
            Err(EmailError::TrailingText(_))
        ));
        assert_eq!(
            parse_address("Al@ice <alice@example.com>"),
            Err(EmailError::MissingAngleAddr)
        );
    }
}
