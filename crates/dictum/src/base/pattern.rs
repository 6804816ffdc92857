//! Builtin syntax patterns for text fields.
//!
//! Syntax-level checks only: a URL here is "shaped like a URL", not
//! reachable; an email is "shaped like an address", not deliverable.

use crate::core::field::Pattern;

/// Accepts http/https URLs with a domain, localhost, or dotted-quad
/// host, an optional port, and an optional path/query.
pub const URL: Pattern = Pattern::new("url", check_url);

/// Accepts dot-atom local parts over a plain domain.
pub const EMAIL: Pattern = Pattern::new("email", check_email);

const ATOM_EXTRA: &str = "-!#$%&'*+/=?^_`{}|~";

fn is_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_domain(host: &str) -> bool {
    // a single trailing dot is valid (rooted domain)
    let host = host.strip_suffix('.').unwrap_or(host);
    let labels: Vec<&str> = host.split('.').collect();

    let Some(tld) = labels.last() else {
        return false;
    };
    if labels.len() < 2 {
        return false;
    }
    if !(2..=6).contains(&tld.len()) || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    labels.iter().all(|label| is_label(label))
}

fn is_dotted_quad(host: &str) -> bool {
    let parts: Vec<&str> = host.split('.').collect();
    parts.len() == 4
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.len() <= 3 && p.chars().all(|c| c.is_ascii_digit()))
}

fn is_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost") || is_dotted_quad(host) || is_domain(host)
}

fn check_url(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let Some(rest) = s
        .strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
    else {
        return false;
    };

    let authority = rest
        .split(['/', '?'])
        .next()
        .unwrap_or_default();
    if authority.is_empty() {
        return false;
    }

    let (host, port) = match authority.split_once(':') {
        Some((host, port)) => (host, Some(port)),
        None => (authority, None),
    };
    if let Some(port) = port
        && (port.is_empty() || !port.chars().all(|c| c.is_ascii_digit()))
    {
        return false;
    }

    is_host(host)
}

fn check_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = s.rsplit_once('@') else {
        return false;
    };

    // dot-atom local part
    let local_ok = !local.is_empty()
        && local.split('.').all(|atom| {
            !atom.is_empty()
                && atom
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || ATOM_EXTRA.contains(c))
        });

    local_ok && is_domain(domain)
}
