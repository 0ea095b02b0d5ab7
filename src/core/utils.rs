//! Address normalization and display-name helpers.

use deunicode::deunicode;
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::core::error::{HalError, Result};

/// Prepend the `http://` scheme to a url if necessary.
///
/// Fails if a scheme other than `http`/`https` is declared, or if more than
/// one scheme separator is present.
///
/// # Examples
///
/// ```
/// use halnav::core::utils::fix_scheme;
///
/// assert_eq!(fix_scheme("example.com").unwrap(), "http://example.com");
/// assert_eq!(fix_scheme("https://example.com").unwrap(), "https://example.com");
/// assert!(fix_scheme("ftp://example.com").is_err());
/// ```
pub fn fix_scheme(url: &str) -> Result<String> {
    let parts: Vec<&str> = url.split("://").collect();
    match parts.len() {
        1 => Ok(format!("http://{url}")),
        2 => {
            if matches!(parts[0], "http" | "https") {
                Ok(url.to_owned())
            } else {
                Err(HalError::UnsupportedScheme(parts[0].to_owned()))
            }
        }
        _ => Err(HalError::DuplicateScheme(url.to_owned())),
    }
}

/// Canonical textual form of a JSON value.
///
/// Used wherever values of unknown type must act as lookup keys or template
/// arguments: numbers keep their printed form (so `0` stays `"0"` rather
/// than collapsing to an empty string), strings pass through unquoted, and
/// compound values fall back to their JSON serialization.
pub fn canonical_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        compound => compound.to_string(),
    }
}

const GENERIC_DOMAINS: [&str; 3] = ["localhost", "herokuapp", "appspot"];

/// Derive a compact display name from a root URI.
///
/// Percent-escapes are unquoted and non-ASCII text romanized before the
/// pieces of the address are camel-cased together, e.g.
/// `http://api.example.com/v2/orders` becomes `ExampleOrdersAPI.v2`.
/// Used for the default navigator name; callers can always supply their own.
pub fn namify(root_uri: &str) -> String {
    let unquoted = percent_decode_str(root_uri).decode_utf8_lossy();
    let ascii = deunicode(&unquoted);
    let fixed = match fix_scheme(&ascii) {
        Ok(fixed) => fixed,
        Err(_) => ascii.clone(),
    };
    let parsed = match url::Url::parse(&fixed) {
        Ok(parsed) => parsed,
        Err(_) => return ascii,
    };

    let mut pieces: Vec<String> = Vec::new();
    if let Some(host) = parsed.host_str() {
        let host = host.to_ascii_lowercase();
        // Numeric or v6 hosts carry no name information.
        if !host
            .chars()
            .all(|c| c.is_ascii_digit() || "abcdef:.[]".contains(c))
        {
            let (rest, tld) = match host.rsplit_once('.') {
                Some((rest, tld)) => (rest.to_owned(), tld.to_owned()),
                None => (host.clone(), String::new()),
            };
            let (subdomain, domain) = match rest.rsplit_once('.') {
                Some((sub, dom)) => (sub.to_owned(), dom.to_owned()),
                None => (String::new(), rest),
            };
            if subdomain != "www" {
                pieces.extend(subdomain.split('.').map(str::to_owned));
            }
            if !GENERIC_DOMAINS.contains(&domain.as_str()) {
                pieces.push(domain);
            }
            if tld.len() == 2 {
                pieces.push(tld.to_ascii_uppercase());
            } else if tld != "com" {
                pieces.push(tld);
            }
        }
    }
    pieces.extend(
        parsed
            .path()
            .to_ascii_lowercase()
            .split('/')
            .filter(|p| !p.is_empty())
            .map(str::to_owned),
    );
    if let Some(query) = parsed.query() {
        pieces.extend(
            query
                .split(',')
                .flat_map(|q| q.split('='))
                .filter(|r| !r.is_empty())
                .map(str::to_owned),
        );
    }

    let mut api = false;
    let mut version = String::new();
    let mut name = String::new();
    for piece in pieces {
        if piece == "api" {
            api = true;
            continue;
        }
        if is_version_piece(&piece) {
            version.push('.');
            version.push_str(&piece);
            continue;
        }
        let piece = if piece.contains("api") {
            piece.replace("api", "API")
        } else {
            piece
        };
        name.push_str(&capify(&piece));
    }
    if api {
        name.push_str("API");
    }
    name.push_str(&version);
    name
}

/// `vN` or `vN.N...` path segments are version markers, not name pieces.
fn is_version_piece(piece: &str) -> bool {
    let mut chars = piece.chars();
    chars.next() == Some('v')
        && piece.len() > 1
        && chars.all(|c| c.is_ascii_digit() || c == '.')
}

/// Capitalize the first letter without downcasing the rest.
fn capify(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
