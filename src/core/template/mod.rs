//! URI template expansion.
//!
//! Implements the subset of RFC 6570 that HAL link relations use in
//! practice: the simple `{var}` form, the `+ # . / ; ? &` operators,
//! comma-separated variable lists, and `:N` prefix modifiers. Argument
//! values arrive already canonicalized to text (see
//! [`canonical_text`](crate::core::utils::canonical_text)); unset variables
//! expand to nothing, so partially bound templates still produce a string.
//!
//! # Examples
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let mut args = BTreeMap::new();
//! args.insert("id".to_string(), "0".to_string());
//! assert_eq!(
//!     halnav::core::template::expand("/orders{?id}", &args).unwrap(),
//!     "/orders?id=0"
//! );
//! ```

use std::collections::{BTreeMap, BTreeSet};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::core::error::{HalError, Result};

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The `+` and `#` operators additionally pass reserved characters through.
const RESERVED_OK: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'/')
    .remove(b'?')
    .remove(b'#')
    .remove(b'[')
    .remove(b']')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=')
    .remove(b'%');

/// Expansion behavior of one operator.
struct Operator {
    first: &'static str,
    sep: &'static str,
    named: bool,
    /// What follows the name when the value is empty (`;x` vs `?x=`).
    ifemp: &'static str,
    allow_reserved: bool,
}

const SIMPLE: Operator = Operator {
    first: "",
    sep: ",",
    named: false,
    ifemp: "",
    allow_reserved: false,
};

fn operator(c: char) -> Option<Operator> {
    match c {
        '+' => Some(Operator {
            allow_reserved: true,
            ..SIMPLE
        }),
        '#' => Some(Operator {
            first: "#",
            allow_reserved: true,
            ..SIMPLE
        }),
        '.' => Some(Operator {
            first: ".",
            sep: ".",
            ..SIMPLE
        }),
        '/' => Some(Operator {
            first: "/",
            sep: "/",
            ..SIMPLE
        }),
        ';' => Some(Operator {
            first: ";",
            sep: ";",
            named: true,
            ifemp: "",
            ..SIMPLE
        }),
        '?' => Some(Operator {
            first: "?",
            sep: "&",
            named: true,
            ifemp: "=",
            ..SIMPLE
        }),
        '&' => Some(Operator {
            first: "&",
            sep: "&",
            named: true,
            ifemp: "=",
            ..SIMPLE
        }),
        _ => None,
    }
}

/// One `name` or `name:3` entry inside an expression.
struct VarSpec<'a> {
    name: &'a str,
    prefix: Option<usize>,
}

fn parse_varspec(spec: &str) -> Result<VarSpec<'_>> {
    let spec = spec.trim_end_matches('*');
    let (name, prefix) = match spec.split_once(':') {
        Some((name, len)) => {
            let len = len
                .parse::<usize>()
                .map_err(|_| HalError::InvalidTemplate(format!("bad prefix modifier in {spec}")))?;
            (name, Some(len))
        }
        None => (spec, None),
    };
    if name.is_empty() {
        return Err(HalError::InvalidTemplate(format!(
            "empty variable name in {{{spec}}}"
        )));
    }
    Ok(VarSpec { name, prefix })
}

/// Split a template into literal and `{...}` expression chunks.
fn chunks(template: &str) -> Result<Vec<(bool, &str)>> {
    let mut out = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        if open > 0 {
            out.push((false, &rest[..open]));
        }
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            HalError::InvalidTemplate(format!("unterminated expression in {template}"))
        })?;
        out.push((true, &after[..close]));
        rest = &after[close + 1..];
    }
    if !rest.is_empty() {
        out.push((false, rest));
    }
    Ok(out)
}

/// Expand `template` with the given argument values.
///
/// Unset variables contribute nothing to the output. Fails only when the
/// template itself is malformed.
pub fn expand(template: &str, args: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    for (is_expr, chunk) in chunks(template)? {
        if !is_expr {
            out.push_str(chunk);
            continue;
        }
        out.push_str(&expand_expression(chunk, args)?);
    }
    Ok(out)
}

fn expand_expression(expr: &str, args: &BTreeMap<String, String>) -> Result<String> {
    if expr.is_empty() {
        return Err(HalError::InvalidTemplate("empty expression {}".into()));
    }
    let (op, speclist) = match operator(expr.chars().next().unwrap_or_default()) {
        Some(op) => (op, &expr[1..]),
        None => (SIMPLE, expr),
    };

    let set = if op.allow_reserved {
        RESERVED_OK
    } else {
        UNRESERVED
    };
    let mut parts = Vec::new();
    for spec in speclist.split(',') {
        let spec = parse_varspec(spec)?;
        let Some(value) = args.get(spec.name) else {
            continue;
        };
        let value = match spec.prefix {
            Some(len) => {
                let end = value
                    .char_indices()
                    .nth(len)
                    .map(|(i, _)| i)
                    .unwrap_or(value.len());
                &value[..end]
            }
            None => value.as_str(),
        };
        let encoded = utf8_percent_encode(value, set).to_string();
        if op.named {
            if encoded.is_empty() {
                parts.push(format!("{}{}", spec.name, op.ifemp));
            } else {
                parts.push(format!("{}={}", spec.name, encoded));
            }
        } else {
            parts.push(encoded);
        }
    }
    if parts.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{}{}", op.first, parts.join(op.sep)))
}

/// Names of every variable appearing in `template`.
///
/// Returns the empty set for templates that are really concrete URIs; a
/// malformed template also yields the empty set (introspection never fails).
pub fn variables(template: &str) -> BTreeSet<String> {
    let Ok(chunks) = chunks(template) else {
        return BTreeSet::new();
    };
    let mut vars = BTreeSet::new();
    for (is_expr, chunk) in chunks {
        if !is_expr || chunk.is_empty() {
            continue;
        }
        let speclist = match operator(chunk.chars().next().unwrap_or_default()) {
            Some(_) => &chunk[1..],
            None => chunk,
        };
        for spec in speclist.split(',') {
            if let Ok(spec) = parse_varspec(spec) {
                vars.insert(spec.name.to_owned());
            }
        }
    }
    vars
}
