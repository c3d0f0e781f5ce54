//! Decoding of id lists from the `q`/`t` query parameters.
//!
//! Two encodings are accepted for `q`:
//!
//! | `t` | `q` | example |
//! |---|---|---|
//! | absent / anything but `1` | decimal ids | `100,101,103` |
//! | `1` | base-36 first id, then base-36 differences | `2s,1,2` |
//!
//! The delta form keeps links short: a season's ids tend to cluster, so the
//! differences are a digit or two instead of six decimal digits each.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::dataset::Item;

/// Query parameters of the onair endpoint.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct OnAirQuery {
    pub q: Option<String>,
    pub t: Option<String>,
}

/// How the ids in `q` are written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Encoding {
    Decimal,
    Delta36,
}

impl Encoding {
    /// `t=1` selects the delta form; anything else, including no `t`, is decimal.
    pub fn from_flag(t: Option<&str>) -> Self {
        match t {
            Some("1") => Self::Delta36,
            _ => Self::Decimal,
        }
    }
}

/// Decodes `q` into ids, in order.
///
/// A token that is not a number decodes to `None`. In delta form the running
/// sum is lost at that point, so it and every later position are `None`.
pub fn parse_list(q: Option<&str>, encoding: Encoding) -> Vec<Option<i64>> {
    let q = match q {
        Some(q) if !q.is_empty() => q,
        _ => return Vec::new(),
    };
    let tokens = q.split(',');
    match encoding {
        Encoding::Decimal => tokens.map(|token| parse_int(token, 10)).collect(),
        Encoding::Delta36 => {
            let mut acc: Option<Option<i64>> = None;
            tokens
                .map(|token| {
                    let delta = parse_int(token, 36);
                    let next = match acc {
                        None => delta,
                        Some(prev) => prev.zip(delta).and_then(|(p, d)| p.checked_add(d)),
                    };
                    acc = Some(next);
                    next
                })
                .collect()
        }
    }
}

/// Encodes ids in the delta form accepted by `t=1`.
///
/// Callers sort the ids first to get short output; unsorted input still
/// round-trips through negative differences.
pub fn encode_list(ids: &[i64]) -> String {
    let mut out = String::new();
    let mut prev = None;
    for &id in ids {
        if prev.is_some() {
            out.push(',');
        }
        let value = match prev {
            None => i128::from(id),
            Some(p) => i128::from(id) - i128::from(p),
        };
        push_base36(&mut out, value);
        prev = Some(id);
    }
    out
}

fn push_base36(out: &mut String, value: i128) {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value < 0 {
        out.push('-');
    }
    let mut n = value.unsigned_abs();
    let mut buf = Vec::new();
    loop {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
        if n == 0 {
            break;
        }
    }
    out.extend(buf.iter().rev().map(|&b| char::from(b)));
}

/// Reads an integer the way a browser's `parseInt(token, radix)` does:
/// leading whitespace is skipped, one optional sign, then the longest run of
/// digits valid in `radix`. Trailing garbage is ignored.
///
/// Returns `None` when there are no digits or the value does not fit `i64`.
pub fn parse_int(token: &str, radix: u32) -> Option<i64> {
    let s = token.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Parse with the sign attached so i64::MIN is representable.
    let signed = if negative {
        format!("-{}", &digits[..end])
    } else {
        digits[..end].to_owned()
    };
    i64::from_str_radix(&signed, radix).ok()
}

/// One resolved id, serialized as `[id, entry]`.
///
/// `entry` is `null` when the id is not in the catalog; both are `null` when
/// the token could not be read as a number.
#[derive(Debug, PartialEq, Serialize)]
pub struct Row<'a>(pub Option<i64>, pub Option<&'a Item>);

/// Looks up every id in order. Duplicates are answered once per occurrence.
pub fn resolve<'a>(catalog: &'a Catalog, ids: &[Option<i64>]) -> Vec<Row<'a>> {
    ids.iter()
        .map(|&id| Row(id, id.and_then(|id| catalog.get(id))))
        .collect()
}
