//! `$token$` replacement for `.pp` content files.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PackageError, Result};

pub const PREPROCESS_EXTENSION: &str = ".pp";

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)\$").expect("token pattern is valid"));

/// Replace every `$name$` in `text` with `lookup(name)`.
///
/// A token with no value fails the whole file; nothing is partially replaced.
pub fn process<F>(text: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for captures in TOKEN_RE.captures_iter(text) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let value = lookup(name.as_str()).ok_or_else(|| PackageError::MissingTokenValue {
            token: name.as_str().to_string(),
        })?;
        output.push_str(&text[last..whole.start()]);
        output.push_str(&value);
        last = whole.end();
    }

    output.push_str(&text[last..]);
    Ok(output)
}
