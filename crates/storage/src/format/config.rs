//! Configuration strings
//!
//! Engine config and table metadata use the same `key=value,...` syntax:
//!
//! ```text
//! key_format=i,value_format=S,app_metadata=(version=1,owner="a,b"),readonly
//! ```
//!
//! - Commas inside `()`, `[]` or double quotes do not split entries
//! - A bare key (`readonly`) means `readonly=true`
//! - Surrounding double quotes are stripped from values

use crate::error::{EngineError, EngineResult};

/// One `key=value` entry of a configuration string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// Entry key
    pub key: String,
    /// Entry value, unquoted; nested groups keep their parentheses
    pub value: String,
}

/// Split a configuration string into entries, in order of appearance.
pub fn parse_config(config: &str) -> EngineResult<Vec<ConfigEntry>> {
    split_top_level(config, ',')?
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_entry)
        .collect()
}

/// Look up the last value of `key` in a configuration string.
///
/// Later entries override earlier ones.
pub fn config_value(config: &str, key: &str) -> EngineResult<Option<String>> {
    Ok(parse_config(config)?
        .into_iter()
        .rev()
        .find(|entry| entry.key == key)
        .map(|entry| entry.value))
}

fn parse_entry(item: &str) -> EngineResult<ConfigEntry> {
    let parts = split_top_level(item, '=')?;
    let key = parts[0].trim();
    if key.is_empty() {
        return Err(EngineError::InvalidConfig(format!("missing key in '{}'", item)));
    }

    let value = if parts.len() == 1 {
        "true".to_string()
    } else {
        // Only the first top-level '=' separates key from value
        let raw = item[parts[0].len() + 1..].trim();
        unquote(raw).to_string()
    };

    Ok(ConfigEntry {
        key: key.to_string(),
        value,
    })
}

fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Split on `sep` where it appears outside brackets and quotes.
fn split_top_level(s: &str, sep: char) -> EngineResult<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | '[' if !in_quotes => depth += 1,
            ')' | ']' if !in_quotes => {
                depth -= 1;
                if depth < 0 {
                    return Err(EngineError::InvalidConfig(format!(
                        "unbalanced '{}' in '{}'",
                        c, s
                    )));
                }
            }
            c if c == sep && !in_quotes && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err(EngineError::InvalidConfig(format!("unterminated quote in '{}'", s)));
    }
    if depth != 0 {
        return Err(EngineError::InvalidConfig(format!("unclosed group in '{}'", s)));
    }

    parts.push(&s[start..]);
    Ok(parts)
}
