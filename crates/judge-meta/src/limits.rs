//! Limit value parsing

use crate::settings::LimitValue;
use crate::{Error, Result};

/// Convert a limit to an integer.
///
/// Numbers are truncated. Strings accept an `ms` suffix, an `s` suffix
/// (scaled by 1000) or a bare decimal. Surrounding whitespace and suffix
/// case are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidLimit`] for negative, non-finite or otherwise
/// unparseable values.
pub fn parse_limit_value(value: &LimitValue) -> Result<u64> {
    match value {
        LimitValue::Number(n) => to_integer(*n, &n.to_string()),
        LimitValue::Text(text) => {
            let normalized = text.trim().to_ascii_lowercase();
            let (digits, scale) = if let Some(ms) = normalized.strip_suffix("ms") {
                (ms, 1.0)
            } else if let Some(s) = normalized.strip_suffix('s') {
                (s, 1000.0)
            } else {
                (normalized.as_str(), 1.0)
            };
            let parsed: f64 = digits.trim().parse().map_err(|_| Error::InvalidLimit {
                value: text.clone(),
            })?;
            to_integer(parsed * scale, text)
        }
    }
}

fn to_integer(value: f64, original: &str) -> Result<u64> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidLimit {
            value: original.to_string(),
        });
    }
    Ok(value.trunc() as u64)
}
