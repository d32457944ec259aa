//! Problem-size literal parsing
//!
//! Sizes are written as a decimal mantissa followed by an optional,
//! case-insensitive multiplier suffix:
//!
//! | Suffix | Multiplier |
//! |---|---|
//! | `k`, `kb` | 10³ |
//! | `m`, `mb` | 10⁶ |
//! | `g`, `gb` | 10⁹ |
//! | `ki`, `kib` | 2¹⁰ |
//! | `mi`, `mib` | 2²⁰ |
//! | `gi`, `gib` | 2³⁰ |
//!
//! Fractional mantissas are allowed and the product is truncated toward zero,
//! so `1.5k` is 1500 and `0.5Ki` is 512.

use crate::error::{Error, Result};

// Products above 2^53 can no longer be represented exactly by the f64 mantissa.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

fn multiplier(suffix: &str) -> Option<f64> {
    let value = match suffix {
        "" => 1.0,
        "k" | "kb" => 1e3,
        "m" | "mb" => 1e6,
        "g" | "gb" => 1e9,
        "ki" | "kib" => 1024.0,
        "mi" | "mib" => 1024.0 * 1024.0,
        "gi" | "gib" => 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    Some(value)
}

/// Parse a size literal such as `1024`, `1.5k` or `64MiB` into an element count.
///
/// # Errors
///
/// - [`Error::InvalidSizeLiteral`] for empty input, an unknown suffix, a
///   malformed or negative mantissa, or a value too large to address
/// - [`Error::InvalidProblemSize`] when the value truncates to zero
///
/// # Example
///
/// ```rust
/// use reduced_core::size::parse_size;
///
/// assert_eq!(parse_size("1.5k").unwrap(), 1500);
/// assert_eq!(parse_size("2Mi").unwrap(), 2 * 1024 * 1024);
/// assert!(parse_size("-4").is_err());
/// ```
pub fn parse_size(literal: &str) -> Result<usize> {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return Err(Error::size_literal(literal, "empty size"));
    }

    let lower = trimmed.to_ascii_lowercase();
    let split = lower
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_alphabetic())
        .last()
        .map_or(lower.len(), |(idx, _)| idx);
    let (mantissa, suffix) = lower.split_at(split);

    let scale = multiplier(suffix).ok_or_else(|| Error::size_literal(literal, format!("unknown suffix '{suffix}'")))?;

    if mantissa.is_empty() {
        return Err(Error::size_literal(literal, "missing number before suffix"));
    }
    if mantissa.starts_with('-') {
        return Err(Error::size_literal(literal, "size must not be negative"));
    }
    let value: f64 = mantissa
        .parse()
        .map_err(|_| Error::size_literal(literal, format!("'{mantissa}' is not a number")))?;
    if !value.is_finite() {
        return Err(Error::size_literal(literal, "size must be finite"));
    }

    let scaled = (value * scale).trunc();
    if scaled > MAX_EXACT || scaled > usize::MAX as f64 {
        return Err(Error::size_literal(literal, "size is too large"));
    }
    if scaled < 1.0 {
        return Err(Error::InvalidProblemSize(0));
    }

    tracing::trace!(literal, size = scaled as usize, "size_parsed");
    Ok(scaled as usize)
}
