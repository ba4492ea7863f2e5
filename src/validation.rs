//! Request validation utilities.

use crate::types::{Error, ProductId, Result};

/// Validate that a string is not empty.
pub fn validate_non_empty(s: &str, field: &str) -> Result<()> {
    if s.is_empty() {
        return Err(Error::validation(format!("{} cannot be empty", field)));
    }
    Ok(())
}

/// Parse a tool-supplied product id.
pub fn product_id(s: &str, field: &str) -> Result<ProductId> {
    validate_non_empty(s, field)?;
    ProductId::from_string(s.to_string()).map_err(Error::validation)
}

/// Interpret an optional JSON number as a whole count, `default` when absent.
///
/// Integral floats (`10.0`) are accepted; negative or fractional values are not.
pub fn count(value: Option<f64>, default: u64, field: &str) -> Result<u64> {
    let Some(n) = value else {
        return Ok(default);
    };
    // Bounded by 2^53 so the cast is exact.
    if n >= 0.0 && n.fract() == 0.0 && n <= 9_007_199_254_740_992.0 {
        Ok(n as u64)
    } else {
        Err(Error::validation(format!(
            "{} must be a non-negative integer, got {}",
            field, n
        )))
    }
}

/// Clamp a caller-supplied page size to an inclusive ceiling.
pub fn clamp_limit(requested: u64, max: u64) -> u64 {
    requested.min(max)
}
