//! Price conversion for the payment processor.

use crate::error::CoreError;
use crate::types::Price;

/// Number of minor units (cents) per major unit for supported currencies.
pub const MINOR_UNITS_PER_MAJOR: f64 = 100.0;

/// Convert a major-unit price to integer minor units, rounding to the nearest
/// cent.
///
/// Rejects non-finite, non-positive, and overflowing prices.
pub fn to_minor_units(price: Price) -> Result<i64, CoreError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(CoreError::Validation(format!(
            "price must be a positive amount, got {price}"
        )));
    }
    let minor = (price * MINOR_UNITS_PER_MAJOR).round();
    if minor < 1.0 || minor > i64::MAX as f64 {
        return Err(CoreError::Validation(format!(
            "price {price} cannot be charged"
        )));
    }
    Ok(minor as i64)
}
