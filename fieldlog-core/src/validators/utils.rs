//! Shared validation helpers
//!
//! Pure functions, no allocation.

use crate::errors::{ValidationError, ValidationResult};

/// Reject values outside `[min, max]`
pub fn check_range(value: f32, min: f32, max: f32) -> ValidationResult<()> {
    if value < min || value > max {
        Err(ValidationError::OutOfRange { value, min, max })
    } else {
        Ok(())
    }
}

/// Reject NaN and infinities
pub fn check_finite(value: f32) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue)
    }
}
