//! Custom validation functions for benchmark settings.
//!
//! Each rejection carries the offending value as the `value` parameter so
//! [`crate::ConfigError`] can report it.

use std::borrow::Cow;

use llubench_core::MIN_ELEMENT_SIZE;
use validator::ValidationError;

/// Elements must leave room beyond the link/counter header.
pub fn validate_element_size(size: usize) -> Result<(), ValidationError> {
    if size > MIN_ELEMENT_SIZE {
        return Ok(());
    }
    let mut error = ValidationError::new("element_too_small").with_message(Cow::Owned(format!(
        "element size must be larger than {MIN_ELEMENT_SIZE} bytes"
    )));
    error.add_param(Cow::from("value"), &size);
    Err(error)
}

/// Growth rate must be a finite, non-negative number.
pub fn validate_growth_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && rate >= 0.0 {
        return Ok(());
    }
    let mut error = ValidationError::new("negative_growth_rate")
        .with_message(Cow::from("growth rate must be a non-negative number"));
    error.add_param(Cow::from("value"), &rate);
    Err(error)
}
