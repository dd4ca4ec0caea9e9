use crate::error::RuntimeError;

/// Converts an `f32` to `i32` by truncating toward zero.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the value is not finite or does not
/// fit in an `i32` after truncation.
///
/// ## Example
/// ```
/// use pile::{error::RuntimeError, util::num::f32_to_i32_checked};
///
/// assert_eq!(f32_to_i32_checked(3.9).unwrap(), 3);
/// assert_eq!(f32_to_i32_checked(-2.5).unwrap(), -2);
/// assert_eq!(f32_to_i32_checked(f32::NAN).unwrap_err(), RuntimeError::Overflow);
/// assert_eq!(f32_to_i32_checked(1e12).unwrap_err(), RuntimeError::Overflow);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f32_to_i32_checked(value: f32) -> Result<i32, RuntimeError> {
    if !value.is_finite() {
        return Err(RuntimeError::Overflow);
    }
    let truncated = value.trunc();
    // i32::MAX is not representable as f32; 2^31 is the first value past it.
    if truncated < i32::MIN as f32 || truncated >= 2_147_483_648.0 {
        return Err(RuntimeError::Overflow);
    }
    Ok(truncated as i32)
}

/// Converts an `i32` to `f32`.
///
/// Values beyond 2^24 lose precision, the same way the cast does in C.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i32_to_f32(value: i32) -> f32 {
    value as f32
}

/// Converts a container length to an Eve `int`.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the length exceeds `i32::MAX`.
///
/// ## Example
/// ```
/// use pile::util::num::usize_to_i32_checked;
///
/// assert_eq!(usize_to_i32_checked(3).unwrap(), 3);
/// assert!(usize_to_i32_checked(usize::MAX).is_err());
/// ```
pub fn usize_to_i32_checked(value: usize) -> Result<i32, RuntimeError> {
    i32::try_from(value).map_err(|_| RuntimeError::Overflow)
}

/// Validates an Eve index against a container length.
///
/// ## Errors
/// Returns `RuntimeError::IndexOutOfRange` for negative indices and indices
/// at or past `len`.
///
/// ## Example
/// ```
/// use pile::{error::RuntimeError, util::num::index_checked};
///
/// assert_eq!(index_checked(1, 3).unwrap(), 1);
/// assert_eq!(index_checked(3, 3).unwrap_err(),
///            RuntimeError::IndexOutOfRange { index: 3, len: 3 });
/// assert!(index_checked(-1, 3).is_err());
/// ```
pub fn index_checked(index: i32, len: usize) -> Result<usize, RuntimeError> {
    usize::try_from(index).ok()
                          .filter(|i| *i < len)
                          .ok_or(RuntimeError::IndexOutOfRange { index: i64::from(index),
                                                                 len })
}

/// Converts seconds since the epoch to an Eve `int`.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` past January 2038.
pub fn seconds_to_i32_checked(seconds: u64) -> Result<i32, RuntimeError> {
    i32::try_from(seconds).map_err(|_| RuntimeError::Overflow)
}
