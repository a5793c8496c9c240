//! Checked decimal formatting
//!
//! Integers are rendered into a fixed stack buffer. Values that would not
//! fit are reported instead of truncated.

use core::fmt::{self, Write};

use heapless::String;

/// Capacity of the number buffer: every `i64`, including `i64::MIN`
/// ("-9223372036854775808"), fits exactly.
pub const NUMBER_BUFFER_LEN: usize = 20;

/// Decimal text produced by [`format_decimal`]
pub type DecimalText = String<NUMBER_BUFFER_LEN>;

/// Error while encoding a value as text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodingError {
    /// Representation longer than [`NUMBER_BUFFER_LEN`]
    Overflow,
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::Overflow => {
                write!(f, "value does not fit in {} characters", NUMBER_BUFFER_LEN)
            }
        }
    }
}

/// Format an integer in base 10
///
/// No leading zeros, `-` for negative values, no `+` and no separators.
/// Accepts anything that widens losslessly to `i128`. Every 64-bit value
/// fits; 128-bit values whose text is longer than [`NUMBER_BUFFER_LEN`]
/// return [`EncodingError::Overflow`].
pub fn format_decimal(value: impl Into<i128>) -> Result<DecimalText, EncodingError> {
    let mut text = DecimalText::new();
    write!(text, "{}", value.into()).map_err(|_| EncodingError::Overflow)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero() {
        assert_eq!(format_decimal(0).unwrap().as_str(), "0");
    }

    #[test]
    fn test_sign() {
        assert_eq!(format_decimal(-42).unwrap().as_str(), "-42");
        assert_eq!(format_decimal(42).unwrap().as_str(), "42");
    }

    #[test]
    fn test_i32_limits() {
        assert_eq!(format_decimal(i32::MAX).unwrap().as_str(), "2147483647");
        assert_eq!(format_decimal(i32::MIN).unwrap().as_str(), "-2147483648");
    }

    #[test]
    fn test_i64_limits_fit() {
        assert_eq!(
            format_decimal(i64::MIN).unwrap().as_str(),
            "-9223372036854775808"
        );
        assert_eq!(
            format_decimal(i64::MAX).unwrap().as_str(),
            "9223372036854775807"
        );
        assert_eq!(
            format_decimal(u64::MAX).unwrap().as_str(),
            "18446744073709551615"
        );
    }

    #[test]
    fn test_wide_values_overflow() {
        assert_eq!(
            format_decimal(-100_000_000_000_000_000_000i128),
            Err(EncodingError::Overflow)
        );
        assert_eq!(format_decimal(i128::MAX), Err(EncodingError::Overflow));
        assert_eq!(format_decimal(i128::MIN), Err(EncodingError::Overflow));
        // 20 digits still fit without a sign
        assert!(format_decimal(99_999_999_999_999_999_999i128).is_ok());
        assert!(format_decimal(-99_999_999_999_999_999_999i128).is_err());
    }
}
