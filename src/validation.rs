//! Validation module for operator input
//!
//! Everything the user types goes through here before it reaches the
//! generator or the settings store:
//!
//! - integer parsing of free text
//! - cell number range checks against the chat's maximum
//! - maximum cell range checks
//!
//! Errors are returned as localization keys so handlers can reply directly.

use lazy_static::lazy_static;
use regex::Regex;

/// Default maximum cell number for chats that never set one
pub const DEFAULT_MAX_CELL: u64 = 999;

/// Lowest accepted maximum cell number
pub const MIN_MAX_CELL: u64 = 10;

/// Highest accepted maximum cell number
pub const MAX_MAX_CELL: u64 = 2000;

lazy_static! {
    static ref INTEGER_PATTERN: Regex =
        Regex::new(r"^[+-]?\d+$").expect("Invalid integer regex pattern");
}

/// Parse user text as an integer
///
/// # Arguments
/// * `text` - Raw message text
///
/// # Returns
/// * `Ok(i64)` - The parsed value, possibly zero or negative, saturated at
///   the `i64` bounds when too long
/// * `Err(&str)` - `"not-a-number"` if the text is not an integer
///
/// # Examples
/// ```
/// use cell_finder::validation::parse_integer;
///
/// assert_eq!(parse_integer(" 42 "), Ok(42));
/// assert_eq!(parse_integer("-3"), Ok(-3));
/// assert_eq!(parse_integer("A12"), Err("not-a-number"));
/// ```
pub fn parse_integer(text: &str) -> Result<i64, &'static str> {
    let trimmed = text.trim();

    if !INTEGER_PATTERN.is_match(trimmed) {
        return Err("not-a-number");
    }

    // Past the pattern the only parse failure is overflow; saturate so the
    // range checks report it as out of range
    Ok(trimmed.parse::<i64>().unwrap_or(if trimmed.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    }))
}

/// Check that a parsed value is a cell number within `[1, max_cell]`
///
/// # Examples
/// ```
/// use cell_finder::validation::validate_cell_number;
///
/// assert_eq!(validate_cell_number(12, 999), Ok(12));
/// assert_eq!(validate_cell_number(0, 999), Err("cell-out-of-range"));
/// assert_eq!(validate_cell_number(1000, 999), Err("cell-out-of-range"));
/// ```
pub fn validate_cell_number(value: i64, max_cell: u64) -> Result<u64, &'static str> {
    match u64::try_from(value) {
        Ok(number) if (1..=max_cell).contains(&number) => Ok(number),
        _ => Err("cell-out-of-range"),
    }
}

/// Check that a parsed value is an acceptable maximum cell number
///
/// # Examples
/// ```
/// use cell_finder::validation::validate_max_cell;
///
/// assert_eq!(validate_max_cell(500), Ok(500));
/// assert_eq!(validate_max_cell(5), Err("max-out-of-range"));
/// assert_eq!(validate_max_cell(2001), Err("max-out-of-range"));
/// ```
pub fn validate_max_cell(value: i64) -> Result<u64, &'static str> {
    match u64::try_from(value) {
        Ok(max_cell) if (MIN_MAX_CELL..=MAX_MAX_CELL).contains(&max_cell) => Ok(max_cell),
        _ => Err("max-out-of-range"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer_accepts_signs_and_whitespace() {
        assert_eq!(parse_integer("7"), Ok(7));
        assert_eq!(parse_integer("  0099\n"), Ok(99));
        assert_eq!(parse_integer("+15"), Ok(15));
        assert_eq!(parse_integer("-15"), Ok(-15));
    }

    #[test]
    fn test_parse_integer_rejects_text() {
        assert_eq!(parse_integer(""), Err("not-a-number"));
        assert_eq!(parse_integer("   "), Err("not-a-number"));
        assert_eq!(parse_integer("12a"), Err("not-a-number"));
        assert_eq!(parse_integer("1 2"), Err("not-a-number"));
        assert_eq!(parse_integer("1.5"), Err("not-a-number"));
    }

    #[test]
    fn test_parse_integer_saturates_long_numbers() {
        assert_eq!(parse_integer("99999999999999999999999"), Ok(i64::MAX));
        assert_eq!(parse_integer("-99999999999999999999999"), Ok(i64::MIN));
        assert_eq!(validate_cell_number(i64::MAX, 999), Err("cell-out-of-range"));
        assert_eq!(validate_max_cell(i64::MIN), Err("max-out-of-range"));
    }

    #[test]
    fn test_validate_cell_number_bounds() {
        assert_eq!(validate_cell_number(1, 10), Ok(1));
        assert_eq!(validate_cell_number(10, 10), Ok(10));
        assert_eq!(validate_cell_number(11, 10), Err("cell-out-of-range"));
        assert_eq!(validate_cell_number(-1, 10), Err("cell-out-of-range"));
    }

    #[test]
    fn test_validate_max_cell_bounds() {
        assert_eq!(validate_max_cell(MIN_MAX_CELL as i64), Ok(MIN_MAX_CELL));
        assert_eq!(validate_max_cell(MAX_MAX_CELL as i64), Ok(MAX_MAX_CELL));
        assert_eq!(validate_max_cell(9), Err("max-out-of-range"));
        assert_eq!(validate_max_cell(-500), Err("max-out-of-range"));
    }
}
