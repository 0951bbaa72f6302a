//! # Similar Cell Generator
//!
//! Produces the cell numbers an operator could plausibly have confused with a
//! queried cell. Four independent sources are merged:
//!
//! - single-digit substitution (one wrong digit)
//! - pairwise transposition (two digits swapped)
//! - common mistakes (`6↔9`, `1↔7`, `0↔8`, every occurrence replaced at once)
//! - 180° rotation (label read upside-down)
//!
//! Every transformed digit string is converted back to an integer, which
//! strips leading zeros: substituting `0` for the leading `1` of `105` yields
//! `5`, not `"005"`. This changes the digit count and is relied on by callers.
//!
//! ```
//! use cell_finder::similar_cells::{generate_similar_numbers, rotate_number};
//!
//! assert_eq!(rotate_number(16), Some(91));
//! assert_eq!(generate_similar_numbers(5, 999), vec![1, 2, 3, 4, 6, 7, 8, 9]);
//! ```

use std::collections::BTreeSet;

/// Maximum number of candidates returned for one query
pub const MAX_SIMILAR_RESULTS: usize = 20;

/// Digits that stay readable after a 180° rotation, with what they turn into
pub const ROTATE_DIGITS: [(char, char); 5] = [
    ('0', '0'),
    ('1', '1'),
    ('6', '9'),
    ('8', '8'),
    ('9', '6'),
];

/// Digit pairs frequently misread for each other, in both directions
pub const COMMON_MISTAKES: [(char, char); 6] = [
    ('6', '9'),
    ('9', '6'),
    ('1', '7'),
    ('7', '1'),
    ('0', '8'),
    ('8', '0'),
];

/// Outcome of analysing one cell number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimilarityReport {
    /// The queried cell number
    pub number: u64,
    /// Ascending, deduplicated candidates (at most [`MAX_SIMILAR_RESULTS`])
    pub candidates: Vec<u64>,
    /// Whether the upside-down reading of `number` is among `candidates`
    pub rotated: bool,
}

impl SimilarityReport {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

fn rotate_digit(digit: char) -> Option<char> {
    ROTATE_DIGITS
        .iter()
        .find(|(from, _)| *from == digit)
        .map(|(_, to)| *to)
}

/// Parse a transformed digit string, dropping it unless it is a valid
/// candidate for `number`.
///
/// Strings that overflow `u64` cannot be inside any bound and are skipped.
fn accept_candidate(digits: &str, number: u64, max_cell: u64) -> Option<u64> {
    let value = digits.parse::<u64>().ok()?;
    (1..=max_cell)
        .contains(&value)
        .then_some(value)
        .filter(|value| *value != number)
}

/// Read `number` upside-down.
///
/// Returns `None` when any digit has no rotated form or when the rotated
/// string is all zeros.
pub fn rotate_number(number: u64) -> Option<u64> {
    let rotated: String = number
        .to_string()
        .chars()
        .rev()
        .map(rotate_digit)
        .collect::<Option<String>>()?;

    let trimmed = rotated.trim_start_matches('0');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Candidates obtained by replacing one digit with any other digit
fn substitution_candidates(number: u64, max_cell: u64, similar: &mut BTreeSet<u64>) {
    let digits: Vec<char> = number.to_string().chars().collect();

    for position in 0..digits.len() {
        for replacement in '0'..='9' {
            if replacement == digits[position] {
                continue;
            }
            let mut variant = digits.clone();
            variant[position] = replacement;
            let variant: String = variant.into_iter().collect();
            similar.extend(accept_candidate(&variant, number, max_cell));
        }
    }
}

/// Candidates obtained by swapping two digits
fn transposition_candidates(number: u64, max_cell: u64, similar: &mut BTreeSet<u64>) {
    let digits: Vec<char> = number.to_string().chars().collect();

    for i in 0..digits.len() {
        for j in (i + 1)..digits.len() {
            let mut variant = digits.clone();
            variant.swap(i, j);
            let variant: String = variant.into_iter().collect();
            similar.extend(accept_candidate(&variant, number, max_cell));
        }
    }
}

/// Apply every common-mistake pair to the whole number.
///
/// All occurrences of a digit are replaced in one pass: a label printed with
/// a systematically misread digit is misread everywhere on it.
pub fn apply_common_mistakes(number: u64, max_cell: u64) -> BTreeSet<u64> {
    let mut similar = BTreeSet::new();
    let num_str = number.to_string();

    for (old_digit, new_digit) in COMMON_MISTAKES {
        if num_str.contains(old_digit) {
            let variant = num_str.replace(old_digit, &new_digit.to_string());
            similar.extend(accept_candidate(&variant, number, max_cell));
        }
    }

    for (old_digit, new_digit) in COMMON_MISTAKES {
        if num_str.contains(new_digit) {
            let variant = num_str.replace(new_digit, &old_digit.to_string());
            similar.extend(accept_candidate(&variant, number, max_cell));
        }
    }

    similar
}

/// Every candidate for `number` within `[1, max_cell]`, before truncation
pub fn similar_number_set(number: u64, max_cell: u64) -> BTreeSet<u64> {
    let mut similar = BTreeSet::new();

    substitution_candidates(number, max_cell, &mut similar);
    transposition_candidates(number, max_cell, &mut similar);
    similar.extend(apply_common_mistakes(number, max_cell));

    if let Some(rotated) = rotate_number(number) {
        if (1..=max_cell).contains(&rotated) && rotated != number {
            similar.insert(rotated);
        }
    }

    similar
}

/// Generate the cells that could have been confused with `number`.
///
/// The result is ascending, deduplicated, restricted to `[1, max_cell]`,
/// never contains `number` itself and holds at most
/// [`MAX_SIMILAR_RESULTS`] entries (the lowest ones).
pub fn generate_similar_numbers(number: u64, max_cell: u64) -> Vec<u64> {
    similar_number_set(number, max_cell)
        .into_iter()
        .take(MAX_SIMILAR_RESULTS)
        .collect()
}

/// Generate candidates together with the rotation flag
pub fn analyze_cell(number: u64, max_cell: u64) -> SimilarityReport {
    let candidates = generate_similar_numbers(number, max_cell);
    let rotated = rotate_number(number).is_some_and(|r| candidates.contains(&r));

    SimilarityReport {
        number,
        candidates,
        rotated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_number() {
        assert_eq!(rotate_number(16), Some(91));
        assert_eq!(rotate_number(69), Some(69));
        assert_eq!(rotate_number(100), Some(1));
        assert_eq!(rotate_number(609), Some(609));
        assert_eq!(rotate_number(5), None);
        assert_eq!(rotate_number(123), None);
    }

    #[test]
    fn test_rotate_number_all_zeros_is_undefined() {
        assert_eq!(rotate_number(0), None);
    }

    #[test]
    fn test_single_digit_substitution_only() {
        assert_eq!(generate_similar_numbers(5, 999), vec![1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_leading_zero_is_stripped() {
        // "105" with the leading digit replaced by 0 reads as 5
        let similar = generate_similar_numbers(105, 999);
        assert!(similar.contains(&5));
    }

    #[test]
    fn test_leading_digit_substitution() {
        let all = similar_number_set(100, 999);
        assert!(all.contains(&800));
        assert!(!all.contains(&100));

        // 800 is not among the 20 lowest candidates of 100
        let similar = generate_similar_numbers(100, 999);
        assert_eq!(similar.len(), MAX_SIMILAR_RESULTS);
        assert!(!similar.contains(&800));
        assert_eq!(similar.first(), Some(&1));
        assert_eq!(similar.last(), Some(&188));
    }

    #[test]
    fn test_common_mistakes_replace_all_occurrences() {
        let similar = apply_common_mistakes(166, 999);
        assert!(similar.contains(&199));
        assert!(similar.contains(&766));
        // one-at-a-time replacement is not a common mistake
        assert!(!similar.contains(&169));
    }

    #[test]
    fn test_common_mistakes_ignore_untouched_digits() {
        assert!(apply_common_mistakes(5, 999).is_empty());
        assert!(apply_common_mistakes(234, 999).is_empty());
    }

    #[test]
    fn test_self_rotating_number_has_no_rotation_flag() {
        let report = analyze_cell(69, 999);
        assert!(report.candidates.contains(&96));
        assert!(!report.candidates.contains(&69));
        assert!(!report.rotated);
    }

    #[test]
    fn test_rotation_flag_set() {
        let report = analyze_cell(16, 999);
        assert!(report.candidates.contains(&91));
        assert!(report.rotated);
    }

    #[test]
    fn test_rotation_flag_unset_when_rotation_is_out_of_range() {
        // 16 rotates to 91, above the bound
        let report = analyze_cell(16, 50);
        assert!(!report.candidates.contains(&91));
        assert!(!report.rotated);
    }

    #[test]
    fn test_results_bounded_by_max_cell() {
        let similar = generate_similar_numbers(15, 20);
        assert!(similar.iter().all(|v| (1..=20).contains(v)));
        assert!(!similar.is_empty());
    }

    #[test]
    fn test_huge_numbers_do_not_overflow() {
        let similar = generate_similar_numbers(u64::MAX, u64::MAX);
        assert!(similar.len() <= MAX_SIMILAR_RESULTS);
        assert!(!similar.contains(&u64::MAX));
    }
}
