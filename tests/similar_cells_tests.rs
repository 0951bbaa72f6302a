//! # Similar Cell Generator Tests
//!
//! Invariants of the candidate generator checked over every cell of a
//! realistic warehouse, plus the documented concrete cases.

use cell_finder::similar_cells::{
    analyze_cell, apply_common_mistakes, generate_similar_numbers, rotate_number,
    similar_number_set, MAX_SIMILAR_RESULTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_CELLS: [u64; 4] = [10, 150, 999, 2000];

    #[test]
    fn test_invariants_hold_for_every_cell() {
        for max_cell in MAX_CELLS {
            for number in 1..=max_cell {
                let similar = generate_similar_numbers(number, max_cell);

                assert!(!similar.contains(&number), "{} lists itself", number);
                assert!(similar.len() <= MAX_SIMILAR_RESULTS);
                assert!(
                    similar.iter().all(|v| (1..=max_cell).contains(v)),
                    "{} has a candidate outside [1, {}]",
                    number,
                    max_cell
                );
                assert!(
                    similar.windows(2).all(|w| w[0] < w[1]),
                    "{} is not strictly ascending",
                    number
                );
            }
        }
    }

    #[test]
    fn test_result_is_lowest_of_full_set() {
        for number in [100, 888, 1234, 1969] {
            let full: Vec<u64> = similar_number_set(number, 2000).into_iter().collect();
            let similar = generate_similar_numbers(number, 2000);
            let expected: Vec<u64> = full.iter().copied().take(MAX_SIMILAR_RESULTS).collect();
            assert_eq!(similar, expected);
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        for number in [1, 16, 69, 105, 999] {
            assert_eq!(
                generate_similar_numbers(number, 999),
                generate_similar_numbers(number, 999)
            );
        }
    }

    #[test]
    fn test_rotation_is_always_a_candidate_when_it_fits() {
        for number in 1..=999u64 {
            let Some(rotated) = rotate_number(number) else {
                continue;
            };
            if rotated == number || rotated > 999 {
                continue;
            }
            assert!(
                similar_number_set(number, 999).contains(&rotated),
                "rotation {} of {} missing",
                rotated,
                number
            );
        }
    }

    #[test]
    fn test_rotation_flag_matches_final_list() {
        for number in 1..=999u64 {
            let report = analyze_cell(number, 999);
            let expected = rotate_number(number).is_some_and(|r| report.candidates.contains(&r));
            assert_eq!(report.rotated, expected, "rotation flag of {}", number);
        }
    }

    #[test]
    fn test_documented_cases() {
        // 100: leading 1 replaced by 8 is a candidate before truncation
        assert!(similar_number_set(100, 999).contains(&800));
        assert!(!generate_similar_numbers(100, 999).contains(&100));

        // 69 reads the same upside-down; 96 comes from swaps and mistakes
        let report = analyze_cell(69, 999);
        assert!(report.candidates.contains(&96));
        assert!(!report.rotated);

        // 16 upside-down is 91
        let report = analyze_cell(16, 999);
        assert!(report.candidates.contains(&91));
        assert!(report.rotated);

        // 5: substitutions only, 0 is not a cell
        assert_eq!(generate_similar_numbers(5, 999), vec![1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_leading_zero_changes_digit_count() {
        // "808" -> swap 0 to the front -> "088" -> 88
        assert!(similar_number_set(808, 999).contains(&88));
        // "80" -> 0 for 8 -> "00" -> 0, never a cell
        assert!(!similar_number_set(80, 999).contains(&0));
    }

    #[test]
    fn test_common_mistakes_both_directions() {
        let similar = apply_common_mistakes(17, 999);
        // 1 -> 7 and 7 -> 1
        assert!(similar.contains(&77));
        assert!(similar.contains(&11));

        // 8 -> 0 everywhere leaves 0, which is dropped; 0 -> 8 everywhere gives 888
        let similar = apply_common_mistakes(808, 999);
        assert_eq!(similar.into_iter().collect::<Vec<_>>(), vec![888]);
    }

    #[test]
    fn test_tiny_bound_can_leave_nothing() {
        assert!(generate_similar_numbers(1, 1).is_empty());
        assert!(analyze_cell(1, 1).is_empty());
    }
}
