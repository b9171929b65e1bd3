//! Resource ledger: pure batch-sizing and depletion decisions
//!
//! No I/O here. The worker feeds in the latest backend snapshot and the
//! configured bounds; these functions decide how many taps are safe to
//! submit and whether the energy pool is exhausted.

use rand::Rng;

/// Draw a candidate tap count uniformly from the inclusive `[min, max]` bounds
pub fn draw_candidate<R: Rng>(rng: &mut R, bounds: [u32; 2]) -> u32 {
    rng.gen_range(bounds[0]..=bounds[1])
}

/// Clamp a candidate batch against the available energy.
///
/// If the candidate would draw at least the whole pool
/// (`candidate * coins_per_click >= current_energy`), it is clamped to
/// `max(0, current_energy / 10 - 1)`. The divisor is carried over from the
/// backend's observed behavior; do not "correct" it.
pub fn plan_taps(candidate: u32, coins_per_click: u64, current_energy: u64) -> u32 {
    if u64::from(candidate) * coins_per_click >= current_energy {
        (current_energy / 10)
            .saturating_sub(1)
            .min(u64::from(u32::MAX)) as u32
    } else {
        candidate
    }
}

/// The energy pool is too low to keep acting
pub fn is_depleted(current_energy: u64, min_available_energy: u64) -> bool {
    current_energy < min_available_energy
}

/// Balance movement since the previous snapshot. Logging only: batch sizing
/// must never read this, the backend snapshot is authoritative.
pub fn balance_delta(new_balance: u64, previous_balance: u64) -> i64 {
    new_balance as i64 - previous_balance as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_candidate_respects_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let candidate = draw_candidate(&mut rng, [50, 200]);
            assert!((50..=200).contains(&candidate));
        }
    }

    #[test]
    fn test_candidate_degenerate_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_candidate(&mut rng, [25, 25]), 25);
    }

    #[test]
    fn test_clamp_worked_example() {
        // energy=80, coins_per_click=2, candidate=150: 150*2=300 >= 80,
        // so the batch clamps to 80/10 - 1 = 7
        assert_eq!(plan_taps(150, 2, 80), 7);
    }

    #[test]
    fn test_no_clamp_when_energy_covers_batch() {
        // 150*2 = 300 < 1000
        assert_eq!(plan_taps(150, 2, 1000), 150);
    }

    #[test]
    fn test_clamp_triggers_on_exact_equality() {
        // 50*2 = 100 >= 100
        assert_eq!(plan_taps(50, 2, 100), 9);
    }

    #[test]
    fn test_clamp_never_negative() {
        assert_eq!(plan_taps(50, 2, 5), 0);
        assert_eq!(plan_taps(50, 2, 0), 0);
        assert_eq!(plan_taps(50, 2, 10), 0);
        assert_eq!(plan_taps(50, 2, 19), 0);
        assert_eq!(plan_taps(50, 2, 20), 1);
    }

    #[test]
    fn test_clamped_batch_never_overdraws() {
        for energy in [20u64, 35, 80, 100, 999] {
            for coins_per_click in [1u64, 2, 5] {
                let taps = plan_taps(1000, coins_per_click, energy);
                if taps > 0 {
                    assert!(
                        u64::from(taps) * coins_per_click < energy,
                        "taps={} coins_per_click={} energy={}",
                        taps,
                        coins_per_click,
                        energy
                    );
                }
            }
        }
    }

    #[test]
    fn test_depletion_threshold_is_strict() {
        assert!(is_depleted(99, 100));
        assert!(!is_depleted(100, 100));
        assert!(!is_depleted(101, 100));
    }

    #[test]
    fn test_balance_delta_signs() {
        assert_eq!(balance_delta(1100, 1000), 100);
        assert_eq!(balance_delta(1000, 1000), 0);
        assert_eq!(balance_delta(900, 1000), -100);
    }
}
