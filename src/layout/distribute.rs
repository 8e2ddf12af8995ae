//! Integer space distribution.
//!
//! Cells are indivisible, so fractional shares are rounded with the
//! largest-remainder method: everyone gets the floor of their exact share,
//! and the leftover cells go one each to the largest fractional parts
//! (ties to the earlier index). The parts always sum to the amount.

/// Split `amount` proportionally to `weights`.
///
/// Non-positive or non-finite weights get nothing. If no weight is
/// positive, every part is zero.
pub fn distribute(amount: u16, weights: &[f32]) -> Vec<u16> {
    let mut parts = vec![0u16; weights.len()];
    let usable = |w: f32| w.is_finite() && w > 0.0;
    let total: f64 = weights.iter().copied().filter(|w| usable(*w)).map(f64::from).sum();
    if amount == 0 || total <= 0.0 {
        return parts;
    }

    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(weights.len());
    let mut given: u32 = 0;
    for (i, &w) in weights.iter().enumerate() {
        if !usable(w) {
            continue;
        }
        let exact = f64::from(amount) * f64::from(w) / total;
        let floor = exact.floor();
        parts[i] = floor as u16;
        given += floor as u32;
        remainders.push((i, exact - floor));
    }

    // Stable sort keeps index order among equal remainders.
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1));
    let leftover = (amount as u32).saturating_sub(given) as usize;
    for &(i, _) in remainders.iter().take(leftover) {
        parts[i] += 1;
    }
    parts
}

/// How much each item gives up to absorb `overflow`.
///
/// Shares are weighted by `shrink × base` and never exceed the item's base;
/// what a capped item cannot give is re-split among the others. The result
/// sums to `overflow` unless every item is already at zero.
pub fn shrink_amounts(bases: &[u16], factors: &[f32], overflow: u16) -> Vec<u16> {
    let mut taken = vec![0u16; bases.len()];
    let mut remaining = overflow;

    while remaining > 0 {
        let weights: Vec<f32> = bases
            .iter()
            .zip(factors)
            .zip(&taken)
            .map(|((&base, &factor), &t)| {
                if t < base && factor.is_finite() && factor > 0.0 {
                    factor * f32::from(base)
                } else {
                    0.0
                }
            })
            .collect();
        if weights.iter().all(|w| *w <= 0.0) {
            break;
        }

        let shares = distribute(remaining, &weights);
        let mut progressed = false;
        for (i, share) in shares.into_iter().enumerate() {
            let room = bases[i] - taken[i];
            let give = share.min(room);
            if give > 0 {
                taken[i] += give;
                remaining -= give;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    taken
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_sum_exactly() {
        let parts = distribute(10, &[1.0, 1.0, 1.0]);
        assert_eq!(parts, vec![4, 3, 3]);
        assert_eq!(parts.iter().sum::<u16>(), 10);
    }

    #[test]
    fn test_proportional_split() {
        assert_eq!(distribute(9, &[1.0, 2.0]), vec![3, 6]);
        assert_eq!(distribute(7, &[0.0, 1.0, 0.0]), vec![0, 7, 0]);
        assert_eq!(distribute(5, &[0.0, 0.0]), vec![0, 0]);
    }

    #[test]
    fn test_largest_remainder_wins() {
        // exact shares: 1.4, 2.8, 2.8 -> floors 1, 2, 2; two leftovers go
        // to the 0.8 remainders.
        assert_eq!(distribute(7, &[1.0, 2.0, 2.0]), vec![1, 3, 3]);
    }

    #[test]
    fn test_shrink_is_capped_by_base() {
        let taken = shrink_amounts(&[2, 10], &[1.0, 1.0], 8);
        assert_eq!(taken.iter().sum::<u16>(), 8);
        assert!(taken[0] <= 2);

        let taken = shrink_amounts(&[3, 3], &[1.0, 0.0], 5);
        assert_eq!(taken, vec![3, 0]);
    }
}
