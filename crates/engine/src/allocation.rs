//! Proportional allocation of batch-level financials.
//!
//! A batch booking carries one discount and one paid amount for the whole
//! batch. Each created booking stores its own share, proportional to its
//! gross amount. Shares are rounded half-away-from-zero to whole currency
//! units independently, so the sum of shares may differ from the batch total
//! by up to `item_count - 1` units. The remainder is deliberately *not*
//! reassigned to the last item; the drift is an accepted property of the
//! stored records.

/// Per-item share of batch-level discount and paid amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Share {
    pub discount: f64,
    pub paid: f64,
}

/// Splits `discount` and `paid_amount` across items proportionally to their
/// gross `amounts`.
///
/// When all amounts sum to zero the split falls back to equal shares
/// (`1 / item_count`) to avoid dividing by zero. An empty slice yields an
/// empty result.
#[must_use]
pub fn allocate(amounts: &[f64], discount: f64, paid_amount: f64) -> Vec<Share> {
    let total: f64 = amounts.iter().sum();
    let count = amounts.len();

    amounts
        .iter()
        .map(|amount| {
            let ratio = if total == 0.0 {
                1.0 / count as f64
            } else {
                amount / total
            };
            Share {
                discount: (discount * ratio).round(),
                paid: (paid_amount * ratio).round(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_proportionally() {
        let shares = allocate(&[100.0, 300.0], 40.0, 200.0);
        assert_eq!(
            shares,
            vec![
                Share {
                    discount: 10.0,
                    paid: 50.0
                },
                Share {
                    discount: 30.0,
                    paid: 150.0
                },
            ]
        );
    }

    #[test]
    fn zero_total_falls_back_to_equal_split() {
        let shares = allocate(&[0.0, 0.0], 10.0, 0.0);
        assert_eq!(shares[0].discount, 5.0);
        assert_eq!(shares[1].discount, 5.0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.5 ratio of 5 -> 2.5 -> rounds to 3, not 2.
        let shares = allocate(&[1.0, 1.0], 5.0, 0.0);
        assert_eq!(shares[0].discount, 3.0);
        assert_eq!(shares[1].discount, 3.0);
    }

    #[test]
    fn rounding_drift_is_bounded_by_item_count() {
        // Three equal items, discount 100 -> each rounds 33.33 to 33.
        let shares = allocate(&[50.0, 50.0, 50.0], 100.0, 0.0);
        let total: f64 = shares.iter().map(|s| s.discount).sum();
        assert_eq!(total, 99.0);
        assert!((total - 100.0).abs() <= (shares.len() - 1) as f64);
    }

    #[test]
    fn empty_batch_yields_no_shares() {
        assert!(allocate(&[], 10.0, 10.0).is_empty());
    }
}
