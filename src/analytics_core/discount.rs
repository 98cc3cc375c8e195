//! Tiered volume discount applied when an order is placed
//!
//! The rate is stored on each order line at placement time. Aggregation only
//! ever reads the stored value; nothing here rewrites historical lines.

use serde::{Deserialize, Serialize};

const BASIS_POINTS: f64 = 10_000.0;

/// Base rate for orders whose total quantity reaches `min_quantity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    pub min_quantity: u32,
    pub rate_bps: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDiscountPolicy {
    /// Ascending by `min_quantity`
    tiers: Vec<DiscountTier>,
    line_threshold: u32,
    line_surcharge_bps: u32,
    cap_bps: u32,
}

impl VolumeDiscountPolicy {
    pub fn new(
        mut tiers: Vec<DiscountTier>,
        line_threshold: u32,
        line_surcharge_bps: u32,
        cap_bps: u32,
    ) -> Self {
        tiers.sort_by_key(|t| t.min_quantity);
        Self {
            tiers,
            line_threshold,
            line_surcharge_bps,
            cap_bps,
        }
    }

    /// Storefront policy
    ///
    /// Order total <10 → 0%, 10–24 → 5%, 25–49 → 10%, ≥50 → 15%; a single
    /// line of 10 or more adds 5%; never more than 20%.
    pub fn with_defaults() -> Self {
        Self::new(
            vec![
                DiscountTier { min_quantity: 10, rate_bps: 500 },
                DiscountTier { min_quantity: 25, rate_bps: 1_000 },
                DiscountTier { min_quantity: 50, rate_bps: 1_500 },
            ],
            10,
            500,
            2_000,
        )
    }

    /// Discount fraction for one line of an order
    ///
    /// # Arguments
    /// * `total_quantity` - Items across the whole order
    /// * `line_quantity` - Items on this line
    pub fn discount_for(&self, total_quantity: u64, line_quantity: u32) -> f64 {
        self.discount_bps(total_quantity, line_quantity) as f64 / BASIS_POINTS
    }

    fn discount_bps(&self, total_quantity: u64, line_quantity: u32) -> u32 {
        let base = self
            .tiers
            .iter()
            .rev()
            .find(|tier| total_quantity >= u64::from(tier.min_quantity))
            .map_or(0, |tier| tier.rate_bps);

        let surcharge = if line_quantity >= self.line_threshold {
            self.line_surcharge_bps
        } else {
            0
        };

        base.saturating_add(surcharge).min(self.cap_bps)
    }

    /// Per-line discounts for a draft order, in line order
    pub fn discounts_for_order(&self, line_quantities: &[u32]) -> Vec<f64> {
        let total: u64 = line_quantities.iter().map(|&q| u64::from(q)).sum();
        line_quantities
            .iter()
            .map(|&quantity| self.discount_for(total, quantity))
            .collect()
    }
}

impl Default for VolumeDiscountPolicy {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_order_has_no_discount() {
        let policy = VolumeDiscountPolicy::with_defaults();
        assert_eq!(policy.discount_for(5, 5), 0.0);
        assert_eq!(policy.discount_for(9, 3), 0.0);
    }

    #[test]
    fn test_base_tiers() {
        let policy = VolumeDiscountPolicy::with_defaults();
        assert_eq!(policy.discount_for(12, 5), 0.05);
        assert_eq!(policy.discount_for(24, 4), 0.05);
        assert_eq!(policy.discount_for(25, 4), 0.10);
        assert_eq!(policy.discount_for(49, 9), 0.10);
        assert_eq!(policy.discount_for(50, 9), 0.15);
    }

    #[test]
    fn test_large_line_surcharge() {
        let policy = VolumeDiscountPolicy::with_defaults();
        assert_eq!(policy.discount_for(30, 15), 0.15);
        assert_eq!(policy.discount_for(10, 10), 0.10);
    }

    #[test]
    fn test_surcharge_capped() {
        let policy = VolumeDiscountPolicy::with_defaults();
        assert_eq!(policy.discount_for(60, 20), 0.20);

        let generous = VolumeDiscountPolicy::new(
            vec![DiscountTier { min_quantity: 1, rate_bps: 1_800 }],
            10,
            500,
            2_000,
        );
        assert_eq!(generous.discount_for(12, 12), 0.20);
    }

    #[test]
    fn test_discounts_for_order() {
        let policy = VolumeDiscountPolicy::with_defaults();
        // total 27 → 10% base, only the 15-item line gets the surcharge
        let discounts = policy.discounts_for_order(&[15, 10, 2]);
        assert_eq!(discounts, vec![0.15, 0.15, 0.10]);

        assert!(policy.discounts_for_order(&[]).is_empty());
    }

    #[test]
    fn test_order_total_beyond_u32() {
        let policy = VolumeDiscountPolicy::with_defaults();
        let discounts = policy.discounts_for_order(&[u32::MAX, 1]);
        assert_eq!(discounts, vec![0.20, 0.15]);

        let discounts = policy.discounts_for_order(&[u32::MAX, u32::MAX, u32::MAX]);
        assert_eq!(discounts, vec![0.20; 3]);
    }

    #[test]
    fn test_oversized_rates_saturate_to_cap() {
        let policy = VolumeDiscountPolicy::new(
            vec![DiscountTier { min_quantity: 1, rate_bps: u32::MAX }],
            1,
            u32::MAX,
            2_000,
        );
        assert_eq!(policy.discount_for(5, 5), 0.20);
    }

    #[test]
    fn test_tiers_sorted_on_construction() {
        let policy = VolumeDiscountPolicy::new(
            vec![
                DiscountTier { min_quantity: 50, rate_bps: 1_500 },
                DiscountTier { min_quantity: 10, rate_bps: 500 },
            ],
            10,
            500,
            2_000,
        );
        assert_eq!(policy.discount_for(55, 1), 0.15);
        assert_eq!(policy.discount_for(11, 1), 0.05);
    }
}
