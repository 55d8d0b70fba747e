//! Shared penalty arithmetic for the domain scorers.
//!
//! All scorers express their tiers through [`tier_penalty`] so the
//! monotonicity argument lives in one place: the base amounts grow from
//! tier to tier, the linear term is non-negative and capped, therefore the
//! total penalty is non-decreasing in distance past any boundary.

use crate::scorers::{ComponentScore, Domain};

/// Penalty for a measurement `excess` units past a tier boundary.
///
/// `base` applies at the boundary itself; `slope` adds per unit of excess,
/// saturating at `cap`. Negative excess (not past the boundary) is treated
/// as zero so callers can pass raw differences.
pub fn tier_penalty(excess: f32, base: f32, slope: f32, cap: f32) -> f32 {
    base + (excess.max(0.0) * slope).min(cap)
}

/// Clamp a raw score into `[floor, 100]` and tag it with its domain.
pub fn finish(domain: Domain, raw: f32, floor: f32) -> ComponentScore {
    ComponentScore {
        domain,
        value: raw.clamp(floor, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_at_boundary_is_base() {
        assert_eq!(tier_penalty(0.0, 20.0, 5.0, 15.0), 20.0);
    }

    #[test]
    fn penalty_grows_then_saturates() {
        assert_eq!(tier_penalty(1.0, 20.0, 5.0, 15.0), 25.0);
        assert_eq!(tier_penalty(3.0, 20.0, 5.0, 15.0), 35.0);
        // Past the cap the linear term stops growing.
        assert_eq!(tier_penalty(10.0, 20.0, 5.0, 15.0), 35.0);
    }

    #[test]
    fn negative_excess_is_zero() {
        assert_eq!(tier_penalty(-2.0, 20.0, 5.0, 15.0), 20.0);
    }

    #[test]
    fn finish_clamps_to_floor_and_ceiling() {
        assert_eq!(finish(Domain::Thermal, -40.0, 20.0).value, 20.0);
        assert_eq!(finish(Domain::Thermal, 140.0, 20.0).value, 100.0);
        assert_eq!(finish(Domain::Thermal, 55.0, 20.0).value, 55.0);
    }
}
