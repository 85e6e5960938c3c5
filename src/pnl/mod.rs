//! Payoff and PnL curve utilities for long option positions.
//!
//! Pure helpers with no dependency on the pricing engines: strike
//! suggestions around spot, "nice" rounded chart bounds for a price axis,
//! and the expiry payoff / profit-and-loss curve with its breakeven point.
//! The host passes each position's own premium (typically the value just
//! computed by one of the engines) when requesting its curve.

use crate::core::{Position, PricingError};
use crate::math::linspace;

/// Margin applied around spot for suggested strikes.
pub const DEFAULT_STRIKE_MARGIN: f64 = 0.05;

/// Buffer ratio applied around spot for chart bounds.
pub const DEFAULT_BOUND_BUFFER: f64 = 0.2;

/// Points on a payoff/PnL curve.
pub const DEFAULT_CURVE_POINTS: usize = 200;

#[inline]
fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn validate_spot(spot: f64) -> Result<(), PricingError> {
    if !spot.is_finite() || spot <= 0.0 {
        return Err(PricingError::InvalidInput(
            "spot price must be finite and > 0".to_string(),
        ));
    }
    Ok(())
}

/// Suggested strikes for long positions: `(call_strike, put_strike)` at
/// `spot * (1 ± margin)`, rounded to cents.
pub fn recommended_strikes(spot: f64, margin: f64) -> Result<(f64, f64), PricingError> {
    validate_spot(spot)?;
    if !margin.is_finite() || margin < 0.0 || margin >= 1.0 {
        return Err(PricingError::InvalidInput(
            "strike margin must lie in [0, 1)".to_string(),
        ));
    }
    let call_strike = round_cents(spot * (1.0 + margin));
    let put_strike = round_cents(spot * (1.0 - margin));
    Ok((call_strike, put_strike))
}

/// Rounding granularity for a chart axis, by spot price tier.
fn bound_granularity(spot: f64) -> f64 {
    if spot < 20.0 {
        1.0
    } else if spot < 100.0 {
        5.0
    } else if spot < 500.0 {
        10.0
    } else {
        50.0
    }
}

/// "Nice" price-axis bounds for a PnL chart: spot buffered by
/// `±buffer_ratio`, then floored/ceiled to the tier granularity.
///
/// This is presentation arithmetic, not a pricing computation; bounds are
/// multiples of the granularity and always bracket the buffered range.
pub fn chart_bounds(spot: f64, buffer_ratio: f64) -> Result<(f64, f64), PricingError> {
    validate_spot(spot)?;
    if !buffer_ratio.is_finite() || buffer_ratio < 0.0 {
        return Err(PricingError::InvalidInput(
            "buffer ratio must be finite and >= 0".to_string(),
        ));
    }

    let granularity = bound_granularity(spot);
    let buffer = spot * buffer_ratio;
    let lower = ((spot - buffer) / granularity).floor() * granularity;
    let upper = ((spot + buffer) / granularity).ceil() * granularity;
    Ok((lower, upper))
}

/// Expiry payoff and PnL curve for a long option position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffCurve {
    /// Underlying price axis at expiry.
    pub prices: Vec<f64>,
    /// Intrinsic payoff at each axis point, ignoring the premium.
    pub payoff: Vec<f64>,
    /// Profit and loss at each axis point: payoff minus premium.
    pub pnl: Vec<f64>,
    /// Breakeven underlying price (`K + premium` long call, `K - premium`
    /// long put).
    pub breakeven: f64,
    /// Whether the breakeven falls inside the plotted price range.
    pub breakeven_in_range: bool,
}

/// Computes the payoff/PnL curve for a long position over a linearly spaced
/// price range.
///
/// # Errors
/// Returns [`PricingError::InvalidInput`] for a non-positive strike, a
/// negative or non-finite premium, a degenerate price range, or fewer than
/// two curve points.
pub fn payoff_curve(
    position: Position,
    strike: f64,
    premium: f64,
    price_bounds: (f64, f64),
    points: usize,
) -> Result<PayoffCurve, PricingError> {
    if !strike.is_finite() || strike <= 0.0 {
        return Err(PricingError::InvalidInput(
            "strike must be finite and > 0".to_string(),
        ));
    }
    if !premium.is_finite() || premium < 0.0 {
        return Err(PricingError::InvalidInput(
            "premium must be finite and >= 0".to_string(),
        ));
    }
    let (lower, upper) = price_bounds;
    if !lower.is_finite() || !upper.is_finite() || lower >= upper {
        return Err(PricingError::InvalidInput(
            "price bounds must satisfy lower < upper".to_string(),
        ));
    }
    if points < 2 {
        return Err(PricingError::InvalidInput(
            "payoff curve needs at least two points".to_string(),
        ));
    }

    let option_type = position.option_type();
    let prices = linspace(lower, upper, points);
    let payoff: Vec<f64> = prices
        .iter()
        .map(|&s| option_type.intrinsic(s, strike))
        .collect();
    let pnl: Vec<f64> = payoff.iter().map(|&p| p - premium).collect();

    let breakeven = match position {
        Position::LongCall => strike + premium,
        Position::LongPut => strike - premium,
    };
    let breakeven_in_range = lower <= breakeven && breakeven <= upper;

    Ok(PayoffCurve {
        prices,
        payoff,
        pnl,
        breakeven,
        breakeven_in_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strikes_bracket_spot_symmetrically() {
        assert_eq!(
            recommended_strikes(100.0, DEFAULT_STRIKE_MARGIN).unwrap(),
            (105.0, 95.0)
        );
        // Rounded to cents.
        assert_eq!(recommended_strikes(33.33, 0.05).unwrap(), (35.0, 31.66));
    }

    #[test]
    fn bounds_are_granularity_multiples_bracketing_the_buffer() {
        // Tier below 100 rounds to 5: [36, 54] widens to (35, 55).
        assert_eq!(chart_bounds(45.0, DEFAULT_BOUND_BUFFER).unwrap(), (35.0, 55.0));
        // Tier below 20 rounds to 1.
        assert_eq!(chart_bounds(10.0, 0.2).unwrap(), (8.0, 12.0));
        // Tier below 500 rounds to 10.
        assert_eq!(chart_bounds(250.0, 0.2).unwrap(), (200.0, 300.0));
        // Top tier rounds to 50.
        assert_eq!(chart_bounds(1200.0, 0.2).unwrap(), (950.0, 1450.0));
    }

    #[test]
    fn long_call_payoff_and_breakeven() {
        let curve = payoff_curve(Position::LongCall, 100.0, 5.0, (80.0, 120.0), 201).unwrap();
        assert_eq!(curve.prices.len(), 201);

        // The axis contains S=120 exactly (step 0.2); payoff there is 20.
        let last = curve.prices.len() - 1;
        assert_eq!(curve.prices[last], 120.0);
        assert_eq!(curve.payoff[last], 20.0);
        assert_eq!(curve.pnl[last], 15.0);

        assert_eq!(curve.breakeven, 105.0);
        assert!(curve.breakeven_in_range);
    }

    #[test]
    fn long_put_uses_its_own_breakeven_side() {
        let curve = payoff_curve(Position::LongPut, 100.0, 4.0, (80.0, 120.0), 101).unwrap();
        assert_eq!(curve.payoff[0], 20.0);
        assert_eq!(curve.pnl[0], 16.0);
        assert_eq!(curve.breakeven, 96.0);
        assert!(curve.breakeven_in_range);

        // Out-of-range breakeven is reported, not hidden.
        let narrow = payoff_curve(Position::LongPut, 100.0, 4.0, (98.0, 120.0), 11).unwrap();
        assert!(!narrow.breakeven_in_range);
    }

    #[test]
    fn rejects_malformed_scenarios() {
        assert!(payoff_curve(Position::LongCall, 0.0, 5.0, (80.0, 120.0), 10).is_err());
        assert!(payoff_curve(Position::LongCall, 100.0, -1.0, (80.0, 120.0), 10).is_err());
        assert!(payoff_curve(Position::LongCall, 100.0, 5.0, (120.0, 80.0), 10).is_err());
        assert!(payoff_curve(Position::LongCall, 100.0, 5.0, (80.0, 120.0), 1).is_err());
        assert!(recommended_strikes(0.0, 0.05).is_err());
        assert!(recommended_strikes(100.0, 1.0).is_err());
        assert!(chart_bounds(-5.0, 0.2).is_err());
    }
}
