//! Cox-Ross-Rubinstein binomial tree valuation for European vanilla options.
//!
//! References: Cox, Ross and Rubinstein (1979); Hull (11th ed.) Ch. 13 and
//! the backward-induction recursion around Eq. (13.10).
//!
//! Numerical considerations: convergence to the analytic price is first-order
//! in step count with the usual even/odd oscillation; the derived risk-neutral
//! probability must lie in `[0, 1]` for an arbitrage-free discretization and
//! is rejected otherwise. Induction runs in place over one preallocated node
//! buffer with a shrinking logical length, so memory is O(steps) and no layer
//! allocates.

use crate::core::{DiagKey, Diagnostics, PricingEngine, PricingError, PricingResult};
use crate::instruments::VanillaOption;
use crate::market::Market;

/// Cox-Ross-Rubinstein binomial tree engine.
#[derive(Debug, Clone, Copy)]
pub struct BinomialTreeEngine {
    /// Number of tree steps.
    pub steps: usize,
}

/// Step count used when callers do not tune the lattice.
pub const DEFAULT_STEPS: usize = 100;

impl BinomialTreeEngine {
    /// Creates a tree engine with the given number of steps.
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }
}

impl Default for BinomialTreeEngine {
    fn default() -> Self {
        Self::new(DEFAULT_STEPS)
    }
}

impl PricingEngine<VanillaOption> for BinomialTreeEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

        if self.steps == 0 {
            return Err(PricingError::InvalidInput(
                "binomial steps must be > 0".to_string(),
            ));
        }
        if market.spot <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market spot must be > 0".to_string(),
            ));
        }
        if market.vol <= 0.0 {
            return Err(PricingError::InvalidInput(
                "market volatility must be > 0".to_string(),
            ));
        }

        let dt = instrument.expiry / self.steps as f64;
        let u = (market.vol * dt.sqrt()).exp();
        let d = 1.0 / u;
        let growth = (market.rate * dt).exp();
        let p = (growth - d) / (u - d);
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(PricingError::NumericalError(format!(
                "risk-neutral probability {p} is outside [0, 1]; \
                 reduce dt or revisit rate/volatility inputs"
            )));
        }
        let disc = (-market.rate * dt).exp();
        let disc_p = disc * p;
        let disc_1mp = disc * (1.0 - p);

        // Terminal layer via the multiplicative recurrence
        // spot * d^(steps-i) * u^i = (spot * d^steps) * (u/d)^i,
        // avoiding a powf per node.
        let ratio = u / d;
        let mut values = vec![0.0_f64; self.steps + 1];
        {
            let mut st = market.spot * d.powi(self.steps as i32);
            for value in values.iter_mut() {
                *value = instrument.option_type.intrinsic(st, instrument.strike);
                st *= ratio;
            }
        }

        // Backward induction in place; layer i has i+1 live nodes.
        for i in (0..self.steps).rev() {
            for j in 0..=i {
                values[j] = disc_p.mul_add(values[j + 1], disc_1mp * values[j]);
            }
        }

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::NumSteps, self.steps as f64);
        diagnostics.insert(DiagKey::U, u);
        diagnostics.insert(DiagKey::Pu, p);
        diagnostics.insert(DiagKey::Vol, market.vol);

        Ok(PricingResult {
            price: values[0],
            stderr: None,
            greeks: None,
            diagnostics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use crate::engines::analytic::bs_price;

    fn market() -> Market {
        Market::builder()
            .spot(100.0)
            .rate(0.05)
            .vol(0.2)
            .build()
            .unwrap()
    }

    #[test]
    fn call_converges_to_analytic_price() {
        let option = VanillaOption::european_call(100.0, 1.0);
        let market = market();
        let bs = bs_price(OptionType::Call, 100.0, 100.0, 0.05, 0.2, 1.0);

        let coarse = BinomialTreeEngine::new(50)
            .price(&option, &market)
            .unwrap()
            .price;
        let fine = BinomialTreeEngine::new(2000)
            .price(&option, &market)
            .unwrap()
            .price;

        assert!((fine - bs).abs() < (coarse - bs).abs());
        assert!((fine - bs).abs() < 5e-3, "fine={fine} bs={bs}");
    }

    #[test]
    fn put_matches_analytic_within_a_cent_at_depth() {
        let option = VanillaOption::european_put(110.0, 0.5);
        let market = market();
        let bs = bs_price(OptionType::Put, 100.0, 110.0, 0.05, 0.2, 0.5);

        let lattice = BinomialTreeEngine::new(5000)
            .price(&option, &market)
            .unwrap()
            .price;
        assert!((lattice - bs).abs() < 0.01, "lattice={lattice} bs={bs}");
    }

    #[test]
    fn single_step_tree_is_the_two_point_expectation() {
        let option = VanillaOption::european_call(100.0, 1.0);
        let market = market();

        let result = BinomialTreeEngine::new(1).price(&option, &market).unwrap();
        let u = result.diagnostics.get(DiagKey::U).unwrap();
        let p = result.diagnostics.get(DiagKey::Pu).unwrap();
        let d = 1.0 / u;

        let expected =
            (-0.05_f64).exp() * (p * (100.0 * u - 100.0).max(0.0) + (1.0 - p) * (100.0 * d - 100.0).max(0.0));
        approx::assert_relative_eq!(result.price, expected, epsilon = 1e-12);
    }

    #[test]
    fn rejects_zero_steps_and_degenerate_market() {
        let option = VanillaOption::european_call(100.0, 1.0);
        let market = market();

        assert!(matches!(
            BinomialTreeEngine::new(0).price(&option, &market),
            Err(PricingError::InvalidInput(_))
        ));
        assert!(matches!(
            BinomialTreeEngine::new(100).price(&option, &Market { vol: -0.1, ..market }),
            Err(PricingError::InvalidInput(_))
        ));
    }

    #[test]
    fn degenerate_probability_is_surfaced_not_priced() {
        // Huge rate with tiny volatility pushes growth above u, so p > 1.
        let option = VanillaOption::european_call(100.0, 1.0);
        let market = Market {
            spot: 100.0,
            rate: 5.0,
            vol: 0.01,
        };
        assert!(matches!(
            BinomialTreeEngine::new(10).price(&option, &market),
            Err(PricingError::NumericalError(_))
        ));
    }
}
