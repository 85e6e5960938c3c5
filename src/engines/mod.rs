//! Pricing engine implementations.

pub mod analytic;
pub mod monte_carlo;
pub mod tree;

pub use analytic::{BlackScholesEngine, bs_d1_d2, bs_delta, bs_greeks, bs_price};
pub use monte_carlo::{DEFAULT_NUM_PATHS, MonteCarloEngine, VarianceReduction};
pub use tree::{BinomialTreeEngine, DEFAULT_STEPS};

use crate::core::{PricingEngine, PricingError, PricingResult};
use crate::instruments::VanillaOption;
use crate::market::Market;

/// Stride between derived seeds of adjacent grid cells; prime so cell streams
/// never collide under wrapping addition.
const CELL_SEED_STRIDE: u64 = 7_919;

/// Closed set of pricing strategies sharing one valuation capability.
///
/// Downstream consumers (notably [`crate::surface::sample_surface`]) are
/// written once against this enum instead of against per-engine closures;
/// selecting a method is a data decision, not a code path.
#[derive(Debug, Clone, Copy)]
pub enum Pricer {
    /// Closed-form Black-Scholes valuation.
    Analytic(BlackScholesEngine),
    /// Cox-Ross-Rubinstein binomial tree valuation.
    Lattice(BinomialTreeEngine),
    /// Monte Carlo valuation with a delta-hedge control variate.
    Simulation(MonteCarloEngine),
}

impl Pricer {
    /// Analytic strategy.
    pub fn analytic() -> Self {
        Self::Analytic(BlackScholesEngine::new())
    }

    /// Lattice strategy with the given step count.
    pub fn lattice(steps: usize) -> Self {
        Self::Lattice(BinomialTreeEngine::new(steps))
    }

    /// Simulation strategy with the given sample count and fresh entropy.
    pub fn simulation(num_paths: usize) -> Self {
        Self::Simulation(MonteCarloEngine::new(num_paths))
    }

    /// Work units consumed by a single evaluation; the surface sampler
    /// multiplies this by the grid size to enforce its cost ceiling.
    pub fn unit_cost(&self) -> u64 {
        match self {
            Self::Analytic(_) => 1,
            Self::Lattice(engine) => engine.steps as u64,
            Self::Simulation(engine) => engine.num_paths as u64,
        }
    }

    /// Variant of this pricer owning an independent random stream for one
    /// grid cell. Seeded simulations derive a per-cell seed so parallel
    /// cells never share a generator; everything else is returned unchanged.
    pub(crate) fn for_grid_cell(&self, cell_index: usize) -> Self {
        match self {
            Self::Simulation(engine) => {
                let derived = engine
                    .seed
                    .map(|seed| seed.wrapping_add(cell_index as u64 * CELL_SEED_STRIDE));
                Self::Simulation(MonteCarloEngine {
                    seed: derived,
                    ..*engine
                })
            }
            other => *other,
        }
    }
}

impl PricingEngine<VanillaOption> for Pricer {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        match self {
            Self::Analytic(engine) => engine.price(instrument, market),
            Self::Lattice(engine) => engine.price(instrument, market),
            Self::Simulation(engine) => engine.price(instrument, market),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        Market::builder()
            .spot(100.0)
            .rate(0.05)
            .vol(0.2)
            .build()
            .unwrap()
    }

    #[test]
    fn dispatch_matches_direct_engine_calls() {
        let option = VanillaOption::european_call(100.0, 1.0);
        let market = market();

        let direct = BlackScholesEngine::new().price(&option, &market).unwrap();
        let via_enum = Pricer::analytic().price(&option, &market).unwrap();
        assert_eq!(direct.price, via_enum.price);

        let direct = BinomialTreeEngine::new(200).price(&option, &market).unwrap();
        let via_enum = Pricer::lattice(200).price(&option, &market).unwrap();
        assert_eq!(direct.price, via_enum.price);
    }

    #[test]
    fn unit_costs_reflect_per_evaluation_work() {
        assert_eq!(Pricer::analytic().unit_cost(), 1);
        assert_eq!(Pricer::lattice(500).unit_cost(), 500);
        assert_eq!(Pricer::simulation(10_000).unit_cost(), 10_000);
    }

    #[test]
    fn grid_cells_get_distinct_seeded_streams() {
        let pricer = Pricer::Simulation(MonteCarloEngine::new(1_000).with_seed(42));

        let seeds: Vec<u64> = (0..4)
            .map(|cell| match pricer.for_grid_cell(cell) {
                Pricer::Simulation(engine) => engine.seed.unwrap(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(seeds[0], 42);
        for pair in seeds.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn unseeded_and_non_simulation_pricers_pass_through() {
        assert!(matches!(
            Pricer::simulation(100).for_grid_cell(3),
            Pricer::Simulation(MonteCarloEngine { seed: None, .. })
        ));
        assert!(matches!(
            Pricer::lattice(100).for_grid_cell(3),
            Pricer::Lattice(_)
        ));
    }
}
