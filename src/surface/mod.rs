//! Price-surface sampling over (volatility, time-to-maturity) grids.
//!
//! The sampler evaluates one [`Pricer`] at every node of a square grid and
//! returns the axis vectors plus the price matrix: the exact payload a
//! rendering layer needs for a 3D surface or heatmap, with no rendering here.
//!
//! Cost model: a grid is `resolution²` pricer calls, and each call costs one
//! unit for the analytic engine, `steps` for the lattice, or `num_paths` for
//! the simulation. Interactive hosts should tune `resolution` and the
//! simulation sample count independently, and can hard-bound total work with
//! [`SurfaceRequest::max_cost`]; over-budget requests are rejected before any
//! evaluation. With the `parallel` feature, rows evaluate on Rayon worker
//! threads; cells are independent and seeded simulations derive one stream
//! per cell, so no generator state is shared across threads.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::core::{OptionType, PricingEngine, PricingError};
use crate::engines::Pricer;
use crate::instruments::VanillaOption;
use crate::market::Market;
use crate::math::linspace;

/// Grid resolution used when callers do not tune the request.
pub const DEFAULT_RESOLUTION: usize = 10;

/// A rectangular sampling request over volatility and time-to-maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceRequest {
    /// Inclusive volatility interval `(min, max)`.
    pub vol_range: (f64, f64),
    /// Inclusive time-to-maturity interval `(min, max)`, in years.
    pub time_range: (f64, f64),
    /// Samples per axis; the grid is `resolution × resolution`.
    pub resolution: usize,
    /// Optional ceiling on total work units (`resolution² × pricer unit
    /// cost`); see [`Pricer::unit_cost`].
    pub max_cost: Option<u64>,
}

impl SurfaceRequest {
    /// A request over the given ranges at [`DEFAULT_RESOLUTION`].
    pub fn new(vol_range: (f64, f64), time_range: (f64, f64)) -> Self {
        Self {
            vol_range,
            time_range,
            resolution: DEFAULT_RESOLUTION,
            max_cost: None,
        }
    }

    /// Overrides the per-axis sample count.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Bounds total work; requests over the ceiling are rejected.
    pub fn with_max_cost(mut self, max_cost: u64) -> Self {
        self.max_cost = Some(max_cost);
        self
    }

    fn validate(&self) -> Result<(), PricingError> {
        if self.resolution < 2 {
            return Err(PricingError::InvalidInput(
                "surface resolution must be >= 2".to_string(),
            ));
        }
        let (vol_lo, vol_hi) = self.vol_range;
        if !vol_lo.is_finite() || !vol_hi.is_finite() || vol_lo <= 0.0 || vol_hi < vol_lo {
            return Err(PricingError::InvalidInput(
                "volatility range must satisfy 0 < min <= max".to_string(),
            ));
        }
        let (t_lo, t_hi) = self.time_range;
        if !t_lo.is_finite() || !t_hi.is_finite() || t_lo <= 0.0 || t_hi < t_lo {
            return Err(PricingError::InvalidInput(
                "time range must satisfy 0 < min <= max".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sampled price surface: two axis vectors and the price matrix.
///
/// `prices[i][j]` is the value at `times[i]` and `vols[j]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceSurface {
    /// Volatility axis values.
    pub vols: Vec<f64>,
    /// Time-to-maturity axis values, in years.
    pub times: Vec<f64>,
    /// Price matrix, row-major over times.
    pub prices: Vec<Vec<f64>>,
}

impl PriceSurface {
    /// `(rows, cols)` of the price matrix.
    pub fn shape(&self) -> (usize, usize) {
        (self.times.len(), self.vols.len())
    }
}

/// Evaluates `pricer` over the requested (volatility, time) grid for a
/// contract with the given side and strike.
///
/// `market` supplies spot and rate; its volatility is replaced by each grid
/// value, exactly as the contract expiry is replaced by each time sample.
///
/// # Errors
/// - [`PricingError::InvalidInput`] for malformed ranges, resolution < 2, or
///   a degenerate contract/market.
/// - [`PricingError::BudgetExceeded`] when `resolution² × unit_cost` is over
///   the request ceiling.
/// - Any error from the underlying pricer aborts the sampling.
pub fn sample_surface(
    pricer: &Pricer,
    option_type: OptionType,
    strike: f64,
    market: &Market,
    request: &SurfaceRequest,
) -> Result<PriceSurface, PricingError> {
    request.validate()?;

    let cells = (request.resolution * request.resolution) as u64;
    let total_cost = cells.saturating_mul(pricer.unit_cost());
    if let Some(ceiling) = request.max_cost {
        if total_cost > ceiling {
            return Err(PricingError::BudgetExceeded(format!(
                "surface requires {total_cost} work units, ceiling is {ceiling}"
            )));
        }
    }

    let vols = linspace(request.vol_range.0, request.vol_range.1, request.resolution);
    let times = linspace(request.time_range.0, request.time_range.1, request.resolution);

    let eval_row = |row_index: usize, expiry: f64| -> Result<Vec<f64>, PricingError> {
        let option = VanillaOption {
            option_type,
            strike,
            expiry,
        };
        vols.iter()
            .enumerate()
            .map(|(col_index, &vol)| {
                let cell_index = row_index * request.resolution + col_index;
                pricer
                    .for_grid_cell(cell_index)
                    .price(&option, &market.with_vol(vol))
                    .map(|result| result.price)
            })
            .collect()
    };

    #[cfg(feature = "parallel")]
    let prices = times
        .par_iter()
        .enumerate()
        .map(|(i, &t)| eval_row(i, t))
        .collect::<Result<Vec<_>, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let prices = times
        .iter()
        .enumerate()
        .map(|(i, &t)| eval_row(i, t))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceSurface {
        vols,
        times,
        prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::MonteCarloEngine;

    fn market() -> Market {
        Market::builder()
            .spot(100.0)
            .rate(0.02)
            .vol(0.3)
            .build()
            .unwrap()
    }

    fn request() -> SurfaceRequest {
        SurfaceRequest::new((0.3, 0.8), (0.1, 1.0))
    }

    #[test]
    fn grid_has_requested_shape_and_axes() {
        let surface = sample_surface(
            &Pricer::analytic(),
            OptionType::Call,
            100.0,
            &market(),
            &request(),
        )
        .unwrap();

        assert_eq!(surface.shape(), (10, 10));
        assert_eq!(surface.vols.len(), 10);
        assert_eq!(surface.times.len(), 10);
        approx::assert_relative_eq!(surface.vols[0], 0.3, epsilon = 1e-12);
        approx::assert_relative_eq!(surface.vols[9], 0.8, epsilon = 1e-12);
        approx::assert_relative_eq!(surface.times[0], 0.1, epsilon = 1e-12);
        approx::assert_relative_eq!(surface.times[9], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn every_cell_equals_direct_evaluation() {
        let pricer = Pricer::lattice(50);
        let market = market();
        let surface =
            sample_surface(&pricer, OptionType::Put, 110.0, &market, &request()).unwrap();

        for (i, &t) in surface.times.iter().enumerate() {
            for (j, &v) in surface.vols.iter().enumerate() {
                let option = VanillaOption::european_put(110.0, t);
                let direct = pricer.price(&option, &market.with_vol(v)).unwrap().price;
                assert_eq!(surface.prices[i][j], direct, "cell ({i}, {j})");
            }
        }
    }

    #[test]
    fn seeded_simulation_surface_is_reproducible() {
        let pricer = Pricer::Simulation(MonteCarloEngine::new(2_000).with_seed(42));
        let market = market();
        let req = request().with_resolution(4);

        let a = sample_surface(&pricer, OptionType::Call, 100.0, &market, &req).unwrap();
        let b = sample_surface(&pricer, OptionType::Call, 100.0, &market, &req).unwrap();
        assert_eq!(a, b);

        // Distinct cells use distinct streams even at identical (vol, t).
        let req_flat = SurfaceRequest::new((0.3, 0.3), (1.0, 1.0)).with_resolution(2);
        let flat = sample_surface(&pricer, OptionType::Call, 100.0, &market, &req_flat).unwrap();
        assert_ne!(flat.prices[0][0], flat.prices[0][1]);
    }

    #[test]
    fn over_budget_requests_are_rejected_before_evaluation() {
        let pricer = Pricer::simulation(10_000);
        let req = request().with_max_cost(100 * 10_000 - 1);

        let err = sample_surface(&pricer, OptionType::Call, 100.0, &market(), &req).unwrap_err();
        assert!(matches!(err, PricingError::BudgetExceeded(_)));

        let req_ok = request().with_max_cost(100 * 10_000);
        assert!(sample_surface(&Pricer::analytic(), OptionType::Call, 100.0, &market(), &req_ok).is_ok());
    }

    #[test]
    fn malformed_requests_are_rejected() {
        let market = market();
        for req in [
            SurfaceRequest::new((0.0, 0.5), (0.1, 1.0)),
            SurfaceRequest::new((0.5, 0.3), (0.1, 1.0)),
            SurfaceRequest::new((0.3, 0.8), (0.0, 1.0)),
            SurfaceRequest::new((0.3, 0.8), (1.0, 0.1)),
            SurfaceRequest::new((0.3, 0.8), (0.1, 1.0)).with_resolution(1),
        ] {
            assert!(matches!(
                sample_surface(&Pricer::analytic(), OptionType::Call, 100.0, &market, &req),
                Err(PricingError::InvalidInput(_))
            ));
        }
    }
}
