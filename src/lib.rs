//! Volgrid is a pricing library for European vanilla options with three
//! independent valuation engines and the grid/curve utilities a
//! visualization host consumes.
//!
//! The crate combines closed-form Black-Scholes valuation, a
//! Cox-Ross-Rubinstein binomial lattice, and a Monte Carlo estimator with a
//! delta-hedge control variate, plus a (volatility, time-to-maturity)
//! surface sampler and payoff/PnL curve helpers under one namespace.
//!
//! References used across modules include:
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 13, 15, 21.
//! - Cox, Ross and Rubinstein (1979) for the lattice parameterization.
//! - Glasserman (2004) for Monte Carlo estimators and control variates.
//! - Abramowitz and Stegun 7.1.26 for the normal CDF approximation.
//!
//! Numerical considerations:
//! - Engines reject degenerate inputs (`T <= 0`, `sigma <= 0`) up front
//!   rather than propagating NaN from the `sigma * sqrt(T)` division.
//! - The lattice surfaces a risk-neutral probability outside `[0, 1]` as an
//!   error instead of returning an arbitrage-inconsistent price.
//! - Monte Carlo results carry the estimator's standard error, and the
//!   control-variate path also reports the uncontrolled error so the
//!   variance reduction is observable per run.
//!
//! # Feature Flags
//! - `parallel`: Rayon-powered parallel surface sampling.
//! - `serde`: Serialize/Deserialize derives on boundary value types.
//!
//! # Quick Start
//! Price a Black-Scholes call:
//! ```rust
//! use volgrid::core::{OptionType, PricingEngine};
//! use volgrid::engines::BlackScholesEngine;
//! use volgrid::instruments::VanillaOption;
//! use volgrid::market::Market;
//!
//! let market = Market::builder().spot(100.0).rate(0.05).vol(0.2).build()?;
//! let option = VanillaOption::european_call(100.0, 1.0);
//! let result = BlackScholesEngine::new().price(&option, &market)?;
//! assert!(result.price > 10.0 && result.price < 11.0);
//! # Ok::<(), volgrid::core::PricingError>(())
//! ```
//!
//! Sample a price surface with any strategy:
//! ```rust
//! use volgrid::core::OptionType;
//! use volgrid::engines::Pricer;
//! use volgrid::market::Market;
//! use volgrid::surface::{SurfaceRequest, sample_surface};
//!
//! let market = Market::builder().spot(100.0).rate(0.02).vol(0.3).build()?;
//! let request = SurfaceRequest::new((0.3, 0.8), (0.1, 1.0));
//! let surface = sample_surface(&Pricer::lattice(200), OptionType::Call, 100.0, &market, &request)?;
//! assert_eq!(surface.shape(), (10, 10));
//! # Ok::<(), volgrid::core::PricingError>(())
//! ```
//!
//! Build a payoff/PnL curve for a long position:
//! ```rust
//! use volgrid::core::Position;
//! use volgrid::pnl::{DEFAULT_CURVE_POINTS, chart_bounds, payoff_curve, recommended_strikes};
//!
//! let (call_strike, _put_strike) = recommended_strikes(100.0, 0.05)?;
//! let bounds = chart_bounds(100.0, 0.2)?;
//! let curve = payoff_curve(Position::LongCall, call_strike, 4.2, bounds, DEFAULT_CURVE_POINTS)?;
//! assert_eq!(curve.breakeven, call_strike + 4.2);
//! # Ok::<(), volgrid::core::PricingError>(())
//! ```

pub mod core;
pub mod engines;
pub mod instruments;
pub mod market;
pub mod math;
pub mod pnl;
pub mod surface;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::core::*;
    pub use crate::engines::{
        BinomialTreeEngine, BlackScholesEngine, MonteCarloEngine, Pricer, VarianceReduction,
    };
    pub use crate::instruments::VanillaOption;
    pub use crate::market::{Market, MarketBuilder};
    pub use crate::pnl::{PayoffCurve, chart_bounds, payoff_curve, recommended_strikes};
    pub use crate::surface::{PriceSurface, SurfaceRequest, sample_surface};
}
