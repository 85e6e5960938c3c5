//! Closed-form Black-Scholes valuation for European vanilla options.
//!
//! References: Hull (11th ed.) Ch. 15 for the pricing formula and Greeks.
//!
//! The free kernel functions (`bs_price`, `bs_delta`, ...) are pure and do
//! not guard their domain: `vol > 0` and `expiry > 0` are preconditions, and
//! violating them yields NaN/Inf from the `σ√T` division. The fail-fast
//! boundary is [`BlackScholesEngine::price`], which validates instrument and
//! market before touching the kernels.

use crate::core::{
    DiagKey, Diagnostics, Greeks, OptionType, PricingEngine, PricingError, PricingResult,
};
use crate::instruments::VanillaOption;
use crate::market::Market;
use crate::math::{normal_cdf, normal_pdf};

/// Analytic Black-Scholes engine for European vanilla options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackScholesEngine;

impl BlackScholesEngine {
    /// Creates a Black-Scholes engine instance.
    pub fn new() -> Self {
        Self
    }
}

/// `(d1, d2)` for the Black-Scholes formula.
///
/// Precondition: `vol > 0` and `expiry > 0`.
#[inline]
pub fn bs_d1_d2(spot: f64, strike: f64, rate: f64, vol: f64, expiry: f64) -> (f64, f64) {
    let sig_sqrt_t = vol * expiry.sqrt();
    let d1 = ((spot / strike).ln() + (rate + 0.5 * vol * vol) * expiry) / sig_sqrt_t;
    (d1, d1 - sig_sqrt_t)
}

/// Black-Scholes present value of a European option.
///
/// Precondition: `vol > 0` and `expiry > 0` (see module docs).
#[inline]
pub fn bs_price(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (d1, d2) = bs_d1_d2(spot, strike, rate, vol, expiry);
    let df = (-rate * expiry).exp();
    match option_type {
        OptionType::Call => spot * normal_cdf(d1) - strike * df * normal_cdf(d2),
        OptionType::Put => strike * df * normal_cdf(-d2) - spot * normal_cdf(-d1),
    }
}

/// Black-Scholes delta; the hedge ratio used by the Monte Carlo control
/// variate.
///
/// Precondition: `vol > 0` and `expiry > 0`.
#[inline]
pub fn bs_delta(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> f64 {
    let (d1, _) = bs_d1_d2(spot, strike, rate, vol, expiry);
    match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => -normal_cdf(-d1),
    }
}

/// Full closed-form Greeks for a European option.
///
/// Precondition: `vol > 0` and `expiry > 0`.
pub fn bs_greeks(
    option_type: OptionType,
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    expiry: f64,
) -> Greeks {
    let (d1, d2) = bs_d1_d2(spot, strike, rate, vol, expiry);
    let sqrt_t = expiry.sqrt();
    let df = (-rate * expiry).exp();
    let pdf_d1 = normal_pdf(d1);

    let delta = match option_type {
        OptionType::Call => normal_cdf(d1),
        OptionType::Put => -normal_cdf(-d1),
    };
    let gamma = pdf_d1 / (spot * vol * sqrt_t);
    let vega = spot * pdf_d1 * sqrt_t;
    let theta = match option_type {
        OptionType::Call => {
            -spot * pdf_d1 * vol / (2.0 * sqrt_t) - rate * strike * df * normal_cdf(d2)
        }
        OptionType::Put => {
            -spot * pdf_d1 * vol / (2.0 * sqrt_t) + rate * strike * df * normal_cdf(-d2)
        }
    };
    let rho = match option_type {
        OptionType::Call => strike * expiry * df * normal_cdf(d2),
        OptionType::Put => -strike * expiry * df * normal_cdf(-d2),
    };

    Greeks {
        delta,
        gamma,
        vega,
        theta,
        rho,
    }
}

impl PricingEngine<VanillaOption> for BlackScholesEngine {
    fn price(
        &self,
        instrument: &VanillaOption,
        market: &Market,
    ) -> Result<PricingResult, PricingError> {
        instrument.validate()?;

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

        let price = bs_price(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        );
        let greeks = bs_greeks(
            instrument.option_type,
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        );
        let (d1, d2) = bs_d1_d2(
            market.spot,
            instrument.strike,
            market.rate,
            market.vol,
            instrument.expiry,
        );

        let mut diagnostics = Diagnostics::new();
        diagnostics.insert(DiagKey::D1, d1);
        diagnostics.insert(DiagKey::D2, d2);
        diagnostics.insert(DiagKey::Vol, market.vol);

        Ok(PricingResult {
            price,
            stderr: None,
            greeks: Some(greeks),
            diagnostics,
        })
    }
}
