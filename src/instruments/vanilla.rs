//! Canonical European vanilla option contract used throughout the library.
//!
//! [`VanillaOption`] stores side, strike, and expiry. Validation rejects
//! non-positive strikes and expiries up front so the engines never divide by
//! `σ√T` at a degenerate point; callers needing intrinsic value at expiry
//! evaluate [`crate::core::OptionType::intrinsic`] directly instead.

use crate::core::{Instrument, OptionType, PricingError};

/// European vanilla option contract.
///
/// This is the canonical input for every engine in the crate: strike `K`,
/// expiry `T` in year fractions, and option side.
///
/// # Examples
/// ```
/// use volgrid::core::OptionType;
/// use volgrid::instruments::VanillaOption;
///
/// let option = VanillaOption {
///     option_type: OptionType::Call,
///     strike: 100.0,
///     expiry: 1.0,
/// };
/// assert!(option.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VanillaOption {
    /// Call or put.
    pub option_type: OptionType,
    /// Strike level.
    pub strike: f64,
    /// Expiry in years.
    pub expiry: f64,
}

impl VanillaOption {
    /// Builds a European call option.
    pub fn european_call(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Call,
            strike,
            expiry,
        }
    }

    /// Builds a European put option.
    pub fn european_put(strike: f64, expiry: f64) -> Self {
        Self {
            option_type: OptionType::Put,
            strike,
            expiry,
        }
    }

    /// Same contract with a different expiry; used by grid samplers that
    /// sweep time-to-maturity.
    pub fn with_expiry(self, expiry: f64) -> Self {
        Self { expiry, ..self }
    }

    /// Validates instrument fields.
    ///
    /// # Errors
    /// Returns [`PricingError::InvalidInput`] when `strike <= 0`, when
    /// `expiry <= 0`, or when either field is non-finite.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla strike must be finite and > 0".to_string(),
            ));
        }
        if !self.expiry.is_finite() || self.expiry <= 0.0 {
            return Err(PricingError::InvalidInput(
                "vanilla expiry must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Instrument for VanillaOption {
    fn instrument_type(&self) -> &str {
        "VanillaOption"
    }
}
