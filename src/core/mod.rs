//! Core traits, common domain types, and library-wide result/error structures.

use crate::market::Market;

pub mod types;

pub use types::*;

/// Standardized Greeks container used by engine results.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Greeks {
    /// First derivative to spot.
    pub delta: f64,
    /// Second derivative to spot.
    pub gamma: f64,
    /// First derivative to volatility.
    pub vega: f64,
    /// First derivative to time.
    pub theta: f64,
    /// First derivative to rate.
    pub rho: f64,
}

/// Common trait implemented by every priceable instrument.
pub trait Instrument: std::fmt::Debug {
    /// Returns a short type identifier for diagnostics and bindings.
    fn instrument_type(&self) -> &str;
}

/// Pricing engine abstraction over an instrument type.
pub trait PricingEngine<I: Instrument> {
    /// Prices an instrument under the provided market state.
    fn price(&self, instrument: &I, market: &Market) -> Result<PricingResult, PricingError>;
}

/// Compact key set for engine diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagKey {
    D1,
    D2,
    DiscountFactor,
    NumPaths,
    NumSteps,
    Pu,
    RawStderr,
    U,
    Vol,
}

impl DiagKey {
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::D1 => "d1",
            Self::D2 => "d2",
            Self::DiscountFactor => "discount_factor",
            Self::NumPaths => "num_paths",
            Self::NumSteps => "num_steps",
            Self::Pu => "pu",
            Self::RawStderr => "raw_stderr",
            Self::U => "u",
            Self::Vol => "vol",
        }
    }
}

impl std::str::FromStr for DiagKey {
    type Err = ();

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "d1" => Ok(Self::D1),
            "d2" => Ok(Self::D2),
            "discount_factor" => Ok(Self::DiscountFactor),
            "num_paths" => Ok(Self::NumPaths),
            "num_steps" => Ok(Self::NumSteps),
            "pu" => Ok(Self::Pu),
            "raw_stderr" => Ok(Self::RawStderr),
            "u" => Ok(Self::U),
            "vol" => Ok(Self::Vol),
            _ => Err(()),
        }
    }
}

/// Inline diagnostics storage used in [`PricingResult`].
///
/// Fixed capacity keeps results allocation-free on the pricing hot path;
/// every engine emits well under [`Diagnostics::CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: [Option<(DiagKey, f64)>; 8],
}

impl Diagnostics {
    pub const CAPACITY: usize = 8;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries[0].is_none()
    }

    /// Inserts a diagnostic value, returning the previous value for the key.
    #[inline]
    pub fn insert(&mut self, key: DiagKey, value: f64) -> Option<f64> {
        for (entry_key, existing) in self.entries.iter_mut().flatten() {
            if *entry_key == key {
                let prev = *existing;
                *existing = value;
                return Some(prev);
            }
        }

        for entry in &mut self.entries {
            if entry.is_none() {
                *entry = Some((key, value));
                return None;
            }
        }

        panic!("diagnostics capacity exceeded ({})", Self::CAPACITY);
    }

    #[inline]
    pub fn get(&self, key: DiagKey) -> Option<f64> {
        self.entries
            .iter()
            .flatten()
            .find_map(|(entry_key, value)| (*entry_key == key).then_some(*value))
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries
            .iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), *v))
    }
}

/// Unified engine result payload.
#[derive(Debug, Clone)]
pub struct PricingResult {
    /// Present value.
    pub price: f64,
    /// Standard error (Monte Carlo only).
    pub stderr: Option<f64>,
    /// Greeks when available from the engine.
    pub greeks: Option<Greeks>,
    /// Engine-specific scalar diagnostics.
    pub diagnostics: Diagnostics,
}

/// Engine and utility errors surfaced by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Input validation error.
    InvalidInput(String),
    /// Numerical issue (degenerate discretization, invalid state, etc.).
    NumericalError(String),
    /// Requested work exceeds the caller-supplied cost ceiling.
    BudgetExceeded(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::NumericalError(msg) => write!(f, "numerical error: {msg}"),
            Self::BudgetExceeded(msg) => write!(f, "work budget exceeded: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_insert_get_and_overwrite() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());

        assert_eq!(diag.insert(DiagKey::Vol, 0.2), None);
        assert_eq!(diag.insert(DiagKey::NumSteps, 100.0), None);
        assert_eq!(diag.get(DiagKey::Vol), Some(0.2));
        assert_eq!(diag.len(), 2);

        assert_eq!(diag.insert(DiagKey::Vol, 0.3), Some(0.2));
        assert_eq!(diag.get(DiagKey::Vol), Some(0.3));
        assert_eq!(diag.len(), 2);

        assert_eq!(diag.get(DiagKey::Pu), None);
    }

    #[test]
    fn diag_keys_round_trip_through_strings() {
        for key in [
            DiagKey::D1,
            DiagKey::D2,
            DiagKey::DiscountFactor,
            DiagKey::NumPaths,
            DiagKey::NumSteps,
            DiagKey::Pu,
            DiagKey::RawStderr,
            DiagKey::U,
            DiagKey::Vol,
        ] {
            assert_eq!(key.as_str().parse::<DiagKey>(), Ok(key));
        }
        assert!("not_a_key".parse::<DiagKey>().is_err());
    }

    #[test]
    fn error_display_is_descriptive() {
        let err = PricingError::InvalidInput("strike must be > 0".to_string());
        assert_eq!(err.to_string(), "invalid input: strike must be > 0");
    }
}
