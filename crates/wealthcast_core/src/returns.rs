//! Monthly return sampling
//!
//! Returns are drawn from a normal distribution whose monthly mean and
//! volatility are derived from annual figures: `mean / 12` and
//! `volatility / sqrt(12)`. The standard normal variate comes from a
//! Box–Muller transform over the caller's PRNG, so a seeded generator gives a
//! reproducible return stream.

use std::f64::consts::TAU;

use rand::Rng;

use crate::error::ValidationError;

/// Samples normally distributed monthly returns
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyReturnGenerator {
    monthly_mean: f64,
    monthly_volatility: f64,
}

impl MonthlyReturnGenerator {
    /// `annual_mean` and `annual_volatility` are decimal fractions (0.10 = 10%).
    pub fn new(annual_mean: f64, annual_volatility: f64) -> Result<Self, ValidationError> {
        if !annual_mean.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "annual_mean",
                value: annual_mean,
            });
        }
        if !annual_volatility.is_finite() {
            return Err(ValidationError::NotFinite {
                field: "annual_volatility",
                value: annual_volatility,
            });
        }
        if annual_volatility < 0.0 {
            return Err(ValidationError::NegativeVolatility(annual_volatility));
        }

        Ok(Self {
            monthly_mean: annual_mean / 12.0,
            monthly_volatility: annual_volatility / 12f64.sqrt(),
        })
    }

    #[must_use]
    pub fn monthly_mean(&self) -> f64 {
        self.monthly_mean
    }

    #[must_use]
    pub fn monthly_volatility(&self) -> f64 {
        self.monthly_volatility
    }

    /// Draw one monthly return
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.monthly_volatility == 0.0 {
            return self.monthly_mean;
        }
        self.monthly_mean + self.monthly_volatility * standard_normal(rng)
    }
}

/// Box–Muller transform. `u1 == 0` would make `ln(u1)` undefined, so it is
/// redrawn.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u1: f64 = rng.random();
    while u1 <= 0.0 {
        u1 = rng.random();
    }
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
