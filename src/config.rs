//! Explicit configuration values for the driver and the particle sources.

use crate::core::particle::Color;
use crate::error::{Error, Result};
use std::time::Duration;

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Time horizon: nothing is scheduled or processed past this clock value.
    pub limit: f64,
    /// Ticks per unit of simulation time.
    pub hz: f64,
    /// Pause handed to the renderer after every presented frame.
    pub pause: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            limit: 10_000.0,
            hz: 0.5,
            pause: Duration::from_millis(20),
        }
    }
}

impl SimConfig {
    /// Config with the given horizon and tick frequency, no pause between frames.
    pub fn new(limit: f64, hz: f64) -> Self {
        Self {
            limit,
            hz,
            pause: Duration::ZERO,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.limit.is_finite() || self.limit < 0.0 {
            return Err(Error::InvalidParam("limit must be finite and >= 0".into()));
        }
        if !self.hz.is_finite() || self.hz <= 0.0 {
            return Err(Error::InvalidParam("hz must be finite and > 0".into()));
        }
        Ok(())
    }

    /// Simulation time between two ticks.
    #[inline]
    pub fn tick_period(&self) -> f64 {
        1.0 / self.hz
    }
}

/// Configuration consumed by the particle sources in [`crate::source`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceConfig {
    /// Color given to randomly generated particles.
    pub default_color: Color,
    /// Raise radii below `min_visible_radius` to it at construction time.
    pub radius_upscaling: bool,
    pub min_visible_radius: f64,
    pub random_radius: f64,
    pub random_mass: f64,
    /// Random velocity components are drawn from `[-random_speed, random_speed]`.
    pub random_speed: f64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            default_color: Color::BLACK,
            radius_upscaling: false,
            min_visible_radius: 0.005,
            random_radius: 0.01,
            random_mass: 0.5,
            random_speed: 0.5,
        }
    }
}

impl SourceConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.min_visible_radius.is_finite() || self.min_visible_radius < 0.0 {
            return Err(Error::InvalidParam(
                "min_visible_radius must be finite and >= 0".into(),
            ));
        }
        if !self.random_radius.is_finite() || self.random_radius < 0.0 {
            return Err(Error::InvalidParam(
                "random_radius must be finite and >= 0".into(),
            ));
        }
        if !self.random_mass.is_finite() || self.random_mass <= 0.0 {
            return Err(Error::InvalidParam("random_mass must be finite and > 0".into()));
        }
        if !self.random_speed.is_finite() || self.random_speed < 0.0 {
            return Err(Error::InvalidParam(
                "random_speed must be finite and >= 0".into(),
            ));
        }
        Ok(())
    }

    /// Radius a particle is actually built with once the upscaling policy is applied.
    #[inline]
    pub fn effective_radius(&self, radius: f64) -> f64 {
        if self.radius_upscaling && radius < self.min_visible_radius {
            self.min_visible_radius
        } else {
            radius
        }
    }
}
