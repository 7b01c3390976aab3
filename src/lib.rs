//! Event-driven simulation of elastic hard disks in the unit square.
//!
//! The engine predicts every future particle-particle and particle-wall
//! contact, keeps the predictions in a time-ordered schedule, and discards
//! stale ones lazily through per-particle collision counters.
//!
//! ```
//! use collisim::config::{SimConfig, SourceConfig};
//! use collisim::core::Simulation;
//! use collisim::render::NullRenderer;
//!
//! let mut sim = Simulation::with_random_particles(
//!     20,
//!     SimConfig::new(5.0, 2.0),
//!     &SourceConfig::default(),
//!     Some(42),
//! )?;
//! let summary = sim.simulate(&mut NullRenderer)?;
//! assert!(summary.ticks > 0);
//! # Ok::<(), collisim::error::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod source;

#[cfg(feature = "python")]
mod python;
