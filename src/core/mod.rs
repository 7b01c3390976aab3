//! Core simulation data structures for the event-driven collision engine.

pub mod event;
pub mod particle;
pub mod schedule;
pub mod sim;

pub use event::{Event, EventKind, Stamp};
pub use particle::{Color, Particle, Wall};
pub use schedule::EventSchedule;
pub use sim::{Phase, RunSummary, Simulation, Step};
