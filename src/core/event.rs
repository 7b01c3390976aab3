use crate::core::particle::{Particle, Wall};
use crate::error::{Error, Result};
use ordered_float::NotNan;
use std::cmp::Ordering;

/// Participant reference plus the collision-count snapshot taken when the
/// event was predicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stamp {
    pub index: u32,
    pub count: u64,
}

impl Stamp {
    /// Snapshot the current counter of `p`.
    #[inline]
    pub fn of(p: &Particle) -> Self {
        Self {
            index: p.id,
            count: p.collision_count(),
        }
    }

    /// True while the referenced particle has not collided since the snapshot.
    #[inline]
    fn is_current(&self, particles: &[Particle]) -> bool {
        particles
            .get(self.index as usize)
            .is_some_and(|p| p.collision_count() == self.count)
    }
}

/// Kinds of events that can occur in the engine.
///
/// Tie-breaking for deterministic ordering follows declaration order:
/// `Binary` < `VerticalWall` < `HorizontalWall` < `Tick` when times are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Particle-to-particle collision.
    Binary(Stamp, Stamp),
    /// Particle hits the left or right wall.
    VerticalWall(Stamp),
    /// Particle hits the bottom or top wall.
    HorizontalWall(Stamp),
    /// Periodic presentation signal; involves no particle.
    Tick,
}

impl EventKind {
    /// Wall event of the given orientation.
    #[inline]
    pub fn wall(wall: Wall, stamp: Stamp) -> Self {
        match wall {
            Wall::Vertical => EventKind::VerticalWall(stamp),
            Wall::Horizontal => EventKind::HorizontalWall(stamp),
        }
    }

    #[inline]
    fn order_key(&self) -> (u8, Option<Stamp>, Option<Stamp>) {
        match *self {
            EventKind::Binary(a, b) => (0, Some(a), Some(b)),
            EventKind::VerticalWall(a) => (1, Some(a), None),
            EventKind::HorizontalWall(a) => (2, Some(a), None),
            EventKind::Tick => (3, None, None),
        }
    }
}

/// A scheduled event with deterministic ordering.
///
/// - `time`: absolute occurrence time (finite, non-NaN).
/// - `kind`: event kind, participants and their validity stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub time: NotNan<f64>,
    pub kind: EventKind,
}

impl Event {
    /// Create a new event, validating that time is finite and non-NaN.
    pub fn new(time: f64, kind: EventKind) -> Result<Self> {
        if !time.is_finite() {
            return Err(Error::InvalidParam(format!(
                "event time must be finite, got {time}"
            )));
        }
        let time = NotNan::new(time)
            .map_err(|_| Error::InvalidParam("event time cannot be NaN".into()))?;
        Ok(Self { time, kind })
    }

    /// Binary collision between `a` and `b` at `time`.
    pub fn binary(time: f64, a: &Particle, b: &Particle) -> Result<Self> {
        Self::new(time, EventKind::Binary(Stamp::of(a), Stamp::of(b)))
    }

    /// Collision of `p` with a wall of the given orientation at `time`.
    pub fn wall(time: f64, p: &Particle, wall: Wall) -> Result<Self> {
        Self::new(time, EventKind::wall(wall, Stamp::of(p)))
    }

    /// Presentation tick at `time`.
    pub fn tick(time: f64) -> Result<Self> {
        Self::new(time, EventKind::Tick)
    }

    /// Returns the raw f64 event time.
    #[inline]
    pub fn time_f64(&self) -> f64 {
        self.time.into_inner()
    }

    /// An event is valid iff no participant has collided since it was predicted.
    /// Ticks are always valid.
    pub fn is_valid(&self, particles: &[Particle]) -> bool {
        match self.kind {
            EventKind::Binary(a, b) => a.is_current(particles) && b.is_current(particles),
            EventKind::VerticalWall(a) | EventKind::HorizontalWall(a) => a.is_current(particles),
            EventKind::Tick => true,
        }
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.order_key().cmp(&other.kind.order_key()))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
