use crate::config::{SimConfig, SourceConfig};
use crate::core::particle::{Wall, DIM};
use crate::core::{Event, EventKind, EventSchedule, Particle};
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::source;
use tracing::{debug, trace, warn};

/// Lifecycle of a simulation run. A run is single pass: once terminated it
/// cannot be restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Running,
    Terminated,
}

/// Outcome of one [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A valid event was applied.
    Processed(EventKind),
    /// A stale event was dropped without touching any state.
    Discarded(EventKind),
    /// The schedule is exhausted or the horizon was reached.
    Finished,
}

/// Counters collected over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub binary: u64,
    pub vertical_wall: u64,
    pub horizontal_wall: u64,
    pub ticks: u64,
    /// Stale events dropped at extraction.
    pub stale: u64,
    /// Predictions with a negative root (overlapping particles) scheduled at the current clock.
    pub clamped: u64,
    pub final_time: f64,
}

impl RunSummary {
    /// Number of physical collisions processed.
    pub fn collisions(&self) -> u64 {
        self.binary + self.vertical_wall + self.horizontal_wall
    }
}

/// Event-driven simulation of hard disks in the unit square.
///
/// Walls are the lines x = 0, x = 1 (vertical) and y = 0, y = 1 (horizontal).
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    config: SimConfig,
    particles: Vec<Particle>,
    schedule: EventSchedule,
    phase: Phase,
    overlaps: usize,
    summary: RunSummary,
}

impl Simulation {
    /// Create a simulation over `particles`.
    ///
    /// Particle ids are reassigned to their index. Overlapping pairs are not
    /// an error; each one is logged and counted (see [`Simulation::overlap_count`]).
    pub fn new(mut particles: Vec<Particle>, config: SimConfig) -> Result<Self> {
        config.validate()?;
        for (k, p) in particles.iter_mut().enumerate() {
            p.id = u32::try_from(k)
                .map_err(|_| Error::InvalidParam("too many particles".into()))?;
        }

        let mut overlaps = 0usize;
        for i in 0..particles.len() {
            for j in (i + 1)..particles.len() {
                if particles[i].overlaps(&particles[j]) {
                    warn!(i, j, "particles overlap at construction");
                    overlaps += 1;
                }
            }
        }

        Ok(Self {
            time_now: 0.0,
            config,
            particles,
            schedule: EventSchedule::new(),
            phase: Phase::Initialized,
            overlaps,
            summary: RunSummary::default(),
        })
    }

    /// Create a simulation with `num_particles` randomly placed particles.
    pub fn with_random_particles(
        num_particles: usize,
        config: SimConfig,
        source_config: &SourceConfig,
        seed: Option<u64>,
    ) -> Result<Self> {
        let particles = source::random_particles(num_particles, source_config, seed)?;
        Self::new(particles, config)
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total linear momentum (diagnostic).
    pub fn momentum(&self) -> [f64; DIM] {
        self.particles.iter().fold([0.0; DIM], |acc, p| {
            let m = p.momentum();
            [acc[0] + m[0], acc[1] + m[1]]
        })
    }

    /// Number of particle pairs found overlapping at construction.
    pub fn overlap_count(&self) -> usize {
        self.overlaps
    }

    /// Events currently held by the schedule, stale ones included.
    pub fn pending_events(&self) -> usize {
        self.schedule.len()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Run the whole simulation up to the configured limit.
    ///
    /// `renderer` is called on every tick event only.
    pub fn simulate(&mut self, renderer: &mut dyn Renderer) -> Result<RunSummary> {
        self.start()?;
        while self.step(renderer)? != Step::Finished {}
        Ok(self.summary)
    }

    /// Seed the schedule with every particle's predictions and the first tick.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Initialized {
            return Err(Error::InvalidState(format!(
                "simulation cannot start from {:?}",
                self.phase
            )));
        }
        let n = self.particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                self.predict_pair(i, j)?;
            }
            self.predict_walls(i)?;
        }
        self.schedule.insert(Event::tick(self.time_now)?);
        self.phase = Phase::Running;
        debug!(
            particles = n,
            pending = self.schedule.len(),
            limit = self.config.limit,
            "simulation started"
        );
        Ok(())
    }

    /// Extract and handle the next event.
    pub fn step(&mut self, renderer: &mut dyn Renderer) -> Result<Step> {
        match self.phase {
            Phase::Initialized => {
                return Err(Error::InvalidState("simulation has not been started".into()))
            }
            Phase::Terminated => return Ok(Step::Finished),
            Phase::Running => {}
        }

        let Some(ev) = self.schedule.extract_min() else {
            self.terminate();
            return Ok(Step::Finished);
        };

        if !ev.is_valid(&self.particles) {
            self.summary.stale += 1;
            trace!(time = ev.time_f64(), kind = ?ev.kind, "discarding stale event");
            return Ok(Step::Discarded(ev.kind));
        }

        self.drift_all(ev.time_f64())?;

        match ev.kind {
            EventKind::Binary(a, b) => {
                let (i, j) = (a.index as usize, b.index as usize);
                let (pi, pj) = pair_mut(&mut self.particles, i, j)?;
                pi.resolve_collision(pj)?;
                self.summary.binary += 1;
                self.predict_particle(i)?;
                self.predict_particle(j)?;
            }
            EventKind::VerticalWall(a) => {
                self.bounce_off_wall(a.index as usize, Wall::Vertical)?;
                self.summary.vertical_wall += 1;
            }
            EventKind::HorizontalWall(a) => {
                self.bounce_off_wall(a.index as usize, Wall::Horizontal)?;
                self.summary.horizontal_wall += 1;
            }
            EventKind::Tick => {
                self.redraw(renderer)?;
                self.summary.ticks += 1;
            }
        }
        trace!(time = self.time_now, kind = ?ev.kind, "processed event");

        if self.time_now >= self.config.limit {
            self.terminate();
        }
        Ok(Step::Processed(ev.kind))
    }

    // ============ Internal helpers ============

    fn terminate(&mut self) {
        self.phase = Phase::Terminated;
        self.summary.final_time = self.time_now;
        debug!(
            time = self.time_now,
            collisions = self.summary.collisions(),
            ticks = self.summary.ticks,
            stale = self.summary.stale,
            leftover = self.schedule.len(),
            "simulation terminated"
        );
        self.schedule.clear();
    }

    fn bounce_off_wall(&mut self, i: usize, wall: Wall) -> Result<()> {
        self.particles[i].resolve_wall_collision(wall);
        self.predict_particle(i)
    }

    /// Present one frame and schedule the next tick one period later. The
    /// last tick is pinned to the limit, so the final interval between frames
    /// can be shorter than the period.
    fn redraw(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        renderer.clear();
        for p in &self.particles {
            renderer.draw_particle(p.r, p.radius(), p.color);
        }
        renderer.present();
        renderer.pause(self.config.pause);

        if self.time_now < self.config.limit {
            let next = (self.time_now + self.config.tick_period()).min(self.config.limit);
            self.schedule.insert(Event::tick(next)?);
        }
        Ok(())
    }

    /// Re-predict every future event of particle `i` against the current state.
    fn predict_particle(&mut self, i: usize) -> Result<()> {
        for j in 0..self.particles.len() {
            if j != i {
                self.predict_pair(i, j)?;
            }
        }
        self.predict_walls(i)
    }

    fn predict_pair(&mut self, i: usize, j: usize) -> Result<()> {
        let dt = self.particles[i].time_to_collide(&self.particles[j]);
        if let Some(t) = self.horizon_time(dt) {
            let ev = Event::binary(t, &self.particles[i], &self.particles[j])?;
            self.schedule.insert(ev);
        }
        Ok(())
    }

    fn predict_walls(&mut self, i: usize) -> Result<()> {
        for wall in [Wall::Vertical, Wall::Horizontal] {
            let dt = self.particles[i].time_to_hit(wall);
            if let Some(t) = self.horizon_time(dt) {
                let ev = Event::wall(t, &self.particles[i], wall)?;
                self.schedule.insert(ev);
            }
        }
        Ok(())
    }

    /// Absolute time of a prediction `dt` from now, or `None` past the horizon.
    /// Negative roots come from overlapping states and are pinned to the current clock.
    fn horizon_time(&mut self, dt: f64) -> Option<f64> {
        let t = self.time_now + dt;
        // also rejects NaN and +inf
        if !(t <= self.config.limit) {
            return None;
        }
        if dt < 0.0 {
            warn!(time = self.time_now, dt, "negative collision time from overlapping state");
            self.summary.clamped += 1;
            return Some(self.time_now);
        }
        Some(t)
    }

    /// Drift all particles to the specified absolute time by linear motion.
    fn drift_all(&mut self, to_time: f64) -> Result<()> {
        if to_time < self.time_now {
            return Err(Error::InvalidState(format!(
                "cannot drift backwards in time ({} -> {})",
                self.time_now, to_time
            )));
        }
        let dt = to_time - self.time_now;
        if dt > 0.0 {
            for p in &mut self.particles {
                p.advance(dt);
            }
        }
        self.time_now = to_time;
        Ok(())
    }
}

// ============ Utility helpers ============

/// Two distinct mutable particles out of one slice.
fn pair_mut(ps: &mut [Particle], i: usize, j: usize) -> Result<(&mut Particle, &mut Particle)> {
    if i == j {
        return Err(Error::InvalidState(format!(
            "binary event references particle {i} twice"
        )));
    }
    if i < j {
        let (lo, hi) = ps.split_at_mut(j);
        Ok((&mut lo[i], &mut hi[0]))
    } else {
        let (lo, hi) = ps.split_at_mut(i);
        Ok((&mut hi[0], &mut lo[j]))
    }
}
