use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::time::Duration;

use crate::config::{SimConfig, SourceConfig};
use crate::core::particle::{Color, DIM};
use crate::core::{Particle, Simulation};
use crate::render::FrameRecorder;

/// One particle record: (x, y, vx, vy, radius, mass, (r, g, b)).
type ParticleRecord = (f64, f64, f64, f64, f64, f64, (u8, u8, u8));

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn to_array<'py>(py: Python<'py>, rows: &[[f64; DIM]]) -> Py<PyArray2<f64>> {
    let arr = Array2::<f64>::from_shape_fn((rows.len(), DIM), |(i, k)| rows[i][k]);
    arr.into_pyarray(py).unbind()
}

/// Python-facing wrapper around the Rust Simulation core.
///
/// API:
/// - __new__(num_particles=None, particles=None, limit=10000.0, hz=0.5, radius_upscaling=False, seed=None)
/// - simulate() -> list of np.ndarray, one (N, 2) position array per tick
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
#[pyclass]
pub struct CollisionSim {
    sim: Simulation,
}

#[pymethods]
impl CollisionSim {
    /// Build a simulation from either a random population or explicit records.
    ///
    /// Parameters
    /// - num_particles: number of random particles (exclusive with `particles`)
    /// - particles: list of (x, y, vx, vy, radius, mass, (r, g, b)) tuples
    /// - limit: simulation time horizon (finite, >= 0)
    /// - hz: ticks per unit simulation time (> 0)
    /// - radius_upscaling: raise tiny radii to the visibility threshold
    /// - seed: RNG seed for random populations; None for nondeterministic
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (num_particles=None, particles=None, limit=10000.0, hz=0.5, radius_upscaling=false, seed=None))]
    fn new(
        num_particles: Option<usize>,
        particles: Option<Vec<ParticleRecord>>,
        limit: f64,
        hz: f64,
        radius_upscaling: bool,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let source = SourceConfig {
            radius_upscaling,
            ..SourceConfig::default()
        };
        let config = SimConfig {
            limit,
            hz,
            pause: Duration::ZERO,
        };
        let sim = match (num_particles, particles) {
            (Some(n), None) => Simulation::with_random_particles(n, config, &source, seed),
            (None, Some(records)) => {
                let mut ps = Vec::with_capacity(records.len());
                for (k, (x, y, vx, vy, radius, mass, (r, g, b))) in records.into_iter().enumerate()
                {
                    let id = u32::try_from(k).map_err(py_err)?;
                    ps.push(
                        Particle::new(
                            id,
                            [x, y],
                            [vx, vy],
                            source.effective_radius(radius),
                            mass,
                            Color::new(r, g, b),
                        )
                        .map_err(py_err)?,
                    );
                }
                Simulation::new(ps, config)
            }
            _ => {
                return Err(py_err(
                    "exactly one of num_particles or particles must be given",
                ))
            }
        }
        .map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Run to the time limit (releases the GIL during computation).
    ///
    /// Returns one (N, 2) position array per tick.
    fn simulate(&mut self, py: Python<'_>) -> PyResult<Vec<Py<PyArray2<f64>>>> {
        let sim = &mut self.sim;
        let frames = py
            .detach(|| {
                let mut rec = FrameRecorder::new();
                sim.simulate(&mut rec).map(|_| rec.into_frames())
            })
            .map_err(py_err)?;
        Ok(frames
            .iter()
            .map(|f| {
                let rows: Vec<[f64; DIM]> = f.sprites.iter().map(|s| s.position).collect();
                to_array(py, &rows)
            })
            .collect())
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(py, &self.sim.positions())
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities(&self, py: Python<'_>) -> Py<PyArray2<f64>> {
        to_array(py, &self.sim.velocities())
    }

    fn kinetic_energy(&self) -> f64 {
        self.sim.kinetic_energy()
    }

    fn time(&self) -> f64 {
        self.sim.time()
    }

    /// (binary, vertical_wall, horizontal_wall, ticks, stale) event counts so far.
    fn event_counts(&self) -> (u64, u64, u64, u64, u64) {
        let s = self.sim.summary();
        (s.binary, s.vertical_wall, s.horizontal_wall, s.ticks, s.stale)
    }
}

/// The collisim Python module entry point.
#[pymodule]
fn collisim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<CollisionSim>()?;
    Ok(())
}
