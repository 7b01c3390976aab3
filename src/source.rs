//! Particle sources: random generation and the whitespace-separated text format.
//!
//! The text format is a particle count followed by one record per particle:
//!
//! ```text
//! 2
//! 0.25 0.50  0.5 0.0  0.02 0.5  255 0 0
//! 0.75 0.50 -0.5 0.0  0.02 0.5  0 0 255
//! ```
//!
//! with fields `x y vx vy radius mass r g b`.

use crate::config::SourceConfig;
use crate::core::particle::{Color, Particle, BOX_SIZE, DIM};
use crate::error::{Error, Result};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::io::Read;
use std::str::{FromStr, SplitWhitespace};
use tracing::debug;

const MAX_PLACEMENT_ATTEMPTS: usize = 1_000_000;

const FIELDS: [&str; 9] = ["x", "y", "vx", "vy", "radius", "mass", "r", "g", "b"];

/// Generate `num_particles` non-overlapping particles inside the unit square.
///
/// Positions are uniform in `[radius, 1 - radius]`, velocity components
/// uniform in `[-random_speed, random_speed]`. `seed` makes the run
/// reproducible; `None` draws a seed from the thread RNG.
pub fn random_particles(
    num_particles: usize,
    config: &SourceConfig,
    seed: Option<u64>,
) -> Result<Vec<Particle>> {
    config.validate()?;
    let radius = config.effective_radius(config.random_radius);
    if 2.0 * radius > BOX_SIZE {
        return Err(Error::InvalidParam(
            "random_radius must fit inside the unit square".into(),
        ));
    }

    let mut rng: StdRng = match seed {
        Some(s) => SeedableRng::seed_from_u64(s),
        None => SeedableRng::seed_from_u64(rng().random()),
    };

    let mut particles: Vec<Particle> = Vec::with_capacity(num_particles);
    for id in 0..num_particles {
        let id = u32::try_from(id)
            .map_err(|_| Error::InvalidParam("too many particles".into()))?;
        let mut attempts = 0usize;
        let r = loop {
            if attempts >= MAX_PLACEMENT_ATTEMPTS {
                return Err(Error::InvalidParam(format!(
                    "failed to place particle {id} without overlap; try fewer particles or a smaller radius"
                )));
            }
            attempts += 1;
            let mut r = [0.0_f64; DIM];
            for r_k in r.iter_mut() {
                *r_k = rng.random_range(radius..=BOX_SIZE - radius);
            }
            if !overlaps_existing(&particles, &r, radius) {
                break r;
            }
        };

        let speed = config.random_speed;
        let mut v = [0.0_f64; DIM];
        v.iter_mut()
            .for_each(|x| *x = rng.random_range(-speed..=speed));

        particles.push(Particle::new(
            id,
            r,
            v,
            radius,
            config.random_mass,
            config.default_color,
        )?);
    }
    debug!(count = particles.len(), radius, "generated random particles");
    Ok(particles)
}

/// Read particles in the text format described at module level.
pub fn read_particles<R: Read>(mut reader: R, config: &SourceConfig) -> Result<Vec<Particle>> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_particles(&text, config)
}

/// Parse particles from an in-memory string. Tokens after the last record are ignored.
pub fn parse_particles(text: &str, config: &SourceConfig) -> Result<Vec<Particle>> {
    config.validate()?;
    let mut tokens = text.split_whitespace();
    let count: usize = next_field(&mut tokens, 0, "count")?;

    let mut particles = Vec::with_capacity(count);
    for k in 0..count {
        let record = k + 1;
        let mut f = [0.0_f64; 6];
        for (slot, name) in f.iter_mut().zip(FIELDS.iter()) {
            *slot = next_field(&mut tokens, record, name)?;
        }
        let mut rgb = [0u8; 3];
        for (slot, name) in rgb.iter_mut().zip(FIELDS[6..].iter()) {
            *slot = next_field(&mut tokens, record, name)?;
        }
        let id = u32::try_from(k).map_err(|_| Error::Parse {
            record,
            msg: "too many particles".into(),
        })?;
        let [x, y, vx, vy, radius, mass] = f;
        let p = Particle::new(
            id,
            [x, y],
            [vx, vy],
            config.effective_radius(radius),
            mass,
            Color::new(rgb[0], rgb[1], rgb[2]),
        )
        .map_err(|e| Error::Parse {
            record,
            msg: e.to_string(),
        })?;
        particles.push(p);
    }
    debug!(count, "read particles");
    Ok(particles)
}

fn next_field<T: FromStr>(tokens: &mut SplitWhitespace<'_>, record: usize, name: &str) -> Result<T> {
    let tok = tokens.next().ok_or_else(|| Error::Parse {
        record,
        msg: format!("missing field `{name}`"),
    })?;
    tok.parse().map_err(|_| Error::Parse {
        record,
        msg: format!("invalid value {tok:?} for field `{name}`"),
    })
}

fn overlaps_existing(existing: &[Particle], r: &[f64; DIM], radius: f64) -> bool {
    existing.iter().any(|p| {
        let (dx, dy) = (r[0] - p.r[0], r[1] - p.r[1]);
        let sigma = radius + p.radius();
        dx * dx + dy * dy < sigma * sigma
    })
}
