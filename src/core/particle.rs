use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Edge length of the square container; walls sit at 0 and `BOX_SIZE` on both axes.
pub const BOX_SIZE: f64 = 1.0;

/// RGB color used only for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// The two wall orientations of the container.
///
/// A `Vertical` wall is one of the lines `x = 0` / `x = BOX_SIZE` and reflects
/// the x-velocity; a `Horizontal` wall is `y = 0` / `y = BOX_SIZE` and reflects
/// the y-velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Vertical,
    Horizontal,
}

impl Wall {
    /// Index of the velocity component this wall reflects.
    #[inline]
    pub fn axis(self) -> usize {
        match self {
            Wall::Vertical => 0,
            Wall::Horizontal => 1,
        }
    }
}

/// A rigid disk moving in the unit square.
///
/// Fields:
/// - `id`: index of the particle within its simulation
/// - `r`: position [x, y]
/// - `v`: velocity [vx, vy]
/// - `radius`: disk radius (>= 0)
/// - `mass`: particle mass (> 0)
/// - `collision_count`: incremented once per collision the particle takes part in
/// - `color`: cosmetic
#[derive(Debug, Clone)]
pub struct Particle {
    /// Particle identifier (index in the owning simulation).
    pub id: u32,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    radius: f64,
    mass: f64,
    collision_count: u64,
    /// Presentation color.
    pub color: Color,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `radius` is negative, `mass` is non-positive,
    ///   or any component is NaN/inf.
    pub fn new(
        id: u32,
        r: [f64; DIM],
        v: [f64; DIM],
        radius: f64,
        mass: f64,
        color: Color,
    ) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(Error::InvalidParam("radius must be finite and >= 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            radius,
            mass,
            collision_count: 0,
            color,
        })
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Number of collisions (binary and wall) this particle has taken part in.
    #[inline]
    pub fn collision_count(&self) -> u64 {
        self.collision_count
    }

    #[inline]
    fn bump_collision_count(&mut self) {
        self.collision_count = self.collision_count.saturating_add(1);
    }

    /// Move in a straight line for `dt`. No bounds checking.
    #[inline]
    pub fn advance(&mut self, dt: f64) {
        for (rk, &vk) in self.r.iter_mut().zip(self.v.iter()) {
            *rk += vk * dt;
        }
    }

    /// Time until `self` and `other` touch, assuming both keep their current
    /// straight-line trajectories. `f64::INFINITY` when they never do.
    ///
    /// If the two already overlap, the earliest algebraic root is returned as
    /// is, which is negative.
    pub fn time_to_collide(&self, other: &Particle) -> f64 {
        if self.id == other.id {
            return f64::INFINITY;
        }
        let dr = sub(&other.r, &self.r);
        let dv = sub(&other.v, &self.v);
        let dvdr = dot(&dv, &dr);
        if dvdr >= 0.0 {
            return f64::INFINITY;
        }
        let dvdv = dot(&dv, &dv);
        if dvdv == 0.0 {
            return f64::INFINITY;
        }
        let drdr = dot(&dr, &dr);
        let sigma = self.radius + other.radius;
        let d = dvdr * dvdr - dvdv * (drdr - sigma * sigma);
        if d < 0.0 {
            return f64::INFINITY;
        }
        -(dvdr + d.sqrt()) / dvdv
    }

    /// Time until this particle touches the left or right wall.
    #[inline]
    pub fn time_to_hit_vertical_wall(&self) -> f64 {
        self.time_to_hit(Wall::Vertical)
    }

    /// Time until this particle touches the bottom or top wall.
    #[inline]
    pub fn time_to_hit_horizontal_wall(&self) -> f64 {
        self.time_to_hit(Wall::Horizontal)
    }

    /// Time until contact with the given wall pair; the near or far wall is
    /// chosen by the sign of the same-axis velocity. `f64::INFINITY` for
    /// motion parallel to the wall.
    pub fn time_to_hit(&self, wall: Wall) -> f64 {
        let k = wall.axis();
        let (x, v) = (self.r[k], self.v[k]);
        if v > 0.0 {
            (BOX_SIZE - x - self.radius) / v
        } else if v < 0.0 {
            (self.radius - x) / v
        } else {
            f64::INFINITY
        }
    }

    /// Elastic collision response for two touching particles.
    ///
    /// The impulse acts along the line of centers; both velocities change and
    /// both counters are incremented. Point particles meet with coincident
    /// centers, in which case the impulse acts along the relative velocity
    /// (a head-on exchange). Coincident centers with no relative motion are
    /// rejected without touching either particle.
    pub fn resolve_collision(&mut self, other: &mut Particle) -> Result<()> {
        let dr = sub(&other.r, &self.r);
        let dv = sub(&other.v, &self.v);
        let dist = dot(&dr, &dr).sqrt();
        let speed = dot(&dv, &dv).sqrt();
        // unit normal pointing from self towards other
        let n = if dist > f64::EPSILON {
            [dr[0] / dist, dr[1] / dist]
        } else if speed > f64::EPSILON {
            [-dv[0] / speed, -dv[1] / speed]
        } else {
            return Err(Error::MathError(format!(
                "coincident centers at rest for particles {} and {}",
                self.id, other.id
            )));
        };
        let (ma, mb) = (self.mass, other.mass);
        let impulse = 2.0 * ma * mb * dot(&dv, &n) / (ma + mb);
        for k in 0..DIM {
            let f = impulse * n[k];
            self.v[k] += f / ma;
            other.v[k] -= f / mb;
        }
        self.bump_collision_count();
        other.bump_collision_count();
        Ok(())
    }

    /// Specular reflection off a wall: negates the velocity component normal to it.
    pub fn resolve_wall_collision(&mut self, wall: Wall) {
        let k = wall.axis();
        self.v[k] = -self.v[k];
        self.bump_collision_count();
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * dot(&self.v, &self.v)
    }

    /// Linear momentum m v.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }

    /// True when the centers are closer than the sum of radii.
    pub fn overlaps(&self, other: &Particle) -> bool {
        let dr = sub(&other.r, &self.r);
        let sigma = self.radius + other.radius;
        dot(&dr, &dr) < sigma * sigma
    }
}

#[inline]
fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
fn sub(a: &[f64; DIM], b: &[f64; DIM]) -> [f64; DIM] {
    [a[0] - b[0], a[1] - b[1]]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(id: u32, r: [f64; DIM], v: [f64; DIM], radius: f64, mass: f64) -> Particle {
        Particle::new(id, r, v, radius, mass, Color::BLACK).unwrap()
    }

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(1, [0.25, 0.5], [2.0, -3.0], 0.05, 2.0, Color::new(1, 2, 3))?;
        assert_eq!(p.id, 1);
        assert_eq!(p.r, [0.25, 0.5]);
        assert_eq!(p.v, [2.0, -3.0]);
        assert_eq!(p.radius(), 0.05);
        assert_eq!(p.mass(), 2.0);
        assert_eq!(p.collision_count(), 0);
        assert_eq!(p.color, Color::new(1, 2, 3));
        Ok(())
    }

    #[test]
    fn zero_radius_is_allowed() -> Result<()> {
        let p = Particle::new(0, [0.5, 0.5], [0.0, 0.0], 0.0, 1.0, Color::BLACK)?;
        assert_eq!(p.radius(), 0.0);
        Ok(())
    }

    #[test]
    fn invalid_radius_rejected() {
        let err = Particle::new(0, [0.0, 0.0], [0.0, 0.0], -0.1, 1.0, Color::BLACK).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn zero_mass_rejected() {
        let err = Particle::new(0, [0.0, 0.0], [0.0, 0.0], 0.1, 0.0, Color::BLACK).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn non_finite_state_rejected() {
        assert!(Particle::new(0, [f64::NAN, 0.0], [0.0, 0.0], 0.1, 1.0, Color::BLACK).is_err());
        assert!(
            Particle::new(0, [0.0, 0.0], [f64::INFINITY, 0.0], 0.1, 1.0, Color::BLACK).is_err()
        );
    }

    #[test]
    fn advance_moves_in_straight_line() {
        let mut p = disk(0, [0.1, 0.2], [0.5, -0.25], 0.01, 1.0);
        p.advance(0.4);
        assert!((p.r[0] - 0.3).abs() < 1e-12);
        assert!((p.r[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn head_on_collision_time() {
        // Gap between surfaces: 0.4 - 0.1 = 0.3, closing speed 2 => t = 0.15
        let a = disk(0, [0.3, 0.5], [1.0, 0.0], 0.05, 1.0);
        let b = disk(1, [0.7, 0.5], [-1.0, 0.0], 0.05, 1.0);
        assert!((a.time_to_collide(&b) - 0.15).abs() < 1e-12);
        assert!((b.time_to_collide(&a) - 0.15).abs() < 1e-12);
    }

    #[test]
    fn zero_relative_velocity_never_collides() {
        let a = disk(0, [0.3, 0.5], [0.2, 0.1], 0.05, 1.0);
        let b = disk(1, [0.7, 0.5], [0.2, 0.1], 0.05, 1.0);
        assert_eq!(a.time_to_collide(&b), f64::INFINITY);
    }

    #[test]
    fn receding_particles_never_collide() {
        let a = disk(0, [0.3, 0.5], [-1.0, 0.0], 0.05, 1.0);
        let b = disk(1, [0.7, 0.5], [1.0, 0.0], 0.05, 1.0);
        assert_eq!(a.time_to_collide(&b), f64::INFINITY);
    }

    #[test]
    fn near_miss_has_no_real_root() {
        // Parallel lanes 0.2 apart with radii summing to 0.1
        let a = disk(0, [0.2, 0.4], [1.0, 0.0], 0.05, 1.0);
        let b = disk(1, [0.8, 0.6], [-1.0, 0.0], 0.05, 1.0);
        assert_eq!(a.time_to_collide(&b), f64::INFINITY);
    }

    #[test]
    fn self_collision_is_infinite() {
        let a = disk(4, [0.2, 0.4], [1.0, 0.0], 0.05, 1.0);
        assert_eq!(a.time_to_collide(&a.clone()), f64::INFINITY);
    }

    #[test]
    fn overlapping_approach_returns_negative_root() {
        let a = disk(0, [0.50, 0.5], [1.0, 0.0], 0.05, 1.0);
        let b = disk(1, [0.55, 0.5], [-1.0, 0.0], 0.05, 1.0);
        assert!(a.overlaps(&b));
        // dr = 0.05, sigma = 0.1; touching 0.025 ago
        let t = a.time_to_collide(&b);
        assert!((t + 0.025).abs() < 1e-12, "t = {t}");
    }

    #[test]
    fn wall_times_use_same_axis_velocity() {
        let p = disk(0, [0.5, 0.2], [0.5, 2.0], 0.1, 1.0);
        // x: (1 - 0.5 - 0.1) / 0.5 = 0.8 ; y: (1 - 0.2 - 0.1) / 2 = 0.35
        assert!((p.time_to_hit_vertical_wall() - 0.8).abs() < 1e-12);
        assert!((p.time_to_hit_horizontal_wall() - 0.35).abs() < 1e-12);

        let q = disk(1, [0.5, 0.6], [-0.5, -1.0], 0.1, 1.0);
        assert!((q.time_to_hit(Wall::Vertical) - 0.8).abs() < 1e-12);
        assert!((q.time_to_hit(Wall::Horizontal) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn parallel_motion_never_hits_wall() {
        let p = disk(0, [0.5, 0.5], [0.0, 0.3], 0.1, 1.0);
        assert_eq!(p.time_to_hit_vertical_wall(), f64::INFINITY);
        let q = disk(1, [0.5, 0.5], [0.3, 0.0], 0.1, 1.0);
        assert_eq!(q.time_to_hit_horizontal_wall(), f64::INFINITY);
    }

    #[test]
    fn equal_mass_head_on_exchanges_velocities() -> Result<()> {
        let mut a = disk(0, [0.45, 0.5], [1.0, 0.0], 0.05, 1.0);
        let mut b = disk(1, [0.55, 0.5], [-1.0, 0.0], 0.05, 1.0);
        a.resolve_collision(&mut b)?;
        assert!((a.v[0] + 1.0).abs() < 1e-12 && a.v[1].abs() < 1e-12);
        assert!((b.v[0] - 1.0).abs() < 1e-12 && b.v[1].abs() < 1e-12);
        assert_eq!(a.collision_count(), 1);
        assert_eq!(b.collision_count(), 1);
        Ok(())
    }

    #[test]
    fn oblique_unequal_mass_conserves_momentum_and_energy() -> Result<()> {
        let mut a = disk(0, [0.40, 0.40], [0.7, 0.2], 0.05, 2.0);
        // Place b touching a along a 30 degree line of centers
        let (s, c) = (30f64.to_radians().sin(), 30f64.to_radians().cos());
        let mut b = disk(1, [0.40 + 0.1 * c, 0.40 + 0.1 * s], [-0.3, -0.4], 0.05, 0.5);

        let p0 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e0 = a.kinetic_energy() + b.kinetic_energy();
        a.resolve_collision(&mut b)?;
        let p1 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e1 = a.kinetic_energy() + b.kinetic_energy();

        assert!((p0[0] - p1[0]).abs() < 1e-12);
        assert!((p0[1] - p1[1]).abs() < 1e-12);
        assert!((e0 - e1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn point_particles_exchange_along_relative_velocity() -> Result<()> {
        let mut a = disk(0, [0.5, 0.5], [1.0, 0.0], 0.0, 1.0);
        let mut b = disk(1, [0.5, 0.5], [-1.0, 0.0], 0.0, 1.0);
        a.resolve_collision(&mut b)?;
        assert!((a.v[0] + 1.0).abs() < 1e-12 && a.v[1].abs() < 1e-12);
        assert!((b.v[0] - 1.0).abs() < 1e-12 && b.v[1].abs() < 1e-12);
        assert_eq!(a.collision_count(), 1);
        assert_eq!(b.collision_count(), 1);
        Ok(())
    }

    #[test]
    fn coincident_unequal_masses_conserve_momentum_and_energy() -> Result<()> {
        let mut a = disk(0, [0.3, 0.3], [0.6, 0.2], 0.0, 2.0);
        let mut b = disk(1, [0.3, 0.3], [-0.1, -0.5], 0.0, 0.5);
        let p0 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e0 = a.kinetic_energy() + b.kinetic_energy();
        a.resolve_collision(&mut b)?;
        let p1 = [a.momentum()[0] + b.momentum()[0], a.momentum()[1] + b.momentum()[1]];
        let e1 = a.kinetic_energy() + b.kinetic_energy();
        assert!((p0[0] - p1[0]).abs() < 1e-12);
        assert!((p0[1] - p1[1]).abs() < 1e-12);
        assert!((e0 - e1).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn coincident_centers_at_rest_rejected_without_mutation() {
        let mut a = disk(0, [0.5, 0.5], [0.2, 0.0], 0.05, 1.0);
        let mut b = disk(1, [0.5, 0.5], [0.2, 0.0], 0.05, 1.0);
        assert!(matches!(a.resolve_collision(&mut b), Err(Error::MathError(_))));
        assert_eq!(a.v, [0.2, 0.0]);
        assert_eq!(a.collision_count(), 0);
        assert_eq!(b.collision_count(), 0);
    }

    #[test]
    fn left_wall_bounce_reflects_and_counts() {
        let r = 0.05;
        let mut p = disk(0, [r, 0.5], [-1.0, 0.0], r, 1.0);
        assert_eq!(p.time_to_hit_vertical_wall(), 0.0);
        let e0 = p.kinetic_energy();
        p.resolve_wall_collision(Wall::Vertical);
        assert_eq!(p.v, [1.0, 0.0]);
        assert_eq!(p.collision_count(), 1);
        assert_eq!(p.kinetic_energy(), e0);
    }

    #[test]
    fn horizontal_wall_flips_only_vy() {
        let mut p = disk(0, [0.5, 0.9], [0.3, 0.4], 0.1, 1.0);
        p.resolve_wall_collision(Wall::Horizontal);
        assert_eq!(p.v, [0.3, -0.4]);
        assert_eq!(p.collision_count(), 1);
    }

    #[test]
    fn kinetic_energy_computed() {
        // v = (3,4), |v|^2 = 25; KE = 0.5 * 2 * 25
        let p = disk(7, [0.5, 0.5], [3.0, 4.0], 0.1, 2.0);
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
    }
}
