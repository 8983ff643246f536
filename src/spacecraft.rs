//! Perturbed two-body orbital dynamics: a worked example right-hand side
//! plugging straight into [`crate::driver`] with no adapter, generalized
//! from the teacher's pairwise point-mass gravity into a single perturbed
//! central field.

use crate::rhs::RightHandSide;

/// Earth's gravitational parameter, m^3/s^2.
pub const GM_EARTH: f64 = 3.986004418e14;
/// Earth's mean equatorial radius, m.
pub const EARTH_RADIUS: f64 = 6.378137e6;
/// Earth's second zonal harmonic (oblateness) coefficient.
pub const J2_EARTH: f64 = 1.08262668e-3;
/// Earth's rotation rate, rad/s.
pub const OMEGA_EARTH: f64 = 7.292115e-5;

/// Force-model constants and spacecraft physical properties for
/// [`spacecraft_dynamics`].
#[derive(Debug, Clone, Copy)]
pub struct SpacecraftParams {
    /// Drag coefficient (dimensionless, typically 2.0-2.2).
    pub drag_coefficient: f64,
    /// Cross-sectional area exposed to the atmosphere, m^2.
    pub area: f64,
    /// Spacecraft mass, kg.
    pub mass: f64,
    /// Atmospheric density at the reference altitude, kg/m^3.
    pub rho0: f64,
    /// Reference altitude for the exponential atmosphere model, m.
    pub reference_altitude: f64,
    /// Atmospheric scale height, m.
    pub scale_height: f64,
    /// Set true to disable the J2 correction entirely.
    pub disable_j2: bool,
}

impl Default for SpacecraftParams {
    fn default() -> Self {
        SpacecraftParams {
            drag_coefficient: 2.2,
            area: 10.0,
            mass: 500.0,
            rho0: 3.614e-13,
            reference_altitude: 700_000.0,
            scale_height: 88_667.0,
            disable_j2: false,
        }
    }
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(v: [f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Two-body + J2 + exponential-drag right-hand side over state
/// `[x, y, z, vx, vy, vz]`.
pub fn spacecraft_dynamics(_t: f64, y: &[f64], f_out: &mut [f64], parm: &SpacecraftParams) -> bool {
    if y.len() != 6 || f_out.len() != 6 {
        return false;
    }

    let pos = [y[0], y[1], y[2]];
    let vel = [y[3], y[4], y[5]];
    let r = norm(pos);
    if r <= 0.0 {
        return false;
    }

    // Two-body point-mass gravity.
    let mu_over_r3 = GM_EARTH / (r * r * r);
    let mut accel = [-mu_over_r3 * pos[0], -mu_over_r3 * pos[1], -mu_over_r3 * pos[2]];

    // J2 zonal-harmonic correction, the dominant oblateness term.
    if !parm.disable_j2 {
        let z2_over_r2 = (pos[2] * pos[2]) / (r * r);
        let factor = 1.5 * J2_EARTH * GM_EARTH * (EARTH_RADIUS * EARTH_RADIUS) / (r * r * r * r * r);
        accel[0] += factor * pos[0] * (5.0 * z2_over_r2 - 1.0);
        accel[1] += factor * pos[1] * (5.0 * z2_over_r2 - 1.0);
        accel[2] += factor * pos[2] * (5.0 * z2_over_r2 - 3.0);
    }

    // Exponential-atmosphere drag, relative to the co-rotating atmosphere.
    let omega = [0.0, 0.0, OMEGA_EARTH];
    let atmosphere_velocity = cross(omega, pos);
    let v_rel = [
        vel[0] - atmosphere_velocity[0],
        vel[1] - atmosphere_velocity[1],
        vel[2] - atmosphere_velocity[2],
    ];
    let v_rel_mag = norm(v_rel);
    if v_rel_mag > 0.0 && parm.drag_coefficient > 0.0 {
        let altitude = r - EARTH_RADIUS;
        let rho = parm.rho0 * (-(altitude - parm.reference_altitude) / parm.scale_height).exp();
        let drag_factor = -0.5 * parm.drag_coefficient * (parm.area / parm.mass) * rho * v_rel_mag;
        accel[0] += drag_factor * v_rel[0];
        accel[1] += drag_factor * v_rel[1];
        accel[2] += drag_factor * v_rel[2];
    }

    f_out[0] = vel[0];
    f_out[1] = vel[1];
    f_out[2] = vel[2];
    f_out[3] = accel[0];
    f_out[4] = accel[1];
    f_out[5] = accel[2];
    true
}

/// A [`RightHandSide`] wrapper so [`spacecraft_dynamics`] can be handed
/// straight to a [`crate::method::MethodHandle`] factory.
pub struct SpacecraftRhs;

impl RightHandSide<SpacecraftParams> for SpacecraftRhs {
    fn eval(&self, t: f64, y: &[f64], f_out: &mut [f64], parm: &SpacecraftParams) -> bool {
        spacecraft_dynamics(t, y, f_out, parm)
    }
}

/// Two-body specific mechanical energy, `v^2/2 - mu/r`, ignoring
/// perturbations; used to check conservation with drag disabled.
pub fn specific_energy(y: &[f64]) -> f64 {
    let pos = [y[0], y[1], y[2]];
    let vel = [y[3], y[4], y[5]];
    let r = norm(pos);
    let v2 = vel[0] * vel[0] + vel[1] * vel[1] + vel[2] * vel[2];
    0.5 * v2 - GM_EARTH / r
}

/// Initial state for a circular orbit of radius `r` in the xy-plane.
pub fn circular_orbit_state(r: f64) -> [f64; 6] {
    let v = (GM_EARTH / r).sqrt();
    [r, 0.0, 0.0, 0.0, v, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_has_zero_radial_velocity() {
        let y = circular_orbit_state(EARTH_RADIUS + 500_000.0);
        assert_eq!(y[1], 0.0);
        assert_eq!(y[3], 0.0);
    }

    #[test]
    fn gravity_only_acceleration_points_toward_earth() {
        let params = SpacecraftParams {
            drag_coefficient: 0.0,
            disable_j2: true,
            ..Default::default()
        };
        let y = circular_orbit_state(EARTH_RADIUS + 500_000.0);
        let mut f = [0.0; 6];
        assert!(spacecraft_dynamics(0.0, &y, &mut f, &params));
        assert!(f[3] < 0.0);
        assert_eq!(f[4], 0.0);
        assert_eq!(f[5], 0.0);
    }

    #[test]
    fn rejects_wrong_dimensional_state() {
        let params = SpacecraftParams::default();
        let y = [1.0, 2.0, 3.0];
        let mut f = [0.0; 6];
        assert!(!spacecraft_dynamics(0.0, &y, &mut f, &params));
    }

    #[test]
    fn zero_drag_conserves_specific_energy_over_one_orbit() {
        use crate::driver::solve;
        use crate::method::IntegratorMethod;
        use crate::schemes::rk4_classical;
        use crate::tableau::RungeKutta;

        let params = SpacecraftParams {
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let r0 = EARTH_RADIUS + 500_000.0;
        let y0 = circular_orbit_state(r0);
        let period = 2.0 * std::f64::consts::PI * (r0 * r0 * r0 / GM_EARTH).sqrt();
        let steps = 2000;
        let h = period / steps as f64;

        let mut method = RungeKutta::new(rk4_classical(), Box::new(SpacecraftRhs));
        method.initialize();
        let trajectory = solve(&mut method, "spacecraft-rk4", 0.0, &y0, h, steps, &params).unwrap();

        let e0 = specific_energy(&y0);
        let e_final = specific_energy(trajectory.last().unwrap());
        assert!((e_final - e0).abs() / e0.abs() < 1e-6);
    }
}
