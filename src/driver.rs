//! Trajectory driver: turns a stepper's boolean step/interpolate contract
//! into typed, logged runs over a fixed grid.

use crate::error::IntegrationError;
use crate::method::IntegratorMethod;

/// Integrate `steps` fixed-size steps of `h` starting from `(t0, y0)`.
///
/// Returns `steps + 1` state vectors, `y0` included and never mutated or
/// aliased by the result.
pub fn solve<P>(
    method: &mut dyn IntegratorMethod<P>,
    label: &str,
    t0: f64,
    y0: &[f64],
    h: f64,
    steps: usize,
    parm: &P,
) -> Result<Vec<Vec<f64>>, IntegrationError> {
    log::info!("solve[{label}]: starting {steps} steps of h={h} from t={t0}");

    let n = y0.len();
    let mut out = Vec::with_capacity(steps + 1);
    out.push(y0.to_vec());

    let mut t = t0;
    let mut y = y0.to_vec();
    let mut y_next = vec![0.0; n];

    for step in 0..steps {
        if !method.step(t, &y, h, &mut y_next, parm) {
            log::info!("solve[{label}]: failed at step {step}");
            return Err(IntegrationError::RhsFailed { step });
        }
        log::debug!("solve[{label}]: step {step} -> t={}", t + h);
        y.copy_from_slice(&y_next);
        out.push(y.clone());
        t += h;
    }

    log::info!("solve[{label}]: finished {steps} steps");
    Ok(out)
}

/// Like [`solve`], but samples `k` interior interpolation points per step
/// from a method that supports dense output, in addition to each step's
/// end-state.
///
/// Methods that report `supports_interpolation() == false` silently emit no
/// interior samples for that step; the method-façade flag
/// (`MethodHandle::supports_interpolation`) tells the caller in advance
/// whether this variant is worth choosing over plain [`solve`].
pub fn solve_with_interpolation<P>(
    method: &mut dyn IntegratorMethod<P>,
    label: &str,
    t0: f64,
    y0: &[f64],
    h: f64,
    steps: usize,
    k: usize,
    parm: &P,
) -> Result<Vec<Vec<f64>>, IntegrationError> {
    log::info!("solve_with_interpolation[{label}]: starting {steps} steps of h={h}, k={k} samples");

    let n = y0.len();
    let mut out = Vec::with_capacity(steps * (k + 1) + 1);
    out.push(y0.to_vec());

    let mut t = t0;
    let mut y = y0.to_vec();
    let mut y_next = vec![0.0; n];
    let mut y_sample = vec![0.0; n];

    for step in 0..steps {
        if !method.step(t, &y, h, &mut y_next, parm) {
            log::info!("solve_with_interpolation[{label}]: failed at step {step}");
            return Err(IntegrationError::RhsFailed { step });
        }
        log::debug!("solve_with_interpolation[{label}]: step {step} -> t={}", t + h);

        if method.supports_interpolation() {
            for j in 1..=k {
                let t_star = t + (j as f64) * h / (k as f64 + 1.0);
                if method.interpolate(t_star, &mut y_sample) {
                    out.push(y_sample.clone());
                }
            }
        }

        y.copy_from_slice(&y_next);
        out.push(y.clone());
        t += h;
    }

    log::info!("solve_with_interpolation[{label}]: finished {steps} steps");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rhs::RightHandSide;
    use crate::schemes::rk4_classical;
    use crate::tableau::RungeKutta;

    #[test]
    fn solve_emits_steps_plus_one_states() {
        let tableau = rk4_classical();
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|t: f64, _y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = t.cos();
            true
        });
        let mut method = RungeKutta::new(tableau.clone(), rhs);
        method.initialize();
        let h = 2.0 * std::f64::consts::PI / 180.0;
        let result = solve(&mut method, "rk4", 0.0, &[0.0], h, 180, &()).unwrap();
        assert_eq!(result.len(), 181);
        assert!(result.last().unwrap()[0].abs() < 1e-6);
    }

    #[test]
    fn zero_steps_returns_only_initial_condition() {
        let tableau = rk4_classical();
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|_t: f64, _y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = 1.0;
            true
        });
        let mut method = RungeKutta::new(tableau.clone(), rhs);
        method.initialize();
        let result = solve(&mut method, "rk4", 0.0, &[3.0], 0.1, 0, &()).unwrap();
        assert_eq!(result, vec![vec![3.0]]);
    }

    #[test]
    fn rhs_failure_surfaces_failing_step_index() {
        let tableau = rk4_classical();
        let rhs: Box<dyn RightHandSide<()>> =
            Box::new(|t: f64, _y: &[f64], _f: &mut [f64], _p: &()| t < 0.25);
        let mut method = RungeKutta::new(tableau.clone(), rhs);
        method.initialize();
        let err = solve(&mut method, "rk4", 0.0, &[1.0], 0.1, 10, &()).unwrap_err();
        assert_eq!(err, IntegrationError::RhsFailed { step: 2 });
    }

    #[test]
    fn initial_condition_is_copied_not_retained() {
        let tableau = rk4_classical();
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|_t: f64, _y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = 1.0;
            true
        });
        let mut method = RungeKutta::new(tableau.clone(), rhs);
        method.initialize();
        let y0 = [2.0];
        let result = solve(&mut method, "rk4", 0.0, &y0, 0.1, 3, &()).unwrap();
        assert_eq!(y0[0], 2.0);
        assert_eq!(result[0][0], 2.0);
    }

    #[test]
    fn interpolation_variant_length_matches_steps_times_k_plus_one() {
        use crate::everhart::{Everhart, EverhartConfig};
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|_t: f64, y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = y[0];
            true
        });
        let mut method = Everhart::new(EverhartConfig { order: 15, ..Default::default() }, rhs);
        method.initialize();
        let result = solve_with_interpolation(&mut method, "everhart15", 0.0, &[1.0], 0.1, 10, 3, &()).unwrap();
        assert_eq!(result.len(), 10 * 4 + 1);
    }
}
