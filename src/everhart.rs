//! Everhart-style implicit Gauss-Radau / Gauss-Lobatto integrator.
//!
//! Odd `order` selects Gauss-Radau nodes (excluding the step's right
//! endpoint); even `order` selects Gauss-Lobatto nodes (including it). Both
//! families are handled by the same correction-sweep machinery, parameterized
//! by a node table and three transformation matrices computed once per
//! configured order.

use crate::method::IntegratorMethod;
use crate::rhs::RightHandSide;

/// Legendre polynomial `P_n(x)` by the standard three-term recurrence.
fn legendre(n: usize, x: f64) -> f64 {
    match n {
        0 => 1.0,
        1 => x,
        _ => {
            let mut p0 = 1.0;
            let mut p1 = x;
            for k in 2..=n {
                let kf = k as f64;
                let pk = ((2.0 * kf - 1.0) * x * p1 - (kf - 1.0) * p0) / kf;
                p0 = p1;
                p1 = pk;
            }
            p1
        }
    }
}

/// Derivative of `P_n` away from the singular endpoints `x = +-1`.
fn legendre_deriv(n: usize, x: f64) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let pn = legendre(n, x);
    let pn1 = legendre(n - 1, x);
    n as f64 * (x * pn - pn1) / (x * x - 1.0)
}

fn newton_root(f: &dyn Fn(f64) -> f64, x0: f64) -> f64 {
    let mut x = x0;
    for _ in 0..200 {
        let fx = f(x);
        let dfx = crate::diff::central_difference(f, x);
        if dfx.abs() < 1e-300 {
            break;
        }
        let dx = fx / dfx;
        x -= dx;
        if dx.abs() < 1e-14 {
            break;
        }
    }
    x
}

/// Find `count` roots of `f` in `(-1, 1)`, seeded from Chebyshev points.
fn roots_in_unit_interval(count: usize, f: &dyn Fn(f64) -> f64) -> Vec<f64> {
    let mut roots = Vec::with_capacity(count);
    for k in 1..=count {
        let theta = std::f64::consts::PI * k as f64 / (count as f64 + 1.0);
        let x0 = theta.cos();
        roots.push(newton_root(f, x0));
    }
    roots.sort_by(|a, b| a.partial_cmp(b).unwrap());
    roots
}

/// Node family selected by the configured order's parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Radau,
    Lobatto,
}

/// Compute the `m` stage nodes `tau[0..m)` in `(0, 1]` for `order`.
///
/// `tau[0]` always corresponds to the implicit step start, which is *not*
/// part of this table (the `f0` evaluation covers it); odd orders omit the
/// right endpoint, even orders include it as the last entry.
fn nodes_for_order(order: usize) -> (Family, usize, Vec<f64>) {
    if order % 2 == 1 {
        let m = (order - 1) / 2;
        let n = m + 1;
        let f = move |x: f64| legendre(n - 1, x) + legendre(n, x);
        let tau = roots_in_unit_interval(m, &f)
            .into_iter()
            .map(|x| (x + 1.0) / 2.0)
            .collect();
        (Family::Radau, m, tau)
    } else {
        let m = order / 2;
        let f = move |x: f64| legendre_deriv(m, x);
        let mut tau: Vec<f64> = roots_in_unit_interval(m - 1, &f)
            .into_iter()
            .map(|x| (x + 1.0) / 2.0)
            .collect();
        tau.push(1.0);
        (Family::Lobatto, m, tau)
    }
}

/// The three transformation matrices plus the reciprocal-difference table,
/// all `m x m`, computed once when the node set changes.
struct Transforms {
    c: Vec<Vec<f64>>,
    d: Vec<Vec<f64>>,
    e: Vec<Vec<f64>>,
    delta_tau: Vec<Vec<f64>>,
}

impl Transforms {
    fn build(tau: &[f64]) -> Self {
        let m = tau.len();
        let mut c = vec![vec![0.0; m]; m];
        let mut d = vec![vec![0.0; m]; m];
        let mut e = vec![vec![0.0; m]; m];
        if m > 0 {
            c[0][0] = 1.0;
            d[0][0] = 1.0;
            e[0][0] = 1.0;
            for i in 1..m {
                c[i][0] = -tau[i - 1] * c[i - 1][0];
                d[i][0] = tau[0] * d[i - 1][0];
                e[i][0] = e[i - 1][0];
                for j in 1..i {
                    c[i][j] = c[i - 1][j - 1] - tau[i - 1] * c[i - 1][j];
                    d[i][j] = d[i - 1][j - 1] + tau[j] * d[i - 1][j];
                    e[i][j] = e[i - 1][j - 1] + e[i - 1][j];
                }
                c[i][i] = 1.0;
                d[i][i] = 1.0;
                e[i][i] = 1.0;
            }
        }

        let mut delta_tau = vec![vec![0.0; m]; m];
        for i in 0..m {
            for j in 0..i {
                delta_tau[i][j] = 1.0 / (tau[i] - tau[j]);
            }
        }

        Transforms { c, d, e, delta_tau }
    }
}

/// Candidate state at node `tau_i`, Horner-summed from the top stage down,
/// written directly into `out` (a free function, not a `&self` method, so
/// callers can pass a `self` field as `out` without an aliasing conflict).
fn evaluate_candidate(y0: &[f64], h: f64, f0: &[f64], b: &[Vec<f64>], m: usize, tau_i: f64, out: &mut [f64]) {
    for d in 0..out.len() {
        let mut acc = 0.0;
        for s in (0..m).rev() {
            acc = acc * tau_i + b[s][d];
        }
        out[d] = y0[d] + tau_i * h * f0[d] + tau_i * h * acc;
    }
}

/// Configuration for an [`Everhart`] stepper.
#[derive(Debug, Clone, Copy)]
pub struct EverhartConfig {
    pub order: usize,
    pub local_error: f64,
    pub max_iterations: usize,
    pub verify_convergence: bool,
}

impl Default for EverhartConfig {
    fn default() -> Self {
        EverhartConfig {
            order: 15,
            local_error: 1e-11,
            max_iterations: 100,
            verify_convergence: true,
        }
    }
}

impl EverhartConfig {
    fn normalized(mut self) -> Self {
        self.local_error = self.local_error.max(1e-15);
        self.max_iterations = self.max_iterations.max(1);
        self
    }
}

/// Implicit Gauss-Radau / Gauss-Lobatto stepper bound to a right-hand side `R`.
pub struct Everhart<P, R: RightHandSide<P> + ?Sized> {
    config: EverhartConfig,
    family: Family,
    m: usize,
    tau: Vec<f64>,
    transforms: Transforms,

    rhs: Box<R>,

    b: Vec<Vec<f64>>,
    b_prev: Vec<Vec<f64>>,
    a: Vec<Vec<f64>>,
    f0: Vec<f64>,
    y0: Vec<f64>,
    t0: f64,
    h: f64,
    h_prev: f64,
    last_f: Vec<f64>,
    has_last_f: bool,
    first_step: bool,
    step_count: usize,

    g: Vec<f64>,
    y_trial: Vec<f64>,
    last_contribution: Vec<Vec<f64>>,
    last_final: Vec<f64>,

    _marker: std::marker::PhantomData<P>,
}

impl<P, R: RightHandSide<P> + ?Sized> Everhart<P, R> {
    pub fn new(config: EverhartConfig, rhs: Box<R>) -> Self {
        assert!(
            (2..=32).contains(&config.order),
            "everhart order must be in 2..=32, got {}",
            config.order
        );
        let config = config.normalized();
        let (family, m, tau) = nodes_for_order(config.order);
        let transforms = Transforms::build(&tau);
        Everhart {
            config,
            family,
            m,
            tau,
            transforms,
            rhs,
            b: Vec::new(),
            b_prev: Vec::new(),
            a: Vec::new(),
            f0: Vec::new(),
            y0: Vec::new(),
            t0: 0.0,
            h: 0.0,
            h_prev: 0.0,
            last_f: Vec::new(),
            has_last_f: false,
            first_step: true,
            step_count: 0,
            g: Vec::new(),
            y_trial: Vec::new(),
            last_contribution: Vec::new(),
            last_final: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    fn ensure_scratch(&mut self, n: usize) {
        if self.f0.len() != n {
            self.f0 = vec![0.0; n];
            self.y0 = vec![0.0; n];
            self.g = vec![0.0; n];
            self.y_trial = vec![0.0; n];
            self.b = vec![vec![0.0; n]; self.m];
            self.b_prev = vec![vec![0.0; n]; self.m];
            self.a = vec![vec![0.0; n]; self.m];
            self.last_contribution = vec![vec![0.0; n]; self.m];
            self.last_f = vec![0.0; n];
            self.last_final = vec![0.0; n];
        }
    }
}

impl<P, R: RightHandSide<P> + ?Sized> IntegratorMethod<P> for Everhart<P, R> {
    fn step(&mut self, t: f64, y: &[f64], h: f64, y_out: &mut [f64], parm: &P) -> bool {
        let n = y.len();
        debug_assert_eq!(y_out.len(), n);
        self.ensure_scratch(n);

        if h == 0.0 {
            y_out.copy_from_slice(y);
            return true;
        }

        self.t0 = t;
        self.y0.copy_from_slice(y);
        self.h = h;

        // 1. Prediction: warm-start b from the previous step's coefficients.
        if !self.first_step {
            let r = h / self.h_prev;
            let mut q = 1.0;
            for s in 0..self.m {
                q *= r;
                for d in 0..n {
                    let mut p = 0.0;
                    for mm in s..self.m {
                        p += self.transforms.e[mm][s] * self.b_prev[mm][d];
                    }
                    let contribution = q * p / (s as f64 + 2.0);
                    self.b[s][d] = self.b[s][d] - self.last_contribution[s][d] + contribution;
                    self.last_contribution[s][d] = contribution;
                }
            }
        } else {
            for s in 0..self.m {
                for d in 0..n {
                    self.b[s][d] = 0.0;
                    self.last_contribution[s][d] = 0.0;
                }
            }
        }

        // 2. B -> A conversion.
        for s in 0..self.m {
            for d in 0..n {
                let mut acc = 0.0;
                for mm in s..self.m {
                    acc += self.transforms.d[mm][s] * self.b[mm][d];
                }
                self.a[s][d] = acc;
            }
        }

        // 3. Initial derivative.
        let reuse_fsal = self.family == Family::Lobatto && !self.first_step && self.has_last_f;
        if reuse_fsal {
            self.f0.copy_from_slice(&self.last_f);
        } else if !self.rhs.eval(t, y, &mut self.f0, parm) {
            log::debug!("everhart: rhs rejected f0 at t={t}");
            return false;
        }

        // 4. Iteration loop.
        let mut converged = false;
        let mut iterations_run = 0;
        for iter in 0..self.config.max_iterations {
            iterations_run = iter + 1;
            for i in 0..self.m {
                let tau_i = self.tau[i];
                evaluate_candidate(&self.y0, self.h, &self.f0, &self.b, self.m, tau_i, &mut self.y_trial);

                let stage_t = t + tau_i * h;
                if !self.rhs.eval(stage_t, &self.y_trial, &mut self.g, parm) {
                    log::debug!("everhart: rhs rejected stage {i} at t={stage_t}");
                    return false;
                }

                if i == self.m - 1 && self.family == Family::Lobatto {
                    self.last_f.copy_from_slice(&self.g);
                    self.has_last_f = true;
                }

                for d in 0..n {
                    let mut p = (self.g[d] - self.f0[d]) / tau_i;
                    for j in 0..i {
                        p = self.transforms.delta_tau[i][j] * (p - self.a[j][d]);
                    }
                    let delta = p - self.a[i][d];
                    for j in 0..=i {
                        self.b[j][d] += self.transforms.c[i][j] * delta;
                    }
                    self.a[i][d] = p;
                }

                if i == self.m - 1 {
                    if iter > 0 {
                        let mut within = true;
                        for d in 0..n {
                            let tol = self.config.local_error * (self.y_trial[d].abs() + 1e-15);
                            if (self.y_trial[d] - self.last_final[d]).abs() > tol {
                                within = false;
                                break;
                            }
                        }
                        converged = within;
                    }
                    self.last_final.copy_from_slice(&self.y_trial);
                }
            }
            if converged {
                break;
            }
        }

        if !converged && self.config.verify_convergence {
            log::warn!(
                "everhart: step at t={t} did not converge within {} iterations (local_error={})",
                iterations_run,
                self.config.local_error
            );
            return false;
        }

        // 5. Result assembly.
        match self.family {
            Family::Radau => {
                evaluate_candidate(&self.y0, self.h, &self.f0, &self.b, self.m, 1.0, y_out);
            }
            Family::Lobatto => {
                y_out.copy_from_slice(&self.last_final);
            }
        }

        // 6. State carry: snapshot b for next step's prediction. The warm-start
        // "last" terms reset to zero since they describe a correction already
        // folded into the b values just saved, not a carry-forward quantity.
        self.b_prev.clone_from(&self.b);
        for row in &mut self.last_contribution {
            row.iter_mut().for_each(|v| *v = 0.0);
        }

        self.h_prev = h;
        self.step_count += 1;
        self.first_step = false;

        true
    }

    fn interpolate(&self, t_star: f64, y_out: &mut [f64]) -> bool {
        if self.h == 0.0 {
            return false;
        }
        let tau = (t_star - self.t0) / self.h;
        if !(0.0..=1.0).contains(&tau) {
            return false;
        }
        let n = y_out.len();
        if self.f0.len() != n {
            return false;
        }
        evaluate_candidate(&self.y0, self.h, &self.f0, &self.b, self.m, tau, y_out);
        true
    }

    fn supports_interpolation(&self) -> bool {
        true
    }

    fn initialize(&mut self) {
        for row in &mut self.b {
            row.iter_mut().for_each(|v| *v = 0.0);
        }
        for row in &mut self.b_prev {
            row.iter_mut().for_each(|v| *v = 0.0);
        }
        for row in &mut self.a {
            row.iter_mut().for_each(|v| *v = 0.0);
        }
        for row in &mut self.last_contribution {
            row.iter_mut().for_each(|v| *v = 0.0);
        }
        self.f0.iter_mut().for_each(|v| *v = 0.0);
        self.y0.iter_mut().for_each(|v| *v = 0.0);
        self.last_f.iter_mut().for_each(|v| *v = 0.0);
        self.has_last_f = false;
        self.first_step = true;
        self.step_count = 0;
        self.h = 0.0;
        self.h_prev = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rhs_constant_rate(rate: f64) -> Box<dyn RightHandSide<()>> {
        Box::new(move |_t: f64, _y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = rate;
            true
        })
    }

    fn rhs_exponential() -> Box<dyn RightHandSide<()>> {
        Box::new(|_t: f64, y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = y[0];
            true
        })
    }

    #[test]
    fn exponential_growth_converges_to_high_precision() {
        // dy/dt = y, y(0) = 1; this is the one test whose stage differences
        // are never zero, so it actually exercises the b/a correction sweep
        // and the C/D/E transform matrices instead of collapsing to y0+h*f0.
        let mut step = Everhart::new(EverhartConfig { order: 15, ..Default::default() }, rhs_exponential());
        step.initialize();
        let y = [1.0];
        let mut out = [0.0];
        assert!(step.step(0.0, &y, 1.0, &mut out, &()));
        assert!((out[0] - std::f64::consts::E).abs() < 1e-12, "got {}", out[0]);

        let mut mid = [0.0];
        assert!(step.interpolate(0.5, &mut mid));
        assert!((mid[0] - std::f64::consts::E.sqrt()).abs() < 1e-8, "got {}", mid[0]);
    }

    #[test]
    fn radau_order_covers_linear_growth_exactly() {
        let mut step = Everhart::new(EverhartConfig { order: 7, ..Default::default() }, rhs_constant_rate(3.0));
        step.initialize();
        let y = [1.0];
        let mut out = [0.0];
        assert!(step.step(0.0, &y, 0.2, &mut out, &()));
        assert!((out[0] - 1.6).abs() < 1e-8, "got {}", out[0]);
    }

    #[test]
    fn lobatto_order_covers_linear_growth_exactly() {
        let mut step = Everhart::new(EverhartConfig { order: 8, ..Default::default() }, rhs_constant_rate(-2.0));
        step.initialize();
        let y = [5.0];
        let mut out = [0.0];
        assert!(step.step(0.0, &y, 0.5, &mut out, &()));
        assert!((out[0] - 4.0).abs() < 1e-8, "got {}", out[0]);
    }

    #[test]
    fn zero_step_copies_state() {
        let mut step = Everhart::new(EverhartConfig::default(), rhs_constant_rate(1.0));
        let y = [9.0];
        let mut out = [0.0];
        assert!(step.step(0.0, &y, 0.0, &mut out, &()));
        assert_eq!(out[0], 9.0);
    }

    #[test]
    fn rhs_failure_propagates() {
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|t: f64, _y: &[f64], _f: &mut [f64], _p: &()| t < 1000.0);
        let mut step = Everhart::new(EverhartConfig { order: 5, ..Default::default() }, rhs);
        let y = [1.0];
        let mut out = [0.0];
        assert!(!step.step(10_000.0, &y, 1.0, &mut out, &()));
    }

    #[test]
    fn construction_rejects_order_out_of_range() {
        let result = std::panic::catch_unwind(|| {
            Everhart::new(EverhartConfig { order: 1, ..Default::default() }, rhs_constant_rate(1.0))
        });
        assert!(result.is_err());
    }

    #[test]
    fn interpolate_matches_endpoint_at_tau_one() {
        let mut step = Everhart::new(EverhartConfig { order: 9, ..Default::default() }, rhs_constant_rate(4.0));
        step.initialize();
        let y = [0.0];
        let mut out = [0.0];
        step.step(0.0, &y, 0.3, &mut out, &());
        let mut mid = [0.0];
        assert!(step.interpolate(0.3, &mut mid));
        assert!((mid[0] - out[0]).abs() < 1e-8);
    }

    #[test]
    fn node_tables_have_expected_stage_counts() {
        let (_family, m, tau) = nodes_for_order(15);
        assert_eq!(m, 7);
        assert_eq!(tau.len(), 7);
        for t in &tau {
            assert!(*t > 0.0 && *t <= 1.0);
        }
        let (_family, m, tau) = nodes_for_order(8);
        assert_eq!(m, 4);
        assert!((tau[tau.len() - 1] - 1.0).abs() < 1e-12);
    }
}
