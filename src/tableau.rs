//! Generic explicit Runge-Kutta stepper driven by a Butcher tableau.
//!
//! Every classical scheme in [`crate::schemes`] is just a `Tableau` value;
//! this module holds the one stage-scheduling loop they all share.

use crate::method::IntegratorMethod;
use crate::rhs::RightHandSide;

/// A Butcher tableau (c, A, b) for an `s`-stage explicit Runge-Kutta scheme.
///
/// `a` is the strictly lower-triangular stage matrix flattened row-major:
/// row `i` (0-indexed, `i >= 1`) occupies `a[i*(i-1)/2 .. i*(i-1)/2 + i]`.
/// `c` holds the abscissae for stages `2..=s` (length `s - 1`); stage 0
/// always starts at `c = 0` implicitly.
#[derive(Debug, Clone)]
pub struct Tableau {
    pub stages: usize,
    pub c: Vec<f64>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl Tableau {
    pub fn new(stages: usize, c: Vec<f64>, a: Vec<f64>, b: Vec<f64>) -> Self {
        Tableau { stages, c, a, b }
    }

    fn check_dimensions(&self) {
        debug_assert_eq!(self.c.len(), self.stages.saturating_sub(1));
        debug_assert_eq!(self.b.len(), self.stages);
        debug_assert_eq!(self.a.len(), self.stages * self.stages.saturating_sub(1) / 2);
    }

    /// Offset of row `i`'s first entry in the flattened `a` array.
    fn row_offset(i: usize) -> usize {
        i * (i - 1) / 2
    }
}

/// A ready-to-step explicit RK method bound to a fixed [`Tableau`] and a
/// right-hand side `R`.
///
/// Owns its stage-derivative scratch (`s` vectors of length `n`), allocated
/// lazily on the first call and reused across every subsequent step.
pub struct RungeKutta<P, R: RightHandSide<P> + ?Sized> {
    tableau: Tableau,
    rhs: Box<R>,
    k: Vec<Vec<f64>>,
    y_stage: Vec<f64>,
    _marker: std::marker::PhantomData<P>,
}

impl<P, R: RightHandSide<P> + ?Sized> RungeKutta<P, R> {
    pub fn new(tableau: Tableau, rhs: Box<R>) -> Self {
        tableau.check_dimensions();
        RungeKutta {
            tableau,
            rhs,
            k: Vec::new(),
            y_stage: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    fn ensure_scratch(&mut self, n: usize) {
        if self.k.len() != self.tableau.stages || self.k.first().map(|v| v.len()) != Some(n) {
            self.k = vec![vec![0.0; n]; self.tableau.stages];
            self.y_stage = vec![0.0; n];
        }
    }
}

impl<P, R: RightHandSide<P> + ?Sized> IntegratorMethod<P> for RungeKutta<P, R> {
    fn step(&mut self, t: f64, y: &[f64], h: f64, y_out: &mut [f64], parm: &P) -> bool {
        let n = y.len();
        debug_assert_eq!(y_out.len(), n);
        self.ensure_scratch(n);

        if h == 0.0 {
            y_out.copy_from_slice(y);
            return true;
        }

        let stages = self.tableau.stages;

        if !self.rhs.eval(t, y, &mut self.k[0], parm) {
            log::debug!("runge-kutta: rhs rejected stage 0 at t={t}");
            return false;
        }

        for i in 1..stages {
            let row = Tableau::row_offset(i);
            for d in 0..n {
                let mut acc = y[d];
                for j in 0..i {
                    let coeff = self.tableau.a[row + j];
                    if coeff != 0.0 {
                        acc += h * coeff * self.k[j][d];
                    }
                }
                self.y_stage[d] = acc;
            }
            let stage_t = t + self.tableau.c[i - 1] * h;
            if !self.rhs.eval(stage_t, &self.y_stage, &mut self.k[i], parm) {
                log::debug!("runge-kutta: rhs rejected stage {i} at t={stage_t}");
                return false;
            }
        }

        for d in 0..n {
            let mut acc = y[d];
            for (s, coeff) in self.tableau.b.iter().enumerate() {
                if *coeff != 0.0 {
                    acc += h * coeff * self.k[s][d];
                }
            }
            y_out[d] = acc;
        }

        true
    }

    fn initialize(&mut self) {
        for row in &mut self.k {
            row.iter_mut().for_each(|v| *v = 0.0);
        }
    }
}
