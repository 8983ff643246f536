//! Dormand-Prince 8(5,3) explicit stepper: 13 stages, order 8, FSAL reuse,
//! and an optional 5th-order error norm for callers that want one. No
//! adaptive step-size controller is wired up on top of that norm here.

use crate::method::IntegratorMethod;
use crate::rhs::RightHandSide;

const STAGES: usize = 13;

#[rustfmt::skip]
const C: [f64; 12] = [
    5.26001519587677318785587544488e-2,
    7.89002279381515978178381316732e-2,
    1.18350341907227396726757197510e-1,
    2.81649658092772603273242802490e-1,
    1.0 / 3.0,
    0.25,
    3.07692307692307692307692307692e-1,
    6.51282051282051282051282051282e-1,
    0.6,
    8.57142857142857142857142857142e-1,
    1.0,
    1.0,
];

/// Strictly lower-triangular stage matrix, flattened row-major; row i
/// (0-indexed, i >= 1) has i entries, for i = 1..=12.
#[rustfmt::skip]
const A: [f64; 78] = [
    5.26001519587677318785587544488e-2,

    1.97250569845378994544595329183e-2, 5.91751709536136983633785987549e-2,

    2.95875854768068491816892993775e-2, 0.0, 8.87627564304205475450678981324e-2,

    2.41365134159266685502369798665e-1, 0.0, -8.84549479328286085344864962717e-1, 9.24834003261792003115737966543e-1,

    3.7037037037037037037037037037e-2, 0.0, 0.0, 1.70828608729473871279604482173e-1, 1.25467687566822425016691814123e-1,

    3.7109375e-2, 0.0, 0.0, 1.70252211019544039314978060272e-1, 6.02165389804559606850219397283e-2, -1.7578125e-2,

    3.70920001185047927108779319836e-2, 0.0, 0.0, 1.70383925712239993810214054705e-1, 1.07262030446373284651809199168e-1, -1.53194377486244017527936158236e-2, 8.27378916381402288758473766002e-3,

    6.24110958716075717114429577812e-1, 0.0, 0.0, -3.36089262944694129406857109825, -8.68219346841726006818189891453e-1, 2.75920996994467083049415600797e1, 2.01540675504778934086186788979e1, -4.34898841810699588477366255144e1,

    4.77662536438264365890433908527e-1, 0.0, 0.0, -2.48811461997166764192642586468, -5.90290826836842996371446475743e-1, 2.12300514481811942347288949897e1, 1.52792336328824235832596922938e1, -3.32882109689848629194453265587e1, -2.03312017085086261358222928593e-2,

    -9.3714243008598732571704021658e-1, 0.0, 0.0, 5.18637242884406370830023853209, 1.09143734899672957818500254654, -8.14978701074692612513997267357, -1.85200656599969598641566180701e1, 2.27394870993505042818970056734e1, 2.49360555267965238987089396762, -3.0467644718982195003823669022,

    2.27331014751653820792359768449, 0.0, 0.0, -1.05344954667372501984066689879e1, -2.00087205822486249909675718444, -1.79589318631187989172765950534e1, 2.79488845294199600508499808837e1, -2.85899827713502369474065508674, -8.87285693353062954433549289258, 1.23605671757943030647266201528e1, 6.43392746015763530355970484046e-1,

    5.42937341165687622380535766363e-2, 0.0, 0.0, 0.0, 0.0, 4.45031289275240888144113950566, 1.89151789931450038304281599044, -5.8012039600105847814672114227, 3.1116436695781989440891606237e-1, -1.52160949662516078556178806805e-1, 2.01365400804030348374776537501e-1, 4.47106157277725905176885569043e-2,
];

#[rustfmt::skip]
const B: [f64; STAGES] = [
    5.42937341165687622380535766363e-2,
    0.0, 0.0, 0.0, 0.0,
    4.45031289275240888144113950566,
    1.89151789931450038304281599044,
    -5.8012039600105847814672114227,
    3.1116436695781989440891606237e-1,
    -1.52160949662516078556178806805e-1,
    2.01365400804030348374776537501e-1,
    4.47106157277725905176885569043e-2,
    0.0,
];

/// Weight differences `b - bhat5` for the embedded 5th-order error norm.
#[rustfmt::skip]
const E5: [f64; STAGES] = [
    1.312004499419488073250102996e-2,
    0.0, 0.0, 0.0, 0.0,
    -1.225156446376204440720569753,
    -4.957589496572501915214079952e-1,
    1.664377182454986536961530415,
    -3.50328848749973681688648729e-1,
    3.341791187130174790297318841e-1,
    8.192320648511571246570742613e-2,
    -2.235530786388629525884427845e-2,
    0.0,
];

fn row_offset(i: usize) -> usize {
    i * (i - 1) / 2
}

/// Dormand-Prince 8(5,3) stepper bound to a right-hand side `R`.
pub struct DormandPrince8<P, R: RightHandSide<P> + ?Sized> {
    rhs: Box<R>,
    k: Vec<Vec<f64>>,
    y_stage: Vec<f64>,
    fsal: Option<Vec<f64>>,
    last_error_norm: Option<f64>,
    _marker: std::marker::PhantomData<P>,
}

impl<P, R: RightHandSide<P> + ?Sized> DormandPrince8<P, R> {
    pub fn new(rhs: Box<R>) -> Self {
        DormandPrince8 {
            rhs,
            k: Vec::new(),
            y_stage: Vec::new(),
            fsal: None,
            last_error_norm: None,
            _marker: std::marker::PhantomData,
        }
    }

    fn ensure_scratch(&mut self, n: usize) {
        if self.k.len() != STAGES || self.k.first().map(|v| v.len()) != Some(n) {
            self.k = vec![vec![0.0; n]; STAGES];
            self.y_stage = vec![0.0; n];
        }
    }

    /// 5th-order error norm from the most recently completed step, if the
    /// caller wants to build their own step-size controller on top.
    pub fn last_error_norm(&self) -> Option<f64> {
        self.last_error_norm
    }
}

impl<P, R: RightHandSide<P> + ?Sized> IntegratorMethod<P> for DormandPrince8<P, R> {
    fn step(&mut self, t: f64, y: &[f64], h: f64, y_out: &mut [f64], parm: &P) -> bool {
        let n = y.len();
        debug_assert_eq!(y_out.len(), n);
        self.ensure_scratch(n);

        if h == 0.0 {
            y_out.copy_from_slice(y);
            return true;
        }

        let fsal_valid = self
            .fsal
            .as_ref()
            .map(|f| f.len() == n)
            .unwrap_or(false);

        if fsal_valid {
            let fsal = self.fsal.take().unwrap();
            self.k[0].copy_from_slice(&fsal);
        } else if !self.rhs.eval(t, y, &mut self.k[0], parm) {
            log::debug!("dopri8: rhs rejected stage 0 at t={t}");
            return false;
        }

        for i in 1..STAGES {
            let row = row_offset(i);
            for d in 0..n {
                let mut acc = y[d];
                for j in 0..i {
                    let coeff = A[row + j];
                    if coeff != 0.0 {
                        acc += h * coeff * self.k[j][d];
                    }
                }
                self.y_stage[d] = acc;
            }
            let stage_t = t + C[i - 1] * h;
            if !self.rhs.eval(stage_t, &self.y_stage, &mut self.k[i], parm) {
                log::debug!("dopri8: rhs rejected stage {i} at t={stage_t}");
                return false;
            }
        }

        for d in 0..n {
            let mut acc = y[d];
            for (s, coeff) in B.iter().enumerate() {
                if *coeff != 0.0 {
                    acc += h * coeff * self.k[s][d];
                }
            }
            y_out[d] = acc;
        }

        let mut err_sq = 0.0;
        for d in 0..n {
            let mut e = 0.0;
            for (s, coeff) in E5.iter().enumerate() {
                if *coeff != 0.0 {
                    e += coeff * self.k[s][d];
                }
            }
            e *= h;
            err_sq += e * e;
        }
        self.last_error_norm = Some((err_sq / n as f64).sqrt());

        self.fsal = Some(self.k[STAGES - 1].clone());

        true
    }

    fn initialize(&mut self) {
        self.fsal = None;
        self.last_error_norm = None;
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

    #[test]
    fn linear_growth_is_exact() {
        let mut step = DormandPrince8::new(rhs_constant_rate(2.0));
        let y = [1.0];
        let mut out = [0.0];
        step.step(0.0, &y, 0.5, &mut out, &());
        assert!((out[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn zero_step_copies_state() {
        let mut step = DormandPrince8::new(rhs_constant_rate(2.0));
        let y = [7.0];
        let mut out = [0.0];
        assert!(step.step(0.0, &y, 0.0, &mut out, &()));
        assert_eq!(out[0], 7.0);
    }

    #[test]
    fn reset_clears_fsal_cache() {
        let mut step = DormandPrince8::new(rhs_constant_rate(1.0));
        let y = [0.0];
        let mut out = [0.0];
        step.step(0.0, &y, 0.1, &mut out, &());
        assert!(step.fsal.is_some());
        step.initialize();
        assert!(step.fsal.is_none());
    }

    #[test]
    fn rhs_failure_propagates() {
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|t: f64, _y: &[f64], _f: &mut [f64], _p: &()| t < 100.0);
        let mut step = DormandPrince8::new(rhs);
        let y = [1.0];
        let mut out = [0.0];
        assert!(!step.step(1000.0, &y, 1.0, &mut out, &()));
    }

    #[test]
    fn error_norm_is_small_for_smooth_problem() {
        // dy/dt = cos(t)*cos(10t) - 10*sin(t)*sin(10t), y(0) = 0
        let rhs: Box<dyn RightHandSide<()>> = Box::new(|t: f64, _y: &[f64], f: &mut [f64], _p: &()| {
            f[0] = t.cos() * (10.0 * t).cos() - 10.0 * t.sin() * (10.0 * t).sin();
            true
        });
        let mut step = DormandPrince8::new(rhs);
        step.initialize();
        let mut t = 0.0;
        let mut y = [0.0];
        let h = 2.0 * std::f64::consts::PI / 180.0;
        let mut out = [0.0];
        let mut max_err: f64 = 0.0;
        for _ in 0..180 {
            step.step(t, &y, h, &mut out, &());
            y[0] = out[0];
            t += h;
            let exact = t.sin() * (10.0 * t).cos();
            max_err = max_err.max((y[0] - exact).abs());
        }
        assert!(max_err < 1e-8, "max error {max_err}");
    }
}
