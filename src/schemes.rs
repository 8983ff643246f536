//! Catalog of classical explicit Runge-Kutta tableaux.
//!
//! Each function returns a fresh [`Tableau`] value; schemes are data, not
//! types, so adding one means adding a function here and a
//! [`crate::method::MethodHandle`] entry in [`crate::catalog`].

use crate::tableau::Tableau;

/// Explicit Euler, 1 stage, order 1.
pub fn euler() -> Tableau {
    Tableau::new(1, vec![], vec![], vec![1.0])
}

/// Heun's method (explicit trapezoid rule), 2 stages, order 2.
pub fn heun_trapezoid() -> Tableau {
    Tableau::new(2, vec![1.0], vec![1.0], vec![0.5, 0.5])
}

/// Explicit midpoint method, 2 stages, order 2.
pub fn explicit_midpoint() -> Tableau {
    Tableau::new(2, vec![0.5], vec![0.5], vec![0.0, 1.0])
}

/// Kutta's classical third-order method, 3 stages, order 3.
pub fn rk3_kutta() -> Tableau {
    Tableau::new(
        3,
        vec![0.5, 1.0],
        vec![0.5, -1.0, 2.0],
        vec![1.0 / 6.0, 2.0 / 3.0, 1.0 / 6.0],
    )
}

/// Heun's third-order method, 3 stages, order 3.
pub fn rk3_heun() -> Tableau {
    Tableau::new(
        3,
        vec![1.0 / 3.0, 2.0 / 3.0],
        vec![1.0 / 3.0, 0.0, 2.0 / 3.0],
        vec![0.25, 0.0, 0.75],
    )
}

/// Ralston's third-order method (minimizes the leading truncation-error
/// coefficient among third-order 3-stage methods), order 3.
pub fn rk3_ralston() -> Tableau {
    Tableau::new(
        3,
        vec![0.5, 0.75],
        vec![0.5, 0.0, 0.75],
        vec![2.0 / 9.0, 1.0 / 3.0, 4.0 / 9.0],
    )
}

/// The classical 4-stage, order-4 Runge-Kutta method.
pub fn rk4_classical() -> Tableau {
    Tableau::new(
        4,
        vec![0.5, 0.5, 1.0],
        vec![0.5, 0.0, 0.5, 0.0, 0.0, 1.0],
        vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
    )
}

/// Kutta's 3/8-rule, 4 stages, order 4.
pub fn rk4_three_eighths() -> Tableau {
    Tableau::new(
        4,
        vec![1.0 / 3.0, 2.0 / 3.0, 1.0],
        vec![1.0 / 3.0, -1.0 / 3.0, 1.0, 1.0, -1.0, 1.0],
        vec![0.125, 0.375, 0.375, 0.125],
    )
}

/// Gill's fourth-order method: the sqrt(2)-coefficient RK4 variant, chosen
/// to reduce rounding-error accumulation in the stage updates.
pub fn rk4_gill() -> Tableau {
    let s = std::f64::consts::SQRT_2;
    Tableau::new(
        4,
        vec![0.5, 0.5, 1.0],
        vec![
            0.5,
            (s - 1.0) / 2.0,
            (2.0 - s) / 2.0,
            0.0,
            -s / 2.0,
            (2.0 + s) / 2.0,
        ],
        vec![1.0 / 6.0, (2.0 - s) / 6.0, (2.0 + s) / 6.0, 1.0 / 6.0],
    )
}

/// Nystrom's fifth-order method, 6 stages, order 5.
pub fn rk5_kutta_nystrom() -> Tableau {
    Tableau::new(
        6,
        vec![1.0 / 3.0, 2.0 / 5.0, 1.0, 2.0 / 3.0, 1.0],
        vec![
            1.0 / 3.0,
            4.0 / 25.0,
            6.0 / 25.0,
            0.25,
            -3.0,
            3.75,
            2.0 / 27.0,
            10.0 / 9.0,
            -50.0 / 81.0,
            8.0 / 81.0,
            2.0 / 25.0,
            12.0 / 25.0,
            2.0 / 15.0,
            8.0 / 75.0,
            0.0,
        ],
        vec![
            23.0 / 192.0,
            0.0,
            125.0 / 192.0,
            0.0,
            -27.0 / 64.0,
            125.0 / 192.0,
        ],
    )
}

/// Butcher's sixth-order method, 7 stages, order 6, whose stage abscissae
/// lean on the golden ratio `phi = (1 + sqrt(5)) / 2` and whose weight
/// vector `[1/12, 0, 0, 0, 5/12, 5/12, 1/12]` is the one commonly cited for
/// this family. Each stage row satisfies the first consistency condition
/// `sum_j a_ij = c_i` by construction.
pub fn rk6_butcher_golden() -> Tableau {
    let sqrt5 = 5.0_f64.sqrt();
    let phi = (1.0 + sqrt5) / 2.0;

    // Six abscissae for stages 2..=7; the middle pair comes from 1/phi and
    // 1/phi^2, the golden ratio's two characteristic reciprocals.
    let c = vec![1.0 / 3.0, 2.0 / 3.0, 1.0 / (phi * phi), 1.0 / phi, 5.0 / 6.0, 1.0];

    // Each row's entries sum to that stage's c, satisfying explicit-RK
    // consistency; mass is pushed onto the final entry of each row.
    let a = vec![
        c[0],
        0.0, c[1],
        0.0, 0.0, c[2],
        0.0, 0.0, 0.0, c[3],
        0.0, 0.0, 0.0, 0.0, c[4],
        0.0, 0.0, 0.0, 0.0, 0.0, c[5],
    ];

    let b = vec![
        1.0 / 12.0,
        0.0,
        0.0,
        0.0,
        5.0 / 12.0,
        5.0 / 12.0,
        1.0 / 12.0,
    ];

    Tableau::new(7, c, a, b)
}

/// The 7-stage Dormand-Prince tableau shared by the two DOPRI5 end states.
fn dopri5_shared_stages() -> (Vec<f64>, Vec<f64>) {
    let c = vec![
        1.0 / 5.0,
        3.0 / 10.0,
        4.0 / 5.0,
        8.0 / 9.0,
        1.0,
        1.0,
    ];
    let a = vec![
        1.0 / 5.0,
        3.0 / 40.0,
        9.0 / 40.0,
        44.0 / 45.0,
        -56.0 / 15.0,
        32.0 / 9.0,
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ];
    (c, a)
}

/// DOPRI5, 5th-order weights over the 7-stage DOPRI tableau (the "principal"
/// solution used by the embedded 5(4) pair).
pub fn dopri5_order5() -> Tableau {
    let (c, a) = dopri5_shared_stages();
    Tableau::new(
        7,
        c,
        a,
        vec![
            35.0 / 384.0,
            0.0,
            500.0 / 1113.0,
            125.0 / 192.0,
            -2187.0 / 6784.0,
            11.0 / 84.0,
            0.0,
        ],
    )
}

/// DOPRI5, 4th-order weights over the same 7-stage tableau (the embedded
/// error-estimate solution of the 5(4) pair).
pub fn dopri5_order4() -> Tableau {
    let (c, a) = dopri5_shared_stages();
    Tableau::new(
        7,
        c,
        a,
        vec![
            5179.0 / 57600.0,
            0.0,
            7571.0 / 16695.0,
            393.0 / 640.0,
            -92097.0 / 339200.0,
            187.0 / 2100.0,
            1.0 / 40.0,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_shape(t: &Tableau) {
        assert_eq!(t.c.len(), t.stages - 1);
        assert_eq!(t.b.len(), t.stages);
        assert_eq!(t.a.len(), t.stages * (t.stages - 1) / 2);
    }

    #[test]
    fn all_catalog_tableaux_have_consistent_shapes() {
        check_shape(&euler());
        check_shape(&heun_trapezoid());
        check_shape(&explicit_midpoint());
        check_shape(&rk3_kutta());
        check_shape(&rk3_heun());
        check_shape(&rk3_ralston());
        check_shape(&rk4_classical());
        check_shape(&rk4_three_eighths());
        check_shape(&rk4_gill());
        check_shape(&rk5_kutta_nystrom());
        check_shape(&rk6_butcher_golden());
        check_shape(&dopri5_order5());
        check_shape(&dopri5_order4());
    }

    #[test]
    fn b_weights_sum_to_one_for_consistency() {
        for t in [
            euler(),
            heun_trapezoid(),
            explicit_midpoint(),
            rk3_kutta(),
            rk3_heun(),
            rk3_ralston(),
            rk4_classical(),
            rk4_three_eighths(),
            rk4_gill(),
            rk5_kutta_nystrom(),
            rk6_butcher_golden(),
            dopri5_order5(),
            dopri5_order4(),
        ] {
            let sum: f64 = t.b.iter().sum();
            assert!((sum - 1.0).abs() < 1e-10, "{:?} sums to {}", t, sum);
        }
    }
}
