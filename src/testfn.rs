//! Catalog of scalar reference functions used to exercise a scheme against a
//! known analytic solution, plus the shared numerical-differentiation path.

/// A named scalar function with an analytic derivative, for driving scalar
/// ODEs of the form `dy/dx = g(x)` where `g` is the derivative.
pub trait TestFunction {
    fn value(&self, x: f64) -> f64;
    fn derivative(&self, x: f64) -> f64;
    fn expression(&self) -> &'static str;

    /// Derivative estimated by central differencing, for cross-checking
    /// [`Self::derivative`] against [`crate::diff::central_difference`].
    fn numerical_derivative(&self, x: f64) -> f64 {
        crate::diff::central_difference(|t| self.value(t), x)
    }
}

macro_rules! test_function {
    ($name:ident, $expr:expr, $value:expr, $derivative:expr) => {
        pub struct $name;

        impl TestFunction for $name {
            fn value(&self, x: f64) -> f64 {
                ($value)(x)
            }

            fn derivative(&self, x: f64) -> f64 {
                ($derivative)(x)
            }

            fn expression(&self) -> &'static str {
                $expr
            }
        }
    };
}

test_function!(Sine, "sin(x)", |x: f64| x.sin(), |x: f64| x.cos());
test_function!(Cosine, "cos(x)", |x: f64| x.cos(), |x: f64| -x.sin());
test_function!(Exponential, "exp(x)", |x: f64| x.exp(), |x: f64| x.exp());
test_function!(Square, "x^2", |x: f64| x * x, |x: f64| 2.0 * x);
test_function!(
    SineTimesHighFrequencyCosine,
    "sin(x)*cos(10x)",
    |x: f64| x.sin() * (10.0 * x).cos(),
    |x: f64| x.cos() * (10.0 * x).cos() - 10.0 * x.sin() * (10.0 * x).sin()
);
test_function!(NaturalLog, "ln(x)", |x: f64| x.ln(), |x: f64| 1.0 / x);

/// Stands in for the spacecraft example's state dimension in menus and
/// tests; real dynamics live in [`crate::spacecraft`], not here.
pub struct SpacecraftMotion;

impl TestFunction for SpacecraftMotion {
    fn value(&self, _x: f64) -> f64 {
        0.0
    }

    fn derivative(&self, _x: f64) -> f64 {
        0.0
    }

    fn expression(&self) -> &'static str {
        "spacecraft motion (see crate::spacecraft)"
    }
}

/// All built-in test functions, for menu display or exhaustive test loops.
pub fn catalog() -> Vec<Box<dyn TestFunction>> {
    vec![
        Box::new(Sine),
        Box::new(Cosine),
        Box::new(Exponential),
        Box::new(Square),
        Box::new(SineTimesHighFrequencyCosine),
        Box::new(NaturalLog),
        Box::new(SpacecraftMotion),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_derivative_matches_numerical_estimate() {
        let f = Sine;
        for x in [0.1, 0.5, 1.0, 2.0] {
            assert!((f.derivative(x) - f.numerical_derivative(x)).abs() < 1e-6);
        }
    }

    #[test]
    fn exponential_is_its_own_derivative() {
        let f = Exponential;
        assert!((f.value(1.0) - f.derivative(1.0)).abs() < 1e-12);
    }

    #[test]
    fn square_derivative_is_linear() {
        let f = Square;
        assert_eq!(f.derivative(3.0), 6.0);
    }

    #[test]
    fn catalog_contains_every_named_function() {
        let names: Vec<&str> = catalog().iter().map(|f| f.expression()).collect();
        assert!(names.contains(&"sin(x)"));
        assert!(names.contains(&"x^2"));
        assert!(names.iter().any(|n| n.contains("spacecraft")));
    }
}
