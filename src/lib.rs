//! Explicit Runge-Kutta and implicit Everhart Gauss-Radau/Lobatto ODE
//! integrators behind a single right-hand-side contract, with a worked
//! spacecraft orbital-mechanics example.

pub mod catalog;
pub mod config;
pub mod diff;
pub mod dopri8;
pub mod driver;
pub mod error;
pub mod everhart;
pub mod method;
pub mod output;
pub mod rhs;
pub mod schemes;
pub mod spacecraft;
pub mod tableau;
pub mod testfn;

pub use config::{parse_scenario_file, Scenario};
pub use driver::{solve, solve_with_interpolation};
pub use error::IntegrationError;
pub use method::{IntegratorMethod, MethodHandle};
pub use rhs::RightHandSide;
