//! Registry of named [`MethodHandle`]s over every stepper this crate ships.

use crate::dopri8::DormandPrince8;
use crate::everhart::{Everhart, EverhartConfig};
use crate::method::{IntegratorMethod, MethodHandle};
use crate::rhs::RightHandSide;
use crate::schemes;
use crate::tableau::{RungeKutta, Tableau};

fn tableau_handle<P: 'static>(label: &'static str, tableau: Tableau) -> MethodHandle<P> {
    MethodHandle::new(label, false, move |rhs: Box<dyn RightHandSide<P>>| {
        Box::new(RungeKutta::new(tableau.clone(), rhs)) as Box<dyn IntegratorMethod<P>>
    })
}

/// Named constructors for every shipped scheme, bound to a right-hand side
/// type `P`. Build one with [`MethodHandle::build`] once an RHS is in hand.
pub fn standard_methods<P: 'static>() -> Vec<MethodHandle<P>> {
    vec![
        tableau_handle("euler", schemes::euler()),
        tableau_handle("heun-trapezoid", schemes::heun_trapezoid()),
        tableau_handle("explicit-midpoint", schemes::explicit_midpoint()),
        tableau_handle("rk3-kutta", schemes::rk3_kutta()),
        tableau_handle("rk3-heun", schemes::rk3_heun()),
        tableau_handle("rk3-ralston", schemes::rk3_ralston()),
        tableau_handle("rk4-classical", schemes::rk4_classical()),
        tableau_handle("rk4-three-eighths", schemes::rk4_three_eighths()),
        tableau_handle("rk4-gill", schemes::rk4_gill()),
        tableau_handle("rk5-kutta-nystrom", schemes::rk5_kutta_nystrom()),
        tableau_handle("rk6-butcher-golden", schemes::rk6_butcher_golden()),
        tableau_handle("dopri5-order5", schemes::dopri5_order5()),
        tableau_handle("dopri5-order4", schemes::dopri5_order4()),
        MethodHandle::new("dopri8", false, |rhs| {
            Box::new(DormandPrince8::new(rhs)) as Box<dyn IntegratorMethod<P>>
        }),
        everhart_handle("everhart-15", EverhartConfig { order: 15, ..Default::default() }),
    ]
}

/// A named Everhart handle for a specific configured order.
pub fn everhart_handle<P: 'static>(label: &'static str, config: EverhartConfig) -> MethodHandle<P> {
    MethodHandle::new(label, true, move |rhs| {
        Box::new(Everhart::new(config, rhs)) as Box<dyn IntegratorMethod<P>>
    })
}
