use std::env;
use std::process;
use std::time::Instant;

use rk_integrate::catalog;
use rk_integrate::spacecraft::SpacecraftRhs;
use rk_integrate::{config, driver, output};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        println!("Usage: rk-integrate <scenario.ini>");
        process::exit(0);
    }

    let scenario_path = &args[1];
    let scenario = match config::parse_scenario_file(scenario_path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("failed to load scenario: {e}");
            process::exit(1);
        }
    };

    let methods = catalog::standard_methods();
    let Some(handle) = methods.iter().find(|m| m.label == scenario.method) else {
        eprintln!("unknown method: {}", scenario.method);
        process::exit(1);
    };

    let mut method = handle.build(Box::new(SpacecraftRhs));
    method.initialize();

    let start = Instant::now();
    let result = if scenario.interp_points > 0 && handle.supports_interpolation {
        driver::solve_with_interpolation(
            method.as_mut(),
            &scenario.method,
            scenario.t0,
            &scenario.initial_state,
            scenario.step,
            scenario.steps,
            scenario.interp_points,
            &scenario.spacecraft,
        )
    } else {
        driver::solve(
            method.as_mut(),
            &scenario.method,
            scenario.t0,
            &scenario.initial_state,
            scenario.step,
            scenario.steps,
            &scenario.spacecraft,
        )
    };
    let elapsed = start.elapsed();

    let trajectory = match result {
        Ok(trajectory) => trajectory,
        Err(e) => {
            eprintln!("integration failed: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = output::write_trajectory_csv("trajectory.csv", scenario.t0, scenario.step, &trajectory) {
        eprintln!("failed to write trajectory.csv: {e}");
        process::exit(1);
    }

    let final_state = trajectory.last().expect("trajectory always includes the initial state");
    log::info!(
        "{}: {} states written in {:.3}s, final state {:?}",
        scenario.method,
        trajectory.len(),
        elapsed.as_secs_f64(),
        final_state
    );
    println!(
        "wrote {} states to trajectory.csv in {:.3}s",
        trajectory.len(),
        elapsed.as_secs_f64()
    );
}
