//! Scenario file parsing: INI-format sections describing which method to
//! run, the integration grid, and (for the spacecraft example) the initial
//! orbital state and force-model constants.

use crate::error::IntegrationError;
use crate::spacecraft::SpacecraftParams;
use std::fs;

/// A fully parsed scenario, ready to hand to [`crate::driver`].
#[derive(Debug, Clone)]
pub struct Scenario {
    pub method: String,
    pub t0: f64,
    pub step: f64,
    pub steps: usize,
    pub interp_points: usize,
    pub initial_state: [f64; 6],
    pub spacecraft: SpacecraftParams,
}

/// Parse a scenario file at `path`.
///
/// Expected format (as shown in this text example, not valid Rust):
/// ```text
/// [Scenario]
/// method = rk4-classical
/// t0 = 0
/// step = 10
/// steps = 500
///
/// [Spacecraft]
/// x = 6878137
/// y = 0
/// z = 0
/// vx = 0
/// vy = 7612.6
/// vz = 0
/// ```
pub fn parse_scenario_file(path: &str) -> Result<Scenario, IntegrationError> {
    let content = fs::read_to_string(path)
        .map_err(|e| IntegrationError::Configuration(format!("cannot read {path}: {e}")))?;
    parse_scenario_content(&content)
}

/// Temporary accumulator for `[Scenario]` keys while parsing.
#[derive(Default)]
struct ScenarioData {
    method: Option<String>,
    t0: Option<f64>,
    step: Option<f64>,
    steps: Option<usize>,
    interp_points: usize,
}

/// Temporary accumulator for `[Spacecraft]` keys while parsing.
#[derive(Default)]
struct SpacecraftData {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    vx: Option<f64>,
    vy: Option<f64>,
    vz: Option<f64>,
    params: SpacecraftParams,
}

enum Section {
    None,
    Scenario,
    Spacecraft,
}

/// Parse INI content from a string.
fn parse_scenario_content(content: &str) -> Result<Scenario, IntegrationError> {
    let mut scenario = ScenarioData::default();
    let mut spacecraft = SpacecraftData::default();
    let mut section = Section::None;

    for line in content.lines() {
        let trimmed = line.trim();

        // Skip empty lines and comments
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        // Check for section headers like [Scenario], [Spacecraft]
        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            section = match trimmed[1..trimmed.len() - 1].to_lowercase().as_str() {
                "scenario" => Section::Scenario,
                "spacecraft" => Section::Spacecraft,
                _ => Section::None,
            };
            continue;
        }

        let Some(eq_pos) = trimmed.find('=') else {
            continue;
        };
        let key = trimmed[..eq_pos].trim().to_lowercase();
        let mut value_str = trimmed[eq_pos + 1..].trim();

        // Strip inline comments
        if let Some(hash_pos) = value_str.find('#') {
            value_str = value_str[..hash_pos].trim();
        }
        if let Some(semi_pos) = value_str.find(';') {
            value_str = value_str[..semi_pos].trim();
        }

        match section {
            Section::Scenario => apply_scenario_key(&mut scenario, &key, value_str)?,
            Section::Spacecraft => apply_spacecraft_key(&mut spacecraft, &key, value_str)?,
            Section::None => {}
        }
    }

    let method = scenario
        .method
        .ok_or_else(|| IntegrationError::Configuration("missing Scenario.method".into()))?;
    let t0 = scenario
        .t0
        .ok_or_else(|| IntegrationError::Configuration("missing Scenario.t0".into()))?;
    let step = scenario
        .step
        .ok_or_else(|| IntegrationError::Configuration("missing Scenario.step".into()))?;
    if step == 0.0 {
        return Err(IntegrationError::Configuration("Scenario.step must be nonzero".into()));
    }
    let steps = scenario
        .steps
        .ok_or_else(|| IntegrationError::Configuration("missing Scenario.steps".into()))?;

    let initial_state = [
        spacecraft.x.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.x".into()))?,
        spacecraft.y.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.y".into()))?,
        spacecraft.z.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.z".into()))?,
        spacecraft.vx.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.vx".into()))?,
        spacecraft.vy.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.vy".into()))?,
        spacecraft.vz.ok_or_else(|| IntegrationError::Configuration("missing Spacecraft.vz".into()))?,
    ];

    Ok(Scenario {
        method,
        t0,
        step,
        steps,
        interp_points: scenario.interp_points,
        initial_state,
        spacecraft: spacecraft.params,
    })
}

fn apply_scenario_key(data: &mut ScenarioData, key: &str, value: &str) -> Result<(), IntegrationError> {
    match key {
        "method" => data.method = Some(value.to_string()),
        "t0" => data.t0 = Some(parse_f64(key, value)?),
        "step" => data.step = Some(parse_f64(key, value)?),
        "steps" => data.steps = Some(parse_usize(key, value)?),
        "interp_points" => data.interp_points = parse_usize(key, value)?,
        _ => {} // Ignore unknown keys
    }
    Ok(())
}

fn apply_spacecraft_key(data: &mut SpacecraftData, key: &str, value: &str) -> Result<(), IntegrationError> {
    match key {
        "x" => data.x = Some(parse_f64(key, value)?),
        "y" => data.y = Some(parse_f64(key, value)?),
        "z" => data.z = Some(parse_f64(key, value)?),
        "vx" => data.vx = Some(parse_f64(key, value)?),
        "vy" => data.vy = Some(parse_f64(key, value)?),
        "vz" => data.vz = Some(parse_f64(key, value)?),
        "drag_coefficient" => data.params.drag_coefficient = parse_f64(key, value)?,
        "area" => data.params.area = parse_f64(key, value)?,
        "mass" => data.params.mass = parse_f64(key, value)?,
        "rho0" => data.params.rho0 = parse_f64(key, value)?,
        "reference_altitude" => data.params.reference_altitude = parse_f64(key, value)?,
        "scale_height" => data.params.scale_height = parse_f64(key, value)?,
        "disable_j2" => data.params.disable_j2 = value.eq_ignore_ascii_case("true") || value == "1",
        _ => {} // Ignore unknown keys
    }
    Ok(())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, IntegrationError> {
    value
        .parse::<f64>()
        .map_err(|_| IntegrationError::Configuration(format!("invalid numeric value for {key}: {value}")))
}

fn parse_usize(key: &str, value: &str) -> Result<usize, IntegrationError> {
    value
        .parse::<usize>()
        .map_err(|_| IntegrationError::Configuration(format!("invalid integer value for {key}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[Scenario]
method = rk4-classical
t0 = 0
step = 10
steps = 500
interp_points = 2

[Spacecraft]
x = 6878137
y = 0
z = 0
vx = 0
vy = 7612.6
vz = 0
drag_coefficient = 2.2
"#;

    #[test]
    fn parses_well_formed_scenario() {
        let scenario = parse_scenario_content(SAMPLE).unwrap();
        assert_eq!(scenario.method, "rk4-classical");
        assert_eq!(scenario.steps, 500);
        assert_eq!(scenario.interp_points, 2);
        assert_eq!(scenario.initial_state[0], 6_878_137.0);
        assert_eq!(scenario.spacecraft.drag_coefficient, 2.2);
    }

    #[test]
    fn missing_required_key_fails_at_parse_time() {
        let content = "[Scenario]\nmethod = rk4-classical\nt0 = 0\nstep = 10\n";
        let result = parse_scenario_content(content);
        assert!(matches!(result, Err(IntegrationError::Configuration(_))));
    }

    #[test]
    fn zero_step_is_rejected() {
        let content = SAMPLE.replace("step = 10", "step = 0");
        let result = parse_scenario_content(&content);
        assert!(matches!(result, Err(IntegrationError::Configuration(_))));
    }

    #[test]
    fn ignores_comments_and_unknown_keys() {
        let content = format!("{SAMPLE}\nunknown_key = 42\n# a comment\n");
        let scenario = parse_scenario_content(&content).unwrap();
        assert_eq!(scenario.method, "rk4-classical");
    }
}
