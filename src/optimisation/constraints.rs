//! Code for adding constraints to the unit-commitment problem.
use super::VariableMap;
use crate::model::Model;
use crate::optimisation::costs;
use crate::unit::Fleet;
use highs::RowProblem as Problem;
use itertools::{chain, iproduct};

/// Add constraints matching generation to demand in every hour.
///
/// Demand and renewable output are profile-driven, so they appear on the
/// right-hand side. A charging battery adds to the load the rest of the fleet
/// must cover.
pub fn add_balance_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    // Reuse the same buffer for each row
    let mut terms = Vec::new();
    for hour in model.horizon.iter() {
        for unit in &fleet.thermal {
            terms.push((variables.power(&unit.id, hour), 1.0));
        }
        for unit in &fleet.battery {
            terms.push((variables.battery_power(&unit.id, hour), -1.0));
        }

        let demand: f64 = fleet
            .demand
            .iter()
            .map(|unit| model.scaled_power(unit, hour).value())
            .sum();
        let renewable: f64 = chain(&fleet.wind, &fleet.pv)
            .map(|unit| model.scaled_power(unit, hour).value())
            .sum();
        let rhs = demand - renewable;
        problem.add_row(rhs..=rhs, terms.drain(0..));
    }
}

/// Add constraints keeping committed units inside their operating range.
///
/// When a unit is off both rows collapse to forcing its output to zero.
pub fn add_capacity_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    for (unit, hour) in iproduct!(&fleet.thermal, model.horizon.iter()) {
        let power = variables.power(&unit.id, hour);
        let on = variables.on(&unit.id, hour);

        problem.add_row(..=0.0, [(power, 1.0), (on, -unit.power.value())]);

        let minimum = (parameters.min_power * unit.power).value();
        problem.add_row(0.0.., [(power, 1.0), (on, -minimum)]);
    }
}

/// Add constraints tying each unit's output to its deviation variables.
///
/// While a unit runs, its output is the optimal operating point plus the
/// signed deviations. The exclusivity rows keep one of the two at zero.
pub fn add_deviation_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    for (unit, hour) in iproduct!(&fleet.thermal, model.horizon.iter()) {
        let optimal = (parameters.opt_power * unit.power).value();
        problem.add_row(
            0.0..=0.0,
            [
                (variables.power(&unit.id, hour), 1.0),
                (variables.power_pos(&unit.id, hour), -1.0),
                (variables.power_neg(&unit.id, hour), -1.0),
                (variables.on(&unit.id, hour), -optimal),
            ],
        );
    }
}

/// Add constraints linking commitment to changes of state.
///
/// All units start the horizon off, so in the first hour the change of state
/// equals the commitment itself.
pub fn add_state_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    for (unit, hour) in iproduct!(&fleet.thermal, model.horizon.iter()) {
        let change_state = variables.change_state(&unit.id, hour);

        let mut terms = vec![(change_state, 1.0), (variables.on(&unit.id, hour), -1.0)];
        if let Some(previous) = hour.previous() {
            terms.push((variables.on(&unit.id, previous), 1.0));
        }
        problem.add_row(0.0..=0.0, terms);

        problem.add_row(
            0.0..=0.0,
            [
                (change_state, 1.0),
                (variables.switch_on(&unit.id, hour), -1.0),
                (variables.switch_off(&unit.id, hour), -1.0),
            ],
        );
    }
}

/// Add constraints limiting hour-to-hour output changes of thermal units.
///
/// The limit applies between consecutive running hours. A unit that starts or
/// stops is instead held to its minimum stable output on the boundary hour.
pub fn add_ramp_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    for (unit, hour) in iproduct!(&fleet.thermal, model.horizon.iter()) {
        let Some(previous) = hour.previous() else {
            continue;
        };
        let ramp = unit
            .ramp
            .expect("Thermal units always have a ramp limit")
            .value();
        let relaxation = (parameters.min_power * unit.power).value();

        let power = variables.power(&unit.id, hour);
        let previous_power = variables.power(&unit.id, previous);

        // Upwards, relaxed when the unit was off in the previous hour
        problem.add_row(
            ..=relaxation,
            [
                (power, 1.0),
                (previous_power, -1.0),
                (variables.on(&unit.id, previous), relaxation - ramp),
            ],
        );
        // Downwards, relaxed when the unit is off in this hour
        problem.add_row(
            -relaxation..,
            [
                (power, 1.0),
                (previous_power, -1.0),
                (variables.on(&unit.id, hour), ramp - relaxation),
            ],
        );
    }
}

/// Add constraints splitting battery power and tracking the stored volume.
///
/// Charging fills the store at the conversion efficiency, discharging drains
/// it one to one. The first hour starts from the configured initial fill.
pub fn add_battery_constraints(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    let efficiency = parameters.battery_efficiency.value();
    for (unit, hour) in iproduct!(&fleet.battery, model.horizon.iter()) {
        problem.add_row(
            0.0..=0.0,
            [
                (variables.battery_power(&unit.id, hour), 1.0),
                (variables.battery_load(&unit.id, hour), -1.0),
                (variables.battery_reload(&unit.id, hour), -1.0),
            ],
        );

        let mut terms = vec![
            (variables.battery_volume(&unit.id, hour), 1.0),
            (variables.battery_load(&unit.id, hour), -efficiency),
            (variables.battery_reload(&unit.id, hour), -1.0),
        ];
        match hour.previous() {
            Some(previous) => {
                terms.push((variables.battery_volume(&unit.id, previous), -1.0));
                problem.add_row(0.0..=0.0, terms);
            }
            None => {
                let initial = costs::initial_battery_volume(unit, parameters).value();
                problem.add_row(initial..=initial, terms);
            }
        }
    }
}
