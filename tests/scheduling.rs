//! End-to-end tests for building and solving unit commitment schedules.
//!
//! These tests drive the library through [`perform_unit_commitment`] with small
//! hand-built fleets whose optimal schedules can be worked out on paper.
use float_cmp::assert_approx_eq;
use indexmap::indexmap;
use ucsched::horizon::{Horizon, Hour};
use ucsched::model::Model;
use ucsched::optimisation::{SolveFailure, SolveOptions, SolveOutcome, perform_unit_commitment};
use ucsched::parameters::Parameters;
use ucsched::profile::{Profile, ProfileKind, ProfileMap};
use ucsched::unit::{Unit, UnitId, UnitMap, UnitType};
use ucsched::units::{Dimensionless, Money, MoneyPerEnergy, Power};

/// Create a unit with the given properties.
fn unit(name: &str, kind: UnitType, power: f64, vc: f64, ramp: Option<f64>) -> Unit {
    Unit {
        id: UnitId::new(name),
        kind,
        power: Power(power),
        vc: MoneyPerEnergy(vc),
        ramp: ramp.map(Power),
    }
}

/// A coal plant with capacity 100 MW, variable cost 50 $/`MWh` and ramp 20 MW.
fn coal_plant() -> Unit {
    unit("coal1", UnitType::Coal, 100.0, 50.0, Some(20.0))
}

/// A demand unit with the given peak load.
fn city(power: f64) -> Unit {
    unit("city1", UnitType::Demand, power, 0.0, None)
}

/// A demand profile sitting at the same fraction all day.
fn flat_demand(fraction: f64) -> ProfileMap {
    indexmap! {
        ProfileKind::Demand => Profile::flat(Dimensionless(fraction), Horizon::default()).unwrap(),
    }
}

/// A demand profile at 0.7 for the first half of the day and `step` afterwards.
fn stepped_demand(step: f64) -> ProfileMap {
    let mut values = vec![Dimensionless(0.7); 12];
    values.extend(vec![Dimensionless(step); 12]);
    indexmap! {
        ProfileKind::Demand => Profile::new(values, Horizon::default()).unwrap(),
    }
}

/// Assemble and validate a model with default parameters.
fn build_model(units: Vec<Unit>, profiles: ProfileMap) -> Model {
    let units: UnitMap = units
        .into_iter()
        .map(|unit| (unit.id.clone(), unit))
        .collect();
    Model::new(units, profiles, Parameters::default()).unwrap()
}

/// Solve the model with default options.
fn solve(model: &Model) -> SolveOutcome {
    perform_unit_commitment(model, &SolveOptions::default())
}

/// One plant meeting a flat full load runs at capacity around the clock.
///
/// Per hour the plant earns its variable cost at 100 MW plus the full positive
/// deviation charge, 6250 $ in total, and pays one start-up of 1000 $.
#[test]
fn test_flat_full_load() {
    let model = build_model(vec![coal_plant(), city(100.0)], flat_demand(1.0));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    assert_eq!(schedule.cost, Money(151_000.0));
    assert_eq!(schedule.cost_label(), "151000 $");
    let power = &schedule.power["coal1"];
    assert!(power.values().all(|power| *power == Power(100.0)));
    let commitment = &schedule.commitment["coal1"];
    assert!(commitment.values().all(|state| state.on));
    assert_eq!(commitment[&Hour(1)].change_state, 1);
    assert!((2..=24).all(|hour| commitment[&Hour(hour)].change_state == 0));
}

/// At the optimal operating point the only costs are fuel and one start-up.
#[test]
fn test_flat_optimal_point() {
    let model = build_model(vec![coal_plant(), city(100.0)], flat_demand(0.7));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    // 24 h of 70 MW at 50 $/MWh plus 1000 $ start-up
    assert_eq!(schedule.cost, Money(85_000.0));
    let power = &schedule.power["coal1"];
    assert!(power.values().all(|power| *power == Power(70.0)));
}

/// Running at minimum power incurs the full negative deviation charge.
#[test]
fn test_flat_minimum_power() {
    let model = build_model(vec![coal_plant(), city(100.0)], flat_demand(0.4));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    // 24 h of 40 MW at an effective 62.5 $/MWh plus 1000 $ start-up
    assert_eq!(schedule.cost, Money(61_000.0));
}

/// A demand step within the ramp limit is followed exactly.
#[test]
fn test_ramp_within_limit() {
    let model = build_model(vec![coal_plant(), city(100.0)], stepped_demand(0.85));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    let power = &schedule.power["coal1"];
    assert_eq!(power[&Hour(12)], Power(70.0));
    assert_eq!(power[&Hour(13)], Power(85.0));
    // 12 h at 3500 $, 12 h at 4781.25 $ and one start-up
    assert_eq!(schedule.cost, Money(100_375.0));
}

/// A demand step beyond the ramp limit cannot be served by a lone plant.
///
/// Stepping from 70 MW to 95 MW needs a swing of 25 MW against a ramp limit of
/// 20 MW, and restarting instead would pin the plant to its minimum power.
#[test]
fn test_ramp_limit_violated() {
    let model = build_model(vec![coal_plant(), city(100.0)], stepped_demand(0.95));
    let outcome = solve(&model);

    assert!(matches!(outcome.failure(), Some(SolveFailure::Infeasible)));
}

/// The cheaper plant covers the load alone and the expensive one stays off.
///
/// Splitting the load would push both plants away from their optimal points,
/// so serving 100 MW from the coal plant beats committing the gas plant.
#[test]
fn test_expensive_plant_stays_off() {
    let gas = unit("gas1", UnitType::Gas, 60.0, 80.0, Some(40.0));
    let model = build_model(vec![coal_plant(), gas, city(100.0)], flat_demand(1.0));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    assert_eq!(schedule.cost, Money(151_000.0));
    assert!(schedule.commitment["gas1"].values().all(|state| !state.on));
    assert!(schedule.power["gas1"].values().all(|power| *power == Power(0.0)));
}

/// Hours fully covered by renewables leave the thermal plant off at zero cost.
#[test]
fn test_renewables_cover_demand() {
    let wind = unit("wind1", UnitType::Wind, 60.0, 0.0, None);
    let profiles = indexmap! {
        ProfileKind::Demand => Profile::flat(Dimensionless(0.5), Horizon::default()).unwrap(),
        ProfileKind::Wind => Profile::flat(Dimensionless(1.0), Horizon::default()).unwrap(),
    };
    let model = build_model(vec![coal_plant(), wind, city(120.0)], profiles);
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    assert_eq!(schedule.cost, Money(0.0));
    assert!(schedule.commitment["coal1"].values().all(|state| !state.on));
    assert!(schedule.power["coal1"].values().all(|power| *power == Power(0.0)));
    // Renewable output is reported from the profile, not the solver
    assert_eq!(schedule.power["wind1"][&Hour(12)], Power(60.0));
}

/// A battery drains its initial volume where that displaces thermal output.
///
/// Charging costs more than discharging saves in a flat-price day, so the
/// optimum only discharges the 20 `MWh` the battery starts with, at full rate
/// in two hours, and the hourly balance still holds.
#[test]
fn test_battery_discharges_stored_energy() {
    let store = unit("store1", UnitType::Battery, 10.0, 50.0, None);
    let model = build_model(vec![coal_plant(), store, city(100.0)], flat_demand(0.7));
    let outcome = solve(&model);
    let schedule = outcome.schedule().unwrap();

    assert_eq!(schedule.cost, Money(84_490.0));
    let store = &schedule.power["store1"];
    assert!(store.values().all(|power| power.value() >= 0.0));
    let drained: f64 = store.values().map(|power| power.value()).sum();
    assert_approx_eq!(f64, drained, 20.0, epsilon = 0.01);
    let coal = &schedule.power["coal1"];
    for (hour, power) in store {
        assert_approx_eq!(
            f64,
            coal[hour].value() + power.value(),
            70.0,
            epsilon = 0.01
        );
    }
}

/// Demand above the fleet's capacity is reported as infeasible, not an error.
#[test]
fn test_demand_above_capacity_is_infeasible() {
    let model = build_model(vec![coal_plant(), city(140.0)], flat_demand(1.0));
    let outcome = solve(&model);

    assert!(outcome.schedule().is_none());
    assert!(matches!(outcome.failure(), Some(SolveFailure::Infeasible)));
}

/// A fleet with no generating units validates but cannot serve any load.
#[test]
fn test_fleet_without_plants_is_infeasible() {
    let model = build_model(vec![city(100.0)], flat_demand(0.5));
    let outcome = solve(&model);

    assert!(matches!(outcome.failure(), Some(SolveFailure::Infeasible)));
}

/// Identical inputs give identical objective values across runs.
#[test]
fn test_identical_inputs_identical_cost() {
    let store = unit("store1", UnitType::Battery, 10.0, 50.0, None);
    let model = build_model(vec![coal_plant(), store, city(100.0)], flat_demand(0.7));
    let first = solve(&model);
    let second = solve(&model);

    assert_eq!(
        first.schedule().unwrap().cost,
        second.schedule().unwrap().cost
    );
}
