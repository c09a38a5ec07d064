//! Construction and solution of the unit-commitment problem.
//!
//! The problem is a mixed-integer programme built with the HiGHS solver.
//! Variables and constraints are added per unit and hour, the objective is
//! minimised and the raw column values are read back into a [`Schedule`].
use crate::horizon::Hour;
use crate::model::Model;
use crate::unit::{Fleet, Unit, UnitId};
use crate::units::{Money, Power};
use highs::{HighsModelStatus, HighsStatus, RowProblem as Problem, Sense};
use indexmap::IndexMap;
use itertools::{chain, iproduct};
use log::info;
use std::error::Error;
use std::fmt;
use std::ops::Range;

pub mod costs;
mod constraints;
mod reformulation;

/// A decision variable in the optimisation
///
/// Note that this type is just a wrapper around an integer and is cheaply copyable.
type Variable = highs::Col;

/// A unit and hour pair, the granularity at which variables are created.
type UnitHour = (UnitId, Hour);

/// One family of decision variables, keyed by unit and hour.
///
/// Each family occupies one contiguous block of solver columns and `idx`
/// records where the block sits in the solved column values, in `vars` order.
#[derive(Default)]
struct ScalarFamily {
    vars: IndexMap<UnitHour, Variable>,
    idx: Range<usize>,
}

/// A family with one variable per cost segment for each unit and hour.
#[derive(Default)]
struct SegmentFamily {
    vars: IndexMap<UnitHour, Vec<Variable>>,
    idx: Range<usize>,
}

/// The decision variables of the problem, grouped by family.
///
/// Most families hold one variable per thermal unit and hour. The delta and
/// fill families hold one variable per cost segment, and the battery families
/// one variable per battery unit and hour.
#[derive(Default)]
struct VariableMap {
    power: ScalarFamily,
    power_pos: ScalarFamily,
    power_neg: ScalarFamily,
    on: ScalarFamily,
    change_state: ScalarFamily,
    switch_on: ScalarFamily,
    switch_off: ScalarFamily,
    deviation_indicator: ScalarFamily,
    positive_deltas: SegmentFamily,
    negative_deltas: SegmentFamily,
    negative_fills: SegmentFamily,
    battery_power: ScalarFamily,
    battery_load: ScalarFamily,
    battery_reload: ScalarFamily,
    battery_volume: ScalarFamily,
    battery_indicator: ScalarFamily,
}

/// Look up the variable for a given unit and hour.
///
/// # Panics
///
/// Panics if there is no entry for the given parameters.
fn get_variable(family: &ScalarFamily, unit_id: &UnitId, hour: Hour) -> Variable {
    *family
        .vars
        .get(&(unit_id.clone(), hour))
        .expect("No variable found for given unit and hour")
}

/// Look up the per-segment variables for a given unit and hour.
fn get_segment_variables<'a>(
    family: &'a SegmentFamily,
    unit_id: &UnitId,
    hour: Hour,
) -> &'a [Variable] {
    family
        .vars
        .get(&(unit_id.clone(), hour))
        .expect("No variables found for given unit and hour")
}

impl VariableMap {
    fn power(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.power, unit_id, hour)
    }

    fn power_pos(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.power_pos, unit_id, hour)
    }

    fn power_neg(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.power_neg, unit_id, hour)
    }

    fn on(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.on, unit_id, hour)
    }

    fn change_state(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.change_state, unit_id, hour)
    }

    fn switch_on(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.switch_on, unit_id, hour)
    }

    fn switch_off(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.switch_off, unit_id, hour)
    }

    fn deviation_indicator(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.deviation_indicator, unit_id, hour)
    }

    fn positive_deltas(&self, unit_id: &UnitId, hour: Hour) -> &[Variable] {
        get_segment_variables(&self.positive_deltas, unit_id, hour)
    }

    fn negative_deltas(&self, unit_id: &UnitId, hour: Hour) -> &[Variable] {
        get_segment_variables(&self.negative_deltas, unit_id, hour)
    }

    fn negative_fills(&self, unit_id: &UnitId, hour: Hour) -> &[Variable] {
        get_segment_variables(&self.negative_fills, unit_id, hour)
    }

    fn battery_power(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.battery_power, unit_id, hour)
    }

    fn battery_load(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.battery_load, unit_id, hour)
    }

    fn battery_reload(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.battery_reload, unit_id, hour)
    }

    fn battery_volume(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.battery_volume, unit_id, hour)
    }

    fn battery_indicator(&self, unit_id: &UnitId, hour: Hour) -> Variable {
        get_variable(&self.battery_indicator, unit_id, hour)
    }
}

/// Add one family of columns, one per unit and hour, as a contiguous block.
fn add_family<F>(
    problem: &mut Problem,
    model: &Model,
    units: &[&Unit],
    mut add_one: F,
) -> ScalarFamily
where
    F: FnMut(&mut Problem, &Unit) -> Variable,
{
    let start = problem.num_cols();
    let mut vars = IndexMap::new();
    for (unit, hour) in iproduct!(units, model.horizon.iter()) {
        vars.insert((unit.id.clone(), hour), add_one(problem, unit));
    }
    let idx = start..problem.num_cols();
    ScalarFamily { vars, idx }
}

/// Add power output variables and their deviation split for thermal units.
fn add_thermal_variables(
    problem: &mut Problem,
    variables: &mut VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;

    variables.power = add_family(problem, model, &fleet.thermal, |problem, unit| {
        problem.add_column(unit.vc.value(), 0.0..=unit.power.value())
    });

    // Deviation from the optimal operating point, decomposed by sign. The
    // linear coefficients anchor each deviation's cost at the point where
    // its quadratic term starts.
    variables.power_pos = add_family(problem, model, &fleet.thermal, |problem, unit| {
        let bound = costs::positive_span(unit, parameters).value();
        let cost = costs::positive_deviation_cost(unit, parameters).value();
        problem.add_column(cost, 0.0..=bound)
    });
    variables.power_neg = add_family(problem, model, &fleet.thermal, |problem, unit| {
        let bound = costs::negative_span(unit, parameters).value();
        let cost = costs::negative_deviation_cost(unit, parameters).value();
        problem.add_column(cost, -bound..=0.0)
    });
}

/// Add commitment state variables for thermal units.
fn add_thermal_state_variables(
    problem: &mut Problem,
    variables: &mut VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    variables.on = add_family(problem, model, &fleet.thermal, |problem, _| {
        problem.add_integer_column(0.0, 0.0..=1.0)
    });
    variables.change_state = add_family(problem, model, &fleet.thermal, |problem, _| {
        problem.add_integer_column(0.0, -1.0..=1.0)
    });
    variables.switch_on = add_family(problem, model, &fleet.thermal, |problem, unit| {
        let cost = costs::startup_cost(unit, &model.parameters).value();
        problem.add_integer_column(cost, 0.0..=1.0)
    });
    variables.switch_off = add_family(problem, model, &fleet.thermal, |problem, _| {
        problem.add_integer_column(0.0, -1.0..=0.0)
    });
    variables.deviation_indicator = add_family(problem, model, &fleet.thermal, |problem, _| {
        problem.add_integer_column(0.0, 0.0..=1.0)
    });
}

/// Add a family of per-segment columns as a contiguous block.
fn add_segment_family<F>(
    problem: &mut Problem,
    model: &Model,
    units: &[&Unit],
    mut add_segments: F,
) -> SegmentFamily
where
    F: FnMut(&mut Problem, &Unit) -> Vec<Variable>,
{
    let start = problem.num_cols();
    let mut vars = IndexMap::new();
    for (unit, hour) in iproduct!(units, model.horizon.iter()) {
        vars.insert((unit.id.clone(), hour), add_segments(problem, unit));
    }
    let idx = start..problem.num_cols();
    SegmentFamily { vars, idx }
}

/// Add per-segment deviation variables for thermal units.
fn add_deviation_segment_variables(
    problem: &mut Problem,
    variables: &mut VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;

    variables.positive_deltas = add_segment_family(problem, model, &fleet.thermal, |problem, unit| {
        costs::positive_deviation_segments(unit, parameters)
            .iter()
            .map(|segment| problem.add_column(segment.cost.value(), 0.0..=segment.width.value()))
            .collect()
    });
    variables.negative_deltas = add_segment_family(problem, model, &fleet.thermal, |problem, unit| {
        costs::negative_deviation_segments(unit, parameters)
            .iter()
            .map(|segment| problem.add_column(segment.cost.value(), 0.0..=segment.width.value()))
            .collect()
    });

    // One fill flag per segment boundary, so one fewer than segments
    variables.negative_fills = add_segment_family(problem, model, &fleet.thermal, |problem, _| {
        (1..parameters.deviation_segments)
            .map(|_| problem.add_integer_column(0.0, 0.0..=1.0))
            .collect()
    });
}

/// Add charge, discharge and volume variables for battery units.
fn add_battery_variables(
    problem: &mut Problem,
    variables: &mut VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;

    variables.battery_power = add_family(problem, model, &fleet.battery, |problem, unit| {
        let capacity = unit.power.value();
        problem.add_column(0.0, -capacity..=capacity)
    });

    // Only charging carries a cost
    variables.battery_load = add_family(problem, model, &fleet.battery, |problem, unit| {
        problem.add_column(unit.vc.value(), 0.0..=unit.power.value())
    });
    variables.battery_reload = add_family(problem, model, &fleet.battery, |problem, unit| {
        problem.add_column(0.0, -unit.power.value()..=0.0)
    });
    variables.battery_volume = add_family(problem, model, &fleet.battery, |problem, unit| {
        let bound = costs::battery_volume_bound(unit, parameters).value();
        problem.add_column(0.0, 0.0..=bound)
    });
    variables.battery_indicator = add_family(problem, model, &fleet.battery, |problem, _| {
        problem.add_integer_column(0.0, 0.0..=1.0)
    });
}

/// Add variables to the problem for every unit and hour.
///
/// Objective coefficients are attached here as the columns are created.
fn add_variables(problem: &mut Problem, model: &Model, fleet: &Fleet) -> VariableMap {
    let mut variables = VariableMap::default();
    add_thermal_variables(problem, &mut variables, model, fleet);
    add_thermal_state_variables(problem, &mut variables, model, fleet);
    add_deviation_segment_variables(problem, &mut variables, model, fleet);
    add_battery_variables(problem, &mut variables, model, fleet);
    variables
}

/// Build the full problem for `model`, ready to be optimised.
fn build_problem(model: &Model, fleet: &Fleet) -> (Problem, VariableMap) {
    let mut problem = Problem::default();
    let variables = add_variables(&mut problem, model, fleet);

    constraints::add_balance_constraints(&mut problem, &variables, model, fleet);
    constraints::add_capacity_constraints(&mut problem, &variables, model, fleet);
    constraints::add_deviation_constraints(&mut problem, &variables, model, fleet);
    constraints::add_state_constraints(&mut problem, &variables, model, fleet);
    constraints::add_ramp_constraints(&mut problem, &variables, model, fleet);
    constraints::add_battery_constraints(&mut problem, &variables, model, fleet);
    reformulation::add_deviation_exclusivity(&mut problem, &variables, model, fleet);
    reformulation::add_deviation_segment_rows(&mut problem, &variables, model, fleet);
    reformulation::add_battery_exclusivity(&mut problem, &variables, model, fleet);

    (problem, variables)
}

/// Options applied at the solver boundary.
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    /// Wall-clock limit for the solver, in seconds
    pub time_limit: Option<f64>,
    /// Mirror the solver's own log output to the console
    pub verbose: bool,
}

/// The ways a solver run can end without a schedule.
#[derive(Debug, Clone)]
pub enum SolveFailure {
    /// No schedule satisfies the constraints
    Infeasible,
    /// The objective can be decreased without bound.
    ///
    /// Every variable is bounded, so users should not be able to trigger this.
    Unbounded,
    /// The solver stopped for another reason, such as a time limit
    NonOptimal(HighsModelStatus),
    /// The solver itself rejected the problem.
    ///
    /// Users should not be able to trigger this error.
    Incoherent(HighsStatus),
}

impl fmt::Display for SolveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveFailure::Infeasible => {
                write!(
                    f,
                    "Model is infeasible: no schedule satisfies the constraints"
                )
            }
            SolveFailure::Unbounded => write!(f, "Model is unbounded"),
            SolveFailure::NonOptimal(status) => {
                write!(f, "Could not find optimal result: {status:?}")
            }
            SolveFailure::Incoherent(status) => write!(f, "Incoherent model: {status:?}"),
        }
    }
}

impl Error for SolveFailure {}

/// The result of a unit-commitment run.
///
/// Solver failures are reported here rather than as errors: an infeasible
/// fleet is an answer about the input, not a fault in the program.
#[derive(Debug)]
pub enum SolveOutcome {
    /// An optimal schedule was found
    Solved(Box<Schedule>),
    /// The solver finished without an optimal schedule
    Failed(SolveFailure),
}

impl SolveOutcome {
    /// The schedule, if the run produced one.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            SolveOutcome::Solved(schedule) => Some(schedule),
            SolveOutcome::Failed(_) => None,
        }
    }

    /// The failure, if the run ended without a schedule.
    pub fn failure(&self) -> Option<&SolveFailure> {
        match self {
            SolveOutcome::Solved(_) => None,
            SolveOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// The commitment of a thermal unit in one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitmentState {
    /// Whether the unit is running
    pub on: bool,
    /// Change relative to the previous hour (1 started, -1 stopped, 0 unchanged)
    pub change_state: i8,
}

/// One raw variable value, for debug output.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceRow {
    /// The variable family
    pub family: &'static str,
    /// The unit the variable belongs to
    pub unit: UnitId,
    /// The hour the variable belongs to
    pub hour: Hour,
    /// Segment number within the family, if the family is per-segment
    pub segment: Option<usize>,
    /// The value the solver chose
    pub value: f64,
}

/// An optimal schedule for the fleet.
#[derive(Debug)]
pub struct Schedule {
    /// Power output per unit and hour.
    ///
    /// Thermal units report their dispatched output, renewable units their
    /// profile-scaled capacity and batteries their net output, with discharge
    /// positive and charging negative. Demand units are not included.
    pub power: IndexMap<UnitId, IndexMap<Hour, Power>>,
    /// Commitment decisions per thermal unit and hour
    pub commitment: IndexMap<UnitId, IndexMap<Hour, CommitmentState>>,
    /// Total cost of the schedule, rounded to whole dollars
    pub cost: Money,
    trace: Vec<TraceRow>,
}

impl Schedule {
    /// The total cost as a display string.
    pub fn cost_label(&self) -> String {
        format!("{} $", self.cost.value())
    }

    /// Raw variable values underlying the schedule.
    pub fn trace(&self) -> &[TraceRow] {
        &self.trace
    }
}

/// The solution to the optimisation.
struct Solution {
    variables: VariableMap,
    columns: Vec<f64>,
    objective_value: Money,
}

impl Solution {
    /// Iterate a family's keys paired with the values the solver chose.
    fn family_values<'a>(
        &'a self,
        family: &'a ScalarFamily,
    ) -> impl Iterator<Item = (&'a UnitHour, f64)> {
        let values = &self.columns[family.idx.clone()];
        family.vars.keys().zip(values.iter().copied())
    }

    fn trace_family(&self, trace: &mut Vec<TraceRow>, family: &'static str, map: &ScalarFamily) {
        for ((unit_id, hour), value) in self.family_values(map) {
            trace.push(TraceRow {
                family,
                unit: unit_id.clone(),
                hour: *hour,
                segment: None,
                value,
            });
        }
    }

    fn trace_segments(&self, trace: &mut Vec<TraceRow>, family: &'static str, map: &SegmentFamily) {
        let mut offset = map.idx.start;
        for ((unit_id, hour), segment_variables) in &map.vars {
            for position in 1..=segment_variables.len() {
                trace.push(TraceRow {
                    family,
                    unit: unit_id.clone(),
                    hour: *hour,
                    segment: Some(position),
                    value: self.columns[offset],
                });
                offset += 1;
            }
        }
    }

    /// All variable values, labelled by family, unit and hour.
    fn variable_trace(&self) -> Vec<TraceRow> {
        let mut trace = Vec::new();
        let variables = &self.variables;
        self.trace_family(&mut trace, "power", &variables.power);
        self.trace_family(&mut trace, "power_pos", &variables.power_pos);
        self.trace_family(&mut trace, "power_neg", &variables.power_neg);
        self.trace_family(&mut trace, "on", &variables.on);
        self.trace_family(&mut trace, "change_state", &variables.change_state);
        self.trace_family(&mut trace, "switch_on", &variables.switch_on);
        self.trace_family(&mut trace, "switch_off", &variables.switch_off);
        self.trace_family(
            &mut trace,
            "deviation_indicator",
            &variables.deviation_indicator,
        );
        self.trace_segments(&mut trace, "positive_delta", &variables.positive_deltas);
        self.trace_segments(&mut trace, "negative_delta", &variables.negative_deltas);
        self.trace_segments(&mut trace, "negative_fill", &variables.negative_fills);
        self.trace_family(&mut trace, "battery_power", &variables.battery_power);
        self.trace_family(&mut trace, "battery_load", &variables.battery_load);
        self.trace_family(&mut trace, "battery_reload", &variables.battery_reload);
        self.trace_family(&mut trace, "battery_volume", &variables.battery_volume);
        self.trace_family(
            &mut trace,
            "battery_indicator",
            &variables.battery_indicator,
        );
        trace
    }
}

/// Round a power value to two decimal places for reporting.
fn round_power(value: f64) -> f64 {
    // Adding zero folds a negative zero into a positive one
    (value * 100.0).round() / 100.0 + 0.0
}

/// Interpret a change-of-state value as -1, 0 or 1.
fn commitment_change(value: f64) -> i8 {
    if value > 0.5 {
        1
    } else if value < -0.5 {
        -1
    } else {
        0
    }
}

/// Map solver statuses to an outcome classification.
fn classify_status(status: HighsModelStatus) -> Result<(), SolveFailure> {
    match status {
        HighsModelStatus::Optimal => Ok(()),
        HighsModelStatus::Infeasible => Err(SolveFailure::Infeasible),
        HighsModelStatus::Unbounded => Err(SolveFailure::Unbounded),
        status => Err(SolveFailure::NonOptimal(status)),
    }
}

/// Read the commitment decisions out of the solution.
fn build_commitment(solution: &Solution) -> IndexMap<UnitId, IndexMap<Hour, CommitmentState>> {
    let variables = &solution.variables;
    let on_values = solution.family_values(&variables.on);
    let change_values = solution.family_values(&variables.change_state);

    // The two families share one key order, one entry per thermal unit and hour
    let mut commitment: IndexMap<UnitId, IndexMap<Hour, CommitmentState>> = IndexMap::new();
    for (((unit_id, hour), on), (_, change)) in on_values.zip(change_values) {
        let state = CommitmentState {
            on: on > 0.5,
            change_state: commitment_change(change),
        };
        commitment.entry(unit_id.clone()).or_default().insert(*hour, state);
    }
    commitment
}

/// Turn raw column values into a schedule.
fn interpret_solution(solution: &Solution, model: &Model, fleet: &Fleet) -> Schedule {
    let variables = &solution.variables;
    let mut power: IndexMap<UnitId, IndexMap<Hour, Power>> = IndexMap::new();

    for ((unit_id, hour), value) in solution.family_values(&variables.power) {
        power
            .entry(unit_id.clone())
            .or_default()
            .insert(*hour, Power(round_power(value)));
    }

    for unit in chain(&fleet.wind, &fleet.pv) {
        let series: IndexMap<_, _> = model
            .horizon
            .iter()
            .map(|hour| (hour, Power(round_power(model.scaled_power(unit, hour).value()))))
            .collect();
        power.insert(unit.id.clone(), series);
    }

    // The problem has charging positive, the report has discharge positive
    for ((unit_id, hour), value) in solution.family_values(&variables.battery_power) {
        power
            .entry(unit_id.clone())
            .or_default()
            .insert(*hour, Power(round_power(-value)));
    }

    Schedule {
        power,
        commitment: build_commitment(solution),
        cost: Money(solution.objective_value.value().round() + 0.0),
        trace: solution.variable_trace(),
    }
}

/// Build and solve the unit-commitment problem for `model`.
///
/// Malformed input is rejected when the model is constructed, so whatever the
/// solver reports about the problem here comes back as a [`SolveOutcome`]
/// rather than an error.
pub fn perform_unit_commitment(model: &Model, options: &SolveOptions) -> SolveOutcome {
    let fleet = model.fleet();
    info!(
        "Scheduling {} units over {} hours",
        model.units.len(),
        model.horizon.periods()
    );

    let (problem, variables) = build_problem(model, &fleet);
    info!(
        "Problem has {} variables and {} constraints",
        problem.num_cols(),
        problem.num_rows()
    );

    let mut highs_model = problem.optimise(Sense::Minimise);
    if options.verbose {
        highs_model.set_option("output_flag", true);
        highs_model.set_option("log_to_console", true);
    } else {
        highs_model.set_option("output_flag", false);
    }
    if let Some(limit) = options.time_limit {
        highs_model.set_option("time_limit", limit);
    }

    let solved = match highs_model.try_solve() {
        Ok(solved) => solved,
        Err(status) => return SolveOutcome::Failed(SolveFailure::Incoherent(status)),
    };
    if let Err(failure) = classify_status(solved.status()) {
        return SolveOutcome::Failed(failure);
    }

    let solution = Solution {
        variables,
        columns: solved.get_solution().columns().to_vec(),
        objective_value: Money(solved.objective_value()),
    };
    let schedule = interpret_solution(&solution, model, &fleet);
    info!(
        "Optimal schedule found, total cost {}",
        schedule.cost_label()
    );

    SolveOutcome::Solved(Box::new(schedule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{battery_model, model, renewable_model};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    /// Column position of one variable, for building synthetic solutions.
    fn column_of(family: &ScalarFamily, unit_id: &UnitId, hour: Hour) -> usize {
        family.idx.start + family.vars.get_index_of(&(unit_id.clone(), hour)).unwrap()
    }

    #[rstest]
    fn test_variable_count(model: Model) {
        let fleet = model.fleet();
        let (problem, variables) = build_problem(&model, &fleet);

        // Per thermal unit and hour: three power variables, five state
        // variables, four deltas per side and three fill flags
        assert_eq!(problem.num_cols(), 24 * 19);
        assert_eq!(variables.power.idx, 0..24);
    }

    #[rstest]
    fn test_variable_count_battery(battery_model: Model) {
        let fleet = battery_model.fleet();
        let (problem, variables) = build_problem(&battery_model, &fleet);
        assert_eq!(problem.num_cols(), 24 * 19 + 24 * 5);
        assert_eq!(variables.battery_indicator.idx, 24 * 23..24 * 24);
    }

    #[rstest]
    fn test_interpret_solution(model: Model) {
        let fleet = model.fleet();
        let (problem, variables) = build_problem(&model, &fleet);

        let mut columns = vec![0.0; problem.num_cols()];
        let plant: UnitId = "plant1".into();
        for hour in model.horizon.iter() {
            columns[column_of(&variables.power, &plant, hour)] = 70.0;
            columns[column_of(&variables.on, &plant, hour)] = 1.0;
        }
        columns[column_of(&variables.change_state, &plant, Hour(1))] = 1.0;
        columns[column_of(&variables.switch_on, &plant, Hour(1))] = 1.0;

        let solution = Solution {
            variables,
            columns,
            objective_value: Money(85_000.4),
        };
        let schedule = interpret_solution(&solution, &model, &fleet);

        assert_eq!(schedule.cost, Money(85_000.0));
        assert_eq!(schedule.cost_label(), "85000 $");
        assert_eq!(schedule.power["plant1"][&Hour(3)], Power(70.0));
        assert!(!schedule.power.contains_key("city1"));

        let state = schedule.commitment["plant1"][&Hour(1)];
        assert!(state.on);
        assert_eq!(state.change_state, 1);
        let state = schedule.commitment["plant1"][&Hour(2)];
        assert!(state.on);
        assert_eq!(state.change_state, 0);

        assert_eq!(schedule.trace().len(), 24 * 19);
    }

    #[rstest]
    fn test_interpret_renewables(renewable_model: Model) {
        let fleet = renewable_model.fleet();
        let (problem, variables) = build_problem(&renewable_model, &fleet);
        let solution = Solution {
            variables,
            columns: vec![0.0; problem.num_cols()],
            objective_value: Money(0.0),
        };
        let schedule = interpret_solution(&solution, &renewable_model, &fleet);

        // Renewable output is the profile fraction times capacity
        assert_eq!(schedule.power["wind1"][&Hour(5)], Power(7.5));
        assert_eq!(schedule.power["solar1"][&Hour(5)], Power(20.0));
    }

    #[rstest]
    fn test_interpret_battery_sign(battery_model: Model) {
        let fleet = battery_model.fleet();
        let (problem, variables) = build_problem(&battery_model, &fleet);

        let mut columns = vec![0.0; problem.num_cols()];
        let store: UnitId = "store1".into();
        columns[column_of(&variables.battery_power, &store, Hour(2))] = 7.5;

        let solution = Solution {
            variables,
            columns,
            objective_value: Money(0.0),
        };
        let schedule = interpret_solution(&solution, &battery_model, &fleet);

        // Charging is reported as negative output
        assert_eq!(schedule.power["store1"][&Hour(2)], Power(-7.5));
        assert_eq!(schedule.power["store1"][&Hour(1)], Power(0.0));
    }

    #[rstest]
    #[case(12.344, 12.34)]
    #[case(0.456, 0.46)]
    #[case(70.0, 70.0)]
    #[case(-7.499, -7.5)]
    fn test_round_power(#[case] value: f64, #[case] expected: f64) {
        assert_approx_eq!(f64, round_power(value), expected);
    }

    #[test]
    fn test_round_power_negative_zero() {
        let rounded = round_power(-0.001);
        assert_approx_eq!(f64, rounded, 0.0);
        assert!(rounded.is_sign_positive());
    }

    #[rstest]
    #[case(0.9, 1)]
    #[case(1.0, 1)]
    #[case(0.1, 0)]
    #[case(-0.1, 0)]
    #[case(-0.9, -1)]
    fn test_commitment_change(#[case] value: f64, #[case] expected: i8) {
        assert_eq!(commitment_change(value), expected);
    }

    #[test]
    fn test_classify_status() {
        assert!(classify_status(HighsModelStatus::Optimal).is_ok());
        assert!(matches!(
            classify_status(HighsModelStatus::Infeasible),
            Err(SolveFailure::Infeasible)
        ));
        assert!(matches!(
            classify_status(HighsModelStatus::Unbounded),
            Err(SolveFailure::Unbounded)
        ));
    }

    #[test]
    fn test_failure_display() {
        assert_eq!(
            SolveFailure::Infeasible.to_string(),
            "Model is infeasible: no schedule satisfies the constraints"
        );
        assert_eq!(SolveFailure::Unbounded.to_string(), "Model is unbounded");
    }

    #[rstest]
    fn test_outcome_accessors(model: Model) {
        let fleet = model.fleet();
        let (problem, variables) = build_problem(&model, &fleet);
        let solution = Solution {
            variables,
            columns: vec![0.0; problem.num_cols()],
            objective_value: Money(0.0),
        };
        let schedule = interpret_solution(&solution, &model, &fleet);
        let outcome = SolveOutcome::Solved(Box::new(schedule));
        assert!(outcome.schedule().is_some());
        assert!(outcome.failure().is_none());

        let outcome = SolveOutcome::Failed(SolveFailure::Infeasible);
        assert!(outcome.schedule().is_none());
        assert!(outcome.failure().is_some());
    }
}
