//! Rows that restate disjunctive and piecewise cost structure as plain rows.
//!
//! Two pieces of the objective cannot be written directly as a linear
//! programme. Deviation costs are quadratic in the distance from the optimal
//! operating point, so each deviation is split across segments of a piecewise
//! chord approximation that is exact at the segment boundaries. Deviations
//! below the optimal point have concave costs, so their segments carry fill
//! flags that force the cheaper segments to fill first. The same indicator
//! technique keeps a deviation, or a battery, from moving in both directions
//! within one hour.
use super::{Variable, VariableMap};
use crate::model::Model;
use crate::optimisation::costs::{self, DeviationSegment};
use crate::unit::Fleet;
use highs::RowProblem as Problem;
use itertools::{Itertools, iproduct};

/// Keep `positive` and `negative` from being nonzero in the same hour.
///
/// The indicator selects a direction: when it is one the negative variable is
/// forced to zero, when it is zero the positive variable is.
fn add_exclusive_pair(
    problem: &mut Problem,
    positive: Variable,
    positive_bound: f64,
    negative: Variable,
    negative_bound: f64,
    indicator: Variable,
) {
    problem.add_row(..=0.0, [(positive, 1.0), (indicator, -positive_bound)]);
    problem.add_row(
        -negative_bound..,
        [(negative, 1.0), (indicator, -negative_bound)],
    );
}

/// Tie a deviation variable to the sum of its segment deltas.
///
/// `sign` is one for deviations above the optimal point and minus one for
/// deviations below it, whose totals are negative while deltas measure
/// magnitude.
fn add_segment_link(problem: &mut Problem, total: Variable, sign: f64, deltas: &[Variable]) {
    let mut terms = vec![(total, 1.0)];
    terms.extend(deltas.iter().map(|&delta| (delta, -sign)));
    problem.add_row(0.0..=0.0, terms);
}

/// Force segment deltas to fill in order.
///
/// Each fill flag guards one segment boundary: the next segment can only be
/// used once the flag is raised, and raising it forces the previous segment to
/// its full width. Without these rows the solver would take the cheapest
/// segments of a concave cost curve first.
fn add_fill_order(
    problem: &mut Problem,
    deltas: &[Variable],
    fills: &[Variable],
    segments: &[DeviationSegment],
) {
    assert_eq!(
        fills.len() + 1,
        segments.len(),
        "One fill flag per segment boundary"
    );

    let delta_pairs = deltas.iter().copied().tuple_windows();
    let segment_pairs = segments.iter().tuple_windows();
    for ((delta, next_delta), ((segment, next_segment), &fill)) in
        delta_pairs.zip(segment_pairs.zip(fills))
    {
        problem.add_row(0.0.., [(delta, 1.0), (fill, -segment.width.value())]);
        problem.add_row(
            ..=0.0,
            [(next_delta, 1.0), (fill, -next_segment.width.value())],
        );
    }
}

/// Keep each thermal unit's deviation on one side of the optimal point.
pub fn add_deviation_exclusivity(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    for (unit, hour) in iproduct!(&fleet.thermal, model.horizon.iter()) {
        add_exclusive_pair(
            problem,
            variables.power_pos(&unit.id, hour),
            costs::positive_span(unit, parameters).value(),
            variables.power_neg(&unit.id, hour),
            costs::negative_span(unit, parameters).value(),
            variables.deviation_indicator(&unit.id, hour),
        );
    }
}

/// Spread each deviation across its cost segments.
pub fn add_deviation_segment_rows(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    let parameters = &model.parameters;
    for unit in &fleet.thermal {
        let negative_segments = costs::negative_deviation_segments(unit, parameters);
        for hour in model.horizon.iter() {
            add_segment_link(
                problem,
                variables.power_pos(&unit.id, hour),
                1.0,
                variables.positive_deltas(&unit.id, hour),
            );
            add_segment_link(
                problem,
                variables.power_neg(&unit.id, hour),
                -1.0,
                variables.negative_deltas(&unit.id, hour),
            );
            // Above the optimal point segment costs increase, so minimisation
            // fills them in order by itself
            add_fill_order(
                problem,
                variables.negative_deltas(&unit.id, hour),
                variables.negative_fills(&unit.id, hour),
                &negative_segments,
            );
        }
    }
}

/// Keep each battery from charging and discharging in the same hour.
///
/// Charging then reloading within an hour would otherwise let the solver burn
/// off stored energy for free through the conversion loss.
pub fn add_battery_exclusivity(
    problem: &mut Problem,
    variables: &VariableMap,
    model: &Model,
    fleet: &Fleet,
) {
    for (unit, hour) in iproduct!(&fleet.battery, model.horizon.iter()) {
        let capacity = unit.power.value();
        add_exclusive_pair(
            problem,
            variables.battery_load(&unit.id, hour),
            capacity,
            variables.battery_reload(&unit.id, hour),
            capacity,
            variables.battery_indicator(&unit.id, hour),
        );
    }
}
