//! Cost coefficients for the unit-commitment problem.
//!
//! A thermal plant's marginal cost is `vc` at its optimal operating point and
//! rises linearly to `vc * deviation_cost` at full capacity and at the minimum
//! stable level. Multiplying that marginal cost by the power output gives an
//! hourly cost that is quadratic in the deviation, which the functions here
//! restate as linear coefficients on the deviation variables plus piecewise
//! segment deltas. The restatement is exact at every segment breakpoint,
//! including the optimum and both extremes.
use crate::parameters::Parameters;
use crate::unit::Unit;
use crate::units::{Dimensionless, Energy, Hours, Money, MoneyPerEnergy, Power};

/// The length of a single scheduling period.
const PERIOD: Hours = Hours(1.0);

/// A slice of the deviation range on one side of the optimal operating point.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationSegment {
    /// The amount of deviation the segment covers, in MW
    pub width: Power,
    /// Cost per MW of deviation within this segment, per period
    pub cost: MoneyPerEnergy,
}

/// The deviation range above the optimal operating point.
pub fn positive_span(unit: &Unit, parameters: &Parameters) -> Power {
    (Dimensionless(1.0) - parameters.opt_power) * unit.power
}

/// The deviation range below the optimal operating point, as a positive width.
pub fn negative_span(unit: &Unit, parameters: &Parameters) -> Power {
    (parameters.opt_power - parameters.min_power) * unit.power
}

/// The extra marginal cost reached at both deviation extremes.
fn extra_cost(unit: &Unit, parameters: &Parameters) -> MoneyPerEnergy {
    (parameters.deviation_cost - Dimensionless(1.0)) * unit.vc
}

/// Marginal-cost slope per MW of deviation.
///
/// `opt_power` may equal one, leaving no room above the optimum; the slope is
/// then irrelevant and taken as zero to keep coefficients finite.
fn deviation_slope(extra: MoneyPerEnergy, span: Power) -> f64 {
    if span > Power(0.0) {
        extra.value() / span.value()
    } else {
        0.0
    }
}

fn positive_slope(unit: &Unit, parameters: &Parameters) -> f64 {
    deviation_slope(
        extra_cost(unit, parameters),
        positive_span(unit, parameters),
    )
}

fn negative_slope(unit: &Unit, parameters: &Parameters) -> f64 {
    -deviation_slope(
        extra_cost(unit, parameters),
        negative_span(unit, parameters),
    )
}

/// Linear cost coefficient for the positive deviation variable.
///
/// Together with the segment deltas this reproduces `power * marginal_cost`
/// exactly at the segment breakpoints.
pub fn positive_deviation_cost(unit: &Unit, parameters: &Parameters) -> MoneyPerEnergy {
    let optimal = parameters.opt_power * unit.power;
    MoneyPerEnergy(positive_slope(unit, parameters) * optimal.value())
}

/// Linear cost coefficient for the negative deviation variable.
///
/// The coefficient is negative and applies to a non-positive variable, so its
/// contribution to the objective is a non-negative cost.
pub fn negative_deviation_cost(unit: &Unit, parameters: &Parameters) -> MoneyPerEnergy {
    let optimal = parameters.opt_power * unit.power;
    MoneyPerEnergy(negative_slope(unit, parameters) * optimal.value())
}

fn segments(span: Power, slope: f64, count: u32) -> Vec<DeviationSegment> {
    let width = span.value() / f64::from(count);
    (0..count)
        .map(|k| {
            let lower = f64::from(k) * width;
            let upper = f64::from(k + 1) * width;

            // Chord slope of `slope * x^2` between the two breakpoints
            DeviationSegment {
                width: Power(width),
                cost: MoneyPerEnergy(slope * (lower + upper)),
            }
        })
        .collect()
}

/// Segments covering the deviation range above the optimum.
///
/// Segment costs increase with distance from the optimum, so a minimising
/// solver fills them in order without further help.
pub fn positive_deviation_segments(unit: &Unit, parameters: &Parameters) -> Vec<DeviationSegment> {
    segments(
        positive_span(unit, parameters),
        positive_slope(unit, parameters),
        parameters.deviation_segments,
    )
}

/// Segments covering the deviation range below the optimum.
///
/// Segment costs decrease with distance from the optimum, so these segments
/// need fill-order rows to stop the solver skipping ahead to the cheapest one.
pub fn negative_deviation_segments(unit: &Unit, parameters: &Parameters) -> Vec<DeviationSegment> {
    segments(
        negative_span(unit, parameters),
        negative_slope(unit, parameters),
        parameters.deviation_segments,
    )
}

/// One-off cost charged each time a plant switches on.
pub fn startup_cost(unit: &Unit, parameters: &Parameters) -> Money {
    (parameters.start_up_cost * unit.vc) * (unit.power * PERIOD)
}

/// Stored energy in a battery at the start of the horizon.
pub fn initial_battery_volume(unit: &Unit, parameters: &Parameters) -> Energy {
    battery_volume_bound(unit, parameters) * parameters.battery_start_fraction
}

/// The storable volume of a battery.
pub fn battery_volume_bound(unit: &Unit, parameters: &Parameters) -> Energy {
    unit.power * parameters.battery_load_hours
}

/// The marginal cost of a thermal plant at the given output level.
///
/// Equals `vc` exactly at the optimal operating point and `vc * deviation_cost`
/// at full capacity and at the minimum stable level.
pub fn marginal_cost_at(unit: &Unit, parameters: &Parameters, output: Power) -> MoneyPerEnergy {
    let deviation = output - parameters.opt_power * unit.power;
    let slope = if deviation >= Power(0.0) {
        positive_slope(unit, parameters)
    } else {
        negative_slope(unit, parameters)
    };

    unit.vc + MoneyPerEnergy(slope * deviation.value())
}
