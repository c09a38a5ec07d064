//! Defines the `Parameters` struct, which represents the contents of `model.toml`.
//!
//! Every parameter has a default, so the file itself is optional.
use crate::horizon::DEFAULT_PERIODS;
use crate::input::{input_err_msg, read_toml};
use crate::units::{Dimensionless, Hours};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

/// The name of the model parameters file within a model directory.
pub const PARAMETERS_FILE_NAME: &str = "model.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::new($value)
        }
    };
}

macro_rules! define_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            $value
        }
    };
}

define_unit_param_default!(default_opt_power, Dimensionless, 0.7);
define_unit_param_default!(default_min_power, Dimensionless, 0.4);
define_unit_param_default!(default_deviation_cost, Dimensionless, 1.25);
define_unit_param_default!(default_start_up_cost, Dimensionless, 0.2);
define_unit_param_default!(default_battery_load_hours, Hours, 4.0);
define_unit_param_default!(default_battery_efficiency, Dimensionless, 0.9);
define_unit_param_default!(default_battery_start_fraction, Dimensionless, 0.5);
define_param_default!(default_deviation_segments, u32, 4);
define_param_default!(default_periods, usize, DEFAULT_PERIODS);

/// Tunable model constants.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Parameters {
    /// The fraction of capacity at which a thermal plant runs cheapest
    #[serde(default = "default_opt_power")]
    pub opt_power: Dimensionless,
    /// The minimum stable fraction of capacity while committed
    #[serde(default = "default_min_power")]
    pub min_power: Dimensionless,
    /// Marginal-cost multiplier reached at both deviation extremes
    #[serde(default = "default_deviation_cost")]
    pub deviation_cost: Dimensionless,
    /// Startup cost factor, applied as `start_up_cost * vc * capacity`
    #[serde(default = "default_start_up_cost")]
    pub start_up_cost: Dimensionless,
    /// Hours of full-power charging a battery can store
    #[serde(default = "default_battery_load_hours")]
    pub battery_load_hours: Hours,
    /// Fraction of charged energy that reaches the store
    #[serde(default = "default_battery_efficiency")]
    pub battery_efficiency: Dimensionless,
    /// Initial fill fraction of the storable volume
    #[serde(default = "default_battery_start_fraction")]
    pub battery_start_fraction: Dimensionless,
    /// Piecewise segments per deviation side in the cost linearisation
    #[serde(default = "default_deviation_segments")]
    pub deviation_segments: u32,
    /// Number of hourly periods in the horizon
    #[serde(default = "default_periods")]
    pub periods: usize,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            opt_power: default_opt_power(),
            min_power: default_min_power(),
            deviation_cost: default_deviation_cost(),
            start_up_cost: default_start_up_cost(),
            battery_load_hours: default_battery_load_hours(),
            battery_efficiency: default_battery_efficiency(),
            battery_start_fraction: default_battery_start_fraction(),
            deviation_segments: default_deviation_segments(),
            periods: default_periods(),
        }
    }
}

/// Check the operating fractions are ordered: `0 < min_power < opt_power <= 1`
fn check_operating_fractions(min_power: Dimensionless, opt_power: Dimensionless) -> Result<()> {
    ensure!(
        min_power.is_finite() && opt_power.is_finite(),
        "min_power and opt_power must be finite"
    );
    ensure!(
        Dimensionless(0.0) < min_power && min_power < opt_power && opt_power <= Dimensionless(1.0),
        "Operating fractions must satisfy 0 < min_power < opt_power <= 1"
    );

    Ok(())
}

/// Check the `deviation_cost` multiplier is valid
fn check_deviation_cost(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(1.0),
        "deviation_cost must be a finite multiplier of at least 1"
    );

    Ok(())
}

/// Check the `start_up_cost` factor is valid
fn check_start_up_cost(value: Dimensionless) -> Result<()> {
    ensure!(
        value.is_finite() && value >= Dimensionless(0.0),
        "start_up_cost must be a finite non-negative factor"
    );

    Ok(())
}

/// Check the battery parameters are valid
fn check_battery_parameters(
    load_hours: Hours,
    efficiency: Dimensionless,
    start_fraction: Dimensionless,
) -> Result<()> {
    ensure!(
        load_hours.is_finite() && load_hours > Hours(0.0),
        "battery_load_hours must be a finite number of hours greater than zero"
    );
    ensure!(
        efficiency.is_finite()
            && Dimensionless(0.0) < efficiency
            && efficiency <= Dimensionless(1.0),
        "battery_efficiency must be in (0, 1]"
    );
    ensure!(
        start_fraction.is_finite()
            && (Dimensionless(0.0)..=Dimensionless(1.0)).contains(&start_fraction),
        "battery_start_fraction must be in [0, 1]"
    );

    Ok(())
}

impl Parameters {
    /// Read model parameters from the specified directory.
    ///
    /// A missing `model.toml` yields the defaults.
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<Parameters> {
        let file_path = model_dir.as_ref().join(PARAMETERS_FILE_NAME);
        let parameters: Parameters = if file_path.is_file() {
            read_toml(&file_path)?
        } else {
            Parameters::default()
        };

        parameters
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(parameters)
    }

    /// Validate parameters after reading in file
    pub fn validate(&self) -> Result<()> {
        check_operating_fractions(self.min_power, self.opt_power)?;
        check_deviation_cost(self.deviation_cost)?;
        check_start_up_cost(self.start_up_cost)?;
        check_battery_parameters(
            self.battery_load_hours,
            self.battery_efficiency,
            self.battery_start_fraction,
        )?;

        ensure!(
            self.deviation_segments >= 1,
            "deviation_segments must be at least 1"
        );
        ensure!(self.periods >= 1, "periods must be at least 1");

        Ok(())
    }
}
