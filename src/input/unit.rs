//! Code for reading units from the fleet file.
use super::{input_err_msg, read_vec_from_csv};
use crate::unit::{Unit, UnitId, UnitMap, UnitType, check_unit};
use crate::units::{MoneyPerEnergy, Power};
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

/// The name of the fleet file within a model directory.
pub const UNITS_FILE_NAME: &str = "units.csv";

/// Represents a single row of the units CSV file.
#[derive(PartialEq, Debug, Deserialize)]
struct UnitRow {
    name: String,
    #[serde(rename = "type")]
    kind: UnitType,
    power: Power,
    vc: MoneyPerEnergy,
    ramp: Option<Power>,
}

impl UnitRow {
    fn into_unit(self) -> Unit {
        // The ramp column only applies to thermal plants
        if !self.kind.is_thermal() && self.ramp.is_some() {
            warn!(
                "Unit {}: ignoring ramp value for a {} unit",
                self.name, self.kind
            );
        }
        let ramp = self.kind.is_thermal().then_some(self.ramp).flatten();

        Unit {
            id: UnitId::from(self.name),
            kind: self.kind,
            power: self.power,
            vc: self.vc,
            ramp,
        }
    }
}

/// Read units from the fleet file in the specified model directory.
pub fn read_units(model_dir: &Path) -> Result<UnitMap> {
    let file_path = model_dir.join(UNITS_FILE_NAME);
    let units_csv = read_vec_from_csv(&file_path)?;
    read_units_from_iter(units_csv.into_iter()).with_context(|| input_err_msg(&file_path))
}

fn read_units_from_iter<I>(iter: I) -> Result<UnitMap>
where
    I: Iterator<Item = UnitRow>,
{
    let mut units = UnitMap::new();
    for row in iter {
        let unit = row.into_unit();
        check_unit(&unit)?;

        let id = unit.id.clone();
        ensure!(
            units.insert(id.clone(), unit).is_none(),
            "Duplicate unit name '{id}'"
        );
    }

    Ok(units)
}
