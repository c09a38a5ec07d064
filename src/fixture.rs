//! Fixtures for tests

use crate::horizon::Horizon;
use crate::model::Model;
use crate::parameters::Parameters;
use crate::profile::{Profile, ProfileKind, ProfileMap};
use crate::unit::{Unit, UnitMap, UnitType};
use crate::units::{Dimensionless, MoneyPerEnergy, Power};
use indexmap::indexmap;
use rstest::fixture;

#[fixture]
pub fn thermal_unit() -> Unit {
    Unit {
        id: "plant1".into(),
        kind: UnitType::Coal,
        power: Power(100.0),
        vc: MoneyPerEnergy(50.0),
        ramp: Some(Power(20.0)),
    }
}

#[fixture]
pub fn demand_unit() -> Unit {
    Unit {
        id: "city1".into(),
        kind: UnitType::Demand,
        power: Power(120.0),
        vc: MoneyPerEnergy(0.0),
        ramp: None,
    }
}

#[fixture]
pub fn battery_unit() -> Unit {
    Unit {
        id: "store1".into(),
        kind: UnitType::Battery,
        power: Power(10.0),
        vc: MoneyPerEnergy(50.0),
        ramp: None,
    }
}

#[fixture]
pub fn units(thermal_unit: Unit, demand_unit: Unit) -> UnitMap {
    indexmap! {
        thermal_unit.id.clone() => thermal_unit,
        demand_unit.id.clone() => demand_unit,
    }
}

#[fixture]
pub fn profiles() -> ProfileMap {
    let horizon = Horizon::default();
    indexmap! {
        ProfileKind::Demand => Profile::flat(Dimensionless(0.5), horizon).unwrap(),
        ProfileKind::Wind => Profile::flat(Dimensionless(0.25), horizon).unwrap(),
        ProfileKind::Pv => Profile::flat(Dimensionless(0.5), horizon).unwrap(),
    }
}

#[fixture]
pub fn parameters() -> Parameters {
    Parameters::default()
}

#[fixture]
pub fn model(units: UnitMap, profiles: ProfileMap, parameters: Parameters) -> Model {
    Model::new(units, profiles, parameters).unwrap()
}

#[fixture]
pub fn battery_model(
    mut units: UnitMap,
    profiles: ProfileMap,
    parameters: Parameters,
    battery_unit: Unit,
) -> Model {
    units.insert(battery_unit.id.clone(), battery_unit);
    Model::new(units, profiles, parameters).unwrap()
}

#[fixture]
pub fn renewable_model(mut units: UnitMap, profiles: ProfileMap, parameters: Parameters) -> Model {
    let wind = Unit {
        id: "wind1".into(),
        kind: UnitType::Wind,
        power: Power(30.0),
        vc: MoneyPerEnergy(0.0),
        ramp: None,
    };
    let solar = Unit {
        id: "solar1".into(),
        kind: UnitType::Pv,
        power: Power(40.0),
        vc: MoneyPerEnergy(0.0),
        ramp: None,
    };
    units.insert(wind.id.clone(), wind);
    units.insert(solar.id.clone(), solar);
    Model::new(units, profiles, parameters).unwrap()
}
