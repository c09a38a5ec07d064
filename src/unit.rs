//! Units: the plants, loads and stores that make up a fleet.
use crate::profile::ProfileKind;
use crate::units::{MoneyPerEnergy, Power};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};
use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

/// Upper input bound for capacities and variable costs.
pub const MAX_INPUT_VALUE: f64 = 1500.0;

/// Minimum length of a unit name.
pub const MIN_NAME_LENGTH: usize = 3;

/// A unique unit identifier.
#[derive(Clone, Hash, PartialEq, Eq, Deserialize, Debug, Serialize)]
pub struct UnitId(pub Rc<str>);

impl UnitId {
    /// Create a new ID from a string slice.
    pub fn new(id: &str) -> Self {
        UnitId(Rc::from(id))
    }
}

impl Borrow<str> for UnitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        UnitId(Rc::from(s))
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        UnitId(Rc::from(s))
    }
}

/// The role a unit plays in the system.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    SerializeLabeledStringEnum,
    DeserializeLabeledStringEnum,
)]
pub enum UnitType {
    /// Coal-fired thermal plant
    #[string = "coal"]
    Coal,
    /// Gas-fired thermal plant
    #[string = "gas"]
    Gas,
    /// Nuclear thermal plant
    #[string = "nuclear"]
    Nuclear,
    /// A load following the demand profile
    #[string = "demand"]
    Demand,
    /// Wind generation following the wind profile
    #[string = "wind"]
    Wind,
    /// Solar generation following the pv profile
    #[string = "pv"]
    Pv,
    /// A battery store
    #[string = "battery"]
    Battery,
}

impl UnitType {
    /// Whether units of this type are dispatchable thermal plants.
    pub fn is_thermal(self) -> bool {
        matches!(self, Self::Coal | Self::Gas | Self::Nuclear)
    }

    /// The profile, if any, that drives units of this type.
    pub fn profile_kind(self) -> Option<ProfileKind> {
        match self {
            Self::Demand => Some(ProfileKind::Demand),
            Self::Wind => Some(ProfileKind::Wind),
            Self::Pv => Some(ProfileKind::Pv),
            _ => None,
        }
    }
}

/// A single unit in the fleet.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// A unique identifier for the unit
    pub id: UnitId,
    /// The role the unit plays in the system
    pub kind: UnitType,
    /// Nameplate capacity in MW.
    ///
    /// For demand units this is the peak load the demand profile scales.
    pub power: Power,
    /// Variable cost per `MWh` produced (for batteries, per `MWh` charged)
    pub vc: MoneyPerEnergy,
    /// Maximum hourly power swing in MW. Thermal plants only.
    pub ramp: Option<Power>,
}

/// An ordered map of units, keyed by ID.
pub type UnitMap = IndexMap<UnitId, Unit>;

/// Check the fields of a single unit.
///
/// Fleet-level requirements (non-empty, at least one demand unit, unique IDs)
/// are checked when the model is assembled.
pub fn check_unit(unit: &Unit) -> Result<()> {
    ensure!(
        unit.id.0.len() >= MIN_NAME_LENGTH,
        "Unit name '{}' is shorter than {} characters",
        unit.id,
        MIN_NAME_LENGTH
    );

    let power = unit.power.value();
    ensure!(
        power.is_finite() && (0.0..=MAX_INPUT_VALUE).contains(&power),
        "Unit {}: power must be between 0 and {MAX_INPUT_VALUE} MW",
        unit.id
    );

    let vc = unit.vc.value();
    ensure!(
        vc.is_finite() && (0.0..=MAX_INPUT_VALUE).contains(&vc),
        "Unit {}: vc must be between 0 and {MAX_INPUT_VALUE}",
        unit.id
    );

    if unit.kind.is_thermal() {
        let ramp = unit
            .ramp
            .with_context(|| format!("Thermal unit {} is missing a ramp limit", unit.id))?;
        let ramp = ramp.value();
        ensure!(
            ramp.is_finite() && (0.0..=MAX_INPUT_VALUE).contains(&ramp),
            "Unit {}: ramp must be between 0 and {MAX_INPUT_VALUE} MW",
            unit.id
        );
    }

    // Cost slopes and storable volume both divide by capacity
    if unit.kind.is_thermal() || unit.kind == UnitType::Battery {
        ensure!(
            power > 0.0,
            "Unit {}: {} units need a positive capacity",
            unit.id,
            unit.kind
        );
    }

    Ok(())
}

/// Partitioned views of a fleet, by unit role.
///
/// Borrowed from the unit map; the map itself is never mutated.
#[derive(Debug, Clone)]
pub struct Fleet<'a> {
    /// Dispatchable thermal plants (coal, gas, nuclear)
    pub thermal: Vec<&'a Unit>,
    /// Demand units
    pub demand: Vec<&'a Unit>,
    /// Wind generation units
    pub wind: Vec<&'a Unit>,
    /// Solar generation units
    pub pv: Vec<&'a Unit>,
    /// Battery stores
    pub battery: Vec<&'a Unit>,
}

impl<'a> Fleet<'a> {
    /// Partition `units` by role, preserving input order within each role.
    pub fn partition(units: &'a UnitMap) -> Self {
        let mut fleet = Fleet {
            thermal: Vec::new(),
            demand: Vec::new(),
            wind: Vec::new(),
            pv: Vec::new(),
            battery: Vec::new(),
        };
        for unit in units.values() {
            match unit.kind {
                UnitType::Coal | UnitType::Gas | UnitType::Nuclear => fleet.thermal.push(unit),
                UnitType::Demand => fleet.demand.push(unit),
                UnitType::Wind => fleet.wind.push(unit),
                UnitType::Pv => fleet.pv.push(unit),
                UnitType::Battery => fleet.battery.push(unit),
            }
        }

        fleet
    }
}
