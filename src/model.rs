//! The model: a validated fleet, its profiles and the tunable parameters.
use crate::horizon::{Horizon, Hour};
use crate::input::profile::read_profiles;
use crate::input::unit::read_units;
use crate::parameters::Parameters;
use crate::profile::{Profile, ProfileKind, ProfileMap};
use crate::unit::{Fleet, Unit, UnitMap, UnitType, check_unit};
use crate::units::Power;
use anyhow::{Context, Result, ensure};
use std::path::Path;

/// A complete scheduling problem description.
///
/// Construction validates the parts against each other, so downstream code
/// can rely on every profile-driven unit having its profile and on every
/// thermal plant having a ramp limit.
#[derive(Debug, Clone)]
pub struct Model {
    /// The fleet of units to schedule
    pub units: UnitMap,
    /// Hourly fraction profiles, by kind
    pub profiles: ProfileMap,
    /// Tunable model constants
    pub parameters: Parameters,
    /// The hourly periods the schedule covers
    pub horizon: Horizon,
}

impl Model {
    /// Assemble a model from its parts, validating them against each other.
    pub fn new(units: UnitMap, profiles: ProfileMap, parameters: Parameters) -> Result<Model> {
        parameters.validate()?;
        let horizon = Horizon::new(parameters.periods)?;
        let model = Model {
            units,
            profiles,
            parameters,
            horizon,
        };
        model.validate()?;

        Ok(model)
    }

    /// Read a model from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model input files
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
        let model_dir = model_dir.as_ref();
        ensure!(
            model_dir.is_dir(),
            "Model directory {} not found",
            model_dir.display()
        );

        let parameters = Parameters::from_path(model_dir)?;
        let horizon = Horizon::new(parameters.periods)?;
        let units = read_units(model_dir)?;
        let profiles = read_profiles(model_dir, horizon)?;

        Model::new(units, profiles, parameters)
    }

    /// The fleet partitioned by unit role.
    pub fn fleet(&self) -> Fleet<'_> {
        Fleet::partition(&self.units)
    }

    /// The profile of the given kind.
    ///
    /// Panics if the profile is missing, which validation rules out for every
    /// kind a unit in the fleet actually uses.
    pub fn profile(&self, kind: ProfileKind) -> &Profile {
        self.profiles.get(&kind).expect("No profile for kind")
    }

    /// The power a profile-driven unit draws or produces in the given hour.
    ///
    /// Panics if the unit's role has no profile, so only call this for
    /// demand, wind and solar units.
    pub fn scaled_power(&self, unit: &Unit, hour: Hour) -> Power {
        let kind = unit.kind.profile_kind().expect("Unit has no profile");
        self.profile(kind).value_at(hour) * unit.power
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.units.is_empty(), "Model contains no units");
        ensure!(
            self.units.values().any(|unit| unit.kind == UnitType::Demand),
            "Model needs at least one demand unit"
        );

        // Units may have been built directly rather than read from a file
        for unit in self.units.values() {
            check_unit(unit)?;
        }

        for unit in self.units.values() {
            let Some(kind) = unit.kind.profile_kind() else {
                continue;
            };
            let profile = self
                .profiles
                .get(&kind)
                .with_context(|| format!("Unit {}: no '{kind}' profile found", unit.id))?;
            ensure!(
                profile.covers(self.horizon),
                "Profile '{kind}' does not cover the {} hour horizon",
                self.horizon.periods()
            );
        }

        Ok(())
    }
}
