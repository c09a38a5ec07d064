//! Hourly fraction profiles that drive demand, wind and pv units.
use crate::horizon::{Horizon, Hour};
use crate::units::Dimensionless;
use anyhow::{Result, ensure};
use indexmap::IndexMap;
use serde_string_enum::{DeserializeLabeledStringEnum, SerializeLabeledStringEnum};

/// The profile series a unit can follow.
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
pub enum ProfileKind {
    /// Scales demand units
    #[string = "demand"]
    Demand,
    /// Scales wind units
    #[string = "wind"]
    Wind,
    /// Scales pv units
    #[string = "pv"]
    Pv,
}

/// An hourly fraction series covering the whole horizon.
///
/// Each value scales the capacity of the units the profile drives, so all
/// values must lie in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    values: Vec<Dimensionless>,
}

impl Profile {
    /// Build a profile from per-hour fractions, checking length and range.
    pub fn new(values: Vec<Dimensionless>, horizon: Horizon) -> Result<Self> {
        ensure!(
            values.len() == horizon.periods(),
            "Profile must cover {} hours (got {})",
            horizon.periods(),
            values.len()
        );
        ensure!(
            values
                .iter()
                .all(|value| (0.0..=1.0).contains(&value.value())),
            "Profile fractions must be between 0 and 1"
        );

        Ok(Self { values })
    }

    /// A profile with the same fraction in every hour.
    pub fn flat(fraction: Dimensionless, horizon: Horizon) -> Result<Self> {
        Self::new(vec![fraction; horizon.periods()], horizon)
    }

    /// Whether the profile has a value for every hour of `horizon`.
    pub fn covers(&self, horizon: Horizon) -> bool {
        self.values.len() == horizon.periods()
    }

    /// The fraction for the given hour.
    pub fn value_at(&self, hour: Hour) -> Dimensionless {
        *self
            .values
            .get(hour.index())
            .expect("No profile value for hour")
    }
}

/// Profiles by kind.
pub type ProfileMap = IndexMap<ProfileKind, Profile>;

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[test]
    fn test_profile_wrong_length() {
        let horizon = Horizon::default();
        let result = Profile::new(vec![Dimensionless(0.5); 23], horizon);
        assert!(result.unwrap_err().to_string().contains("24 hours"));
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.1)]
    fn test_profile_fraction_out_of_range(#[case] fraction: f64) {
        let horizon = Horizon::default();
        let result = Profile::flat(Dimensionless(fraction), horizon);
        assert!(result.unwrap_err().to_string().contains("between 0 and 1"));
    }

    #[test]
    fn test_profile_value_at() {
        let horizon = Horizon::default();
        let mut values = vec![Dimensionless(0.0); 24];
        values[5] = Dimensionless(0.75);
        let profile = Profile::new(values, horizon).unwrap();
        assert_approx_eq!(f64, profile.value_at(Hour(6)).value(), 0.75);
        assert_approx_eq!(f64, profile.value_at(Hour(1)).value(), 0.0);
    }
}
