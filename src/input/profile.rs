//! Code for reading hourly profiles from the profiles file.
use super::{deserialise_proportion, input_err_msg, read_vec_from_csv};
use crate::horizon::{Horizon, Hour};
use crate::profile::{Profile, ProfileKind, ProfileMap};
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// The name of the profiles file within a model directory.
pub const PROFILES_FILE_NAME: &str = "profiles.csv";

/// Represents a single row of the profiles CSV file.
#[derive(PartialEq, Debug, Deserialize)]
struct ProfileRow {
    profile: ProfileKind,
    hour: Hour,
    #[serde(deserialize_with = "deserialise_proportion")]
    fraction: Dimensionless,
}

/// Read profiles from the profiles file in the specified model directory.
///
/// Each profile present in the file must have exactly one fraction for every
/// hour of the horizon.
pub fn read_profiles(model_dir: &Path, horizon: Horizon) -> Result<ProfileMap> {
    let file_path = model_dir.join(PROFILES_FILE_NAME);
    let profiles_csv = read_vec_from_csv(&file_path)?;
    read_profiles_from_iter(profiles_csv.into_iter(), horizon)
        .with_context(|| input_err_msg(&file_path))
}

fn read_profiles_from_iter<I>(iter: I, horizon: Horizon) -> Result<ProfileMap>
where
    I: Iterator<Item = ProfileRow>,
{
    let mut fractions: IndexMap<ProfileKind, Vec<Option<Dimensionless>>> = IndexMap::new();
    for row in iter {
        ensure!(
            horizon.contains(row.hour),
            "Profile '{}': hour {} is outside the horizon",
            row.profile,
            row.hour
        );

        let slots = fractions
            .entry(row.profile)
            .or_insert_with(|| vec![None; horizon.periods()]);
        let slot = &mut slots[row.hour.index()];
        ensure!(
            slot.is_none(),
            "Profile '{}': duplicate entry for hour {}",
            row.profile,
            row.hour
        );
        *slot = Some(row.fraction);
    }

    let mut profiles = ProfileMap::new();
    for (kind, slots) in fractions {
        let values = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.with_context(|| {
                    format!("Profile '{kind}': missing entry for hour {}", index + 1)
                })
            })
            .collect::<Result<Vec<_>>>()?;
        profiles.insert(kind, Profile::new(values, horizon)?);
    }

    Ok(profiles)
}
