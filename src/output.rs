//! The module responsible for writing output data to disk.
use crate::horizon::Hour;
use crate::optimisation::Schedule;
use crate::unit::UnitId;
use crate::units::Power;
use anyhow::{Context, Result};
use csv;
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "ucsched_results";

/// The output file name for the power schedule
const SCHEDULE_FILE_NAME: &str = "schedule.csv";

/// The output file name for commitment decisions
const COMMITMENT_FILE_NAME: &str = "commitment.csv";

/// The output file name for raw decision variables
const VARIABLES_FILE_NAME: &str = "debug_variables.csv";

/// Get the output folder for the model specified at `model_dir`.
///
/// The folder is named after the model directory and placed under
/// [`OUTPUT_DIRECTORY_ROOT`] in the working directory.
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let model_dir = model_dir
        .canonicalize()
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory at `output_dir`.
///
/// If the directory already exists it is kept, or wiped and recreated when
/// `overwrite` is given. Returns whether an existing directory was wiped.
pub fn create_output_directory(output_dir: &Path, overwrite: bool) -> Result<bool> {
    let existed = output_dir.is_dir();
    if existed {
        if !overwrite {
            return Ok(false);
        }
        fs::remove_dir_all(output_dir)?;
    }

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(existed)
}

/// Represents a row in the schedule CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct ScheduleRow {
    unit: UnitId,
    hour: Hour,
    power: Power,
}

/// Represents a row in the commitment CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CommitmentRow {
    unit: UnitId,
    hour: Hour,
    on: bool,
    change_state: i8,
}

/// Represents a row in the raw decision variables CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct VariableRow {
    family: String,
    unit: UnitId,
    hour: Hour,
    segment: Option<usize>,
    value: f64,
}

/// For writing extra debug information about the solution
struct DebugDataWriter {
    variables_writer: csv::Writer<File>,
}

impl DebugDataWriter {
    /// Open CSV files to write debug info to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    fn create(output_path: &Path) -> Result<Self> {
        let file_path = output_path.join(VARIABLES_FILE_NAME);
        Ok(Self {
            variables_writer: csv::Writer::from_path(file_path)?,
        })
    }

    /// Write every raw decision variable to file
    fn write_variables(&mut self, schedule: &Schedule) -> Result<()> {
        for row in schedule.trace() {
            self.variables_writer.serialize(VariableRow {
                family: row.family.to_string(),
                unit: row.unit.clone(),
                hour: row.hour,
                segment: row.segment,
                value: row.value,
            })?;
        }

        Ok(())
    }

    /// Flush the underlying stream
    fn flush(&mut self) -> Result<()> {
        self.variables_writer.flush()?;

        Ok(())
    }
}

/// An object for writing schedule results to file
pub struct DataWriter {
    schedule_writer: csv::Writer<File>,
    commitment_writer: csv::Writer<File>,
    debug_writer: Option<DebugDataWriter>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `save_debug_info` - Whether to include an extra CSV file of raw variables
    pub fn create(output_path: &Path, save_debug_info: bool) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        let debug_writer = if save_debug_info {
            Some(DebugDataWriter::create(output_path)?)
        } else {
            None
        };

        Ok(Self {
            schedule_writer: new_writer(SCHEDULE_FILE_NAME)?,
            commitment_writer: new_writer(COMMITMENT_FILE_NAME)?,
            debug_writer,
        })
    }

    /// Write the power schedule and commitment decisions to CSV files
    pub fn write_schedule(&mut self, schedule: &Schedule) -> Result<()> {
        for (unit_id, series) in &schedule.power {
            for (hour, power) in series {
                self.schedule_writer.serialize(ScheduleRow {
                    unit: unit_id.clone(),
                    hour: *hour,
                    power: *power,
                })?;
            }
        }

        for (unit_id, series) in &schedule.commitment {
            for (hour, state) in series {
                self.commitment_writer.serialize(CommitmentRow {
                    unit: unit_id.clone(),
                    hour: *hour,
                    on: state.on,
                    change_state: state.change_state,
                })?;
            }
        }

        if let Some(wtr) = &mut self.debug_writer {
            wtr.write_variables(schedule)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.schedule_writer.flush()?;
        self.commitment_writer.flush()?;
        if let Some(wtr) = &mut self.debug_writer {
            wtr.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::model;
    use crate::model::Model;
    use crate::optimisation::{SolveOptions, perform_unit_commitment};
    use itertools::Itertools;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_schedule(model: Model) {
        let outcome = perform_unit_commitment(&model, &SolveOptions::default());
        let schedule = outcome.schedule().unwrap();
        let dir = tempdir().unwrap();

        // Write the schedule
        {
            let mut writer = DataWriter::create(dir.path(), true).unwrap();
            writer.write_schedule(schedule).unwrap();
            writer.flush().unwrap();
        }

        // Read back and compare
        let records: Vec<ScheduleRow> = csv::Reader::from_path(dir.path().join(SCHEDULE_FILE_NAME))
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap();
        assert_eq!(records.len(), 24);
        assert!(records.iter().all(|row| row.unit == "plant1".into()));

        let records: Vec<CommitmentRow> =
            csv::Reader::from_path(dir.path().join(COMMITMENT_FILE_NAME))
                .unwrap()
                .into_deserialize()
                .try_collect()
                .unwrap();
        assert_eq!(records.len(), 24);

        let records: Vec<VariableRow> = csv::Reader::from_path(dir.path().join(VARIABLES_FILE_NAME))
            .unwrap()
            .into_deserialize()
            .try_collect()
            .unwrap();
        assert_eq!(records.len(), schedule.trace().len());
    }

    #[rstest]
    fn test_write_schedule_no_debug(model: Model) {
        let outcome = perform_unit_commitment(&model, &SolveOptions::default());
        let schedule = outcome.schedule().unwrap();
        let dir = tempdir().unwrap();

        {
            let mut writer = DataWriter::create(dir.path(), false).unwrap();
            writer.write_schedule(schedule).unwrap();
            writer.flush().unwrap();
        }

        assert!(dir.path().join(SCHEDULE_FILE_NAME).is_file());
        assert!(!dir.path().join(VARIABLES_FILE_NAME).exists());
    }

    #[test]
    fn test_create_output_directory() {
        let dir = tempdir().unwrap();
        let output_dir = dir.path().join("results");

        // Fresh directory
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.is_dir());

        // Existing directory is kept unless overwrite is given
        fs::write(output_dir.join("marker"), "x").unwrap();
        assert!(!create_output_directory(&output_dir, false).unwrap());
        assert!(output_dir.join("marker").is_file());

        assert!(create_output_directory(&output_dir, true).unwrap());
        assert!(!output_dir.join("marker").exists());
    }
}
