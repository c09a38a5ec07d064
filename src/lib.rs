//! Common functionality for the ucsched unit-commitment scheduler.
#![warn(missing_docs)]
pub mod cli;
pub mod horizon;
pub mod input;
pub mod log;
pub mod model;
pub mod optimisation;
pub mod output;
pub mod parameters;
pub mod profile;
pub mod settings;
pub mod unit;
pub mod units;

#[cfg(test)]
mod fixture;
