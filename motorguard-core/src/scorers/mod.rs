//! Component Health Scorers
//!
//! ## Overview
//!
//! Three pure scorers turn the working dataset into per-domain health
//! scores: electrical (current, voltage), thermal (motor and ambient
//! temperature, humidity), and mechanical (shaft speed, load balance).
//! Each follows the same shape:
//!
//! 1. start at 100;
//! 2. for each measured quantity, subtract a tiered piecewise-linear
//!    penalty once it crosses a warning or critical boundary: a base
//!    amount at the boundary plus a capped linear term for the distance
//!    past it, so a worse measurement never scores better;
//! 3. clamp to `[floor, 100]`.
//!
//! ## Domain floors
//!
//! Floors are nonzero on purpose. A motor with a saturated temperature
//! probe but nominal electrics should read "thermal is very bad", not
//! "everything is zero": the weighted composite still has to rank this
//! motor against others, and a zero would erase the information the other
//! domains carry.
//!
//! ## Missing data
//!
//! A scorer with no usable input returns
//! [`HealthError::MissingData`](crate::errors::HealthError), never a
//! default 100. The aggregator excludes such domains and renormalizes;
//! treating absence as health is how silent sensor failures hide.

mod electrical;
mod mechanical;
mod thermal;
mod utils;

pub use electrical::ElectricalScorer;
pub use mechanical::MechanicalScorer;
pub use thermal::ThermalScorer;

use crate::arbiter::WorkingDataset;
use crate::errors::EngineResult;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Health domain a scorer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Electrical,
    Thermal,
    Mechanical,
    /// Oracle-backed predictive component; not produced by a scorer here.
    Predictive,
}

impl Domain {
    /// Stable lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Domain::Electrical => "electrical",
            Domain::Thermal => "thermal",
            Domain::Mechanical => "mechanical",
            Domain::Predictive => "predictive",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scored health domain, bounded to `[floor, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScore {
    /// Domain this score describes.
    pub domain: Domain,
    /// Score value in `[floor, 100]`.
    pub value: f32,
}

/// Interface every domain scorer implements.
///
/// Scorers are pure: same dataset in, same score out, no clock, no I/O.
pub trait HealthScorer {
    /// Domain this scorer covers.
    fn domain(&self) -> Domain;

    /// Lowest score this scorer may return.
    fn floor(&self) -> f32;

    /// Score the working dataset, or report that the domain has no usable
    /// input.
    fn score(&self, data: &WorkingDataset) -> EngineResult<ComponentScore>;
}
