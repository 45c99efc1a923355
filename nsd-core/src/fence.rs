use crate::error::{Result, SnowDriftError};
use nsd_utils::units::kg_to_tonnes;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Exponent of the storage capacity relation Qc = factor * H^2.2.
const HEIGHT_EXPONENT: f64 = 2.2;

/// Snow fence designs with a known storage capacity relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FenceType {
    Wyoming,
    SlatAndWire,
    Solid,
}

impl FenceType {
    pub const ALL: [FenceType; 3] = [FenceType::Wyoming, FenceType::SlatAndWire, FenceType::Solid];

    /// Storage capacity factor in tonnes/m for a 1 m fence.
    pub fn capacity_factor(self) -> f64 {
        match self {
            FenceType::Wyoming => 8.5,
            FenceType::SlatAndWire => 7.7,
            FenceType::Solid => 2.9,
        }
    }

    /// Fence height (m) able to store `qt` kg/m of drifting snow.
    pub fn required_height(self, qt: f64) -> f64 {
        (kg_to_tonnes(qt) / self.capacity_factor()).powf(1.0 / HEIGHT_EXPONENT)
    }
}

impl fmt::Display for FenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenceType::Wyoming => write!(f, "Wyoming"),
            FenceType::SlatAndWire => write!(f, "Slat-and-wire"),
            FenceType::Solid => write!(f, "Solid"),
        }
    }
}

impl FromStr for FenceType {
    type Err = SnowDriftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wyoming" => Ok(FenceType::Wyoming),
            "slat-and-wire" | "slat and wire" => Ok(FenceType::SlatAndWire),
            "solid" => Ok(FenceType::Solid),
            other => Err(SnowDriftError::InvalidParameter(format!(
                "unsupported fence type '{other}', choose 'Wyoming', 'Slat-and-wire' or 'Solid'"
            ))),
        }
    }
}

/// Required fence height (m) for a transport of `qt` kg/m and a fence type name.
pub fn fence_height(qt: f64, fence_type: &str) -> Result<f64> {
    let fence: FenceType = fence_type.parse()?;
    Ok(fence.required_height(qt))
}
