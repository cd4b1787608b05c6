//! Identifiers for the physical features named in survey reports.
//!
//! Every identifier parses from the token used in reports and configuration files. An
//! unrecognized token is an invalid-argument error; there is never a silent default.
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use super::error::IdError;

/// Detector half. The ball layout of the U-channel mirrors between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Volume {
    Top,
    Bottom,
}

impl Volume {
    pub const ALL: [Volume; 2] = [Volume::Top, Volume::Bottom];

    /// Single letter suffix used in compact geometry names
    pub fn suffix(&self) -> char {
        match self {
            Self::Top => 't',
            Self::Bottom => 'b',
        }
    }
}

impl FromStr for Volume {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" | "bot" => Ok(Self::Bottom),
            _ => Err(IdError::Volume(s.to_string())),
        }
    }
}

impl Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
        }
    }
}

/// Front tracker layer mounted on the U-channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Layer {
    L1,
    L2,
    L3,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::L1, Layer::L2, Layer::L3];

    pub fn number(&self) -> u8 {
        match self {
            Self::L1 => 1,
            Self::L2 => 2,
            Self::L3 => 3,
        }
    }
}

impl TryFrom<u8> for Layer {
    type Error = IdError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::L1),
            2 => Ok(Self::L2),
            3 => Ok(Self::L3),
            _ => Err(IdError::Layer(value)),
        }
    }
}

impl From<Layer> for u8 {
    fn from(value: Layer) -> Self {
        value.number()
    }
}

impl FromStr for Layer {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_start_matches(['L', 'l']);
        let number: u8 = trimmed
            .parse()
            .map_err(|_| IdError::LayerToken(s.to_string()))?;
        Self::try_from(number)
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "L{}", self.number())
    }
}

/// Hole or slot side of a ball or pin pair (the ball/pin "type")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Hole,
    Slot,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Hole, Side::Slot];
}

impl FromStr for Side {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hole" => Ok(Self::Hole),
            "slot" => Ok(Self::Slot),
            _ => Err(IdError::FeatureType(s.to_string())),
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hole => write!(f, "Hole"),
            Self::Slot => write!(f, "Slot"),
        }
    }
}

/// The three reference balls of a module fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureBall {
    Ori,
    Axi,
    Diag,
}

impl FixtureBall {
    pub const ALL: [FixtureBall; 3] = [FixtureBall::Ori, FixtureBall::Axi, FixtureBall::Diag];
}

impl FromStr for FixtureBall {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_end_matches("ball") {
            "ori" => Ok(Self::Ori),
            "axi" => Ok(Self::Axi),
            "diag" => Ok(Self::Diag),
            _ => Err(IdError::FixtureBall(s.to_string())),
        }
    }
}

impl Display for FixtureBall {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ori => write!(f, "Ori"),
            Self::Axi => write!(f, "Axi"),
            Self::Diag => write!(f, "Diag"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Axial,
    Stereo,
}

impl SensorKind {
    pub const ALL: [SensorKind; 2] = [SensorKind::Axial, SensorKind::Stereo];
}

impl FromStr for SensorKind {
    type Err = IdError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "axial" => Ok(Self::Axial),
            "stereo" => Ok(Self::Stereo),
            _ => Err(IdError::SensorKind(s.to_string())),
        }
    }
}

impl Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Axial => write!(f, "axial"),
            Self::Stereo => write!(f, "stereo"),
        }
    }
}

/// Detector configuration by run year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DetectorYear {
    Y2016,
    Y2019,
}

impl DetectorYear {
    /// The 2019 upgrade seats layer 1 on a transition fixture instead of the U-channel pins
    pub fn has_transition(&self, layer: Layer) -> bool {
        matches!((self, layer), (Self::Y2019, Layer::L1))
    }
}

impl TryFrom<u32> for DetectorYear {
    type Error = IdError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2016 => Ok(Self::Y2016),
            2019 => Ok(Self::Y2019),
            _ => Err(IdError::Year(value)),
        }
    }
}

impl From<DetectorYear> for u32 {
    fn from(value: DetectorYear) -> Self {
        match value {
            DetectorYear::Y2016 => 2016,
            DetectorYear::Y2019 => 2019,
        }
    }
}

impl Display for DetectorYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u32::from(*self))
    }
}
