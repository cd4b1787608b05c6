// Survey reports are flat text printed by the CMM software. Each measured feature is a
// free-text label line followed, some lines later, by one line per fitted quantity:
//
//   L1 Hole Ball
//   X Location     12.3456    mm
//   Y Location     -0.1234    mm
//   Z Location     101.000    mm
//
// Plane fits add `XY Angle` and `Elevation Angle` lines in degrees. The value is
// always the third whitespace-separated token. How many lines separate the
// label from its first value depends on the kind of fit the instrument ran, so that
// offset lives in a BlockLayout instead of at each call site.
use fxhash::FxHashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::error::{GeometryError, ReportError};
use super::vector::{normal_vector, Plane, Point3};

const X_LOCATION: &str = "X Location";
const Y_LOCATION: &str = "Y Location";
const Z_LOCATION: &str = "Z Location";
const XY_ANGLE: &str = "XY Angle";
const ELEVATION: &str = "Elevation";

const VALUE_TOKEN: usize = 2;

/// Where the data block of a measured feature sits relative to its label line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub offset: usize,
    pub window: usize,
}

impl BlockLayout {
    pub const DEFAULT_WINDOW: usize = 15;

    /// Sphere fits (balls, fiducial marks): values start on the line after the label
    pub const BALL: BlockLayout = BlockLayout {
        offset: 1,
        window: Self::DEFAULT_WINDOW,
    };

    /// Cylinder fits (pins): three lines of fit summary precede the values
    pub const PIN: BlockLayout = BlockLayout {
        offset: 4,
        window: Self::DEFAULT_WINDOW,
    };

    /// Plane fits: the per-point deviation table (19 lines) precedes the values
    pub const PLANE: BlockLayout = BlockLayout {
        offset: 20,
        window: Self::DEFAULT_WINDOW,
    };
}

/// A labelled feature and the layout of its data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementBlock {
    pub label: String,
    pub layout: BlockLayout,
}

impl MeasurementBlock {
    pub fn new(label: impl Into<String>, layout: BlockLayout) -> Self {
        Self {
            label: label.into(),
            layout,
        }
    }
}

/// The quantities found in one data block. Anything not present in the window stays
/// None; angles are in radians.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    pub label: String,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub xy_angle: Option<f64>,
    pub elevation: Option<f64>,
}

impl Measurement {
    /// The measured location. Fails if any coordinate was not found.
    pub fn point(&self) -> Result<Point3, GeometryError> {
        let x = self
            .x
            .ok_or_else(|| GeometryError::NotACoordinate(self.label.clone(), X_LOCATION))?;
        let y = self
            .y
            .ok_or_else(|| GeometryError::NotACoordinate(self.label.clone(), Y_LOCATION))?;
        let z = self
            .z
            .ok_or_else(|| GeometryError::NotACoordinate(self.label.clone(), Z_LOCATION))?;
        Ok(Point3::new(x, y, z))
    }

    /// The measured plane (location plus normal from the two angles)
    pub fn plane(&self) -> Result<Plane, GeometryError> {
        let origin = self.point()?;
        let azimuth = self
            .xy_angle
            .ok_or_else(|| GeometryError::NotAPlane(self.label.clone(), XY_ANGLE))?;
        let elevation = self
            .elevation
            .ok_or_else(|| GeometryError::NotAPlane(self.label.clone(), ELEVATION))?;
        Ok(Plane::new(origin, normal_vector(azimuth, elevation)))
    }
}

/// The lines of one survey report, read once
#[derive(Debug, Clone)]
pub struct SurveyReport {
    name: String,
    lines: Vec<String>,
}

impl SurveyReport {
    /// Read a survey report from disk
    pub fn open(path: &Path) -> Result<Self, ReportError> {
        if !path.exists() {
            return Err(ReportError::BadFilePath(PathBuf::from(path)));
        }
        let mut contents = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut contents)?;
        Ok(Self::from_text(&path.to_string_lossy(), &contents))
    }

    /// Wrap report text that did not come from a file
    pub fn from_text(name: &str, contents: &str) -> Self {
        Self {
            name: String::from(name),
            lines: contents.lines().map(String::from).collect(),
        }
    }

    /// Open the report backing a frame holder.
    ///
    /// Without a path the holder is a zero-valued stub; that is allowed (tests and
    /// hand-composed fixtures use it) but worth a warning.
    pub fn open_for(path: Option<&Path>, holder: &str) -> Result<Option<Self>, ReportError> {
        match path {
            Some(p) => Ok(Some(Self::open(p)?)),
            None => {
                log::warn!("No survey file given for {holder}; all of its features are zero");
                Ok(None)
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line index of the first line starting with each label.
    ///
    /// Leading whitespace is skipped, so `Ori Ball` never matches `Matt Ori Ball`. Later
    /// occurrences of a label are ignored. Labels that never occur are simply absent from
    /// the map.
    pub fn find_names(&self, labels: &[&str]) -> FxHashMap<String, usize> {
        let mut found: FxHashMap<String, usize> = FxHashMap::default();
        for (idx, line) in self.lines.iter().enumerate() {
            let line = line.trim_start();
            for label in labels {
                if !found.contains_key(*label) && line.starts_with(label) {
                    found.insert(String::from(*label), idx);
                }
            }
            if found.len() == labels.len() {
                break;
            }
        }
        found
    }

    /// Extract the fitted quantities from `window` lines starting at `start_line`.
    ///
    /// The window is clipped at the end of the report. If a quantity appears more than
    /// once in the window, the first one wins.
    pub fn find_coords(&self, start_line: usize, window: usize) -> Result<Measurement, ReportError> {
        let mut measurement = Measurement::default();
        let stop = (start_line + window).min(self.lines.len());
        if start_line >= stop {
            return Ok(measurement);
        }

        for (idx, line) in self.lines[start_line..stop].iter().enumerate() {
            let slot = if line.contains(X_LOCATION) {
                &mut measurement.x
            } else if line.contains(Y_LOCATION) {
                &mut measurement.y
            } else if line.contains(Z_LOCATION) {
                &mut measurement.z
            } else if line.contains(XY_ANGLE) {
                &mut measurement.xy_angle
            } else if line.contains(ELEVATION) {
                &mut measurement.elevation
            } else {
                continue;
            };
            if slot.is_some() {
                continue;
            }

            let value: f64 = line
                .split_whitespace()
                .nth(VALUE_TOKEN)
                .and_then(|token| token.parse().ok())
                .ok_or_else(|| ReportError::BadValue {
                    line: start_line + idx + 1,
                    report: self.name.clone(),
                    text: line.clone(),
                })?;
            *slot = Some(value);
        }

        // Reports print angles in degrees
        measurement.xy_angle = measurement.xy_angle.map(f64::to_radians);
        measurement.elevation = measurement.elevation.map(f64::to_radians);
        Ok(measurement)
    }

    /// Locate a labelled block and read its data
    pub fn measure(&self, block: &MeasurementBlock) -> Result<Measurement, ReportError> {
        let names = self.find_names(&[block.label.as_str()]);
        let line = names
            .get(&block.label)
            .ok_or_else(|| ReportError::LabelNotFound {
                label: block.label.clone(),
                report: self.name.clone(),
            })?;
        log::debug!("Found {:?} on line {} of {}", block.label, line + 1, self.name);
        let mut measurement = self.find_coords(line + block.layout.offset, block.layout.window)?;
        measurement.label = block.label.clone();
        Ok(measurement)
    }

    /// Shorthand for a block that must hold a full coordinate
    pub fn measure_point(&self, block: &MeasurementBlock) -> Result<Point3, GeometryError> {
        Ok(self.measure(block)?.point()?)
    }

    /// Shorthand for a block that must hold a full plane
    pub fn measure_plane(&self, block: &MeasurementBlock) -> Result<Plane, GeometryError> {
        Ok(self.measure(block)?.plane()?)
    }
}
