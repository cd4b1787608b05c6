use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::error::WriterError;
use super::ids::DetectorYear;
use super::survey::{SensorPlacement, SurveyVolume};
use super::vector::Point3;

/// Version of the constants layout
const FORMAT_VERSION: &str = "1.0";
const AXIS_NAMES: [&str; 3] = ["X", "Y", "Z"];
const CSV_HEADER: &str =
    "sensor, hpsx, hpsy, hpsz, svtx, svty, svtz, ux,uy,uz, vx,vy,vz, wx,wy,wz";

/// Values that print as zero at six decimals are written as 0, never -0
fn clean(value: f64) -> f64 {
    if value.abs() < 5e-7 {
        0.0
    } else {
        value
    }
}

fn xyz(point: &Point3) -> String {
    format!(
        "x=\"{:.6}\" y=\"{:.6}\" z=\"{:.6}\"",
        clean(point.x),
        clean(point.y),
        clean(point.z)
    )
}

fn csv_triplet(point: &Point3) -> String {
    format!(
        "{:.6},{:.6},{:.6}",
        clean(point.x),
        clean(point.y),
        clean(point.z)
    )
}

/// Writes the survey volumes in the tag format read by the compact detector description.
///
/// Consumers match on the literal tag and attribute names; this is not validated XML.
#[derive(Debug)]
pub struct ConstantsWriter {
    file: BufWriter<File>,
    path: PathBuf,
    volumes_written: usize,
}
// Structure
// <!-- header comments -->
// <SurveyVolume name desc>
// |---- <origin x y z />
// |---- <unitvec name="X" x y z />
// |---- <unitvec name="Y" x y z />
// |---- <unitvec name="Z" x y z />
// </SurveyVolume>

impl ConstantsWriter {
    /// Create the writer, opening a file at path and writing the header
    pub fn new(path: &Path, year: DetectorYear) -> Result<Self, WriterError> {
        let mut file = BufWriter::new(File::create(path)?);
        let generated = OffsetDateTime::now_utc().format(&Rfc3339)?;
        writeln!(file, "<!-- SVT survey constants for the {year} detector -->")?;
        writeln!(
            file,
            "<!-- generated {generated} by {}:{FORMAT_VERSION} -->",
            env!("CARGO_PKG_NAME")
        )?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
            volumes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_volume(&mut self, volume: &SurveyVolume) -> Result<(), WriterError> {
        writeln!(
            self.file,
            "<SurveyVolume name=\"{}\" desc=\"{}\">",
            volume.name, volume.desc
        )?;
        writeln!(self.file, "    <origin {} />", xyz(&volume.frame.origin))?;
        let axes = [volume.frame.u(), volume.frame.v(), volume.frame.w()];
        for (name, axis) in AXIS_NAMES.iter().zip(axes.iter()) {
            writeln!(self.file, "    <unitvec name=\"{name}\" {} />", xyz(axis))?;
        }
        writeln!(self.file, "</SurveyVolume>")?;
        self.volumes_written += 1;
        Ok(())
    }

    /// Flush and close the file, returning the number of volumes written
    pub fn close(mut self) -> Result<usize, WriterError> {
        self.file.flush()?;
        Ok(self.volumes_written)
    }
}

/// Flat CSV dump of the sensor placements for spreadsheets and plotting
#[derive(Debug)]
pub struct CsvWriter {
    file: BufWriter<File>,
    rows_written: usize,
}

impl CsvWriter {
    pub fn new(path: &Path) -> Result<Self, WriterError> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "{CSV_HEADER}")?;
        Ok(Self {
            file,
            rows_written: 0,
        })
    }

    pub fn write_placement(&mut self, placement: &SensorPlacement) -> Result<(), WriterError> {
        let frame = &placement.frame_ball;
        writeln!(
            self.file,
            "{}, {}, {}, {},{},{}",
            placement.name,
            csv_triplet(&placement.origin_ball),
            csv_triplet(&placement.origin_pin),
            csv_triplet(&frame.u()),
            csv_triplet(&frame.v()),
            csv_triplet(&frame.w()),
        )?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn close(mut self) -> Result<usize, WriterError> {
        self.file.flush()?;
        Ok(self.rows_written)
    }
}
