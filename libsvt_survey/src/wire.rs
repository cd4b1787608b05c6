use std::path::Path;

use super::error::GeometryError;
use super::frame::Frame;
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::{Plane, Point3};

const WIRE_START: &str = "Wire Start";
const WIRE_END: &str = "Wire End";

/// A reference wire stretched across a fixture, measured at both ends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wire {
    start: Point3,
    end: Point3,
}

impl Wire {
    pub fn new(path: Option<&Path>) -> Result<Self, GeometryError> {
        let mut wire = Self {
            start: Point3::zeros(),
            end: Point3::zeros(),
        };
        if let Some(report) = SurveyReport::open_for(path, "wire")? {
            wire.start = report.measure_point(&MeasurementBlock::new(WIRE_START, BlockLayout::BALL))?;
            wire.end = report.measure_point(&MeasurementBlock::new(WIRE_END, BlockLayout::BALL))?;
        }
        Ok(wire)
    }

    pub fn start(&self) -> Point3 {
        self.start
    }

    pub fn end(&self) -> Point3 {
        self.end
    }

    pub fn set_start(&mut self, point: Point3) {
        self.start = point;
    }

    pub fn set_end(&mut self, point: Point3) {
        self.end = point;
    }

    /// Wire frame on a reference plane: u along the wire, v along the plane normal
    pub fn get_basis(&self, plane: &Plane) -> Frame {
        Frame::on_plane(&self.start, &self.end, plane)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::{Matrix3, Vector3};

    #[test]
    fn test_wire_from_report() {
        let path = std::env::temp_dir().join("svt_survey_wire.txt");
        let text = "\
Wire Start
X Location     0.0     mm
Y Location     0.0     mm
Z Location     1.0     mm
Wire End
X Location     10.0     mm
Y Location     2.0     mm
Z Location     3.0     mm
";
        std::fs::write(&path, text).unwrap();
        let wire = Wire::new(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(wire.start(), Point3::new(0.0, 0.0, 1.0));
        assert_eq!(wire.end(), Point3::new(10.0, 2.0, 3.0));

        // Both ends land on the same height once projected onto the tilted plane
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let plane = Plane::new(Point3::zeros(), Vector3::new(0.0, 1.0, 1.0));
        let basis = wire.get_basis(&plane);
        assert_abs_diff_eq!(basis.origin, Point3::new(0.0, -0.5, 0.5), epsilon = 1e-12);
        let expected = Matrix3::new(1.0, 0.0, 0.0, 0.0, s, s, 0.0, -s, s);
        assert_abs_diff_eq!(basis.axes, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_wire_setters() {
        let mut wire = Wire::new(None).unwrap();
        assert_eq!(wire.start(), Point3::zeros());
        assert_eq!(wire.end(), Point3::zeros());
        wire.set_start(Point3::new(2.0, 3.0, 0.0));
        wire.set_end(Point3::new(2.0, 8.0, 0.0));
        let basis = wire.get_basis(&Plane::new(Point3::zeros(), Vector3::new(0.0, 0.0, 1.0)));
        assert_eq!(basis.origin, Point3::new(2.0, 3.0, 0.0));
        let expected = Matrix3::new(0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0);
        assert_abs_diff_eq!(basis.axes, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_wire_end() {
        let path = std::env::temp_dir().join("svt_survey_wire_no_end.txt");
        std::fs::write(&path, "Wire Start\nX Location 0.0 mm\nY Location 0.0 mm\nZ Location 0.0 mm\n")
            .unwrap();
        let result = Wire::new(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
