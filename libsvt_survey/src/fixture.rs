use std::path::Path;

use super::error::GeometryError;
use super::frame::{Frame, FrameHolder};
use super::ids::FixtureBall;
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::Point3;

/// The three reference balls of a module fixture.
///
/// Labels are `{prefix}Ori Ball`, `{prefix}Axi Ball` and `{prefix}Diag Ball`; the prefix
/// lets one report carry the same balls for several measurement passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixture {
    oriball: Point3,
    axiball: Point3,
    diagball: Point3,
}

impl Fixture {
    pub fn new(path: Option<&Path>, prefix: &str) -> Result<Self, GeometryError> {
        let mut fixture = Self::stub();
        if let Some(report) = SurveyReport::open_for(path, &format!("{prefix}fixture balls"))? {
            for ball in FixtureBall::ALL {
                let block = MeasurementBlock::new(format!("{prefix}{ball} Ball"), BlockLayout::BALL);
                fixture.set_ball(ball, report.measure_point(&block)?);
            }
        }
        Ok(fixture)
    }

    fn stub() -> Self {
        Self {
            oriball: Point3::zeros(),
            axiball: Point3::zeros(),
            diagball: Point3::zeros(),
        }
    }

    pub fn get_ball(&self, ball: FixtureBall) -> Point3 {
        match ball {
            FixtureBall::Ori => self.oriball,
            FixtureBall::Axi => self.axiball,
            FixtureBall::Diag => self.diagball,
        }
    }

    pub fn set_ball(&mut self, ball: FixtureBall, point: Point3) {
        match ball {
            FixtureBall::Ori => self.oriball = point,
            FixtureBall::Axi => self.axiball = point,
            FixtureBall::Diag => self.diagball = point,
        }
    }
}

impl FrameHolder for Fixture {
    /// Origin on the oriball, u towards the axiball, v towards the diagball
    fn get_basis(&self) -> Result<Frame, GeometryError> {
        Ok(Frame::from_vectors(
            self.oriball,
            &(self.axiball - self.oriball),
            &(self.diagball - self.oriball),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Matrix3;

    #[test]
    fn test_fixture_basis() {
        let mut fixture = Fixture::new(None, "").unwrap();
        fixture.set_ball(FixtureBall::Ori, Point3::new(1.0, 1.0, 1.0));
        fixture.set_ball(FixtureBall::Axi, Point3::new(1.0, 6.0, 1.0));
        fixture.set_ball(FixtureBall::Diag, Point3::new(4.0, 5.0, 1.0));
        let basis = fixture.get_basis().unwrap();
        assert_eq!(basis.origin, Point3::new(1.0, 1.0, 1.0));
        let expected = Matrix3::new(0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, -1.0);
        assert_abs_diff_eq!(basis.axes, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_fixture_from_report() {
        let path = std::env::temp_dir().join("svt_survey_fixture_balls.txt");
        let mut text = String::new();
        for (name, x) in [("Ori", 0.0), ("Axi", 10.0), ("Diag", 0.0)] {
            let y = if name == "Diag" { 10.0 } else { 0.0 };
            text.push_str(&format!(
                "Matt {name} Ball\nX Location {x} mm\nY Location {y} mm\nZ Location 0.0 mm\n"
            ));
        }
        std::fs::write(&path, text).unwrap();

        let fixture = Fixture::new(Some(&path), "Matt ").unwrap();
        assert_eq!(fixture.get_ball(FixtureBall::Axi), Point3::new(10.0, 0.0, 0.0));
        assert_eq!(fixture.get_ball(FixtureBall::Diag), Point3::new(0.0, 10.0, 0.0));
        assert!(Fixture::new(Some(&path), "Sho ").is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_unprefixed_pass_after_prefixed_pass() {
        let path = std::env::temp_dir().join("svt_survey_fixture_two_passes.txt");
        let mut text = String::new();
        for (prefix, x) in [("Matt ", 100.0), ("", 1.0)] {
            for name in ["Ori", "Axi", "Diag"] {
                text.push_str(&format!(
                    "{prefix}{name} Ball\nX Location {x} mm\nY Location 0.0 mm\nZ Location 0.0 mm\n"
                ));
            }
        }
        std::fs::write(&path, text).unwrap();

        let canonical = Fixture::new(Some(&path), "").unwrap();
        let matt = Fixture::new(Some(&path), "Matt ").unwrap();
        assert_eq!(canonical.get_ball(FixtureBall::Ori), Point3::new(1.0, 0.0, 0.0));
        assert_eq!(matt.get_ball(FixtureBall::Ori), Point3::new(100.0, 0.0, 0.0));
        std::fs::remove_file(&path).unwrap();
    }
}
