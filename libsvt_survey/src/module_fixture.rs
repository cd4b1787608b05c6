//! Module fixtures hold a half-module while its sensors are surveyed.
//!
//! Three measurement conventions were used over the years, and each needs its own bridge
//! from "where the sensor pass recorded a feature" to the fixture ball frame:
//!
//! - plain: balls, pins and sensors all come from one CMM pass, so the bridge is just the
//!   ball frame.
//! - Matt: pins and sensors were recorded in Matt's own axes. The same three balls were
//!   measured in both passes, which fixes the rotation between the two conventions.
//! - Sho: pins and sensors were recorded in a frame built from a reference wire lying on
//!   a reference plane; both were measured in the CMM pass along with the balls.
//!
//! The variant is picked explicitly in the configuration and dispatched through
//! [`ModuleFixture`].
use nalgebra::{Matrix3, Vector3};
use std::path::Path;

use super::base_plane::BasePlane;
use super::config::FixtureConfig;
use super::error::GeometryError;
use super::fixture::Fixture;
use super::frame::{Frame, FrameHolder};
use super::ids::{FixtureBall, Layer};
use super::pin::Pin;
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::{Plane, Point3};
use super::wire::Wire;

const REFERENCE_PLANE: &str = "Reference Plane";

/// What a sensor needs from the fixture it was surveyed on
pub trait SensorMount {
    /// Bring a point recorded in the sensor pass into the fixture ball frame
    fn point_to_ball(&self, point: &Point3) -> Result<Point3, GeometryError>;

    /// Bring a direction recorded in the sensor pass into the fixture ball frame
    fn direction_to_ball(&self, direction: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError>;

    /// The module pin frame as recorded in the sensor pass
    fn measured_pin_frame(&self) -> Result<Frame, GeometryError>;

    /// Bring a whole frame recorded in the sensor pass into the fixture ball frame
    fn frame_to_ball(&self, frame: &Frame) -> Result<Frame, GeometryError> {
        let origin = self.point_to_ball(&frame.origin)?;
        let axes = Matrix3::from_rows(&[
            self.direction_to_ball(&frame.u())?.transpose(),
            self.direction_to_ball(&frame.v())?.transpose(),
            self.direction_to_ball(&frame.w())?.transpose(),
        ]);
        Ok(Frame::new(origin, axes))
    }

    /// The module pin frame written in the fixture ball frame
    fn get_pin_in_ball(&self) -> Result<Frame, GeometryError> {
        self.frame_to_ball(&self.measured_pin_frame()?)
    }
}

/// Balls, pins and sensors measured in a single pass
#[derive(Debug, Clone)]
pub struct PlainFixture {
    layer: Layer,
    balls: Fixture,
    pins: Pin,
    planes: BasePlane,
}

impl PlainFixture {
    pub fn new(path: Option<&Path>, layer: Layer) -> Result<Self, GeometryError> {
        Ok(Self {
            layer,
            balls: Fixture::new(path, "")?,
            pins: Pin::new(path, "", &[layer])?,
            planes: BasePlane::new(path, "", &[layer])?,
        })
    }

    pub fn balls_mut(&mut self) -> &mut Fixture {
        &mut self.balls
    }

    pub fn pins_mut(&mut self) -> &mut Pin {
        &mut self.pins
    }

    pub fn planes_mut(&mut self) -> &mut BasePlane {
        &mut self.planes
    }
}

impl SensorMount for PlainFixture {
    fn point_to_ball(&self, point: &Point3) -> Result<Point3, GeometryError> {
        Ok(self.balls.get_basis()?.to_local(point))
    }

    fn direction_to_ball(&self, direction: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
        Ok(self.balls.get_basis()?.direction_to_local(direction))
    }

    fn measured_pin_frame(&self) -> Result<Frame, GeometryError> {
        self.pins.frame(self.layer, &self.planes).get_basis()
    }
}

/// Fixture whose pin and sensor pass was recorded in Matt's axes
#[derive(Debug, Clone)]
pub struct MattFixture {
    layer: Layer,
    balls: Fixture,
    matt_balls: Fixture,
    pins: Pin,
    planes: BasePlane,
}

impl MattFixture {
    /// `ball_path` holds the canonical ball pass, `matt_path` the same balls plus the pins
    /// and base plane in Matt's axes.
    pub fn new(ball_path: Option<&Path>, matt_path: Option<&Path>, layer: Layer) -> Result<Self, GeometryError> {
        Ok(Self {
            layer,
            balls: Fixture::new(ball_path, "")?,
            matt_balls: Fixture::new(matt_path, "")?,
            pins: Pin::new(matt_path, "", &[layer])?,
            planes: BasePlane::new(matt_path, "", &[layer])?,
        })
    }

    pub fn balls_mut(&mut self) -> &mut Fixture {
        &mut self.balls
    }

    pub fn matt_balls_mut(&mut self) -> &mut Fixture {
        &mut self.matt_balls
    }

    pub fn pins_mut(&mut self) -> &mut Pin {
        &mut self.pins
    }

    pub fn planes_mut(&mut self) -> &mut BasePlane {
        &mut self.planes
    }

    /// Rotation taking directions in Matt's axes onto the canonical ball pass axes.
    ///
    /// Every chain that uses Matt-pass data must go through this first. Skipping it
    /// still gives an orthonormal frame, just rotated by the wrong amount.
    pub fn matt_to_ball(&self) -> Result<Matrix3<f64>, GeometryError> {
        let canonical = self.balls.get_basis()?;
        let matt = self.matt_balls.get_basis()?;
        Ok(canonical.axes.transpose() * matt.axes)
    }

    /// A Matt-pass point written in canonical ball pass coordinates
    pub fn matt_point_to_canonical(&self, point: &Point3) -> Result<Point3, GeometryError> {
        let rotation = self.matt_to_ball()?;
        let matt_ori = self.matt_balls.get_ball(FixtureBall::Ori);
        let ori = self.balls.get_ball(FixtureBall::Ori);
        Ok(ori + rotation * (point - matt_ori))
    }
}

impl SensorMount for MattFixture {
    fn point_to_ball(&self, point: &Point3) -> Result<Point3, GeometryError> {
        let canonical = self.matt_point_to_canonical(point)?;
        Ok(self.balls.get_basis()?.to_local(&canonical))
    }

    fn direction_to_ball(&self, direction: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
        let rotated = self.matt_to_ball()? * direction;
        Ok(self.balls.get_basis()?.direction_to_local(&rotated))
    }

    fn measured_pin_frame(&self) -> Result<Frame, GeometryError> {
        self.pins.frame(self.layer, &self.planes).get_basis()
    }
}

/// Fixture whose pin and sensor pass was recorded in the frame of a reference wire
#[derive(Debug, Clone)]
pub struct ShoFixture {
    layer: Layer,
    balls: Fixture,
    wire: Wire,
    reference: Plane,
    pins: Pin,
    planes: BasePlane,
}

impl ShoFixture {
    /// `ball_path` holds the CMM pass (balls, wire, reference plane), `sho_path` the pins
    /// and base plane in the wire frame.
    pub fn new(ball_path: Option<&Path>, sho_path: Option<&Path>, layer: Layer) -> Result<Self, GeometryError> {
        let reference = match SurveyReport::open_for(ball_path, "Sho reference plane")? {
            Some(report) => report.measure_plane(&MeasurementBlock::new(REFERENCE_PLANE, BlockLayout::PLANE))?,
            None => Plane::default(),
        };
        Ok(Self {
            layer,
            balls: Fixture::new(ball_path, "")?,
            wire: Wire::new(ball_path)?,
            reference,
            pins: Pin::new(sho_path, "", &[layer])?,
            planes: BasePlane::new(sho_path, "", &[layer])?,
        })
    }

    pub fn balls_mut(&mut self) -> &mut Fixture {
        &mut self.balls
    }

    pub fn wire_mut(&mut self) -> &mut Wire {
        &mut self.wire
    }

    pub fn set_reference(&mut self, plane: Plane) {
        self.reference = plane;
    }

    pub fn pins_mut(&mut self) -> &mut Pin {
        &mut self.pins
    }

    pub fn planes_mut(&mut self) -> &mut BasePlane {
        &mut self.planes
    }

    /// Sho's frame in CMM coordinates
    pub fn sho_frame(&self) -> Frame {
        self.wire.get_basis(&self.reference)
    }
}

impl SensorMount for ShoFixture {
    fn point_to_ball(&self, point: &Point3) -> Result<Point3, GeometryError> {
        let cmm = self.sho_frame().to_parent(point);
        Ok(self.balls.get_basis()?.to_local(&cmm))
    }

    fn direction_to_ball(&self, direction: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
        let cmm = self.sho_frame().direction_to_parent(direction);
        Ok(self.balls.get_basis()?.direction_to_local(&cmm))
    }

    fn measured_pin_frame(&self) -> Result<Frame, GeometryError> {
        self.pins.frame(self.layer, &self.planes).get_basis()
    }
}

/// A module fixture in one of the supported conventions
#[derive(Debug, Clone)]
pub enum ModuleFixture {
    Plain(PlainFixture),
    Matt(MattFixture),
    Sho(ShoFixture),
}

impl ModuleFixture {
    /// Build the fixture the configuration asks for
    pub fn from_config(config: &FixtureConfig, layer: Layer) -> Result<Self, GeometryError> {
        match config {
            FixtureConfig::Plain { survey_path } => {
                Ok(Self::Plain(PlainFixture::new(Some(survey_path.as_path()), layer)?))
            }
            FixtureConfig::Matt {
                ball_path,
                matt_path,
            } => Ok(Self::Matt(MattFixture::new(
                Some(ball_path.as_path()),
                Some(matt_path.as_path()),
                layer,
            )?)),
            FixtureConfig::Sho {
                ball_path,
                sho_path,
            } => Ok(Self::Sho(ShoFixture::new(
                Some(ball_path.as_path()),
                Some(sho_path.as_path()),
                layer,
            )?)),
        }
    }

    fn mount(&self) -> &dyn SensorMount {
        match self {
            Self::Plain(f) => f,
            Self::Matt(f) => f,
            Self::Sho(f) => f,
        }
    }
}

impl SensorMount for ModuleFixture {
    fn point_to_ball(&self, point: &Point3) -> Result<Point3, GeometryError> {
        self.mount().point_to_ball(point)
    }

    fn direction_to_ball(&self, direction: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
        self.mount().direction_to_ball(direction)
    }

    fn measured_pin_frame(&self) -> Result<Frame, GeometryError> {
        self.mount().measured_pin_frame()
    }
}
