use std::path::Path;
use std::rc::Rc;

use super::error::GeometryError;
use super::frame::{Frame, FrameHolder};
use super::ids::{Layer, SensorKind, Volume};
use super::module_fixture::{ModuleFixture, SensorMount};
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::{Plane, Point3};

/// As-built axis signs (u, v, w) of each sensor position, relative to the frame built
/// from the survey. These match the sign tables of the residual angle calculator and are
/// taken as given.
pub fn axis_signs(volume: Volume, kind: SensorKind) -> [f64; 3] {
    match (volume, kind) {
        (Volume::Top, SensorKind::Axial) => [1.0, 1.0, 1.0],
        (Volume::Top, SensorKind::Stereo) => [-1.0, 1.0, -1.0],
        (Volume::Bottom, SensorKind::Axial) => [-1.0, 1.0, -1.0],
        (Volume::Bottom, SensorKind::Stereo) => [1.0, 1.0, 1.0],
    }
}

fn label_stem(kind: SensorKind) -> &'static str {
    match kind {
        SensorKind::Axial => "Axial",
        SensorKind::Stereo => "Stereo",
    }
}

/// One silicon sensor of a half-module, surveyed on its module fixture.
///
/// The sensor pass records the fitted sensor plane and two fiducial marks along the
/// strips, all in the fixture's measurement convention.
#[derive(Debug, Clone)]
pub struct Sensor {
    volume: Volume,
    layer: Layer,
    kind: SensorKind,
    plane: Plane,
    fiducial_start: Point3,
    fiducial_end: Point3,
    fixture: Rc<ModuleFixture>,
}

impl Sensor {
    pub fn new(
        path: Option<&Path>,
        volume: Volume,
        layer: Layer,
        kind: SensorKind,
        fixture: Rc<ModuleFixture>,
    ) -> Result<Self, GeometryError> {
        let mut sensor = Self {
            volume,
            layer,
            kind,
            plane: Plane::default(),
            fiducial_start: Point3::zeros(),
            fiducial_end: Point3::zeros(),
            fixture,
        };
        let holder = format!("{volume} {layer} {kind} sensor");
        if let Some(report) = SurveyReport::open_for(path, &holder)? {
            let stem = label_stem(kind);
            sensor.plane = report.measure_plane(&MeasurementBlock::new(
                format!("{stem} Sensor Plane"),
                BlockLayout::PLANE,
            ))?;
            sensor.fiducial_start = report.measure_point(&MeasurementBlock::new(
                format!("{stem} Fiducial Start"),
                BlockLayout::BALL,
            ))?;
            sensor.fiducial_end = report.measure_point(&MeasurementBlock::new(
                format!("{stem} Fiducial End"),
                BlockLayout::BALL,
            ))?;
        }
        Ok(sensor)
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn fixture(&self) -> &ModuleFixture {
        &self.fixture
    }

    pub fn set_plane(&mut self, plane: Plane) {
        self.plane = plane;
    }

    pub fn set_fiducials(&mut self, start: Point3, end: Point3) {
        self.fiducial_start = start;
        self.fiducial_end = end;
    }

    /// Sensor frame in the measurement convention of its fixture: origin on the plane
    /// fit, w along the normal, u along the strips.
    pub fn get_basis_measured(&self) -> Frame {
        Frame::from_normal(
            self.plane.origin,
            &self.plane.normal,
            &(self.fiducial_end - self.fiducial_start),
        )
    }

    /// Sensor frame in the fixture ball frame
    pub fn get_basis_in_ball(&self) -> Result<Frame, GeometryError> {
        self.fixture.frame_to_ball(&self.get_basis_measured())
    }

    /// Sensor frame in the module pin frame with the as-built axis signs applied. This
    /// is the placement written to the geometry constants.
    pub fn get_basis_pinframe(&self) -> Result<Frame, GeometryError> {
        let pin = self.fixture.get_pin_in_ball()?;
        Ok(self
            .get_basis_in_ball()?
            .relative_to(&pin)
            .with_axis_signs(axis_signs(self.volume, self.kind)))
    }

    pub fn get_sensor_origin_pinframe(&self) -> Result<Point3, GeometryError> {
        Ok(self.get_basis_pinframe()?.origin)
    }

    pub fn get_sensor_normal_pinframe(&self) -> Result<Point3, GeometryError> {
        Ok(self.get_basis_pinframe()?.w())
    }
}

impl FrameHolder for Sensor {
    fn get_basis(&self) -> Result<Frame, GeometryError> {
        self.get_basis_pinframe()
    }
}
