use std::path::Path;

use super::error::{GeometryError, IdError};
use super::frame::{Frame, FrameHolder};
use super::ids::{Layer, Side, Volume};
use super::report::{BlockLayout, MeasurementBlock, SurveyReport};
use super::vector::{midpoint, Point3};

/// The four precision balls of a U-channel, one hole/slot pair at the layer 1 end and
/// one at the layer 3 end.
///
/// The ball frame is the reference frame all U-channel pin frames are quoted in.
#[derive(Debug, Clone, PartialEq)]
pub struct BallFrame {
    volume: Volume,
    l1_hole: Point3,
    l1_slot: Point3,
    l3_hole: Point3,
    l3_slot: Point3,
}

impl BallFrame {
    /// Read the balls of the `volume` U-channel from a survey report.
    ///
    /// If the path is None, all balls are zero.
    pub fn new(path: Option<&Path>, volume: Volume) -> Result<Self, GeometryError> {
        let mut frame = Self {
            volume,
            l1_hole: Point3::zeros(),
            l1_slot: Point3::zeros(),
            l3_hole: Point3::zeros(),
            l3_slot: Point3::zeros(),
        };
        if let Some(report) = SurveyReport::open_for(path, &format!("{volume} ball frame"))? {
            for layer in [Layer::L1, Layer::L3] {
                for side in Side::ALL {
                    let block = MeasurementBlock::new(Self::label(layer, side), BlockLayout::BALL);
                    frame.set_ball(layer, side, report.measure_point(&block)?)?;
                }
            }
        }
        Ok(frame)
    }

    fn label(layer: Layer, side: Side) -> String {
        format!("{layer} {side} Ball")
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn get_ball(&self, layer: Layer, side: Side) -> Result<Point3, IdError> {
        match (layer, side) {
            (Layer::L1, Side::Hole) => Ok(self.l1_hole),
            (Layer::L1, Side::Slot) => Ok(self.l1_slot),
            (Layer::L3, Side::Hole) => Ok(self.l3_hole),
            (Layer::L3, Side::Slot) => Ok(self.l3_slot),
            (other, _) => Err(IdError::BallLayer(other.number())),
        }
    }

    pub fn set_ball(&mut self, layer: Layer, side: Side, ball: Point3) -> Result<(), IdError> {
        let slot = match (layer, side) {
            (Layer::L1, Side::Hole) => &mut self.l1_hole,
            (Layer::L1, Side::Slot) => &mut self.l1_slot,
            (Layer::L3, Side::Hole) => &mut self.l3_hole,
            (Layer::L3, Side::Slot) => &mut self.l3_slot,
            (other, _) => return Err(IdError::BallLayer(other.number())),
        };
        *slot = ball;
        Ok(())
    }
}

impl FrameHolder for BallFrame {
    /// Origin at the midpoint of the layer 1 balls, w along the beam towards the layer 3
    /// balls, u across the channel. The balls mirror between volumes, so the cross
    /// direction runs hole -> slot on top and slot -> hole on the bottom.
    fn get_basis(&self) -> Result<Frame, GeometryError> {
        let origin = midpoint(&self.l1_hole, &self.l1_slot);
        let beam = midpoint(&self.l3_hole, &self.l3_slot) - origin;
        let cross = match self.volume() {
            Volume::Top => self.l1_slot - self.l1_hole,
            Volume::Bottom => self.l1_hole - self.l1_slot,
        };
        Ok(Frame::from_normal(origin, &beam, &cross))
    }
}
